use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use rstest::*;

use hicache_core::models::{
    AnchorMode, CacheKey, Chromosome, CoverageSpan, EpigeneticTrack, Gene, Interaction, Position3,
    Window,
};
use hicache_store::{IntervalStore, MemoryStore, ReferenceLoader, SqliteStore};

const CELL: &str = "GM12878";
const CHR: &str = "chr12";

fn seed<S: IntervalStore + ReferenceLoader>(store: &S) {
    store
        .insert_chromosomes(&[
            Chromosome::new("chrX", 156_040_895),
            Chromosome::new("chr12", 133_275_309),
            Chromosome::new("chr2", 242_193_529),
        ])
        .unwrap();
    store
        .insert_coverage(&[
            CoverageSpan::new(CELL, CHR, 500, 600).unwrap(),
            CoverageSpan::new(CELL, CHR, 100, 200).unwrap(),
            CoverageSpan::new(CELL, CHR, 150, 300).unwrap(),
            CoverageSpan::new("IMR90", CHR, 0, 10).unwrap(),
        ])
        .unwrap();

    let mut with_stats = Interaction::new(CELL, CHR, 1200, 4800, 2.1, 0.01);
    with_stats.pval = Some(0.001);
    store
        .insert_interactions(&[
            with_stats,
            Interaction::new(CELL, CHR, 1300, 6000, 1.4, 0.2),
            Interaction::new(CELL, CHR, 7000, 8000, 3.0, 0.001),
            Interaction::new("IMR90", CHR, 1200, 4800, 9.0, 0.0),
        ])
        .unwrap();
    store
        .insert_genes(&[
            Gene {
                symbol: "KRAS".to_string(),
                chr: CHR.to_string(),
                start_location: 4000,
                end_location: 9000,
            },
            Gene {
                symbol: "FAR".to_string(),
                chr: CHR.to_string(),
                start_location: 90_000,
                end_location: 91_000,
            },
        ])
        .unwrap();
    store
        .insert_epigenetic_tracks(&[EpigeneticTrack {
            chr: CHR.to_string(),
            cell_line: CELL.to_string(),
            track_type: "H3K27ac".to_string(),
            start: 900,
            end: 1100,
            signal_value: 12.5,
            score: None,
        }])
        .unwrap();
}

fn window() -> Window {
    Window::new(1000, 5000).unwrap()
}

fn check_reference_reads<S: IntervalStore + ReferenceLoader>(store: &S) {
    seed(store);

    let names: Vec<String> = store.chromosomes().unwrap().into_iter().map(|c| c.chr).collect();
    assert_eq!(names, vec!["chr2", "chr12", "chrX"]);
    assert_eq!(store.chromosome("chr2").unwrap().map(|c| c.size), Some(242_193_529));
    assert_eq!(store.chromosome("chr99").unwrap(), None);

    let starts: Vec<u32> = store.coverage(CELL, CHR).unwrap().iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![100, 150, 500]);
    assert!(store.coverage("HeLa", CHR).unwrap().is_empty());

    let both = store.interactions(CELL, CHR, &window(), AnchorMode::Both).unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!((both[0].ibp, both[0].jbp), (1200, 4800));
    assert_eq!(both[0].pval, Some(0.001));
    assert_eq!(both[0].bon, None);

    let either = store.interactions(CELL, CHR, &window(), AnchorMode::Either).unwrap();
    let pairs: Vec<(u32, u32)> = either.iter().map(|i| (i.ibp, i.jbp)).collect();
    assert_eq!(pairs, vec![(1200, 4800), (1300, 6000)]);

    assert!(store.interactions(CELL, "chr99", &window(), AnchorMode::Both).unwrap().is_empty());

    let genes = store.genes_in_window(CHR, &window()).unwrap();
    assert_eq!(genes.len(), 1);
    assert_eq!(genes[0].symbol, "KRAS");

    let tracks = store.epigenetic_tracks(CELL, CHR, &window()).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].track_type, "H3K27ac");
}

fn check_position_lifecycle<S: IntervalStore>(store: &S) {
    let key = CacheKey::new(CELL, CHR, window(), 1);
    let sibling = CacheKey::new(CELL, CHR, Window::new(0, 999).unwrap(), 1);
    let other_group = CacheKey::new(CELL, CHR, window(), 2);
    let coords = [
        Position3 { x: 0.0, y: 1.0, z: 2.0 },
        Position3 { x: 3.0, y: 4.0, z: 5.0 },
    ];

    let now = Utc::now();
    assert_eq!(store.insert_positions(&key, &coords, now).unwrap(), 2);
    store
        .insert_positions(&sibling, &coords[..1], now - Duration::minutes(30))
        .unwrap();
    store.insert_positions(&other_group, &coords, now).unwrap();

    let rows = store.cached_positions(&key).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].coordinates(), coords[1]);
    assert!(rows.iter().all(|r| key.matches(r)));

    assert_eq!(store.count_group(&key.group()).unwrap(), 3);
    assert_eq!(store.count_group(&other_group.group()).unwrap(), 2);

    // only the 30 minute old sibling row is swept
    let removed = store
        .delete_positions_before(now - Duration::minutes(10))
        .unwrap();
    assert_eq!(removed, 1);
    assert!(store.cached_positions(&sibling).unwrap().is_empty());
    assert_eq!(store.cached_positions(&key).unwrap().len(), 2);

    assert_eq!(store.delete_group(&key.group()).unwrap(), 2);
    assert!(store.cached_positions(&key).unwrap().is_empty());
    assert_eq!(store.cached_positions(&other_group).unwrap().len(), 2);

    assert_eq!(store.delete_all_positions().unwrap(), 2);
    assert!(store.cached_positions(&other_group).unwrap().is_empty());
}

/// A writer inserting batches while another handle wipes the table: every
/// inserted row is either wiped or still present, and batches stay whole.
fn check_wipe_races_inserts<A: IntervalStore, B: IntervalStore>(writer: &A, wiper: &B) {
    const BATCHES: usize = 40;
    const BATCH: usize = 4;
    let key = CacheKey::new(CELL, CHR, window(), 1);
    let coords = vec![Position3 { x: 1.0, y: 2.0, z: 3.0 }; BATCH];
    let done = AtomicBool::new(false);

    let (inserted, wiped) = thread::scope(|s| {
        let inserts = s.spawn(|| {
            let mut n = 0;
            for _ in 0..BATCHES {
                n += writer.insert_positions(&key, &coords, Utc::now()).unwrap();
            }
            done.store(true, Ordering::SeqCst);
            n
        });
        let wipes = s.spawn(|| {
            let mut n = 0;
            while !done.load(Ordering::SeqCst) {
                n += wiper.delete_all_positions().unwrap();
                assert_eq!(wiper.count_group(&key.group()).unwrap() % BATCH, 0);
                thread::yield_now();
            }
            n
        });
        (inserts.join().unwrap(), wipes.join().unwrap())
    });

    let remaining = wiper.cached_positions(&key).unwrap().len();
    assert_eq!(inserted, BATCHES * BATCH);
    assert_eq!(wiped + remaining, inserted);
    assert_eq!(remaining % BATCH, 0);
}

#[fixture]
fn sqlite_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    store.init_schema().unwrap();
    store
}

#[rstest]
fn test_memory_reference_reads() {
    check_reference_reads(&MemoryStore::new());
}

#[rstest]
fn test_sqlite_reference_reads(sqlite_store: SqliteStore) {
    check_reference_reads(&sqlite_store);
}

#[rstest]
fn test_memory_position_lifecycle() {
    check_position_lifecycle(&MemoryStore::new());
}

#[rstest]
fn test_sqlite_position_lifecycle(sqlite_store: SqliteStore) {
    check_position_lifecycle(&sqlite_store);
}

#[rstest]
fn test_sqlite_file_store_reopens() {
    let tempdir = tempfile::tempdir().unwrap();
    let db = tempdir.path().join("hicache.sqlite");
    {
        let store = SqliteStore::open(&db).unwrap();
        store.init_schema().unwrap();
        store
            .insert_chromosomes(&[Chromosome::new("chr1", 248_956_422)])
            .unwrap();
        assert_eq!(store.path(), Some(db.as_path()));
    }

    let store = SqliteStore::open(&db).unwrap();
    store.init_schema().unwrap();
    assert_eq!(store.chromosomes().unwrap().len(), 1);
}

#[rstest]
fn test_memory_wipe_races_inserts() {
    let store = MemoryStore::new();
    check_wipe_races_inserts(&store, &store);
}

#[rstest]
fn test_sqlite_wipe_races_inserts_across_connections() {
    let tempdir = tempfile::tempdir().unwrap();
    let db = tempdir.path().join("hicache.sqlite");
    let writer = SqliteStore::open(&db).unwrap();
    writer.init_schema().unwrap();
    let wiper = SqliteStore::open(&db).unwrap();

    check_wipe_races_inserts(&writer, &wiper);
}
