//! SQLite backend for [`IntervalStore`].

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use hicache_core::models::chromosome::sort_naturally;
use hicache_core::models::{
    AnchorMode, CacheKey, CachedPosition, Chromosome, CoverageSpan, EpigeneticTrack, Gene,
    GroupKey, Interaction, Position3, Window,
};
use log::debug;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};

use crate::backend::{IntervalStore, ReferenceLoader};
use crate::errors::StoreError;
use crate::schema::CREATE_TABLES;

/// How long a statement waits on a lock held by another writer (the solver).
/// Write transactions are `IMMEDIATE` so they take the write lock up front and
/// this wait applies, instead of failing on a read-to-write upgrade.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const INTERACTIONS_BOTH: &str = "SELECT chrID, cell_line, ibp, jbp, fq, fdr, pval, bon, rawc
     FROM non_random_hic
     WHERE cell_line = ?1 AND chrID = ?2
       AND ibp BETWEEN ?3 AND ?4 AND jbp BETWEEN ?3 AND ?4
     ORDER BY hID";

const INTERACTIONS_EITHER: &str = "SELECT chrID, cell_line, ibp, jbp, fq, fdr, pval, bon, rawc
     FROM non_random_hic
     WHERE cell_line = ?1 AND chrID = ?2
       AND (ibp BETWEEN ?3 AND ?4 OR jbp BETWEEN ?3 AND ?4)
     ORDER BY hID";

///
/// SQLite-backed store. One connection guarded by a mutex; the external solver
/// opens its own connection to the same file.
///
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        debug!("opened {} with journal_mode={}", path.display(), mode);

        Ok(SqliteStore {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Path of the database file; `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create tables and indexes if they are missing.
    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.conn()?.execute_batch(CREATE_TABLES)?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn interaction_from_row(row: &Row<'_>) -> rusqlite::Result<Interaction> {
    Ok(Interaction {
        chr: row.get(0)?,
        cell_line: row.get(1)?,
        ibp: row.get(2)?,
        jbp: row.get(3)?,
        fq: row.get(4)?,
        fdr: row.get(5)?,
        pval: row.get(6)?,
        bon: row.get(7)?,
        rawc: row.get(8)?,
    })
}

fn position_from_row(row: &Row<'_>) -> rusqlite::Result<CachedPosition> {
    let millis: i64 = row.get(8)?;
    let insert_time = DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(8, millis))?;

    Ok(CachedPosition {
        cell_line: row.get(0)?,
        chr: row.get(1)?,
        sample_id: row.get(2)?,
        start: row.get(3)?,
        end: row.get(4)?,
        x: row.get(5)?,
        y: row.get(6)?,
        z: row.get(7)?,
        insert_time,
    })
}

impl IntervalStore for SqliteStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    fn chromosomes(&self) -> Result<Vec<Chromosome>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached("SELECT chrID, size FROM chromosome")?;
        let mut chromosomes = stmt
            .query_map([], |row| {
                Ok(Chromosome {
                    chr: row.get(0)?,
                    size: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        sort_naturally(&mut chromosomes);
        Ok(chromosomes)
    }

    fn chromosome(&self, chr: &str) -> Result<Option<Chromosome>, StoreError> {
        let conn = self.conn()?;
        let chromosome = conn
            .query_row(
                "SELECT chrID, size FROM chromosome WHERE chrID = ?1",
                params![chr],
                |row| {
                    Ok(Chromosome {
                        chr: row.get(0)?,
                        size: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(chromosome)
    }

    fn coverage(&self, cell_line: &str, chr: &str) -> Result<Vec<CoverageSpan>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT cell_line, chrID, start_value, end_value FROM sequence
             WHERE cell_line = ?1 AND chrID = ?2
             ORDER BY start_value, end_value",
        )?;
        let spans = stmt
            .query_map(params![cell_line, chr], |row| {
                Ok(CoverageSpan {
                    cell_line: row.get(0)?,
                    chr: row.get(1)?,
                    start: row.get(2)?,
                    end: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(spans)
    }

    fn interactions(
        &self,
        cell_line: &str,
        chr: &str,
        window: &Window,
        mode: AnchorMode,
    ) -> Result<Vec<Interaction>, StoreError> {
        let sql = match mode {
            AnchorMode::Both => INTERACTIONS_BOTH,
            AnchorMode::Either => INTERACTIONS_EITHER,
        };
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt
            .query_map(
                params![cell_line, chr, window.start, window.end],
                interaction_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn genes_in_window(&self, chr: &str, window: &Window) -> Result<Vec<Gene>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT symbol, chrID, start_location, end_location FROM gene
             WHERE chrID = ?1 AND start_location <= ?3 AND end_location >= ?2
             ORDER BY start_location",
        )?;
        let genes = stmt
            .query_map(params![chr, window.start, window.end], |row| {
                Ok(Gene {
                    symbol: row.get(0)?,
                    chr: row.get(1)?,
                    start_location: row.get(2)?,
                    end_location: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(genes)
    }

    fn epigenetic_tracks(
        &self,
        cell_line: &str,
        chr: &str,
        window: &Window,
    ) -> Result<Vec<EpigeneticTrack>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT chrID, cell_line, epigenetic, start_value, end_value, signal_value, score
             FROM epigenetic_track
             WHERE cell_line = ?1 AND chrID = ?2 AND start_value <= ?4 AND end_value >= ?3
             ORDER BY start_value",
        )?;
        let tracks = stmt
            .query_map(params![cell_line, chr, window.start, window.end], |row| {
                Ok(EpigeneticTrack {
                    chr: row.get(0)?,
                    cell_line: row.get(1)?,
                    track_type: row.get(2)?,
                    start: row.get(3)?,
                    end: row.get(4)?,
                    signal_value: row.get(5)?,
                    score: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tracks)
    }

    fn cached_positions(&self, key: &CacheKey) -> Result<Vec<CachedPosition>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT cell_line, chrID, sampleID, start_value, end_value, X, Y, Z, insert_time
             FROM position
             WHERE cell_line = ?1 AND chrID = ?2 AND sampleID = ?3
               AND start_value = ?4 AND end_value = ?5
             ORDER BY pID",
        )?;
        let rows = stmt
            .query_map(
                params![
                    key.cell_line,
                    key.chr,
                    key.sample_id,
                    key.window.start,
                    key.window.end
                ],
                position_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn insert_positions(
        &self,
        key: &CacheKey,
        positions: &[Position3],
        insert_time: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO position
                 (cell_line, chrID, sampleID, start_value, end_value, X, Y, Z, insert_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for p in positions {
                stmt.execute(params![
                    key.cell_line,
                    key.chr,
                    key.sample_id,
                    key.window.start,
                    key.window.end,
                    p.x,
                    p.y,
                    p.z,
                    insert_time.timestamp_millis()
                ])?;
            }
        }
        tx.commit()?;
        Ok(positions.len())
    }

    fn delete_positions_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let n = conn.execute(
            "DELETE FROM position WHERE insert_time < ?1",
            params![cutoff.timestamp_millis()],
        )?;
        Ok(n)
    }

    fn count_group(&self, group: &GroupKey) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM position WHERE cell_line = ?1 AND chrID = ?2 AND sampleID = ?3",
            params![group.cell_line, group.chr, group.sample_id],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    fn delete_group(&self, group: &GroupKey) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let n = conn.execute(
            "DELETE FROM position WHERE cell_line = ?1 AND chrID = ?2 AND sampleID = ?3",
            params![group.cell_line, group.chr, group.sample_id],
        )?;
        Ok(n)
    }

    fn delete_all_positions(&self) -> Result<usize, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let n = tx.execute("DELETE FROM position", [])?;
        tx.commit()?;
        Ok(n)
    }
}

impl ReferenceLoader for SqliteStore {
    fn insert_chromosomes(&self, rows: &[Chromosome]) -> Result<usize, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT OR REPLACE INTO chromosome (chrID, size) VALUES (?1, ?2)")?;
            for c in rows {
                stmt.execute(params![c.chr, c.size])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    fn insert_coverage(&self, rows: &[CoverageSpan]) -> Result<usize, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO sequence (chrID, cell_line, start_value, end_value)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for s in rows {
                stmt.execute(params![s.chr, s.cell_line, s.start, s.end])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    fn insert_interactions(&self, rows: &[Interaction]) -> Result<usize, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO non_random_hic (chrID, cell_line, ibp, jbp, fq, fdr, pval, bon, rawc)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for i in rows {
                stmt.execute(params![
                    i.chr,
                    i.cell_line,
                    i.ibp,
                    i.jbp,
                    i.fq,
                    i.fdr,
                    i.pval,
                    i.bon,
                    i.rawc
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    fn insert_genes(&self, rows: &[Gene]) -> Result<usize, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO gene (symbol, chrID, start_location, end_location)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for g in rows {
                stmt.execute(params![g.symbol, g.chr, g.start_location, g.end_location])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    fn insert_epigenetic_tracks(&self, rows: &[EpigeneticTrack]) -> Result<usize, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO epigenetic_track
                 (chrID, cell_line, epigenetic, start_value, end_value, signal_value, score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for t in rows {
                stmt.execute(params![
                    t.chr,
                    t.cell_line,
                    t.track_type,
                    t.start,
                    t.end,
                    t.signal_value,
                    t.score
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }
}
