//! Table layout shared with the ingestion scripts and the folding solver.

/// Creates every table and lookup index; safe to run on an existing database.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS chromosome (
    chrID TEXT PRIMARY KEY,
    size INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS sequence (
    sID INTEGER PRIMARY KEY AUTOINCREMENT,
    chrID TEXT NOT NULL,
    cell_line TEXT NOT NULL,
    start_value INTEGER NOT NULL DEFAULT 0,
    end_value INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_sequence_lookup ON sequence (cell_line, chrID, start_value);

CREATE TABLE IF NOT EXISTS non_random_hic (
    hID INTEGER PRIMARY KEY AUTOINCREMENT,
    chrID TEXT NOT NULL,
    cell_line TEXT NOT NULL,
    ibp INTEGER NOT NULL DEFAULT 0,
    jbp INTEGER NOT NULL DEFAULT 0,
    fq REAL NOT NULL DEFAULT 0.0,
    fdr REAL NOT NULL DEFAULT 0.0,
    pval REAL,
    bon REAL,
    rawc REAL
);
CREATE INDEX IF NOT EXISTS idx_hic_lookup ON non_random_hic (cell_line, chrID, ibp, jbp);

CREATE TABLE IF NOT EXISTS position (
    pID INTEGER PRIMARY KEY AUTOINCREMENT,
    cell_line TEXT NOT NULL,
    chrID TEXT NOT NULL,
    sampleID INTEGER NOT NULL DEFAULT 0,
    start_value INTEGER NOT NULL DEFAULT 0,
    end_value INTEGER NOT NULL DEFAULT 0,
    X REAL NOT NULL DEFAULT 0.0,
    Y REAL NOT NULL DEFAULT 0.0,
    Z REAL NOT NULL DEFAULT 0.0,
    insert_time INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_position_key ON position (cell_line, chrID, sampleID, start_value, end_value);
CREATE INDEX IF NOT EXISTS idx_position_time ON position (insert_time);

CREATE TABLE IF NOT EXISTS gene (
    gID INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    chrID TEXT NOT NULL,
    start_location INTEGER NOT NULL DEFAULT 0,
    end_location INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_gene_lookup ON gene (chrID, start_location);

CREATE TABLE IF NOT EXISTS epigenetic_track (
    eID INTEGER PRIMARY KEY AUTOINCREMENT,
    chrID TEXT NOT NULL,
    cell_line TEXT NOT NULL,
    epigenetic TEXT NOT NULL,
    start_value INTEGER NOT NULL DEFAULT 0,
    end_value INTEGER NOT NULL DEFAULT 0,
    signal_value REAL NOT NULL DEFAULT 0.0,
    score REAL
);
CREATE INDEX IF NOT EXISTS idx_track_lookup ON epigenetic_track (cell_line, chrID, start_value);
";
