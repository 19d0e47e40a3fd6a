//! Typed accessors over the hicache store.
//!
//! The [`IntervalStore`] trait is the only capability the query engine and the
//! folding orchestrator see. Two backends implement it:
//!
//! - [`SqliteStore`]: the persistent relational store shared with the external
//!   folding solver, which writes cached positions into the same database.
//! - [`MemoryStore`]: an in-process fake used by tests.
//!
//! Neither backend holds any logic beyond parameterized retrieval, insert and
//! delete. Unknown chromosomes or cell lines give empty results, never errors.

pub mod backend;
pub mod errors;
pub mod memory;
pub mod schema;
pub mod sqlite;

// re-exports
pub use self::backend::{IntervalStore, ReferenceLoader};
pub use self::errors::StoreError;
pub use self::memory::MemoryStore;
pub use self::sqlite::SqliteStore;
