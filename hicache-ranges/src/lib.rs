//! Read-only query layer over the hicache store.
//!
//! - [`merge`]: collapse coverage spans into maximal contiguous spans.
//! - [`query`]: window queries for interactions and coverage.
//! - [`significance`]: FDR filtering and projection into folding solver input.
//!
//! Everything here is pure or read-only and safe for any number of concurrent
//! callers.
//!
//! ```rust
//! use hicache_ranges::merge::IntervalMerge;
//!
//! let merged = [(100u32, 200u32), (500, 600), (150, 300)].reduce();
//! assert_eq!(merged.spans, vec![(100, 300), (500, 600)]);
//! assert_eq!(merged.bounds, Some((100, 600)));
//! ```

pub mod merge;
pub mod query;
pub mod significance;

// re-exports
pub use self::merge::{IntervalMerge, MergedCoverage};
pub use self::query::RangeQueryEngine;
pub use self::significance::{DEFAULT_ALPHA, FoldingEdge, filter_significant, to_folding_input};
