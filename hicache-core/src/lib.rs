//! Core records for hicache.
//!
//! This crate holds the typed records every other hicache crate passes around:
//! chromosome sizes, coverage spans, Hi-C interactions, cached 3D positions and
//! the read-only annotation records. It does no I/O.
//!
//! All coordinates are base pairs stored as `u32`. A [`Window`] is closed on
//! both ends: a base pair `bp` lies inside it when `start <= bp <= end`.
//!
//! # Example
//!
//! ```rust
//! use hicache_core::models::{CacheKey, Window};
//!
//! let window = Window::new(1000, 5000).unwrap();
//! assert!(window.contains(1000));
//! assert!(window.contains(5000));
//! assert!(!window.contains(5001));
//!
//! let key = CacheKey::new("GM12878", "chr12", window, 1);
//! assert_eq!(key.input_stem(), "GM12878.chr12.1000.5000");
//! ```

pub mod errors;
pub mod models;

pub use errors::ModelError;
