#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gene annotation, read-only reference data.
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gene {
    pub symbol: String,
    pub chr: String,
    pub start_location: u32,
    pub end_location: u32,
}

/// Epigenetic signal interval for one track type (e.g. `H3K27ac`).
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpigeneticTrack {
    pub chr: String,
    pub cell_line: String,
    pub track_type: String,
    pub start: u32,
    pub end: u32,
    pub signal_value: f64,
    pub score: Option<f64>,
}
