use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("Window start {start} is greater than end {end}")]
    InvalidWindow { start: u32, end: u32 },

    #[error("Span start {start} is greater than end {end}")]
    InvalidSpan { start: u32, end: u32 },

    #[error("Unknown anchor mode: {0}")]
    UnknownAnchorMode(String),

    #[error("FDR value out of range [0, 1]: {0}")]
    FdrOutOfRange(f64),
}
