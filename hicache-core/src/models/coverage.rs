#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

///
/// A contiguous region of one chromosome for which interaction data was ingested.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoverageSpan {
    pub cell_line: String,
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

impl CoverageSpan {
    /// Build a span, rejecting `start > end`.
    pub fn new(cell_line: &str, chr: &str, start: u32, end: u32) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::InvalidSpan { start, end });
        }
        Ok(CoverageSpan {
            cell_line: cell_line.to_string(),
            chr: chr.to_string(),
            start,
            end,
        })
    }

    pub fn bounds(&self) -> (u32, u32) {
        (self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_span_rejects_inverted_bounds() {
        assert_eq!(
            CoverageSpan::new("K562", "chr1", 300, 100),
            Err(ModelError::InvalidSpan {
                start: 300,
                end: 100
            })
        );
        let span = CoverageSpan::new("K562", "chr1", 100, 100).unwrap();
        assert_eq!(span.bounds(), (100, 100));
    }
}
