use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

///
/// Base-pair window requested by a client, closed on both ends.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Window {
    pub start: u32,
    pub end: u32,
}

impl Window {
    /// Build a window, rejecting `start > end`.
    pub fn new(start: u32, end: u32) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::InvalidWindow { start, end });
        }
        Ok(Window { start, end })
    }

    /// True when `bp` lies in `[start, end]`.
    #[inline]
    pub fn contains(&self, bp: u32) -> bool {
        self.start <= bp && bp <= self.end
    }

    ///
    /// Number of base pairs covered by the window
    ///
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
