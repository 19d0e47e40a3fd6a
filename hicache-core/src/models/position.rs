use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::models::Window;

///
/// Identity of one structure computation: (cell line, chromosome, window, sample id).
///
/// All cached rows sharing a key form one result set.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CacheKey {
    pub cell_line: String,
    pub chr: String,
    pub window: Window,
    pub sample_id: u32,
}

impl CacheKey {
    pub fn new(cell_line: &str, chr: &str, window: Window, sample_id: u32) -> Self {
        CacheKey {
            cell_line: cell_line.to_string(),
            chr: chr.to_string(),
            window,
            sample_id,
        }
    }

    /// The (cell line, chromosome, sample id) group the hard row cap applies to.
    pub fn group(&self) -> GroupKey {
        GroupKey {
            cell_line: self.cell_line.clone(),
            chr: self.chr.clone(),
            sample_id: self.sample_id,
        }
    }

    /// File stem of the solver input. Excludes the sample id.
    ///
    /// Characters other than ASCII alphanumerics, `-` and `_` in the cell line
    /// and chromosome become `_`, so the stem is always a single path component.
    pub fn input_stem(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            path_safe(&self.cell_line),
            path_safe(&self.chr),
            self.window.start,
            self.window.end
        )
    }

    /// Does a cached row belong to this key?
    pub fn matches(&self, position: &CachedPosition) -> bool {
        position.cell_line == self.cell_line
            && position.chr == self.chr
            && position.sample_id == self.sample_id
            && position.start == self.window.start
            && position.end == self.window.end
    }
}

fn path_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.cell_line, self.chr, self.window, self.sample_id
        )
    }
}

#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct GroupKey {
    pub cell_line: String,
    pub chr: String,
    pub sample_id: u32,
}

impl GroupKey {
    pub fn matches(&self, position: &CachedPosition) -> bool {
        position.cell_line == self.cell_line
            && position.chr == self.chr
            && position.sample_id == self.sample_id
    }
}

/// One X/Y/Z coordinate as written by the solver.
#[derive(PartialEq, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

///
/// A cached 3D coordinate row together with its source key and insertion time.
///
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CachedPosition {
    pub cell_line: String,
    pub chr: String,
    pub sample_id: u32,
    pub start: u32,
    pub end: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub insert_time: DateTime<Utc>,
}

impl CachedPosition {
    pub fn from_key(key: &CacheKey, position: Position3, insert_time: DateTime<Utc>) -> Self {
        CachedPosition {
            cell_line: key.cell_line.clone(),
            chr: key.chr.clone(),
            sample_id: key.sample_id,
            start: key.window.start,
            end: key.window.end,
            x: position.x,
            y: position.y,
            z: position.z,
            insert_time,
        }
    }

    pub fn coordinates(&self) -> Position3 {
        Position3 {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}
