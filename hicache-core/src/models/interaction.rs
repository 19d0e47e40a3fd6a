use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::models::Window;

///
/// One pairwise Hi-C contact between anchors `ibp` and `jbp`.
///
/// `pval`, `bon` and `rawc` are only present in some data releases.
///
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interaction {
    pub chr: String,
    pub cell_line: String,
    pub ibp: u32,
    pub jbp: u32,
    pub fq: f64,
    pub fdr: f64,
    pub pval: Option<f64>,
    pub bon: Option<f64>,
    pub rawc: Option<f64>,
}

impl Interaction {
    pub fn new(cell_line: &str, chr: &str, ibp: u32, jbp: u32, fq: f64, fdr: f64) -> Self {
        Interaction {
            chr: chr.to_string(),
            cell_line: cell_line.to_string(),
            ibp,
            jbp,
            fq,
            fdr,
            pval: None,
            bon: None,
            rawc: None,
        }
    }

    /// Check the `fdr ∈ [0, 1]` invariant.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(0.0..=1.0).contains(&self.fdr) {
            return Err(ModelError::FdrOutOfRange(self.fdr));
        }
        Ok(())
    }

    /// Whether this contact belongs to `window` under `mode`.
    pub fn in_window(&self, window: &Window, mode: AnchorMode) -> bool {
        match mode {
            AnchorMode::Both => window.contains(self.ibp) && window.contains(self.jbp),
            AnchorMode::Either => window.contains(self.ibp) || window.contains(self.jbp),
        }
    }
}

/// How a window constrains the two anchors of an interaction.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AnchorMode {
    /// Both anchors inside the window.
    #[default]
    Both,
    /// At least one anchor inside the window; keeps long-range contacts.
    Either,
}

impl FromStr for AnchorMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "both" => Ok(AnchorMode::Both),
            "either" => Ok(AnchorMode::Either),
            _ => Err(ModelError::UnknownAnchorMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(1200, 4800, AnchorMode::Both, true)]
    #[case(1300, 6000, AnchorMode::Both, false)]
    #[case(1300, 6000, AnchorMode::Either, true)]
    #[case(500, 6000, AnchorMode::Either, false)]
    fn test_in_window(
        #[case] ibp: u32,
        #[case] jbp: u32,
        #[case] mode: AnchorMode,
        #[case] expected: bool,
    ) {
        let window = Window::new(1000, 5000).unwrap();
        let interaction = Interaction::new("GM12878", "chr12", ibp, jbp, 1.0, 0.01);
        assert_eq!(interaction.in_window(&window, mode), expected);
    }

    #[rstest]
    fn test_validate_fdr() {
        let mut interaction = Interaction::new("GM12878", "chr12", 1, 2, 1.0, 0.5);
        assert!(interaction.validate().is_ok());
        interaction.fdr = 1.5;
        assert_eq!(interaction.validate(), Err(ModelError::FdrOutOfRange(1.5)));
    }

    #[rstest]
    fn test_anchor_mode_from_str() {
        assert_eq!("Both".parse::<AnchorMode>(), Ok(AnchorMode::Both));
        assert_eq!("either".parse::<AnchorMode>(), Ok(AnchorMode::Either));
        assert!("any".parse::<AnchorMode>().is_err());
    }
}
