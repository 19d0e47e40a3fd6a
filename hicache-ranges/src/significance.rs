//! Significance filtering and folding solver input.
//!
//! The solver reads a headerless tab-separated file with the columns
//! `chromosome, ibp, jbp, fq, weight`.

use std::io::{self, Write};

use hicache_core::models::Interaction;
use serde::Serialize;

/// FDR cut-off used when none is configured.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Constant edge weight handed to the solver; it is not derived from `fq`.
pub const EDGE_WEIGHT: u32 = 1;

/// One edge of the solver input graph.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct FoldingEdge {
    pub chr: String,
    pub ibp: u32,
    pub jbp: u32,
    pub fq: f64,
    pub weight: u32,
}

impl FoldingEdge {
    /// Tab-separated line without the trailing newline.
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.chr, self.ibp, self.jbp, self.fq, self.weight
        )
    }
}

/// Keep interactions with `fdr < alpha`, preserving input order.
pub fn filter_significant(interactions: &[Interaction], alpha: f64) -> Vec<Interaction> {
    interactions
        .iter()
        .filter(|i| i.fdr < alpha)
        .cloned()
        .collect()
}

/// Project interactions into solver edges, preserving input order.
pub fn to_folding_input(interactions: &[Interaction]) -> Vec<FoldingEdge> {
    interactions
        .iter()
        .map(|i| FoldingEdge {
            chr: i.chr.clone(),
            ibp: i.ibp,
            jbp: i.jbp,
            fq: i.fq,
            weight: EDGE_WEIGHT,
        })
        .collect()
}

/// Write edges in the solver's input format.
pub fn write_folding_input<W: Write>(edges: &[FoldingEdge], mut writer: W) -> io::Result<()> {
    for edge in edges {
        writeln!(writer, "{}", edge.as_string())?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn interactions() -> Vec<Interaction> {
        vec![
            Interaction::new("GM12878", "chr12", 1200, 4800, 2.1, 0.01),
            Interaction::new("GM12878", "chr12", 1300, 6000, 1.0, 0.2),
            Interaction::new("GM12878", "chr12", 2000, 2500, 0.7, 0.049),
            Interaction::new("GM12878", "chr12", 2100, 2600, 0.9, 0.05),
        ]
    }

    #[rstest]
    fn test_filter_is_strict_and_ordered(interactions: Vec<Interaction>) {
        let kept = filter_significant(&interactions, DEFAULT_ALPHA);
        let anchors: Vec<(u32, u32)> = kept.iter().map(|i| (i.ibp, i.jbp)).collect();
        assert_eq!(anchors, vec![(1200, 4800), (2000, 2500)]);
    }

    #[rstest]
    fn test_filter_monotonic_in_alpha(interactions: Vec<Interaction>) {
        let alphas = [0.0, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0];
        for pair in alphas.windows(2) {
            let small = filter_significant(&interactions, pair[0]);
            let large = filter_significant(&interactions, pair[1]);
            assert!(small.iter().all(|i| large.contains(i)));
        }
    }

    #[rstest]
    fn test_folding_input_format(interactions: Vec<Interaction>) {
        let edges = to_folding_input(&filter_significant(&interactions, DEFAULT_ALPHA));
        assert!(edges.iter().all(|e| e.weight == EDGE_WEIGHT));

        let mut buffer = Vec::new();
        write_folding_input(&edges, &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "chr12\t1200\t4800\t2.1\t1\nchr12\t2000\t2500\t0.7\t1\n"
        );
    }

    #[rstest]
    fn test_empty_input() {
        assert!(filter_significant(&[], DEFAULT_ALPHA).is_empty());
        assert!(to_folding_input(&[]).is_empty());
    }
}
