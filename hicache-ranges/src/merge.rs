//! Interval merging for coverage spans.
//!
//! Spans are closed `[start, end]` pairs. Merging sorts by start and then
//! sweeps, extending the open span whenever `next.start <= current.end`.

use hicache_core::models::CoverageSpan;
use serde::Serialize;

/// Canonical coverage: sorted, pairwise disjoint spans and their overall bounds.
///
/// `bounds` is `None` when there is no coverage at all.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize)]
pub struct MergedCoverage {
    pub spans: Vec<(u32, u32)>,
    pub bounds: Option<(u32, u32)>,
}

impl MergedCoverage {
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Merge overlapping spans into maximal contiguous spans.
pub trait IntervalMerge {
    fn reduce(&self) -> MergedCoverage;
}

impl IntervalMerge for [(u32, u32)] {
    fn reduce(&self) -> MergedCoverage {
        if self.is_empty() {
            return MergedCoverage::default();
        }

        let mut sorted = self.to_vec();
        sorted.sort_unstable();

        let mut merged: Vec<(u32, u32)> = Vec::new();
        let mut current = sorted[0];

        for &(start, end) in &sorted[1..] {
            if start <= current.1 {
                current.1 = current.1.max(end);
            } else {
                merged.push(current);
                current = (start, end);
            }
        }
        merged.push(current);

        // sorted by start and disjoint, so the ends of the first and last span bound everything
        let bounds = Some((merged[0].0, merged[merged.len() - 1].1));
        MergedCoverage {
            spans: merged,
            bounds,
        }
    }
}

impl IntervalMerge for [CoverageSpan] {
    fn reduce(&self) -> MergedCoverage {
        let pairs: Vec<(u32, u32)> = self.iter().map(CoverageSpan::bounds).collect();
        pairs.reduce()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::*;
    use std::collections::BTreeSet;

    fn points(spans: &[(u32, u32)]) -> BTreeSet<u32> {
        spans.iter().flat_map(|&(s, e)| s..=e).collect()
    }

    fn random_spans(rng: &mut StdRng) -> Vec<(u32, u32)> {
        let n = rng.gen_range(0..20);
        (0..n)
            .map(|_| {
                let start = rng.gen_range(0..200);
                (start, start + rng.gen_range(0..30))
            })
            .collect()
    }

    #[rstest]
    fn test_reduce_overlapping_and_disjoint() {
        let merged = [(100u32, 200u32), (150, 300), (500, 600)].reduce();
        assert_eq!(merged.spans, vec![(100, 300), (500, 600)]);
        assert_eq!(merged.bounds, Some((100, 600)));
    }

    #[rstest]
    fn test_reduce_unsorted_input() {
        // a sweep without the sort step would leave (100, 200) and (150, 300) apart
        let merged = [(500u32, 600u32), (150, 300), (100, 200)].reduce();
        assert_eq!(merged.spans, vec![(100, 300), (500, 600)]);
    }

    #[rstest]
    #[case(vec![], vec![], None)]
    #[case(vec![(7, 9)], vec![(7, 9)], Some((7, 9)))]
    #[case(vec![(0, 10), (10, 20)], vec![(0, 20)], Some((0, 20)))]
    #[case(vec![(0, 10), (11, 20)], vec![(0, 10), (11, 20)], Some((0, 20)))]
    #[case(vec![(0, 100), (20, 30), (40, 50)], vec![(0, 100)], Some((0, 100)))]
    fn test_reduce_edge_cases(
        #[case] input: Vec<(u32, u32)>,
        #[case] spans: Vec<(u32, u32)>,
        #[case] bounds: Option<(u32, u32)>,
    ) {
        let merged = input.reduce();
        assert_eq!(merged.spans, spans);
        assert_eq!(merged.bounds, bounds);
    }

    #[rstest]
    fn test_reduce_properties_on_random_sets() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let input = random_spans(&mut rng);
            let merged = input.reduce();

            for pair in merged.spans.windows(2) {
                assert!(pair[0].1 < pair[1].0, "overlap or misorder: {:?}", pair);
            }
            assert_eq!(points(&merged.spans), points(&input));
            assert_eq!(merged.spans.reduce(), merged);
        }
    }

    #[rstest]
    fn test_reduce_coverage_spans() {
        let spans = vec![
            CoverageSpan::new("K562", "chr1", 150, 300).unwrap(),
            CoverageSpan::new("K562", "chr1", 100, 200).unwrap(),
        ];
        assert_eq!(spans.reduce().spans, vec![(100, 300)]);
    }
}
