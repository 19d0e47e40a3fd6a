use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///
/// Chromosome reference record: identifier and size in base pairs.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chromosome {
    pub chr: String,
    pub size: u32,
}

impl Chromosome {
    pub fn new(chr: &str, size: u32) -> Self {
        Chromosome {
            chr: chr.to_string(),
            size,
        }
    }

    /// Numeric part of names like `chr12`; `None` for `chrX`, `chrM` and friends.
    pub fn number(&self) -> Option<u32> {
        self.chr
            .strip_prefix("chr")
            .unwrap_or(&self.chr)
            .parse::<u32>()
            .ok()
    }
}

/// Natural chromosome order: numbered chromosomes ascending, then the rest by name.
pub fn natural_cmp(a: &Chromosome, b: &Chromosome) -> Ordering {
    match (a.number(), b.number()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.chr.cmp(&b.chr),
    }
}

/// Sort chromosomes in place with [`natural_cmp`].
pub fn sort_naturally(chromosomes: &mut [Chromosome]) {
    chromosomes.sort_by(natural_cmp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_natural_order() {
        let mut chromosomes: Vec<Chromosome> = ["chrX", "chr10", "chr2", "chrM", "chr1"]
            .iter()
            .map(|c| Chromosome::new(c, 100))
            .collect();
        sort_naturally(&mut chromosomes);
        let names: Vec<&str> = chromosomes.iter().map(|c| c.chr.as_str()).collect();
        assert_eq!(names, vec!["chr1", "chr2", "chr10", "chrM", "chrX"]);
    }
}
