//! Genomic coordinate primitives: chromosomes, positions, inclusive intervals
//! and the assembly tag a store is validated against at open time.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A validated chromosome token: autosomes 1-23, X, Y and the mitochondrial
/// contig M.
///
/// The canonical string form carries the `chr` prefix (`chr1`, `chrX`); the
/// short form drops it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chromosome {
    /// Numbered chromosome, 1-23
    Autosome(u8),
    X,
    Y,
    M,
}

impl Chromosome {
    /// All chromosomes in build iteration order: 1-23, then X, Y, M
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=23)
            .map(Chromosome::Autosome)
            .chain([Chromosome::X, Chromosome::Y, Chromosome::M])
    }

    /// Short form without the `chr` prefix (`1`, `X`)
    #[must_use]
    pub fn short(&self) -> String {
        match self {
            Self::Autosome(n) => n.to_string(),
            Self::X => "X".to_string(),
            Self::Y => "Y".to_string(),
            Self::M => "M".to_string(),
        }
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chr{}", self.short())
    }
}

impl FromStr for Chromosome {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_uppercase();
        let token = token.strip_prefix("CHR").unwrap_or(&token);
        match token {
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            "M" | "MT" => Ok(Self::M),
            _ => match token.parse::<u8>() {
                Ok(n) if (1..=23).contains(&n) => Ok(Self::Autosome(n)),
                _ => Err(ValueError::InvalidChromosome(s.to_string())),
            },
        }
    }
}

/// A single genomic coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub chromosome: Chromosome,
    pub value: u32,
}

impl Position {
    #[must_use]
    pub fn new(chromosome: Chromosome, value: u32) -> Self {
        Self { chromosome, value }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chromosome, self.value)
    }
}

/// An inclusive coordinate window on one chromosome.
///
/// Both boundaries belong to the interval: `[2, 4]` covers positions 2, 3, 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    pub chromosome: Chromosome,
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(chromosome: Chromosome, start: u32, end: u32) -> Result<Self, ValueError> {
        if start > end {
            return Err(ValueError::InvalidInterval { start, end });
        }
        Ok(Self {
            chromosome,
            start,
            end,
        })
    }

    /// Number of positions covered by this interval
    #[must_use]
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false // an interval always covers at least one position
    }

    #[must_use]
    pub fn contains(&self, position: &Position) -> bool {
        self.chromosome == position.chromosome
            && position.value >= self.start
            && position.value <= self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

/// A named reference genome build, used as a store compatibility tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Assembly {
    GRCh37,
    GRCh38,
}

impl Assembly {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GRCh37 => "GRCh37",
            Self::GRCh38 => "GRCh38",
        }
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Assembly {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GRCh37" => Ok(Self::GRCh37),
            "GRCh38" => Ok(Self::GRCh38),
            _ => Err(ValueError::InvalidAssembly(s.to_string())),
        }
    }
}

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_chromosome_parse_variants() {
        assert_eq!("1".parse::<Chromosome>().unwrap(), Chromosome::Autosome(1));
        assert_eq!("chr1".parse::<Chromosome>().unwrap(), Chromosome::Autosome(1));
        assert_eq!("CHR22".parse::<Chromosome>().unwrap(), Chromosome::Autosome(22));
        assert_eq!("x".parse::<Chromosome>().unwrap(), Chromosome::X);
        assert_eq!("chrY".parse::<Chromosome>().unwrap(), Chromosome::Y);
        assert_eq!("MT".parse::<Chromosome>().unwrap(), Chromosome::M);
        assert_eq!("chrM".parse::<Chromosome>().unwrap(), Chromosome::M);
    }

    #[test]
    fn test_chromosome_parse_invalid() {
        assert!("0".parse::<Chromosome>().is_err());
        assert!("24".parse::<Chromosome>().is_err());
        assert!("".parse::<Chromosome>().is_err());
        assert!("chrZ".parse::<Chromosome>().is_err());
    }

    #[test]
    fn test_chromosome_display() {
        assert_eq!(Chromosome::Autosome(7).to_string(), "chr7");
        assert_eq!(Chromosome::X.to_string(), "chrX");
        assert_eq!(Chromosome::Autosome(7).short(), "7");
    }

    #[test]
    fn test_chromosome_all_count_and_order() {
        let all: Vec<_> = Chromosome::all().collect();
        assert_eq!(all.len(), 26);
        assert_eq!(all[0], Chromosome::Autosome(1));
        assert_eq!(all[22], Chromosome::Autosome(23));
        assert_eq!(all[23], Chromosome::X);
        assert_eq!(all[25], Chromosome::M);
    }

    #[test]
    fn test_interval_validation() {
        assert!(Interval::new(Chromosome::X, 10, 5).is_err());
        let interval = Interval::new(Chromosome::X, 5, 5).unwrap();
        assert_eq!(interval.len(), 1);
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(Chromosome::Autosome(1), 200, 399).unwrap();
        assert!(interval.contains(&Position::new(Chromosome::Autosome(1), 200)));
        assert!(interval.contains(&Position::new(Chromosome::Autosome(1), 399)));
        assert!(!interval.contains(&Position::new(Chromosome::Autosome(1), 400)));
        assert!(!interval.contains(&Position::new(Chromosome::Autosome(2), 250)));
    }

    #[test]
    fn test_assembly_round_trip() {
        assert_eq!("GRCh38".parse::<Assembly>().unwrap(), Assembly::GRCh38);
        assert_eq!(Assembly::GRCh37.to_string(), "GRCh37");
        assert!("hg19".parse::<Assembly>().is_err());
    }
}
