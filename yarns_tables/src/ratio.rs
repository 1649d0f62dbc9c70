// Exact rational numbers for FM and clock ratios.
//
// Ratio tables are built from small-integer fractions, and the FM catalog's
// ordering and subset rules need exact comparison and exact divisibility
// tests, so ratios are kept as reduced (numerator, denominator) pairs and
// only converted to floating point at the very end.
//
// `harmonic_family` implements the carrier:modulator normal form from
// Barry Truax's FM tutorial: ratios in the same family share a sideband
// set, differing only in where the spectral energy sits.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A positive rational number in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    numerator: u32,
    denominator: u32,
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Ratio {
    /// Build a reduced ratio. Panics on a zero term; ratios here only come
    /// from positive search ranges.
    pub fn new(numerator: u32, denominator: u32) -> Self {
        assert!(
            numerator > 0 && denominator > 0,
            "ratio terms must be positive: {numerator}/{denominator}"
        );
        let g = gcd(numerator, denominator);
        Ratio {
            numerator: numerator / g,
            denominator: denominator / g,
        }
    }

    pub fn numerator(self) -> u32 {
        self.numerator
    }

    pub fn denominator(self) -> u32 {
        self.denominator
    }

    pub fn recip(self) -> Ratio {
        Ratio {
            numerator: self.denominator,
            denominator: self.numerator,
        }
    }

    pub fn value(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn is_one(self) -> bool {
        self.numerator == 1 && self.denominator == 1
    }

    /// True if `self / other` is a whole number.
    pub fn is_multiple_of(self, other: Ratio) -> bool {
        // (a/b) / (c/d) = ad / bc
        let num = self.numerator as u64 * other.denominator as u64;
        let den = self.denominator as u64 * other.numerator as u64;
        num % den == 0
    }

    /// Every distinct ratio p/q with 1 <= p, q <= max_term, ascending.
    pub fn all_up_to(max_term: u32) -> Vec<Ratio> {
        let mut ratios = BTreeSet::new();
        for p in 1..=max_term {
            for q in 1..=max_term {
                ratios.insert(Ratio::new(p, q));
            }
        }
        ratios.into_iter().collect()
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.numerator as u64 * other.denominator as u64;
        let rhs = other.numerator as u64 * self.denominator as u64;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Normal form of a carrier:modulator ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RatioFamily {
    pub carrier: u32,
    pub modulator: u32,
}

impl fmt::Display for RatioFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.carrier, self.modulator)
    }
}

/// Reduce a carrier:modulator ratio to its family.
///
/// The modulator stays fixed while the carrier is replaced by its distance
/// to the modulator, until the ratio is 1:1 or the modulator is at least
/// twice the carrier. Also returns the carrier correction, original carrier
/// over reduced carrier, which keeps the fundamental in place when playing a
/// non-normal ratio.
pub fn harmonic_family(cm: Ratio) -> (RatioFamily, f64) {
    let carrier = cm.numerator();
    let modulator = cm.denominator();
    let mut reduced = carrier;
    while !((reduced == 1 && modulator == 1) || modulator >= 2 * reduced) {
        reduced = reduced.abs_diff(modulator);
    }
    // gcd(reduced, modulator) == gcd(carrier, modulator) == 1
    let family = RatioFamily {
        carrier: reduced,
        modulator,
    };
    (family, carrier as f64 / reduced as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduction() {
        let r = Ratio::new(6, 4);
        assert_eq!((r.numerator(), r.denominator()), (3, 2));
        assert_eq!(Ratio::new(9, 9), Ratio::new(1, 1));
    }

    #[test]
    fn test_exact_ordering() {
        assert!(Ratio::new(1, 3) < Ratio::new(1, 2));
        assert!(Ratio::new(2, 3) > Ratio::new(3, 5));
        assert_eq!(Ratio::new(2, 4).cmp(&Ratio::new(1, 2)), Ordering::Equal);
    }

    #[test]
    fn test_multiples() {
        assert!(Ratio::new(1, 2).is_multiple_of(Ratio::new(1, 4)));
        assert!(Ratio::new(3, 1).is_multiple_of(Ratio::new(3, 2)));
        assert!(!Ratio::new(1, 4).is_multiple_of(Ratio::new(1, 2)));
        assert!(!Ratio::new(2, 3).is_multiple_of(Ratio::new(1, 2)));
    }

    #[test]
    fn test_search_space() {
        let ratios = Ratio::all_up_to(9);
        // 81 pairs minus duplicates such as 2/2 and 2/4.
        assert_eq!(ratios.len(), 55);
        assert_eq!(ratios.first(), Some(&Ratio::new(1, 9)));
        assert_eq!(ratios.last(), Some(&Ratio::new(9, 1)));
        assert!(ratios.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_families() {
        let family = |c, m| harmonic_family(Ratio::new(c, m)).0;
        assert_eq!(family(1, 1), RatioFamily { carrier: 1, modulator: 1 });
        assert_eq!(family(2, 1), RatioFamily { carrier: 1, modulator: 1 });
        assert_eq!(family(7, 1), RatioFamily { carrier: 1, modulator: 1 });
        assert_eq!(family(3, 2), RatioFamily { carrier: 1, modulator: 2 });
        assert_eq!(family(5, 3), RatioFamily { carrier: 1, modulator: 3 });
        assert_eq!(family(3, 5), RatioFamily { carrier: 2, modulator: 5 });
        assert_eq!(family(2, 7), RatioFamily { carrier: 2, modulator: 7 });
    }

    #[test]
    fn test_carrier_correction() {
        let (_, correction) = harmonic_family(Ratio::new(5, 2));
        assert_eq!(correction, 5.0);
        let (_, correction) = harmonic_family(Ratio::new(1, 3));
        assert_eq!(correction, 1.0);
    }

    #[test]
    fn test_every_ratio_has_reduced_family() {
        for r in Ratio::all_up_to(9) {
            let (family, _) = harmonic_family(r);
            assert_eq!(gcd(family.carrier, family.modulator), 1, "{r}");
            assert!(family.modulator >= 2 * family.carrier || family.modulator == 1);
        }
    }
}
