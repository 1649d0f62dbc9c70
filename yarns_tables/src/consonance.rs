// Consonance score for every interval within an octave.
//
// Scored at 1/128 semitone resolution (1536 steps per octave) against a
// list of just-intonation intervals. An interval's base score is
// log2(p * q)^2, so ratios with larger terms score as more dissonant. Each
// step takes the score of its nearest listed interval plus the squared
// distance to it. Lower is more consonant.

use crate::error::Result;
use crate::table::{LookupTable, TableWidth};

pub const STEPS_PER_OCTAVE: i64 = 1536;

pub const JUST_INTERVALS: &[(u32, u32)] = &[
    (1, 1),
    (9, 8),
    (5, 4),
    (4, 3),
    (3, 2),
    (5, 3),
    (15, 8),
    (256, 243),
    (16, 15),
    (10, 9),
    (32, 27),
    (6, 5),
    (81, 64),
    (45, 32),
    (1024, 729),
    (64, 45),
    (729, 512),
    (128, 81),
    (8, 5),
    (27, 16),
    (16, 9),
    (9, 5),
    (243, 128),
];

/// Position within the octave and base score of a just interval.
pub fn interval_anchor(p: u32, q: u32) -> (i64, f64) {
    let position = (STEPS_PER_OCTAVE as f64 * (p as f64 / q as f64).log2()).round_ties_even();
    let score = (p as f64 * q as f64).log2().powi(2);
    (position as i64, score)
}

pub fn consonance_scores() -> Vec<f64> {
    let anchors: Vec<(i64, f64)> = JUST_INTERVALS
        .iter()
        .map(|&(p, q)| interval_anchor(p, q))
        .collect();

    (0..STEPS_PER_OCTAVE)
        .map(|i| {
            let distance =
                |position: i64| (i - position).abs().min((i - position - STEPS_PER_OCTAVE).abs());
            // First anchor wins ties.
            let mut nearest = anchors[0];
            for &anchor in &anchors[1..] {
                if distance(anchor.0) < distance(nearest.0) {
                    nearest = anchor;
                }
            }
            let (position, score) = nearest;
            let offset = (i - position)
                .pow(2)
                .min((i - position - STEPS_PER_OCTAVE).pow(2));
            score + offset as f64
        })
        .collect()
}

pub fn consonance_table() -> Result<LookupTable> {
    LookupTable::truncated("consonance", TableWidth::U16, consonance_scores())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors() {
        assert_eq!(interval_anchor(1, 1), (0, 0.0));
        assert_eq!(interval_anchor(3, 2).0, 899);
        assert_eq!(interval_anchor(243, 128).0, 1421);
    }

    #[test]
    fn test_reference_scores() {
        let table = consonance_table().unwrap();
        let v = table.integers_slice().unwrap();
        assert_eq!(v.len(), 1536);
        assert_eq!(v[0], 0);
        assert_eq!(v[1], 1);
        assert_eq!(v[100], 478);
        assert_eq!(v[768], 279);
        // Wraps around to the unison.
        assert_eq!(v[1535], 1);
        assert_eq!(v.iter().max(), Some(&3629));
    }

    #[test]
    fn test_fifth_more_consonant_than_tritone() {
        let scores = consonance_scores();
        assert!(scores[899] < scores[768]);
    }
}
