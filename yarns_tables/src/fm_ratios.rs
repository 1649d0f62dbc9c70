// FM carrier:modulator ratio catalog.
//
// The FM voice offers a menu of modulator:carrier ratios. The menu is built
// in four stages, each reading the survivors of the previous one:
//
// 1. Enumerate every distinct ratio c/m with small terms and reduce each to
//    its harmonic family (see `ratio::harmonic_family`).
// 2. Sort by (family carrier, family modulator, ratio) and keep the first
//    ratio of each family. Ratios sharing a family share a sideband set and
//    mostly differ like a change of FM index would, so one representative
//    per family is enough.
// 3. Reject a representative when an earlier survivor is a whole multiple
//    of it: its sidebands are a subset of that survivor's. The check only
//    looks backwards, so the result depends on the sort order.
// 4. Map each survivor through ?⁻¹ to get an inharmonic partner, skipping
//    those that land on a multiple of 0.1 (they are still simple ratios).
//
// A fixed set of multiples of pi is appended at the end. Names are two
// display characters followed by a long description; glyph 0xC1 is pi.
//
// Three tables come out: names, modulator intervals in 1/128 semitone, and
// the per-ratio index upshift the firmware uses to keep perceived
// modulation depth even across ratios.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use tracing::{debug, info};

use crate::config::FmParams;
use crate::error::Result;
use crate::minkowski::inverse_question_mark;
use crate::ratio::{Ratio, RatioFamily, harmonic_family};
use crate::segment_font::PI_GLYPH;
use crate::table::{LookupTable, TableWidth};

/// A carrier:modulator ratio with its family and carrier correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicFm {
    pub family: RatioFamily,
    /// Carrier over modulator.
    pub ratio: Ratio,
    pub carrier_correction: f64,
}

impl HarmonicFm {
    pub fn new(ratio: Ratio) -> Self {
        let (family, carrier_correction) = harmonic_family(ratio);
        HarmonicFm {
            family,
            ratio,
            carrier_correction,
        }
    }
}

/// One menu entry: display name and modulator frequency over carrier
/// frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct FmRatio {
    pub name: String,
    pub modulator_ratio: f64,
}

/// Modulator interval in 1/128 semitone for a modulator:carrier ratio.
pub fn modulator_interval(modulator_ratio: f64) -> f64 {
    128.0 * 12.0 * modulator_ratio.log2()
}

/// Modulator interval for a carrier:modulator ratio.
pub fn carrier_modulator_interval(cm: Ratio) -> f64 {
    modulator_interval(cm.recip().value())
}

/// Twice the log2 of how far a ratio sits below the scaling base, rounded
/// half to even.
pub fn index_upshift(modulator_ratio: f64, base: f64) -> f64 {
    (2.0 * (base / modulator_ratio).log2()).round_ties_even()
}

/// Stage 1: every ratio in the search space, in family order.
pub fn harmonic_candidates(max_term: u32) -> Vec<HarmonicFm> {
    let mut candidates: Vec<HarmonicFm> = Ratio::all_up_to(max_term)
        .into_iter()
        .map(HarmonicFm::new)
        .collect();
    // RatioFamily orders by (carrier, modulator).
    candidates.sort_by_key(|fm| (fm.family, fm.ratio));
    candidates
}

/// Result of stages 2 and 3.
#[derive(Debug, Clone, Default)]
pub struct Representatives {
    /// Every family representative that made it into the menu, in order.
    pub emitted: Vec<HarmonicFm>,
    /// Emitted ratios other than 1/1, used by the subset check and ?⁻¹.
    pub retained: Vec<Ratio>,
}

/// Stages 2 and 3: family dedup and sideband-subset rejection.
pub fn select_representatives(candidates: &[HarmonicFm]) -> Representatives {
    let mut seen_families = BTreeSet::new();
    let mut selection = Representatives::default();

    for candidate in candidates {
        if !seen_families.insert(candidate.family) {
            continue;
        }
        if let Some(superset) = selection
            .retained
            .iter()
            .find(|kept| kept.is_multiple_of(candidate.ratio))
        {
            debug!(
                ratio = %candidate.ratio,
                superset = %superset,
                "sidebands covered by an earlier ratio"
            );
            continue;
        }
        if !candidate.ratio.is_one() {
            selection.retained.push(candidate.ratio);
        }
        selection.emitted.push(*candidate);
    }
    selection
}

fn is_tenths(value: f64) -> bool {
    let scaled = value * 10.0;
    (scaled - scaled.round()).abs() < 1e-9
}

/// Stage 4: inharmonic partners of the retained ratios, latest first.
pub fn inharmonic_ratios(retained: &[Ratio]) -> Vec<FmRatio> {
    let mut ratios = Vec::new();
    for &cm in retained.iter().rev() {
        let partner = inverse_question_mark(cm.value());
        if is_tenths(partner) {
            debug!(ratio = %cm, partner, "?⁻¹ is still a simple ratio");
            continue;
        }
        ratios.push(FmRatio {
            name: format!(
                "?{} FM 1/?-1({}/{})",
                ratios.len() + 1,
                cm.numerator(),
                cm.denominator()
            ),
            modulator_ratio: 1.0 / partner,
        });
    }
    ratios
}

/// Multiples and fractions of pi.
pub fn transcendental_ratios() -> Vec<FmRatio> {
    let pi = char::from(PI_GLYPH);
    [
        (format!("{pi}4 FM {pi}/4"), PI / 4.0),
        (format!("{pi}3 FM {pi}/3"), PI / 3.0),
        (format!("{pi}2 FM {pi}/2"), PI / 2.0),
        (format!(" {pi} FM {pi}*1"), PI),
        (format!("2{pi} FM {pi}*2"), PI * 2.0),
        (format!("3{pi} FM {pi}*3"), PI * 3.0),
        (format!("3{pi} FM {pi}*3/2"), PI * 3.0 / 2.0),
    ]
    .into_iter()
    .map(|(name, modulator_ratio)| FmRatio {
        name,
        modulator_ratio,
    })
    .collect()
}

/// The complete ratio menu.
#[derive(Debug, Clone)]
pub struct FmCatalog {
    pub representatives: Representatives,
    pub entries: Vec<FmRatio>,
}

impl FmCatalog {
    pub fn build(max_term: u32) -> Self {
        let candidates = harmonic_candidates(max_term);
        let representatives = select_representatives(&candidates);

        let mut entries: Vec<FmRatio> = representatives
            .emitted
            .iter()
            .map(|fm| {
                let mc = fm.ratio.recip();
                FmRatio {
                    name: format!(
                        "{}{} FM {}/{}",
                        mc.numerator(),
                        mc.denominator(),
                        mc.numerator(),
                        mc.denominator()
                    ),
                    modulator_ratio: mc.value(),
                }
            })
            .collect();
        let harmonic_count = entries.len();
        entries.extend(inharmonic_ratios(&representatives.retained));
        let inharmonic_count = entries.len() - harmonic_count;
        entries.extend(transcendental_ratios());

        info!(
            harmonic = harmonic_count,
            inharmonic = inharmonic_count,
            total = entries.len(),
            "built FM ratio catalog"
        );
        FmCatalog {
            representatives,
            entries,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn modulator_intervals(&self) -> Vec<f64> {
        self.entries
            .iter()
            .map(|e| modulator_interval(e.modulator_ratio))
            .collect()
    }

    pub fn index_upshifts(&self, base: f64) -> Vec<f64> {
        self.entries
            .iter()
            .map(|e| index_upshift(e.modulator_ratio, base))
            .collect()
    }

    /// `fm_ratio_names`, `fm_modulator_intervals`, `fm_index_2x_upshifts`.
    pub fn tables(&self, params: &FmParams) -> Result<Vec<LookupTable>> {
        Ok(vec![
            LookupTable::strings("fm_ratio_names", self.names()),
            LookupTable::truncated(
                "fm_modulator_intervals",
                TableWidth::I16,
                self.modulator_intervals(),
            )?,
            LookupTable::truncated(
                "fm_index_2x_upshifts",
                TableWidth::I8,
                self.index_upshifts(params.index_scaling_base),
            )?,
        ])
    }
}

pub fn fm_tables(params: &FmParams) -> Result<Vec<LookupTable>> {
    FmCatalog::build(params.max_term).tables(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FmCatalog {
        FmCatalog::build(9)
    }

    #[test]
    fn test_interval_of_two_to_one() {
        let interval = carrier_modulator_interval(Ratio::new(2, 1));
        assert!((interval - 128.0 * 12.0 * 0.5f64.log2()).abs() < 1e-6);
        assert!((interval + 1536.0).abs() < 1e-6);
    }

    #[test]
    fn test_one_representative_per_family() {
        let emitted = &catalog().representatives.emitted;
        let families: BTreeSet<_> = emitted.iter().map(|fm| fm.family).collect();
        assert_eq!(families.len(), emitted.len());
    }

    // Only this direction holds. A later survivor may still be a multiple of
    // an earlier one (1/5 then 2/5, 2/9 then 4/9), so the symmetric check
    // would fail on the shipped menu.
    #[test]
    fn test_no_survivor_is_multiple_of_later_one() {
        let retained = &catalog().representatives.retained;
        for (i, earlier) in retained.iter().enumerate() {
            for later in &retained[i + 1..] {
                assert!(!earlier.is_multiple_of(*later), "{earlier} covers {later}");
            }
        }
    }

    #[test]
    fn test_subset_rule_drops_submultiples() {
        let retained = &catalog().representatives.retained;
        assert!(retained.contains(&Ratio::new(1, 2)));
        for dropped in [(1, 4), (1, 6), (1, 8), (1, 9)] {
            assert!(!retained.contains(&Ratio::new(dropped.0, dropped.1)));
        }
    }

    #[test]
    fn test_harmonic_menu() {
        let names: Vec<_> = catalog().names().take(11).map(String::from).collect();
        assert_eq!(
            names,
            [
                "11 FM 1/1", "21 FM 2/1", "31 FM 3/1", "51 FM 5/1", "71 FM 7/1", "52 FM 5/2",
                "72 FM 7/2", "92 FM 9/2", "73 FM 7/3", "83 FM 8/3", "94 FM 9/4",
            ]
        );
    }

    #[test]
    fn test_inharmonic_partners() {
        let catalog = catalog();
        let inharmonic: Vec<_> = catalog.entries[11..19].iter().collect();
        assert_eq!(inharmonic[0].name, "?1 FM 1/?-1(4/9)");
        assert_eq!(inharmonic[7].name, "?8 FM 1/?-1(1/3)");
        // 1/?⁻¹(1/3) = 1/(φ - 1) = φ + 1
        assert!((inharmonic[7].modulator_ratio - 2.618_034).abs() < 1e-5);
        // 3/8 and 1/2 map to 0.4 and 0.5 and are skipped.
        assert!(catalog.names().all(|n| !n.contains("(3/8)") && !n.contains("(1/2)")));
    }

    #[test]
    fn test_catalog_size_and_pi_tail() {
        let catalog = catalog();
        assert_eq!(catalog.entries.len(), 26);
        let last = catalog.entries.last().unwrap();
        assert!((last.modulator_ratio - 1.5 * PI).abs() < 1e-12);
        assert_eq!(last.name.chars().nth(1), Some('\u{C1}'));
    }

    #[test]
    fn test_tables() {
        let tables = catalog().tables(&FmParams::default()).unwrap();
        let intervals = tables[1].integers_slice().unwrap();
        let upshifts = tables[2].integers_slice().unwrap();
        assert_eq!(tables[0].len(), intervals.len());
        assert_eq!(&intervals[..4], &[0, 1536, 2434, 3566]);
        assert_eq!(intervals[19], -535);
        assert_eq!(&upshifts[..4], &[11, 9, 7, 6]);
    }

    #[test]
    fn test_negative_scaling_base_is_an_error() {
        let params = FmParams {
            index_scaling_base: -40.0,
            ..FmParams::default()
        };
        assert!(matches!(
            catalog().tables(&params),
            Err(crate::error::TableError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn test_tenths_detection() {
        assert!(is_tenths(0.4));
        assert!(is_tenths(0.5));
        assert!(!is_tenths(2f64.sqrt() - 1.0));
    }
}
