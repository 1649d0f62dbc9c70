// Clock multiplication/division ratios.
//
// A ratio r plays r steps per beat, so each step lasts ticks_per_beat / r
// ticks of the 24 PPQN clock. Only ratios with a whole number of ticks are
// offered, down to the slowest configured ratio.

use tracing::{debug, info};

use crate::config::ClockParams;
use crate::error::Result;
use crate::ratio::Ratio;
use crate::table::{LookupTable, TableWidth};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockRatio {
    pub ratio: Ratio,
    pub ticks: u64,
}

impl ClockRatio {
    /// Two display characters, then the fraction.
    pub fn name(&self) -> String {
        let (n, d) = (self.ratio.numerator(), self.ratio.denominator());
        format!("{n}{d} {n}/{d}")
    }
}

pub fn clock_ratios(params: &ClockParams) -> Vec<ClockRatio> {
    let (slow_n, slow_d) = params.slowest_ratio;
    let slowest = Ratio::new(slow_n, slow_d);
    Ratio::all_up_to(params.max_term)
        .into_iter()
        .filter_map(|ratio| {
            // ticks_per_beat * d / n
            let scaled = u64::from(params.ticks_per_beat) * u64::from(ratio.denominator());
            let numerator = u64::from(ratio.numerator());
            if scaled % numerator != 0 {
                debug!(%ratio, "skipping non-integer clock ratio");
                return None;
            }
            if ratio < slowest {
                debug!(%ratio, "skipping very slow clock ratio");
                return None;
            }
            Some(ClockRatio {
                ratio,
                ticks: scaled / numerator,
            })
        })
        .collect()
}

/// `clock_ratio_ticks` and `clock_ratio_names`.
pub fn clock_tables(params: &ClockParams) -> Result<Vec<LookupTable>> {
    let ratios = clock_ratios(params);
    info!(count = ratios.len(), "built clock ratios");
    Ok(vec![
        LookupTable::integers(
            "clock_ratio_ticks",
            TableWidth::U16,
            ratios.iter().map(|r| i64::try_from(r.ticks).unwrap_or(i64::MAX)),
        )?,
        LookupTable::strings("clock_ratio_names", ratios.iter().map(ClockRatio::name)),
    ])
}
