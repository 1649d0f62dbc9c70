// Euclidean rhythm bitmasks.
//
// A Euclidean rhythm spreads k onsets over n steps as evenly as possible.
// The patterns are built with Bjorklund's grouping procedure: start with k
// one-step onset groups and n-k one-step rest groups, then repeatedly
// append trailing groups onto leading ones until nothing is left to pair.
// Reading the groups front to back gives the steps, first step in the LSB.
//
// The firmware's sequencer looks patterns up in a flat 32x32 table of u32
// masks: row `steps - 1`, column `onsets` (clamped to `steps`).

use crate::error::{Result, TableError};
use crate::table::{LookupTable, TableWidth};

/// Longest supported pattern; one bit per step in a u32.
pub const MAX_STEPS: u32 = 32;

/// Build the n-step mask with k onsets.
pub fn euclidean_pattern(onsets: u32, steps: u32) -> Result<u32> {
    if steps == 0 || steps > MAX_STEPS || onsets > steps {
        return Err(TableError::InvalidRhythm { onsets, steps });
    }

    let mut k = onsets as usize;
    let mut groups: Vec<Vec<bool>> = (0..steps as usize).map(|i| vec![i < k]).collect();

    while k > 0 {
        let cut = k.min(groups.len() - k);
        let mut tail = groups.split_off(k);
        let rest = tail.split_off(cut);
        for (group, appended) in groups.iter_mut().zip(tail) {
            group.extend(appended);
        }
        // Unpaired leading groups stay after the merged ones.
        let unpaired = groups.split_off(cut);
        groups.extend(unpaired);
        groups.extend(rest);
        k = cut;
    }

    Ok(groups
        .into_iter()
        .flatten()
        .enumerate()
        .filter(|&(_, onset)| onset)
        .fold(0u32, |mask, (step, _)| mask | (1 << step)))
}

/// Position of (onsets, steps) in the flat table. `steps` must be in
/// `1..=MAX_STEPS`.
pub fn table_index(onsets: u32, steps: u32) -> usize {
    debug_assert!(
        (1..=MAX_STEPS).contains(&steps),
        "step count {steps} outside 1..={MAX_STEPS}"
    );
    ((steps - 1) * MAX_STEPS + onsets.min(steps)) as usize
}

/// Every pattern for 1..=32 steps and 0..32 onsets, in table order.
pub fn euclidean_masks() -> Result<Vec<u32>> {
    let mut masks = Vec::with_capacity((MAX_STEPS * MAX_STEPS) as usize);
    for steps in 1..=MAX_STEPS {
        for onsets in 0..MAX_STEPS {
            masks.push(euclidean_pattern(onsets.min(steps), steps)?);
        }
    }
    Ok(masks)
}

pub fn euclidean_table() -> Result<LookupTable> {
    let masks = euclidean_masks()?;
    LookupTable::integers("euclidean", TableWidth::U32, masks.into_iter().map(i64::from))
}
