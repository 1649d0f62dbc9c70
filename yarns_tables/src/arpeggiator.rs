// Arpeggiator rhythm patterns.
//
// Patterns are written in x0x notation, one character per 16th-note step:
// 'o' plays, '-' rests, anything else (spaces) is ignored. Step i sets bit i
// of the 16-bit mask.

use crate::error::{Result, TableError};
use crate::table::{LookupTable, TableWidth};

pub const PATTERN_STEPS: usize = 16;

pub const PATTERNS: &[&str] = &[
    "oooo oooo oooo oooo",
    "o-o- o-o- o-o- o-o-",
    "o-o- oooo o-o- oooo",
    "o-o- oo-o o-o- oo-o",
    "o-o- o-oo o-o- o-oo",
    "o-o- o-o- oo-o -o-o",
    "o-o- o-o- o--o o-o-",
    "o-o- o--o o-o- o--o",
    "o--o ---- o--o ----",
    "o--o --o- -o-- o--o",
    "o--o --o- -o-- o-o-",
    "o--o --o- o--o --o-",
    "o--o o--- o-o- o-oo",
    "oo-o -oo- oo-o -oo-",
    "oo-o o-o- oo-o o-o-",
    "ooo- ooo- ooo- ooo-",
    "ooo- oo-o o-oo -oo-",
    "ooo- o-o- ooo- o-o-",
    "oooo -oo- oooo -oo-",
    "oooo o-oo -oo- ooo-",
    "o--- o--- o--o -o-o",
    "o--- --oo oooo -oo-",
    "o--- ---- o--- o-oo",
];

/// Convert an x0x pattern to its step mask.
pub fn xox_mask(pattern: &str) -> Result<u16> {
    let mut mask = 0u16;
    let mut steps = 0usize;
    for c in pattern.chars() {
        let hit = match c {
            'o' => true,
            '-' => false,
            _ => continue,
        };
        if hit && steps < PATTERN_STEPS {
            mask |= 1 << steps;
        }
        steps += 1;
    }
    if steps != PATTERN_STEPS {
        return Err(TableError::MalformedPattern {
            pattern: pattern.to_string(),
            steps,
        });
    }
    Ok(mask)
}

pub fn arpeggiator_table() -> Result<LookupTable> {
    let masks = PATTERNS
        .iter()
        .map(|p| xox_mask(p).map(i64::from))
        .collect::<Result<Vec<_>>>()?;
    LookupTable::integers("arpeggiator_patterns", TableWidth::U16, masks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks() {
        assert_eq!(xox_mask("oooo oooo oooo oooo").unwrap(), 0xFFFF);
        assert_eq!(xox_mask("o-o- o-o- o-o- o-o-").unwrap(), 0x5555);
        assert_eq!(xox_mask("o--- ---- o--- o-oo").unwrap(), 53505);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(matches!(
            xox_mask("o-o- o-o-"),
            Err(TableError::MalformedPattern { steps: 8, .. })
        ));
        assert!(matches!(
            xox_mask("oooo oooo oooo oooo o"),
            Err(TableError::MalformedPattern { steps: 17, .. })
        ));
    }

    #[test]
    fn test_table() {
        let table = arpeggiator_table().unwrap();
        assert_eq!(table.len(), 23);
        assert_eq!(table.width(), Some(TableWidth::U16));
        // Every pattern starts on the downbeat.
        assert!(table.integers_slice().unwrap().iter().all(|m| m & 1 == 1));
    }
}
