// Microtonal scales: shrutis, raga layout and pitch corrections.
//
// Indian classical music divides the octave into 22 shrutis. Each shruti has
// a just-intonation ratio and several spellings: two reference notations,
// the common swara name (s, r1..r4, g1..g4, m1..m4, p, d1..d4, n1..n4) and a
// Western name ("pE" is the Pythagorean E, "?" where there is none). A scale is
// stored in the firmware as 12 signed corrections, one per keyboard key, in
// 1/128 semitone relative to equal temperament.
//
// A raga names a subset of swaras. `layout_raga` places each swara on its
// recommended key (after the Melakarta keyboard chart) and fills the keys
// the raga does not use. Silenced keys (`!`) replay the pitch of the key
// below them; corrections over +127 mean "mute this key" and are stored as
// 32767.
//
// Scale presets are emitted in firmware menu order as `scale_<name>` tables.

use tracing::debug;

use crate::error::{Result, TableError};
use crate::table::{LookupTable, TableWidth};

/// Keys per octave.
pub const KEYS: usize = 12;

/// Stored correction for a muted key.
pub const MUTE: i16 = 32767;

/// Largest correction that is still played.
pub const MAX_CORRECTION: i64 = 127;

/// Note name marking a silenced key.
pub const SILENCE: &str = "!";

/// One of the 22 shrutis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shruti {
    pub reference: &'static str,
    pub syllable: &'static str,
    pub swara: &'static str,
    pub western: &'static str,
    pub ratio: f64,
}

impl Shruti {
    fn spellings(&self) -> impl Iterator<Item = &'static str> {
        [self.reference, self.syllable, self.swara, self.western].into_iter()
    }
}

const fn shruti(
    reference: &'static str,
    syllable: &'static str,
    swara: &'static str,
    western: &'static str,
    ratio: f64,
) -> Shruti {
    Shruti {
        reference,
        syllable,
        swara,
        western,
        ratio,
    }
}

/// The 22 shrutis in ascending pitch order.
pub const SHRUTIS: [Shruti; 22] = [
    shruti("S", "sa", "s", "C", 1.0),
    shruti("r1", "ra", "r1", "pC#", 256.0 / 243.0),
    shruti("r2", "ri", "r2", "C#", 16.0 / 15.0),
    shruti("R1", "ru", "r3", "?", 10.0 / 9.0),
    shruti("R2", "re", "r4", "D", 9.0 / 8.0),
    shruti("g1", "ga", "g1", "pD#", 32.0 / 27.0),
    shruti("g2", "gi", "g2", "D#", 6.0 / 5.0),
    shruti("G1", "gu", "g3", "E", 5.0 / 4.0),
    shruti("G2", "ge", "g4", "pE", 81.0 / 64.0),
    shruti("m1", "ma", "m1", "F", 4.0 / 3.0),
    shruti("m2", "mi", "m2", "?", 27.0 / 20.0),
    shruti("M1", "mu", "m3", "F#", 45.0 / 32.0),
    shruti("M2", "me", "m4", "pF#", 729.0 / 512.0),
    shruti("P", "pa", "p", "G", 3.0 / 2.0),
    shruti("d1", "dha", "d1", "pG#", 128.0 / 81.0),
    shruti("d2", "dhi", "d2", "G#", 8.0 / 5.0),
    shruti("D1", "dhu", "d3", "A", 5.0 / 3.0),
    shruti("D2", "dhe", "d4", "pA", 27.0 / 16.0),
    shruti("n1", "na", "n1", "A#", 16.0 / 9.0),
    shruti("n2", "ni", "n2", "?", 9.0 / 5.0),
    shruti("N1", "nu", "n3", "B", 15.0 / 8.0),
    shruti("N2", "ne", "n4", "pB", 243.0 / 128.0),
];

/// Recommended key for each swara, in shruti order. When a key has several
/// candidates, this order is also the fallback preference.
pub const RECOMMENDED_KEYS: [(&str, usize); 22] = [
    ("s", 0),
    ("r1", 1),
    ("r2", 1),
    ("r3", 2),
    ("r4", 2),
    ("g1", 3),
    ("g2", 3),
    ("g3", 4),
    ("g4", 4),
    ("m1", 5),
    ("m2", 6),
    ("m3", 6),
    ("m4", 6),
    ("p", 7),
    ("d1", 8),
    ("d2", 8),
    ("d3", 9),
    ("d4", 9),
    ("n1", 10),
    ("n2", 10),
    ("n3", 11),
    ("n4", 11),
];

/// Just-intonation ratio for a note name in any notation. `None` for
/// unknown names and for the silence marker.
pub fn shruti_ratio(name: &str) -> Option<f64> {
    // Later spellings win, as with a dictionary filled in shruti order.
    SHRUTIS
        .iter()
        .rev()
        .find(|s| s.spellings().any(|spelling| spelling == name))
        .map(|s| s.ratio)
}

fn recommended_key(swara: &str) -> Option<(&'static str, usize)> {
    RECOMMENDED_KEYS
        .iter()
        .copied()
        .find(|&(name, _)| name == swara)
}

fn candidates_for(key: usize) -> impl Iterator<Item = &'static str> {
    RECOMMENDED_KEYS
        .iter()
        .filter(move |&&(_, k)| k == key)
        .map(|&(name, _)| name)
}

/// Expand a 22-column shruti chart (`-` = unused) into a space-separated
/// swara list.
pub fn decode_shruti_chart(chart: &str) -> String {
    chart
        .chars()
        .zip(RECOMMENDED_KEYS.iter())
        .filter(|&(c, _)| c != '-')
        .map(|(_, &(swara, _))| swara)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Translate 12 space-separated note names into per-key corrections.
pub fn compute_corrections(scale: &str) -> Result<[i16; KEYS]> {
    let names: Vec<&str> = scale.split_whitespace().collect();
    if names.len() != KEYS {
        return Err(TableError::ScaleLength(names.len()));
    }

    let mut ratios = [None; KEYS];
    for (slot, &name) in ratios.iter_mut().zip(&names) {
        if name != SILENCE {
            *slot = Some(shruti_ratio(name).ok_or_else(|| TableError::UnknownSwara(name.into()))?);
        }
    }

    let mut corrections = [0i16; KEYS];
    for (key, correction) in corrections.iter_mut().enumerate() {
        // A silenced key replays the nearest sounding key below it, wrapping
        // around the octave.
        let ratio = (0..KEYS)
            .find_map(|back| ratios[(key + KEYS - back) % KEYS])
            .ok_or(TableError::SilentScale)?;
        let equal_tempered = 2f64.powf(key as f64 / KEYS as f64);
        let shift = ((ratio / equal_tempered).log2() * 12.0 * 128.0).round_ties_even() as i64;
        *correction = if shift > MAX_CORRECTION {
            MUTE
        } else {
            shift as i16
        };
    }
    Ok(corrections)
}

/// Assign a raga's swaras to keys and fill the remaining keys.
///
/// Returns the 12 key assignments as note names.
pub fn assign_keys(raga: &str, silence_others: bool) -> Result<[&'static str; KEYS]> {
    let raga = raga.to_lowercase();
    let mut mapping: [Option<&'static str>; KEYS] = [None; KEYS];
    for swara in raga.split_whitespace() {
        let (name, key) =
            recommended_key(swara).ok_or_else(|| TableError::UnknownSwara(swara.into()))?;
        mapping[key] = Some(name);
    }

    let mut assigned = [SILENCE; KEYS];
    // Key 0's predecessor is key 11, as placed by the raga (possibly empty).
    let mut previous = mapping[KEYS - 1];
    for (key, (slot, placed)) in assigned.iter_mut().zip(mapping).enumerate() {
        let chosen = match placed {
            Some(swara) => swara,
            None if silence_others => SILENCE,
            None => {
                let previous_letter = previous.and_then(|p| p.chars().next());
                let chosen = candidates_for(key)
                    .find(|c| c.chars().next() != previous_letter)
                    .or_else(|| candidates_for(key).next())
                    .unwrap_or(SILENCE);
                debug!(key, swara = chosen, "filled key outside the raga");
                chosen
            }
        };
        *slot = chosen;
        previous = Some(chosen);
    }
    Ok(assigned)
}

/// Lay out a raga on the keyboard and return its corrections.
pub fn layout_raga(raga: &str, silence_others: bool) -> Result<[i16; KEYS]> {
    let assigned = assign_keys(raga, silence_others)?;
    compute_corrections(&assigned.join(" "))
}

/// How a scale preset is defined.
#[derive(Debug, Clone, Copy)]
enum ScaleSource {
    /// Twelve note names.
    Notes(&'static str),
    /// Fixed corrections.
    Fixed([i16; KEYS]),
    /// A 22-column shruti chart, unused keys silenced.
    Raga(&'static str),
}

const SCALES: &[(&str, ScaleSource)] = &[
    ("pythagorean", ScaleSource::Notes("C pC# D pD# pE F pF# G pG# pA A# pB")),
    ("1/4 eb", ScaleSource::Fixed([0, 0, 0, 0, -64, 0, 0, 0, 0, 0, 0, -64])),
    ("1/4 e", ScaleSource::Fixed([0, 0, 0, 0, -64, 0, 0, 0, 0, 0, 0, 0])),
    ("1/4 ea", ScaleSource::Fixed([0, 0, 0, 0, -64, 0, 0, 0, 0, -64, 0, 0])),
    ("bhairav", ScaleSource::Raga("sr-----g-m---pd-----n-")),
    ("gunakri", ScaleSource::Raga("s-r------m---p-d------")),
    ("marwa", ScaleSource::Raga("s-r----g---m----d---n-")),
    ("shree", ScaleSource::Raga("sr-----g---m-pd-----n-")),
    ("purvi", ScaleSource::Raga("s-r----g---m-p-d----n-")),
    ("bilawal", ScaleSource::Raga("s---r--g-m---p---d--n-")),
    ("yaman", ScaleSource::Raga("s---r---g---mp---d---n")),
    ("kafi", ScaleSource::Raga("s--r-g---m---p--d-n---")),
    ("bhimpalasree", ScaleSource::Raga("s---r-g--m---p---d-n--")),
    ("darbari", ScaleSource::Raga("s---rg---m---pd---n---")),
    ("bageshree", ScaleSource::Raga("s--r-g---m---p--d-n---")),
    ("rageshree", ScaleSource::Raga("s---r--g-m---p--d-n---")),
    ("khamaj", ScaleSource::Raga("s---r--g-m---p---dn--n")),
    ("mi'mal", ScaleSource::Raga("s---rg---m---p--d-n-n-")),
    ("parameshwari", ScaleSource::Raga("sr---g---m------d-n---")),
    ("rangeshwari", ScaleSource::Raga("s---rg---m---p------n-")),
    ("gangeshwari", ScaleSource::Raga("s------g-m---pd---n---")),
    ("kameshwari", ScaleSource::Raga("s---r------m-p--d-n---")),
    ("pa. kafi", ScaleSource::Raga("s---rg---m---p---dn---")),
    ("natbhairav", ScaleSource::Raga("s---r--g-m---pd-----n-")),
    ("m.kauns", ScaleSource::Raga("s---r---gm----d---n---")),
    ("bairagi", ScaleSource::Raga("sr-------m---p----n---")),
    ("b.todi", ScaleSource::Raga("sr---g-------p----n---")),
    ("chandradeep", ScaleSource::Raga("s----g---m---p----n---")),
    ("kaushik todi", ScaleSource::Raga("s----g---m-m--d-------")),
    ("jogeshwari", ScaleSource::Raga("s----g-g-m------d-n---")),
    ("rasia", ScaleSource::Raga("s---r---g---mp---d---n")),
];

/// Every scale preset as a `scale_<name>` table.
pub fn scale_tables() -> Result<Vec<LookupTable>> {
    SCALES
        .iter()
        .map(|&(name, source)| {
            let corrections = match source {
                ScaleSource::Notes(notes) => compute_corrections(notes)?,
                ScaleSource::Fixed(corrections) => corrections,
                ScaleSource::Raga(chart) => layout_raga(&decode_shruti_chart(chart), true)?,
            };
            LookupTable::integers(
                format!("scale_{name}"),
                TableWidth::I16,
                corrections.into_iter().map(i64::from),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pythagorean_scale() {
        let corrections = compute_corrections("C pC# D pD# pE F pF# G pG# pA A# pB").unwrap();
        assert_eq!(corrections, [0, -13, 5, -8, 10, -3, 15, 3, -10, 8, -5, 13]);
        assert!(corrections.iter().all(|c| (-127..=127).contains(c)));
    }

    #[test]
    fn test_decode_chart() {
        assert_eq!(
            decode_shruti_chart("sr-----g-m---pd-----n-"),
            "s r1 g3 m1 p d1 n3"
        );
    }

    #[test]
    fn test_bhairav_layout() {
        let raga = decode_shruti_chart("sr-----g-m---pd-----n-");
        assert_eq!(
            assign_keys(&raga, true).unwrap(),
            ["s", "r1", "!", "!", "g3", "m1", "!", "p", "d1", "!", "!", "n3"]
        );
        assert_eq!(
            layout_raga(&raga, true).unwrap(),
            [0, -13, -141, -269, -18, -3, -131, 3, -10, -138, -266, -15]
        );
    }

    #[test]
    fn test_fill_prefers_new_letter() {
        let raga = decode_shruti_chart("sr-----g-m---pd-----n-");
        // Key 2 follows r1 and only has r candidates, so it falls back to r3.
        // Key 3 follows r3 and takes g1.
        assert_eq!(
            assign_keys(&raga, false).unwrap(),
            ["s", "r1", "r3", "g1", "g3", "m1", "m2", "p", "d1", "d3", "n1", "n3"]
        );
        assert_eq!(
            layout_raga(&raga, false).unwrap(),
            [0, -13, -23, -8, -18, -3, -103, 3, -10, -20, -5, -15]
        );
    }

    #[test]
    fn test_silenced_tonic_is_muted() {
        // Key 0 replays key 11's pitch (an octave-ish above) and is muted.
        let corrections = layout_raga("r1 g3", true).unwrap();
        assert_eq!(corrections[0], MUTE);
        assert_eq!(corrections[1], -13);
        assert_eq!(corrections[11], -914);
    }

    #[test]
    fn test_always_twelve_and_deterministic() {
        for &(_, source) in SCALES {
            if let ScaleSource::Raga(chart) = source {
                let raga = decode_shruti_chart(chart);
                let a = layout_raga(&raga, true).unwrap();
                let b = layout_raga(&raga, true).unwrap();
                assert_eq!(a.len(), KEYS);
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_every_key_assigned() {
        for silence in [false, true] {
            let keys = assign_keys("S R4 G3 M1 P D3 N3", silence).unwrap();
            assert!(keys.iter().all(|k| !k.is_empty()));
            assert_eq!(keys[0], "s");
            assert_eq!(keys[11], "n3");
            let filled = keys.iter().filter(|&&k| k == SILENCE).count();
            assert_eq!(filled, if silence { 5 } else { 0 });
        }
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            layout_raga("s x9", true),
            Err(TableError::UnknownSwara(name)) if name == "x9"
        ));
        assert!(matches!(
            compute_corrections("C D E"),
            Err(TableError::ScaleLength(3))
        ));
        assert!(matches!(
            compute_corrections("! ! ! ! ! ! ! ! ! ! ! !"),
            Err(TableError::SilentScale)
        ));
    }

    #[test]
    fn test_spellings() {
        assert_eq!(shruti_ratio("pa"), Some(1.5));
        assert_eq!(shruti_ratio("P"), Some(1.5));
        assert_eq!(shruti_ratio("G"), Some(1.5));
        assert_eq!(shruti_ratio("d3"), Some(5.0 / 3.0));
        assert_eq!(shruti_ratio(SILENCE), None);
        // Three shrutis have no Western name; the last of them wins.
        assert_eq!(shruti_ratio("?"), Some(9.0 / 5.0));
    }

    #[test]
    fn test_preset_tables() {
        let tables = scale_tables().unwrap();
        assert_eq!(tables.len(), 31);
        assert_eq!(tables[0].name(), "scale_pythagorean");
        assert_eq!(tables[3].integers_slice().unwrap()[9], -64);
        assert!(tables.iter().all(|t| t.len() == KEYS));
    }
}
