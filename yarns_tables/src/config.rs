// Generator configuration.
//
// Every tunable that shapes a table lives in `GeneratorConfig`. The defaults
// are the constants the firmware was built against; `Default` reproduces the
// shipped resources exactly. A JSON file can override any subset of fields
// (every group is `#[serde(default)]`), which is how alternative clock rates
// or curve ranges get tried without touching the code.
//
// Parameters are grouped by the table family that reads them:
// `RateParams` (shared sample rates), `LfoParams`, `PortamentoParams`,
// `EnvelopeParams`, `PitchParams`, `FmParams`, `ClockParams`, `SvfParams`.
//
// Fixed-size layouts the firmware indexes directly (the 32x32 Euclidean
// table, the 256-glyph font, 12-key scales) are not configurable.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Clock ticks per step are stored as u16.
const MAX_TICKS_PER_BEAT: u32 = u16::MAX as u32;

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Rates shared by all increment tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateParams {
    /// Control-rate refresh frequency in Hz (LFO and portamento updates).
    pub refresh_rate: f64,
    /// Audio/envelope sample rate in Hz.
    pub audio_rate: f64,
    /// Full-scale phase excursion of a phase accumulator (2^32).
    pub excursion: f64,
}

impl Default for RateParams {
    fn default() -> Self {
        Self {
            refresh_rate: 4000.0,
            audio_rate: 45000.0,
            excursion: 4_294_967_296.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LfoParams {
    /// Slowest LFO rate in Hz.
    pub min_frequency: f64,
    /// Fastest LFO rate in Hz.
    pub max_frequency: f64,
    pub num_values: usize,
}

impl Default for LfoParams {
    fn default() -> Self {
        Self {
            min_frequency: 1.0 / 8.0,
            max_frequency: 16.0,
            num_values: 64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortamentoParams {
    pub num_values: usize,
    /// Longest glide in seconds.
    pub max_time: f64,
    /// Power-law spacing exponent.
    pub gamma: f64,
}

impl Default for PortamentoParams {
    fn default() -> Self {
        Self {
            num_values: 64,
            max_time: 5.0,
            gamma: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeParams {
    /// Number of phase steps in `env_expo` (the table holds one extra entry).
    pub expo_steps: usize,
    /// Number of piecewise-linear segments in `expo_slope_shift`.
    pub shift_segments: usize,
    /// Number of stage durations in `envelope_phase_increments`.
    pub num_durations: usize,
    /// Shortest stage in samples.
    pub min_samples: f64,
    /// Longest stage in seconds.
    pub max_time: f64,
    pub gamma: f64,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            expo_steps: 256,
            shift_segments: 16,
            num_durations: 128,
            min_samples: 4.0,
            max_time: 10.0,
            gamma: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchParams {
    pub a4_midi: f64,
    pub a4_frequency: f64,
    /// Lowest MIDI note of the octave stored in `oscillator_increments`.
    pub highest_octave: f64,
}

impl Default for PitchParams {
    fn default() -> Self {
        Self {
            a4_midi: 69.0,
            a4_frequency: 440.0,
            highest_octave: 116.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FmParams {
    /// Largest carrier and modulator term searched for harmonic ratios.
    pub max_term: u32,
    /// Reference ratio for the FM index upshift table.
    pub index_scaling_base: f64,
}

impl Default for FmParams {
    fn default() -> Self {
        Self {
            max_term: 9,
            index_scaling_base: 40.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockParams {
    /// Largest numerator and denominator searched for clock ratios.
    pub max_term: u32,
    /// MIDI clock ticks per quarter note.
    pub ticks_per_beat: u32,
    /// Slowest ratio kept, as (numerator, denominator).
    pub slowest_ratio: (u32, u32),
}

impl Default for ClockParams {
    fn default() -> Self {
        Self {
            max_term: 9,
            ticks_per_beat: 24,
            slowest_ratio: (1, 8),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvfParams {
    /// Number of cutoff/resonance steps (the table holds one extra entry).
    pub steps: usize,
    /// Highest normalised cutoff frequency before clamping.
    pub max_normalized_cutoff: f64,
    /// Resonance divisor: resonance = step / resonance_span.
    pub resonance_span: f64,
}

impl Default for SvfParams {
    fn default() -> Self {
        Self {
            steps: 256,
            max_normalized_cutoff: 1.0 / 8.0,
            resonance_span: 260.0,
        }
    }
}

/// Complete parameter set for a generation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub rates: RateParams,
    pub lfo: LfoParams,
    pub portamento: PortamentoParams,
    pub envelope: EnvelopeParams,
    pub pitch: PitchParams,
    pub fm: FmParams,
    pub clock: ClockParams,
    pub svf: SvfParams,
}

impl GeneratorConfig {
    /// Parse a (possibly partial) configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations that would produce empty or degenerate
    /// tables.
    pub fn validate(&self) -> Result<()> {
        if self.rates.refresh_rate <= 0.0 || self.rates.audio_rate <= 0.0 {
            return Err(TableError::Config("sample rates must be positive".into()));
        }
        if !is_positive(self.rates.excursion) {
            return Err(TableError::Config("phase excursion must be positive".into()));
        }
        if !is_positive(self.portamento.max_time)
            || !is_positive(self.envelope.max_time)
            || !is_positive(self.envelope.min_samples)
        {
            return Err(TableError::Config("durations must be positive".into()));
        }
        if !is_positive(self.fm.index_scaling_base) {
            return Err(TableError::Config("FM index scaling base must be positive".into()));
        }
        if self.lfo.num_values < 2 || self.portamento.num_values < 2 {
            return Err(TableError::Config(
                "increment tables need at least 2 values".into(),
            ));
        }
        if self.lfo.min_frequency <= 0.0 || self.lfo.min_frequency >= self.lfo.max_frequency {
            return Err(TableError::Config(format!(
                "LFO range {}..{} Hz is empty",
                self.lfo.min_frequency, self.lfo.max_frequency
            )));
        }
        if self.envelope.expo_steps < 2
            || self.envelope.shift_segments == 0
            || self.envelope.num_durations < 2
        {
            return Err(TableError::Config("envelope tables are too small".into()));
        }
        if self.fm.max_term == 0 || self.clock.max_term == 0 {
            return Err(TableError::Config("ratio search bound must be at least 1".into()));
        }
        let (slow_n, slow_d) = self.clock.slowest_ratio;
        if slow_n == 0 || slow_d == 0 || self.clock.ticks_per_beat == 0 {
            return Err(TableError::Config("clock parameters must be non-zero".into()));
        }
        if self.clock.ticks_per_beat > MAX_TICKS_PER_BEAT {
            return Err(TableError::Config(format!(
                "ticks per beat {} exceeds {MAX_TICKS_PER_BEAT}",
                self.clock.ticks_per_beat
            )));
        }
        if self.portamento.gamma <= 0.0 || self.envelope.gamma <= 0.0 {
            return Err(TableError::Config("power-law gamma must be positive".into()));
        }
        if self.svf.steps == 0 || self.svf.resonance_span <= 0.0 {
            return Err(TableError::Config("SVF parameters must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        GeneratorConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_override() {
        let config =
            GeneratorConfig::from_json(r#"{ "rates": { "audio_rate": 48000.0 } }"#).unwrap();
        assert_eq!(config.rates.audio_rate, 48000.0);
        assert_eq!(config.rates.refresh_rate, 4000.0);
        assert_eq!(config.fm, FmParams::default());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = GeneratorConfig::from_json(r#"{ "lfo": { "min_frequency": 32.0 } }"#);
        assert!(matches!(result, Err(TableError::Config(_))));
    }

    #[test]
    fn test_non_positive_scales_rejected() {
        for json in [
            r#"{ "rates": { "excursion": -1.0 } }"#,
            r#"{ "fm": { "index_scaling_base": -40.0 } }"#,
            r#"{ "portamento": { "max_time": 0.0 } }"#,
            r#"{ "envelope": { "min_samples": 0.0 } }"#,
            r#"{ "envelope": { "max_time": -10.0 } }"#,
        ] {
            let result = GeneratorConfig::from_json(json);
            assert!(matches!(result, Err(TableError::Config(_))), "{json}");
        }
    }

    #[test]
    fn test_huge_tick_count_rejected() {
        let result = GeneratorConfig::from_json(r#"{ "clock": { "ticks_per_beat": 1000000000 } }"#);
        assert!(matches!(result, Err(TableError::Config(_))));
    }

    #[test]
    fn test_roundtrip_through_json() {
        let config = GeneratorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GeneratorConfig::from_json(&json).unwrap(), config);
    }
}
