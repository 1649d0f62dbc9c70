// Increment and curve tables.
//
// These are the tables the firmware uses to avoid transcendental math at
// run time: phase increments for LFOs, portamento and envelope stages
// (exponentially or power-law spaced so that a 7-bit knob covers the useful
// range), the exponential envelope shape with its piecewise shift
// approximation, oscillator increments for the top octave, and the
// Chamberlin state-variable filter coefficients.
//
// Values are computed in f64 and truncated toward zero, like a numpy
// `astype(int)`.

use std::f64::consts::PI;

use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{Result, TableError};
use crate::table::{LookupTable, TableWidth};

/// Shortest portamento, in refresh periods. Just over one period so the
/// increment never exceeds the full excursion.
const MIN_PORTAMENTO_PERIODS: f64 = 1.001;

/// `num` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    if num < 2 {
        return vec![start; num];
    }
    let step = (stop - start) / (num - 1) as f64;
    let mut values: Vec<f64> = (0..num).map(|i| i as f64 * step + start).collect();
    if let Some(last) = values.last_mut() {
        *last = stop;
    }
    values
}

/// Power-law spacing between two increments: evenly spaced in
/// `increment^-gamma`, which spreads durations more evenly than a log scale.
fn power_law_increments(fastest: f64, slowest: f64, gamma: f64, num: usize) -> Vec<f64> {
    linspace(fastest.powf(-gamma), slowest.powf(-gamma), num)
        .into_iter()
        .map(|r| r.powf(-1.0 / gamma))
        .collect()
}

fn expo_curve(linear: f64) -> f64 {
    1.0 - (-4.0 * linear).exp()
}

pub fn lfo_increments(config: &GeneratorConfig) -> Result<LookupTable> {
    let rates = &config.rates;
    let lfo = &config.lfo;
    let min_increment = rates.excursion * lfo.min_frequency / rates.refresh_rate;
    let max_increment = rates.excursion * lfo.max_frequency / rates.refresh_rate;
    let values = linspace(min_increment.ln(), max_increment.ln(), lfo.num_values)
        .into_iter()
        .map(f64::exp);
    LookupTable::truncated("lfo_increments", TableWidth::U32, values)
}

pub fn portamento_increments(config: &GeneratorConfig) -> Result<LookupTable> {
    let rates = &config.rates;
    let portamento = &config.portamento;
    let min_time = MIN_PORTAMENTO_PERIODS / rates.refresh_rate;
    let slowest = rates.excursion / (portamento.max_time * rates.refresh_rate);
    let fastest = rates.excursion / (min_time * rates.refresh_rate);
    LookupTable::truncated(
        "portamento_increments",
        TableWidth::U32,
        power_law_increments(fastest, slowest, portamento.gamma, portamento.num_values),
    )
}

/// `env_expo`: the attack/decay shape, 16-bit, with one guard entry.
pub fn env_expo(config: &GeneratorConfig) -> Result<LookupTable> {
    let steps = config.envelope.expo_steps;
    let mut linear: Vec<f64> = (0..=steps).map(|i| i as f64 / steps as f64).collect();
    // The guard entry repeats the last phase so interpolation stops flat.
    linear[steps] = linear[steps - 1];
    let curve: Vec<f64> = linear.into_iter().map(expo_curve).collect();
    let peak = curve.iter().copied().fold(f64::MIN, f64::max);
    LookupTable::truncated(
        "env_expo",
        TableWidth::U16,
        curve.into_iter().map(|v| v / peak * 65535.0),
    )
}

/// Per-segment power-of-two slopes approximating the expo curve.
///
/// The envelope integrates `2^shift` per sample within each of the equal
/// time segments. Each slope aims halfway between the ideal local slope and
/// the slope that would land exactly on the curve, which keeps the
/// accumulated error from drifting. Shifts must never increase.
pub fn expo_slope_shifts(segments: usize) -> Result<Vec<i32>> {
    let samples: Vec<f64> = (1..=segments)
        .map(|i| expo_curve(i as f64 / segments as f64))
        .collect();
    let peak = samples.iter().copied().fold(f64::MIN, f64::max);
    let ideal: Vec<f64> = samples.into_iter().map(|v| v / peak).collect();

    let dx = 1.0 / segments as f64;
    let mut actual = 0.0;
    let mut shifts: Vec<i32> = Vec::with_capacity(segments);
    let mut total_error = 0.0;

    for (index, &target) in ideal.iter().enumerate() {
        let previous_target = if index == 0 { 0.0 } else { ideal[index - 1] };
        let dy_ideal = target - previous_target;
        let dy_actual = target - actual;
        let slope = (dy_ideal + dy_actual) / 2.0 / dx;
        let power = if slope > 0.0 {
            slope.log2()
        } else {
            f64::NEG_INFINITY
        };
        let shift = power.round().max(-32.0) as i32;
        actual += 2f64.powi(shift) * dx;

        let error = 100.0 * (actual - target) / target;
        total_error += error.abs();
        debug!(index, shift, error_pct = error, "expo slope segment");

        if let Some(&previous) = shifts.last().filter(|&&previous| shift > previous) {
            return Err(TableError::NonMonotonicShift {
                index,
                shift,
                previous,
            });
        }
        shifts.push(shift);
    }

    info!(
        mean_abs_error_pct = total_error / segments as f64,
        "expo slope shifts"
    );
    Ok(shifts)
}

pub fn expo_slope_shift(config: &GeneratorConfig) -> Result<LookupTable> {
    let shifts = expo_slope_shifts(config.envelope.shift_segments)?;
    LookupTable::integers(
        "expo_slope_shift",
        TableWidth::I8,
        shifts.into_iter().map(i64::from),
    )
}

pub fn envelope_phase_increments(config: &GeneratorConfig) -> Result<LookupTable> {
    let rates = &config.rates;
    let envelope = &config.envelope;
    let max_samples = envelope.max_time * rates.audio_rate;
    let slowest = rates.excursion / max_samples;
    let fastest = rates.excursion / envelope.min_samples;
    let mut values =
        power_law_increments(fastest, slowest, envelope.gamma, envelope.num_durations);
    // Guard entry for the interpolating lookup.
    if let Some(&last) = values.last() {
        values.push(last);
    }
    LookupTable::truncated("envelope_phase_increments", TableWidth::U32, values)
}

/// Increments for the top octave in 1/8 semitone steps; lower octaves are
/// derived by shifting.
pub fn oscillator_increments(config: &GeneratorConfig) -> Result<LookupTable> {
    let rates = &config.rates;
    let pitch = &config.pitch;
    let first = pitch.highest_octave * 128.0;
    let values = (0..=96).map(|i| {
        let note = first + 16.0 * i as f64;
        let frequency = pitch.a4_frequency * 2f64.powf((note - pitch.a4_midi * 128.0) / 1536.0);
        rates.excursion / rates.audio_rate * frequency
    });
    LookupTable::truncated("oscillator_increments", TableWidth::U32, values)
}

/// `svf_cutoff`, `svf_damp`, `svf_scale`, one entry per MIDI note /
/// resonance step.
pub fn svf_tables(config: &GeneratorConfig) -> Result<Vec<LookupTable>> {
    let svf = &config.svf;
    let pitch = &config.pitch;
    let mut cutoff = Vec::with_capacity(svf.steps + 1);
    let mut damp = Vec::with_capacity(svf.steps + 1);
    let mut scale = Vec::with_capacity(svf.steps + 1);

    for i in 0..=svf.steps {
        let frequency = pitch.a4_frequency * 2f64.powf((i as f64 - pitch.a4_midi) / 12.0);
        let normalized = (frequency / config.rates.audio_rate).min(svf.max_normalized_cutoff);
        let f = 2.0 * (PI * normalized).sin();
        let resonance = i as f64 / svf.resonance_span;
        let d = (2.0 * (1.0 - resonance.powf(0.25))).min(2.0f64.min(2.0 / f - f * 0.5));
        cutoff.push(f * 32767.0);
        damp.push(d * 32767.0);
        scale.push((d / 2.0).sqrt() * 32767.0);
    }

    Ok(vec![
        LookupTable::truncated("svf_cutoff", TableWidth::U16, cutoff)?,
        LookupTable::truncated("svf_damp", TableWidth::U16, damp)?,
        LookupTable::truncated("svf_scale", TableWidth::U16, scale)?,
    ])
}

/// The increment and envelope tables, in resource order.
pub fn curve_tables(config: &GeneratorConfig) -> Result<Vec<LookupTable>> {
    Ok(vec![
        lfo_increments(config)?,
        portamento_increments(config)?,
        env_expo(config)?,
        expo_slope_shift(config)?,
        envelope_phase_increments(config)?,
        oscillator_increments(config)?,
    ])
}
