// Yarns Lookup Table Generator
//
// Precomputes the constant tables the Yarns MIDI interface firmware reads at
// run time: phase increments and envelope curves, rhythm patterns, tuning
// and scale layouts, the FM ratio menu, clock ratios, filter coefficients,
// and the 14-segment display font. Everything is a pure function of a
// `GeneratorConfig`; the same config always yields byte-identical output.
//
// Architecture:
// - table.rs: LookupTable (named, width-checked) and the ordered TableSet
// - config.rs: GeneratorConfig, JSON-overridable rate/pitch/curve parameters
// - curves.rs: LFO/portamento/envelope/oscillator increments, expo shape, SVF
// - arpeggiator.rs: x0x arpeggiator patterns as 16-bit step masks
// - euclidean.rs: Bjorklund rhythms for every (onsets, steps) up to 32
// - consonance.rs: per-interval consonance score over one octave
// - shruti.rs: 22-shruti catalog, raga key assignment, pitch corrections
// - ratio.rs: exact rationals and harmonic FM families
// - minkowski.rs: inverse Minkowski question-mark function
// - fm_ratios.rs: harmonic, inharmonic and pi-based FM ratio menu
// - clock_ratios.rs: clock multiplier/divider ratios with whole tick counts
// - segment_font.rs: 14-segment glyph table for the display
// - emit.rs: JSON and C++ resource output
//
// The `generate` binary runs `generate_all` and writes the resource files.

pub mod arpeggiator;
pub mod clock_ratios;
pub mod config;
pub mod consonance;
pub mod curves;
pub mod emit;
pub mod error;
pub mod euclidean;
pub mod fm_ratios;
pub mod minkowski;
pub mod ratio;
pub mod segment_font;
pub mod shruti;
pub mod table;

use tracing::info;

pub use config::GeneratorConfig;
pub use error::{Result, TableError};
pub use table::{LookupTable, TableSet, TableWidth};

/// Build every resource table, in firmware resource order.
pub fn generate_all(config: &GeneratorConfig) -> Result<TableSet> {
    config.validate()?;
    let mut tables = TableSet::new();

    tables.extend(curves::curve_tables(config)?)?;
    tables.push(arpeggiator::arpeggiator_table()?)?;
    tables.push(euclidean::euclidean_table()?)?;
    tables.push(consonance::consonance_table()?)?;
    let scales = shruti::scale_tables()?;
    info!(count = scales.len(), "built scale presets");
    tables.extend(scales)?;
    tables.extend(fm_ratios::fm_tables(&config.fm)?)?;
    tables.extend(clock_ratios::clock_tables(&config.clock)?)?;
    tables.extend(curves::svf_tables(config)?)?;
    tables.push(segment_font::SegmentFont::new()?.table()?)?;

    info!(tables = tables.len(), "generated lookup tables");
    Ok(tables)
}
