// Error type shared by every generator in the crate.
//
// All failures here are table definition errors: a glyph naming a segment that
// does not exist, a raga naming an unknown swara, a table value that does not
// fit its declared width. None of them are recoverable mid-run. The binary
// aborts the whole generation on the first one, so no partial resource files
// are ever written.

use thiserror::Error;

use crate::table::TableWidth;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("unknown segment '{segment}' in glyph for codepoint {codepoint:#04x}")]
    UnknownSegment { codepoint: u8, segment: char },

    #[error("invalid rhythm: {onsets} onsets over {steps} steps")]
    InvalidRhythm { onsets: u32, steps: u32 },

    #[error("unknown swara or note name: {0:?}")]
    UnknownSwara(String),

    #[error("scale must name exactly 12 keys, got {0}")]
    ScaleLength(usize),

    #[error("scale silences every key")]
    SilentScale,

    #[error("malformed rhythm pattern {pattern:?}: {steps} steps (expected 16)")]
    MalformedPattern { pattern: String, steps: usize },

    #[error("envelope slope shift rises at step {index}: {shift} after {previous}")]
    NonMonotonicShift { index: usize, shift: i32, previous: i32 },

    #[error("duplicate table name: {0}")]
    DuplicateTable(String),

    #[error("table {table}: value {value} at index {index} does not fit {width:?}")]
    ValueOutOfRange {
        table: String,
        index: usize,
        value: i64,
        width: TableWidth,
    },

    #[error("table {table}: non-finite value at index {index}")]
    NonFiniteValue { table: String, index: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TableError>;
