// End-to-end tests for the full generation run.
//
// Builds every table from the default config and checks the properties the
// firmware relies on: resource order, table sizes and widths, determinism,
// and that the emitted JSON and C++ describe the same tables.

use yarns_tables::emit::{self, OutputFormat};
use yarns_tables::{GeneratorConfig, TableError, TableSet, TableWidth, generate_all};

fn tables() -> TableSet {
    generate_all(&GeneratorConfig::default()).unwrap()
}

#[test]
fn test_resource_order() {
    let tables = tables();
    let names = tables.names();
    assert_eq!(names.len(), 49);
    assert_eq!(
        &names[..9],
        &[
            "lfo_increments",
            "portamento_increments",
            "env_expo",
            "expo_slope_shift",
            "envelope_phase_increments",
            "oscillator_increments",
            "arpeggiator_patterns",
            "euclidean",
            "consonance",
        ]
    );
    assert_eq!(names[9], "scale_pythagorean");
    assert_eq!(names[39], "scale_rasia");
    assert_eq!(
        &names[40..],
        &[
            "fm_ratio_names",
            "fm_modulator_intervals",
            "fm_index_2x_upshifts",
            "clock_ratio_ticks",
            "clock_ratio_names",
            "svf_cutoff",
            "svf_damp",
            "svf_scale",
            "characters",
        ]
    );
}

#[test]
fn test_sizes_and_widths() {
    let tables = tables();
    let expect = |name: &str, len: usize, width: Option<TableWidth>| {
        let table = tables.get(name).unwrap();
        assert_eq!(table.len(), len, "{name}");
        assert_eq!(table.width(), width, "{name}");
    };
    expect("euclidean", 1024, Some(TableWidth::U32));
    expect("characters", 256, Some(TableWidth::U16));
    expect("consonance", 1536, Some(TableWidth::U16));
    expect("env_expo", 257, Some(TableWidth::U16));
    expect("expo_slope_shift", 16, Some(TableWidth::I8));
    expect("scale_bhairav", 12, Some(TableWidth::I16));
    expect("fm_ratio_names", 26, None);
    expect("clock_ratio_names", 32, None);
}

#[test]
fn test_spot_values() {
    let tables = tables();
    let euclidean = tables.get("euclidean").unwrap().integers_slice().unwrap();
    // Row for 16 steps, column for 4 onsets.
    assert_eq!(euclidean[15 * 32 + 4], 0x1111);
    let characters = tables.get("characters").unwrap().integers_slice().unwrap();
    assert_eq!(characters[usize::from(b'A')], 0xEC44);
    let bhairav = tables.get("scale_bhairav").unwrap().integers_slice().unwrap();
    assert_eq!(
        bhairav,
        &[0, -13, -141, -269, -18, -3, -131, 3, -10, -138, -266, -15]
    );
}

#[test]
fn test_deterministic() {
    assert_eq!(tables(), tables());
    let json = emit::to_json(&tables()).unwrap();
    assert_eq!(json, emit::to_json(&tables()).unwrap());
}

#[test]
fn test_json_roundtrip_preserves_tables() {
    let tables = tables();
    let json = emit::to_json(&tables).unwrap();
    let parsed: TableSet = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, tables);
}

#[test]
fn test_cpp_declares_every_table() {
    let tables = tables();
    let header = emit::render_header(&tables);
    let source = emit::render_source(&tables);
    for name in tables.names() {
        let identifier = emit::sanitize_identifier(name);
        assert!(header.contains(&identifier), "{name} missing from header");
        assert!(source.contains(&identifier), "{name} missing from source");
    }
    assert!(header.contains("extern const uint32_t lut_euclidean[];"));
    assert!(header.contains("extern const int16_t lut_scale_1_4_eb[];"));
}

#[test]
fn test_write_all_creates_files() {
    let out_dir = std::env::temp_dir().join(format!("yarns_tables_test_{}", std::process::id()));
    let written = emit::write_all(&tables(), &out_dir, OutputFormat::All).unwrap();
    assert_eq!(written.len(), 3);
    for path in &written {
        assert!(path.exists(), "{}", path.display());
    }
    let json_only = emit::write_all(&tables(), &out_dir, OutputFormat::Json).unwrap();
    assert_eq!(json_only, vec![out_dir.join(emit::JSON_FILE)]);
    std::fs::remove_dir_all(&out_dir).unwrap();
}

#[test]
fn test_config_changes_flow_through() {
    let config = GeneratorConfig::from_json(r#"{ "clock": { "slowest_ratio": [1, 4] } }"#).unwrap();
    let tables = generate_all(&config).unwrap();
    let ticks = tables.get("clock_ratio_ticks").unwrap().integers_slice().unwrap();
    assert_eq!(ticks[0], 96);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = GeneratorConfig::default();
    config.rates.audio_rate = 0.0;
    assert!(matches!(generate_all(&config), Err(TableError::Config(_))));
}

#[test]
fn test_degenerate_parameters_fail_instead_of_zero_tables() {
    let mut config = GeneratorConfig::default();
    config.rates.excursion = -1.0;
    assert!(matches!(generate_all(&config), Err(TableError::Config(_))));

    let mut config = GeneratorConfig::default();
    config.fm.index_scaling_base = -40.0;
    assert!(matches!(generate_all(&config), Err(TableError::Config(_))));

    let mut config = GeneratorConfig::default();
    config.clock.ticks_per_beat = 1_000_000_000;
    assert!(matches!(generate_all(&config), Err(TableError::Config(_))));
}
