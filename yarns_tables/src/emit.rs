// Resource emission: JSON dump and C++ header/source pair.
//
// The C++ side declares one array per table. Integer tables become
// `const <ctype> lut_<name>[]`, string tables become
// `const char* const str_<name>[]`. Table names may contain characters that
// are not valid in identifiers (scale presets such as "1/4 eb"); those are
// replaced by '_'.
//
// Display strings are Latin-1: glyphs 0x80..0xFF of the segment font are
// written as hex escapes followed by an empty literal ("\xC1""") so the
// escape cannot swallow a following hex digit.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::error::{Result, TableError};
use crate::table::{LookupTable, TableData, TableSet};

const GENERATED_BANNER: &str = "// Generated by yarns_tables. Do not edit.";
const NAMESPACE: &str = "yarns";
const VALUES_PER_LINE: usize = 8;

pub const JSON_FILE: &str = "resources.json";
pub const HEADER_FILE: &str = "resources.h";
pub const SOURCE_FILE: &str = "resources.cc";

/// Which output files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    Cpp,
    #[default]
    All,
}

impl FromStr for OutputFormat {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "cpp" => Ok(OutputFormat::Cpp),
            "all" => Ok(OutputFormat::All),
            other => Err(TableError::Config(format!(
                "unknown output format {other:?} (expected json, cpp or all)"
            ))),
        }
    }
}

/// Replace every character that cannot appear in a C identifier with '_'.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn array_name(table: &LookupTable) -> String {
    let prefix = match table.data() {
        TableData::Integers { .. } => "lut",
        TableData::Strings { .. } => "str",
    };
    format!("{prefix}_{}", sanitize_identifier(table.name()))
}

/// Quote a display string as a C string literal.
pub fn c_string_literal(value: &str) -> String {
    let mut literal = String::from("\"");
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            ' '..='~' => literal.push(c),
            // Outside Latin-1 there is no glyph to point at.
            _ if u32::from(c) > 0xFF => literal.push('?'),
            _ => literal.push_str(&format!("\\x{:02X}\"\"", u32::from(c))),
        }
    }
    literal.push('"');
    literal
}

fn declaration(table: &LookupTable) -> String {
    match table.data() {
        TableData::Integers { width, .. } => {
            format!("const {} {}[]", width.c_type(), array_name(table))
        }
        TableData::Strings { .. } => format!("const char* const {}[]", array_name(table)),
    }
}

pub fn to_json(tables: &TableSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(tables)?)
}

pub fn render_header(tables: &TableSet) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_BANNER);
    out.push_str("\n\n#ifndef YARNS_RESOURCES_H_\n#define YARNS_RESOURCES_H_\n\n");
    out.push_str("#include <stdint.h>\n\n");
    out.push_str(&format!("namespace {NAMESPACE} {{\n\n"));

    for table in tables.iter() {
        out.push_str(&format!("extern {};\n", declaration(table)));
    }
    out.push('\n');
    for table in tables.iter() {
        out.push_str(&format!(
            "#define {}_SIZE {}\n",
            array_name(table).to_ascii_uppercase(),
            table.len()
        ));
    }

    out.push_str(&format!("\n}}  // namespace {NAMESPACE}\n\n"));
    out.push_str("#endif  // YARNS_RESOURCES_H_\n");
    out
}

pub fn render_source(tables: &TableSet) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_BANNER);
    out.push_str(&format!("\n\n#include \"{HEADER_FILE}\"\n\n"));
    out.push_str(&format!("namespace {NAMESPACE} {{\n"));

    for table in tables.iter() {
        out.push_str(&format!("\n{} = {{\n", declaration(table)));
        match table.data() {
            TableData::Integers { values, .. } => {
                for line in values.chunks(VALUES_PER_LINE) {
                    let line: Vec<String> = line.iter().map(i64::to_string).collect();
                    out.push_str(&format!("  {},\n", line.join(", ")));
                }
            }
            TableData::Strings { values } => {
                for value in values {
                    out.push_str(&format!("  {},\n", c_string_literal(value)));
                }
            }
        }
        out.push_str("};\n");
    }

    out.push_str(&format!("\n}}  // namespace {NAMESPACE}\n"));
    out
}

/// Write the requested resource files into `out_dir`, creating it if
/// needed. Returns the paths written.
pub fn write_all(tables: &TableSet, out_dir: &Path, format: OutputFormat) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut files: Vec<(&str, String)> = Vec::new();
    if matches!(format, OutputFormat::Json | OutputFormat::All) {
        files.push((JSON_FILE, to_json(tables)?));
    }
    if matches!(format, OutputFormat::Cpp | OutputFormat::All) {
        files.push((HEADER_FILE, render_header(tables)));
        files.push((SOURCE_FILE, render_source(tables)));
    }

    let mut written = Vec::with_capacity(files.len());
    for (file_name, contents) in files {
        let path = out_dir.join(file_name);
        fs::write(&path, contents)?;
        info!(path = %path.display(), "wrote resource file");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableWidth;

    fn sample() -> TableSet {
        let mut tables = TableSet::new();
        tables
            .push(LookupTable::integers("scale_1/4 eb", TableWidth::I16, [0, -64, 12]).unwrap())
            .unwrap();
        tables
            .push(LookupTable::strings("fm_ratio_names", ["11 FM 1/1", "\u{C1}4 FM \u{C1}/4"]))
            .unwrap();
        tables
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("scale_1/4 eb"), "scale_1_4_eb");
        assert_eq!(sanitize_identifier("env_expo"), "env_expo");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(c_string_literal("a\"b"), "\"a\\\"b\"");
        assert_eq!(c_string_literal("\u{C1}4"), "\"\\xC1\"\"4\"");
    }

    #[test]
    fn test_header_declarations() {
        let header = render_header(&sample());
        assert!(header.contains("extern const int16_t lut_scale_1_4_eb[];"));
        assert!(header.contains("extern const char* const str_fm_ratio_names[];"));
        assert!(header.contains("#define LUT_SCALE_1_4_EB_SIZE 3"));
        assert!(header.trim_end().ends_with("#endif  // YARNS_RESOURCES_H_"));
    }

    #[test]
    fn test_source_values() {
        let source = render_source(&sample());
        assert!(source.contains("const int16_t lut_scale_1_4_eb[] = {\n  0, -64, 12,\n};"));
        assert!(source.contains("  \"\\xC1\"\"4 FM \\xC1\"\"/4\",\n"));
    }

    #[test]
    fn test_json_keeps_order_and_kind() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        let tables = json.as_array().unwrap();
        assert_eq!(tables[0]["name"], "scale_1/4 eb");
        assert_eq!(tables[0]["kind"], "integers");
        assert_eq!(tables[0]["width"], "i16");
        assert_eq!(tables[1]["kind"], "strings");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("cpp".parse::<OutputFormat>().unwrap(), OutputFormat::Cpp);
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(TableError::Config(_))
        ));
    }
}
