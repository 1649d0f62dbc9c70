// Named lookup tables and the ordered set they are collected into.
//
// Every generator hands back `LookupTable`s. A table is either a sequence of
// integers with a declared element width (the C type the firmware stores it
// as) or a sequence of strings used for display names. Integer values are
// range-checked against the width when the table is built, so the emission
// step never has to round, wrap or clamp.
//
// `TableSet` keeps tables in declaration order. The firmware indexes
// resources by position, so order is part of the output contract. Names are
// unique within a set.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Storage width of an integer table element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableWidth {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
}

impl TableWidth {
    /// Inclusive range of representable values.
    pub fn range(self) -> (i64, i64) {
        match self {
            TableWidth::U8 => (0, u8::MAX as i64),
            TableWidth::I8 => (i8::MIN as i64, i8::MAX as i64),
            TableWidth::U16 => (0, u16::MAX as i64),
            TableWidth::I16 => (i16::MIN as i64, i16::MAX as i64),
            TableWidth::U32 => (0, u32::MAX as i64),
            TableWidth::I32 => (i32::MIN as i64, i32::MAX as i64),
        }
    }

    pub fn contains(self, value: i64) -> bool {
        let (low, high) = self.range();
        (low..=high).contains(&value)
    }

    /// The C type name used when emitting firmware sources.
    pub fn c_type(self) -> &'static str {
        match self {
            TableWidth::U8 => "uint8_t",
            TableWidth::I8 => "int8_t",
            TableWidth::U16 => "uint16_t",
            TableWidth::I16 => "int16_t",
            TableWidth::U32 => "uint32_t",
            TableWidth::I32 => "int32_t",
        }
    }
}

/// Contents of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableData {
    Integers { width: TableWidth, values: Vec<i64> },
    Strings { values: Vec<String> },
}

/// A named, immutable table of precomputed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupTable {
    name: String,
    #[serde(flatten)]
    data: TableData,
}

impl LookupTable {
    /// Build an integer table, rejecting any value outside `width`.
    pub fn integers<I>(name: impl Into<String>, width: TableWidth, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let name = name.into();
        let values: Vec<i64> = values.into_iter().collect();
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !width.contains(**v)) {
            return Err(TableError::ValueOutOfRange {
                table: name,
                index,
                value,
                width,
            });
        }
        Ok(LookupTable {
            name,
            data: TableData::Integers { width, values },
        })
    }

    /// Build an integer table from real values, truncating toward zero.
    pub fn truncated<I>(name: impl Into<String>, width: TableWidth, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let name = name.into();
        let mut truncated = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            if !value.is_finite() {
                return Err(TableError::NonFiniteValue { table: name, index });
            }
            truncated.push(value.trunc() as i64);
        }
        Self::integers(name, width, truncated)
    }

    pub fn strings<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LookupTable {
            name: name.into(),
            data: TableData::Strings {
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    /// Element width, or `None` for string tables.
    pub fn width(&self) -> Option<TableWidth> {
        match &self.data {
            TableData::Integers { width, .. } => Some(*width),
            TableData::Strings { .. } => None,
        }
    }

    pub fn integers_slice(&self) -> Option<&[i64]> {
        match &self.data {
            TableData::Integers { values, .. } => Some(values),
            TableData::Strings { .. } => None,
        }
    }

    pub fn strings_slice(&self) -> Option<&[String]> {
        match &self.data {
            TableData::Strings { values } => Some(values),
            TableData::Integers { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            TableData::Integers { values, .. } => values.len(),
            TableData::Strings { values } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered collection of uniquely named tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSet {
    tables: Vec<LookupTable>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table. Fails if a table with the same name is already present.
    pub fn push(&mut self, table: LookupTable) -> Result<()> {
        if self.get(table.name()).is_some() {
            return Err(TableError::DuplicateTable(table.name().to_string()));
        }
        self.tables.push(table);
        Ok(())
    }

    pub fn extend<I>(&mut self, tables: I) -> Result<()>
    where
        I: IntoIterator<Item = LookupTable>,
    {
        for table in tables {
            self.push(table)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LookupTable> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LookupTable> {
        self.tables.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(LookupTable::name).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
