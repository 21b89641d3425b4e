use std::collections::BTreeSet;
use std::fmt;

use crate::analysis::columns::IndicatorColumnMap;
use crate::geo::Continent;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. NaN floats count as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Float(_) | CellValue::Integer(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// RawTable – what every loader produces
// ---------------------------------------------------------------------------

/// Format-neutral table: trimmed header names plus rows of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        RawTable {
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// A column is numeric when it has at least one number and every
    /// non-null cell is a number.
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        let mut any = false;
        for cell in self.rows.iter().filter_map(|r| r.get(idx)) {
            if cell.is_null() || matches!(cell, CellValue::Float(v) if v.is_nan()) {
                continue;
            }
            if !cell.is_numeric() {
                return false;
            }
            any = true;
        }
        any
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Record – one (country, year) observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub year: i32,
    /// One value per [`DatasetSchema::indicator_columns`] entry.
    pub values: Vec<Option<f64>>,
    /// `None` when the country could not be placed on a continent.
    pub continent: Option<Continent>,
    pub rank: Option<u32>,
}

impl Record {
    pub fn is_resolved(&self) -> bool {
        self.continent.is_some()
    }
}

// ---------------------------------------------------------------------------
// DatasetSchema – which columns play which role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    pub country_column: String,
    pub year_column: String,
    pub score_column: Option<String>,
    /// Present when the file supplied its own rank column.
    pub rank_column: Option<String>,
    /// Numeric columns other than year and rank, in file order.
    pub indicator_columns: Vec<String>,
}

// ---------------------------------------------------------------------------
// HappinessDataset – the loaded and derived dataset
// ---------------------------------------------------------------------------

/// All records of one data source plus their session-wide derivations.
#[derive(Debug, Clone)]
pub struct HappinessDataset {
    pub records: Vec<Record>,
    pub schema: DatasetSchema,
    /// Radar indicators resolved against this schema.
    pub radar_columns: IndicatorColumnMap,
    /// Dataset-wide maximum per indicator column, aligned with the schema.
    pub maxima: Vec<Option<f64>>,
    /// Sorted names of countries with no continent.
    pub unresolved_countries: Vec<String>,
    /// True when ranks were computed rather than read from the file.
    pub ranks_derived: bool,
}

impl HappinessDataset {
    pub fn indicator_index(&self, column: &str) -> Option<usize> {
        self.schema.indicator_columns.iter().position(|c| c == column)
    }

    pub fn value(&self, record: &Record, column: &str) -> Option<f64> {
        self.indicator_index(column)
            .and_then(|i| record.values.get(i).copied().flatten())
    }

    pub fn column_max(&self, column: &str) -> Option<f64> {
        self.indicator_index(column)
            .and_then(|i| self.maxima.get(i).copied().flatten())
    }

    pub fn score(&self, record: &Record) -> Option<f64> {
        self.schema
            .score_column
            .as_deref()
            .and_then(|col| self.value(record, col))
    }

    /// Records with a resolved continent, i.e. everything that may be shown.
    pub fn visible_records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().filter(|r| r.is_resolved())
    }

    pub fn continents(&self) -> BTreeSet<Continent> {
        self.records.iter().filter_map(|r| r.continent).collect()
    }

    /// Sorted unique names of resolved countries.
    pub fn countries(&self) -> Vec<String> {
        self.visible_records()
            .map(|r| r.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows of one country, ordered by year.
    pub fn country_records(&self, country: &str) -> Vec<&Record> {
        let mut rows: Vec<&Record> = self
            .visible_records()
            .filter(|r| r.country == country)
            .collect();
        rows.sort_by_key(|r| r.year);
        rows
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_column_detection_ignores_nulls() {
        let mut table = RawTable::new(vec![" Country ".into(), "Score".into(), "Note".into()]);
        table.rows.push(vec![
            CellValue::String("Finland".into()),
            CellValue::Float(7.8),
            CellValue::Null,
        ]);
        table.rows.push(vec![
            CellValue::String("Chad".into()),
            CellValue::Null,
            CellValue::String("n/a".into()),
        ]);
        assert_eq!(table.headers[0], "Country");
        assert!(!table.is_numeric_column(0));
        assert!(table.is_numeric_column(1));
        assert!(!table.is_numeric_column(2));
    }

    #[test]
    fn nan_cells_are_missing_numbers() {
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::String("3".into()).as_f64(), None);
    }
}
