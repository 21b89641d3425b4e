use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde_json::Value as JsonValue;

use super::model::{CellValue, RawTable};

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimited text with the given field separator.
    Delimited(u8),
    Json,
    Parquet,
}

impl FileFormat {
    /// Detect the format from a file name or URL. Anything unrecognised is
    /// read as comma-separated text.
    pub fn from_name(name: &str) -> Self {
        let name = name.split(['?', '#']).next().unwrap_or(name);
        let file = name.rsplit('/').next().unwrap_or(name);
        let ext = file
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "parquet" | "pq" => FileFormat::Parquet,
            "json" => FileFormat::Json,
            "tsv" | "tab" => FileFormat::Delimited(b'\t'),
            _ => FileFormat::Delimited(b','),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_name(&file)
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a file, dispatching on its extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row plus one observation per line
/// * `.json`         – `[{ "Country": ..., "Year": ..., ... }, ...]`
/// * `.parquet`      – flat columns of strings and numbers
pub fn load_file(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;

    match FileFormat::from_path(path) {
        FileFormat::Delimited(delimiter) => load_delimited(file, delimiter),
        FileFormat::Json => load_json(file),
        FileFormat::Parquet => load_parquet(file),
    }
}

/// Load a table from an in-memory buffer such as an HTTP response body.
pub fn load_from_memory<B>(data: B, format: FileFormat) -> Result<RawTable>
where
    B: ChunkReader + AsRef<[u8]> + 'static,
{
    match format {
        FileFormat::Delimited(delimiter) => load_delimited(data.as_ref(), delimiter),
        FileFormat::Json => load_json(data.as_ref()),
        FileFormat::Parquet => load_parquet(data),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, then one observation per row. Cell types
/// are guessed per cell: integer, float, bool, else string. Empty cells are
/// null.
pub fn load_delimited<R: Read>(reader: R, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = RawTable::new(headers);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        table
            .rows
            .push(record.iter().map(guess_cell_type).collect());
    }

    Ok(table)
}

/// Text that stands for a missing value in exported data frames.
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing_token(s: &str) -> bool {
    MISSING_TOKENS.contains(&s)
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() || is_missing_token(s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Country": "Finland", "Year": 2020, "Happiness_Score": 7.8 },
///   ...
/// ]
/// ```
///
/// Columns are the union of all keys, in first-seen order.
pub fn load_json<R: Read>(reader: R) -> Result<RawTable> {
    let root: JsonValue = serde_json::from_reader(reader).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.iter().any(|h| h == key.trim()) {
                headers.push(key.trim().to_string());
            }
        }
    }

    let mut table = RawTable::new(headers);
    for rec in records {
        let Some(obj) = rec.as_object() else {
            continue;
        };
        let mut row = vec![CellValue::Null; table.headers.len()];
        for (key, val) in obj {
            if let Some(idx) = table.column_index(key.trim()) {
                row[idx] = json_to_cell(val);
            }
        }
        table.rows.push(row);
    }

    Ok(table)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if is_missing_token(s.trim()) => CellValue::Null,
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat string / numeric / bool columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
pub fn load_parquet<R: ChunkReader + 'static>(source: R) -> Result<RawTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(source)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut table = RawTable::new(headers);

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        if batch.num_columns() != table.headers.len() {
            bail!(
                "record batch has {} columns, schema has {}",
                batch.num_columns(),
                table.headers.len()
            );
        }
        let columns = batch
            .columns()
            .iter()
            .zip(&table.headers)
            .map(|(col, name)| widen_column(col).with_context(|| format!("column {name}")))
            .collect::<Result<Vec<_>>>()?;
        for row in 0..batch.num_rows() {
            let cells = columns.iter().map(|col| extract_cell(col, row)).collect();
            table.rows.push(cells);
        }
    }

    Ok(table)
}

/// Cast a column to one of the types [`extract_cell`] reads: Int64, Float64,
/// Utf8 or Boolean. Dictionary columns are unpacked to their value type
/// first.
fn widen_column(col: &ArrayRef) -> Result<ArrayRef> {
    let mut col = Arc::clone(col);
    loop {
        let target = match col.data_type() {
            DataType::Dictionary(_, value) => value.as_ref().clone(),
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => DataType::Int64,
            DataType::Float16 | DataType::Float32 => DataType::Float64,
            DataType::LargeUtf8 | DataType::Utf8View => DataType::Utf8,
            _ => return Ok(col),
        };
        col = cast(&col, &target)
            .with_context(|| format!("casting {} to {target}", col.data_type()))?;
    }
}

/// Extract a single cell from a widened Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map_or(CellValue::Null, |a| guess_text_cell(a.value(row))),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row))),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map_or(CellValue::Null, |a| CellValue::Bool(a.value(row))),
        other => {
            log::debug!("unsupported parquet column type {other:?}, reading as null");
            CellValue::Null
        }
    }
}

fn guess_text_cell(s: &str) -> CellValue {
    if is_missing_token(s.trim()) {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_from_names_and_urls() {
        assert_eq!(FileFormat::from_name("report.csv"), FileFormat::Delimited(b','));
        assert_eq!(FileFormat::from_name("report.TSV"), FileFormat::Delimited(b'\t'));
        assert_eq!(FileFormat::from_name("data/report.parquet"), FileFormat::Parquet);
        assert_eq!(
            FileFormat::from_name("https://host.example/a.b/report.json?raw=true"),
            FileFormat::Json
        );
        assert_eq!(
            FileFormat::from_name("https://host.example/download"),
            FileFormat::Delimited(b',')
        );
    }

    #[test]
    fn delimited_cells_are_typed() {
        let text = "Country , Year,Happiness_Score\nFinland,2020,7.8\nChad,2020,\n";
        let table = load_delimited(text.as_bytes(), b',').unwrap();
        assert_eq!(table.headers, vec!["Country", "Year", "Happiness_Score"]);
        assert_eq!(
            table.rows[0],
            vec![
                CellValue::String("Finland".into()),
                CellValue::Integer(2020),
                CellValue::Float(7.8),
            ]
        );
        assert_eq!(table.rows[1][2], CellValue::Null);
    }

    #[test]
    fn json_records_union_keys() {
        let text = r#"[
            {"Country": "Finland", "Year": 2020},
            {"Country": "Chad", "Year": 2020, "Freedom": 0.4}
        ]"#;
        let table = load_json(text.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        let freedom = table.column_index("Freedom").unwrap();
        assert_eq!(table.rows[0][freedom], CellValue::Null);
        assert_eq!(table.rows[1][freedom], CellValue::Float(0.4));
    }

    #[test]
    fn missing_value_tokens_read_as_null() {
        let text = "Country,Score,Corruption\nFinland,NA,N/A\nChad,#N/A,null\nPeru,None,0.1\n";
        let table = load_delimited(text.as_bytes(), b',').unwrap();
        for row in &table.rows[..2] {
            assert_eq!(row[1..].to_vec(), vec![CellValue::Null, CellValue::Null]);
        }
        assert_eq!(table.rows[2][2], CellValue::Float(0.1));
        assert!(table.is_numeric_column(2));

        let json = r#"[{"Country": "Chad", "Freedom": "N/A"}, {"Country": "NA?", "Freedom": 0.3}]"#;
        let table = load_json(json.as_bytes()).unwrap();
        let freedom = table.column_index("Freedom").unwrap();
        assert_eq!(table.rows[0][freedom], CellValue::Null);
        assert_eq!(table.rows[1][0], CellValue::String("NA?".into()));
    }

    #[test]
    fn parquet_narrow_and_dictionary_columns_are_widened() {
        use arrow::array::{DictionaryArray, Float32Array, Int16Array, UInt8Array};
        use arrow::datatypes::{Field, Int32Type, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let country: DictionaryArray<Int32Type> =
            vec!["Finland", "Chad", "Finland"].into_iter().collect();
        let columns: Vec<ArrayRef> = vec![
            Arc::new(country),
            Arc::new(Int16Array::from(vec![2020i16, 2020, 2021])),
            Arc::new(Float32Array::from(vec![7.5f32, 4.25, 7.75])),
            Arc::new(UInt8Array::from(vec![Some(1u8), Some(2), None])),
        ];
        let schema = Arc::new(Schema::new(vec![
            Field::new(
                "Country",
                DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
                false,
            ),
            Field::new("Year", DataType::Int16, false),
            Field::new("Happiness_Score", DataType::Float32, false),
            Field::new("Rank", DataType::UInt8, true),
        ]));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let mut file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.as_file_mut(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.headers, vec!["Country", "Year", "Happiness_Score", "Rank"]);
        assert_eq!(
            table.rows[1],
            vec![
                CellValue::String("Chad".into()),
                CellValue::Integer(2020),
                CellValue::Float(4.25),
                CellValue::Integer(2),
            ]
        );
        assert_eq!(table.rows[2][0], CellValue::String("Finland".into()));
        assert_eq!(table.rows[2][3], CellValue::Null);
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(load_json(r#"{"Country": "Finland"}"#.as_bytes()).is_err());
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(file, "Country\tYear\nFinland\t2021").unwrap();
        let table = load_file(file.path()).unwrap();
        assert_eq!(table.headers, vec!["Country", "Year"]);
        assert_eq!(table.rows[0][1], CellValue::Integer(2021));
    }
}
