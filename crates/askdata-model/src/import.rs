//! CSV ingestion.
//!
//! The whole file is read into memory first, then every column is typed from all of its cells:
//! a column is boolean only if each non-missing cell is `true`/`false`, numeric only if each
//! parses as a float, and text otherwise. Cells matching one of [`CsvOptions::missing_values`]
//! (or empty) become [`Value::Blank`] and never affect the inferred type.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use thiserror::Error;

use crate::{ColumnSchema, ColumnType, Dataset, DatasetError, Value};

/// Cell contents read as missing unless overridden.
pub const DEFAULT_MISSING_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Clone, Debug)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub has_header: bool,
    pub encoding: TextEncoding,
    /// Exact (case-sensitive) cell contents treated as missing, after trimming.
    pub missing_values: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            encoding: TextEncoding::Auto,
            missing_values: DEFAULT_MISSING_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, with a Windows-1252 fallback for fields that are not valid UTF-8.
    #[default]
    Auto,
    Utf8,
    Windows1252,
}

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("csv input was empty")]
    EmptyInput,
    #[error("invalid UTF-8 at record {record}, field {field}")]
    InvalidUtf8 { record: usize, field: usize },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Import a CSV file from disk.
pub fn import_csv_path(
    path: impl AsRef<Path>,
    options: CsvOptions,
) -> Result<Dataset, CsvImportError> {
    let file = File::open(path.as_ref())?;
    import_csv(BufReader::new(file), options)
}

/// Import a CSV stream into a [`Dataset`], inferring a type for every column.
pub fn import_csv<R: Read>(reader: R, options: CsvOptions) -> Result<Dataset, CsvImportError> {
    let RawTable { header, rows } = read_raw(reader, &options)?;
    let width = rows
        .iter()
        .map(Vec::len)
        .chain([header.len(), 1])
        .max()
        .unwrap_or(1);

    let missing = MissingValues::new(&options.missing_values);
    let types: Vec<ColumnType> = (0..width)
        .map(|col| {
            let mut inference = Inference::default();
            for row in &rows {
                inference.observe(row.get(col).map_or("", String::as_str), &missing);
            }
            inference.finish()
        })
        .collect();

    let schema: Vec<ColumnSchema> = column_names(header, width)
        .into_iter()
        .zip(&types)
        .map(|(name, &column_type)| ColumnSchema::new(name, column_type))
        .collect();
    log::debug!(
        "csv import: {} rows, {} columns ({} numeric)",
        rows.len(),
        schema.len(),
        schema.iter().filter(|c| c.column_type.is_numeric()).count()
    );

    let mut dataset = Dataset::new(schema);
    let mut pool = TextPool::default();
    for row in rows {
        let values = types
            .iter()
            .enumerate()
            .map(|(col, &ty)| {
                let field = row.get(col).map_or("", String::as_str);
                to_value(field, ty, &missing, &mut pool)
            })
            .collect();
        dataset.push_row(values)?;
    }
    Ok(dataset)
}

struct RawTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn read_raw<R: Read>(reader: R, options: &CsvOptions) -> Result<RawTable, CsvImportError> {
    let records = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_byte_records();

    let mut rows = Vec::new();
    for (idx, record) in records.enumerate() {
        let record = record?;
        let mut fields = record
            .iter()
            .enumerate()
            .map(|(field, bytes)| decode(bytes, options.encoding, idx + 1, field + 1))
            .collect::<Result<Vec<_>, _>>()?;
        if idx == 0 {
            if let Some(first) = fields.first_mut() {
                if let Some(rest) = first.strip_prefix('\u{feff}') {
                    *first = rest.to_string();
                }
            }
        }
        rows.push(fields);
    }

    if rows.is_empty() {
        return Err(CsvImportError::EmptyInput);
    }
    let header = if options.has_header {
        rows.remove(0)
    } else {
        Vec::new()
    };
    Ok(RawTable { header, rows })
}

fn decode(
    bytes: &[u8],
    encoding: TextEncoding,
    record: usize,
    field: usize,
) -> Result<String, CsvImportError> {
    let as_1252 = |bytes: &[u8]| WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned();
    match (encoding, std::str::from_utf8(bytes)) {
        (TextEncoding::Windows1252, _) => Ok(as_1252(bytes)),
        (_, Ok(text)) => Ok(text.to_string()),
        (TextEncoding::Utf8, Err(_)) => Err(CsvImportError::InvalidUtf8 { record, field }),
        (TextEncoding::Auto, Err(_)) => {
            log::warn!("record {record}, field {field} is not UTF-8; reading it as Windows-1252");
            Ok(as_1252(bytes))
        }
    }
}

/// Header names padded to `width`, with blanks replaced by `ColumnN` and repeats suffixed `.N`.
fn column_names(header: Vec<String>, width: usize) -> Vec<String> {
    let mut header = header.into_iter();
    let mut counts: HashMap<String, usize> = HashMap::new();
    (1..=width)
        .map(|n| {
            let name = header
                .next()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| format!("Column{n}"));
            let seen = counts.entry(name.clone()).or_insert(0);
            *seen += 1;
            match *seen {
                1 => name,
                k => format!("{name}.{}", k - 1),
            }
        })
        .collect()
}

struct MissingValues<'a> {
    tokens: &'a [String],
}

impl<'a> MissingValues<'a> {
    fn new(tokens: &'a [String]) -> Self {
        Self { tokens }
    }

    fn contains(&self, field: &str) -> bool {
        field.is_empty() || self.tokens.iter().any(|t| t == field)
    }
}

/// Running type evidence for one column.
#[derive(Debug)]
struct Inference {
    saw_value: bool,
    all_bool: bool,
    all_number: bool,
}

impl Default for Inference {
    fn default() -> Self {
        Self {
            saw_value: false,
            all_bool: true,
            all_number: true,
        }
    }
}

impl Inference {
    fn observe(&mut self, field: &str, missing: &MissingValues<'_>) {
        let field = field.trim();
        if missing.contains(field) {
            return;
        }
        self.saw_value = true;
        self.all_bool &= parse_bool(field).is_some();
        self.all_number &= parse_number(field).is_some();
    }

    fn finish(&self) -> ColumnType {
        if !self.saw_value {
            ColumnType::Text
        } else if self.all_bool {
            ColumnType::Boolean
        } else if self.all_number {
            ColumnType::Number
        } else {
            ColumnType::Text
        }
    }
}

fn to_value(
    field: &str,
    ty: ColumnType,
    missing: &MissingValues<'_>,
    pool: &mut TextPool,
) -> Value {
    let field = field.trim();
    if missing.contains(field) {
        return Value::Blank;
    }
    match ty {
        ColumnType::Number => parse_number(field).map_or(Value::Blank, Value::from),
        ColumnType::Boolean => parse_bool(field).map_or(Value::Blank, Value::Boolean),
        ColumnType::Text => pool.intern(field),
    }
}

fn parse_bool(field: &str) -> Option<bool> {
    if field.eq_ignore_ascii_case("true") {
        Some(true)
    } else if field.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Plain decimal or exponent notation. `inf` and `nan` spellings are not numbers here.
fn parse_number(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Shares one allocation between repeated text cells.
#[derive(Default)]
struct TextPool {
    values: HashMap<String, Value>,
}

impl TextPool {
    fn intern(&mut self, s: &str) -> Value {
        if let Some(v) = self.values.get(s) {
            return v.clone();
        }
        let v = Value::from(s);
        self.values.insert(s.to_string(), v.clone());
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn infer(cells: &[&str]) -> ColumnType {
        let tokens = CsvOptions::default().missing_values;
        let missing = MissingValues::new(&tokens);
        let mut inference = Inference::default();
        for cell in cells {
            inference.observe(cell, &missing);
        }
        inference.finish()
    }

    #[test]
    fn numbers_are_plain_floats() {
        assert_eq!(parse_number("1234.5"), Some(1234.5));
        assert_eq!(parse_number("-12"), Some(-12.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("1,234"), None);
        assert_eq!(parse_number("$40"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn only_true_and_false_make_a_boolean_column() {
        assert_eq!(infer(&["0", "1"]), ColumnType::Number);
        assert_eq!(infer(&["True", "false", "TRUE"]), ColumnType::Boolean);
        assert_eq!(infer(&["yes", "no"]), ColumnType::Text);
        assert_eq!(infer(&["t", "f"]), ColumnType::Text);
    }

    #[test]
    fn missing_tokens_do_not_affect_the_type() {
        assert_eq!(infer(&["10", "NA", "", "null", "30"]), ColumnType::Number);
        assert_eq!(infer(&["NA", "N/A"]), ColumnType::Text);
        // Matching is case-sensitive.
        assert_eq!(infer(&["10", "Na"]), ColumnType::Text);
    }

    #[test]
    fn duplicate_and_blank_headers() {
        let header = vec!["a".into(), "b".into(), "a".into(), " ".into(), "a".into()];
        assert_eq!(
            column_names(header, 6),
            vec!["a", "b", "a.1", "Column4", "a.2", "Column6"]
        );
    }
}
