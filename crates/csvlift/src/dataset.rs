//! 📊 Dataset — the in-memory table that is about to go on a trip to the cloud.
//!
//! 🎬 COLD OPEN — INT. HEAP — MOMENTS BEFORE UPLOAD
//!
//! Four rows sat in a `Vec`. Six columns stood guard. Nobody had told them
//! they were about to become comma-separated. Nobody had told them about S3.
//! Some secrets are kinder left unspoken until `render_csv` is called.
//!
//! 🧠 Knowledge graph:
//! - `CellValue`: tagged scalar (Integer, Text, Float, Boolean). No dynamic typing, no vibes.
//! - `Dataset`: ordered column names + rows, every row exactly as wide as the header.
//! - Built via `from_columns` (dict-of-lists), `from_rows` (header + rows),
//!   or `from_records` (one name→value mapping per row). All validate shape up front.
//! - Immutable once built. If you want to change it, build another one. Like a tattoo.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// 🧱 One cell. One value. One of four flavors.
///
/// Rendering is locale-independent and stable: integers in decimal, floats in
/// their shortest round-trip form (always with a fractional part), booleans as
/// `True`/`False`, text verbatim. Date strings are text and stay exactly as given.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Text(String),
    Float(f64),
    Boolean(bool),
}

impl CellValue {
    /// 🖨️ The textual form used in CSV output and previews.
    ///
    /// NaN renders as an empty field, the same way a missing value would.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            CellValue::Integer(i) => Cow::Owned(i.to_string()),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Float(f) => Cow::Owned(render_float(*f)),
            CellValue::Boolean(true) => Cow::Borrowed("True"),
            CellValue::Boolean(false) => Cow::Borrowed("False"),
        }
    }
}

// -- 🧮 `{:?}` on f64 is the shortest string that round-trips AND keeps the `.0` on 92.0.
// -- `{}` would print "92", which is technically correct and spiritually wrong.
fn render_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.is_infinite() {
        let infinity = if value.is_sign_positive() { "inf" } else { "-inf" };
        infinity.to_string()
    } else {
        format!("{value:?}")
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// 💀 Everything that can go wrong while assembling a table.
/// Spoiler: it's always the shape.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("a dataset needs at least one column")]
    NoColumns,
    #[error("column names must not be empty (column #{0})")]
    EmptyColumnName(usize),
    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("column '{column}' has {actual} values but the first column has {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("row {row} has {actual} values but there are {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("row {row} does not carry column '{column}'")]
    MissingField { row: usize, column: String },
    #[error("row {row} carries column '{column}' that the first row never mentioned")]
    UnexpectedField { row: usize, column: String },
}

/// 📦 An ordered, rectangular table of [`CellValue`]s.
///
/// Every row has exactly one value per column, in column order. The type
/// offers no mutation, so the shape checked at construction holds forever.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// 🏗️ Build from a header and row-major values.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self, DatasetError> {
        let columns = validate_columns(columns.into_iter().map(Into::into).collect())?;
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DatasetError::RaggedRow {
                    row: row_index,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// 🏗️ Build from `(column name, values)` pairs, the dict-of-lists shape.
    ///
    /// Every column must hold the same number of values as the first one.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Vec<CellValue>)>,
    ) -> Result<Self, DatasetError> {
        let (names, values): (Vec<String>, Vec<Vec<CellValue>>) = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .unzip();
        let names = validate_columns(names)?;

        let expected = values.first().map(Vec::len).unwrap_or(0);
        for (name, column_values) in names.iter().zip(&values) {
            if column_values.len() != expected {
                return Err(DatasetError::RaggedColumn {
                    column: name.clone(),
                    expected,
                    actual: column_values.len(),
                });
            }
        }

        // 🔄 transpose: columns in, rows out. the matrix has been rotated. the matrix is fine.
        let mut column_iters: Vec<_> = values.into_iter().map(Vec::into_iter).collect();
        let rows = (0..expected)
            .map(|_| {
                column_iters
                    .iter_mut()
                    .filter_map(Iterator::next)
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(Self {
            columns: names,
            rows,
        })
    }

    /// 🏗️ Build from one mapping per row.
    ///
    /// The first record fixes the column order. Later records may list their
    /// fields in any order but must carry exactly the same column names.
    pub fn from_records<R, S>(records: impl IntoIterator<Item = R>) -> Result<Self, DatasetError>
    where
        R: IntoIterator<Item = (S, CellValue)>,
        S: Into<String>,
    {
        let mut records = records.into_iter();
        let first: Vec<(String, CellValue)> = match records.next() {
            Some(record) => record.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            None => return Err(DatasetError::NoColumns),
        };
        let (names, first_row): (Vec<String>, Vec<CellValue>) = first.into_iter().unzip();
        let columns = validate_columns(names)?;

        let mut rows = vec![first_row];
        for (offset, record) in records.enumerate() {
            let row_index = offset + 1;
            let mut slots: Vec<Option<CellValue>> = vec![None; columns.len()];
            for (name, value) in record {
                let name = name.into();
                let position = columns.iter().position(|c| *c == name).ok_or_else(|| {
                    DatasetError::UnexpectedField {
                        row: row_index,
                        column: name.clone(),
                    }
                })?;
                if slots[position].replace(value).is_some() {
                    return Err(DatasetError::DuplicateColumn(name));
                }
            }
            let row = slots
                .into_iter()
                .zip(&columns)
                .map(|(slot, column)| {
                    slot.ok_or_else(|| DatasetError::MissingField {
                        row: row_index,
                        column: column.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// 🧪 The four-person sample table the job ships by default.
    pub fn sample() -> Self {
        let columns = ["id", "name", "city", "score", "active", "registered"]
            .map(String::from)
            .to_vec();
        let people: [(i64, &str, &str, f64, bool, &str); 4] = [
            (1001, "Rajan", "Chennai", 89.5, true, "2025-01-15"),
            (1002, "Priya", "Coimbatore", 92.0, true, "2025-02-03"),
            (1003, "Arjun", "Madurai", 78.5, false, "2024-11-20"),
            (1004, "Meera", "Salem", 95.0, true, "2025-03-10"),
        ];
        let rows = people
            .into_iter()
            .map(|(id, name, city, score, active, registered)| {
                vec![
                    CellValue::from(id),
                    CellValue::from(name),
                    CellValue::from(city),
                    CellValue::from(score),
                    CellValue::from(active),
                    CellValue::from(registered),
                ]
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// 🔍 Look up a single cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let position = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| &r[position])
    }
}

fn validate_columns(columns: Vec<String>) -> Result<Vec<String>, DatasetError> {
    if columns.is_empty() {
        return Err(DatasetError::NoColumns);
    }
    for (index, name) in columns.iter().enumerate() {
        if name.is_empty() {
            return Err(DatasetError::EmptyColumnName(index));
        }
        if columns[..index].contains(name) {
            return Err(DatasetError::DuplicateColumn(name.clone()));
        }
    }
    Ok(columns)
}
