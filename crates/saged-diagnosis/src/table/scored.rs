//! Columnar scored table.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use saged_core::errors::SchemaError;
use saged_core::types::collections::FxHashMap;

/// A single value of a row-oriented record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// Storage for one column. Missing numbers are NaN, missing text is `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<Option<String>>),
    Numeric(Vec<f64>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Numeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view: text cells are parsed, unparsable or missing cells become NaN.
    pub fn to_numeric(&self) -> Vec<f64> {
        match self {
            Self::Numeric(v) => v.clone(),
            Self::Text(v) => v
                .iter()
                .map(|cell| {
                    cell.as_deref()
                        .and_then(|s| s.trim().parse::<f64>().ok())
                        .unwrap_or(f64::NAN)
                })
                .collect(),
        }
    }

    /// Text view of a single cell; numbers are formatted, NaN is missing.
    pub fn text_at(&self, row: usize) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(v) => v.get(row)?.as_deref().map(Cow::Borrowed),
            Self::Numeric(v) => {
                let x = *v.get(row)?;
                if x.is_nan() {
                    None
                } else {
                    Some(Cow::Owned(x.to_string()))
                }
            }
        }
    }
}

/// The scored benchmark: ordered, named columns of equal length.
#[derive(Debug, Clone, Default)]
pub struct ScoredTable {
    names: Vec<String>,
    columns: Vec<Column>,
    index: FxHashMap<String, usize>,
    n_rows: usize,
}

impl ScoredTable {
    /// Build from named columns. Names must be unique and lengths equal.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self, SchemaError> {
        let n_rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut table = Self {
            n_rows,
            ..Self::default()
        };
        for (name, column) in columns {
            if column.len() != n_rows {
                return Err(SchemaError::RaggedColumn {
                    column: name,
                    expected: n_rows,
                    found: column.len(),
                });
            }
            if table.index.contains_key(&name) {
                return Err(SchemaError::DuplicateColumn { column: name });
            }
            table.index.insert(name.clone(), table.names.len());
            table.names.push(name);
            table.columns.push(column);
        }
        Ok(table)
    }

    /// Build from row records. Columns appear in first-seen order; a key
    /// missing from a row is a null cell. A column is numeric when every
    /// non-null cell is a number, text otherwise.
    pub fn from_rows<R, K>(rows: impl IntoIterator<Item = R>) -> Result<Self, SchemaError>
    where
        R: IntoIterator<Item = (K, Cell)>,
        K: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut positions: FxHashMap<String, usize> = FxHashMap::default();
        let mut cells: Vec<Vec<Cell>> = Vec::new();
        let mut n_rows = 0usize;

        for row in rows {
            for (key, cell) in row {
                let key = key.into();
                let pos = match positions.get(&key) {
                    Some(&p) => p,
                    None => {
                        let p = names.len();
                        positions.insert(key.clone(), p);
                        names.push(key);
                        cells.push(vec![Cell::Null; n_rows]);
                        p
                    }
                };
                let column = &mut cells[pos];
                if column.len() > n_rows {
                    return Err(SchemaError::DuplicateColumn {
                        column: names[pos].clone(),
                    });
                }
                column.push(cell);
            }
            n_rows += 1;
            for column in &mut cells {
                column.resize(n_rows, Cell::Null);
            }
        }

        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, column)| (name, column_from_cells(column)))
            .collect();
        Self::new(columns)
    }

    /// Parse a JSON array of row objects. Columns keep the key order of the
    /// records.
    pub fn from_json_records(json: &str) -> Result<Self, SchemaError> {
        let malformed = |e: serde_json::Error| SchemaError::MalformedRecords {
            message: e.to_string(),
        };
        let records: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_str(json).map_err(malformed)?;
        let rows = records
            .into_iter()
            .map(|record| {
                record
                    .into_iter()
                    .map(|(key, value)| Ok((key, serde_json::from_value::<Cell>(value)?)))
                    .collect::<Result<Vec<(String, Cell)>, serde_json::Error>>()
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(malformed)?;
        Self::from_rows(rows)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }
}

fn column_from_cells(cells: Vec<Cell>) -> Column {
    let numeric = cells
        .iter()
        .all(|c| matches!(c, Cell::Null | Cell::Number(_)));
    if numeric {
        Column::Numeric(
            cells
                .into_iter()
                .map(|c| match c {
                    Cell::Number(v) => v,
                    _ => f64::NAN,
                })
                .collect(),
        )
    } else {
        Column::Text(
            cells
                .into_iter()
                .map(|c| match c {
                    Cell::Null => None,
                    Cell::Number(v) => Some(v.to_string()),
                    Cell::Text(s) => Some(s),
                })
                .collect(),
        )
    }
}
