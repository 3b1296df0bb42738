//! Core data model types.
//!
//! Acquisition produces an in-memory [`DataSet`]: a [`Schema`] (a list of typed [`Field`]s),
//! row-major [`Value`] storage, and a row index carrying stable row labels through filtering.

use crate::error::{WrangleError, WrangleResult};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Like [`Self::index_of`], but a missing field is a [`WrangleError::SchemaMismatch`].
    pub fn require(&self, name: &str) -> WrangleResult<usize> {
        self.index_of(name)
            .ok_or_else(|| WrangleError::missing_column(name))
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// `true` for [`Value::Null`] and for `NaN` floats, which both count as missing.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value, if it is an integer or float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. `index`
/// holds one label per row; it is what the cache artifact writes as its first column.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
    /// Row labels, parallel to `rows`.
    pub index: Vec<u64>,
}

impl DataSet {
    /// Create a dataset from schema and rows, labelling rows `0..n`.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        let index = (0..rows.len() as u64).collect();
        Self {
            schema,
            rows,
            index,
        }
    }

    /// Create a dataset with explicit row labels.
    ///
    /// # Panics
    ///
    /// Panics if `index` and `rows` differ in length.
    pub fn with_index(schema: Schema, rows: Vec<Vec<Value>>, index: Vec<u64>) -> Self {
        assert!(
            index.len() == rows.len(),
            "index length {} does not match row count {}",
            index.len(),
            rows.len()
        );
        Self {
            schema,
            rows,
            index,
        }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Iterate the values of column `idx`, top to bottom.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Number of missing values in column `idx`.
    pub fn column_null_count(&self, idx: usize) -> usize {
        self.column_values(idx).filter(|v| v.is_null()).count()
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema and row labels.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let (index, rows): (Vec<u64>, Vec<Vec<Value>>) = self
            .index
            .iter()
            .zip(&self.rows)
            .filter(|(_, row)| predicate(row.as_slice()))
            .map(|(label, row)| (*label, row.clone()))
            .unzip();
        Self {
            schema: self.schema.clone(),
            rows,
            index,
        }
    }

    /// Create a new dataset by applying `mapper` to every row.
    ///
    /// The returned dataset preserves the original schema and row labels.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the schema field count.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected_len = self.schema.fields.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match schema length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        Self {
            schema: self.schema.clone(),
            rows,
            index: self.index.clone(),
        }
    }

    /// Reduce (fold) all rows into an accumulator value.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }

    /// Create a new dataset keeping only the columns for which `keep` returns `true`.
    ///
    /// `keep` receives the column position and its field.
    pub fn select_columns<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(usize, &Field) -> bool,
    {
        let kept: Vec<usize> = self
            .schema
            .fields
            .iter()
            .enumerate()
            .filter(|(idx, field)| keep(*idx, *field))
            .map(|(idx, _)| idx)
            .collect();

        let fields = kept
            .iter()
            .map(|&idx| self.schema.fields[idx].clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| kept.iter().map(|&idx| row[idx].clone()).collect())
            .collect();

        Self {
            schema: Schema::new(fields),
            rows,
            index: self.index.clone(),
        }
    }

    /// Drop the named columns.
    ///
    /// Every name must be present; otherwise nothing is dropped and a
    /// [`WrangleError::SchemaMismatch`] is returned.
    pub fn drop_columns(&self, names: &[&str]) -> WrangleResult<Self> {
        for name in names {
            self.schema.require(name)?;
        }
        Ok(self.select_columns(|_, field| !names.contains(&field.name.as_str())))
    }
}
