//! Missing-value audits.
//!
//! - [`nulls_by_column`]: per column, how many rows are missing a value
//! - [`nulls_by_row`]: a histogram of how many columns each row is missing
//!
//! Both are pure functions of the dataset they are given.

use serde::Serialize;

use crate::error::WrangleResult;
use crate::processing::{reduce, ReduceOp};
use crate::types::{DataSet, Value};

/// Missing-value statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnNulls {
    pub column: String,
    pub num_rows_missing: usize,
    /// `num_rows_missing / row_count * 100`; `0.0` for an empty dataset.
    pub percent_rows_missing: f64,
}

/// One entry per column, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnNullReport {
    pub columns: Vec<ColumnNulls>,
}

impl ColumnNullReport {
    /// Entry for `column`, if present.
    pub fn get(&self, column: &str) -> Option<&ColumnNulls> {
        self.columns.iter().find(|c| c.column == column)
    }

    /// Serialize the report as a JSON array.
    pub fn to_json(&self) -> WrangleResult<String> {
        Ok(serde_json::to_string_pretty(&self.columns)?)
    }
}

/// Rows sharing the same number of missing columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowNullBucket {
    pub num_cols_missing: usize,
    /// `num_cols_missing / column_count * 100`; `0.0` for a dataset without columns.
    pub percent_cols_missing: f64,
    pub num_rows: usize,
}

/// Buckets ordered by ascending `num_cols_missing`; bucket sizes sum to the row count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowNullHistogram {
    pub buckets: Vec<RowNullBucket>,
}

impl RowNullHistogram {
    /// Total rows across all buckets.
    pub fn total_rows(&self) -> usize {
        self.buckets.iter().map(|b| b.num_rows).sum()
    }

    /// Serialize the histogram as a JSON array.
    pub fn to_json(&self) -> WrangleResult<String> {
        Ok(serde_json::to_string_pretty(&self.buckets)?)
    }
}

/// Count and percentage of missing values in every column.
pub fn nulls_by_column(dataset: &DataSet) -> ColumnNullReport {
    let rows = dataset.row_count();
    let columns = dataset
        .schema
        .field_names()
        .map(|name| {
            let missing = match reduce(dataset, name, ReduceOp::NullCount) {
                Some(Value::Int64(n)) => n as usize,
                _ => 0,
            };
            ColumnNulls {
                column: name.to_string(),
                num_rows_missing: missing,
                percent_rows_missing: percent(missing, rows),
            }
        })
        .collect();
    ColumnNullReport { columns }
}

/// Histogram of per-row missing counts.
pub fn nulls_by_row(dataset: &DataSet) -> RowNullHistogram {
    let columns = dataset.column_count();
    // counts[k] = rows missing exactly k columns
    let counts = dataset.reduce_rows(vec![0usize; columns + 1], |mut acc, row| {
        // cells past the schema width are not counted
        let missing = row.iter().take(columns).filter(|v| v.is_null()).count();
        acc[missing] += 1;
        acc
    });

    let buckets = counts
        .into_iter()
        .enumerate()
        .filter(|(_, n)| *n > 0)
        .map(|(missing, n)| RowNullBucket {
            num_cols_missing: missing,
            percent_cols_missing: percent(missing, columns),
            num_rows: n,
        })
        .collect();
    RowNullHistogram { buckets }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema};

    fn sample() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("parcelid", DataType::Int64),
            Field::new("poolcnt", DataType::Int64),
            Field::new("lotsizesquarefeet", DataType::Float64),
            Field::new("heatingorsystemdesc", DataType::Utf8),
        ]);
        DataSet::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Null, Value::Float64(10.0), Value::Utf8("Central".into())],
                vec![Value::Int64(2), Value::Null, Value::Null, Value::Utf8("Floor/Wall".into())],
                vec![Value::Int64(3), Value::Int64(1), Value::Float64(f64::NAN), Value::Null],
                vec![Value::Int64(4), Value::Null, Value::Float64(12.0), Value::Utf8("Central".into())],
            ],
        )
    }

    #[test]
    fn column_report_counts_and_percentages() {
        let report = nulls_by_column(&sample());
        assert_eq!(report.columns.len(), 4);

        let pool = report.get("poolcnt").unwrap();
        assert_eq!(pool.num_rows_missing, 3);
        assert_eq!(pool.percent_rows_missing, 75.0);

        let lot = report.get("lotsizesquarefeet").unwrap();
        assert_eq!(lot.num_rows_missing, 2);
        assert_eq!(lot.percent_rows_missing, 50.0);

        assert_eq!(report.get("parcelid").unwrap().num_rows_missing, 0);
    }

    #[test]
    fn row_histogram_groups_rows_by_missing_count() {
        let hist = nulls_by_row(&sample());
        assert_eq!(
            hist.buckets,
            vec![
                RowNullBucket { num_cols_missing: 1, percent_cols_missing: 25.0, num_rows: 2 },
                RowNullBucket { num_cols_missing: 2, percent_cols_missing: 50.0, num_rows: 2 },
            ]
        );
        assert_eq!(hist.total_rows(), 4);
    }

    #[test]
    fn row_histogram_ignores_cells_past_schema_width() {
        let mut ds = sample();
        ds.rows[0].push(Value::Null);
        ds.rows[0].push(Value::Null);
        assert_eq!(nulls_by_row(&ds), nulls_by_row(&sample()));
    }

    #[test]
    fn empty_dataset_reports_zero_percent() {
        let ds = sample().filter_rows(|_| false);
        let report = nulls_by_column(&ds);
        assert!(report.columns.iter().all(|c| c.num_rows_missing == 0 && c.percent_rows_missing == 0.0));
        assert!(nulls_by_row(&ds).buckets.is_empty());
    }

    #[test]
    fn reports_serialize_to_json() {
        let json = nulls_by_column(&sample()).to_json().unwrap();
        assert!(json.contains("\"column\": \"poolcnt\""));
        assert!(json.contains("\"num_rows_missing\": 3"));

        let json = nulls_by_row(&sample()).to_json().unwrap();
        assert!(json.contains("\"num_cols_missing\": 2"));
    }
}
