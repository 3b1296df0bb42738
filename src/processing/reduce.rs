//! Reduction operations for [`crate::types::DataSet`].

use crate::types::{DataSet, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count missing values (`Null` and `NaN`).
    NullCount,
    /// Median of numeric values, ignoring nulls. Always a float; even-length inputs average the
    /// two middle values.
    Median,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - `NullCount` always returns `Some(Value::Int64(_))`.
/// - `Median` returns `Some(Value::Null)` if the column has no numeric values.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;

    match op {
        ReduceOp::NullCount => Some(Value::Int64(dataset.column_null_count(idx) as i64)),
        ReduceOp::Median => Some(median(dataset, idx).map(Value::Float64).unwrap_or(Value::Null)),
    }
}

fn median(dataset: &DataSet, idx: usize) -> Option<f64> {
    let mut values: Vec<f64> = dataset.column_values(idx).filter_map(Value::as_f64).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::{reduce, ReduceOp};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn numeric_dataset_with_nulls() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("parcelid", DataType::Int64),
            Field::new("lotsizesquarefeet", DataType::Float64),
        ]);

        let rows = vec![
            vec![Value::Int64(1), Value::Float64(10.0)],
            vec![Value::Int64(2), Value::Null],
            vec![Value::Int64(3), Value::Float64(5.5)],
            vec![Value::Int64(8), Value::Float64(f64::NAN)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn reduce_null_count_counts_null_and_nan() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(
            reduce(&ds, "lotsizesquarefeet", ReduceOp::NullCount),
            Some(Value::Int64(2))
        );
        assert_eq!(reduce(&ds, "parcelid", ReduceOp::NullCount), Some(Value::Int64(0)));
    }

    #[test]
    fn reduce_median_handles_odd_and_even_lengths() {
        let ds = numeric_dataset_with_nulls();
        // non-null lot sizes: 10.0, 5.5
        assert_eq!(
            reduce(&ds, "lotsizesquarefeet", ReduceOp::Median),
            Some(Value::Float64(7.75))
        );
        // 1, 2, 3, 8
        assert_eq!(reduce(&ds, "parcelid", ReduceOp::Median), Some(Value::Float64(2.5)));

        let odd = ds.filter_rows(|row| !matches!(row[0], Value::Int64(8)));
        assert_eq!(reduce(&odd, "parcelid", ReduceOp::Median), Some(Value::Float64(2.0)));
    }

    #[test]
    fn reduce_returns_none_for_missing_column() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "missing", ReduceOp::NullCount), None);
        assert_eq!(reduce(&ds, "missing", ReduceOp::Median), None);
    }

    #[test]
    fn reduce_median_is_null_if_all_values_null() {
        let schema = Schema::new(vec![Field::new("lotsizesquarefeet", DataType::Float64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Null], vec![Value::Null]]);
        assert_eq!(
            reduce(&ds, "lotsizesquarefeet", ReduceOp::NullCount),
            Some(Value::Int64(2))
        );
        assert_eq!(reduce(&ds, "lotsizesquarefeet", ReduceOp::Median), Some(Value::Null));
    }
}
