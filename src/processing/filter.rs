//! Row filtering for [`crate::types::DataSet`].

use crate::error::WrangleResult;
use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`DataSet::filter_rows`].
pub fn filter<F>(dataset: &DataSet, predicate: F) -> DataSet
where
    F: FnMut(&[Value]) -> bool,
{
    dataset.filter_rows(predicate)
}

/// Drop rows whose `column` holds a string exactly equal to one of `excluded`.
///
/// Nulls and any non-matching value pass through. Errors if `column` is absent.
pub fn exclude_values(dataset: &DataSet, column: &str, excluded: &[&str]) -> WrangleResult<DataSet> {
    let idx = dataset.schema.require(column)?;
    Ok(filter(dataset, |row| match row.get(idx) {
        Some(Value::Utf8(s)) => !excluded.contains(&s.as_str()),
        _ => true,
    }))
}

/// Drop every row holding at least one missing value.
pub fn drop_null_rows(dataset: &DataSet) -> DataSet {
    filter(dataset, |row| !row.iter().any(Value::is_null))
}

#[cfg(test)]
mod tests {
    use super::{drop_null_rows, exclude_values, filter};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("parcelid", DataType::Int64),
            Field::new("propertylandusedesc", DataType::Utf8),
            Field::new("lotsizesquarefeet", DataType::Float64),
        ]);

        let rows = vec![
            vec![
                Value::Int64(10),
                Value::Utf8("Single Family Residential".to_string()),
                Value::Float64(5000.0),
            ],
            vec![Value::Int64(11), Value::Utf8("Condominium".to_string()), Value::Null],
            vec![Value::Int64(12), Value::Null, Value::Float64(7200.0)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn filter_by_numeric_predicate_keeps_labels() {
        let ds = sample_dataset();
        let out = filter(&ds, |row| matches!(row[0], Value::Int64(v) if v > 10));
        assert_eq!(out.schema, ds.schema);
        assert_eq!(out.index, vec![1, 2]);
        // Input unchanged
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn exclude_values_matches_exact_strings_and_passes_nulls() {
        let ds = sample_dataset();
        let out = exclude_values(&ds, "propertylandusedesc", &["Condominium", "Townhouse"]).unwrap();
        assert_eq!(out.index, vec![0, 2]);

        let out = exclude_values(&ds, "propertylandusedesc", &["condominium"]).unwrap();
        assert_eq!(out.row_count(), 3);
    }

    #[test]
    fn exclude_values_errors_on_missing_column() {
        let ds = sample_dataset();
        let err = exclude_values(&ds, "landuse", &["Condominium"]).unwrap_err();
        assert!(err.to_string().contains("schema mismatch"));
    }

    #[test]
    fn drop_null_rows_removes_incomplete_rows() {
        let ds = sample_dataset();
        let out = drop_null_rows(&ds);
        assert_eq!(out.index, vec![0]);
    }

    #[test]
    fn drop_null_rows_can_return_empty_dataset() {
        let ds = sample_dataset().filter_rows(|row| row[2].is_null());
        assert!(drop_null_rows(&ds).rows.is_empty());
    }
}
