//! Row and column mapping for [`crate::types::DataSet`].

use crate::error::WrangleResult;
use crate::types::{DataSet, DataType, Value};

/// Returns a new [`DataSet`] by applying `mapper` to every row.
///
/// This is a convenience wrapper around [`DataSet::map_rows`].
///
/// # Panics
///
/// Panics if `mapper` returns rows with a different length than the schema field count.
pub fn map<F>(dataset: &DataSet, mapper: F) -> DataSet
where
    F: FnMut(&[Value]) -> Vec<Value>,
{
    dataset.map_rows(mapper)
}

/// Replace missing values in `column` with `fill`.
///
/// Filling an integer column with a fractional float promotes the whole column to
/// [`DataType::Float64`], so the column stays homogeneous.
pub fn fill_nulls(dataset: &DataSet, column: &str, fill: Value) -> WrangleResult<DataSet> {
    let idx = dataset.schema.require(column)?;
    let promote = dataset.schema.fields[idx].data_type == DataType::Int64
        && matches!(fill, Value::Float64(v) if v.fract() != 0.0);
    let fill = match fill {
        Value::Float64(v) if !promote && dataset.schema.fields[idx].data_type == DataType::Int64 => {
            Value::Int64(v as i64)
        }
        other => other,
    };

    let mut out = map(dataset, |row| {
        let mut out = row.to_vec();
        if out[idx].is_null() {
            out[idx] = fill.clone();
        } else if promote {
            if let Value::Int64(v) = out[idx] {
                out[idx] = Value::Float64(v as f64);
            }
        }
        out
    });
    if promote {
        out.schema.fields[idx].data_type = DataType::Float64;
    }
    Ok(out)
}
