//! Live database source backed by ConnectorX (feature `db_connectorx`).
//!
//! Query results arrive as Arrow record batches and are converted column by column into a
//! [`DataSet`]: integers to `Int64`, floats and decimals to `Float64`, booleans to `Bool`, and
//! everything else (dates included) to its display string.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType as ArrowType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use connectorx::prelude::{get_arrow, CXQuery, SourceConn};

use crate::error::{WrangleError, WrangleResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::source::PropertySource;

/// Runs queries through ConnectorX's Arrow destination.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConnectorXSource;

impl PropertySource for ConnectorXSource {
    fn fetch(&self, connection: &str, query: &str) -> WrangleResult<DataSet> {
        let source_conn = SourceConn::try_from(connection)?;
        let queries = [CXQuery::naked(query)];
        let destination = get_arrow(&source_conn, None, &queries, None)?;
        let batches = destination.arrow().map_err(|e| WrangleError::Source {
            message: e.to_string(),
        })?;
        record_batches_to_dataset(&batches)
    }
}

/// Convert Arrow record batches (sharing one schema) into a [`DataSet`].
pub fn record_batches_to_dataset(batches: &[RecordBatch]) -> WrangleResult<DataSet> {
    let Some(first) = batches.first() else {
        return Ok(DataSet::new(Schema::new(Vec::new()), Vec::new()));
    };

    let fields: Vec<Field> = first
        .schema()
        .fields()
        .iter()
        .map(|f| Field::new(f.name().clone(), map_arrow_type(f.data_type())))
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for batch in batches {
        let columns = batch
            .columns()
            .iter()
            .zip(&fields)
            .map(|(array, field)| column_values(array, field.data_type))
            .collect::<WrangleResult<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn map_arrow_type(t: &ArrowType) -> DataType {
    match t {
        ArrowType::Int8
        | ArrowType::Int16
        | ArrowType::Int32
        | ArrowType::Int64
        | ArrowType::UInt8
        | ArrowType::UInt16
        | ArrowType::UInt32
        | ArrowType::UInt64 => DataType::Int64,
        ArrowType::Float16
        | ArrowType::Float32
        | ArrowType::Float64
        | ArrowType::Decimal128(_, _)
        | ArrowType::Decimal256(_, _) => DataType::Float64,
        ArrowType::Boolean => DataType::Bool,
        _ => DataType::Utf8,
    }
}

fn column_values(array: &ArrayRef, data_type: DataType) -> WrangleResult<Vec<Value>> {
    let values = match data_type {
        DataType::Int64 => {
            let casted = cast(array, &ArrowType::Int64)?;
            let arr = casted.as_primitive::<Int64Type>();
            (0..arr.len())
                .map(|i| if arr.is_null(i) { Value::Null } else { Value::Int64(arr.value(i)) })
                .collect()
        }
        DataType::Float64 => {
            let casted = cast(array, &ArrowType::Float64)?;
            let arr = casted.as_primitive::<Float64Type>();
            (0..arr.len())
                .map(|i| if arr.is_null(i) { Value::Null } else { Value::Float64(arr.value(i)) })
                .collect()
        }
        DataType::Bool => {
            let arr = array.as_boolean();
            (0..arr.len())
                .map(|i| if arr.is_null(i) { Value::Null } else { Value::Bool(arr.value(i)) })
                .collect()
        }
        DataType::Utf8 => {
            let casted = cast(array, &ArrowType::Utf8)?;
            let arr = casted.as_string::<i32>();
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        Value::Null
                    } else {
                        Value::Utf8(arr.value(i).to_string())
                    }
                })
                .collect()
        }
    };
    Ok(values)
}
