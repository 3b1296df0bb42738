//! Indexed CSV reading and writing (the cache artifact format).
//!
//! The layout is the one a dataframe writes with its index included: the first column holds row
//! labels (its header is usually empty) and the remaining columns hold data. Nothing records the
//! column types, so reading infers one [`DataType`] per column.

use std::io;
use std::path::Path;

use crate::error::{WrangleError, WrangleResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Read an indexed CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The CSV must have headers.
/// - The first column is the row index and must hold unsigned integers.
/// - Empty cells map to [`Value::Null`].
/// - Column types are inferred with [`infer_data_type`].
pub fn read_indexed_csv_from_path(path: impl AsRef<Path>) -> WrangleResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    read_indexed_csv_from_reader(&mut rdr)
}

/// Read indexed CSV data from an existing CSV reader.
pub fn read_indexed_csv_from_reader<R: io::Read>(rdr: &mut csv::Reader<R>) -> WrangleResult<DataSet> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(WrangleError::SchemaMismatch {
            message: "csv has no index column".to_string(),
        });
    }
    let names: Vec<String> = headers.iter().skip(1).map(str::to_owned).collect();

    let records = rdr.records().collect::<Result<Vec<_>, _>>()?;

    let mut index = Vec::with_capacity(records.len());
    for (row_idx0, record) in records.iter().enumerate() {
        // 1-based for users, +1 again for the header row.
        let user_row = row_idx0 + 2;
        let raw = record.get(0).unwrap_or("");
        let label = raw.trim().parse::<u64>().map_err(|e| WrangleError::ParseError {
            row: user_row,
            column: headers.get(0).unwrap_or("").to_owned(),
            raw: raw.to_owned(),
            message: e.to_string(),
        })?;
        index.push(label);
    }

    let fields: Vec<Field> = names
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let cells = records.iter().map(|r| r.get(col + 1).unwrap_or(""));
            Field::new(name.clone(), infer_data_type(cells))
        })
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(records.len());
    for (row_idx0, record) in records.iter().enumerate() {
        let user_row = row_idx0 + 2;
        let mut row = Vec::with_capacity(fields.len());
        for (col, field) in fields.iter().enumerate() {
            let raw = record.get(col + 1).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::with_index(Schema::new(fields), rows, index))
}

/// Infer the narrowest [`DataType`] that parses every non-empty cell.
///
/// Tries `Int64`, then `Float64`, then `Bool`, falling back to `Utf8`. A column with no
/// non-empty cells is `Float64`, the way an all-missing numeric column reads back.
pub fn infer_data_type<'a>(cells: impl Iterator<Item = &'a str>) -> DataType {
    let cells: Vec<&str> = cells.map(str::trim).filter(|c| !c.is_empty()).collect();
    if cells.is_empty() {
        DataType::Float64
    } else if cells.iter().all(|c| c.parse::<i64>().is_ok()) {
        DataType::Int64
    } else if cells.iter().all(|c| c.parse::<f64>().is_ok()) {
        DataType::Float64
    } else if cells.iter().all(|c| parse_bool(c).is_ok()) {
        DataType::Bool
    } else {
        DataType::Utf8
    }
}

/// Write `dataset` as indexed CSV to `path`, creating or truncating the file.
pub fn write_indexed_csv_to_path(dataset: &DataSet, path: impl AsRef<Path>) -> WrangleResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_indexed_csv_to_writer(dataset, &mut wtr)?;
    wtr.flush()?;
    Ok(())
}

/// Write `dataset` as indexed CSV to an existing CSV writer.
pub fn write_indexed_csv_to_writer<W: io::Write>(
    dataset: &DataSet,
    wtr: &mut csv::Writer<W>,
) -> WrangleResult<()> {
    let mut header = vec![""];
    header.extend(dataset.schema.field_names());
    wtr.write_record(&header)?;

    for (label, row) in dataset.index.iter().zip(&dataset.rows) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(label.to_string());
        record.extend(row.iter().map(format_value));
        wtr.write_record(&record)?;
    }
    Ok(())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) if v.is_nan() => String::new(),
        // Debug keeps a trailing `.0`, so floats read back as floats.
        Value::Float64(v) => format!("{v:?}"),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Utf8(s) => s.clone(),
    }
}

fn parse_typed_value(row: usize, column: &str, data_type: DataType, raw: &str) -> WrangleResult<Value> {
    // Text reads back byte-for-byte; only the typed parses tolerate padding.
    let trimmed = raw.trim();
    if raw.is_empty() || (data_type != DataType::Utf8 && trimmed.is_empty()) {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| WrangleError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(raw.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err("expected bool (true/false)".to_string()),
    }
}
