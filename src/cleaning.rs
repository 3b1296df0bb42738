//! The cleaning pipeline that turns the raw property dataset into an analysis-ready table.
//!
//! [`clean`] applies, in order:
//!
//! 1. [`exclude_land_uses`]: drop multi-unit and commercial properties ([`EXCLUDED_LAND_USES`])
//! 2. drop [`REDUNDANT_COLUMNS`]
//! 3. [`drop_sparse_columns`] above [`COLUMN_NULL_THRESHOLD`]
//! 4. [`drop_sparse_rows`] above [`ROW_NULL_THRESHOLD`]
//! 5. drop [`HEATING_DESC_COLUMN`]
//! 6. [`impute_median`] for `buildingqualitytypeid` and `lotsizesquarefeet`
//! 7. [`impute_median`] for `calculatedfinishedsquarefeet`
//! 8. [`drop_null_rows`]
//! 9. [`coerce_numeric`]
//!
//! Every step is also usable on its own. An expected column that is absent is a
//! [`crate::WrangleError::SchemaMismatch`].
//!
//! Step 9 runs after the null drop, so text columns that survive to it (the transaction date, in
//! practice) come out as nulls. Those are reported in [`CleanedDataset::coercion_nulls`] rather
//! than removed.

use crate::audit::{nulls_by_row, RowNullHistogram};
use crate::error::WrangleResult;
use crate::observability::WrangleObserver;
use crate::processing::{drop_null_rows, exclude_values, fill_nulls, reduce, ReduceOp};
use crate::types::{DataSet, DataType, Value};

/// Land-use description column.
pub const LAND_USE_COLUMN: &str = "propertylandusedesc";

/// Land-use descriptions removed by step 1 (exact match).
pub const EXCLUDED_LAND_USES: [&str; 5] = [
    "Duplex (2 Units, Any Combination)",
    "Condominium",
    "Commercial/Office/Residential Mixed Used",
    "Townhouse",
    "Triplex (3 Units, Any Combination)",
];

/// Columns removed by step 2.
pub const REDUNDANT_COLUMNS: [&str; 11] = [
    "id",
    "calculatedbathnbr",
    "finishedsquarefeet12",
    "fullbathcnt",
    "heatingorsystemtypeid",
    "propertycountylandusecode",
    "propertylandusetypeid",
    "propertyzoningdesc",
    "censustractandblock",
    "propertylandusedesc",
    "unitcnt",
];

/// Columns with a larger null fraction are dropped by step 3.
pub const COLUMN_NULL_THRESHOLD: f64 = 0.40;

/// Rows with a larger null fraction are dropped by step 4.
pub const ROW_NULL_THRESHOLD: f64 = 0.25;

/// Heating-system description, dropped by step 5.
pub const HEATING_DESC_COLUMN: &str = "heatingorsystemdesc";

/// Median-imputed in step 6.
pub const QUALITY_AND_LOT_COLUMNS: [&str; 2] = ["buildingqualitytypeid", "lotsizesquarefeet"];

/// Median-imputed in step 7.
pub const FINISHED_SQFT_COLUMN: &str = "calculatedfinishedsquarefeet";

/// Output of [`clean`].
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedDataset {
    /// The cleaned table.
    pub data: DataSet,
    /// Row-null histogram of the input, before any step ran.
    ///
    /// Reported for inspection only; no step filters on it.
    pub row_nulls_before: RowNullHistogram,
    /// Columns where numeric coercion turned values into nulls, with the count per column.
    pub coercion_nulls: Vec<(String, usize)>,
}

impl CleanedDataset {
    /// Whether coercion reintroduced nulls after the null-row drop.
    pub fn has_coercion_nulls(&self) -> bool {
        !self.coercion_nulls.is_empty()
    }
}

/// Run the full cleaning pipeline over `dataset`.
pub fn clean(dataset: &DataSet) -> WrangleResult<CleanedDataset> {
    run(dataset, None)
}

/// Like [`clean`], reporting each step's resulting shape to `observer`, plus a warning when
/// coercion reintroduces nulls.
pub fn clean_observed(dataset: &DataSet, observer: &dyn WrangleObserver) -> WrangleResult<CleanedDataset> {
    run(dataset, Some(observer))
}

fn run(dataset: &DataSet, observer: Option<&dyn WrangleObserver>) -> WrangleResult<CleanedDataset> {
    let report = |step: &str, ds: &DataSet| {
        if let Some(obs) = observer {
            obs.on_step(step, ds.row_count(), ds.column_count());
        }
    };

    let row_nulls_before = nulls_by_row(dataset);

    let ds = exclude_land_uses(dataset)?;
    report("exclude_land_uses", &ds);

    let ds = ds.drop_columns(&REDUNDANT_COLUMNS)?;
    report("drop_redundant_columns", &ds);

    let ds = drop_sparse_columns(&ds, COLUMN_NULL_THRESHOLD);
    report("drop_sparse_columns", &ds);

    let ds = drop_sparse_rows(&ds, ROW_NULL_THRESHOLD);
    report("drop_sparse_rows", &ds);

    let ds = ds.drop_columns(&[HEATING_DESC_COLUMN])?;
    report("drop_heating_description", &ds);

    let mut ds = ds;
    for column in QUALITY_AND_LOT_COLUMNS {
        ds = impute_median(&ds, column)?;
    }
    report("impute_quality_and_lot_size", &ds);

    let ds = impute_median(&ds, FINISHED_SQFT_COLUMN)?;
    report("impute_finished_square_feet", &ds);

    let ds = drop_null_rows(&ds);
    report("drop_null_rows", &ds);

    let (data, coercion_nulls) = coerce_numeric(&ds);
    report("coerce_numeric", &data);

    if let Some(obs) = observer {
        for (column, n) in &coercion_nulls {
            obs.on_warning(&format!(
                "numeric coercion left {n} null(s) in column '{column}' after the null-row drop"
            ));
        }
    }

    Ok(CleanedDataset {
        data,
        row_nulls_before,
        coercion_nulls,
    })
}

/// Step 1: drop rows whose land-use description is one of [`EXCLUDED_LAND_USES`].
pub fn exclude_land_uses(dataset: &DataSet) -> WrangleResult<DataSet> {
    exclude_values(dataset, LAND_USE_COLUMN, &EXCLUDED_LAND_USES)
}

/// Drop every column whose null fraction exceeds `threshold`. A column exactly at the threshold
/// is kept. Nothing is dropped from a dataset without rows.
pub fn drop_sparse_columns(dataset: &DataSet, threshold: f64) -> DataSet {
    let rows = dataset.row_count();
    if rows == 0 {
        return dataset.clone();
    }
    dataset.select_columns(|idx, _| {
        (dataset.column_null_count(idx) as f64 / rows as f64) <= threshold
    })
}

/// Drop every row whose null fraction, over the dataset's columns, exceeds `threshold`. A row
/// exactly at the threshold is kept.
pub fn drop_sparse_rows(dataset: &DataSet, threshold: f64) -> DataSet {
    let columns = dataset.column_count();
    if columns == 0 {
        return dataset.clone();
    }
    dataset.filter_rows(|row| {
        let missing = row.iter().filter(|v| v.is_null()).count();
        (missing as f64 / columns as f64) <= threshold
    })
}

/// Fill nulls in `column` with the median of its non-null values.
///
/// A column with no numeric values is returned unchanged.
pub fn impute_median(dataset: &DataSet, column: &str) -> WrangleResult<DataSet> {
    dataset.schema.require(column)?;
    match reduce(dataset, column, ReduceOp::Median) {
        Some(median @ Value::Float64(_)) => fill_nulls(dataset, column, median),
        _ => Ok(dataset.clone()),
    }
}

/// Convert every column to a numeric type.
///
/// Integers stay `Int64`; floats, and integer columns mixed with floats, become `Float64`;
/// booleans become `0`/`1`; strings are parsed, and anything unparseable becomes
/// [`Value::Null`]. Returns the converted dataset and, for each column where that happened,
/// how many values were lost.
pub fn coerce_numeric(dataset: &DataSet) -> (DataSet, Vec<(String, usize)>) {
    let mut out = dataset.map_rows(|row| row.iter().map(coerce_value).collect());
    let mut lost = Vec::new();

    for (idx, field) in out.schema.fields.iter_mut().enumerate() {
        let before = dataset.column_null_count(idx);
        let after = out.rows.iter().filter(|row| row[idx].is_null()).count();
        if after > before {
            lost.push((field.name.clone(), after - before));
        }

        let all_int = out
            .rows
            .iter()
            .all(|row| matches!(row[idx], Value::Int64(_) | Value::Null));
        let has_value = out.rows.iter().any(|row| !row[idx].is_null());
        field.data_type = if all_int && has_value {
            DataType::Int64
        } else {
            DataType::Float64
        };
    }

    for (idx, field) in out.schema.fields.iter().enumerate() {
        if field.data_type == DataType::Float64 {
            for row in &mut out.rows {
                if let Value::Int64(v) = row[idx] {
                    row[idx] = Value::Float64(v as f64);
                }
            }
        }
    }

    (out, lost)
}

fn coerce_value(value: &Value) -> Value {
    match value {
        Value::Null | Value::Int64(_) | Value::Float64(_) => value.clone(),
        Value::Bool(b) => Value::Int64(i64::from(*b)),
        Value::Utf8(s) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<i64>() {
                Value::Int64(v)
            } else if let Ok(v) = s.parse::<f64>() {
                Value::Float64(v)
            } else {
                Value::Null
            }
        }
    }
}
