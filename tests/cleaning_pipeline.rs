use property_wrangle::audit::nulls_by_row;
use property_wrangle::cleaning::{
    clean, coerce_numeric, drop_sparse_columns, drop_sparse_rows, exclude_land_uses,
    COLUMN_NULL_THRESHOLD, REDUNDANT_COLUMNS, ROW_NULL_THRESHOLD,
};
use property_wrangle::ingestion::csv::read_indexed_csv_from_path;
use property_wrangle::processing::drop_null_rows;
use property_wrangle::types::{DataSet, DataType, Field, Schema, Value};

fn zillow_sample() -> DataSet {
    read_indexed_csv_from_path("tests/fixtures/zillow_sample.csv").unwrap()
}

fn value(ds: &DataSet, label: u64, column: &str) -> Value {
    let row = ds.index.iter().position(|l| *l == label).unwrap();
    let col = ds.schema.index_of(column).unwrap();
    ds.rows[row][col].clone()
}

#[test]
fn clean_keeps_expected_rows_and_columns() {
    let cleaned = clean(&zillow_sample()).unwrap();
    let out = &cleaned.data;

    // 2 = Condominium, 4 = Duplex, 6 = Townhouse, 9 = too sparse, 8 = taxamount still null
    assert_eq!(out.index, vec![0, 1, 3, 5, 7, 10, 11]);
    assert_eq!(
        out.schema.field_names().collect::<Vec<_>>(),
        vec![
            "parcelid",
            "bathroomcnt",
            "bedroomcnt",
            "buildingqualitytypeid",
            "calculatedfinishedsquarefeet",
            "latitude",
            "longitude",
            "lotsizesquarefeet",
            "taxamount",
            "logerror",
            "transactiondate",
        ]
    );
}

#[test]
fn clean_removes_every_redundant_column() {
    let cleaned = clean(&zillow_sample()).unwrap();
    for name in REDUNDANT_COLUMNS {
        assert_eq!(cleaned.data.schema.index_of(name), None, "{name} survived");
    }
    assert_eq!(cleaned.data.schema.index_of("heatingorsystemdesc"), None);
    // 10 of 12 rows missing; dropped as sparse
    assert_eq!(cleaned.data.schema.index_of("poolcnt"), None);
}

#[test]
fn clean_imputes_medians_computed_after_filtering() {
    let out = clean(&zillow_sample()).unwrap().data;

    // quality ratings 4,5,6,7,8,8 -> 6.5, which promotes the column to floats
    assert_eq!(value(&out, 3, "buildingqualitytypeid"), Value::Float64(6.5));
    assert_eq!(value(&out, 11, "buildingqualitytypeid"), Value::Float64(6.5));
    assert_eq!(value(&out, 0, "buildingqualitytypeid"), Value::Float64(6.0));
    assert_eq!(value(&out, 5, "lotsizesquarefeet"), Value::Float64(6000.0));
    assert_eq!(value(&out, 7, "calculatedfinishedsquarefeet"), Value::Float64(1800.0));
}

#[test]
fn condominium_is_excluded_and_single_family_retained() {
    let raw = zillow_sample();
    let out = exclude_land_uses(&raw).unwrap();
    let land_use = out.schema.index_of("propertylandusedesc").unwrap();

    assert!(out
        .column_values(land_use)
        .all(|v| *v != Value::Utf8("Condominium".to_string())));
    assert!(out.index.contains(&0));
    assert_eq!(
        value(&out, 0, "propertylandusedesc"),
        Value::Utf8("Single Family Residential".to_string())
    );
    assert!(clean(&raw).unwrap().data.index.contains(&0));
    assert!(!clean(&raw).unwrap().data.index.contains(&2));
}

#[test]
fn clean_returns_input_row_histogram_without_filtering_on_it() {
    let raw = zillow_sample();
    let cleaned = clean(&raw).unwrap();
    assert_eq!(cleaned.row_nulls_before, nulls_by_row(&raw));
    assert_eq!(cleaned.row_nulls_before.total_rows(), raw.row_count());
}

/// Numeric coercion runs after the null-row drop, so the transaction date (text) comes out as
/// nulls. This is a known defect of the pipeline order; it is kept and reported, not fixed.
#[test]
fn coercion_reintroduces_nulls_in_transaction_date() {
    let cleaned = clean(&zillow_sample()).unwrap();
    assert!(cleaned.has_coercion_nulls());
    assert_eq!(cleaned.coercion_nulls, vec![("transactiondate".to_string(), 7)]);

    let out = &cleaned.data;
    for field in &out.schema.fields {
        assert!(
            matches!(field.data_type, DataType::Int64 | DataType::Float64),
            "{} is {:?}",
            field.name,
            field.data_type
        );
    }
    let date = out.schema.index_of("transactiondate").unwrap();
    for (idx, field) in out.schema.fields.iter().enumerate() {
        let nulls = out.column_null_count(idx);
        if idx == date {
            assert_eq!(nulls, out.row_count());
        } else {
            assert_eq!(nulls, 0, "unexpected nulls in {}", field.name);
        }
    }
}

#[test]
fn clean_errors_when_expected_column_is_missing() {
    let raw = zillow_sample().drop_columns(&["unitcnt"]).unwrap();
    let err = clean(&raw).unwrap_err();
    assert!(err.to_string().contains("missing required column 'unitcnt'"));

    let raw = zillow_sample().drop_columns(&["propertylandusedesc"]).unwrap();
    assert!(clean(&raw).is_err());
}

fn ten_by_five() -> DataSet {
    let schema = Schema::new(vec![
        Field::new("parcelid", DataType::Int64),
        Field::new("propertylandusedesc", DataType::Utf8),
        Field::new("lotsizesquarefeet", DataType::Float64),
        Field::new("bedroomcnt", DataType::Float64),
        Field::new("logerror", DataType::Float64),
    ]);
    let rows = (0..10)
        .map(|i| {
            let land_use = if i == 3 {
                "Duplex (2 Units, Any Combination)"
            } else {
                "Single Family Residential"
            };
            // five nulls, none on the duplex row
            let lot = if [0, 2, 5, 7, 9].contains(&i) {
                Value::Null
            } else {
                Value::Float64(5000.0 + i as f64)
            };
            vec![
                Value::Int64(100 + i),
                Value::Utf8(land_use.to_string()),
                lot,
                Value::Float64(3.0),
                Value::Float64(0.01 * i as f64),
            ]
        })
        .collect();
    DataSet::new(schema, rows)
}

#[test]
fn ten_row_table_loses_duplex_row_and_sparse_column() {
    let ds = ten_by_five();
    let ds = exclude_land_uses(&ds).unwrap();
    let ds = drop_sparse_columns(&ds, COLUMN_NULL_THRESHOLD);
    let ds = drop_sparse_rows(&ds, ROW_NULL_THRESHOLD);
    let ds = drop_null_rows(&ds);
    let (out, lost) = coerce_numeric(&ds);

    assert_eq!(out.row_count(), 9);
    assert!(!out.index.contains(&3));
    assert_eq!(out.schema.index_of("lotsizesquarefeet"), None);
    assert_eq!(out.column_count(), 4);
    // the land-use text is coerced away
    assert_eq!(lost, vec![("propertylandusedesc".to_string(), 9)]);
}

#[test]
fn ten_row_table_through_full_clean_reports_missing_columns() {
    let err = clean(&ten_by_five()).unwrap_err();
    assert!(err.to_string().contains("schema mismatch"));
}
