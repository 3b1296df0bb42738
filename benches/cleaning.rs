use criterion::{black_box, criterion_group, criterion_main, Criterion};

use property_wrangle::audit::{nulls_by_column, nulls_by_row};
use property_wrangle::cleaning::clean;
use property_wrangle::ingestion::csv::read_indexed_csv_from_path;
use property_wrangle::types::DataSet;

/// The fixture repeated until it has roughly `rows` rows, with fresh row labels.
fn synthetic(rows: usize) -> DataSet {
    let base = read_indexed_csv_from_path("tests/fixtures/zillow_sample.csv")
        .expect("fixture readable");
    let copies = rows.div_ceil(base.row_count());
    let all_rows: Vec<_> = (0..copies).flat_map(|_| base.rows.iter().cloned()).collect();
    DataSet::new(base.schema.clone(), all_rows)
}

fn bench_cleaning(c: &mut Criterion) {
    let ds = synthetic(50_000);

    c.bench_function("nulls_by_column_50k", |b| b.iter(|| nulls_by_column(black_box(&ds))));
    c.bench_function("nulls_by_row_50k", |b| b.iter(|| nulls_by_row(black_box(&ds))));
    c.bench_function("clean_50k", |b| b.iter(|| clean(black_box(&ds)).expect("clean")));
}

criterion_group!(benches, bench_cleaning);
criterion_main!(benches);
