//! `property-wrangle` acquires a property-transaction dataset, audits its missing values, and
//! cleans it for modeling.
//!
//! The dataset joins a properties table to each parcel's most recent transaction (with its
//! log-error) and to seven descriptive lookup tables. It lives in memory as a
//! [`types::DataSet`] whose cells are typed [`types::Value`]s.
//!
//! ## Pipeline
//!
//! - **Acquire**: [`ingestion::Acquirer::acquire`] reads the query-keyed cache entry
//!   ([`cache::CsvCache`]) if present, otherwise resolves a connection, runs
//!   [`ingestion::properties_query`] through an [`ingestion::PropertySource`], and writes the
//!   cache entry.
//! - **Audit**: [`audit::nulls_by_column`] and [`audit::nulls_by_row`] report missing values per
//!   column and as a per-row histogram.
//! - **Clean**: [`cleaning::clean`] runs the fixed nine-step pipeline and returns a
//!   [`cleaning::CleanedDataset`].
//!
//! Each stage takes the dataset explicitly; nothing re-acquires behind the caller's back.
//!
//! ## Example
//!
//! ```rust
//! use property_wrangle::audit::{nulls_by_column, nulls_by_row};
//! use property_wrangle::cleaning::exclude_land_uses;
//! use property_wrangle::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("parcelid", DataType::Int64),
//!     Field::new("propertylandusedesc", DataType::Utf8),
//!     Field::new("poolcnt", DataType::Int64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1), Value::Utf8("Single Family Residential".into()), Value::Null],
//!         vec![Value::Int64(2), Value::Utf8("Condominium".into()), Value::Int64(1)],
//!     ],
//! );
//!
//! let cols = nulls_by_column(&ds);
//! assert_eq!(cols.get("poolcnt").unwrap().percent_rows_missing, 50.0);
//! assert_eq!(nulls_by_row(&ds).total_rows(), 2);
//!
//! let houses = exclude_land_uses(&ds).unwrap();
//! assert_eq!(houses.row_count(), 1);
//! ```
//!
//! ## Live database access
//!
//! Enable the `db_connectorx` feature for `ingestion::ConnectorXSource`, which runs the query
//! through ConnectorX. Without it, supply any `Fn(&str, &str) -> WrangleResult<DataSet>` as the
//! source.
//!
//! ## Modules
//!
//! - [`ingestion`]: acquisition, the cache file format, and the source seams
//! - [`cache`]: query-keyed cache entries
//! - [`audit`]: missing-value reports
//! - [`cleaning`]: the cleaning pipeline and its steps
//! - [`processing`]: filter/map/reduce primitives the pipeline is built from
//! - [`observability`]: observer hooks for logging and alerts
//! - [`types`]: schema + in-memory dataset types
//! - [`error`]: the crate error type

pub mod audit;
pub mod cache;
pub mod cleaning;
pub mod error;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod types;

pub use error::{WrangleError, WrangleResult};
