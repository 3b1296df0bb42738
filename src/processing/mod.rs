//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by acquisition and
//! provides the primitives the cleaning pipeline is built from:
//!
//! - [`filter()`], [`exclude_values`], [`drop_null_rows`]: row filtering
//! - [`map()`], [`fill_nulls`]: row mapping and imputation
//! - [`reduce()`]: column reductions (count/null count/sum/min/max/median)
//!
//! ## Example: exclude → impute → reduce
//!
//! ```rust
//! use property_wrangle::processing::{exclude_values, fill_nulls, reduce, ReduceOp};
//! use property_wrangle::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("propertylandusedesc", DataType::Utf8),
//!     Field::new("lotsizesquarefeet", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("Single Family Residential".into()), Value::Float64(4000.0)],
//!         vec![Value::Utf8("Condominium".into()), Value::Float64(900.0)],
//!         vec![Value::Utf8("Single Family Residential".into()), Value::Null],
//!         vec![Value::Null, Value::Float64(6000.0)],
//!     ],
//! );
//!
//! let houses = exclude_values(&ds, "propertylandusedesc", &["Condominium"]).unwrap();
//! let median = reduce(&houses, "lotsizesquarefeet", ReduceOp::Median).unwrap();
//! assert_eq!(median, Value::Float64(5000.0));
//!
//! let filled = fill_nulls(&houses, "lotsizesquarefeet", median).unwrap();
//! assert_eq!(reduce(&filled, "lotsizesquarefeet", ReduceOp::NullCount), Some(Value::Int64(0)));
//! ```

pub mod filter;
pub mod map;
pub mod reduce;

pub use filter::{drop_null_rows, exclude_values, filter};
pub use map::{fill_nulls, map};
pub use reduce::{reduce, ReduceOp};
