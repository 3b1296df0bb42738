//! Acquisition entrypoints and implementations.
//!
//! Most callers should use [`Acquirer::acquire`] (from [`acquire`]) which:
//!
//! - reads the query-keyed cache entry if present ([`crate::cache::CsvCache`])
//! - otherwise resolves a connection, runs [`properties_query`] through a [`PropertySource`] and
//!   writes the cache entry
//! - optionally reports cache hits/misses, failures and alerts to a
//!   [`crate::observability::WrangleObserver`]
//!
//! Lower-level pieces:
//! - [`csv`]: the indexed CSV format of cache entries
//! - [`source`]: the connection-resolver and query-execution seams
//! - `connectorx` (feature `db_connectorx`): a live database [`PropertySource`]

pub mod acquire;
#[cfg(feature = "db_connectorx")]
pub mod connectorx;
pub mod csv;
pub mod source;

pub use acquire::{properties_query, AcquireOptions, Acquirer, AcquisitionOrigin, LOOKUP_TABLES};
#[cfg(feature = "db_connectorx")]
pub use self::connectorx::ConnectorXSource;
pub use source::{ConnectionResolver, MySqlUrlResolver, PropertySource};
