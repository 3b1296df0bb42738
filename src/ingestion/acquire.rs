//! Dataset acquisition: cache first, database on a miss.
//!
//! [`Acquirer::acquire`] returns the raw joined property dataset. The cache layer is explicit
//! ([`crate::cache::CsvCache`]) and keyed by the query text, so changing the cutoff date (or any
//! other part of the query) fetches fresh data instead of reading a stale file.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::CsvCache;
use crate::cleaning::{clean, clean_observed, CleanedDataset};
use crate::error::WrangleResult;
use crate::observability::{WrangleObserver, WrangleSeverity};
use crate::types::DataSet;

use super::source::{ConnectionResolver, PropertySource};

/// Lookup tables left-joined onto the properties table, as `(table, alias, description column)`.
///
/// Each joins on `<table>id`.
pub const LOOKUP_TABLES: [(&str, &str, &str); 7] = [
    ("airconditioningtype", "air", "airconditioningdesc"),
    ("architecturalstyletype", "arch", "architecturalstyledesc"),
    ("buildingclasstype", "build", "buildingclassdesc"),
    ("heatingorsystemtype", "heat", "heatingorsystemdesc"),
    ("propertylandusetype", "landuse", "propertylandusedesc"),
    ("storytype", "story", "storydesc"),
    ("typeconstructiontype", "construct", "typeconstructiondesc"),
];

/// Build the acquisition query for transactions on or before `cutoff` (`YYYY-MM-DD`).
///
/// Properties are inner-joined to the latest transaction per `(parcelid, logerror)` and then
/// left-joined to every table in [`LOOKUP_TABLES`]. Rows without coordinates are excluded.
pub fn properties_query(cutoff: &str) -> String {
    let desc_columns: Vec<String> = LOOKUP_TABLES
        .iter()
        .map(|(_, alias, desc)| format!("{alias}.{desc}"))
        .collect();
    let joins: Vec<String> = LOOKUP_TABLES
        .iter()
        .map(|(table, alias, _)| format!("LEFT JOIN {table} {alias} USING ({table}id)"))
        .collect();

    format!(
        "SELECT prop.*, pred.logerror, pred.transactiondate, {desc} \
         FROM properties_2017 prop \
         INNER JOIN (SELECT parcelid, logerror, MAX(transactiondate) transactiondate \
                     FROM predictions_2017 \
                     GROUP BY parcelid, logerror) pred USING (parcelid) \
         {joins} \
         WHERE prop.latitude IS NOT NULL \
           AND prop.longitude IS NOT NULL \
           AND transactiondate <= '{cutoff}'",
        desc = desc_columns.join(", "),
        joins = joins.join(" "),
    )
}

/// Where an acquired dataset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionOrigin {
    /// Read from an existing cache entry.
    CacheHit { path: PathBuf },
    /// Queried from the source; the cache entry was written to `path`.
    Fetched { path: PathBuf },
}

/// Options controlling acquisition.
///
/// Use [`Default`] for the standard setup: cache entries in the working directory, database
/// `zillow`, transactions through 2017-12-31.
#[derive(Clone)]
pub struct AcquireOptions {
    /// Directory holding cache entries.
    pub cache_dir: PathBuf,
    /// File-name stem for cache entries.
    pub cache_stem: String,
    /// Database name handed to the [`ConnectionResolver`].
    pub database: String,
    /// Latest transaction date included (inclusive, `YYYY-MM-DD`).
    pub cutoff: String,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn WrangleObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: WrangleSeverity,
}

impl fmt::Debug for AcquireOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcquireOptions")
            .field("cache_dir", &self.cache_dir)
            .field("cache_stem", &self.cache_stem)
            .field("database", &self.database)
            .field("cutoff", &self.cutoff)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("."),
            cache_stem: "zillow".to_string(),
            database: "zillow".to_string(),
            cutoff: "2017-12-31".to_string(),
            observer: None,
            alert_at_or_above: WrangleSeverity::Critical,
        }
    }
}

/// Acquires the raw property dataset through a cache.
pub struct Acquirer<R, S> {
    resolver: R,
    source: S,
    cache: CsvCache,
    options: AcquireOptions,
}

impl<R: ConnectionResolver, S: PropertySource> Acquirer<R, S> {
    pub fn new(resolver: R, source: S, options: AcquireOptions) -> Self {
        let cache = CsvCache::new(options.cache_dir.clone(), options.cache_stem.clone());
        Self {
            resolver,
            source,
            cache,
            options,
        }
    }

    /// The query this acquirer runs on a cache miss.
    pub fn query(&self) -> String {
        properties_query(&self.options.cutoff)
    }

    /// The cache this acquirer reads and writes.
    pub fn cache(&self) -> &CsvCache {
        &self.cache
    }

    /// Return the raw dataset, from the cache entry if present, otherwise from the source.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use property_wrangle::ingestion::{AcquireOptions, Acquirer, MySqlUrlResolver};
    /// use property_wrangle::types::DataSet;
    ///
    /// # fn main() -> Result<(), property_wrangle::WrangleError> {
    /// let resolver = MySqlUrlResolver {
    ///     user: "analyst".into(),
    ///     host: "localhost".into(),
    ///     password: "secret".into(),
    /// };
    /// // Any `Fn(&str, &str) -> WrangleResult<DataSet>` works as a source.
    /// let source = |_conn: &str, _query: &str| -> property_wrangle::WrangleResult<DataSet> {
    ///     unimplemented!("run the query")
    /// };
    /// let acquirer = Acquirer::new(resolver, source, AcquireOptions::default());
    /// let ds = acquirer.acquire()?;
    /// println!("rows={}", ds.row_count());
    /// # Ok(())
    /// # }
    /// ```
    pub fn acquire(&self) -> WrangleResult<DataSet> {
        self.acquire_with_origin().map(|(ds, _)| ds)
    }

    /// Like [`Self::acquire`], also reporting whether the cache was hit.
    pub fn acquire_with_origin(&self) -> WrangleResult<(DataSet, AcquisitionOrigin)> {
        self.observed(self.acquire_inner())
    }

    /// Acquire the raw dataset and run [`crate::cleaning::clean`] over it.
    ///
    /// Cleaning steps are reported to the configured observer, if any.
    pub fn acquire_and_clean(&self) -> WrangleResult<CleanedDataset> {
        let ds = self.acquire()?;
        let cleaned = match self.options.observer.as_deref() {
            Some(obs) => clean_observed(&ds, obs),
            None => clean(&ds),
        };
        self.observed(cleaned)
    }

    /// Remove the cache entry for the current query, forcing the next call to fetch.
    pub fn invalidate(&self) -> WrangleResult<bool> {
        self.cache.invalidate(&self.query())
    }

    fn observed<T>(&self, result: WrangleResult<T>) -> WrangleResult<T> {
        if let (Some(obs), Err(e)) = (self.options.observer.as_ref(), &result) {
            let sev = WrangleSeverity::for_error(e);
            obs.on_failure(sev, e);
            if sev >= self.options.alert_at_or_above {
                obs.on_alert(sev, e);
            }
        }
        result
    }

    fn acquire_inner(&self) -> WrangleResult<(DataSet, AcquisitionOrigin)> {
        let query = self.query();
        let path = self.cache.entry_path(&query);

        if let Some(ds) = self.cache.lookup(&query)? {
            if let Some(obs) = self.options.observer.as_ref() {
                obs.on_cache_hit(&path, ds.row_count());
            }
            return Ok((ds, AcquisitionOrigin::CacheHit { path }));
        }

        if let Some(obs) = self.options.observer.as_ref() {
            obs.on_cache_miss(&path);
        }
        let connection = self.resolver.resolve(&self.options.database)?;
        let ds = self.source.fetch(&connection, &query)?;
        let path = self.cache.store(&query, &ds)?;
        if let Some(obs) = self.options.observer.as_ref() {
            obs.on_cache_written(&path, ds.row_count());
        }
        Ok((ds, AcquisitionOrigin::Fetched { path }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_joins_every_lookup_table_and_filters() {
        let q = properties_query("2017-12-31");
        for (table, alias, desc) in LOOKUP_TABLES {
            assert!(q.contains(&format!("LEFT JOIN {table} {alias} USING ({table}id)")));
            assert!(q.contains(&format!("{alias}.{desc}")));
        }
        assert!(q.contains("MAX(transactiondate) transactiondate"));
        assert!(q.contains("GROUP BY parcelid, logerror"));
        assert!(q.contains("prop.latitude IS NOT NULL"));
        assert!(q.contains("prop.longitude IS NOT NULL"));
        assert!(q.contains("transactiondate <= '2017-12-31'"));
    }

    #[test]
    fn query_tracks_cutoff() {
        assert_ne!(properties_query("2017-12-31"), properties_query("2017-06-30"));
    }
}
