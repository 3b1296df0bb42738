//! Query-keyed cache of acquired datasets.
//!
//! Each entry is a flat indexed CSV file named `<stem>-<key>.csv`, where `key` is derived from the
//! SHA-256 of the query text that produced it. A changed query therefore never reads an entry
//! written for a different one; stale entries are only removed by [`CsvCache::invalidate`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::WrangleResult;
use crate::ingestion::csv::{read_indexed_csv_from_path, write_indexed_csv_to_path};
use crate::types::DataSet;

/// Hex characters of the digest kept in entry file names.
const KEY_LEN: usize = 16;

/// Cache key for the dataset produced by `query`.
pub fn cache_key(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..KEY_LEN].to_string()
}

/// A directory of CSV cache entries sharing a file-name stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvCache {
    dir: PathBuf,
    stem: String,
}

impl CsvCache {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    /// Path of the entry for `query`, whether or not it exists.
    pub fn entry_path(&self, query: &str) -> PathBuf {
        self.dir
            .join(format!("{}-{}.csv", self.stem, cache_key(query)))
    }

    /// Whether an entry for `query` exists on disk.
    pub fn contains(&self, query: &str) -> bool {
        self.entry_path(query).is_file()
    }

    /// Read the entry for `query`, if present.
    pub fn lookup(&self, query: &str) -> WrangleResult<Option<DataSet>> {
        let path = self.entry_path(query);
        if !path.is_file() {
            return Ok(None);
        }
        read_indexed_csv_from_path(&path).map(Some)
    }

    /// Write `dataset` as the entry for `query`, replacing any previous entry.
    ///
    /// The file is written next to the entry as `<entry>.tmp` and renamed into place, so a failed
    /// write never leaves a partial entry behind.
    pub fn store(&self, query: &str, dataset: &DataSet) -> WrangleResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.entry_path(query);
        let tmp = tmp_path(&path);
        let written = write_indexed_csv_to_path(dataset, &tmp)
            .and_then(|()| fs::rename(&tmp, &path).map_err(Into::into));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(path)
    }

    /// Remove the entry for `query`. Returns whether an entry was removed.
    pub fn invalidate(&self, query: &str) -> WrangleResult<bool> {
        remove_if_present(&self.entry_path(query))
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn remove_if_present(path: &Path) -> WrangleResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
