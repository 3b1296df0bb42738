//! Observer hooks for acquisition and cleaning events.
//!
//! Nothing in this crate logs on its own; callers attach a [`WrangleObserver`] through
//! [`crate::ingestion::AcquireOptions`] or [`crate::cleaning::clean_observed`].

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::WrangleError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WrangleSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, e.g. nulls reintroduced by numeric coercion).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (I/O and other infrastructure failures).
    Critical,
}

impl WrangleSeverity {
    /// Classify an error. I/O failures, including I/O wrapped by the CSV layer, are critical.
    pub fn for_error(e: &WrangleError) -> Self {
        match e {
            WrangleError::Io(_) => Self::Critical,
            WrangleError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            WrangleError::Json(_) => Self::Error,
            WrangleError::Source { .. } => Self::Critical,
            #[cfg(feature = "db_connectorx")]
            WrangleError::ConnectorX(_) => Self::Critical,
            #[cfg(feature = "arrow")]
            WrangleError::Arrow(_) => Self::Error,
            WrangleError::SchemaMismatch { .. } => Self::Error,
            WrangleError::ParseError { .. } => Self::Error,
        }
    }
}

/// Observer interface for acquisition and cleaning outcomes.
///
/// Every callback defaults to a no-op.
pub trait WrangleObserver: Send + Sync {
    /// The cache entry at `path` existed and was read.
    fn on_cache_hit(&self, _path: &Path, _rows: usize) {}

    /// No cache entry existed at `path`; the source will be queried.
    fn on_cache_miss(&self, _path: &Path) {}

    /// A freshly fetched dataset was written to `path`.
    fn on_cache_written(&self, _path: &Path, _rows: usize) {}

    /// A cleaning step finished, leaving `rows` x `columns`.
    fn on_step(&self, _step: &str, _rows: usize, _columns: usize) {}

    /// Non-fatal data-quality warning.
    fn on_warning(&self, _message: &str) {}

    /// An operation failed.
    fn on_failure(&self, _severity: WrangleSeverity, _error: &WrangleError) {}

    /// A failure met the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, severity: WrangleSeverity, error: &WrangleError) {
        self.on_failure(severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn WrangleObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn WrangleObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl WrangleObserver for CompositeObserver {
    fn on_cache_hit(&self, path: &Path, rows: usize) {
        for o in &self.observers {
            o.on_cache_hit(path, rows);
        }
    }

    fn on_cache_miss(&self, path: &Path) {
        for o in &self.observers {
            o.on_cache_miss(path);
        }
    }

    fn on_cache_written(&self, path: &Path, rows: usize) {
        for o in &self.observers {
            o.on_cache_written(path, rows);
        }
    }

    fn on_step(&self, step: &str, rows: usize, columns: usize) {
        for o in &self.observers {
            o.on_step(step, rows, columns);
        }
    }

    fn on_warning(&self, message: &str) {
        for o in &self.observers {
            o.on_warning(message);
        }
    }

    fn on_failure(&self, severity: WrangleSeverity, error: &WrangleError) {
        for o in &self.observers {
            o.on_failure(severity, error);
        }
    }

    fn on_alert(&self, severity: WrangleSeverity, error: &WrangleError) {
        for o in &self.observers {
            o.on_alert(severity, error);
        }
    }
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl WrangleObserver for StdErrObserver {
    fn on_cache_hit(&self, path: &Path, rows: usize) {
        eprintln!("[acquire][cache-hit] path={} rows={rows}", path.display());
    }

    fn on_cache_miss(&self, path: &Path) {
        eprintln!("[acquire][cache-miss] path={}", path.display());
    }

    fn on_cache_written(&self, path: &Path, rows: usize) {
        eprintln!("[acquire][cache-written] path={} rows={rows}", path.display());
    }

    fn on_step(&self, step: &str, rows: usize, columns: usize) {
        eprintln!("[clean][{step}] rows={rows} columns={columns}");
    }

    fn on_warning(&self, message: &str) {
        eprintln!("[wrangle][Warning] {message}");
    }

    fn on_failure(&self, severity: WrangleSeverity, error: &WrangleError) {
        eprintln!("[wrangle][{severity:?}] err={error}");
    }

    fn on_alert(&self, severity: WrangleSeverity, error: &WrangleError) {
        eprintln!("[ALERT][wrangle][{severity:?}] err={error}");
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", unix_ts());
        }
    }
}

impl WrangleObserver for FileObserver {
    fn on_cache_hit(&self, path: &Path, rows: usize) {
        self.append_line(&format!("cache-hit path={} rows={rows}", path.display()));
    }

    fn on_cache_miss(&self, path: &Path) {
        self.append_line(&format!("cache-miss path={}", path.display()));
    }

    fn on_cache_written(&self, path: &Path, rows: usize) {
        self.append_line(&format!("cache-written path={} rows={rows}", path.display()));
    }

    fn on_step(&self, step: &str, rows: usize, columns: usize) {
        self.append_line(&format!("step={step} rows={rows} columns={columns}"));
    }

    fn on_warning(&self, message: &str) {
        self.append_line(&format!("warning {message}"));
    }

    fn on_failure(&self, severity: WrangleSeverity, error: &WrangleError) {
        self.append_line(&format!("fail severity={severity:?} err={error}"));
    }

    fn on_alert(&self, severity: WrangleSeverity, error: &WrangleError) {
        self.append_line(&format!("ALERT severity={severity:?} err={error}"));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
