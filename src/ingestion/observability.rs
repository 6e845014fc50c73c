//! Load outcome reporting.
//!
//! [`super::load_from_path`] and [`super::load_csv_from_reader`] hand every outcome to the
//! [`LoadObserver`] configured in [`super::LoadOptions`]. Failures carry a [`LoadSeverity`];
//! those at or above the configured threshold are also raised through
//! [`LoadObserver::on_alert`].

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use crate::error::EngineError;
use crate::types::FileDataset;

use super::unified::InputFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// Informational event.
    Info,
    /// The upload was rejected (too large, wrong type, empty).
    Warning,
    /// The file could not be parsed.
    Error,
    /// Critical error (typically I/O).
    Critical,
}

impl LoadSeverity {
    /// Lowercase name of the severity.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

/// What was being loaded.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// Display name of the source (file name).
    pub name: String,
    /// The input path, when loading from disk.
    pub path: Option<PathBuf>,
    /// Format used for parsing, once known.
    pub format: Option<InputFormat>,
    /// Requested workbook sheet; `None` means the first sheet (or not a workbook).
    pub sheet: Option<String>,
}

/// Observer interface for load outcomes.
pub trait LoadObserver: Send + Sync {
    /// Called with the freshly built dataset when a file loads successfully.
    fn on_success(&self, _ctx: &LoadContext, _dataset: &FileDataset) {}

    /// Called when a load fails.
    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &EngineError) {}

    /// Called when a load failure meets the alert threshold.
    ///
    /// Defaults to [`Self::on_failure`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &EngineError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans every callback out to a set of observers, in insertion order.
///
/// ```rust
/// use std::sync::Arc;
/// use tabular_refine::ingestion::{CompositeObserver, FileObserver, TracingObserver};
///
/// let observer = CompositeObserver::default()
///     .with(Arc::new(TracingObserver))
///     .with(Arc::new(FileObserver::new("loads.jsonl")));
/// assert_eq!(observer.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct CompositeObserver(Vec<Arc<dyn LoadObserver>>);

impl CompositeObserver {
    /// Add an observer.
    pub fn with(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.0.push(observer);
        self
    }

    /// Number of observers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no observers were added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Arc<dyn LoadObserver>> for CompositeObserver {
    fn from_iter<I: IntoIterator<Item = Arc<dyn LoadObserver>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CompositeObserver").field(&self.0.len()).finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, dataset: &FileDataset) {
        self.0.iter().for_each(|o| o.on_success(ctx, dataset));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &EngineError) {
        self.0.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &EngineError) {
        self.0.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Emits load events as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_success(&self, ctx: &LoadContext, dataset: &FileDataset) {
        info!(
            file = %ctx.name,
            format = ?ctx.format,
            sheet = ?ctx.sheet,
            rows = dataset.total_rows,
            columns = dataset.total_columns,
            "load ok"
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &EngineError) {
        match severity {
            LoadSeverity::Info | LoadSeverity::Warning => {
                warn!(file = %ctx.name, format = ?ctx.format, ?severity, %error, "load rejected")
            }
            LoadSeverity::Error | LoadSeverity::Critical => {
                error!(file = %ctx.name, format = ?ctx.format, ?severity, %error, "load failed")
            }
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &EngineError) {
        error!(
            file = %ctx.name,
            format = ?ctx.format,
            ?severity,
            %error,
            alert = true,
            "load failed"
        );
    }
}

/// Appends one JSON object per load event to a local file (JSON Lines).
///
/// Successful loads record the inferred schema:
///
/// ```text
/// {"at":"2024-03-05T10:15:00Z","event":"loaded","file":"people.csv","format":"csv","sheet":null,
///  "rows":4,"columns":[{"name":"Name","type":"text"},{"name":"Age","type":"number"}]}
/// ```
///
/// Failures record `"event":"failed"` or `"event":"alert"` with `severity` and `error`.
/// Writing is best-effort: an unwritable log never fails a load.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileObserver {
    /// Create an observer that appends to `path`. The file is opened on the first event.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: Mutex::new(None),
        }
    }

    fn record(&self, ctx: &LoadContext, event: &str, details: Value) {
        let mut line = Map::new();
        line.insert("at".into(), Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true).into());
        line.insert("event".into(), event.into());
        line.insert("file".into(), ctx.name.as_str().into());
        line.insert("format".into(), ctx.format.map(InputFormat::as_str).into());
        line.insert("sheet".into(), ctx.sheet.as_deref().into());
        if let Value::Object(details) = details {
            line.extend(details);
        }

        let Ok(mut slot) = self.file.lock() else {
            return;
        };
        if slot.is_none() {
            *slot = OpenOptions::new().create(true).append(true).open(&self.path).ok();
        }
        let failed = match slot.as_mut() {
            Some(file) => writeln!(file, "{}", Value::Object(line)).is_err(),
            None => false,
        };
        if failed {
            // Reopen on the next event.
            *slot = None;
        }
    }

    fn record_failure(
        &self,
        ctx: &LoadContext,
        event: &str,
        severity: LoadSeverity,
        error: &EngineError,
    ) {
        self.record(
            ctx,
            event,
            json!({ "severity": severity.as_str(), "error": error.to_string() }),
        );
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, dataset: &FileDataset) {
        let columns: Vec<Value> = dataset
            .columns
            .iter()
            .map(|c| json!({ "name": c.name, "type": c.column_type.as_str() }))
            .collect();
        self.record(ctx, "loaded", json!({ "rows": dataset.total_rows, "columns": columns }));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &EngineError) {
        self.record_failure(ctx, "failed", severity, error);
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &EngineError) {
        self.record_failure(ctx, "alert", severity, error);
    }
}
