//! Unified loading entrypoint.
//!
//! Most callers should use [`load_from_path`], which validates an upload, parses it into a
//! [`crate::types::RawGrid`], and builds a [`crate::types::FileDataset`] with inferred column
//! types.
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If a [`super::observability::LoadObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::error::Error as StdError;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::processing::DEFAULT_SAMPLE_SIZE;
use crate::types::{FileDataset, RawGrid};

use super::csv;
use super::observability::{LoadContext, LoadObserver, LoadSeverity};

/// Default upload size limit (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet workbooks (`.xlsx`, `.xls`; parsing requires the `excel` feature).
    Excel,
}

impl InputFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Lowercase name of the format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
        }
    }
}

/// Which sheet to read from a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelection {
    /// The first sheet (default).
    #[default]
    First,
    /// A single named sheet.
    Named(String),
}

/// Options controlling loading.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<InputFormat>,
    /// Workbook sheet selection.
    pub sheet: SheetSelection,
    /// Largest accepted file, in bytes.
    pub max_file_size: u64,
    /// Number of leading values per column used for type inference.
    pub sample_size: usize,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("sheet", &self.sheet)
            .field("max_file_size", &self.max_file_size)
            .field("sample_size", &self.sample_size)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            sheet: SheetSelection::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Load a CSV or workbook file into a [`FileDataset`].
///
/// The upload is rejected if it is larger than `options.max_file_size`, if its type is not
/// supported, or if it contains no rows.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with the loaded dataset
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use tabular_refine::ingestion::{load_from_path, LoadOptions};
///
/// # fn main() -> Result<(), tabular_refine::EngineError> {
/// let ds = load_from_path("people.csv", &LoadOptions::default())?;
/// for column in &ds.columns {
///     println!("{} ({})", column.name, column.column_type);
/// }
/// # Ok(())
/// # }
/// ```
pub fn load_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> EngineResult<FileDataset> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let format = options.format.or_else(|| {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(InputFormat::from_extension)
    });
    let sheet = match (&options.sheet, format) {
        (SheetSelection::Named(sheet), Some(InputFormat::Excel)) => Some(sheet.clone()),
        _ => None,
    };
    let ctx = LoadContext {
        name: name.clone(),
        path: Some(path.to_path_buf()),
        format,
        sheet,
    };

    let result = load_path_impl(path, &name, format, options);
    report(options, &ctx, result)
}

/// Load CSV content from any reader.
///
/// `name` is recorded as the dataset's file name. No size limit is applied.
pub fn load_csv_from_reader<R: Read>(
    name: &str,
    input: R,
    options: &LoadOptions,
) -> EngineResult<FileDataset> {
    let ctx = LoadContext {
        name: name.to_string(),
        path: None,
        format: Some(InputFormat::Csv),
        sheet: None,
    };

    let result = csv::read_csv_grid_from_reader(&mut csv::csv_reader(input))
        .and_then(|grid| dataset_from_grid(name, grid, options));
    report(options, &ctx, result)
}

fn load_path_impl(
    path: &Path,
    name: &str,
    format: Option<InputFormat>,
    options: &LoadOptions,
) -> EngineResult<FileDataset> {
    let size = std::fs::metadata(path)?.len();
    if size > options.max_file_size {
        return Err(EngineError::FileTooLarge {
            name: name.to_string(),
            size,
            limit: options.max_file_size,
        });
    }

    let format = format.ok_or_else(|| EngineError::UnsupportedFileType {
        name: name.to_string(),
    })?;

    let grid = match format {
        InputFormat::Csv => csv::read_csv_grid_from_path(path)?,
        InputFormat::Excel => read_excel_dispatch(path, name, &options.sheet)?,
    };
    dataset_from_grid(name, grid, options)
}

fn dataset_from_grid(
    name: &str,
    grid: RawGrid,
    options: &LoadOptions,
) -> EngineResult<FileDataset> {
    if grid.is_empty() {
        return Err(EngineError::EmptyFile {
            name: name.to_string(),
        });
    }

    let ds = FileDataset::from_grid(name, grid, options.sample_size);
    info!(
        file = %ds.file_name,
        rows = ds.total_rows,
        columns = ds.total_columns,
        "loaded file"
    );
    Ok(ds)
}

fn report(
    options: &LoadOptions,
    ctx: &LoadContext,
    result: EngineResult<FileDataset>,
) -> EngineResult<FileDataset> {
    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_success(ctx, ds),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(ctx, sev, e);
                }
            }
        }
    }
    result
}

fn severity_for_error(e: &EngineError) -> LoadSeverity {
    match e {
        EngineError::Io(_) => LoadSeverity::Critical,
        EngineError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => LoadSeverity::Critical,
            _ => LoadSeverity::Error,
        },
        #[cfg(feature = "excel")]
        EngineError::Excel(err) => {
            if error_chain_contains_io(err) {
                LoadSeverity::Critical
            } else {
                LoadSeverity::Error
            }
        }
        EngineError::FileTooLarge { .. }
        | EngineError::UnsupportedFileType { .. }
        | EngineError::EmptyFile { .. } => LoadSeverity::Warning,
        EngineError::Xlsx(_) | EngineError::Json(_) | EngineError::UnsupportedFormat { .. } => {
            LoadSeverity::Error
        }
    }
}

#[cfg_attr(not(feature = "excel"), allow(dead_code))]
fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

fn read_excel_dispatch(path: &Path, name: &str, sel: &SheetSelection) -> EngineResult<RawGrid> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, name, sel);

    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            SheetSelection::First => excel::read_excel_grid_from_path(path, None),
            SheetSelection::Named(sheet) => {
                excel::read_excel_grid_from_path(path, Some(sheet.as_str()))
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(EngineError::UnsupportedFileType {
            name: name.to_string(),
        })
    }
}
