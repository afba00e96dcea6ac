//! Appending audit reports to a results log.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::audit::AuditReport;
use crate::policy::AuditType;

/// Results log for algorithm audits.
pub const ALGORITHM_LOG_FILE: &str = "results.log";
/// Results log for interactive audits.
pub const USER_LOG_FILE: &str = "user.log";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not print results. Target directory does not exist.")]
    DirectoryMissing { path: PathBuf },
    #[error("could not write results to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Destination for finished audit reports.
pub trait ReportStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist one report.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be stored.
    fn store(&self, report: &AuditReport) -> Result<(), Self::Error>;
}

/// Results directory holding one log per audit type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsDir {
    dir: PathBuf,
}

impl ResultsDir {
    /// # Errors
    ///
    /// Returns [`ReportError::DirectoryMissing`] if `dir` is not a directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(ReportError::DirectoryMissing { path: dir });
        }
        Ok(Self { dir })
    }

    /// The current working directory.
    #[must_use]
    pub fn current() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn log_path(&self, audit_type: AuditType) -> PathBuf {
        let file = match audit_type {
            AuditType::Algorithm => ALGORITHM_LOG_FILE,
            AuditType::User => USER_LOG_FILE,
        };
        self.dir.join(file)
    }
}

impl ReportStore for ResultsDir {
    type Error = ReportError;

    fn store(&self, report: &AuditReport) -> Result<(), Self::Error> {
        append_report(&self.log_path(report.audit_type), report)
    }
}

/// Append `report` to the log at `path`.
///
/// Existing bytes are kept verbatim, gain a line break only if they lack a
/// trailing one, and are separated from the new block by one blank line.
/// A missing file is created, a missing parent directory is not.
///
/// # Errors
///
/// Returns [`ReportError::DirectoryMissing`] when the parent directory does
/// not exist, or [`ReportError::Io`] when reading or writing fails.
pub fn append_report(path: &Path, report: &AuditReport) -> Result<(), ReportError> {
    let mut contents = read_previous(path)?;
    if !contents.is_empty() {
        if contents.last() != Some(&b'\n') {
            contents.push(b'\n');
        }
        contents.push(b'\n');
    }
    contents.extend_from_slice(report.to_string().as_bytes());
    contents.push(b'\n');

    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("appended {} audit to {}", report.audit_type, path.display());
    Ok(())
}

fn read_previous(path: &Path) -> Result<Vec<u8>, ReportError> {
    if path.is_file() {
        return fs::read(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(ReportError::DirectoryMissing {
                path: parent.to_path_buf(),
            })
        }
        _ => Ok(Vec::new()),
    }
}
