use crate::utils::TransferOutcome;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Report structure for copy and organize runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    pub copied_files: Vec<TransferredFile>,
    pub planned_files: Vec<TransferredFile>,
    pub created_directories: Vec<PathBuf>,
    pub errors: Vec<TransferError>,
}

impl TransferReport {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: TransferOutcome) {
        match outcome {
            TransferOutcome::Copied {
                source,
                destination,
                ..
            } => self.copied_files.push(TransferredFile {
                source,
                destination,
            }),
            TransferOutcome::Planned {
                source,
                destination,
            } => self.planned_files.push(TransferredFile {
                source,
                destination,
            }),
            TransferOutcome::Error {
                source,
                destination,
                error: message,
            } => {
                error!(
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    destination.display(),
                    message
                );
                self.errors.push(TransferError {
                    path: source,
                    destination: Some(destination),
                    error: message,
                });
            }
        }
    }

    /// Record a failure that is not tied to one file copy, e.g. an unreadable directory
    pub fn record_error(&mut self, path: &Path, error: impl Into<String>) {
        let message = error.into();
        error!("{}: {}", path.display(), message);
        self.errors.push(TransferError {
            path: path.to_path_buf(),
            destination: None,
            error: message,
        });
    }

    pub fn record_created_directory(&mut self, path: &Path) {
        self.created_directories.push(path.to_path_buf());
    }

    pub fn successful_copies(&self) -> usize {
        self.copied_files.len()
    }

    pub fn planned_copies(&self) -> usize {
        self.planned_files.len()
    }

    pub fn total_processed(&self) -> usize {
        self.copied_files.len() + self.planned_files.len() + self.errors.len()
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.total_processed();
        if total == 0 {
            0.0
        } else {
            (self.copied_files.len() + self.planned_files.len()) as f64 / total as f64
        }
    }

    pub fn log_summary(&self, label: &str) {
        info!("=== {} REPORT ===", label);
        info!("Total files processed: {}", self.total_processed());
        info!("Copied: {}", self.successful_copies());
        info!("Dry run (not copied): {}", self.planned_copies());
        info!("Directories created: {}", self.created_directories.len());
        info!("Errors: {}", self.errors.len());
        info!("Success rate: {:.2}%", self.success_rate() * 100.0);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferredFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferError {
    pub path: PathBuf,
    pub destination: Option<PathBuf>,
    pub error: String,
}
