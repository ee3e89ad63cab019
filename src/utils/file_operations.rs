use crate::models::RunMode;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lowercase extension without the leading dot
/// Pure function
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Check if file matches any of the given extensions
/// Pure function, accepts entries with or without a leading dot
pub fn matches_extensions<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = file_extension(path) else {
        return false;
    };

    extensions
        .iter()
        .any(|target| target.as_ref().trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

/// Files and subdirectories found directly inside one directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    pub files: Vec<PathBuf>,
    pub subdirectories: Vec<PathBuf>,
}

/// List a directory, one level deep, sorted by name.
/// Symlinked files are listed; symlinked directories are not descended into.
pub fn read_directory<P: AsRef<Path>>(directory: P) -> Result<DirectoryListing> {
    let dir_path = directory.as_ref();

    let entries = fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory: {:?}", dir_path))?;

    let mut listing = DirectoryListing::default();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in: {:?}", dir_path))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to read file type for: {:?}", path))?;

        if file_type.is_dir() {
            listing.subdirectories.push(path);
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            listing.files.push(path);
        } else {
            debug!("Ignoring {:?}", path);
        }
    }

    listing.files.sort();
    listing.subdirectories.sort();
    Ok(listing)
}

/// State of a destination directory after `ensure_directory`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    Created,
    AlreadyExisted,
    WouldCreate,
}

/// Make sure a destination directory exists. Dry mode only reports what it would do.
pub fn ensure_directory(path: &Path, mode: RunMode) -> Result<DirectoryStatus> {
    if path.is_dir() {
        return Ok(DirectoryStatus::AlreadyExisted);
    }

    if mode.is_dry() {
        info!("Dry run: would create directory {}", path.display());
        return Ok(DirectoryStatus::WouldCreate);
    }

    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {:?}", path))?;
    info!("Created destination directory: {}", path.display());
    Ok(DirectoryStatus::Created)
}

/// Copy file from source to destination, replacing any existing destination file
pub fn copy_file_overwrite<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
) -> Result<u64> {
    let src_path = source.as_ref();
    let dest_path = destination.as_ref();

    if !src_path.is_file() {
        anyhow::bail!("Source file does not exist: {:?}", src_path);
    }

    fs::copy(src_path, dest_path)
        .with_context(|| format!("Failed to copy file from {:?} to {:?}", src_path, dest_path))
}

/// Copy one file in active mode, or log the intended copy in dry mode
pub fn transfer_file(source: &Path, destination: &Path, mode: RunMode) -> TransferOutcome {
    if mode.is_dry() {
        info!(
            "Dry run: {} -> {} (Not copied)",
            source.display(),
            destination.display()
        );
        return TransferOutcome::Planned {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        };
    }

    match copy_file_overwrite(source, destination) {
        Ok(bytes) => {
            info!("Copied {} -> {}", source.display(), destination.display());
            TransferOutcome::Copied {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                bytes,
            }
        }
        Err(e) => TransferOutcome::Error {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            error: format!("{:#}", e),
        },
    }
}

/// Result of a single file transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Copied {
        source: PathBuf,
        destination: PathBuf,
        bytes: u64,
    },
    Planned {
        source: PathBuf,
        destination: PathBuf,
    },
    Error {
        source: PathBuf,
        destination: PathBuf,
        error: String,
    },
}

impl TransferOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, TransferOutcome::Error { .. })
    }
}
