use crate::models::RunMode;
use crate::services::TransferReport;
use crate::utils::{
    ensure_directory, matches_extensions, read_directory, transfer_file, DirectoryStatus,
};
use std::path::Path;
use tracing::{info, warn};

/// Extensions the mirroring copier picks up
pub const COPY_ALLOWED_EXTENSIONS: [&str; 3] = ["txt", "jpg", "png"];

/// Configuration for mirrored copy operations
#[derive(Debug, Clone)]
pub struct FileCopyConfig {
    pub allowed_extensions: Vec<String>,
    pub mode: RunMode,
}

impl FileCopyConfig {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

impl Default for FileCopyConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: COPY_ALLOWED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            mode: RunMode::Dry,
        }
    }
}

/// Copy every allowed file under `source` into `destination`, mirroring the directory tree.
///
/// Filesystem failures never abort the walk: they are logged, recorded in the
/// report, and the affected file or directory is skipped.
pub fn copy_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
    config: &FileCopyConfig,
) -> TransferReport {
    let source = source.as_ref();
    let destination = destination.as_ref();

    info!(
        "Starting {} copy: {} -> {}",
        config.mode,
        source.display(),
        destination.display()
    );

    let mut report = TransferReport::empty();
    copy_directory_into(source, destination, config, &mut report);

    info!(
        "Copy completed. Copied: {}, Dry run: {}, Errors: {}",
        report.successful_copies(),
        report.planned_copies(),
        report.errors.len()
    );
    report
}

fn copy_directory_into(
    source: &Path,
    destination: &Path,
    config: &FileCopyConfig,
    report: &mut TransferReport,
) {
    if !source.is_dir() {
        warn!("Source directory does not exist: {}", source.display());
        report.record_error(source, "Source directory does not exist");
        return;
    }

    match ensure_directory(destination, config.mode) {
        Ok(DirectoryStatus::Created) => report.record_created_directory(destination),
        Ok(DirectoryStatus::AlreadyExisted) => {
            info!("Destination directory already exists: {}", destination.display())
        }
        Ok(DirectoryStatus::WouldCreate) => {}
        Err(e) => report.record_error(destination, format!("{:#}", e)),
    }

    let listing = match read_directory(source) {
        Ok(listing) => listing,
        Err(e) => {
            report.record_error(source, format!("{:#}", e));
            return;
        }
    };

    for file in listing
        .files
        .iter()
        .filter(|file| matches_extensions(file, &config.allowed_extensions))
    {
        let Some(file_name) = file.file_name() else {
            continue;
        };
        report.record(transfer_file(file, &destination.join(file_name), config.mode));
    }

    for subdirectory in &listing.subdirectories {
        let Some(dir_name) = subdirectory.file_name() else {
            continue;
        };
        copy_directory_into(subdirectory, &destination.join(dir_name), config, report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn build_source(root: &Path) {
        fs::create_dir_all(root.join("trip").join("day1")).unwrap();
        fs::write(root.join("notes.txt"), "notes").unwrap();
        fs::write(root.join("ignored.pdf"), "pdf").unwrap();
        fs::write(root.join("trip").join("beach.JPG"), "jpg").unwrap();
        fs::write(root.join("trip").join("day1").join("map.png"), "png").unwrap();
    }

    #[test]
    fn test_copy_mirrors_source_tree() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let destination = tmp.path().join("mirror");
        build_source(&source);

        let report = copy_directory(&source, &destination, &FileCopyConfig::new(RunMode::Active));

        assert_eq!(report.successful_copies(), 3);
        assert!(report.errors.is_empty());
        assert!(destination.join("notes.txt").is_file());
        assert!(destination.join("trip").join("beach.JPG").is_file());
        assert!(destination.join("trip").join("day1").join("map.png").is_file());
        assert!(!destination.join("ignored.pdf").exists());
        assert_eq!(report.created_directories.len(), 3);
    }

    #[test]
    fn test_copy_creates_empty_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        fs::create_dir_all(source.join("empty")).unwrap();

        copy_directory(&source, tmp.path().join("mirror"), &FileCopyConfig::new(RunMode::Active));
        assert!(tmp.path().join("mirror").join("empty").is_dir());
    }

    #[test]
    fn test_dry_copy_does_not_touch_filesystem() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let destination = tmp.path().join("mirror");
        build_source(&source);

        let report = copy_directory(&source, &destination, &FileCopyConfig::new(RunMode::Dry));

        assert_eq!(report.planned_copies(), 3);
        assert_eq!(report.successful_copies(), 0);
        assert!(report.created_directories.is_empty());
        assert!(!destination.exists());
    }

    #[test]
    fn test_missing_source_is_reported_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let report = copy_directory(
            tmp.path().join("missing"),
            tmp.path().join("mirror"),
            &FileCopyConfig::new(RunMode::Active),
        );

        assert_eq!(report.errors.len(), 1);
        assert!(!tmp.path().join("mirror").exists());
    }
}
