use crate::models::RunMode;
use crate::services::TransferReport;
use crate::utils::{
    comparable_path, ensure_directory, file_extension, read_directory, transfer_file,
    DirectoryStatus,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One extension and the category folder its files are routed into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRoute {
    pub extension: String,
    pub folder: String,
}

impl ExtensionRoute {
    pub fn new(extension: &str, folder: &str) -> Self {
        Self {
            extension: extension.to_ascii_lowercase(),
            folder: folder.to_string(),
        }
    }
}

pub fn default_routes() -> Vec<ExtensionRoute> {
    vec![
        ExtensionRoute::new("txt", "text_files"),
        ExtensionRoute::new("png", "PNG_files"),
        ExtensionRoute::new("jpg", "JPG_files"),
    ]
}

/// Configuration for organize runs
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    pub destination_root: PathBuf,
    pub routes: Vec<ExtensionRoute>,
    pub mode: RunMode,
}

impl OrganizerConfig {
    pub fn new(destination_root: PathBuf, mode: RunMode) -> Self {
        Self {
            destination_root,
            routes: default_routes(),
            mode,
        }
    }

    /// Category folder for a file, if its extension is routed
    pub fn folder_for(&self, file: &Path) -> Option<PathBuf> {
        let extension = file_extension(file)?;
        self.routes
            .iter()
            .find(|route| route.extension == extension)
            .map(|route| self.destination_root.join(&route.folder))
    }

    pub fn category_folders(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.routes
            .iter()
            .map(|route| self.destination_root.join(&route.folder))
    }
}

/// Sort every routed file under `source` into flat per-extension folders below the
/// destination root.
pub fn organize_files<P: AsRef<Path>>(source: P, config: &OrganizerConfig) -> TransferReport {
    let source = source.as_ref();
    info!(
        "Starting {} organize: {} -> {}",
        config.mode,
        source.display(),
        config.destination_root.display()
    );

    let mut report = TransferReport::empty();
    if !source.is_dir() {
        warn!("Source directory does not exist: {}", source.display());
        report.record_error(source, "Source directory does not exist");
        return report;
    }

    prepare_destination(config, &mut report);
    let destination_root = comparable_path(&config.destination_root);
    organize_directory(source, config, &destination_root, &mut report);

    info!(
        "Organize completed. Copied: {}, Dry run: {}, Errors: {}",
        report.successful_copies(),
        report.planned_copies(),
        report.errors.len()
    );
    report
}

fn prepare_destination(config: &OrganizerConfig, report: &mut TransferReport) {
    let folders = std::iter::once(config.destination_root.clone()).chain(config.category_folders());
    for folder in folders {
        match ensure_directory(&folder, config.mode) {
            Ok(DirectoryStatus::Created) => report.record_created_directory(&folder),
            Ok(DirectoryStatus::AlreadyExisted | DirectoryStatus::WouldCreate) => {}
            Err(e) => report.record_error(&folder, format!("{:#}", e)),
        }
    }
}

fn organize_directory(
    directory: &Path,
    config: &OrganizerConfig,
    destination_root: &Path,
    report: &mut TransferReport,
) {
    let listing = match read_directory(directory) {
        Ok(listing) => listing,
        Err(e) => {
            report.record_error(directory, format!("{:#}", e));
            return;
        }
    };

    for file in &listing.files {
        let (Some(folder), Some(file_name)) = (config.folder_for(file), file.file_name()) else {
            continue;
        };
        report.record(transfer_file(file, &folder.join(file_name), config.mode));
    }

    for subdirectory in &listing.subdirectories {
        if comparable_path(subdirectory) == destination_root {
            debug!("Skipping destination folder {}", subdirectory.display());
            continue;
        }
        organize_directory(subdirectory, config, destination_root, report);
    }
}
