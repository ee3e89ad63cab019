pub mod device;
pub mod interactive;
pub mod models;
pub mod services;
pub mod utils;

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

// Re-export commonly used types
pub use device::{FixedDriveLocator, MountTableLocator, NoDriveLocator, RemovableDriveLocator};
pub use interactive::{Session, SessionSummary};
pub use models::{RunMode, SourceFolder};
pub use services::{
    copy_directory, export_to_drive, find_free_slot, organize_files, ExportConfig, ExportOutcome,
    FileCopyConfig, OrganizerConfig, TransferReport,
};
pub use utils::{check_source_folder, validate_folder_path, PathValidationError};

/// Environment variable naming the destination root when `--target` is not given
pub const TARGET_DIR_ENV: &str = "ORGANIZER_TARGET_DIR";

/// Folder name of the destination root on the desktop
pub const TARGET_DIR_NAME: &str = "target_folder";

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub target_dir: PathBuf,
    pub mode: Option<RunMode>,
    pub usb_root: Option<PathBuf>,
    pub export: ExportConfig,
    pub log_level: String,
}

impl AppConfig {
    /// Locator honouring the `--usb-root` override
    pub fn drive_locator(&self) -> Box<dyn RemovableDriveLocator> {
        match &self.usb_root {
            Some(root) => Box::new(FixedDriveLocator::new(root.clone())),
            None => Box::new(MountTableLocator),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_dir: default_target_dir(),
            mode: None,
            usb_root: None,
            export: ExportConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

/// `$ORGANIZER_TARGET_DIR`, else `<desktop>/target_folder`
pub fn default_target_dir() -> PathBuf {
    target_dir_from(env::var_os(TARGET_DIR_ENV))
}

/// Destination root from an optional override, always absolute.
///
/// Without an override the folder lives on the user's desktop, falling back to
/// `<home>/Desktop` and then to the temporary directory.
pub fn target_dir_from(override_dir: Option<OsString>) -> PathBuf {
    let dir = override_dir
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::desktop_dir()
                .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
                .unwrap_or_else(env::temp_dir)
                .join(TARGET_DIR_NAME)
        });

    std::path::absolute(&dir).unwrap_or(dir)
}
