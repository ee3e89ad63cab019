//! Removable drive detection.
//!
//! A locator only has to answer one question: is there a ready removable drive,
//! and where is it mounted. Platforms without a mount table fall back to the
//! `--usb-root` override.

pub mod mount_table;

pub use mount_table::{decode_mount_field, parse_removable_mounts};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait RemovableDriveLocator {
    /// Root of the first ready removable drive, if any
    fn find_removable(&self) -> Option<PathBuf>;
}

/// A drive is ready when its root can be listed
pub fn is_drive_ready(root: &Path) -> bool {
    fs::read_dir(root).is_ok()
}

/// Locator that reads the operating system's list of mounted volumes
#[derive(Debug, Default, Clone, Copy)]
pub struct MountTableLocator;

impl RemovableDriveLocator for MountTableLocator {
    fn find_removable(&self) -> Option<PathBuf> {
        let candidates = mounted_removable_roots();
        debug!("Removable drive candidates: {:?}", candidates);
        candidates.into_iter().find(|root| is_drive_ready(root))
    }
}

#[cfg(target_os = "linux")]
fn mounted_removable_roots() -> Vec<PathBuf> {
    match fs::read_to_string("/proc/mounts") {
        Ok(contents) => parse_removable_mounts(&contents),
        Err(e) => {
            debug!("Cannot read /proc/mounts: {}", e);
            Vec::new()
        }
    }
}

#[cfg(target_os = "macos")]
fn mounted_removable_roots() -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir("/Volumes") else {
        return Vec::new();
    };

    // The boot volume shows up in /Volumes as a symlink to `/`
    let mut roots: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    roots.sort();
    roots
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn mounted_removable_roots() -> Vec<PathBuf> {
    debug!("Removable drive detection is not available on this platform, use --usb-root");
    Vec::new()
}

/// Locator that always reports the configured drive root, if it is ready
#[derive(Debug, Clone)]
pub struct FixedDriveLocator {
    root: PathBuf,
}

impl FixedDriveLocator {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl RemovableDriveLocator for FixedDriveLocator {
    fn find_removable(&self) -> Option<PathBuf> {
        is_drive_ready(&self.root).then(|| self.root.clone())
    }
}

/// Locator that never finds a drive
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDriveLocator;

impl RemovableDriveLocator for NoDriveLocator {
    fn find_removable(&self) -> Option<PathBuf> {
        None
    }
}
