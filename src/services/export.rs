use crate::models::RunMode;
use crate::services::{copy_directory, FileCopyConfig, TransferReport, TransferredFile};
use crate::utils::transfer_file;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_EXPORT_PREFIX: &str = "export_";
pub const DEFAULT_SLOT_LIMIT: u32 = 1000;

/// Where and how organized output is exported to a removable drive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub prefix: String,
    pub first_slot: u32,
    pub slot_limit: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            first_slot: 0,
            slot_limit: DEFAULT_SLOT_LIMIT,
        }
    }
}

/// A finished export: the slot it landed in and what was copied there
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub slot: u32,
    pub destination: PathBuf,
    pub report: TransferReport,
}

/// Slot count from the command line, `DEFAULT_SLOT_LIMIT` when not given
pub fn parse_slot_limit(value: Option<&str>) -> Result<u32> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid max-slots value: {}", raw)),
        None => Ok(DEFAULT_SLOT_LIMIT),
    }
}

/// `base` with the slot number appended to its last component: `E:\export_` + 3 = `E:\export_3`
pub fn slot_path(base: &Path, slot: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(slot.to_string());
    PathBuf::from(name)
}

/// Smallest slot in `start..limit` whose path does not exist yet.
///
/// A slot whose existence cannot be determined counts as taken.
pub fn find_free_slot(base: &Path, start: u32, limit: u32) -> Option<u32> {
    (start..limit).find(|&slot| {
        let candidate = slot_path(base, slot);
        match candidate.try_exists() {
            Ok(exists) => !exists,
            Err(e) => {
                warn!("Error checking directory {}: {}", candidate.display(), e);
                false
            }
        }
    })
}

/// Replicate the organized destination tree into the next free slot on `drive_root`.
///
/// `pending` holds files a dry organize run only planned. When the organized root
/// was never created, a dry export lists those files rebased into the slot instead.
pub fn export_to_drive(
    organized_root: &Path,
    drive_root: &Path,
    config: &ExportConfig,
    mode: RunMode,
    pending: &[TransferredFile],
) -> Result<ExportOutcome> {
    let base = drive_root.join(&config.prefix);
    let Some(slot) = find_free_slot(&base, config.first_slot, config.slot_limit) else {
        anyhow::bail!(
            "No free export slot on {} between {} and {}",
            drive_root.display(),
            config.first_slot,
            config.slot_limit
        );
    };

    let destination = slot_path(&base, slot);
    info!("Exporting {} to {}", organized_root.display(), destination.display());

    let report = if mode.is_dry() && !organized_root.is_dir() {
        info!(
            "{} has not been created yet, listing the planned export",
            organized_root.display()
        );
        plan_pending_export(organized_root, &destination, pending)
    } else {
        copy_directory(organized_root, &destination, &FileCopyConfig::new(mode))
    };
    Ok(ExportOutcome {
        slot,
        destination,
        report,
    })
}

/// Dry-run report for files that only exist as planned organize output
fn plan_pending_export(
    organized_root: &Path,
    destination: &Path,
    pending: &[TransferredFile],
) -> TransferReport {
    let mut report = TransferReport::empty();
    for file in pending {
        let Ok(relative) = file.destination.strip_prefix(organized_root) else {
            continue;
        };
        report.record(transfer_file(
            &file.destination,
            &destination.join(relative),
            RunMode::Dry,
        ));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_slot_path_appends_number() {
        assert_eq!(
            slot_path(Path::new("/media/usb/export_"), 12),
            PathBuf::from("/media/usb/export_12")
        );
    }

    #[test]
    fn test_parse_slot_limit() {
        assert_eq!(parse_slot_limit(None).unwrap(), DEFAULT_SLOT_LIMIT);
        assert_eq!(parse_slot_limit(Some("25")).unwrap(), 25);
        assert!(parse_slot_limit(Some("many")).is_err());
        assert!(parse_slot_limit(Some("-1")).is_err());
    }

    #[test]
    fn test_find_free_slot_on_empty_drive() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_free_slot(&tmp.path().join("export_"), 0, 10), Some(0));
        assert_eq!(find_free_slot(&tmp.path().join("export_"), 4, 10), Some(4));
    }

    #[test]
    fn test_find_free_slot_skips_taken_and_fills_gaps() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("export_");
        for taken in [0, 1, 3] {
            fs::create_dir(slot_path(&base, taken)).unwrap();
        }

        assert_eq!(find_free_slot(&base, 0, 10), Some(2));
        assert_eq!(find_free_slot(&base, 3, 10), Some(4));
    }

    #[test]
    fn test_find_free_slot_counts_plain_files_as_taken() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("export_");
        fs::write(slot_path(&base, 0), "not a folder").unwrap();
        assert_eq!(find_free_slot(&base, 0, 10), Some(1));
    }

    #[test]
    fn test_find_free_slot_exhausted() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("export_");
        fs::create_dir(slot_path(&base, 0)).unwrap();
        fs::create_dir(slot_path(&base, 1)).unwrap();
        assert_eq!(find_free_slot(&base, 0, 2), None);
        assert_eq!(find_free_slot(&base, 5, 5), None);
    }

    #[test]
    fn test_export_uses_next_slot() {
        let tmp = TempDir::new().unwrap();
        let organized = tmp.path().join("target_folder");
        let drive = tmp.path().join("usb");
        fs::create_dir_all(organized.join("text_files")).unwrap();
        fs::write(organized.join("text_files").join("a.txt"), "a").unwrap();
        fs::create_dir_all(drive.join("export_0")).unwrap();

        let outcome =
            export_to_drive(&organized, &drive, &ExportConfig::default(), RunMode::Active, &[])
                .unwrap();

        assert_eq!(outcome.slot, 1);
        assert_eq!(outcome.destination, drive.join("export_1"));
        assert!(drive.join("export_1").join("text_files").join("a.txt").is_file());
        assert_eq!(outcome.report.successful_copies(), 1);
    }

    #[test]
    fn test_dry_export_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let organized = tmp.path().join("target_folder");
        let drive = tmp.path().join("usb");
        fs::create_dir_all(organized.join("JPG_files")).unwrap();
        fs::write(organized.join("JPG_files").join("p.jpg"), "p").unwrap();
        fs::create_dir_all(&drive).unwrap();

        let outcome =
            export_to_drive(&organized, &drive, &ExportConfig::default(), RunMode::Dry, &[])
                .unwrap();

        assert_eq!(outcome.report.planned_copies(), 1);
        assert!(!outcome.destination.exists());
    }

    #[test]
    fn test_dry_export_before_any_organize_lists_pending_files() {
        let tmp = TempDir::new().unwrap();
        let organized = tmp.path().join("target_folder");
        let drive = tmp.path().join("usb");
        fs::create_dir_all(&drive).unwrap();
        let pending = vec![
            TransferredFile {
                source: tmp.path().join("src").join("a.txt"),
                destination: organized.join("text_files").join("a.txt"),
            },
            TransferredFile {
                source: tmp.path().join("src").join("b.jpg"),
                destination: organized.join("JPG_files").join("b.jpg"),
            },
        ];

        let outcome =
            export_to_drive(&organized, &drive, &ExportConfig::default(), RunMode::Dry, &pending)
                .unwrap();

        assert!(outcome.report.errors.is_empty());
        assert_eq!(outcome.report.planned_copies(), 2);
        assert_eq!(
            outcome.report.planned_files[0].destination,
            drive.join("export_0").join("text_files").join("a.txt")
        );
        assert!(!organized.exists());
        assert!(!outcome.destination.exists());
    }

    #[test]
    fn test_active_export_of_missing_root_is_reported() {
        let tmp = TempDir::new().unwrap();
        let drive = tmp.path().join("usb");
        fs::create_dir_all(&drive).unwrap();

        let outcome = export_to_drive(
            &tmp.path().join("target_folder"),
            &drive,
            &ExportConfig::default(),
            RunMode::Active,
            &[],
        )
        .unwrap();

        assert_eq!(outcome.report.errors.len(), 1);
    }

    #[test]
    fn test_export_without_free_slot_fails() {
        let tmp = TempDir::new().unwrap();
        let drive = tmp.path().join("usb");
        fs::create_dir_all(drive.join("export_0")).unwrap();
        let config = ExportConfig {
            slot_limit: 1,
            ..ExportConfig::default()
        };

        let result = export_to_drive(tmp.path(), &drive, &config, RunMode::Active, &[]);
        assert!(result.is_err());
    }
}
