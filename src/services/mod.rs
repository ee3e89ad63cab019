pub mod export;
pub mod file_copy;
pub mod file_organizer;
pub mod transfer_report;

pub use export::{
    export_to_drive, find_free_slot, parse_slot_limit, slot_path, ExportConfig, ExportOutcome,
    DEFAULT_EXPORT_PREFIX, DEFAULT_SLOT_LIMIT,
};
pub use file_copy::{copy_directory, FileCopyConfig, COPY_ALLOWED_EXTENSIONS};
pub use file_organizer::{default_routes, organize_files, ExtensionRoute, OrganizerConfig};
pub use transfer_report::{TransferError, TransferReport, TransferredFile};
