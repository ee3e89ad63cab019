pub mod file_operations;
pub mod path_validation;

pub use file_operations::{
    copy_file_overwrite, ensure_directory, file_extension, matches_extensions, read_directory,
    transfer_file, DirectoryListing, DirectoryStatus, TransferOutcome,
};
pub use path_validation::{
    check_source_folder, comparable_path, is_existing_directory, normalize_folder_path,
    validate_folder_path, PathValidationError, MAX_PATH_LENGTH,
};
