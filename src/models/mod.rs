pub mod run_mode;
pub mod source_folder;

pub use run_mode::RunMode;
pub use source_folder::SourceFolder;
