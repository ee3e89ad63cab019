use crate::utils::{check_source_folder, PathValidationError};
use std::path::{Path, PathBuf};

/// A user-entered source folder and whether it passed validation.
///
/// The descriptor is revalidated on every new input; when validation fails the
/// path holds the raw input and `rejection` says why.
#[derive(Debug, Clone)]
pub struct SourceFolder {
    path: PathBuf,
    valid: bool,
    rejection: Option<PathValidationError>,
}

impl SourceFolder {
    pub fn new(raw: &str) -> Self {
        let mut folder = Self {
            path: PathBuf::new(),
            valid: false,
            rejection: None,
        };
        folder.revalidate(raw);
        folder
    }

    /// Replace the path with new input and run the checks again
    pub fn revalidate(&mut self, raw: &str) -> bool {
        match check_source_folder(raw) {
            Ok(normalized) => {
                self.path = normalized;
                self.valid = true;
                self.rejection = None;
            }
            Err(e) => {
                self.path = PathBuf::from(raw.trim());
                self.valid = false;
                self.rejection = Some(e);
            }
        }
        self.valid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn rejection(&self) -> Option<&PathValidationError> {
        self.rejection.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_valid_folder_is_normalized() {
        let tmp = TempDir::new().unwrap();
        let folder = SourceFolder::new(&format!(" {} ", tmp.path().display()));

        assert!(folder.is_valid());
        assert!(folder.rejection().is_none());
        assert_eq!(folder.path(), std::path::absolute(tmp.path()).unwrap());
    }

    #[test]
    fn test_revalidate_tracks_latest_input() {
        let tmp = TempDir::new().unwrap();
        let mut folder = SourceFolder::new(&tmp.path().to_string_lossy());
        assert!(folder.is_valid());

        assert!(!folder.revalidate("bad|name"));
        assert_eq!(
            folder.rejection(),
            Some(&PathValidationError::IllegalCharacter('|'))
        );

        assert!(folder.revalidate(&tmp.path().to_string_lossy()));
        assert!(folder.rejection().is_none());
    }

    #[test]
    fn test_missing_folder_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let folder = SourceFolder::new(&tmp.path().join("gone").to_string_lossy());
        assert!(!folder.is_valid());
        assert!(matches!(
            folder.rejection(),
            Some(PathValidationError::NotADirectory(_))
        ));
    }
}
