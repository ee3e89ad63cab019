use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use thiserror::Error;
use tracing::warn;

/// Longest folder path accepted from the user, in characters.
pub const MAX_PATH_LENGTH: usize = 260;

const ILLEGAL_CHARACTERS: [char; 7] = [':', '*', '?', '"', '<', '>', '|'];

const RESERVED_DEVICE_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reasons a user-supplied folder path is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathValidationError {
    #[error("no path was entered")]
    Empty,
    #[error("path contains the illegal character '{0}'")]
    IllegalCharacter(char),
    #[error("path is {0} characters long, the limit is 260")]
    TooLong(usize),
    #[error("'{0}' is a reserved device name")]
    ReservedName(String),
    #[error("{} does not exist or is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Syntactic checks on a raw folder path, before any filesystem access.
pub fn validate_folder_path(raw: &str) -> Result<(), PathValidationError> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return Err(PathValidationError::Empty);
    }

    let has_drive_prefix = has_drive_letter_prefix(candidate);
    let illegal = candidate.chars().enumerate().find(|&(index, c)| {
        let is_drive_colon = c == ':' && index == 1 && has_drive_prefix;
        ILLEGAL_CHARACTERS.contains(&c) && !is_drive_colon
    });
    if let Some((_, c)) = illegal {
        return Err(PathValidationError::IllegalCharacter(c));
    }

    let length = candidate.chars().count();
    if length > MAX_PATH_LENGTH {
        return Err(PathValidationError::TooLong(length));
    }

    let folder_name = last_component(candidate);
    if RESERVED_DEVICE_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(folder_name))
    {
        return Err(PathValidationError::ReservedName(folder_name.to_string()));
    }

    Ok(())
}

/// `C:` style prefix: an ASCII letter followed by a colon.
fn has_drive_letter_prefix(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}

/// Final path component, accepting both separator styles and ignoring trailing ones.
fn last_component(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
}

/// Trim, unify separators, collapse repeats and resolve to an absolute path.
///
/// Resolution failures are logged and leave the cleaned-up relative path in place,
/// so the existence check that follows rejects it.
pub fn normalize_folder_path(raw: &str) -> PathBuf {
    let mut cleaned = String::with_capacity(raw.len());
    let mut previous_was_separator = false;
    for c in raw.trim().chars() {
        let is_separator = c == '/' || c == '\\';
        if is_separator {
            if !previous_was_separator {
                cleaned.push(MAIN_SEPARATOR);
            }
        } else {
            cleaned.push(c);
        }
        previous_was_separator = is_separator;
    }

    let cleaned = PathBuf::from(cleaned);
    match std::path::absolute(&cleaned) {
        Ok(absolute) => absolute,
        Err(e) => {
            warn!("Invalid path detected: {}: {}", cleaned.display(), e);
            cleaned
        }
    }
}

/// True only for an existing directory, following symlinks.
pub fn is_existing_directory(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_dir(),
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            warn!("Error checking directory {}: {}", path.display(), e);
            false
        }
    }
}

/// Canonical form when the path exists, absolute form otherwise
pub fn comparable_path(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Full check of a user-entered source folder: validate, normalize, then confirm it exists.
pub fn check_source_folder(raw: &str) -> Result<PathBuf, PathValidationError> {
    validate_folder_path(raw)?;
    let normalized = normalize_folder_path(raw);
    if is_existing_directory(&normalized) {
        Ok(normalized)
    } else {
        Err(PathValidationError::NotADirectory(normalized))
    }
}
