//! File name validation for rename targets

use crate::{FileOpError, Result};

/// Windows reserved filenames
#[cfg(windows)]
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL",
    "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9",
    "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Windows forbidden characters (separators are checked on every platform)
#[cfg(windows)]
const FORBIDDEN_CHARS: &[char] = &[':', '*', '?', '"', '<', '>', '|'];

/// Check that `name` is a single path component that stays in its directory.
///
/// Returns the reason as `FileOpError::InvalidName` otherwise.
pub fn validate_file_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(FileOpError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("name is empty");
    }

    if name == "." || name == ".." {
        return invalid("name refers to a directory");
    }

    for c in name.chars() {
        if std::path::is_separator(c) {
            return invalid("name contains a path separator");
        }
        if c.is_control() {
            return invalid("name contains a control character");
        }
    }

    #[cfg(windows)]
    {
        if name.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) {
            return invalid("name contains a reserved character");
        }

        let name_upper = name.to_uppercase();
        let base_name = name_upper.split('.').next().unwrap_or("");
        if RESERVED_NAMES.contains(&base_name) {
            return invalid("name is reserved");
        }

        // Windows silently strips these
        if name.ends_with('.') || name.ends_with(' ') {
            return invalid("name ends with a dot or space");
        }
    }

    Ok(())
}

/// Check if a filename is valid as a rename target
pub fn is_valid_filename(name: &str) -> bool {
    validate_file_name(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(is_valid_filename("normal.txt"));
        assert!(is_valid_filename(".hidden"));
        assert!(is_valid_filename("with space.jpg"));
        assert!(!is_valid_filename(""));
        assert!(!is_valid_filename("."));
        assert!(!is_valid_filename(".."));
        assert!(!is_valid_filename("sub/dir.txt"));
        assert!(!is_valid_filename("tab\there"));
    }

    #[test]
    fn test_reason_is_reported() {
        match validate_file_name("a/b") {
            Err(FileOpError::InvalidName { name, reason }) => {
                assert_eq!(name, "a/b");
                assert!(reason.contains("separator"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    #[cfg(windows)]
    fn test_windows_rules() {
        assert!(!is_valid_filename("test:file.txt"));
        assert!(!is_valid_filename("CON"));
        assert!(!is_valid_filename("aux.txt"));
        assert!(!is_valid_filename("test."));
        assert!(!is_valid_filename("back\\slash"));
    }
}
