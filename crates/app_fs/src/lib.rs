//! FilePanel file system layer
//!
//! Provides the OS-facing half of the panel:
//! - FileHandle: the path currently shown, with derived basename and directory
//! - FileOperations: rename, copy, move and open-with-default-app
//! - Archive sniffing and extraction
//! - File name validation for rename targets

mod file_handle;
mod file_operations;
mod sanitize;
pub mod archive;

pub use file_handle::FileHandle;
pub use file_operations::{DefaultFileOperations, FileOpError, FileOperations};
pub use sanitize::{validate_file_name, is_valid_filename};
pub use archive::{ArchiveError, ArchiveFormat};

pub type Result<T> = std::result::Result<T, FileOpError>;
