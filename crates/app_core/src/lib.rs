//! FilePanel core domain logic
//!
//! This crate contains:
//! - Configuration
//! - Error types
//! - File type dispatch
//! - The action model offered to the presentation layer
//! - Image metadata extraction
//! - File variants and action dispatch

pub mod config;
pub mod error;
pub mod dispatch;
pub mod action;
pub mod ports;
pub mod metadata;
pub mod variant;

pub use config::{AppConfig, DispatchConfig, MetadataConfig, DialogConfig, LoggingConfig, MatchMode};
pub use error::AppError;
pub use dispatch::{classify, FileKind};
pub use action::{ActionDescriptor, ActionSet, Effect};
pub use ports::{BrowserLauncher, Dialogs};
pub use metadata::{
    DecodeError, GpsCoordinate, ImageMetadata, LocationLink, MetadataEntry, MetadataReport, TagValue,
};
pub use variant::{ArchiveFile, Description, FileInspector, FileVariant, ImageFile, Outcome, VideoFile};
