//! File variants: one per recognized file type, sharing the base inspector

mod archive;
mod image;
mod inspector;
mod video;

pub use archive::ArchiveFile;
pub use image::ImageFile;
pub use inspector::{Description, FileInspector};
pub use video::VideoFile;

use crate::action::{ActionSet, Effect};
use crate::config::AppConfig;
use crate::dispatch::{classify, FileKind};
use crate::metadata::MetadataReport;
use crate::ports::{BrowserLauncher, Dialogs};
use crate::AppError;
use app_fs::{ArchiveFormat, DefaultFileOperations, FileOperations};
use std::path::{Path, PathBuf};

/// Result of a performed action, for the presentation layer to show
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Opened,
    Renamed(PathBuf),
    Moved(PathBuf),
    Copied(PathBuf),
    Unpacked {
        destination: PathBuf,
        format: ArchiveFormat,
    },
    Metadata(MetadataReport),
    /// The user dismissed a dialog; nothing happened
    Cancelled,
    Quit,
}

/// The file under management, specialized by type
#[derive(Debug)]
pub enum FileVariant {
    Generic(FileInspector),
    Image(ImageFile),
    Archive(ArchiveFile),
    Video(VideoFile),
}

impl FileVariant {
    /// Classify `path` and build the matching variant
    pub fn open<P: AsRef<Path>>(path: P, config: &AppConfig) -> Self {
        Self::with_operations(path, config, Box::new(DefaultFileOperations::new()))
    }

    pub fn with_operations<P: AsRef<Path>>(
        path: P,
        config: &AppConfig,
        ops: Box<dyn FileOperations>,
    ) -> Self {
        let path = path.as_ref();
        let kind = classify(&path.to_string_lossy(), config.dispatch.match_mode);
        let inspector = FileInspector::with_operations(path, ops);

        tracing::info!("Managing {} as {}", inspector.handle(), kind.name());

        match kind {
            FileKind::Generic => FileVariant::Generic(inspector),
            FileKind::Image => {
                FileVariant::Image(ImageFile::new(inspector, config.metadata.maps_url_base.clone()))
            }
            FileKind::Archive => FileVariant::Archive(ArchiveFile::new(inspector)),
            FileKind::Video => FileVariant::Video(VideoFile::new(inspector)),
        }
    }

    pub fn kind(&self) -> FileKind {
        match self {
            FileVariant::Generic(_) => FileKind::Generic,
            FileVariant::Image(_) => FileKind::Image,
            FileVariant::Archive(_) => FileKind::Archive,
            FileVariant::Video(_) => FileKind::Video,
        }
    }

    pub fn inspector(&self) -> &FileInspector {
        match self {
            FileVariant::Generic(inspector) => inspector,
            FileVariant::Image(image) => image.inspector(),
            FileVariant::Archive(archive) => archive.inspector(),
            FileVariant::Video(video) => video.inspector(),
        }
    }

    fn inspector_mut(&mut self) -> &mut FileInspector {
        match self {
            FileVariant::Generic(inspector) => inspector,
            FileVariant::Image(image) => image.inspector_mut(),
            FileVariant::Archive(archive) => archive.inspector_mut(),
            FileVariant::Video(video) => video.inspector_mut(),
        }
    }

    pub fn path(&self) -> &Path {
        self.inspector().path()
    }

    pub fn describe(&self) -> Description {
        match self {
            FileVariant::Image(image) => image.describe(),
            other => other.inspector().describe(),
        }
    }

    fn extra_actions(&self) -> Vec<Effect> {
        match self {
            FileVariant::Image(image) => image.extra_actions(),
            FileVariant::Archive(archive) => archive.extra_actions(),
            FileVariant::Generic(_) | FileVariant::Video(_) => Vec::new(),
        }
    }

    /// Base actions, then the variant's extras, then quit
    pub fn list_actions(&self) -> ActionSet {
        ActionSet::builder()
            .extend([Effect::Open, Effect::Rename, Effect::Copy, Effect::Move])
            .extend(self.extra_actions())
            .push(Effect::Quit)
            .build()
    }

    /// Run `effect`, asking `dialogs` for whatever input it needs
    pub fn perform(&mut self, effect: Effect, dialogs: &mut dyn Dialogs) -> Result<Outcome, AppError> {
        if !self.list_actions().contains(effect) {
            return Err(AppError::Unavailable(effect));
        }

        tracing::debug!("Performing {} on {}", effect, self.inspector().handle());

        match effect {
            Effect::Open => {
                self.inspector().open_with_default_app()?;
                Ok(Outcome::Opened)
            }
            Effect::Rename => {
                let current = self.inspector().handle().basename();
                let Some(new_name) = dialogs.ask_new_name(&current) else {
                    return Ok(Outcome::Cancelled);
                };
                self.inspector_mut().rename(&new_name)?;
                Ok(Outcome::Renamed(self.path().to_path_buf()))
            }
            Effect::Move => {
                let Some(directory) = dialogs.pick_directory(effect) else {
                    return Ok(Outcome::Cancelled);
                };
                let target = self.inspector_mut().move_to(&directory)?;
                Ok(Outcome::Moved(target))
            }
            Effect::Copy => {
                let Some(directory) = dialogs.pick_directory(effect) else {
                    return Ok(Outcome::Cancelled);
                };
                let target = self.inspector().copy_to(&directory)?;
                Ok(Outcome::Copied(target))
            }
            Effect::Unpack => {
                let FileVariant::Archive(archive) = self else {
                    return Err(AppError::Unavailable(effect));
                };
                let Some(destination) = dialogs.pick_directory(effect) else {
                    return Ok(Outcome::Cancelled);
                };
                let format = archive.unpack(&destination)?;
                Ok(Outcome::Unpacked { destination, format })
            }
            Effect::ShowMetadata => match self {
                FileVariant::Image(image) => Ok(Outcome::Metadata(image.show_metadata())),
                _ => Err(AppError::Unavailable(effect)),
            },
            Effect::Quit => {
                tracing::info!("Quit requested");
                Ok(Outcome::Quit)
            }
        }
    }

    /// Open the image's location in the browser; false if there is none
    pub fn open_location(&self, browser: &dyn BrowserLauncher) -> bool {
        match self {
            FileVariant::Image(image) => image.open_location(browser),
            _ => false,
        }
    }
}
