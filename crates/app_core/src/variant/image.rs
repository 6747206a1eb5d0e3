//! Image variant: dimensions and embedded metadata

use super::inspector::{Description, FileInspector};
use crate::action::Effect;
use crate::metadata::{ImageMetadata, MetadataReport};
use crate::ports::BrowserLauncher;

#[derive(Debug)]
pub struct ImageFile {
    inspector: FileInspector,
    metadata: ImageMetadata,
    maps_url_base: String,
}

impl ImageFile {
    /// Reads the tag block right away
    pub fn new(inspector: FileInspector, maps_url_base: impl Into<String>) -> Self {
        let metadata = ImageMetadata::read(inspector.path());
        Self::with_metadata(inspector, metadata, maps_url_base)
    }

    pub fn with_metadata(
        inspector: FileInspector,
        metadata: ImageMetadata,
        maps_url_base: impl Into<String>,
    ) -> Self {
        Self {
            inspector,
            metadata,
            maps_url_base: maps_url_base.into(),
        }
    }

    pub fn inspector(&self) -> &FileInspector {
        &self.inspector
    }

    pub fn inspector_mut(&mut self) -> &mut FileInspector {
        &mut self.inspector
    }

    pub fn describe(&self) -> Description {
        Description {
            size: Some(self.metadata.size_label()),
            ..self.inspector.describe()
        }
    }

    pub fn extra_actions(&self) -> Vec<Effect> {
        if self.metadata.is_empty() {
            Vec::new()
        } else {
            vec![Effect::ShowMetadata]
        }
    }

    pub fn show_metadata(&self) -> MetadataReport {
        let report = self.metadata.report(&self.maps_url_base);
        for err in report.decode_errors() {
            tracing::warn!("{}", err);
        }
        report
    }

    pub fn location_url(&self) -> Option<String> {
        self.metadata
            .location()
            .map(|coord| coord.maps_url(&self.maps_url_base))
    }

    /// Returns false when the image has no location
    pub fn open_location(&self, browser: &dyn BrowserLauncher) -> bool {
        match self.location_url() {
            Some(url) => {
                tracing::info!("Opening image location: {}", url);
                browser.open_url(&url);
                true
            }
            None => false,
        }
    }
}
