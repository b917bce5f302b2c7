//! Image records and the passes that produce them.
//!
//! Two independent walks look at the images of a document:
//!
//! - [`classify_runs`] plans which image of each run would become a section's
//!   main or extra image, without touching the tree or the filesystem.
//! - [`extract_images`] writes the images next to the run's other assets,
//!   removes the extracted nodes and returns the [`ImageManifest`] the
//!   renderer reads.
//!
//! [`assets`] then publishes the written files through an [`AssetHost`].

pub mod assets;
mod extract;
mod runs;

pub use assets::{AssetHost, DirectoryAssetHost, PublishStats, publish, rewrite_image_sources};
pub use extract::extract_images;
pub use runs::{PlannedImage, PlannedSection, RunPlan, classify_runs};

use serde::Serialize;

/// What an image is used for in its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    Main,
    Extra,
    Emoji,
}

/// One extracted image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub role: ImageRole,
    /// The `src` the image had in the exported document.
    pub source: String,
    /// Where the image lives now: a written file, or a `data:` URI.
    pub filename: String,
    pub alt: String,
    /// Public URL, once published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ImageRecord {
    pub fn new(role: ImageRole, source: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            role,
            source: source.into(),
            filename: filename.into(),
            alt: String::new(),
            url: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    /// The `src` to render: the published URL, else the local filename.
    pub fn src(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.filename)
    }

    pub fn is_inline(&self) -> bool {
        self.filename.starts_with("data:")
    }
}

/// Images attached to one level-2 section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionImages {
    /// Trimmed heading text, matched exactly by the renderer.
    pub section: String,
    pub main: Option<ImageRecord>,
    pub extra: Option<ImageRecord>,
    pub emoji: Vec<ImageRecord>,
}

impl SectionImages {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            ..Default::default()
        }
    }

    /// All records in publishing order: main, extra, then emoji.
    pub fn records(&self) -> impl Iterator<Item = &ImageRecord> {
        self.main.iter().chain(self.extra.iter()).chain(self.emoji.iter())
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut ImageRecord> {
        self.main
            .iter_mut()
            .chain(self.extra.iter_mut())
            .chain(self.emoji.iter_mut())
    }
}

/// Section images in heading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageManifest {
    pub sections: Vec<SectionImages>,
}

impl ImageManifest {
    /// Images of the first section whose heading text is exactly `heading`.
    pub fn find(&self, heading: &str) -> Option<&SectionImages> {
        self.sections.iter().find(|s| s.section == heading)
    }

    pub fn records(&self) -> impl Iterator<Item = &ImageRecord> {
        self.sections.iter().flat_map(SectionImages::records)
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut ImageRecord> {
        self.sections.iter_mut().flat_map(SectionImages::records_mut)
    }

    pub fn len(&self) -> usize {
        self.records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.records().next().is_none()
    }

    /// Serialize for the asset-host boundary.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_src_prefers_url() {
        let mut record = ImageRecord::new(ImageRole::Main, "images/image1.png", "out/a.png");
        assert_eq!(record.src(), "out/a.png");
        record.url = Some("https://cdn.example/a.png".into());
        assert_eq!(record.src(), "https://cdn.example/a.png");
    }

    #[test]
    fn test_records_order() {
        let mut section = SectionImages::new("Ride");
        section.emoji.push(ImageRecord::new(ImageRole::Emoji, "e", "e"));
        section.extra = Some(ImageRecord::new(ImageRole::Extra, "x", "x"));
        section.main = Some(ImageRecord::new(ImageRole::Main, "m", "m"));

        let roles: Vec<_> = section.records().map(|r| r.role).collect();
        assert_eq!(roles, vec![ImageRole::Main, ImageRole::Extra, ImageRole::Emoji]);
    }

    #[test]
    fn test_find_is_exact() {
        let manifest = ImageManifest {
            sections: vec![SectionImages::new("Ride"), SectionImages::new("Ride ")],
        };
        assert!(manifest.find("Ride").is_some());
        assert!(manifest.find("ride").is_none());
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_manifest_json() {
        let mut section = SectionImages::new("Ride");
        section.main = Some(ImageRecord::new(ImageRole::Main, "images/image1.png", "a.png").with_alt("A"));
        let manifest = ImageManifest { sections: vec![section] };

        let json = manifest.to_json().unwrap();
        assert!(json.contains("\"role\": \"main\""));
        assert!(json.contains("\"alt\": \"A\""));
        assert!(!json.contains("\"url\""));
    }
}
