//! Image extraction pass.
//!
//! Walks `img` and `h2` elements in document order. A local or inline image
//! waits until the next `h2`, which makes it that section's main image. A
//! second image arriving while one is still waiting pushes the first one out
//! as the extra image of the section before it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use tracing::{debug, info, warn};

use super::{ImageManifest, ImageRecord, ImageRole, SectionImages};
use crate::config::Config;
use crate::dom::{ArenaDom, ArenaNodeId, NodeKind, trimmed_text};
use crate::error::Result;
use crate::slug::slugify;
use crate::util::dotted_extension;

static EMOJI_ALT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^:.+?:").unwrap());

static INLINE_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:image/([A-Za-z0-9.+-]+);base64,(.*)$").unwrap());

/// Slug used for an extra image seen before any heading.
const UNKNOWN_SECTION: &str = "unknown";

enum PendingData {
    /// A file under the source directory.
    Local(PathBuf),
    /// Base64 payload of a `data:` URI.
    Inline(String),
}

struct PendingImage {
    node: ArenaNodeId,
    src: String,
    alt: String,
    /// Extension including the dot.
    extension: String,
    data: PendingData,
}

struct Extractor<'a> {
    source_dir: &'a Path,
    output_dir: &'a Path,
    file_prefix: String,
    manifest: ImageManifest,
}

impl Extractor<'_> {
    /// Write a pending image as `{prefix}{slug}{suffix}{ext}`.
    ///
    /// Returns `None` when the local file does not exist.
    fn write(&self, image: &PendingImage, slug: &str, suffix: &str) -> Result<Option<PathBuf>> {
        let target = self.output_dir.join(format!(
            "{}{slug}{suffix}{}",
            self.file_prefix, image.extension
        ));

        match &image.data {
            PendingData::Local(path) => {
                if !path.exists() {
                    warn!(src = %image.src, "image file not found, skipping");
                    return Ok(None);
                }
                if !same_file(path, &target) {
                    fs::copy(path, &target)?;
                }
            }
            PendingData::Inline(payload) => {
                let bytes = STANDARD.decode(payload.trim())?;
                fs::write(&target, bytes)?;
            }
        }

        debug!(src = %image.src, target = %target.display(), "wrote image");
        Ok(Some(target))
    }

    fn record(&self, image: &PendingImage, role: ImageRole, path: &Path) -> ImageRecord {
        ImageRecord::new(role, image.src.as_str(), path.to_string_lossy()).with_alt(image.alt.as_str())
    }

    /// The pending image becomes the extra image of the most recent section.
    fn flush_extra(&mut self, dom: &mut ArenaDom, image: PendingImage) -> Result<()> {
        let slug = match self.manifest.sections.last() {
            Some(section) => slugify(&section.section),
            None => UNKNOWN_SECTION.to_string(),
        };

        if let Some(path) = self.write(&image, &slug, "-extra")? {
            let record = self.record(&image, ImageRole::Extra, &path);
            if let Some(section) = self.manifest.sections.last_mut() {
                section.extra = Some(record);
            }
        }
        dom.detach(image.node);
        Ok(())
    }

    fn heading(&mut self, dom: &mut ArenaDom, text: String, pending: Option<PendingImage>) -> Result<()> {
        let mut section = SectionImages::new(text);

        if let Some(image) = pending {
            let slug = slugify(&section.section);
            if let Some(path) = self.write(&image, &slug, "")? {
                section.main = Some(self.record(&image, ImageRole::Main, &path));
            }
            dom.detach(image.node);
        }

        self.manifest.sections.push(section);
        Ok(())
    }

    /// Classify an `img`. Returns the image if it should wait for a heading.
    fn image(&mut self, dom: &mut ArenaDom, id: ArenaNodeId, local_prefix: &str) -> Option<PendingImage> {
        let mut src = dom.get_attr(id, "src").unwrap_or_default().to_string();
        let alt = dom.get_attr(id, "alt").unwrap_or_default().to_string();

        if !src.starts_with("data:") {
            let extension = dotted_extension(&src);
            if !extension.is_empty()
                && extension != ".jpg"
                && let Some(stem) = src.strip_suffix(extension.as_str())
            {
                let jpg = format!("{stem}.jpg");
                if self.source_dir.join(&jpg).exists() {
                    debug!(src = %src, jpg = %jpg, "using re-encoded sibling");
                    dom.set_attr(id, "src", jpg.as_str());
                    src = jpg;
                }
            }
        }

        if EMOJI_ALT.is_match(&alt) {
            let filename = if src.starts_with("data:") {
                src.clone()
            } else {
                let path = self.source_dir.join(&src);
                if !path.exists() {
                    warn!(src = %src, "emoji image not found, skipping");
                    return None;
                }
                path.to_string_lossy().into_owned()
            };
            match self.manifest.sections.last_mut() {
                Some(section) => section
                    .emoji
                    .push(ImageRecord::new(ImageRole::Emoji, src, filename).with_alt(alt)),
                None => debug!(alt = %alt, "emoji before first heading"),
            }
            return None;
        }

        if src.starts_with(local_prefix) {
            return Some(PendingImage {
                node: id,
                extension: dotted_extension(&src),
                data: PendingData::Local(self.source_dir.join(&src)),
                src,
                alt,
            });
        }

        let caps = INLINE_IMAGE.captures(&src)?;
        let extension = format!(".{}", &caps[1]);
        let payload = caps[2].to_string();
        Some(PendingImage {
            node: id,
            src,
            alt,
            extension,
            data: PendingData::Inline(payload),
        })
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Extract section images from the document into `config.images_dir`.
///
/// Extracted nodes are removed from the tree; emoji images stay in place and
/// are only recorded. Relative `src` values resolve against `source_dir`.
pub fn extract_images(dom: &mut ArenaDom, source_dir: &Path, config: &Config) -> Result<ImageManifest> {
    fs::create_dir_all(&config.images_dir)?;

    let mut extractor = Extractor {
        source_dir,
        output_dir: &config.images_dir,
        file_prefix: config.run_date.file_prefix(),
        manifest: ImageManifest::default(),
    };
    let mut pending: Option<PendingImage> = None;

    for id in dom.elements_by_tag(dom.document(), &["img", "h2"]) {
        match NodeKind::of(dom, id) {
            NodeKind::Image => {
                if let Some(previous) = pending.take() {
                    extractor.flush_extra(dom, previous)?;
                }
                pending = extractor.image(dom, id, &config.local_prefix);
            }
            NodeKind::Heading(2) => {
                let text = trimmed_text(dom, id);
                if text.is_empty() {
                    continue;
                }
                extractor.heading(dom, text, pending.take())?;
            }
            _ => {}
        }
    }

    if let Some(image) = pending {
        debug!(src = %image.src, "image after last heading left in place");
    }

    info!(
        sections = extractor.manifest.sections.len(),
        images = extractor.manifest.len(),
        "extracted images"
    );
    Ok(extractor.manifest)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::date::RunDate;
    use crate::dom::{inner_html, parse_document};

    struct Fixture {
        source: tempfile::TempDir,
        output: tempfile::TempDir,
        config: Config,
    }

    fn fixture(files: &[&str]) -> Fixture {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::create_dir_all(source.path().join("images")).unwrap();
        for file in files {
            fs::write(source.path().join(file), file.as_bytes()).unwrap();
        }
        let config = Config::new(RunDate::parse("2024-12-01").unwrap())
            .with_images_dir(output.path());
        Fixture { source, output, config }
    }

    #[test]
    fn test_image_before_heading_is_main() {
        let fx = fixture(&["images/image1.png"]);
        let mut dom = parse_document(r#"<p><img src="images/image1.png" alt="Riders"></p><h2>Weekly Ride</h2>"#);

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        let section = manifest.find("Weekly Ride").unwrap();
        let main = section.main.as_ref().unwrap();
        assert_eq!(main.alt, "Riders");
        assert!(main.filename.ends_with("2024-12-01-news-weekly-ride.png"));
        assert!(fx.output.path().join("2024-12-01-news-weekly-ride.png").exists());
        assert!(dom.find_by_tag("img").is_none());
    }

    #[test]
    fn test_second_pending_image_becomes_previous_extra() {
        let fx = fixture(&["images/image1.png", "images/image2.png"]);
        let mut dom = parse_document(
            r#"<h2>A</h2><p>text</p><img src="images/image1.png"><img src="images/image2.png"><h2>B</h2>"#,
        );

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        let a = manifest.find("A").unwrap();
        assert!(a.main.is_none());
        assert!(a.extra.as_ref().unwrap().filename.ends_with("2024-12-01-news-a-extra.png"));
        let b = manifest.find("B").unwrap();
        assert_eq!(b.main.as_ref().unwrap().source, "images/image2.png");
        assert!(b.extra.is_none());
    }

    #[test]
    fn test_later_extra_overwrites() {
        let fx = fixture(&["images/image1.png", "images/image2.png", "images/image3.png"]);
        let mut dom = parse_document(
            r#"<h2>A</h2><img src="images/image1.png"><img src="images/image2.png"><img src="images/image3.png"><h2>B</h2>"#,
        );

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        let a = manifest.find("A").unwrap();
        assert_eq!(a.extra.as_ref().unwrap().source, "images/image2.png");
        assert_eq!(manifest.find("B").unwrap().main.as_ref().unwrap().source, "images/image3.png");
    }

    #[test]
    fn test_prefers_jpg_sibling() {
        let fx = fixture(&["images/image1.png", "images/image1.jpg"]);
        let mut dom = parse_document(r#"<img src="images/image1.png"><h2>Ride</h2>"#);

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        let main = manifest.find("Ride").unwrap().main.as_ref().unwrap();
        assert_eq!(main.source, "images/image1.jpg");
        assert!(main.filename.ends_with("2024-12-01-news-ride.jpg"));
    }

    #[test]
    fn test_inline_image_is_decoded() {
        let fx = fixture(&[]);
        let mut dom = parse_document(r#"<img src="data:image/png;base64,aGVsbG8="><h2>Ride</h2>"#);

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        assert!(manifest.find("Ride").unwrap().main.is_some());
        let written = fs::read(fx.output.path().join("2024-12-01-news-ride.png")).unwrap();
        assert_eq!(written, b"hello");
    }

    #[test]
    fn test_missing_file_is_skipped_and_removed() {
        let fx = fixture(&[]);
        let mut dom = parse_document(r#"<img src="images/gone.png"><h2>Ride</h2>"#);

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        let section = manifest.find("Ride").unwrap();
        assert!(section.main.is_none());
        assert!(dom.find_by_tag("img").is_none());
    }

    #[test]
    fn test_emoji_is_recorded_and_kept() {
        let fx = fixture(&["images/image5.png"]);
        let mut dom = parse_document(r#"<h2>Ride</h2><p><img src="images/image5.png" alt=":bike:"> go</p>"#);

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        let section = manifest.find("Ride").unwrap();
        assert_eq!(section.emoji.len(), 1);
        assert_eq!(section.emoji[0].source, "images/image5.png");
        assert!(section.main.is_none());
        assert!(dom.find_by_tag("img").is_some());
    }

    #[test]
    fn test_missing_emoji_is_not_recorded() {
        let fx = fixture(&[]);
        let mut dom = parse_document(r#"<h2>Ride</h2><p><img src="images/gone.png" alt=":bike:"> go</p>"#);

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        assert!(manifest.find("Ride").unwrap().emoji.is_empty());
        assert!(dom.find_by_tag("img").is_some());
    }

    #[test]
    fn test_extension_not_a_suffix_of_src() {
        let fx = fixture(&[]);
        let src = "https://example.com/a.\u{e9}a//";
        let mut dom = parse_document(&format!(r#"<img src="{src}"><h2>Ride</h2>"#));

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        assert!(manifest.is_empty());
        let img = dom.find_by_tag("img").unwrap();
        assert_eq!(dom.get_attr(img, "src"), Some(src));
    }

    #[test]
    fn test_trailing_image_left_in_place() {
        let fx = fixture(&["images/image1.png"]);
        let mut dom = parse_document(r#"<h2>Ride</h2><p><img src="images/image1.png"></p>"#);

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        assert!(manifest.find("Ride").unwrap().main.is_none());
        let body = dom.find_by_tag("body").unwrap();
        assert!(inner_html(&dom, body).contains("images/image1.png"));
    }

    proptest! {
        #[test]
        fn prop_sections_hold_at_most_one_main_and_extra(
            tokens in prop::collection::vec(any::<bool>(), 0..24)
        ) {
            let fx = fixture(&[]);
            let mut html = String::from("<h2>H0</h2>");
            let mut headings = 1;
            for is_image in tokens {
                if is_image {
                    html.push_str(r#"<p><img src="data:image/png;base64,aGVsbG8="></p>"#);
                } else {
                    html.push_str(&format!("<h2>H{headings}</h2>"));
                    headings += 1;
                }
            }
            let mut dom = parse_document(&html);

            let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

            prop_assert_eq!(manifest.sections.len(), headings);
            for section in &manifest.sections {
                prop_assert!(section.main.as_ref().is_none_or(|r| r.role == ImageRole::Main));
                prop_assert!(section.extra.as_ref().is_none_or(|r| r.role == ImageRole::Extra));
            }
            let written = fs::read_dir(fx.output.path()).unwrap().count();
            prop_assert_eq!(written, manifest.len());
        }
    }

    #[test]
    fn test_remote_images_are_ignored() {
        let fx = fixture(&[]);
        let mut dom = parse_document(r#"<img src="https://example.com/a.png"><h2>Ride</h2>"#);

        let manifest = extract_images(&mut dom, fx.source.path(), &fx.config).unwrap();

        assert!(manifest.is_empty());
        assert!(dom.find_by_tag("img").is_some());
    }
}
