//! Pending-run classification of local images.
//!
//! Consecutive local images form a run. When a run is flushed only its
//! current image survives: as the main image normally, or as the extra image
//! when a level-1 heading closes the run. The result is a [`RunPlan`]; the
//! tree and the filesystem are left untouched.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::date::RunDate;
use crate::dom::{ArenaDom, NodeKind, trimmed_text};
use crate::slug::heading_key;
use crate::util::dotted_extension;

/// Section key used before the first heading.
pub const DEFAULT_SECTION_KEY: &str = "intro";

/// An image the plan assigns to a section slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedImage {
    /// The `src` as written in the document.
    pub source: String,
    /// `{date}-news-{key}[-extra]{.ext}`
    pub filename: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlannedSection {
    pub key: String,
    pub main: Option<PlannedImage>,
    pub extra: Option<PlannedImage>,
}

/// Planned main/extra images per heading key, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunPlan {
    pub sections: Vec<PlannedSection>,
}

impl RunPlan {
    pub fn get(&self, key: &str) -> Option<&PlannedSection> {
        self.sections.iter().find(|s| s.key == key)
    }

    fn entry(&mut self, key: &str) -> &mut PlannedSection {
        let index = match self.sections.iter().position(|s| s.key == key) {
            Some(index) => index,
            None => {
                self.sections.push(PlannedSection {
                    key: key.to_string(),
                    ..Default::default()
                });
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

struct RunImage {
    src: String,
    alt: String,
    demoted: bool,
}

struct RunClassifier<'a> {
    source_dir: &'a Path,
    local_prefix: &'a str,
    file_prefix: String,
    heading: String,
    run: Vec<RunImage>,
    plan: RunPlan,
}

impl RunClassifier<'_> {
    fn image(&mut self, src: &str, alt: &str) {
        if !src.starts_with(self.local_prefix) {
            return;
        }
        if let Some(previous) = self.run.last_mut() {
            previous.demoted = true;
        }
        self.run.push(RunImage {
            src: src.to_string(),
            alt: alt.to_string(),
            demoted: false,
        });
    }

    fn top_heading(&mut self) {
        if let Some(current) = self.run.last_mut() {
            current.demoted = true;
        }
        self.flush();
    }

    fn heading(&mut self, key: String) {
        self.flush();
        self.heading = key;
    }

    fn flush(&mut self) {
        let run = std::mem::take(&mut self.run);
        let Some(image) = run.into_iter().last() else {
            return;
        };

        if !self.source_dir.join(&image.src).exists() {
            debug!(src = %image.src, "planned image missing on disk");
            return;
        }

        let suffix = if image.demoted { "-extra" } else { "" };
        let planned = PlannedImage {
            filename: format!(
                "{}{}{suffix}{}",
                self.file_prefix,
                self.heading,
                dotted_extension(&image.src)
            ),
            alt: if image.alt.is_empty() {
                self.heading.clone()
            } else {
                image.alt
            },
            source: image.src,
        };

        let section = self.plan.entry(&self.heading);
        if image.demoted {
            section.extra = Some(planned);
        } else {
            section.main = Some(planned);
        }
    }
}

/// Plan main and extra images per heading key.
///
/// Only images whose `src` starts with `local_prefix` take part, and only
/// those whose file exists under `source_dir` are recorded.
pub fn classify_runs(
    dom: &ArenaDom,
    source_dir: &Path,
    local_prefix: &str,
    run_date: &RunDate,
) -> RunPlan {
    let mut classifier = RunClassifier {
        source_dir,
        local_prefix,
        file_prefix: run_date.file_prefix(),
        heading: DEFAULT_SECTION_KEY.to_string(),
        run: Vec::new(),
        plan: RunPlan::default(),
    };

    for id in dom.descendants(dom.document()) {
        match NodeKind::of(dom, id) {
            NodeKind::Image => classifier.image(
                dom.get_attr(id, "src").unwrap_or_default(),
                dom.get_attr(id, "alt").unwrap_or_default(),
            ),
            NodeKind::Heading(1) => classifier.top_heading(),
            NodeKind::Heading(2) | NodeKind::Heading(3) => {
                let text = trimmed_text(dom, id);
                if !text.is_empty() {
                    classifier.heading(heading_key(&text));
                }
            }
            _ => {}
        }
    }
    classifier.flush();

    debug!(sections = classifier.plan.sections.len(), "classified image runs");
    classifier.plan
}
