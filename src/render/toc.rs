//! Table of contents.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::dom::{ArenaDom, trimmed_text};
use crate::transform::normalize::is_empty_paragraph;
use crate::transform::{Section, group_by_heading};

static DATE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Mon|Tue|Wed|Thu|Fri|Sat|Sun)\s+([A-Za-z]+\s+[0-9]+)").unwrap()
});

/// One line of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub label: String,
    /// `Dec 1` when the story opens with a day and date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_hint: Option<String>,
}

impl TocEntry {
    /// Build an entry from a story heading and the text of its first paragraph.
    ///
    /// ```
    /// use docmail::render::TocEntry;
    ///
    /// let entry = TocEntry::new("Weekly Ride", Some("Sun Dec 1: meet at noon"));
    /// assert_eq!(entry.label, "Dec 1: Weekly Ride");
    /// assert_eq!(TocEntry::new("Notes", None).label, "Notes");
    /// ```
    pub fn new(heading: &str, first_text: Option<&str>) -> Self {
        let date_hint = first_text
            .and_then(|text| DATE_HINT.captures(text))
            .map(|caps| caps[2].to_string());
        let label = match &date_hint {
            Some(date) => format!("{date}: {heading}"),
            None => heading.to_string(),
        };
        Self { label, date_hint }
    }
}

/// Entries for every story of a top-level section.
pub fn section_entries(dom: &ArenaDom, section: &Section) -> Vec<TocEntry> {
    group_by_heading(dom, section.content(), 2)
        .iter()
        .map(|story| {
            let first = story
                .content()
                .iter()
                .find(|&&id| !is_empty_paragraph(dom, id))
                .map(|&id| trimmed_text(dom, id));
            TocEntry::new(&story.name, first.as_deref())
        })
        .collect()
}

/// Escape a label for HTML text, quotes included.
pub fn escape_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<ul>` with one newline-prefixed `<li>` per entry.
pub fn render_toc(entries: &[TocEntry]) -> String {
    let mut html = String::from("<ul>");
    for entry in entries {
        html.push_str("\n<li>");
        html.push_str(&escape_label(&entry.label));
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}
