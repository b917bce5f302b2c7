//! Bracketed call-to-action paragraphs.
//!
//! A paragraph whose whole text is `[ Label ]` becomes a button linking to
//! the first anchor inside it.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{ArenaDom, ArenaNodeId, trimmed_text};
use crate::render::layout;

static BUTTON_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[\s*(.+?)\s*\]$").unwrap());

/// The button label of a paragraph's trimmed text, if it is bracketed.
pub fn button_label(text: &str) -> Option<&str> {
    BUTTON_LABEL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Replace every bracketed paragraph under `root` with a button block.
///
/// Returns the href of the first button, the section's call to action.
pub fn format_buttons(dom: &mut ArenaDom, root: ArenaNodeId) -> Option<String> {
    let mut call_to_action = None;

    for p in dom.elements_by_tag(root, &["p"]) {
        let text = trimmed_text(dom, p);
        let Some(label) = button_label(&text) else {
            continue;
        };

        let href = dom
            .elements_by_tag(p, &["a"])
            .first()
            .and_then(|&a| dom.get_attr(a, "href"))
            .unwrap_or_default()
            .to_string();

        let button = dom.create_markup(layout::cta_button(&href, label));
        dom.replace(p, button);

        if call_to_action.is_none() {
            call_to_action = Some(href);
        }
    }

    call_to_action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body, inner_html, parse_document};

    #[test]
    fn test_button_label() {
        assert_eq!(button_label("[ Join Us ]"), Some("Join Us"));
        assert_eq!(button_label("[Sign up]"), Some("Sign up"));
        assert_eq!(button_label("Sign up"), None);
        assert_eq!(button_label("see [here]"), None);
    }

    #[test]
    fn test_replaces_paragraph_and_returns_first_href() {
        let mut dom = parse_document(
            r#"<p>intro</p><p>[ <a href="https://example.org/join">Join Us</a> ]</p><p>[ <a href="https://example.org/two">Two</a> ]</p>"#,
        );
        let root = body(&dom).unwrap();

        let cta = format_buttons(&mut dom, root);

        assert_eq!(cta.as_deref(), Some("https://example.org/join"));
        let html = inner_html(&dom, root);
        assert!(html.starts_with("<p>intro</p><table"));
        assert!(html.contains(r#"href="https://example.org/join""#));
        assert!(html.contains(">Join Us</a>"));
        assert!(html.contains(">Two</a>"));
        assert!(!html.contains("<p>["));
        assert_eq!(html.matches("mceButtonLink").count(), 2);
    }

    #[test]
    fn test_button_without_anchor_has_empty_href() {
        let mut dom = parse_document("<p>[ Soon ]</p>");
        let root = body(&dom).unwrap();

        assert_eq!(format_buttons(&mut dom, root).as_deref(), Some(""));
        assert!(inner_html(&dom, root).contains(r#"href="""#));
    }

    #[test]
    fn test_no_buttons() {
        let mut dom = parse_document("<p>nothing</p>");
        let root = body(&dom).unwrap();
        assert_eq!(format_buttons(&mut dom, root), None);
    }
}
