//! Style normalization of exported markup.
//!
//! Exported documents carry generated classes and ids on nearly every
//! element. Emphasis is the only styling worth keeping, so class-driven bold
//! and italic become inline styles and everything else is dropped.

use tracing::debug;
use url::Url;

use crate::css::CssRuleMap;
use crate::dom::{ArenaDom, ArenaNodeId, NodeKind, remove_children_where, walk_bottom_up};

/// Elements whose presentation attributes are rewritten.
const NORMALIZED_TAGS: &[&str] = &["li", "b", "ul", "span", "p", "a", "h2", "div"];

const BOLD: &str = "font-weight:700";
const ITALIC: &str = "font-style:italic";

/// Link-tracking redirect prefix; the real target is in the `q` parameter.
pub const REDIRECT_PREFIX: &str = "https://www.google.com/url";

/// Normalize the subtree under `root` in place.
pub fn normalize(dom: &mut ArenaDom, root: ArenaNodeId, rules: &CssRuleMap) {
    for id in dom.elements_by_tag(root, NORMALIZED_TAGS) {
        if !convert_emphasis(dom, id, rules) {
            strip_presentation(dom, id);
        }
    }

    walk_bottom_up(dom, root, |dom, parent| {
        remove_children_where(dom, parent, |dom, child| {
            NodeKind::of(dom, child) == NodeKind::Superscript || is_empty_paragraph(dom, child)
        });
    });

    unwrap_redirects(dom, root);
}

/// A `p` with no visible text and no image.
pub fn is_empty_paragraph(dom: &ArenaDom, id: ArenaNodeId) -> bool {
    NodeKind::of(dom, id) == NodeKind::Paragraph
        && dom.text(id).trim().is_empty()
        && !dom.contains_tag(id, "img")
}

/// Replace class-driven emphasis with an inline style. Returns whether the
/// node was converted.
fn convert_emphasis(dom: &mut ArenaDom, id: ArenaNodeId, rules: &CssRuleMap) -> bool {
    let classes: Vec<String> = dom.element_classes(id).into_iter().map(String::from).collect();
    if classes.is_empty() || dom.text(id).trim().is_empty() {
        return false;
    }

    let mut signals: Vec<&str> = Vec::new();
    for class in &classes {
        let Some(declarations) = rules.lookup_class(class) else {
            continue;
        };
        let compact: String = declarations.chars().filter(|c| !c.is_whitespace()).collect();
        for signal in [BOLD, ITALIC] {
            if compact.contains(signal) && !signals.contains(&signal) {
                signals.push(signal);
            }
        }
    }

    if signals.is_empty() {
        return false;
    }

    dom.set_attr(id, "style", signals.join(";"));
    dom.remove_attr(id, "class");
    true
}

fn strip_presentation(dom: &mut ArenaDom, id: ArenaNodeId) {
    if dom.get_attr(id, "style") != Some(BOLD) {
        dom.remove_attr(id, "style");
    }
    dom.remove_attr(id, "class");
    dom.remove_attr(id, "id");
}

/// The target of a redirect-tracking link, if `href` is one.
pub fn unwrap_redirect(href: &str) -> Option<String> {
    if !href.starts_with(REDIRECT_PREFIX) {
        return None;
    }
    let url = Url::parse(href).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn unwrap_redirects(dom: &mut ArenaDom, root: ArenaNodeId) {
    for id in dom.elements_by_tag(root, &["a"]) {
        let Some(target) = dom.get_attr(id, "href").and_then(unwrap_redirect) else {
            continue;
        };
        debug!(target = %target, "unwrapped redirect link");
        dom.set_attr(id, "href", target);
    }
}
