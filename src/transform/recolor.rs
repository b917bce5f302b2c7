//! Recoloring text and links for dark section backgrounds.

use crate::config::Theme;
use crate::dom::{ArenaDom, ArenaNodeId, NodeKind};

/// Class of generated button links, which keep their own colors.
pub const BUTTON_LINK_CLASS: &str = "mceButtonLink";

/// Recolor every child subtree of `root`.
///
/// Tables and pre-rendered markup are left alone. Links get the theme's link
/// style; non-blank text gets wrapped in a span with the text style.
pub fn recolor(dom: &mut ArenaDom, root: ArenaNodeId, theme: &Theme) {
    for child in dom.element_children(root) {
        recolor_node(dom, child, theme);
    }
}

fn recolor_node(dom: &mut ArenaDom, id: ArenaNodeId, theme: &Theme) {
    match NodeKind::of(dom, id) {
        NodeKind::Table | NodeKind::Markup | NodeKind::Text | NodeKind::Ignored => {}
        NodeKind::Anchor => {
            if !dom.has_class(id, BUTTON_LINK_CLASS) {
                dom.set_attr(id, "style", theme.community_link_style.as_str());
            }
        }
        _ => {
            let children: Vec<_> = dom.children(id).collect();
            for child in children {
                if dom.is_text(child) {
                    if dom.text_content(child).is_some_and(|t| !t.trim().is_empty()) {
                        wrap_text(dom, child, theme);
                    }
                } else {
                    recolor_node(dom, child, theme);
                }
            }
        }
    }
}

fn wrap_text(dom: &mut ArenaDom, text: ArenaNodeId, theme: &Theme) {
    let span = dom.create_html_element("span", &[("style", theme.community_text_style.as_str())]);
    dom.insert_before(text, span);
    dom.append(span, text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body, inner_html, parse_document};

    fn recolored(html: &str) -> String {
        let mut dom = parse_document(html);
        let root = body(&dom).unwrap();
        recolor(&mut dom, root, &Theme::default());
        inner_html(&dom, root)
    }

    #[test]
    fn test_wraps_text_and_styles_links() {
        assert_eq!(
            recolored(r#"<p>Hello <a href="x">link <b>bold</b></a> </p>"#),
            r#"<p><span style="color: #ffffff">Hello </span><a href="x" style="color: #aed9ef">link <b>bold</b></a> </p>"#
        );
    }

    #[test]
    fn test_nested_text_is_wrapped() {
        assert_eq!(
            recolored("<ul><li>one</li></ul>"),
            r#"<ul><li><span style="color: #ffffff">one</span></li></ul>"#
        );
    }

    #[test]
    fn test_tables_are_never_visited() {
        let html = r#"<table><tbody><tr><td>cell <a href="x">a</a></td></tr></tbody></table>"#;
        assert_eq!(recolored(html), html);
    }

    #[test]
    fn test_nested_table_is_untouched() {
        let table = r#"<table><tbody><tr><td>cell <a href="x">a</a></td></tr></tbody></table>"#;
        assert_eq!(
            recolored(&format!("<div>text{table}</div>")),
            format!(r#"<div><span style="color: #ffffff">text</span>{table}</div>"#)
        );
    }

    #[test]
    fn test_button_links_and_markup_are_kept() {
        let mut dom = parse_document(r#"<div><a class="mceButtonLink" href="x">Go</a></div>"#);
        let root = body(&dom).unwrap();
        let markup = dom.create_markup("<p>raw</p>".to_string());
        dom.append(root, markup);

        recolor(&mut dom, root, &Theme::default());

        assert_eq!(
            inner_html(&dom, root),
            r#"<div><a class="mceButtonLink" href="x">Go</a></div><p>raw</p>"#
        );
    }
}
