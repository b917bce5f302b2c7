//! Rendering the normalized document into the email layout.
//!
//! The exported document is expected to have three `h1` sections, each split
//! into stories by `h2`:
//!
//! - "Bike Brigade": rendered inside the intro table
//! - "In our community": rendered on the themed background, recolored
//! - "Other updates": flattened into a single list
//!
//! Missing sections are skipped.

pub mod layout;
pub mod toc;

pub use toc::{TocEntry, render_toc, section_entries};

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::config::Config;
use crate::css::CssRuleMap;
use crate::dom::{ArenaDom, ArenaNodeId, inner_html, trimmed_text};
use crate::images::ImageManifest;
use crate::transform::{Section, TopSections, format_buttons, group_by_heading, normalize, recolor};

pub const BIKE_BRIGADE: &str = "Bike Brigade";
pub const IN_OUR_COMMUNITY: &str = "In our community";
pub const OTHER_UPDATES: &str = "Other updates";

static EMPTY_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>(?:\s|<span>\s*</span>)*</p>").unwrap());

/// Remove empty paragraph artifacts left behind by extracted images.
pub fn cleanup(html: &str) -> String {
    EMPTY_PARAGRAPH.replace_all(html, "").into_owned()
}

/// The assembled newsletter.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Renders sections of one document.
pub struct Renderer<'a> {
    images: &'a ImageManifest,
    rules: &'a CssRuleMap,
    config: &'a Config,
}

impl<'a> Renderer<'a> {
    pub fn new(images: &'a ImageManifest, rules: &'a CssRuleMap, config: &'a Config) -> Self {
        Self {
            images,
            rules,
            config,
        }
    }

    /// Render every story of a top-level section.
    ///
    /// Story nodes are moved out of the document into per-story wrappers.
    pub fn render_section(&self, dom: &mut ArenaDom, section: &Section, themed: bool) -> String {
        group_by_heading(dom, section.content(), 2)
            .iter()
            .map(|story| self.render_story(dom, story, themed))
            .collect()
    }

    fn render_story(&self, dom: &mut ArenaDom, story: &Section, themed: bool) -> String {
        let wrapper = self.wrap(dom, Some(story.name.as_str()), story.content());
        let call_to_action = format_buttons(dom, wrapper).filter(|href| !href.is_empty());
        if themed {
            recolor(dom, wrapper, &self.config.theme);
        }
        let content = inner_html(dom, wrapper);

        let images = self.images.find(&story.name);
        let extra_row = images
            .and_then(|i| i.extra.as_ref())
            .map(|extra| layout::extra_image_row(extra.src(), &extra.alt))
            .unwrap_or_default();

        debug!(story = %story.name, themed, "rendered story");
        match images.and_then(|i| i.main.as_ref()) {
            Some(main) => {
                let alt = if main.alt.is_empty() { &story.name } else { &main.alt };
                let image = layout::main_image(main.src(), alt, call_to_action.as_deref());
                layout::story_with_image(&image, &content, &extra_row)
            }
            None => layout::story_text_only(&content, &extra_row),
        }
    }

    /// Move `nodes` into a fresh `div`, behind a new `h2` when given a
    /// heading, and normalize the result.
    fn wrap(&self, dom: &mut ArenaDom, heading: Option<&str>, nodes: &[ArenaNodeId]) -> ArenaNodeId {
        let wrapper = dom.create_html_element("div", &[]);
        if let Some(text) = heading {
            let h2 = dom.create_html_element("h2", &[]);
            dom.append_text(h2, text);
            dom.append(wrapper, h2);
        }
        for &id in nodes {
            dom.append(wrapper, id);
        }
        normalize(dom, wrapper, self.rules);
        wrapper
    }

    /// List items of the "Other updates" section.
    ///
    /// Lists contribute their items; any other non-empty node becomes an item.
    fn update_items(&self, dom: &mut ArenaDom, section: &Section) -> String {
        let wrapper = self.wrap(dom, None, section.content());
        let mut items = String::new();
        for child in dom.element_children(wrapper) {
            match dom.element_name(child) {
                Some("ul" | "ol") => items.push_str(&inner_html(dom, child)),
                _ if trimmed_text(dom, child).is_empty() && !dom.contains_tag(child, "img") => {}
                _ => {
                    items.push_str("<li>");
                    items.push_str(&inner_html(dom, child));
                    items.push_str("</li>");
                }
            }
        }
        items
    }

    /// Assemble the complete newsletter from the document's top sections.
    pub fn assemble(&self, dom: &mut ArenaDom, top: &TopSections) -> Rendered {
        let theme = &self.config.theme;
        let run_date = &self.config.run_date;

        let toc: Vec<TocEntry> = {
            let doc: &ArenaDom = dom;
            [BIKE_BRIGADE, IN_OUR_COMMUNITY]
                .into_iter()
                .filter_map(|name| top.get(name))
                .flat_map(|section| section_entries(doc, section))
                .collect()
        };

        let mut html = String::from(layout::NEWSLETTER_OPEN);
        html.push_str(&layout::date_banner(run_date, theme));
        html.push_str(&layout::intro_open(theme));
        html.push_str(&render_toc(&toc));
        html.push_str(&layout::signup_block(run_date, theme));

        if let Some(section) = top.get(BIKE_BRIGADE) {
            html.push_str(&self.render_section(dom, section, false));
        }
        html.push_str(layout::INTRO_CLOSE);

        if let Some(section) = top.get(IN_OUR_COMMUNITY) {
            html.push_str(&layout::community_open(IN_OUR_COMMUNITY, theme));
            html.push_str(&self.render_section(dom, section, true));
            html.push_str(layout::COMMUNITY_CLOSE);
        }

        if let Some(section) = top.get(OTHER_UPDATES) {
            let items = self.update_items(dom, section);
            html.push_str(&layout::other_updates(OTHER_UPDATES, &items));
        }

        html.push_str(layout::NEWSLETTER_CLOSE);

        info!(
            sections = top.len(),
            toc_entries = toc.len(),
            bytes = html.len(),
            "assembled newsletter"
        );
        Rendered {
            html: cleanup(&html),
            toc,
        }
    }
}
