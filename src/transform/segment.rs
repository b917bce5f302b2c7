//! Grouping sibling nodes into heading-delimited sections.

use crate::dom::{ArenaDom, ArenaNodeId, NodeKind, trimmed_text};

/// A heading and the sibling nodes that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Trimmed heading text.
    pub name: String,
    pub heading: ArenaNodeId,
    /// The heading followed by the section's content.
    pub nodes: Vec<ArenaNodeId>,
}

impl Section {
    fn new(name: String, heading: ArenaNodeId) -> Self {
        Self {
            name,
            heading,
            nodes: vec![heading],
        }
    }

    /// Nodes after the heading.
    pub fn content(&self) -> &[ArenaNodeId] {
        &self.nodes[1..]
    }
}

/// Split `nodes` at every level-`level` heading with non-empty text.
///
/// Nodes before the first such heading are dropped. Headings with only
/// whitespace are treated as ordinary content.
pub fn group_by_heading(dom: &ArenaDom, nodes: &[ArenaNodeId], level: u8) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for &id in nodes {
        if NodeKind::of(dom, id).is_heading(level) {
            let name = trimmed_text(dom, id);
            if !name.is_empty() {
                sections.push(Section::new(name, id));
                continue;
            }
        }
        if let Some(current) = sections.last_mut() {
            current.nodes.push(id);
        }
    }

    sections
}

/// Top-level sections of the body, keyed by heading text.
#[derive(Debug, Clone, Default)]
pub struct TopSections {
    sections: Vec<Section>,
}

impl TopSections {
    /// Group the element children of `body` by `h1`.
    pub fn from_body(dom: &ArenaDom, body: ArenaNodeId) -> Self {
        Self {
            sections: group_by_heading(dom, &dom.element_children(body), 1),
        }
    }

    /// The section named `name`. With duplicate names the last one wins.
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().rev().find(|s| s.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body, parse_document};

    #[test]
    fn test_groups_by_level() {
        let dom = parse_document(
            "<p>before</p><h1>Bike Brigade</h1><h2>Ride</h2><p>a</p><h1>  </h1><p>b</p><h1>Other updates</h1><ul><li>x</li></ul>",
        );
        let top = TopSections::from_body(&dom, body(&dom).unwrap());

        assert_eq!(top.names().collect::<Vec<_>>(), vec!["Bike Brigade", "Other updates"]);
        let brigade = top.get("Bike Brigade").unwrap();
        // h2, p, blank h1, p
        assert_eq!(brigade.content().len(), 4);
        assert_eq!(brigade.nodes[0], brigade.heading);
        assert!(top.get("Missing").is_none());
    }

    #[test]
    fn test_level_two_within_section() {
        let dom = parse_document("<h1>S</h1><p>lead</p><h2>A</h2><p>a1</p><p>a2</p><h2>B</h2>");
        let top = TopSections::from_body(&dom, body(&dom).unwrap());
        let stories = group_by_heading(&dom, top.get("S").unwrap().content(), 2);

        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].name, "A");
        assert_eq!(stories[0].content().len(), 2);
        assert_eq!(stories[1].name, "B");
        assert!(stories[1].content().is_empty());
    }

    #[test]
    fn test_last_duplicate_wins() {
        let dom = parse_document("<h1>S</h1><p>one</p><h1>S</h1><p>two</p><p>three</p>");
        let top = TopSections::from_body(&dom, body(&dom).unwrap());
        assert_eq!(top.get("S").unwrap().content().len(), 2);
    }
}
