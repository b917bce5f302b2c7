//! Node-kind classification.
//!
//! Every pass dispatches on [`NodeKind`] instead of comparing tag strings
//! ad hoc, so the set of node shapes the pipeline understands is closed.

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// The node shapes the pipeline distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Image,
    Heading(u8),
    Paragraph,
    Anchor,
    Table,
    Superscript,
    Style,
    /// Any other element.
    Other,
    Text,
    /// Pre-rendered markup; opaque to every pass.
    Markup,
    /// Document, comment and doctype nodes.
    Ignored,
}

impl NodeKind {
    /// Classify a node.
    pub fn of(dom: &ArenaDom, id: ArenaNodeId) -> NodeKind {
        let Some(node) = dom.get(id) else {
            return NodeKind::Ignored;
        };
        match &node.data {
            ArenaNodeData::Element { name, .. } => Self::from_tag(name.local.as_ref()),
            ArenaNodeData::Text(_) => NodeKind::Text,
            ArenaNodeData::Markup(_) => NodeKind::Markup,
            _ => NodeKind::Ignored,
        }
    }

    fn from_tag(tag: &str) -> NodeKind {
        match tag {
            "img" => NodeKind::Image,
            "h1" => NodeKind::Heading(1),
            "h2" => NodeKind::Heading(2),
            "h3" => NodeKind::Heading(3),
            "h4" => NodeKind::Heading(4),
            "h5" => NodeKind::Heading(5),
            "h6" => NodeKind::Heading(6),
            "p" => NodeKind::Paragraph,
            "a" => NodeKind::Anchor,
            "table" => NodeKind::Table,
            "sup" => NodeKind::Superscript,
            "style" => NodeKind::Style,
            _ => NodeKind::Other,
        }
    }

    pub fn is_heading(self, level: u8) -> bool {
        self == NodeKind::Heading(level)
    }
}
