//! Document tree for exported markup.
//!
//! The exported document is parsed with html5ever into an [`ArenaDom`],
//! which every pipeline pass then rewrites in place.
//!
//! # Example
//!
//! ```
//! use docmail::dom::{parse_document, inner_html};
//!
//! let dom = parse_document("<p>Hello</p>");
//! let body = dom.find_by_tag("body").unwrap();
//! assert_eq!(inner_html(&dom, body), "<p>Hello</p>");
//! ```

mod arena;
mod kind;
mod pass;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, html_name};
pub use kind::NodeKind;
pub use pass::{remove_children_where, walk_bottom_up};
pub use serialize::{escape_attr, escape_text, inner_html, outer_html};

use html5ever::driver::ParseOpts;
use html5ever::parse_document as html5ever_parse;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// Parse an HTML document into an arena DOM.
pub fn parse_document(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    let result = html5ever_parse(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    result.into_dom()
}

/// The `body` element of a parsed document.
pub fn body(dom: &ArenaDom) -> Option<ArenaNodeId> {
    dom.find_by_tag("body")
}

/// Trimmed text of a node, the way headings and labels are compared.
pub fn trimmed_text(dom: &ArenaDom, id: ArenaNodeId) -> String {
    dom.text(id).trim().to_string()
}
