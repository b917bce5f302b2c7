//! Tree rewrites applied to each section before rendering.
//!
//! - Segment: split sibling nodes at headings
//! - Normalize: emphasis to inline styles, drop generated attributes
//! - Buttons: bracketed paragraphs to call-to-action blocks
//! - Recolor: text and link colors for dark backgrounds

pub mod buttons;
pub mod normalize;
pub mod recolor;
pub mod segment;

pub use buttons::format_buttons;
pub use normalize::normalize;
pub use recolor::recolor;
pub use segment::{Section, TopSections, group_by_heading};
