//! # docmail
//!
//! Turns an exported newsletter document into a single email-safe HTML
//! string: nested tables, inline styles, hosted images.
//!
//! ## Pipeline
//!
//! - Parse the export into an arena DOM and read its stylesheet
//! - Extract section images to run-dated files and publish them
//! - Normalize styles, turn `[ Label ]` paragraphs into buttons
//! - Render stories into the email layout and assemble the newsletter
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use docmail::{Config, DirectoryAssetHost, RunDate};
//!
//! let config = Config::new(RunDate::upcoming()).with_images_dir("images-out");
//! let mut host = DirectoryAssetHost::new("public/news", "https://example.org/news");
//! let newsletter = docmail::convert_file(Path::new("export/Newsletter.html"), &config, Some(&mut host)).unwrap();
//! std::fs::write("newsletter.html", newsletter.html).unwrap();
//! ```

pub mod archive;
pub mod config;
pub mod css;
pub mod date;
pub mod dom;
pub mod error;
pub mod images;
pub mod pipeline;
pub mod render;
pub mod slug;
pub mod transform;
pub mod util;

pub use config::{Config, Theme};
pub use date::RunDate;
pub use error::{Error, Result};
pub use images::{AssetHost, DirectoryAssetHost, ImageManifest, ImageRecord, ImageRole, RunPlan};
pub use pipeline::{Newsletter, convert, convert_file, plan_file};
