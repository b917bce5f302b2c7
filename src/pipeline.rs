//! One end-to-end conversion run.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::css::CssRuleMap;
use crate::dom::{body, parse_document};
use crate::error::{Error, Result};
use crate::images::{
    AssetHost, ImageManifest, RunPlan, classify_runs, extract_images, publish, rewrite_image_sources,
};
use crate::render::{Renderer, TocEntry};
use crate::transform::TopSections;
use crate::util::{decode_text, extract_meta_charset};

/// Output of a run.
#[derive(Debug, Clone)]
pub struct Newsletter {
    /// The assembled email body.
    pub html: String,
    /// Extracted images per story.
    pub images: ImageManifest,
    /// Planned main/extra images per heading key.
    pub plan: RunPlan,
    pub toc: Vec<TocEntry>,
}

/// Convert an exported document on disk.
///
/// Relative image paths resolve against the document's directory.
pub fn convert_file(path: &Path, config: &Config, host: Option<&mut dyn AssetHost>) -> Result<Newsletter> {
    let bytes = fs::read(path)?;
    let html = decode_text(&bytes, extract_meta_charset(&bytes));
    let source_dir = path.parent().unwrap_or(Path::new("."));
    info!(input = %path.display(), date = %config.run_date, "converting newsletter");
    convert(&html, source_dir, config, host)
}

/// Convert exported markup whose local images live under `source_dir`.
pub fn convert(
    html: &str,
    source_dir: &Path,
    config: &Config,
    host: Option<&mut dyn AssetHost>,
) -> Result<Newsletter> {
    let mut dom = parse_document(html);
    let rules = CssRuleMap::from_document(&dom);

    let plan = classify_runs(&dom, source_dir, &config.local_prefix, &config.run_date);
    let mut images = extract_images(&mut dom, source_dir, config)?;
    if let Some(host) = host {
        publish(host, &mut images)?;
    }
    rewrite_image_sources(&mut dom, &images);

    let body = body(&dom).ok_or_else(|| Error::MissingElement("body".to_string()))?;
    let top = TopSections::from_body(&dom, body);
    let rendered = Renderer::new(&images, &rules, config).assemble(&mut dom, &top);

    Ok(Newsletter {
        html: rendered.html,
        images,
        plan,
        toc: rendered.toc,
    })
}

/// Plan image runs without writing anything.
pub fn plan_file(path: &Path, config: &Config) -> Result<RunPlan> {
    let bytes = fs::read(path)?;
    let html = decode_text(&bytes, extract_meta_charset(&bytes));
    let dom = parse_document(&html);
    let source_dir = path.parent().unwrap_or(Path::new("."));
    Ok(classify_runs(&dom, source_dir, &config.local_prefix, &config.run_date))
}
