//! Publishing extracted images to an asset host.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use super::ImageManifest;
use crate::dom::{ArenaDom, NodeKind};
use crate::error::{Error, Result};
use crate::util::file_stem;

static RUN_PREFIX_OR_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+?-news-|\.(jpg|png)$").unwrap());

/// A place that serves images by URL.
pub trait AssetHost {
    /// Previously hosted assets as `(file name, url)` pairs, newest first.
    fn existing(&mut self) -> Result<Vec<(String, String)>>;

    /// Upload a local file and return its public URL.
    fn upload(&mut self, path: &Path) -> Result<String>;
}

/// Cache key for an asset: the file name without the run prefix and a
/// trailing `.jpg`/`.png`.
///
/// Weekly files for the same slug share a key, so a re-run reuses an
/// already hosted image instead of uploading it again.
pub fn normalized_basename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    RUN_PREFIX_OR_EXTENSION.replace_all(&base, "").into_owned()
}

/// Counts from one [`publish`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishStats {
    pub uploaded: usize,
    pub reused: usize,
    pub inline: usize,
}

/// Attach a URL to every record, uploading what the host does not have yet.
///
/// Records are visited in section order and uploaded one at a time, so a
/// later record with the same normalized name reuses an earlier upload.
pub fn publish<H: AssetHost + ?Sized>(host: &mut H, manifest: &mut ImageManifest) -> Result<PublishStats> {
    let mut cache: HashMap<String, String> = HashMap::new();
    for (name, url) in host.existing()? {
        cache.entry(normalized_basename(&name)).or_insert(url);
    }

    let mut stats = PublishStats::default();
    for record in manifest.records_mut() {
        if record.is_inline() {
            record.url = Some(record.filename.clone());
            stats.inline += 1;
            continue;
        }

        let key = normalized_basename(&record.filename);
        if let Some(url) = cache.get(&key) {
            debug!(file = %record.filename, url = %url, "reusing hosted asset");
            record.url = Some(url.clone());
            stats.reused += 1;
            continue;
        }

        let url = host.upload(Path::new(&record.filename))?;
        debug!(file = %record.filename, url = %url, "uploaded asset");
        cache.insert(key, url.clone());
        record.url = Some(url);
        stats.uploaded += 1;
    }

    info!(
        uploaded = stats.uploaded,
        reused = stats.reused,
        inline = stats.inline,
        "published images"
    );
    Ok(stats)
}

/// Point remaining `img` elements at published URLs.
///
/// An image matches a record when their file stems agree.
pub fn rewrite_image_sources(dom: &mut ArenaDom, manifest: &ImageManifest) -> usize {
    let published: Vec<(String, &str)> = manifest
        .records()
        .filter(|r| !r.is_inline())
        .filter_map(|r| r.url.as_deref().map(|url| (file_stem(&r.filename), url)))
        .collect();

    let mut rewritten = 0;
    for id in dom.descendants(dom.document()) {
        if NodeKind::of(dom, id) != NodeKind::Image {
            continue;
        }
        let Some(src) = dom.get_attr(id, "src") else {
            continue;
        };
        if src.starts_with("data:") {
            continue;
        }
        let stem = file_stem(src);
        if let Some((_, url)) = published.iter().find(|(s, _)| *s == stem) {
            dom.set_attr(id, "src", *url);
            rewritten += 1;
        }
    }
    rewritten
}

/// Hosts assets by copying them into a directory served under `base_url`.
#[derive(Debug, Clone)]
pub struct DirectoryAssetHost {
    dir: PathBuf,
    base_url: String,
}

impl DirectoryAssetHost {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url.trim_end_matches('/'))
    }

    fn host_error(path: &Path, err: impl std::fmt::Display) -> Error {
        Error::AssetHost {
            path: path.to_path_buf(),
            detail: err.to_string(),
        }
    }
}

impl AssetHost for DirectoryAssetHost {
    fn existing(&mut self) -> Result<Vec<(String, String)>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            files.push((modified, entry.file_name().to_string_lossy().into_owned()));
        }
        files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        Ok(files
            .into_iter()
            .map(|(_, name)| {
                let url = self.url_for(&name);
                (name, url)
            })
            .collect())
    }

    fn upload(&mut self, path: &Path) -> Result<String> {
        let name = path
            .file_name()
            .ok_or_else(|| Self::host_error(path, "not a file"))?
            .to_string_lossy()
            .into_owned();

        fs::create_dir_all(&self.dir).map_err(|e| Self::host_error(path, e))?;
        let target = self.dir.join(&name);
        fs::copy(path, &target).map_err(|e| Self::host_error(path, e))?;

        Ok(self.url_for(&name))
    }
}
