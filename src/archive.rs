//! Exported document archives.
//!
//! A document export is a zip holding the HTML file and an `images/`
//! directory. The newest archive in a downloads directory is unpacked into a
//! working directory, and the newest HTML file there is the run's input.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Unpack `archive` into `dest`, returning the written files.
///
/// Entries whose path would land outside `dest` abort the extraction.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file)?;
    fs::create_dir_all(dest)?;

    let mut written = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(Error::UnsafeArchiveEntry(entry.name().to_string()));
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        debug!(entry = %target.display(), "extracted");
        written.push(target);
    }

    info!(archive = %archive.display(), files = written.len(), "unpacked archive");
    Ok(written)
}

/// The most recently modified file in `dir` with the given extension.
///
/// `extension` is compared case-insensitively and without the dot.
pub fn latest_file(dir: &Path, extension: &str) -> Result<PathBuf> {
    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let matches = path
            .extension()
            .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(extension));
        if !matches || !entry.file_type()?.is_file() {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        if newest.as_ref().is_none_or(|(time, _)| modified > *time) {
            newest = Some((modified, path));
        }
    }

    newest.map(|(_, path)| path).ok_or_else(|| Error::NoSourceFile {
        dir: dir.to_path_buf(),
        extension: extension.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::{Duration, SystemTime};

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extracts_document_and_images() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("Newsletter.zip");
        write_zip(
            &archive,
            &[("Newsletter.html", b"<h1>Hi</h1>"), ("images/image1.png", b"png")],
        );
        let dest = dir.path().join("out");

        let written = extract_archive(&archive, &dest).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(fs::read(dest.join("images/image1.png")).unwrap(), b"png");
        assert_eq!(latest_file(&dest, "html").unwrap(), dest.join("Newsletter.html"));
    }

    #[test]
    fn test_rejects_escaping_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.zip");
        write_zip(&archive, &[("../evil.txt", b"x")]);

        let err = extract_archive(&archive, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::UnsafeArchiveEntry(_)));
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[test]
    fn test_latest_file_picks_newest() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.zip");
        let new = dir.path().join("new.ZIP");
        fs::write(&old, b"").unwrap();
        fs::write(&new, b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600);
        File::options().write(true).open(&old).unwrap().set_modified(past).unwrap();

        assert_eq!(latest_file(dir.path(), "zip").unwrap(), new);
    }

    #[test]
    fn test_latest_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            latest_file(dir.path(), "html"),
            Err(Error::NoSourceFile { .. })
        ));
    }
}
