//! Small helpers shared by the passes.

use std::borrow::Cow;
use std::path::Path;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from a `<meta charset>`)
/// 3. Falls back to Windows-1252
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the charset from a `<meta charset=...>` or `content="...; charset=..."`
/// declaration in the first kilobyte of an HTML document.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(1024);
    let header = std::str::from_utf8(&bytes[..check_len]).ok()?;
    let lower = header.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let rest = &header[start..];
    let rest = rest.trim_start_matches(['"', '\'']);
    let end = rest
        .find(|c: char| c == '"' || c == '\'' || c == ';' || c == '>' || c.is_whitespace())
        .unwrap_or(rest.len());
    let charset = &rest[..end];
    (!charset.is_empty()).then_some(charset)
}

/// File extension including the leading dot, or an empty string.
pub fn dotted_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// File name without directory and extension.
pub fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("héllo".as_bytes(), None), "héllo");
    }

    #[test]
    fn test_decode_falls_back_to_cp1252() {
        // 0xE9 is 'é' in Windows-1252 and invalid as a lone UTF-8 byte
        assert_eq!(decode_text(&[0x63, 0x61, 0x66, 0xE9], None), "café");
    }

    #[test]
    fn test_extract_meta_charset() {
        let html = br#"<html><head><meta content="text/html; charset=utf-8" http-equiv="Content-Type">"#;
        assert_eq!(extract_meta_charset(html), Some("utf-8"));
        assert_eq!(extract_meta_charset(b"<meta charset=\"latin1\">"), Some("latin1"));
        assert_eq!(extract_meta_charset(b"<p>none</p>"), None);
    }

    #[test]
    fn test_path_helpers() {
        assert_eq!(dotted_extension("images/image1.png"), ".png");
        assert_eq!(dotted_extension("noext"), "");
        assert_eq!(file_stem("/tmp/2024-12-01-news-ride.jpg"), "2024-12-01-news-ride");
    }
}
