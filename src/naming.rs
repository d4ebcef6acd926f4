//! Collision-free names for everything written to disk.
//!
//! Nothing is ever overwritten: an existing `name` is retried as `name_1`,
//! `name_2`, ... with the counter going in front of a file's extension.
//! The check and the create are not atomic, which is fine for a single
//! process writing sequentially.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::SiteConfig;

const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\0'];
const PLACEHOLDER_CAPTION: &str = "IMAGE";

fn suffixed(base: &Path, n: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!("_{}", n));
    PathBuf::from(name)
}

/// Creates `path`, or the first free `path_N`, and returns what was created.
pub fn unique_directory(path: &Path) -> io::Result<PathBuf> {
    let mut candidate = path.to_path_buf();
    let mut n = 1;
    while candidate.exists() {
        candidate = suffixed(path, n);
        n += 1;
    }

    fs::create_dir(&candidate)?;
    Ok(candidate)
}

/// Drops characters that can't appear in a file name.
pub fn sanitize(name: &str) -> String {
    name.chars().filter(|c| !ILLEGAL_CHARS.contains(c)).collect()
}

/// Sanitizes `proposed` and returns a path inside `dir` that does not exist yet.
pub fn unique_filename(dir: &Path, proposed: &str) -> PathBuf {
    let clean = sanitize(proposed);
    let (stem, ext) = split_extension(&clean);

    let mut candidate = dir.join(&clean);
    let mut n = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{}_{}{}", stem, n, ext));
        n += 1;
    }

    candidate
}

/// Splits off the extension of the last path segment, dot included.
/// Leading dots of the segment never start an extension.
pub fn split_extension(s: &str) -> (&str, &str) {
    let segment_start = s.rfind('/').map(|i| i + 1).unwrap_or(0);
    let segment = &s[segment_start..];

    match segment.rfind('.') {
        Some(dot) if segment[..dot].chars().any(|c| c != '.') => s.split_at(segment_start + dot),
        _ => (s, ""),
    }
}

/// Turns a photo locator from the album metadata into a fetchable URL.
pub fn photo_url(locator: &str, site: &SiteConfig) -> String {
    if let Some(rest) = locator.strip_prefix("file") {
        format!("{}{}", site.file_host, rest)
    } else if let Some(rest) = locator.strip_prefix("bb") {
        format!("{}{}", site.bb_host, rest)
    } else {
        locator.to_owned()
    }
}

fn embedded_extension() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.[a-zA-Z]{3,4}").unwrap())
}

/// `"<caption> (<date>)<ext>"`, e.g. `IMAGE (2011-05-01T00:00:00).jpg`.
pub fn photo_filename(caption: &str, date: &str, ext: &str) -> String {
    let caption = if caption.trim().is_empty() {
        PLACEHOLDER_CAPTION.to_owned()
    } else {
        embedded_extension().replace_all(caption, "").into_owned()
    };
    let (date, _) = split_extension(date);

    format!("{} ({}){}", caption, date, ext)
}
