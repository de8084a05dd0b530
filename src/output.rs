//! Writing converted documents to disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Name used when nothing usable is left after sanitizing.
pub const FALLBACK_FILE_NAME: &str = "document";

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '/', '\\'];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const MAX_NAME_LEN: usize = 200;

/// Turn an arbitrary name into a safe file stem.
///
/// Path separators, characters reserved on common file systems and control
/// characters become `_`. A trailing `.pdf` or `.md` extension is removed,
/// leading and trailing dots and spaces are stripped so the result can never
/// be `.` or `..`, and device names such as `CON` are prefixed.
pub fn sanitize_file_name(name: &str) -> String {
    let name = name.trim();
    let stem = strip_extension(name, ".pdf");
    let stem = strip_extension(stem, ".md");

    let replaced: String = stem
        .chars()
        .map(|c| {
            if c.is_control() || RESERVED_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let mut cleaned = replaced
        .trim_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string();

    if cleaned.chars().all(|c| c == '_') {
        return FALLBACK_FILE_NAME.to_string();
    }

    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(&cleaned))
    {
        cleaned.insert(0, '_');
    }

    if cleaned.chars().count() > MAX_NAME_LEN {
        cleaned = cleaned.chars().take(MAX_NAME_LEN).collect();
    }

    cleaned
}

fn strip_extension<'a>(name: &'a str, ext: &str) -> &'a str {
    let split = name.len().saturating_sub(ext.len());
    match name.get(split..) {
        Some(tail) if split > 0 && tail.eq_ignore_ascii_case(ext) => &name[..split],
        _ => name,
    }
}

/// Write `markdown` to `<dir>/<sanitized name>.md`, creating `dir` if needed.
///
/// Returns the path that was written.
pub fn write_markdown<P: AsRef<Path>>(markdown: &str, dir: P, name: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("{}.md", sanitize_file_name(name)));
    fs::write(&path, markdown)?;
    log::debug!("Wrote {} bytes to {}", markdown.len(), path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_file_name("report"), "report");
        assert_eq!(sanitize_file_name("Annual Report 2024.pdf"), "Annual Report 2024");
        assert_eq!(sanitize_file_name("notes.MD"), "notes");
    }

    #[test]
    fn test_sanitize_traversal() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name(".."), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name("a\\b"), "a_b");
    }

    #[test]
    fn test_sanitize_reserved_characters() {
        assert_eq!(sanitize_file_name("what?<now>:*"), "what__now___");
        assert_eq!(sanitize_file_name("tab\there"), "tab_here");
    }

    #[test]
    fn test_sanitize_empty_and_device_names() {
        assert_eq!(sanitize_file_name(""), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name("   "), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name("///"), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name("con"), "_con");
        assert_eq!(sanitize_file_name(".pdf"), "pdf");
    }

    #[test]
    fn test_sanitize_long_name() {
        let long = "x".repeat(500);
        assert_eq!(sanitize_file_name(&long).len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_write_markdown() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested");

        let path = write_markdown("# Title\n", &out, "my/doc.pdf").unwrap();

        assert_eq!(path, out.join("my_doc.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Title\n");
    }
}
