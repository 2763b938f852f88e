//! Content normalization and fingerprinting.

use sha2::{Digest, Sha256};

/// Separates content from URL inside the hash input.
const HASH_SEPARATOR: u8 = 0x1F;

/// Canonical form of user text.
///
/// Each line has its whitespace runs collapsed to one space and is trimmed;
/// runs of blank lines collapse to a single blank line; the whole text is
/// trimmed. Applying it twice gives the same result as applying it once.
pub fn normalize_content(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut pending_blank = false;

    for line in content.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        pending_blank = false;
        out.push_str(&line);
    }

    out
}

/// Hex SHA-256 of normalized content and URL (empty when absent).
pub fn content_hash(normalized: &str, url: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hasher.update([HASH_SEPARATOR]);
    hasher.update(url.unwrap_or("").trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Length in characters, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
