//! Pull the JSON object out of a model response.
//!
//! Providers are told to answer with JSON only, but often wrap it in prose or
//! code fences. The scan below finds the first `{` whose braces balance,
//! ignoring braces inside string literals.

use crate::error::Failure;

/// Return the first balanced `{ ... }` span in `raw`, unparsed.
pub fn extract_json_object(raw: &str) -> Result<&str, Failure> {
    let text = raw.trim();
    let bytes = text.as_bytes();

    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = balanced_end(bytes, start) {
            return Ok(&text[start..=end]);
        }
        search_from = start + 1;
    }

    Err(Failure::NoJsonObject)
}

/// Index of the `}` closing the object opened at `start`.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}
