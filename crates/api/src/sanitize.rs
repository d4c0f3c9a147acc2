//! Free-text and URL clean-up applied at the boundary.

/// Entities this module emits. An `&` that already starts one of these is
/// left alone, which keeps [`sanitize_text`] idempotent.
const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&#39;", "&#34;"];

/// Trim surrounding whitespace and HTML-escape `<`, `>`, `&`, `'` and `"`.
pub fn sanitize_text(input: &str) -> String {
    let trimmed = input.trim();
    let mut out = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.char_indices() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            '&' if ENTITIES.iter().any(|e| trimmed[i..].starts_with(e)) => out.push('&'),
            '&' => out.push_str("&amp;"),
            other => out.push(other),
        }
    }
    out
}

/// The trimmed input if it is an `http://` or `https://` URL, else `""`.
///
/// An empty result means "rejected"; callers tell it apart from "not given"
/// by checking the raw input first.
pub fn sanitize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        String::new()
    }
}
