//! Minimal HTML text helpers for rich-text notes.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::unwrap_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Remove every `<...>` tag, keeping the text between them.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Escape text for safe insertion into an HTML fragment.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode the named and numeric entities a content-editable surface emits.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match tail.find(';').filter(|&end| end <= 10) {
            Some(end) => {
                let entity = &tail[1..end];
                if let Some(decoded) = decode_entity(entity) {
                    out.push(decoded);
                } else {
                    out.push_str(&tail[..=end]);
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_keeps_text() {
        assert_eq!(
            strip_tags(r#"<div>換過<b>碳粉</b><img src="data:image/png;base64,AAA" /></div>"#),
            "換過碳粉"
        );
    }

    #[test]
    fn escape_then_decode() {
        let raw = r#"<a href="x">Tom & Jerry's</a>"#;
        assert_eq!(decode_entities(&escape(raw)), raw);
    }

    #[test]
    fn numeric_entities() {
        assert_eq!(decode_entities("&#26377;&#x5B57;"), "有字");
    }

    #[test]
    fn unknown_entity_kept() {
        assert_eq!(decode_entities("a &bogus; b & c"), "a &bogus; b & c");
    }
}
