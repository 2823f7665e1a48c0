//! Rich-text note value (`notes_ii`): a sanitized HTML fragment.
//!
//! The UI renders [`RichText::as_html`] into its editor and writes edits back
//! through [`RichText::from_html`]; paste handling is the pure
//! [`RichText::apply_paste`] transform.

use std::fmt;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::html;

#[allow(clippy::unwrap_used)]
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap());

/// An opening tag, quoted attribute values may contain `>`.
#[allow(clippy::unwrap_used)]
static OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[a-zA-Z][^\s/>]*(?:"[^"]*"|'[^']*'|[^'">])*>"#).unwrap()
});

/// Only applied inside a matched opening tag.
#[allow(clippy::unwrap_used)]
static HANDLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap()
});

#[allow(clippy::unwrap_used)]
static IMG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<img\b").unwrap());

/// One clipboard item offered to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteItem {
    Image { mime: String, bytes: Vec<u8> },
    Text(String),
    /// Anything else (files, rich HTML from other apps); ignored.
    Other { mime: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(String);

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take editor output, dropping `<script>`/`<style>` blocks and inline
    /// `on*=` handlers.
    pub fn from_html(html: &str) -> Self {
        let without_blocks = SCRIPT_RE.replace_all(html, "");
        let cleaned = OPEN_TAG_RE.replace_all(&without_blocks, |caps: &regex::Captures<'_>| {
            HANDLER_RE.replace_all(&caps[0], "").into_owned()
        });
        Self(cleaned.into_owned())
    }

    pub fn as_html(&self) -> &str {
        &self.0
    }

    pub fn into_html(self) -> String {
        self.0
    }

    /// Append plain text, escaped; line breaks become `<br>`.
    pub fn append_text(&mut self, text: &str) {
        let escaped = html::escape(text);
        self.0.push_str(&escaped.replace("\r\n", "\n").replace('\n', "<br>"));
    }

    /// Embed an image inline as a base64 data URL.
    pub fn append_image(&mut self, mime: &str, bytes: &[u8]) {
        let data = STANDARD.encode(bytes);
        self.0.push_str(&format!(
            "<img src=\"data:{};base64,{data}\" style=\"max-width: 100%; height: auto;\" />",
            html::escape(mime)
        ));
    }

    /// Apply one pasted item. Returns whether the content changed.
    pub fn apply_paste(&mut self, item: &PasteItem) -> bool {
        match item {
            PasteItem::Image { mime, bytes } if mime.starts_with("image/") => {
                self.append_image(mime, bytes);
                true
            }
            PasteItem::Text(text) if !text.is_empty() => {
                self.append_text(text);
                true
            }
            _ => false,
        }
    }

    /// Visible text: tags stripped, entities decoded.
    pub fn plain_text(&self) -> String {
        html::decode_entities(&html::strip_tags(&self.0))
    }

    /// No visible text and no embedded image.
    pub fn is_empty(&self) -> bool {
        self.plain_text().trim().is_empty() && !IMG_RE.is_match(&self.0)
    }

    /// `None` when empty, for writing back into a draft.
    pub fn into_field(self) -> Option<String> {
        if self.is_empty() { None } else { Some(self.0) }
    }
}

impl From<Option<&String>> for RichText {
    fn from(value: Option<&String>) -> Self {
        value.map_or_else(Self::new, |html| Self::from_html(html))
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
