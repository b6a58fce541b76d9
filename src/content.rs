// chat-scroll-view — Chat message rendering with coordinated scrolling
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Content-type dispatch: typed message payload in, renderable description out.
//!
//! Rendering is pure and total. Unknown tags, malformed payloads and missing
//! language markers all degrade to a displayable form instead of an error.

use crate::message::{FileAttachment, MessageContent};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Placeholder text for content the renderer does not recognize.
pub const UNKNOWN_MESSAGE_TEXT: &str = "Unknown message";

/// Asset shown in place of an image that failed to load.
pub const IMAGE_NOT_FOUND_SRC: &str = "assets/images/image_not_found.png";

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

static CODE_LANG_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^!!!lang=(.+)!!!").ok());

/// Renderable form of a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedContent {
    /// One entry per input line. Entries are trusted markup and are emitted
    /// without escaping; sanitization happens upstream.
    Text { paragraphs: Vec<String> },
    /// External link, opened in a new context without referrer or opener.
    Link { href: String },
    /// Code for the external highlighter. `language` is the class hint.
    Code { language: Option<String>, source: String },
    /// Image reference. `src` switches to the placeholder after a load error.
    Image { src: String, original_src: String },
    File { name: String, size: String, download_url: String },
    Unknown,
}

impl RenderedContent {
    /// Swap a failed image for the placeholder asset. Returns `false` for
    /// non-image content or when the placeholder is already in place.
    pub fn substitute_missing_image(&mut self, placeholder: &str) -> bool {
        match self {
            Self::Image { src, .. } if src != placeholder => {
                placeholder.clone_into(src);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// Render a typed payload.
pub fn render(content: &MessageContent) -> RenderedContent {
    match content {
        MessageContent::Text(text) => render_text(text),
        MessageContent::Url(url) => RenderedContent::Link { href: url.clone() },
        MessageContent::Code(code) => render_code(code),
        MessageContent::Image(src) => {
            RenderedContent::Image { src: src.clone(), original_src: src.clone() }
        }
        MessageContent::File(file) => render_file(file),
        MessageContent::Unknown { tag } => {
            tracing::debug!(tag = %tag, "rendering unknown message placeholder");
            RenderedContent::Unknown
        }
    }
}

/// Render straight from a wire `(type, content)` pair.
pub fn render_tagged(tag: &str, content: &Value) -> RenderedContent {
    render(&MessageContent::from_tagged(tag, content.clone()))
}

fn render_text(text: &str) -> RenderedContent {
    RenderedContent::Text { paragraphs: text.split('\n').map(str::to_owned).collect() }
}

fn render_code(code: &str) -> RenderedContent {
    let (language, source) = parse_code_language(code);
    RenderedContent::Code { language: language.map(str::to_owned), source: source.to_owned() }
}

fn render_file(file: &FileAttachment) -> RenderedContent {
    RenderedContent::File {
        name: file.name.clone(),
        size: format_file_size(file.size),
        download_url: file.url.clone(),
    }
}

/// Split a leading `!!!lang=<id>!!!` marker off code content.
///
/// The marker match is greedy up to the last `!!!` on the first line. With
/// no marker the content is returned unchanged and no language.
pub fn parse_code_language(code: &str) -> (Option<&str>, &str) {
    let Some(re) = CODE_LANG_MARKER.as_ref() else {
        return (None, code);
    };
    match re.captures(code) {
        Some(caps) => match (caps.get(0), caps.get(1)) {
            (Some(marker), Some(lang)) => (Some(lang.as_str()), &code[marker.end()..]),
            _ => (None, code),
        },
        None => (None, code),
    }
}

/// Human-readable byte size in binary steps, two decimals, capped at MB.
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{:.2}B", bytes as f64)
    } else if bytes < MIB {
        format!("{:.2}KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.2}MB", bytes as f64 / MIB as f64)
    }
}
