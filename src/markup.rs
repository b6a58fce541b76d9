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

//! HTML serialization of rendered messages.
//!
//! Every interpolated value is escaped except text paragraphs, which are
//! trusted markup from the store.

use crate::content::RenderedContent;
use crate::view::{MessageChrome, RenderedMessage};
use std::fmt::Write as _;

pub const AVATAR_SIZE: u32 = 36;

/// Escape text for element content and double-quoted attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn message_to_html(msg: &RenderedMessage) -> String {
    let mut out = String::new();
    let (class, inner) = match &msg.chrome {
        MessageChrome::Simple => (
            "message-simple",
            format!(r#"<div class="container">{}</div>"#, content_to_html(&msg.content)),
        ),
        MessageChrome::Full { avatar, username, timestamp } => (
            "message",
            format!(
                concat!(
                    r#"<img class="avatar" src="{avatar}" width="{size}" height="{size}">"#,
                    r#"<div class="content"><div><span>{username}</span>"#,
                    r#"<span class="time">{timestamp}</span></div><div>{content}</div></div>"#,
                ),
                avatar = html_escape(avatar),
                size = AVATAR_SIZE,
                username = html_escape(username),
                timestamp = html_escape(timestamp),
                content = content_to_html(&msg.content),
            ),
        ),
    };
    let _ = write!(
        out,
        r#"<div class="{class}" data-id="{id}" data-status="{status}">"#,
        id = html_escape(msg.id.as_str()),
        status = msg.status.as_str(),
    );
    if msg.busy {
        out.push_str(r#"<div class="spin spinning" aria-busy="true"><span class="spinner"></span>"#);
    } else {
        out.push_str(r#"<div class="spin">"#);
    }
    out.push_str(&inner);
    out.push_str("</div></div>");
    out
}

pub fn content_to_html(content: &RenderedContent) -> String {
    match content {
        RenderedContent::Text { paragraphs } => {
            paragraphs.iter().fold(String::new(), |mut out, p| {
                let _ = write!(out, "<p>{p}</p>");
                out
            })
        }
        RenderedContent::Link { href } => {
            let href = html_escape(href);
            format!(r#"<a href="{href}" rel="noopener noreferrer" target="_blank">{href}</a>"#)
        }
        RenderedContent::Code { language, source } => {
            let class = match language {
                Some(lang) => format!("code {}", html_escape(lang)),
                None => "code".to_owned(),
            };
            format!(r#"<pre class="{class}"><code>{}</code></pre>"#, html_escape(source))
        }
        RenderedContent::Image { src, .. } => format!(r#"<img src="{}">"#, html_escape(src)),
        RenderedContent::File { name, size, download_url } => format!(
            concat!(
                r#"<div class="file"><span class="icon icon-file"></span>"#,
                r#"<div><p>{name}</p><p>{size}</p></div>"#,
                r#"<a href="{url}" download><span class="icon icon-download"></span></a></div>"#,
            ),
            name = html_escape(name),
            size = html_escape(size),
            url = html_escape(download_url),
        ),
        RenderedContent::Unknown => {
            format!("<span>{}</span>", crate::content::UNKNOWN_MESSAGE_TEXT)
        }
    }
}
