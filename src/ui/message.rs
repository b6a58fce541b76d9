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

use crate::content::{RenderedContent, UNKNOWN_MESSAGE_TEXT};
use crate::message::MessageStatus;
use crate::ui::theme;
use crate::view::{MessageChrome, RenderedMessage};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

/// Inner rows of a loaded image preview.
pub const IMAGE_ROWS: usize = 4;

const INDENT: &str = "  ";

/// Load state of an image message as seen by the terminal surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    Loading,
    Loaded,
    Failed,
}

/// Render a single chat message into `out`, followed by a blank separator.
pub fn render_message(
    msg: &RenderedMessage,
    image: ImageState,
    spinner_frame: usize,
    out: &mut Vec<Line<'static>>,
) {
    match &msg.chrome {
        MessageChrome::Full { username, timestamp, .. } => {
            let mut spans = vec![
                Span::styled(
                    username.clone(),
                    Style::default()
                        .fg(theme::username_color(username))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {timestamp}"), Style::default().fg(theme::TIMESTAMP)),
            ];
            if let Some(status) = status_span(msg, spinner_frame) {
                spans.push(Span::raw("  "));
                spans.push(status);
            }
            out.push(Line::from(spans));
            render_content(&msg.content, image, out);
        }
        MessageChrome::Simple => {
            render_content(&msg.content, image, out);
            if let Some(status) = status_span(msg, spinner_frame) {
                out.push(Line::from(vec![Span::raw(INDENT), status]));
            }
        }
    }

    out.push(Line::default());
}

fn status_span(msg: &RenderedMessage, spinner_frame: usize) -> Option<Span<'static>> {
    if msg.busy {
        let ch = theme::SPINNER_FRAMES[spinner_frame % theme::SPINNER_FRAMES.len()];
        return Some(Span::styled(
            format!("{ch} sending\u{2026}"),
            Style::default().fg(theme::STATUS_SENDING),
        ));
    }
    match msg.status {
        MessageStatus::Failed => Some(Span::styled(
            format!("{} failed to send", theme::ICON_FAILED),
            Style::default().fg(theme::STATUS_FAILED).add_modifier(Modifier::BOLD),
        )),
        MessageStatus::Sending | MessageStatus::Sent => None,
    }
}

fn render_content(content: &RenderedContent, image: ImageState, out: &mut Vec<Line<'static>>) {
    match content {
        RenderedContent::Text { paragraphs } => {
            for p in paragraphs {
                out.push(Line::from(format!("{INDENT}{}", strip_tags(p))));
            }
        }
        RenderedContent::Link { href } => {
            out.push(Line::from(vec![
                Span::raw(INDENT),
                Span::styled(
                    href.clone(),
                    Style::default().fg(theme::LINK).add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }
        RenderedContent::Code { language, source } => {
            if let Some(lang) = language {
                out.push(Line::from(Span::styled(
                    format!("{INDENT}{lang}"),
                    Style::default().fg(theme::DIM).add_modifier(Modifier::ITALIC),
                )));
            }
            for line in source.split('\n') {
                out.push(Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled(format!(" {line} "), Style::default().bg(theme::CODE_BG)),
                ]));
            }
        }
        RenderedContent::Image { src, original_src } => {
            render_image(src, src != original_src || image == ImageState::Failed, image, out);
        }
        RenderedContent::File { name, size, download_url } => {
            out.push(Line::from(vec![
                Span::raw(INDENT),
                Span::styled(format!("{} ", theme::ICON_FILE), Style::default().fg(theme::DIM)),
                Span::styled(
                    name.clone(),
                    Style::default().fg(theme::FILE_NAME).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {size}"), Style::default().fg(theme::DIM)),
            ]));
            out.push(Line::from(vec![
                Span::raw(INDENT),
                Span::styled(format!("{} ", theme::ICON_DOWNLOAD), Style::default().fg(theme::LINK)),
                Span::styled(
                    download_url.clone(),
                    Style::default().fg(theme::LINK).add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }
        RenderedContent::Unknown => {
            out.push(Line::from(Span::styled(
                format!("{INDENT}{UNKNOWN_MESSAGE_TEXT}"),
                Style::default().fg(theme::DIM).add_modifier(Modifier::ITALIC),
            )));
        }
    }
}

fn render_image(src: &str, failed: bool, image: ImageState, out: &mut Vec<Line<'static>>) {
    let frame = Style::default().fg(theme::IMAGE_FRAME);
    if failed {
        // Same footprint as a loading image so the swap does not shift layout.
        out.push(Line::from(Span::styled(
            format!("{INDENT}{} image not found", theme::ICON_FAILED),
            Style::default().fg(theme::STATUS_FAILED),
        )));
        return;
    }
    match image {
        ImageState::Loading | ImageState::Failed => {
            out.push(Line::from(Span::styled(
                format!("{INDENT}{} loading {src}", theme::ICON_SENDING),
                Style::default().fg(theme::DIM),
            )));
        }
        ImageState::Loaded => {
            out.push(Line::from(Span::styled(
                format!("{INDENT}\u{250C} {} {src}", theme::ICON_IMAGE),
                frame,
            )));
            for _ in 0..IMAGE_ROWS {
                out.push(Line::from(Span::styled(format!("{INDENT}\u{2502}"), frame)));
            }
            out.push(Line::from(Span::styled(format!("{INDENT}\u{2514}\u{2500}"), frame)));
        }
    }
}

/// Drop markup tags and decode the handful of entities a terminal can show.
pub fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Wrapped height of `lines` at `width` columns.
pub fn measure(lines: &[Line<'static>], width: u16) -> usize {
    if width == 0 {
        return lines.len();
    }
    Paragraph::new(lines.to_vec()).wrap(Wrap { trim: false }).line_count(width)
}
