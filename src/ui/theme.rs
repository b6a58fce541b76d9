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

use ratatui::style::Color;

// Accent
pub const RUST_ORANGE: Color = Color::Rgb(244, 118, 0);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const PROMPT_CHAR: &str = "❯";
pub const SEPARATOR_CHAR: &str = "─";

// Header identity
pub const USERNAME: Color = RUST_ORANGE;
pub const TIMESTAMP: Color = DIM;

// Content
pub const LINK: Color = Color::Cyan;
pub const CODE_BG: Color = Color::Rgb(40, 44, 52);
pub const FILE_NAME: Color = Color::White;
pub const IMAGE_FRAME: Color = Color::Gray;

// Delivery status
pub const STATUS_SENDING: Color = Color::Cyan;
pub const STATUS_FAILED: Color = Color::Red;

pub const ICON_SENDING: &str = "◌";
pub const ICON_FAILED: &str = "✗";
pub const ICON_FILE: &str = "▤";
pub const ICON_DOWNLOAD: &str = "⇩";
pub const ICON_IMAGE: &str = "▣";

pub const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Stable per-user color so consecutive speakers are easy to tell apart.
pub fn username_color(name: &str) -> Color {
    const PALETTE: &[Color] = &[USERNAME, Color::Magenta, Color::Green, Color::Yellow, Color::Blue];
    let hash = name.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)));
    PALETTE[hash % PALETTE.len()]
}
