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

pub mod app;
pub mod content;
pub mod error;
pub mod markup;
pub mod message;
pub mod scroll;
pub mod ui;
pub mod view;
pub mod viewport;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chatview", about = "Terminal chat viewer with coordinated scrolling")]
pub struct Cli {
    /// Conversation transcript (JSON message array)
    #[arg(long, short)]
    pub transcript: std::path::PathBuf,

    /// Name of the current user; their messages always scroll into view
    #[arg(long, short, default_value = "me")]
    pub user: String,

    /// Messages shown initially and loaded per history page
    #[arg(long, default_value_t = app::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Debounce window for scroll requests, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub scroll_delay_ms: u64,

    /// Offset for displayed timestamps, in minutes east of UTC
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub utc_offset_minutes: i32,

    /// Only scroll for messages the current user sends
    #[arg(long)]
    pub no_auto_scroll: bool,

    /// Asset path shown in place of images that fail to load
    #[arg(long)]
    pub image_placeholder: Option<String>,

    /// Write tracing diagnostics to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<std::path::PathBuf>,

    /// Tracing filter directives (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Append to the log file instead of truncating it
    #[arg(long)]
    pub log_append: bool,
}
