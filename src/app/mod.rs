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

mod conversation;
mod events;
mod state;
mod store;

pub use conversation::{DELIVERY_DELAY, IMAGE_LOAD_DELAY};
pub use events::{handle_key, handle_terminal_event};
pub use state::{App, AppEvent};
pub use store::{ConversationStore, DEFAULT_PAGE_SIZE, load_transcript, parse_transcript};

use crate::Cli;
use crate::view::ViewConfig;
use chrono::FixedOffset;
use crossterm::event::EventStream;
use futures::StreamExt;
use std::time::Duration;

/// Chat width assumed until the first frame reports the real one.
const INITIAL_CHAT_WIDTH: u16 = 80;
const INITIAL_CHAT_HEIGHT: usize = 24;

/// Build the app from CLI options and mount the newest page of messages.
/// Must run inside a `LocalSet`: mounting schedules scroll timers.
pub fn create_app(cli: &Cli) -> anyhow::Result<App> {
    let messages = load_transcript(&cli.transcript)?;
    let config = view_config(cli)?;
    let auto_scroll = !cli.no_auto_scroll;
    let (store, live) = ConversationStore::open(messages, cli.page_size, &cli.user, auto_scroll);

    let (width, height) = crossterm::terminal::size()
        .map_or((INITIAL_CHAT_WIDTH, INITIAL_CHAT_HEIGHT), |(w, h)| (w, usize::from(h)));
    let mut app = App::new(config, store, cli.user.clone(), auto_scroll, width, height);
    for message in live {
        app.push_live(message);
    }
    tracing::info!(
        live = app.views.len(),
        backlog = app.store.remaining(),
        auto_scroll,
        "conversation opened"
    );
    Ok(app)
}

fn view_config(cli: &Cli) -> anyhow::Result<ViewConfig> {
    let utc_offset = FixedOffset::east_opt(cli.utc_offset_minutes * 60).ok_or_else(|| {
        anyhow::anyhow!("--utc-offset-minutes {} is out of range", cli.utc_offset_minutes)
    })?;
    let mut config = ViewConfig {
        scroll_delay: Duration::from_millis(cli.scroll_delay_ms),
        utc_offset,
        ..ViewConfig::default()
    };
    if let Some(placeholder) = &cli.image_placeholder {
        config.image_placeholder.clone_from(placeholder);
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// TUI event loop
// ---------------------------------------------------------------------------

pub async fn run_tui(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Enable bracketed paste (ignore error on unsupported terminals)
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::EnableBracketedPaste);

    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(16));

    loop {
        tokio::select! {
            Some(Ok(event)) = events.next() => {
                handle_terminal_event(app, event);
            }
            Some(event) = app.event_rx.recv() => {
                app.handle_app_event(event);
            }
            _ = tick.tick() => {
                if app.has_busy_messages() {
                    app.spinner_frame = app.spinner_frame.wrapping_add(1);
                }
                terminal.draw(|f| crate::ui::render(f, app))?;
            }
        }

        if app.should_quit {
            break;
        }
    }

    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableBracketedPaste);
    ratatui::restore();

    Ok(())
}
