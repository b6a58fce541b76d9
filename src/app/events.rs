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

use super::App;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Rows moved per PageDown / arrow-with-Shift.
const PAGE_STEP: isize = 10;

pub fn handle_terminal_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Paste(text) => app.input.push_str(&text.replace(['\r', '\n'], " ")),
        // Resize is picked up by the next frame's relayout
        _ => {}
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        (KeyCode::Esc, _) => {
            app.should_quit = true;
        }
        (KeyCode::Char('a'), m) if m.contains(KeyModifiers::CONTROL) => {
            app.toggle_auto_scroll();
        }
        // Older history loads once the top is reached
        (KeyCode::PageUp, _) => {
            if app.viewport.scroll_offset() == 0 && app.store.remaining() > 0 {
                app.load_history();
            } else {
                app.scroll_lines(-PAGE_STEP);
            }
        }
        (KeyCode::Home, _) => {
            app.load_history();
        }
        (KeyCode::PageDown, _) => app.scroll_lines(PAGE_STEP),
        (KeyCode::Up, m) if m.contains(KeyModifiers::SHIFT) => app.scroll_lines(-PAGE_STEP),
        (KeyCode::Down, m) if m.contains(KeyModifiers::SHIFT) => app.scroll_lines(PAGE_STEP),
        (KeyCode::Up, _) => app.scroll_lines(-1),
        (KeyCode::Down, _) => app.scroll_lines(1),
        (KeyCode::End, _) => app.scroll_to_bottom(),
        (KeyCode::Enter, _) => {
            let text = std::mem::take(&mut app.input);
            app.send(&text);
        }
        (KeyCode::Backspace, _) => {
            app.input.pop();
        }
        (KeyCode::Char(c), m) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.input.push(c);
        }
        _ => {}
    }
}
