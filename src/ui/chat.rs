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

use crate::app::App;
use crate::ui::message;
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

#[allow(clippy::cast_possible_truncation)]
pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.chat_width != area.width {
        app.relayout(area.width);
    }
    app.viewport.resize(usize::from(area.height));

    if app.views.is_empty() {
        let hint = Line::from(Span::styled(
            "  No messages yet. Type below and press Enter to send.",
            Style::default().fg(theme::DIM),
        ));
        frame.render_widget(Paragraph::new(hint), area);
        return;
    }

    let mut all_lines = Vec::new();
    for view in &mut app.views {
        let image = app.image_states.get(&view.message().id).copied().unwrap_or_default();
        // Only status changes rebuild the body; this reuses the cached render.
        message::render_message(view.render(), image, app.spinner_frame, &mut all_lines);
    }

    let offset = app.viewport.scroll_offset().min(usize::from(u16::MAX)) as u16;
    let paragraph = Paragraph::new(Text::from(all_lines)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph.scroll((offset, 0)), area);
}
