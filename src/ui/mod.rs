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

mod chat;
pub mod message;
pub mod theme;

use crate::app::App;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Horizontal inset shared by header, input and footer.
const PAD: u16 = 2;

pub fn render(frame: &mut Frame, app: &mut App) {
    let [header, header_sep, body, input_sep, input, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, app);
    render_separator(frame, header_sep);
    chat::render(frame, body, app);
    render_separator(frame, input_sep);
    render_input(frame, input, app);
    render_footer(frame, footer);
}

fn padded(area: Rect) -> Rect {
    Rect {
        x: area.x + PAD,
        y: area.y,
        width: area.width.saturating_sub(PAD * 2),
        height: area.height,
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let sep = Span::styled("  \u{2502}  ", Style::default().fg(theme::DIM));
    let (auto_label, auto_color) =
        if app.auto_scroll { ("on", Color::Green) } else { ("off", theme::DIM) };
    let line = Line::from(vec![
        Span::styled(
            "chatview",
            Style::default().fg(theme::RUST_ORANGE).add_modifier(Modifier::BOLD),
        ),
        sep.clone(),
        Span::styled("User: ", Style::default().fg(theme::DIM)),
        Span::styled(app.current_user.clone(), Style::default().fg(Color::White)),
        sep.clone(),
        Span::styled("Auto-scroll: ", Style::default().fg(theme::DIM)),
        Span::styled(auto_label, Style::default().fg(auto_color)),
        sep,
        Span::styled(
            format!("{} older", app.store.remaining()),
            Style::default().fg(theme::DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), padded(area));
}

fn render_separator(frame: &mut Frame, area: Rect) {
    let line = theme::SEPARATOR_CHAR.repeat(usize::from(area.width));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(line, Style::default().fg(theme::DIM)))),
        area,
    );
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let area = padded(area);
    let prompt = Span::styled(
        format!("{} ", theme::PROMPT_CHAR),
        Style::default().fg(theme::RUST_ORANGE),
    );
    let line = if app.input.is_empty() {
        Line::from(vec![prompt, Span::styled("Type a message...", Style::default().fg(theme::DIM))])
    } else {
        Line::from(vec![prompt, Span::raw(app.input.clone())])
    };
    frame.render_widget(Paragraph::new(line), area);

    #[allow(clippy::cast_possible_truncation)]
    let typed = app.input.chars().count().min(usize::from(u16::MAX)) as u16;
    frame.set_cursor_position((area.x.saturating_add(2).saturating_add(typed), area.y));
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "PgUp older \u{00b7} \u{2191}\u{2193} scroll \u{00b7} End bottom \u{00b7} Ctrl+A auto-scroll \u{00b7} Esc quit",
        Style::default().fg(theme::DIM),
    ));
    frame.render_widget(Paragraph::new(line), padded(area));
}
