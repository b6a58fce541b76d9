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

use super::{App, AppEvent};
use crate::message::{Message, MessageContent, MessageId, MessageStatus, should_scroll};
use crate::ui::message::{self as message_ui, ImageState};
use crate::view::MessageView;
use chrono::Utc;
use ratatui::text::Line;
use std::path::Path;
use std::time::Duration;

/// How long a simulated send stays in `sending`.
pub const DELIVERY_DELAY: Duration = Duration::from_millis(600);

/// How long a simulated image fetch takes.
pub const IMAGE_LOAD_DELAY: Duration = Duration::from_millis(250);

/// Prefix that makes a simulated send fail.
const FAIL_PREFIX: &str = "/fail ";

fn message_lines(view: &mut MessageView, image: ImageState, spinner_frame: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    message_ui::render_message(view.render(), image, spinner_frame, &mut lines);
    lines
}

fn measure_view(app: &mut App, index: usize) -> usize {
    let id = app.views[index].message().id.clone();
    let image = app.image_state(&id);
    let lines = message_lines(&mut app.views[index], image, app.spinner_frame);
    message_ui::measure(&lines, app.chat_width)
}

impl App {
    /// Mount a new live message at the bottom of the conversation.
    pub fn push_live(&mut self, message: Message) {
        self.views.push(MessageView::new(message, self.config.clone()));
        let index = self.views.len() - 1;
        let height = measure_view(self, index);
        let element = self.viewport.append(height);
        let surface = self.surface();
        let outcome = self.views[index].mount(element, &surface, &self.coordinator);
        tracing::debug!(id = %self.views[index].message().id, ?outcome, "mounted live message");
        self.schedule_image_load(index);
    }

    /// Prepend the next page of older messages. Returns how many were added.
    pub fn load_history(&mut self) -> usize {
        let page = self.store.next_history_page();
        if page.is_empty() {
            return 0;
        }
        let count = page.len();
        let fresh: Vec<MessageView> =
            page.into_iter().map(|m| MessageView::new(m, self.config.clone())).collect();
        self.views.splice(0..0, fresh);

        let heights: Vec<usize> = (0..count).map(|i| measure_view(self, i)).collect();
        let elements = self.viewport.prepend(&heights);
        let surface = self.surface();
        // Mount top to bottom, after the whole batch is on the surface, so the
        // scroll target can see its next sibling.
        for (index, element) in elements.into_iter().enumerate() {
            self.views[index].mount(element, &surface, &self.coordinator);
            self.schedule_image_load(index);
        }
        tracing::info!(count, remaining = self.store.remaining(), "loaded history page");
        count
    }

    /// Send a message as the current user. It starts in `sending` and is
    /// confirmed (or failed, with the `/fail ` prefix) after a short delay.
    pub fn send(&mut self, text: &str) -> Option<MessageId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let (body, fails) = match text.strip_prefix(FAIL_PREFIX) {
            Some(rest) => (rest, true),
            None => (text, false),
        };
        let content = if (body.starts_with("http://") || body.starts_with("https://"))
            && !body.contains(char::is_whitespace)
        {
            MessageContent::Url(body.to_owned())
        } else {
            MessageContent::Text(body.to_owned())
        };
        let id = MessageId::generate();
        let message = Message::new(id.as_str(), self.current_user.clone(), Utc::now(), content)
            .status(MessageStatus::Sending)
            .live(should_scroll(self.auto_scroll, true));
        self.push_live(message);

        let tx = self.event_tx.clone();
        let delivered = id.clone();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(DELIVERY_DELAY).await;
            let event = if fails {
                AppEvent::DeliveryFailed(delivered)
            } else {
                AppEvent::Delivered(delivered)
            };
            let _ = tx.send(event);
        });
        Some(id)
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Delivered(id) => self.set_status(&id, MessageStatus::Sent),
            AppEvent::DeliveryFailed(id) => self.set_status(&id, MessageStatus::Failed),
            AppEvent::ImageLoaded(id) => {
                self.image_states.insert(id.clone(), ImageState::Loaded);
                if let Some(index) = self.view_index(&id) {
                    self.remeasure(index);
                    self.views[index].on_image_load(&self.coordinator);
                }
            }
            AppEvent::ImageFailed(id) => {
                self.image_states.insert(id.clone(), ImageState::Failed);
                if let Some(index) = self.view_index(&id) {
                    self.views[index].on_image_error();
                    self.remeasure(index);
                }
            }
        }
    }

    fn set_status(&mut self, id: &MessageId, status: MessageStatus) {
        let Some(index) = self.view_index(id) else {
            return;
        };
        let next = self.views[index].message().clone().status(status);
        if self.views[index].update(next) {
            self.remeasure(index);
        }
    }

    fn remeasure(&mut self, index: usize) {
        let Some(element) = self.views[index].element() else {
            return;
        };
        let height = measure_view(self, index);
        self.viewport.set_height(element, height);
    }

    /// Re-measure every element for a new chat width.
    pub fn relayout(&mut self, width: u16) {
        self.chat_width = width;
        for index in 0..self.views.len() {
            self.remeasure(index);
        }
    }

    pub fn scroll_lines(&mut self, delta: isize) {
        self.viewport.scroll_by(delta);
    }

    pub fn scroll_to_bottom(&mut self) {
        let max = self.viewport.max_scroll();
        self.viewport.set_scroll_offset(max);
    }

    pub fn toggle_auto_scroll(&mut self) {
        self.auto_scroll = !self.auto_scroll;
        tracing::info!(auto_scroll = self.auto_scroll, "toggled auto-scroll");
    }

    fn schedule_image_load(&self, index: usize) {
        let message = self.views[index].message();
        let MessageContent::Image(src) = &message.content else {
            return;
        };
        let id = message.id.clone();
        let loads = image_source_available(src);
        let tx = self.event_tx.clone();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(IMAGE_LOAD_DELAY).await;
            let event = if loads { AppEvent::ImageLoaded(id) } else { AppEvent::ImageFailed(id) };
            let _ = tx.send(event);
        });
    }
}

/// Remote URLs are assumed reachable; anything else must be a local file.
fn image_source_available(src: &str) -> bool {
    let src = src.trim();
    if src.starts_with("http://") || src.starts_with("https://") {
        return true;
    }
    let path = src.strip_prefix("file://").unwrap_or(src);
    !path.is_empty() && Path::new(path).is_file()
}
