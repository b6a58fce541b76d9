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

use super::store::ConversationStore;
use crate::message::MessageId;
use crate::scroll::{ScrollCoordinator, ScrollSurface};
use crate::ui::message::ImageState;
use crate::view::{MessageView, ViewConfig};
use crate::viewport::Viewport;
use std::collections::HashMap;
use std::rc::Rc;
use tokio::sync::mpsc;

/// Asynchronous completions fed back into the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Delivered(MessageId),
    DeliveryFailed(MessageId),
    ImageLoaded(MessageId),
    ImageFailed(MessageId),
}

pub struct App {
    /// Message views in render order, oldest first.
    pub views: Vec<MessageView>,
    pub image_states: HashMap<MessageId, ImageState>,
    pub viewport: Rc<Viewport>,
    pub coordinator: ScrollCoordinator,
    pub config: Rc<ViewConfig>,
    pub store: ConversationStore,
    /// Global auto-scroll setting; self-sent messages scroll regardless.
    pub auto_scroll: bool,
    pub current_user: String,
    pub input: String,
    pub should_quit: bool,
    pub spinner_frame: usize,
    /// Width the element heights in `viewport` were measured at.
    pub chat_width: u16,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
    pub event_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(
        config: ViewConfig,
        store: ConversationStore,
        current_user: impl Into<String>,
        auto_scroll: bool,
        chat_width: u16,
        viewport_height: usize,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            views: Vec::new(),
            image_states: HashMap::new(),
            viewport: Rc::new(Viewport::new(viewport_height)),
            coordinator: ScrollCoordinator::new(),
            config: Rc::new(config),
            store,
            auto_scroll,
            current_user: current_user.into(),
            input: String::new(),
            should_quit: false,
            spinner_frame: 0,
            chat_width,
            event_tx,
            event_rx,
        }
    }

    pub(super) fn surface(&self) -> Rc<dyn ScrollSurface> {
        self.viewport.clone()
    }

    #[must_use]
    pub fn image_state(&self, id: &MessageId) -> ImageState {
        self.image_states.get(id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn view_index(&self, id: &MessageId) -> Option<usize> {
        self.views.iter().position(|v| &v.message().id == id)
    }

    #[must_use]
    pub fn has_busy_messages(&self) -> bool {
        self.views.iter().any(|v| v.message().status == crate::message::MessageStatus::Sending)
    }
}
