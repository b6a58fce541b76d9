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

//! Per-message lifecycle: mount-time scroll registration, status-only
//! re-render policy, and the image load/error hooks.

use crate::content::{self, IMAGE_NOT_FOUND_SRC, RenderedContent};
use crate::message::{Message, MessageContent, MessageId, MessageStatus};
use crate::scroll::{DEFAULT_SCROLL_DELAY, ElementId, ScrollAction, ScrollChannel, ScrollCoordinator, ScrollSurface};
use chrono::{DateTime, FixedOffset, Offset as _, Utc};
use std::rc::Rc;
use std::time::Duration;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Debounce window for scroll registrations.
    pub scroll_delay: Duration,
    /// Asset substituted for images that fail to load.
    pub image_placeholder: String,
    /// Offset the header timestamp is shown in.
    pub utc_offset: FixedOffset,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scroll_delay: DEFAULT_SCROLL_DELAY,
            image_placeholder: IMAGE_NOT_FOUND_SRC.to_owned(),
            utc_offset: Utc.fix(),
        }
    }
}

/// Header chrome around the content region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageChrome {
    Full { avatar: String, username: String, timestamp: String },
    /// Compact form: content only.
    Simple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub id: MessageId,
    pub chrome: MessageChrome,
    pub status: MessageStatus,
    /// Busy overlay, shown while sending.
    pub busy: bool,
    pub content: RenderedContent,
}

pub fn format_timestamp(time: DateTime<Utc>, offset: FixedOffset) -> String {
    time.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string()
}

/// What a mount decided to do about scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountScroll {
    /// Registered a fresh action bound to `target`.
    Registered { channel: ScrollChannel, target: ElementId },
    /// Restarted the channel's window with whatever action it already had.
    Rescheduled { channel: ScrollChannel },
    None,
}

pub struct MessageView {
    message: Message,
    config: Rc<ViewConfig>,
    element: Option<ElementId>,
    rendered: Option<RenderedMessage>,
    image_failed: bool,
    render_count: usize,
}

impl MessageView {
    pub fn new(message: Message, config: Rc<ViewConfig>) -> Self {
        Self { message, config, element: None, rendered: None, image_failed: false, render_count: 0 }
    }

    #[must_use]
    pub fn message(&self) -> &Message {
        &self.message
    }

    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Number of times the body has actually been built.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    #[must_use]
    pub fn channel(&self) -> ScrollChannel {
        ScrollChannel::for_message(self.message.is_history)
    }

    /// Attach to a mounted element and register scrolling per the message's
    /// flags.
    ///
    /// History messages always restart the history window. The batch's scroll
    /// target additionally rebinds the history action to its next sibling,
    /// which is the element that must stay put while older content lands
    /// above it. A live message with `should_scroll` binds to itself.
    pub fn mount(
        &mut self,
        element: ElementId,
        surface: &Rc<dyn ScrollSurface>,
        coordinator: &ScrollCoordinator,
    ) -> MountScroll {
        self.element = Some(element);
        let delay = self.config.scroll_delay;

        if self.message.is_history {
            let anchor = if self.message.is_history_scroll_target {
                surface.next_sibling(element)
            } else {
                None
            };
            if self.message.is_history_scroll_target && anchor.is_none() {
                tracing::debug!(id = %self.message.id, "history scroll target has no next sibling");
            }
            return match anchor {
                Some(target) => {
                    coordinator.register(ScrollChannel::History, ScrollAction::new(surface, target), delay);
                    MountScroll::Registered { channel: ScrollChannel::History, target }
                }
                None if coordinator.reschedule(ScrollChannel::History, delay) => {
                    MountScroll::Rescheduled { channel: ScrollChannel::History }
                }
                None => MountScroll::None,
            };
        }

        if self.message.should_scroll {
            coordinator.register(ScrollChannel::Live, ScrollAction::new(surface, element), delay);
            return MountScroll::Registered { channel: ScrollChannel::Live, target: element };
        }

        MountScroll::None
    }

    /// Only a status transition justifies a re-render.
    #[must_use]
    pub fn should_update(&self, next: &Message) -> bool {
        self.message.status != next.status
    }

    /// Take new props. The cached body is kept unless the status changed, so
    /// edits to other fields stay invisible until the next status change.
    /// Returns whether a re-render is due.
    pub fn update(&mut self, next: Message) -> bool {
        let rerender = self.should_update(&next);
        if rerender {
            tracing::trace!(
                id = %next.id,
                from = self.message.status.as_str(),
                to = next.status.as_str(),
                "message status changed"
            );
            self.rendered = None;
        }
        self.message = next;
        rerender
    }

    /// The rendered message, built on first call and after status changes.
    pub fn render(&mut self) -> &RenderedMessage {
        let Self { message, config, rendered, image_failed, render_count, .. } = self;
        rendered.get_or_insert_with(|| {
            *render_count += 1;
            build(message, config, *image_failed)
        })
    }

    /// Image finished loading: its size changed after layout, so re-run the
    /// scroll currently stored on this message's channel.
    pub fn on_image_load(&self, coordinator: &ScrollCoordinator) -> bool {
        if !matches!(self.message.content, MessageContent::Image(_)) {
            return false;
        }
        coordinator.trigger(self.channel())
    }

    /// Image failed to load: swap in the placeholder. Does not touch scroll
    /// registration and does not count as a re-render.
    pub fn on_image_error(&mut self) -> bool {
        if !matches!(self.message.content, MessageContent::Image(_)) || self.image_failed {
            return false;
        }
        self.image_failed = true;
        tracing::debug!(id = %self.message.id, "image failed to load, using placeholder");
        if let Some(rendered) = self.rendered.as_mut() {
            rendered.content.substitute_missing_image(&self.config.image_placeholder);
        }
        true
    }
}

fn build(msg: &Message, config: &ViewConfig, image_failed: bool) -> RenderedMessage {
    let chrome = if msg.is_simple {
        MessageChrome::Simple
    } else {
        MessageChrome::Full {
            avatar: msg.avatar.clone(),
            username: msg.username.clone(),
            timestamp: format_timestamp(msg.time, config.utc_offset),
        }
    };
    let mut content = content::render(&msg.content);
    if image_failed {
        content.substitute_missing_image(&config.image_placeholder);
    }
    RenderedMessage {
        id: msg.id.clone(),
        chrome,
        status: msg.status,
        busy: msg.status == MessageStatus::Sending,
        content,
    }
}
