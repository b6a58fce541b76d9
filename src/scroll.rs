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

//! Debounced scroll coordination across mounted messages.
//!
//! Two independent channels, live and history, each hold at most one stored
//! action and at most one pending timer. Registering on a channel cancels the
//! channel's pending timer and replaces its action, so a burst of mounts in
//! the same tick collapses into a single scroll after the last one.
//!
//! Timers run as `spawn_local` tasks: the coordinator must be driven from
//! inside a `tokio::task::LocalSet`, on the UI thread.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delay between the last registration on a channel and its scroll.
pub const DEFAULT_SCROLL_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollChannel {
    /// Newly arriving messages.
    Live,
    /// Backfilled older messages.
    History,
}

impl ScrollChannel {
    #[must_use]
    pub fn for_message(is_history: bool) -> Self {
        if is_history { Self::History } else { Self::Live }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::History => "history",
        }
    }
}

/// Stable handle to a mounted element on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// The parts of the rendering surface the scroll logic needs.
pub trait ScrollSurface {
    fn is_mounted(&self, element: ElementId) -> bool;

    /// Element immediately after `element` in render order.
    fn next_sibling(&self, element: ElementId) -> Option<ElementId>;

    /// Bring `element` into view without animation, aligned to the bottom
    /// edge of the viewport.
    fn scroll_into_view(&self, element: ElementId);
}

/// Element-bound "scroll this into view" operation. Idempotent, and a no-op
/// once the element or the whole surface is gone.
#[derive(Clone)]
pub struct ScrollAction {
    surface: Weak<dyn ScrollSurface>,
    target: ElementId,
}

impl ScrollAction {
    pub fn new(surface: &Rc<dyn ScrollSurface>, target: ElementId) -> Self {
        Self { surface: Rc::downgrade(surface), target }
    }

    #[must_use]
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// Run the scroll. Returns whether the surface actually scrolled.
    pub fn fire(&self) -> bool {
        let Some(surface) = self.surface.upgrade() else {
            tracing::trace!(element = self.target.0, "scroll surface dropped, skipping");
            return false;
        };
        if !surface.is_mounted(self.target) {
            tracing::trace!(element = self.target.0, "scroll target unmounted, skipping");
            return false;
        }
        surface.scroll_into_view(self.target);
        true
    }
}

impl fmt::Debug for ScrollAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAction").field("target", &self.target).finish_non_exhaustive()
    }
}

#[derive(Default)]
struct ChannelSlot {
    action: Option<ScrollAction>,
    timer: Option<JoinHandle<()>>,
    /// Bumped on every arm; a timer only fires if it still matches.
    generation: u64,
}

#[derive(Default)]
struct Slots {
    live: ChannelSlot,
    history: ChannelSlot,
}

impl Slots {
    fn get(&self, channel: ScrollChannel) -> &ChannelSlot {
        match channel {
            ScrollChannel::Live => &self.live,
            ScrollChannel::History => &self.history,
        }
    }

    fn get_mut(&mut self, channel: ScrollChannel) -> &mut ChannelSlot {
        match channel {
            ScrollChannel::Live => &mut self.live,
            ScrollChannel::History => &mut self.history,
        }
    }
}

impl Drop for Slots {
    fn drop(&mut self) {
        for slot in [&mut self.live, &mut self.history] {
            if let Some(timer) = slot.timer.take() {
                timer.abort();
            }
        }
    }
}

/// Shared scroll state for every message view in one conversation.
///
/// Cloning is cheap and yields a handle onto the same two channel slots.
#[derive(Clone, Default)]
pub struct ScrollCoordinator {
    slots: Rc<RefCell<Slots>>,
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `action` as the channel's action and fire it after `delay`,
    /// cancelling any timer already pending on that channel.
    ///
    /// # Panics
    ///
    /// Panics when called outside a `tokio::task::LocalSet`, since the timer
    /// is a `spawn_local` task.
    pub fn register(&self, channel: ScrollChannel, action: ScrollAction, delay: Duration) {
        tracing::debug!(
            channel = channel.as_str(),
            element = action.target.0,
            delay = ?delay,
            "register scroll"
        );
        let weak = Rc::downgrade(&self.slots);
        let mut slots = self.slots.borrow_mut();
        let slot = slots.get_mut(channel);
        slot.action = Some(action);
        arm(slot, weak, channel, delay);
    }

    /// Restart the channel's debounce window with its current action.
    /// Returns `false` (and schedules nothing) when no action is stored.
    ///
    /// # Panics
    ///
    /// Panics when a timer has to be armed outside a `tokio::task::LocalSet`.
    pub fn reschedule(&self, channel: ScrollChannel, delay: Duration) -> bool {
        let weak = Rc::downgrade(&self.slots);
        let mut slots = self.slots.borrow_mut();
        let slot = slots.get_mut(channel);
        if slot.action.is_none() {
            tracing::trace!(channel = channel.as_str(), "no scroll action to reschedule");
            return false;
        }
        tracing::debug!(channel = channel.as_str(), delay = ?delay, "reschedule scroll");
        arm(slot, weak, channel, delay);
        true
    }

    /// Run the channel's stored action now. A pending timer on the channel is
    /// left alone and still fires. Returns whether anything scrolled.
    pub fn trigger(&self, channel: ScrollChannel) -> bool {
        let action = self.slots.borrow().get(channel).action.clone();
        match action {
            Some(action) => {
                tracing::debug!(channel = channel.as_str(), element = action.target.0, "trigger scroll");
                action.fire()
            }
            None => {
                tracing::trace!(channel = channel.as_str(), "trigger with no scroll action");
                false
            }
        }
    }

    /// Cancel the pending timer without forgetting the stored action.
    pub fn cancel(&self, channel: ScrollChannel) {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.get_mut(channel);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
            slot.generation = slot.generation.wrapping_add(1);
        }
    }

    #[must_use]
    pub fn is_pending(&self, channel: ScrollChannel) -> bool {
        self.slots.borrow().get(channel).timer.is_some()
    }

    /// Element the channel's stored action is bound to.
    #[must_use]
    pub fn target(&self, channel: ScrollChannel) -> Option<ElementId> {
        self.slots.borrow().get(channel).action.as_ref().map(ScrollAction::target)
    }
}

fn arm(slot: &mut ChannelSlot, slots: Weak<RefCell<Slots>>, channel: ScrollChannel, delay: Duration) {
    if let Some(previous) = slot.timer.take() {
        previous.abort();
    }
    slot.generation = slot.generation.wrapping_add(1);
    let generation = slot.generation;
    slot.timer = Some(tokio::task::spawn_local(async move {
        tokio::time::sleep(delay).await;
        fire_pending(&slots, channel, generation);
    }));
}

fn fire_pending(slots: &Weak<RefCell<Slots>>, channel: ScrollChannel, generation: u64) {
    let Some(slots) = slots.upgrade() else {
        return;
    };
    let action = {
        let mut slots = slots.borrow_mut();
        let slot = slots.get_mut(channel);
        if slot.generation != generation {
            return;
        }
        slot.timer = None;
        slot.action.clone()
    };
    if let Some(action) = action {
        tracing::trace!(channel = channel.as_str(), element = action.target.0, "scroll timer fired");
        action.fire();
    }
}
