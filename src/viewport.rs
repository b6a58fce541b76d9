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

//! In-memory scrolling surface: an ordered column of elements with heights
//! (in rows) behind a fixed-height window.
//!
//! Prepending does not move the scroll offset, so content visibly jumps
//! until something scrolls an anchor back into view. That is the behavior
//! the history scroll target exists to correct.

use crate::scroll::{ElementId, ScrollSurface};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Most recent scrolls kept in the scroll log.
pub const SCROLL_LOG_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy)]
struct Element {
    id: ElementId,
    height: usize,
}

#[derive(Debug, Default)]
struct ViewportState {
    elements: Vec<Element>,
    height: usize,
    offset: usize,
    next_id: u64,
    scroll_log: VecDeque<ElementId>,
}

impl ViewportState {
    fn content_height(&self) -> usize {
        self.elements.iter().map(|e| e.height).sum()
    }

    fn max_scroll(&self) -> usize {
        self.content_height().saturating_sub(self.height)
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_scroll());
    }

    fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    fn top_of(&self, index: usize) -> usize {
        self.elements[..index].iter().map(|e| e.height).sum()
    }

    fn allocate(&mut self, height: usize) -> Element {
        self.next_id += 1;
        Element { id: ElementId(self.next_id), height }
    }
}

#[derive(Debug, Default)]
pub struct Viewport {
    state: RefCell<ViewportState>,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self { state: RefCell::new(ViewportState { height, ..ViewportState::default() }) }
    }

    /// Mount a new element at the bottom.
    pub fn append(&self, height: usize) -> ElementId {
        let mut state = self.state.borrow_mut();
        let element = state.allocate(height);
        state.elements.push(element);
        element.id
    }

    /// Mount elements above everything else, keeping their given order.
    pub fn prepend(&self, heights: &[usize]) -> Vec<ElementId> {
        let mut state = self.state.borrow_mut();
        let fresh: Vec<Element> = heights.iter().map(|h| state.allocate(*h)).collect();
        let ids = fresh.iter().map(|e| e.id).collect();
        state.elements.splice(0..0, fresh);
        ids
    }

    /// Unmount an element. Returns `false` if it was not mounted.
    pub fn remove(&self, id: ElementId) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.position(id) else {
            return false;
        };
        state.elements.remove(index);
        state.clamp();
        true
    }

    /// Update an element's measured height (e.g. after an image loads).
    pub fn set_height(&self, id: ElementId, height: usize) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.position(id) else {
            return false;
        };
        state.elements[index].height = height;
        state.clamp();
        true
    }

    pub fn resize(&self, height: usize) {
        let mut state = self.state.borrow_mut();
        state.height = height;
        state.clamp();
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.state.borrow().height
    }

    #[must_use]
    pub fn content_height(&self) -> usize {
        self.state.borrow().content_height()
    }

    #[must_use]
    pub fn max_scroll(&self) -> usize {
        self.state.borrow().max_scroll()
    }

    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.state.borrow().offset
    }

    pub fn set_scroll_offset(&self, offset: usize) {
        let mut state = self.state.borrow_mut();
        state.offset = offset;
        state.clamp();
    }

    pub fn scroll_by(&self, delta: isize) {
        let mut state = self.state.borrow_mut();
        state.offset = state.offset.saturating_add_signed(delta);
        state.clamp();
    }

    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        let state = self.state.borrow();
        state.offset >= state.max_scroll()
    }

    #[must_use]
    pub fn element_top(&self, id: ElementId) -> Option<usize> {
        let state = self.state.borrow();
        state.position(id).map(|index| state.top_of(index))
    }

    #[must_use]
    pub fn element_height(&self, id: ElementId) -> Option<usize> {
        let state = self.state.borrow();
        state.position(id).map(|index| state.elements[index].height)
    }

    #[must_use]
    pub fn elements(&self) -> Vec<ElementId> {
        self.state.borrow().elements.iter().map(|e| e.id).collect()
    }

    /// Elements `scroll_into_view` was applied to, oldest first. Only the
    /// last [`SCROLL_LOG_CAPACITY`] are kept.
    #[must_use]
    pub fn scroll_log(&self) -> Vec<ElementId> {
        self.state.borrow().scroll_log.iter().copied().collect()
    }
}

impl ScrollSurface for Viewport {
    fn is_mounted(&self, element: ElementId) -> bool {
        self.state.borrow().position(element).is_some()
    }

    fn next_sibling(&self, element: ElementId) -> Option<ElementId> {
        let state = self.state.borrow();
        let index = state.position(element)?;
        state.elements.get(index + 1).map(|e| e.id)
    }

    fn scroll_into_view(&self, element: ElementId) {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.position(element) else {
            return;
        };
        let bottom = state.top_of(index) + state.elements[index].height;
        state.offset = bottom.saturating_sub(state.height);
        state.clamp();
        if state.scroll_log.len() == SCROLL_LOG_CAPACITY {
            state.scroll_log.pop_front();
        }
        state.scroll_log.push_back(element);
        tracing::trace!(element = element.0, offset = state.offset, "scrolled into view");
    }
}
