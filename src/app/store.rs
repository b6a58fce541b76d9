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

use crate::error::AppError;
use crate::message::{Message, should_scroll};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    List(Vec<Message>),
    Wrapped { messages: Vec<Message> },
}

/// Read a transcript: a JSON message array, or an object with a `messages` array.
pub fn load_transcript(path: &Path) -> Result<Vec<Message>, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to read transcript");
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::TranscriptNotFound
        } else {
            AppError::TranscriptUnreadable
        }
    })?;
    parse_transcript(&raw)
}

pub fn parse_transcript(raw: &str) -> Result<Vec<Message>, AppError> {
    let file: TranscriptFile = serde_json::from_str(raw).map_err(|e| {
        tracing::error!(error = %e, "failed to parse transcript");
        AppError::TranscriptInvalid
    })?;
    Ok(match file {
        TranscriptFile::List(messages) | TranscriptFile::Wrapped { messages } => messages,
    })
}

/// Stand-in for the conversation store: hands out the newest page as live
/// messages and older pages as history on demand.
#[derive(Debug, Default)]
pub struct ConversationStore {
    older: Vec<Message>,
    page_size: usize,
}

impl ConversationStore {
    /// Split a transcript into the initial live page and the backlog. Live
    /// messages scroll when auto-scroll is on or when `current_user` sent them.
    pub fn open(
        mut messages: Vec<Message>,
        page_size: usize,
        current_user: &str,
        auto_scroll: bool,
    ) -> (Self, Vec<Message>) {
        let page_size = page_size.max(1);
        let split = messages.len().saturating_sub(page_size);
        let live = messages
            .split_off(split)
            .into_iter()
            .map(|msg| {
                let is_self = msg.username == current_user;
                msg.live(should_scroll(auto_scroll, is_self))
            })
            .collect();
        (Self { older: messages, page_size }, live)
    }

    /// Messages not yet paged in.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.older.len()
    }

    /// Next page of older messages in render order. The last one is the
    /// batch's scroll target: its next sibling is the previous top message.
    pub fn next_history_page(&mut self) -> Vec<Message> {
        let split = self.older.len().saturating_sub(self.page_size);
        let mut page: Vec<Message> =
            self.older.split_off(split).into_iter().map(|m| m.history(false)).collect();
        if let Some(last) = page.last_mut() {
            last.is_history_scroll_target = true;
        }
        page
    }
}
