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

//! Message records as supplied by the conversation store.
//!
//! The view layer only reads these. The wire form is camelCase JSON with a
//! `type` tag next to an untyped `content` payload; decoding folds the pair
//! into [`MessageContent`] so every later stage can match exhaustively.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for records that arrive without one.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery status. Absent on the wire means `Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    #[default]
    Sent,
    Failed,
}

impl MessageStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileAttachment {
    pub name: String,
    pub url: String,
    /// Size in bytes.
    #[serde(deserialize_with = "deserialize_byte_size")]
    pub size: u64,
}

/// Byte counts may arrive as JSON floats; fractions are dropped.
fn deserialize_byte_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let number = Number::deserialize(deserializer)?;
    if let Some(bytes) = number.as_u64() {
        return Ok(bytes);
    }
    match number.as_f64() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(bytes) if bytes.is_finite() && bytes >= 0.0 => Ok(bytes.trunc() as u64),
        _ => Err(serde::de::Error::custom(format!("invalid file size {number}"))),
    }
}

/// Message payload, one variant per content tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Pre-sanitized markup, one paragraph per line.
    Text(String),
    Url(String),
    /// Source code, optionally prefixed with a `!!!lang=<id>!!!` marker.
    Code(String),
    /// Image source URL.
    Image(String),
    File(FileAttachment),
    /// Unrecognized tag, or a payload whose shape does not fit its tag.
    Unknown { tag: String },
}

impl MessageContent {
    /// Fold a wire `(type, content)` pair into a typed payload. Never fails:
    /// anything that does not decode lands in [`MessageContent::Unknown`].
    pub fn from_tagged(tag: &str, content: Value) -> Self {
        let decoded = match tag {
            "text" => into_string(content).map(Self::Text),
            "url" => into_string(content).map(Self::Url),
            "code" => into_string(content).map(Self::Code),
            "image" => into_string(content).map(Self::Image),
            "file" => serde_json::from_value::<FileAttachment>(content).ok().map(Self::File),
            _ => None,
        };
        decoded.unwrap_or_else(|| {
            tracing::debug!(tag, "message content did not match a known type");
            Self::Unknown { tag: tag.to_owned() }
        })
    }

    /// The wire tag this payload came from.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Text(_) => "text",
            Self::Url(_) => "url",
            Self::Code(_) => "code",
            Self::Image(_) => "image",
            Self::File(_) => "file",
            Self::Unknown { tag } => tag,
        }
    }
}

fn into_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    #[error("timestamp {0} ms is out of range")]
    OutOfRange(String),
    #[error("unrecognized timestamp `{0}`")]
    Unparseable(String),
}

/// Message time as it appears on the wire: epoch millis or an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MessageTime {
    /// Integer or fractional epoch millis.
    Millis(Number),
    Text(String),
}

impl MessageTime {
    /// Normalize either representation to a UTC instant. Strings without an
    /// offset are read as UTC.
    pub fn normalize(&self) -> Result<DateTime<Utc>, TimeError> {
        match self {
            Self::Millis(ms) => whole_millis(ms)
                .and_then(DateTime::from_timestamp_millis)
                .ok_or_else(|| TimeError::OutOfRange(ms.to_string())),
            Self::Text(raw) => {
                let trimmed = raw.trim();
                if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
                    return Ok(dt.with_timezone(&Utc));
                }
                ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                    .map(|naive| naive.and_utc())
                    .ok_or_else(|| TimeError::Unparseable(raw.clone()))
            }
        }
    }
}

/// Fractional millis truncate toward zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_millis(ms: &Number) -> Option<i64> {
    if let Some(whole) = ms.as_i64() {
        return Some(whole);
    }
    let ms = ms.as_f64()?;
    (ms.is_finite() && ms >= i64::MIN as f64 && ms < i64::MAX as f64).then(|| ms.trunc() as i64)
}

/// A single chat message plus the scroll flags the store derives for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "WireMessage")]
pub struct Message {
    pub id: MessageId,
    pub avatar: String,
    pub username: String,
    pub time: DateTime<Utc>,
    pub content: MessageContent,
    pub status: MessageStatus,
    /// Compact rendering: no avatar, username or timestamp.
    pub is_simple: bool,
    /// Newly arrived live message the viewport should follow.
    pub should_scroll: bool,
    /// Loaded as older history.
    pub is_history: bool,
    /// The history message whose next sibling stays anchored after a prepend.
    pub is_history_scroll_target: bool,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        time: DateTime<Utc>,
        content: MessageContent,
    ) -> Self {
        Self {
            id: MessageId::new(id),
            avatar: String::new(),
            username: username.into(),
            time,
            content,
            status: MessageStatus::Sent,
            is_simple: false,
            should_scroll: false,
            is_history: false,
            is_history_scroll_target: false,
        }
    }

    #[must_use]
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    #[must_use]
    pub fn status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn simple(mut self, is_simple: bool) -> Self {
        self.is_simple = is_simple;
        self
    }

    /// Mark as a live message; `should_scroll` as derived by [`should_scroll`].
    #[must_use]
    pub fn live(mut self, should_scroll: bool) -> Self {
        self.is_history = false;
        self.is_history_scroll_target = false;
        self.should_scroll = should_scroll;
        self
    }

    /// Mark as backfilled history, optionally the batch's scroll target.
    #[must_use]
    pub fn history(mut self, is_scroll_target: bool) -> Self {
        self.is_history = true;
        self.is_history_scroll_target = is_scroll_target;
        self.should_scroll = false;
        self
    }
}

/// Whether a newly arrived live message should pull the viewport along:
/// either auto-scroll is on, or the current user sent it.
#[must_use]
pub fn should_scroll(auto_scroll: bool, is_self_send: bool) -> bool {
    auto_scroll || is_self_send
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    #[serde(default = "MessageId::generate")]
    id: MessageId,
    #[serde(default)]
    avatar: String,
    username: String,
    time: MessageTime,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    status: Option<MessageStatus>,
    #[serde(default)]
    is_simple: bool,
    #[serde(default)]
    should_scroll: bool,
    #[serde(default)]
    is_history: bool,
    #[serde(default)]
    is_history_scroll_target: bool,
}

impl TryFrom<WireMessage> for Message {
    type Error = TimeError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: wire.id,
            avatar: wire.avatar,
            username: wire.username,
            time: wire.time.normalize()?,
            content: MessageContent::from_tagged(&wire.kind, wire.content),
            status: wire.status.unwrap_or_default(),
            is_simple: wire.is_simple,
            should_scroll: wire.should_scroll,
            is_history: wire.is_history,
            is_history_scroll_target: wire.is_history_scroll_target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn decode(value: Value) -> Message {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_text_message_with_defaults() {
        let msg = decode(json!({
            "id": "m1",
            "username": "alice",
            "time": 1_700_000_000_000_i64,
            "type": "text",
            "content": "hello"
        }));
        assert_eq!(msg.id.as_str(), "m1");
        assert_eq!(msg.content, MessageContent::Text("hello".to_owned()));
        assert_eq!(msg.status, MessageStatus::Sent);
        assert!(!msg.is_simple);
        assert!(!msg.should_scroll);
        assert!(!msg.is_history);
    }

    #[test]
    fn decodes_file_payload() {
        let msg = decode(json!({
            "username": "bob",
            "time": 0,
            "type": "file",
            "content": { "name": "a.zip", "url": "https://x/a.zip", "size": 2048 }
        }));
        assert_eq!(
            msg.content,
            MessageContent::File(FileAttachment {
                name: "a.zip".to_owned(),
                url: "https://x/a.zip".to_owned(),
                size: 2048,
            })
        );
    }

    #[test]
    fn decodes_file_payload_with_float_size() {
        let content = MessageContent::from_tagged(
            "file",
            json!({ "name": "a", "url": "u", "size": 2048.0 }),
        );
        assert_eq!(
            content,
            MessageContent::File(FileAttachment { name: "a".to_owned(), url: "u".to_owned(), size: 2048 })
        );
        let content = MessageContent::from_tagged("file", json!({ "name": "a", "url": "u", "size": 10.75 }));
        assert!(matches!(content, MessageContent::File(FileAttachment { size: 10, .. })));
    }

    #[test]
    fn negative_file_size_decodes_to_unknown() {
        let content = MessageContent::from_tagged("file", json!({ "name": "a", "url": "u", "size": -1 }));
        assert_eq!(content, MessageContent::Unknown { tag: "file".to_owned() });
    }

    #[test]
    fn missing_id_is_generated() {
        let msg = decode(json!({ "username": "u", "time": 0, "type": "text", "content": "" }));
        assert!(!msg.id.as_str().is_empty());
    }

    #[test]
    fn camel_case_flags_and_status() {
        let msg = decode(json!({
            "username": "u",
            "time": 0,
            "type": "text",
            "content": "x",
            "status": "sending",
            "isSimple": true,
            "isHistory": true,
            "isHistoryScrollTarget": true
        }));
        assert_eq!(msg.status, MessageStatus::Sending);
        assert!(msg.is_simple);
        assert!(msg.is_history);
        assert!(msg.is_history_scroll_target);
    }

    #[test]
    fn unknown_tag_decodes_to_unknown() {
        let content = MessageContent::from_tagged("poll", json!({ "options": [] }));
        assert_eq!(content, MessageContent::Unknown { tag: "poll".to_owned() });
        assert_eq!(content.tag(), "poll");
    }

    #[test]
    fn mismatched_payload_decodes_to_unknown() {
        let content = MessageContent::from_tagged("file", json!("not a record"));
        assert_eq!(content, MessageContent::Unknown { tag: "file".to_owned() });
        let content = MessageContent::from_tagged("text", json!(42));
        assert_eq!(content, MessageContent::Unknown { tag: "text".to_owned() });
    }

    #[test]
    fn millis_and_iso_normalize_to_same_instant() {
        let from_millis = MessageTime::Millis(1_700_000_000_000_i64.into()).normalize().unwrap();
        let from_iso = MessageTime::Text("2023-11-14T22:13:20Z".to_owned()).normalize().unwrap();
        let from_naive = MessageTime::Text("2023-11-14 22:13:20".to_owned()).normalize().unwrap();
        assert_eq!(from_millis, from_iso);
        assert_eq!(from_millis, from_naive);

        let msg = decode(json!({ "username": "u", "time": 1.7e12, "type": "text", "content": "x" }));
        assert_eq!(msg.time, from_millis);
        let fractional = decode(json!({ "username": "u", "time": 1_700_000_000_000.9, "type": "text", "content": "x" }));
        assert_eq!(fractional.time, from_millis);
    }

    #[test]
    fn out_of_range_millis_are_rejected() {
        let err = MessageTime::Millis(Number::from(i64::MAX)).normalize().unwrap_err();
        assert_eq!(err, TimeError::OutOfRange(i64::MAX.to_string()));
        let huge = serde_json::from_value::<Message>(json!({
            "username": "u", "time": 1e300, "type": "text", "content": "x"
        }));
        assert!(huge.is_err());
    }

    #[test]
    fn iso_with_offset_is_converted_to_utc() {
        let t = MessageTime::Text("2023-11-15T00:13:20+02:00".to_owned()).normalize().unwrap();
        assert_eq!(t, MessageTime::Millis(1_700_000_000_000_i64.into()).normalize().unwrap());
    }

    #[test]
    fn garbage_time_is_rejected() {
        let err = MessageTime::Text("yesterday".to_owned()).normalize().unwrap_err();
        assert_eq!(err, TimeError::Unparseable("yesterday".to_owned()));
        let bad = serde_json::from_value::<Message>(json!({
            "username": "u", "time": "yesterday", "type": "text", "content": "x"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn should_scroll_when_auto_or_self_sent() {
        assert!(should_scroll(true, false));
        assert!(should_scroll(false, true));
        assert!(!should_scroll(false, false));
    }
}
