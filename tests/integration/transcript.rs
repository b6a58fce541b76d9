// =====
// TESTS: 5
// =====
//
// Transcript loading and app construction from command-line options.

use chat_scroll_view::Cli;
use chat_scroll_view::app::{create_app, load_transcript};
use chat_scroll_view::error::AppError;
use chat_scroll_view::message::{MessageContent, MessageStatus};
use clap::Parser;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

use crate::helpers::local;

const SAMPLE: &str = r#"[
    {"id": "a", "username": "ann", "time": 1700000000000, "type": "text", "content": "<p>hi</p>"},
    {"id": "b", "username": "bob", "time": "2023-11-14T22:13:21Z", "type": "url", "content": "https://example.com"},
    {"id": "c", "username": "ann", "time": "2023-11-14 22:13:22", "type": "code", "content": "!!!lang=rust!!!fn main() {}", "status": "failed"},
    {"id": "d", "username": "bob", "time": 1700000003000, "type": "sticker", "content": {"pack": 1}}
]"#;

fn write_transcript(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn loads_mixed_transcript() {
    let file = write_transcript(SAMPLE);
    let messages = load_transcript(file.path()).unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[1].content, MessageContent::Url("https://example.com".to_owned()));
    assert_eq!(messages[2].status, MessageStatus::Failed);
    assert_eq!(messages[3].content.tag(), "sticker");
    // Numeric and textual timestamps land on the same clock.
    assert_eq!(messages[1].time.timestamp() - messages[0].time.timestamp(), 1);
}

#[test]
fn missing_transcript_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_transcript(&dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err, AppError::TranscriptNotFound);
}

#[test]
fn malformed_transcript_is_invalid() {
    let file = write_transcript("{ not json");
    assert_eq!(load_transcript(file.path()).unwrap_err(), AppError::TranscriptInvalid);
}

#[tokio::test(start_paused = true)]
async fn create_app_pages_transcript() {
    let file = write_transcript(SAMPLE);
    let path = file.path().to_str().unwrap().to_owned();
    let cli = Cli::parse_from(["chatview", "--transcript", &path, "--page-size", "3", "--no-auto-scroll"]);
    local(async {
        let app = create_app(&cli).unwrap();
        assert_eq!(app.views.len(), 3);
        assert_eq!(app.store.remaining(), 1);
        assert!(!app.auto_scroll);
        assert_eq!(app.views[0].message().id.as_str(), "b");
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn create_app_surfaces_transcript_errors() {
    let cli = Cli::parse_from(["chatview", "--transcript", "/no/such/transcript.json"]);
    local(async {
        let err = create_app(&cli).err().unwrap();
        assert_eq!(err.downcast_ref::<AppError>(), Some(&AppError::TranscriptNotFound));
    })
    .await;
}
