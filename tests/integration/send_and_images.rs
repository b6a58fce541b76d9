// =====
// TESTS: 5
// =====
//
// Sending and image loading: status-driven re-renders and the scroll retrigger
// when an image changes size after layout.

use chat_scroll_view::content::RenderedContent;
use chat_scroll_view::message::{Message, MessageContent, MessageStatus};
use chat_scroll_view::view::ViewConfig;
use chrono::DateTime;
use pretty_assertions::assert_eq;

use crate::helpers::{SETTLE, local, pump_event, test_app, transcript};

fn image(id: &str, src: &str) -> Message {
    Message::new(
        id,
        "them",
        DateTime::from_timestamp(100, 0).unwrap(),
        MessageContent::Image(src.to_owned()),
    )
}

#[tokio::test(start_paused = true)]
async fn send_moves_from_sending_to_sent_with_one_rerender() {
    local(async {
        let mut app = test_app(transcript(2), 2, false);
        let id = app.send("hello").unwrap();
        let index = app.view_index(&id).unwrap();
        assert_eq!(app.views[index].message().status, MessageStatus::Sending);
        assert!(app.has_busy_messages());
        assert_eq!(app.views[index].render_count(), 1);

        // Own messages scroll even with auto-scroll off.
        tokio::time::sleep(SETTLE).await;
        let element = app.views[index].element().unwrap();
        assert_eq!(app.viewport.scroll_log(), vec![element]);

        pump_event(&mut app).await;
        assert_eq!(app.views[index].message().status, MessageStatus::Sent);
        assert_eq!(app.views[index].render_count(), 2);
        assert!(!app.views[index].render().busy);
        assert!(!app.has_busy_messages());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn failing_send_ends_failed() {
    local(async {
        let mut app = test_app(Vec::new(), 5, true);
        let id = app.send("/fail oops").unwrap();
        let index = app.view_index(&id).unwrap();
        assert_eq!(app.views[index].message().content, MessageContent::Text("oops".to_owned()));

        pump_event(&mut app).await;
        assert_eq!(app.views[index].message().status, MessageStatus::Failed);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn blank_input_sends_nothing() {
    local(async {
        let mut app = test_app(Vec::new(), 5, true);
        assert_eq!(app.send("   "), None);
        assert!(app.views.is_empty());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn image_load_retriggers_live_scroll() {
    local(async {
        let mut messages = transcript(2);
        messages.push(image("img", "https://example.com/cat.png"));
        let mut app = test_app(messages, 10, true);
        let element = app.views[2].element().unwrap();
        let loading_height = app.viewport.element_height(element).unwrap();

        tokio::time::sleep(SETTLE).await;
        assert_eq!(app.viewport.scroll_log(), vec![element]);

        pump_event(&mut app).await;
        assert!(app.viewport.element_height(element).unwrap() > loading_height);
        assert_eq!(app.viewport.scroll_log(), vec![element, element]);
        assert!(app.viewport.is_at_bottom());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn broken_image_swaps_in_placeholder_without_rerender() {
    local(async {
        let mut app = test_app(vec![image("img", "/no/such/picture.png")], 10, true);
        tokio::time::sleep(SETTLE).await;
        let scrolls = app.viewport.scroll_log().len();

        pump_event(&mut app).await;
        let view = &mut app.views[0];
        assert_eq!(view.render_count(), 1);
        match &view.render().content {
            RenderedContent::Image { src, original_src } => {
                assert_eq!(src, &ViewConfig::default().image_placeholder);
                assert_eq!(original_src, "/no/such/picture.png");
            }
            other => panic!("expected image content, got {other:?}"),
        }
        // Failure does not scroll.
        assert_eq!(app.viewport.scroll_log().len(), scrolls);
    })
    .await;
}
