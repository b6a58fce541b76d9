// =====
// TESTS: 5
// =====
//
// Live message scrolling: the debounced bottom-follow on the live channel.

use chat_scroll_view::scroll::ScrollChannel;
use pretty_assertions::assert_eq;
use std::time::Duration;

use crate::helpers::{SETTLE, local, test_app, text, transcript};

#[tokio::test(start_paused = true)]
async fn initial_page_scrolls_once_to_newest_message() {
    local(async {
        let app = test_app(transcript(5), 5, true);
        let newest = app.views[4].element().unwrap();

        // Nothing moves inside the window.
        assert_eq!(app.viewport.scroll_offset(), 0);
        assert!(app.coordinator.is_pending(ScrollChannel::Live));

        tokio::time::sleep(SETTLE).await;
        assert_eq!(app.viewport.scroll_log(), vec![newest]);
        assert!(app.viewport.is_at_bottom());
        assert!(!app.coordinator.is_pending(ScrollChannel::Live));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn others_messages_do_not_scroll_without_auto_scroll() {
    local(async {
        let app = test_app(transcript(4), 4, false);
        tokio::time::sleep(SETTLE).await;
        assert!(app.viewport.scroll_log().is_empty());
        assert_eq!(app.coordinator.target(ScrollChannel::Live), None);
        assert_eq!(app.viewport.scroll_offset(), 0);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn own_messages_scroll_without_auto_scroll() {
    local(async {
        let mut messages = transcript(3);
        messages.push(text("mine", "me", 10));
        let app = test_app(messages, 10, false);
        let mine = app.views[3].element().unwrap();

        tokio::time::sleep(SETTLE).await;
        assert_eq!(app.viewport.scroll_log(), vec![mine]);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn burst_inside_window_collapses_to_last_arrival() {
    local(async {
        let mut app = test_app(transcript(2), 2, true);
        tokio::time::sleep(Duration::from_millis(60)).await;
        app.push_live(text("late-1", "them", 20).live(true));
        tokio::time::sleep(Duration::from_millis(60)).await;
        app.push_live(text("late-2", "them", 21).live(true));
        let last = app.views[3].element().unwrap();

        tokio::time::sleep(SETTLE).await;
        assert_eq!(app.viewport.scroll_log(), vec![last]);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn removed_target_is_never_scrolled() {
    local(async {
        let app = test_app(transcript(3), 3, true);
        let newest = app.views[2].element().unwrap();
        assert!(app.viewport.remove(newest));

        tokio::time::sleep(SETTLE).await;
        assert!(app.viewport.scroll_log().is_empty());
    })
    .await;
}
