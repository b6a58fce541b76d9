// =====
// TESTS: 3
// =====
//
// History pages: older messages land above the view and the history channel
// keeps the previously-top message in place.

use chat_scroll_view::scroll::ScrollChannel;
use pretty_assertions::assert_eq;

use crate::helpers::{SETTLE, bottom_aligned_offset, local, test_app, transcript};

#[tokio::test(start_paused = true)]
async fn history_page_anchors_previous_top_message() {
    local(async {
        let mut app = test_app(transcript(9), 3, true);
        tokio::time::sleep(SETTLE).await;
        let previous_top = app.views[0].element().unwrap();

        assert_eq!(app.load_history(), 3);
        assert_eq!(app.views.len(), 6);
        assert_eq!(app.views[3].element(), Some(previous_top));
        assert_eq!(app.coordinator.target(ScrollChannel::History), Some(previous_top));
        // The live window is untouched.
        assert!(!app.coordinator.is_pending(ScrollChannel::Live));

        tokio::time::sleep(SETTLE).await;
        assert_eq!(app.viewport.scroll_log().last(), Some(&previous_top));
        assert_eq!(app.viewport.scroll_offset(), bottom_aligned_offset(&app, 3));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn later_history_mount_restarts_window_with_same_anchor() {
    local(async {
        let mut app = test_app(transcript(9), 3, true);
        tokio::time::sleep(SETTLE).await;

        app.load_history();
        let anchor = app.coordinator.target(ScrollChannel::History).unwrap();
        let scrolls_before = app.viewport.scroll_log().len();

        // Second page: its target rebinds to the first page's top message.
        app.load_history();
        let second_anchor = app.views[3].element().unwrap();
        assert_ne!(second_anchor, anchor);
        assert_eq!(app.coordinator.target(ScrollChannel::History), Some(second_anchor));

        tokio::time::sleep(SETTLE).await;
        // Only the newest registration fires.
        assert_eq!(&app.viewport.scroll_log()[scrolls_before..], &[second_anchor]);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn exhausted_history_adds_nothing() {
    local(async {
        let mut app = test_app(transcript(2), 5, true);
        assert_eq!(app.store.remaining(), 0);
        assert_eq!(app.load_history(), 0);
        assert_eq!(app.views.len(), 2);
        assert!(!app.coordinator.is_pending(ScrollChannel::History));
    })
    .await;
}
