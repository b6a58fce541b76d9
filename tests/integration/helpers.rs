use chat_scroll_view::app::{App, ConversationStore};
use chat_scroll_view::message::{Message, MessageContent};
use chat_scroll_view::view::ViewConfig;
use chrono::DateTime;
use std::future::Future;
use std::time::Duration;

pub const CHAT_WIDTH: u16 = 40;
pub const VIEWPORT_HEIGHT: usize = 10;

/// Long enough for any pending scroll window to elapse.
pub const SETTLE: Duration = Duration::from_millis(150);

/// Plain text message at `second` seconds past the epoch.
pub fn text(id: &str, user: &str, second: i64) -> Message {
    Message::new(
        id,
        user,
        DateTime::from_timestamp(second, 0).unwrap(),
        MessageContent::Text(format!("body of {id}")),
    )
}

/// `count` messages alternating between `them` and `other`.
pub fn transcript(count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let user = if i % 2 == 0 { "them" } else { "other" };
            text(&format!("m{i}"), user, i64::try_from(i).unwrap())
        })
        .collect()
}

/// Build an `App` over `messages` without a terminal and mount the live page.
/// Must be called inside a `LocalSet`.
pub fn test_app(messages: Vec<Message>, page_size: usize, auto_scroll: bool) -> App {
    let (store, live) = ConversationStore::open(messages, page_size, "me", auto_scroll);
    let mut app =
        App::new(ViewConfig::default(), store, "me", auto_scroll, CHAT_WIDTH, VIEWPORT_HEIGHT);
    for message in live {
        app.push_live(message);
    }
    app
}

/// Drive `fut` on a fresh `LocalSet`, as the binary does.
pub async fn local<F: Future>(fut: F) -> F::Output {
    tokio::task::LocalSet::new().run_until(fut).await
}

/// Wait for the next app event and feed it back into the app.
pub async fn pump_event(app: &mut App) {
    let event = app.event_rx.recv().await.expect("event channel closed");
    app.handle_app_event(event);
}

/// Offset that puts `index`'s bottom edge at the viewport's bottom edge.
pub fn bottom_aligned_offset(app: &App, index: usize) -> usize {
    let element = app.views[index].element().unwrap();
    let top = app.viewport.element_top(element).unwrap();
    let height = app.viewport.element_height(element).unwrap();
    (top + height).saturating_sub(app.viewport.height()).min(app.viewport.max_scroll())
}
