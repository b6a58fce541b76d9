mod helpers;

mod history;
mod live_scroll;
mod send_and_images;
mod transcript;
