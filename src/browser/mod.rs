pub mod connection;

pub use connection::{connect_to_browser_and_page, is_watch_page, video_id};
