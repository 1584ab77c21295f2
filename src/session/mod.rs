//! Client-side view state built on top of [`ApiClient`](crate::api::ApiClient).
//!
//! Each component owns its own slice of state and is passed around
//! explicitly; nothing here is global.

mod downloads;
mod monitor;
mod reader;

pub use downloads::DownloadsView;
pub use monitor::{parse_interval, UpdateMonitor, DEFAULT_POLL_INTERVAL_SECS};
pub use reader::{ReaderSession, ARTICLE_PAGE_SIZE};
