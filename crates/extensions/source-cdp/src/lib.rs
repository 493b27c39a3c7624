//! # Vibey CDP source
//!
//! [`PostSource`](vibey_protocols::PostSource) backend that drives a running
//! Chrome over the DevTools Protocol and works the X/Twitter live search feed.
//!
//! Start Chrome with remote debugging on the configured endpoint, e.g.
//!
//! ```bash
//! chrome --remote-debugging-port=9444 --user-data-dir=<profile>
//! ```
//!
//! and log in to X in that profile before running.

pub mod cdp;
mod feed;
mod source;

pub use feed::{is_login_url, search_url, status_id_from_href};
pub use source::XFeedSource;
