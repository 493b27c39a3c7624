//! Minimal Chrome DevTools Protocol client.
//!
//! One WebSocket to the browser endpoint; page sessions are attached with
//! `flatten: true` and multiplexed over it by `sessionId`.

mod client;
mod error;
mod page;
mod protocol;
mod transport;

pub use client::CdpClient;
pub use error::CdpError;
pub use page::PageSession;
pub use protocol::*;
