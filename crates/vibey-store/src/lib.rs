//! # Vibey Store
//!
//! Daily quota, dedupe index and capped event log.
//!
//! [`QuotaStore`] holds the policy (rollover, truncation, log cap) and never
//! surfaces I/O errors to callers. Persistence goes through a
//! [`StateRepository`](vibey_protocols::StateRepository):
//!
//! - [`FileStateRepository`] - two JSON documents rewritten in full on each save
//! - [`MemoryStateRepository`] - in-process, for tests

mod clock;
mod quota;
mod repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use quota::QuotaStore;
pub use repository::{FileStateRepository, MemoryStateRepository};
