//! # Vibey Protocols
//!
//! Domain types and capability traits shared by every Vibey crate.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`PostSource`] - Automation backend that discovers posts and performs actions on them
//! - [`RelevanceService`] - Scores a post as worth commenting on or not
//! - [`ReplyGenerator`] - Writes the reply text for a post
//! - [`StateRepository`] - Persists quota state and the event log
//! - [`AuditSink`] - Remote session history (create / append / read back)

pub mod audit;
pub mod error;
pub mod repository;
pub mod service;
pub mod source;
pub mod types;

pub use audit::AuditSink;
pub use error::{AuditError, ProviderError, SourceError, StoreError};
pub use repository::StateRepository;
pub use service::{RelevanceService, ReplyGenerator};
pub use source::PostSource;
pub use types::*;
