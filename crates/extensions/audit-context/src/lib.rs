//! Remote context service client for Vibey audit sessions.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Call | Request | Response |
//! |---|---|---|
//! | create session | `POST /contexts` | `{"id": "ctx_..."}` |
//! | append event | `POST /contexts/{id}/messages` with the event | any 2xx |
//! | read history | `GET /contexts/{id}` | `{"data": [event, ...]}` |

mod client;

pub use client::ContextAuditSink;
