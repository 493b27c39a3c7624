//! Domain types.

mod analysis;
mod post;
mod record;
mod session;

pub use analysis::*;
pub use post::*;
pub use record::*;
pub use session::*;

/// Truncate a string to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
