//! Error types for the Vibey protocol layer.

mod audit;
mod provider;
mod source;
mod store;

pub use audit::*;
pub use provider::*;
pub use source::*;
pub use store::*;
