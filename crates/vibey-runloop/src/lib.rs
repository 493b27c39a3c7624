//! # Vibey RunLoop
//!
//! The engagement control loop and the policies it drives:
//!
//! - [`Pacer`] - randomized, human-like delays behind an injectable [`Sleeper`]
//! - [`EngagementActuator`] - like / retweet / reply through a [`PostSource`](vibey_protocols::PostSource)
//! - [`AuditTrail`] - best-effort remote session log
//! - [`EngagementLoop`] - discovery, filtering, generation, actuation and
//!   failure supervision until the daily goal, the failure threshold or an
//!   interrupt stops it

mod actuator;
mod audit_trail;
mod error;
mod pacing;
mod run_loop;
mod run_loop_processing;
mod shutdown;
mod sleeper;

pub use actuator::{EngageOptions, EngagementAction, EngagementActuator};
pub use audit_trail::AuditTrail;
pub use error::{RunLoopError, RunLoopResult};
pub use pacing::{Pacer, TypingStep};
pub use run_loop::{EngagementLoop, LoopSettings, PostOutcome, RunOutcome, RunReport, RunStats};
pub use shutdown::install_interrupt_handler;
pub use sleeper::{NoopSleeper, RecordingSleeper, Sleeper, TokioSleeper};
