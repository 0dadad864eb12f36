//! # Shared Types Crate
//!
//! Cross-crate types for the AgriPortal registry: identifiers, timestamps,
//! actors, and sessions.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary is
//!   defined here, once.
//! - **No hidden clocks**: subsystems take time through an injected source;
//!   the one free function here exists for the codec and for defaults.

pub mod actor;
pub mod session;
pub mod time;

pub use actor::ActorId;
pub use session::{Session, SessionToken};
pub use time::{current_timestamp, Timestamp};
