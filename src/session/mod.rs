//! Research session state.
//!
//! - [`Session`]: one topic-to-report run, owned by the controller
//! - [`SubtopicRegistry`]: ordered subtopics addressed by position
//! - [`SessionController`]: applies user actions and inbound events,
//!   enforces the phase machine and drives the display adapter

mod controller;
mod proptest;
mod registry;
mod types;

pub use controller::{Anomaly, EventOutcome, SessionController, EMPTY_TOPIC_MESSAGE};
pub use registry::SubtopicRegistry;
pub use types::{
    Phase, Session, SessionId, SessionSnapshot, StatusEntry, SubtopicEntry, SubtopicStatus,
};
