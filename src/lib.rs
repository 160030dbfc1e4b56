//! # research-console
//!
//! Client-side core of a research console: tracks a research session from
//! topic submission through a streamed sequence of progress events to a
//! rendered final report.
//!
//! ## Core Components
//!
//! - **Session**: phase machine, subtopic registry and the controller that
//!   applies user actions and inbound events
//! - **Render**: block and inline formatting of the final report text
//! - **Display**: the adapter seam for presentation, plus terminal and
//!   broadcast implementations
//! - **Reactor**: async loop feeding transport events into the controller
//!
//! ## Example
//!
//! ```rust,ignore
//! use research_console::{RecordingDisplay, ServerEvent, SessionController};
//!
//! let mut controller = SessionController::with_defaults(RecordingDisplay::new(), Vec::new());
//! controller.submit("Ocean currents")?;
//!
//! controller.dispatch(ServerEvent::planned(["Drivers", "Effects"]));
//! controller.dispatch(ServerEvent::subtopic(0, "complete"));
//! controller.dispatch(ServerEvent::report("## Summary\n\n**Done**."));
//! assert!(controller.last_report().is_some());
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod protocol;
pub mod reactor;
pub mod render;
pub mod session;

// Re-exports for convenience
pub use config::ConsoleConfig;
pub use display::{DisplayAdapter, DisplayBridge, DisplayCommand, RecordingDisplay, TerminalDisplay};
pub use error::{Error, Result};
pub use export::{export_report, ExportFormat, ExportOptions, ExportResult};
pub use protocol::{decode_event, encode_request, ClientRequest, PlannedSubtopic, ServerEvent};
pub use reactor::{NullSink, ReactorStats, RequestSink};
pub use render::{render, Block, InlineText, ReportDocument, Span, SpanStyle};
pub use session::{
    Anomaly, EventOutcome, Phase, Session, SessionController, SessionId, SessionSnapshot,
    StatusEntry, SubtopicEntry, SubtopicRegistry, SubtopicStatus,
};
