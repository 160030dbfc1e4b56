//! Session controller: the only writer of session state.
//!
//! Each handler runs to completion before the next one starts. Malformed or
//! out-of-order events never fail a handler; they are logged and dropped,
//! leaving the view stale at worst. A new [`SessionController::submit`]
//! always resets everything.

use tracing::{debug, info, warn};

use crate::config::ConsoleConfig;
use crate::display::DisplayAdapter;
use crate::error::{Error, Result};
use crate::protocol::{ClientRequest, PlannedSubtopic, ServerEvent};
use crate::reactor::RequestSink;
use crate::render::{self, ReportDocument};

use super::registry::SubtopicRegistry;
use super::types::{Phase, Session, SessionSnapshot, StatusEntry, SubtopicStatus};

/// Message shown when submit is called with a blank topic.
pub const EMPTY_TOPIC_MESSAGE: &str = "Please enter a research topic.";

// =============================================================================
// Outcomes
// =============================================================================

/// Why an inbound event was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Subtopic index outside the current registry
    IndexOutOfRange { index: i64, len: usize },
    /// Status string not in the wire vocabulary
    UnknownStatus(String),
    /// Status would move a subtopic backwards or out of a terminal state
    BackwardTransition {
        index: usize,
        from: SubtopicStatus,
        to: SubtopicStatus,
    },
    /// Subtopic plan arrived outside Planning/Researching
    UnexpectedPlan { phase: Phase },
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "subtopic index {} out of range for {} entries", index, len)
            }
            Self::UnknownStatus(status) => write!(f, "unknown subtopic status '{}'", status),
            Self::BackwardTransition { index, from, to } => {
                write!(f, "subtopic {} cannot move from {} to {}", index, from, to)
            }
            Self::UnexpectedPlan { phase } => {
                write!(f, "subtopic plan received while {}", phase)
            }
        }
    }
}

/// Result of handling one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// State changed (or was already in the requested state)
    Applied,
    /// Event ignored; state untouched
    Dropped(Anomaly),
}

impl EventOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// The anomaly, if the event was dropped.
    pub fn anomaly(&self) -> Option<&Anomaly> {
        match self {
            Self::Applied => None,
            Self::Dropped(anomaly) => Some(anomaly),
        }
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Owns the session, applies events to it and drives the display.
pub struct SessionController<D, S> {
    session: Session,
    display: D,
    requests: S,
    config: ConsoleConfig,
    last_report: Option<ReportDocument>,
}

impl<D: DisplayAdapter, S: RequestSink> SessionController<D, S> {
    /// Create an idle controller.
    pub fn new(display: D, requests: S, config: ConsoleConfig) -> Self {
        Self {
            session: Session::idle(),
            display,
            requests,
            config,
            last_report: None,
        }
    }

    /// Create with default configuration.
    pub fn with_defaults(display: D, requests: S) -> Self {
        Self::new(display, requests, ConsoleConfig::default())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn requests(&self) -> &S {
        &self.requests
    }

    /// The most recent report rendered in this session.
    pub fn last_report(&self) -> Option<&ReportDocument> {
        self.last_report.as_ref()
    }

    /// Title for the current session's report.
    pub fn report_title(&self) -> String {
        self.config.report_title(self.session.topic())
    }

    /// Take the display and request sink back.
    pub fn into_parts(self) -> (D, S) {
        (self.display, self.requests)
    }

    // =========================================================================
    // User Actions
    // =========================================================================

    /// Start a new session for `topic`.
    ///
    /// A blank topic is rejected before anything else happens: the message
    /// is shown, the phase is unchanged and nothing is sent. The message is
    /// display-only; [`Session::error`] keeps the last research error.
    /// Otherwise the previous session is discarded whatever its phase.
    pub fn submit(&mut self, topic: &str) -> Result<()> {
        let topic = topic.trim();
        if topic.is_empty() {
            debug!("rejected blank topic");
            self.update_display("show_error", |d| d.show_error(EMPTY_TOPIC_MESSAGE));
            return Err(Error::validation(EMPTY_TOPIC_MESSAGE));
        }

        self.session = Session::planning(topic);
        self.last_report = None;
        info!(session_id = %self.session.id(), topic, "research submitted");

        self.update_display("reset_all", |d| d.reset_all());
        self.update_display("set_busy", |d| d.set_busy(true));

        if let Err(error) = self.requests.send(ClientRequest::start_research(topic)) {
            warn!(session_id = %self.session.id(), %error, "start request not delivered");
            self.fail(error.to_string());
            return Err(error);
        }

        Ok(())
    }

    /// Return to Idle without starting a new session.
    pub fn reset(&mut self) {
        self.session = Session::idle();
        self.last_report = None;
        debug!(session_id = %self.session.id(), "session reset");

        self.update_display("reset_all", |d| d.reset_all());
        self.update_display("set_busy", |d| d.set_busy(false));
    }

    // =========================================================================
    // Inbound Events
    // =========================================================================

    /// Apply one inbound event.
    pub fn dispatch(&mut self, event: ServerEvent) -> EventOutcome {
        match event {
            ServerEvent::StatusUpdate { message } => {
                self.on_status_message(&message);
                EventOutcome::Applied
            }
            ServerEvent::SubTopicsGenerated { sub_topics } => self.on_subtopics_planned(
                sub_topics.into_iter().map(|PlannedSubtopic { topic, .. }| topic),
            ),
            ServerEvent::SubTopicUpdate { index, status } => {
                self.on_subtopic_status(index, &status)
            }
            ServerEvent::FinalReport { report } => {
                self.on_final_report(&report);
                EventOutcome::Applied
            }
            ServerEvent::ResearchError { error } => {
                self.on_error(&error);
                EventOutcome::Applied
            }
        }
    }

    /// Replace the status line. Any text is accepted; the phase is untouched.
    pub fn on_status_message(&mut self, text: &str) {
        debug!(session_id = %self.session.id(), message = text, "status update");
        self.session.status_text = text.to_string();
        self.session.record_status(
            StatusEntry::new(text).with_max_length(self.config.status_preview_length),
            self.config.status_history_limit,
        );
        self.update_display("set_status_text", |d| d.set_status_text(text));
    }

    /// Install a fresh subtopic plan, all entries pending.
    ///
    /// Accepted only while Planning or Researching. A second plan in the same
    /// session replaces the first entirely.
    pub fn on_subtopics_planned<I, T>(&mut self, topics: I) -> EventOutcome
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let phase = self.session.phase;
        if !phase.accepts_plan() {
            return self.drop_event(Anomaly::UnexpectedPlan { phase });
        }

        self.session.subtopics = SubtopicRegistry::from_topics(topics);
        self.session.phase = Phase::Researching;
        debug!(
            session_id = %self.session.id(),
            count = self.session.subtopics.len(),
            "subtopics planned"
        );

        let entries = self.session.subtopics.all().to_vec();
        self.update_display("render_subtopic_list", |d| d.render_subtopic_list(&entries));
        EventOutcome::Applied
    }

    /// Patch one subtopic's status by index.
    ///
    /// Out-of-range indices, unknown status strings and backward moves are
    /// dropped. Only the affected row is redrawn.
    pub fn on_subtopic_status(&mut self, index: i64, status: &str) -> EventOutcome {
        let Some(status) = SubtopicStatus::from_wire(status) else {
            return self.drop_event(Anomaly::UnknownStatus(status.to_string()));
        };

        let len = self.session.subtopics.len();
        let current = usize::try_from(index)
            .ok()
            .and_then(|i| self.session.subtopics.get(i).map(|entry| (i, entry.status)));
        let Some((position, from)) = current else {
            return self.drop_event(Anomaly::IndexOutOfRange { index, len });
        };

        if !from.can_advance_to(status) {
            return self.drop_event(Anomaly::BackwardTransition {
                index: position,
                from,
                to: status,
            });
        }
        if from == status {
            return EventOutcome::Applied;
        }

        self.session.subtopics.set_status(position, status);
        debug!(session_id = %self.session.id(), index = position, %status, "subtopic status");
        self.update_display("patch_subtopic_row", |d| d.patch_subtopic_row(position, status));
        EventOutcome::Applied
    }

    /// Render and show the final report; the session is Complete.
    ///
    /// Subtopic statuses are not consulted: some may still be pending.
    pub fn on_final_report(&mut self, report: &str) {
        self.session.phase = Phase::Complete;
        let document = render::render(report);
        let title = self.report_title();
        info!(
            session_id = %self.session.id(),
            blocks = document.len(),
            completed = self.session.subtopics.count(SubtopicStatus::Complete),
            total = self.session.subtopics.len(),
            "final report received"
        );

        self.update_display("show_report", |d| d.show_report(&title, &document));
        self.update_display("set_busy", |d| d.set_busy(false));
        self.last_report = Some(document);
    }

    /// Show a research error. Earlier panels stay as they are.
    pub fn on_error(&mut self, message: &str) {
        info!(session_id = %self.session.id(), phase = %self.session.phase, error = message, "research error");
        self.fail(message.to_string());
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn fail(&mut self, message: String) {
        self.session.phase = Phase::Errored;
        self.update_display("show_error", |d| d.show_error(&message));
        self.update_display("set_busy", |d| d.set_busy(false));
        self.session.error = Some(message);
    }

    fn drop_event(&self, anomaly: Anomaly) -> EventOutcome {
        warn!(session_id = %self.session.id(), phase = %self.session.phase, "dropped event: {}", anomaly);
        EventOutcome::Dropped(anomaly)
    }

    fn update_display<F>(&mut self, operation: &'static str, update: F)
    where
        F: FnOnce(&mut D) -> Result<()>,
    {
        if let Err(error) = update(&mut self.display) {
            warn!(session_id = %self.session.id(), operation, %error, "display update failed");
        }
    }
}

impl<D, S> std::fmt::Debug for SessionController<D, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("session", &self.session)
            .field("config", &self.config)
            .field("has_report", &self.last_report.is_some())
            .finish()
    }
}
