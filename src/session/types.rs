//! Session data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::registry::SubtopicRegistry;

// =============================================================================
// Phase
// =============================================================================

/// Coarse session state.
///
/// ```text
/// Idle --submit--> Planning --planned--> Researching --report--> Complete
///                      \                     |
///                       +------error---------+--> Errored
/// ```
///
/// `submit` always returns to Planning, whatever the current phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Topic accepted, waiting for the subtopic plan
    Planning,
    /// Subtopics known, research in progress
    Researching,
    /// Final report received
    Complete,
    /// Research error received
    Errored,
}

impl Phase {
    /// Whether a subtopic plan may be accepted in this phase.
    pub fn accepts_plan(&self) -> bool {
        matches!(self, Self::Planning | Self::Researching)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Planning => write!(f, "planning"),
            Self::Researching => write!(f, "researching"),
            Self::Complete => write!(f, "complete"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

// =============================================================================
// Subtopic Status
// =============================================================================

/// Progress of one subtopic.
///
/// Moves forward only: `Pending -> InProgress -> Complete | Error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubtopicStatus {
    #[default]
    Pending,
    InProgress,
    Complete,
    Error,
}

impl SubtopicStatus {
    /// Parse the status string used on the wire.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in-progress" => Some(Self::InProgress),
            "complete" => Some(Self::Complete),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// The status string used on the wire.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    /// Whether no further transition is defined.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Complete | Self::Error => 2,
        }
    }

    /// Whether moving to `next` is a defined transition.
    ///
    /// Re-applying the current status is allowed and changes nothing.
    pub fn can_advance_to(&self, next: Self) -> bool {
        *self == next || (!self.is_terminal() && next.rank() > self.rank())
    }
}

impl std::fmt::Display for SubtopicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

// =============================================================================
// Subtopic Entry
// =============================================================================

/// One planned subtopic. `index` is its position and its only key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtopicEntry {
    pub index: usize,
    pub topic: String,
    pub status: SubtopicStatus,
}

impl SubtopicEntry {
    /// Create a pending entry.
    pub fn pending(index: usize, topic: impl Into<String>) -> Self {
        Self {
            index,
            topic: topic.into(),
            status: SubtopicStatus::Pending,
        }
    }
}

// =============================================================================
// Status History
// =============================================================================

/// A status line as received, with arrival time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl StatusEntry {
    /// Record a status line now.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            received_at: Utc::now(),
        }
    }

    /// Truncate the message to `max_len` bytes, ending with "...".
    pub fn with_max_length(mut self, max_len: usize) -> Self {
        if self.message.len() > max_len {
            let mut cut = max_len.saturating_sub(3);
            while !self.message.is_char_boundary(cut) {
                cut -= 1;
            }
            self.message = format!("{}...", &self.message[..cut]);
        }
        self
    }
}

// =============================================================================
// Session
// =============================================================================

/// Identifier attached to each session for logging and snapshots.
///
/// Inbound events carry no session identifier, so this is never used to
/// filter them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a new random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One research run and its UI state.
///
/// Owned by the session controller; everything else sees it read-only.
#[derive(Debug, Clone, Default)]
pub struct Session {
    id: SessionId,
    topic: String,
    pub(crate) phase: Phase,
    pub(crate) subtopics: SubtopicRegistry,
    pub(crate) status_text: String,
    pub(crate) status_history: Vec<StatusEntry>,
    pub(crate) error: Option<String>,
}

impl Session {
    /// An idle session with no topic.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A freshly submitted session in the Planning phase.
    pub fn planning(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            phase: Phase::Planning,
            ..Self::default()
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn subtopics(&self) -> &SubtopicRegistry {
        &self.subtopics
    }

    /// Current free-text status line.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Status lines received so far, oldest first.
    pub fn status_history(&self) -> &[StatusEntry] {
        &self.status_history
    }

    /// Error text from the last research error, if any.
    ///
    /// Validation messages from a blank submit are shown but never stored.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn record_status(&mut self, entry: StatusEntry, limit: usize) {
        self.status_history.push(entry);
        if self.status_history.len() > limit {
            let excess = self.status_history.len() - limit;
            self.status_history.drain(..excess);
        }
    }

    /// Serializable view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            topic: self.topic.clone(),
            phase: self.phase,
            subtopics: self.subtopics.all().to_vec(),
            completed: self.subtopics.count(SubtopicStatus::Complete),
            status_text: self.status_text.clone(),
            error: self.error.clone(),
        }
    }
}

/// Point-in-time copy of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub topic: String,
    pub phase: Phase,
    pub subtopics: Vec<SubtopicEntry>,
    pub completed: usize,
    pub status_text: String,
    pub error: Option<String>,
}
