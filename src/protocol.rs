//! Wire messages exchanged with the research backend.
//!
//! Every message is one JSON object `{"event": <name>, "data": <payload>}`.
//! Inbound names are the contract the session controller depends on:
//!
//! | Event | Payload |
//! |---|---|
//! | `status_update` | `{message}` |
//! | `sub_topics_generated` | `{sub_topics: [{topic, status?}]}` |
//! | `sub_topic_update` | `{index, status}` |
//! | `final_report` | `{report}` |
//! | `research_error` | `{error}` |
//!
//! The only outbound message is `start_research {topic}`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// Inbound
// =============================================================================

/// One planned subtopic as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSubtopic {
    pub topic: String,
    /// Initial status hint; a new plan always starts pending, so it is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PlannedSubtopic {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            status: None,
        }
    }
}

/// Events pushed by the research backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Free-text progress line
    StatusUpdate { message: String },
    /// Subtopic plan for the current session
    SubTopicsGenerated { sub_topics: Vec<PlannedSubtopic> },
    /// Status change for one subtopic, addressed by position
    SubTopicUpdate { index: i64, status: String },
    /// Final report text
    FinalReport { report: String },
    /// Research failed
    ResearchError { error: String },
}

impl ServerEvent {
    /// Create a status update event.
    pub fn status(message: impl Into<String>) -> Self {
        Self::StatusUpdate {
            message: message.into(),
        }
    }

    /// Create a subtopic plan event.
    pub fn planned<I, T>(topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::SubTopicsGenerated {
            sub_topics: topics.into_iter().map(PlannedSubtopic::new).collect(),
        }
    }

    /// Create a subtopic status event.
    pub fn subtopic(index: i64, status: impl Into<String>) -> Self {
        Self::SubTopicUpdate {
            index,
            status: status.into(),
        }
    }

    /// Create a final report event.
    pub fn report(report: impl Into<String>) -> Self {
        Self::FinalReport {
            report: report.into(),
        }
    }

    /// Create a research error event.
    pub fn error(error: impl Into<String>) -> Self {
        Self::ResearchError {
            error: error.into(),
        }
    }

    /// Get the wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StatusUpdate { .. } => "status_update",
            Self::SubTopicsGenerated { .. } => "sub_topics_generated",
            Self::SubTopicUpdate { .. } => "sub_topic_update",
            Self::FinalReport { .. } => "final_report",
            Self::ResearchError { .. } => "research_error",
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// =============================================================================
// Outbound
// =============================================================================

/// Requests sent to the research backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Begin research on a topic
    StartResearch { topic: String },
}

impl ClientRequest {
    /// Create a start request.
    pub fn start_research(topic: impl Into<String>) -> Self {
        Self::StartResearch {
            topic: topic.into(),
        }
    }

    /// Get the wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartResearch { .. } => "start_research",
        }
    }
}

// =============================================================================
// Line Codec
// =============================================================================

/// Decode one line of JSON into an event.
///
/// Blank lines, malformed JSON and unknown event names are protocol errors.
pub fn decode_event(line: &str) -> Result<ServerEvent> {
    let line = line.trim();
    if line.is_empty() {
        return Err(Error::protocol("empty event line"));
    }
    serde_json::from_str(line).map_err(|error| Error::protocol(format!("undecodable event: {}", error)))
}

/// Encode a request as one line of JSON (no trailing newline).
pub fn encode_request(request: &ClientRequest) -> Result<String> {
    Ok(serde_json::to_string(request)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_each_event() {
        assert_eq!(
            decode_event(r#"{"event":"status_update","data":{"message":"Brainstorming..."}}"#).unwrap(),
            ServerEvent::status("Brainstorming...")
        );
        assert_eq!(
            decode_event(r#"{"event":"sub_topic_update","data":{"index":2,"status":"in-progress"}}"#)
                .unwrap(),
            ServerEvent::subtopic(2, "in-progress")
        );
        assert_eq!(
            decode_event(r##"{"event":"final_report","data":{"report":"# T"}}"##).unwrap(),
            ServerEvent::report("# T")
        );
        assert_eq!(
            decode_event(r#"{"event":"research_error","data":{"error":"timeout"}}"#).unwrap(),
            ServerEvent::error("timeout")
        );
    }

    #[test]
    fn test_decode_plan_with_status_hint() {
        let event = decode_event(
            r#"{"event":"sub_topics_generated","data":{"sub_topics":[{"topic":"A","status":"pending"},{"topic":"B"}]}}"#,
        )
        .unwrap();
        match event {
            ServerEvent::SubTopicsGenerated { sub_topics } => {
                assert_eq!(sub_topics.len(), 2);
                assert_eq!(sub_topics[0].status.as_deref(), Some("pending"));
                assert_eq!(sub_topics[1].topic, "B");
                assert_eq!(sub_topics[1].status, None);
            }
            other => panic!("Wrong event type: {:?}", other),
        }
    }

    #[test]
    fn test_decode_negative_index() {
        let event = decode_event(r#"{"event":"sub_topic_update","data":{"index":-1,"status":"complete"}}"#)
            .unwrap();
        assert_eq!(event, ServerEvent::subtopic(-1, "complete"));
    }

    #[test]
    fn test_decode_rejects_unknown_and_malformed() {
        assert!(matches!(
            decode_event(r#"{"event":"heartbeat","data":{}}"#),
            Err(Error::Protocol(_))
        ));
        assert!(matches!(decode_event("not json"), Err(Error::Protocol(_))));
        assert!(matches!(decode_event("   "), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_encode_start_request() {
        let line = encode_request(&ClientRequest::start_research("Ocean currents")).unwrap();
        assert_eq!(line, r#"{"event":"start_research","data":{"topic":"Ocean currents"}}"#);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ServerEvent::planned(["a"]).name(), "sub_topics_generated");
        assert_eq!(ServerEvent::error("x").name(), "research_error");
        assert_eq!(ClientRequest::start_research("t").name(), "start_research");
    }

    #[test]
    fn test_event_json_uses_wire_names() {
        let json = ServerEvent::subtopic(0, "complete").to_json().unwrap();
        assert!(json.contains("\"event\":\"sub_topic_update\""));
        assert_eq!(decode_event(&json).unwrap(), ServerEvent::subtopic(0, "complete"));
    }
}
