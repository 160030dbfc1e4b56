//! Event loop between the transport and the session controller.
//!
//! The transport is the only asynchronous boundary. The loop waits for the
//! next inbound event, hands it to the controller and waits again; handlers
//! never overlap and events are applied in arrival order.
//!
//! ```text
//! transport          reactor                  controller        display
//! +--------+  event  +---------+  dispatch()  +-----------+    +---------+
//! |stream  |-------->|run()    |------------->|Session    |--->|Adapter  |
//! +--------+         +---------+              +-----------+    +---------+
//!      ^                                            |
//!      +---------------- RequestSink ---------------+
//! ```

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::display::DisplayAdapter;
use crate::error::{Error, Result};
use crate::protocol::{self, ClientRequest, ServerEvent};
use crate::session::{Phase, SessionController};

// =============================================================================
// Outbound
// =============================================================================

/// Destination for requests to the research backend.
pub trait RequestSink {
    /// Deliver one request.
    fn send(&mut self, request: ClientRequest) -> Result<()>;
}

impl RequestSink for mpsc::UnboundedSender<ClientRequest> {
    fn send(&mut self, request: ClientRequest) -> Result<()> {
        mpsc::UnboundedSender::send(self, request)
            .map_err(|_| Error::transport("request channel closed"))
    }
}

impl RequestSink for Vec<ClientRequest> {
    fn send(&mut self, request: ClientRequest) -> Result<()> {
        self.push(request);
        Ok(())
    }
}

/// Sink that discards every request, for replaying recorded sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RequestSink for NullSink {
    fn send(&mut self, request: ClientRequest) -> Result<()> {
        debug!(request = request.name(), "request discarded");
        Ok(())
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Counters for one reactor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactorStats {
    /// Events handed to the controller
    pub events: u64,
    /// Events that changed state
    pub applied: u64,
    /// Events dropped as anomalies
    pub dropped: u64,
    /// Lines that could not be decoded
    pub undecodable: u64,
    /// Phase when the input ended
    pub phase: Phase,
}

impl ReactorStats {
    fn new() -> Self {
        Self {
            events: 0,
            applied: 0,
            dropped: 0,
            undecodable: 0,
            phase: Phase::Idle,
        }
    }

    fn dispatch<D, S>(&mut self, controller: &mut SessionController<D, S>, event: ServerEvent)
    where
        D: DisplayAdapter,
        S: RequestSink,
    {
        self.events += 1;
        if controller.dispatch(event).is_applied() {
            self.applied += 1;
        } else {
            self.dropped += 1;
        }
    }

    fn finish<D, S>(mut self, controller: &SessionController<D, S>) -> Self
    where
        D: DisplayAdapter,
        S: RequestSink,
    {
        self.phase = controller.phase();
        debug!(
            events = self.events,
            applied = self.applied,
            dropped = self.dropped,
            undecodable = self.undecodable,
            phase = %self.phase,
            "event stream ended"
        );
        self
    }
}

// =============================================================================
// Loops
// =============================================================================

/// Apply every event from `events` until the stream ends.
pub async fn run<D, S, E>(controller: &mut SessionController<D, S>, events: E) -> ReactorStats
where
    D: DisplayAdapter,
    S: RequestSink,
    E: Stream<Item = ServerEvent>,
{
    let mut stats = ReactorStats::new();
    futures::pin_mut!(events);

    while let Some(event) = events.next().await {
        stats.dispatch(controller, event);
    }

    stats.finish(controller)
}

/// Apply every event received on `events` until all senders are dropped.
pub async fn run_channel<D, S>(
    controller: &mut SessionController<D, S>,
    mut events: mpsc::Receiver<ServerEvent>,
) -> ReactorStats
where
    D: DisplayAdapter,
    S: RequestSink,
{
    let mut stats = ReactorStats::new();

    while let Some(event) = events.recv().await {
        stats.dispatch(controller, event);
    }

    stats.finish(controller)
}

/// Decode and apply one JSON event per line from `reader`.
///
/// Blank lines are skipped. Lines that are not UTF-8 or fail to decode are
/// logged and dropped; only a read error ends the run early.
pub async fn run_lines<D, S, R>(
    controller: &mut SessionController<D, S>,
    mut reader: R,
) -> Result<ReactorStats>
where
    D: DisplayAdapter,
    S: RequestSink,
    R: AsyncBufRead + Unpin,
{
    let mut stats = ReactorStats::new();
    let mut buf = Vec::new();
    let mut line_no = 0u64;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(error) => {
                stats.undecodable += 1;
                warn!(line = line_no, %error, "skipping event line that is not UTF-8");
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match protocol::decode_event(line) {
            Ok(event) => stats.dispatch(controller, event),
            Err(error) => {
                stats.undecodable += 1;
                warn!(line = line_no, %error, "skipping undecodable event line");
            }
        }
    }

    Ok(stats.finish(controller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingDisplay;
    use crate::session::SubtopicStatus;

    fn controller() -> SessionController<RecordingDisplay, Vec<ClientRequest>> {
        SessionController::with_defaults(RecordingDisplay::new(), Vec::new())
    }

    #[tokio::test]
    async fn test_run_stream() {
        let mut controller = controller();
        controller.submit("Ocean currents").unwrap();

        let events = futures::stream::iter(vec![
            ServerEvent::status("Brainstorming..."),
            ServerEvent::planned(["a", "b"]),
            ServerEvent::subtopic(0, "complete"),
            ServerEvent::subtopic(5, "complete"),
            ServerEvent::report("## Summary\n\nDone."),
        ]);
        let stats = run(&mut controller, events).await;

        assert_eq!(stats.events, 5);
        assert_eq!(stats.applied, 4);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.phase, Phase::Complete);
    }

    #[tokio::test]
    async fn test_run_channel() {
        let mut controller = controller();
        controller.submit("Tides").unwrap();

        let (tx, rx) = mpsc::channel(8);
        tx.send(ServerEvent::planned(["x"])).await.unwrap();
        tx.send(ServerEvent::subtopic(0, "in-progress")).await.unwrap();
        tx.send(ServerEvent::error("timeout")).await.unwrap();
        drop(tx);

        let stats = run_channel(&mut controller, rx).await;
        assert_eq!(stats.applied, 3);
        assert_eq!(stats.phase, Phase::Errored);
        assert_eq!(
            controller.session().subtopics().get(0).map(|e| e.status),
            Some(SubtopicStatus::InProgress)
        );
    }

    #[tokio::test]
    async fn test_run_lines_skips_bad_lines() {
        let mut controller = controller();
        controller.submit("Tides").unwrap();

        let input = concat!(
            r#"{"event":"status_update","data":{"message":"hi"}}"#,
            "\n\n",
            "garbage\n",
            r#"{"event":"heartbeat","data":{}}"#,
            "\n",
            r#"{"event":"final_report","data":{"report":"Done."}}"#,
            "\n",
        );
        let stats = run_lines(&mut controller, input.as_bytes()).await.unwrap();

        assert_eq!(stats.events, 2);
        assert_eq!(stats.undecodable, 2);
        assert_eq!(stats.phase, Phase::Complete);
        assert_eq!(controller.session().status_text(), "hi");
    }

    #[tokio::test]
    async fn test_run_lines_skips_invalid_utf8() {
        let mut controller = controller();
        controller.submit("Tides").unwrap();

        let mut input = Vec::new();
        input.extend_from_slice(br#"{"event":"status_update","data":{"message":"hi"}}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"event":"final_report","data":{"report":"Done."}}"#);

        let stats = run_lines(&mut controller, input.as_slice()).await.unwrap();

        assert_eq!(stats.events, 2);
        assert_eq!(stats.undecodable, 1);
        assert_eq!(stats.phase, Phase::Complete);
        assert!(controller.last_report().is_some());
    }

    #[tokio::test]
    async fn test_unbounded_sender_sink() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller = SessionController::with_defaults(RecordingDisplay::new(), tx);
        controller.submit("Tides").unwrap();

        assert_eq!(rx.recv().await, Some(ClientRequest::start_research("Tides")));
    }

    #[test]
    fn test_closed_sender_sink() {
        let (mut tx, rx) = mpsc::unbounded_channel::<ClientRequest>();
        drop(rx);
        let err = RequestSink::send(&mut tx, ClientRequest::start_research("x")).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn test_null_sink() {
        let mut sink = NullSink;
        assert!(sink.send(ClientRequest::start_research("x")).is_ok());
    }
}
