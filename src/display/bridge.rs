//! Broadcast bridge for display commands.
//!
//! Turns each display request into a [`DisplayCommand`] and sends it on a
//! tokio broadcast channel, so any number of presentation front ends can
//! follow one controller.

use tokio::sync::broadcast;

use crate::config::ConsoleConfig;
use crate::error::Result;
use crate::render::ReportDocument;
use crate::session::{SubtopicEntry, SubtopicStatus};

use super::{DisplayAdapter, DisplayCommand};

/// Display adapter that forwards every request to channel subscribers.
///
/// Sending with no subscribers is not an error; the command is dropped.
pub struct DisplayBridge {
    /// Sender for display commands
    sender: broadcast::Sender<DisplayCommand>,
    /// Channel capacity
    capacity: usize,
}

impl DisplayBridge {
    /// Create a new bridge with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    /// Create a bridge sized by `config.event_channel_capacity`.
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.event_channel_capacity)
    }

    /// Subscribe to display commands.
    pub fn subscribe(&self) -> broadcast::Receiver<DisplayCommand> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Emit a raw command. Returns the number of subscribers reached.
    pub fn emit(&self, command: DisplayCommand) -> usize {
        match self.sender.send(command) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(command)) => {
                tracing::trace!(command = command.type_name(), "no display subscribers");
                0
            }
        }
    }

    fn forward(&mut self, command: DisplayCommand) -> Result<()> {
        self.emit(command);
        Ok(())
    }
}

impl DisplayAdapter for DisplayBridge {
    fn reset_all(&mut self) -> Result<()> {
        self.forward(DisplayCommand::ResetAll)
    }

    fn set_status_text(&mut self, text: &str) -> Result<()> {
        self.forward(DisplayCommand::SetStatusText(text.to_string()))
    }

    fn render_subtopic_list(&mut self, entries: &[SubtopicEntry]) -> Result<()> {
        self.forward(DisplayCommand::RenderSubtopicList(entries.to_vec()))
    }

    fn patch_subtopic_row(&mut self, index: usize, status: SubtopicStatus) -> Result<()> {
        self.forward(DisplayCommand::PatchSubtopicRow { index, status })
    }

    fn show_error(&mut self, text: &str) -> Result<()> {
        self.forward(DisplayCommand::ShowError(text.to_string()))
    }

    fn show_report(&mut self, title: &str, document: &ReportDocument) -> Result<()> {
        self.forward(DisplayCommand::ShowReport {
            title: title.to_string(),
            document: document.clone(),
        })
    }

    fn set_busy(&mut self, busy: bool) -> Result<()> {
        self.forward(DisplayCommand::SetBusy(busy))
    }
}

impl Clone for DisplayBridge {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            capacity: self.capacity,
        }
    }
}

impl std::fmt::Debug for DisplayBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayBridge")
            .field("capacity", &self.capacity)
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}
