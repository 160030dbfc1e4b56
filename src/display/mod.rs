//! Display adapters.
//!
//! The session controller never touches a presentation surface directly. It
//! requests changes through [`DisplayAdapter`], the only seam between the
//! core and a concrete UI technology.
//!
//! ## Adapters
//!
//! - [`RecordingDisplay`]: keeps every request as a [`DisplayCommand`]
//! - [`DisplayBridge`]: broadcasts commands to channel subscribers
//! - [`TerminalDisplay`]: writes a plain-text rendition to any `io::Write`
//!
//! A subscriber on the far side of a bridge can replay each command onto
//! its own adapter with [`DisplayCommand::apply`].

mod bridge;
mod terminal;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::ReportDocument;
use crate::session::{SubtopicEntry, SubtopicStatus};

pub use bridge::DisplayBridge;
pub use terminal::TerminalDisplay;

/// Presentation requests issued by the session controller.
///
/// Calls are synchronous and always come from the controller. An error is
/// logged by the caller and never undoes the state change that caused it.
pub trait DisplayAdapter {
    /// Clear every transient panel: error text, subtopic list, report.
    fn reset_all(&mut self) -> Result<()>;

    /// Replace the status line.
    fn set_status_text(&mut self, text: &str) -> Result<()>;

    /// Redraw the whole subtopic panel.
    fn render_subtopic_list(&mut self, entries: &[SubtopicEntry]) -> Result<()>;

    /// Update one subtopic row in place.
    fn patch_subtopic_row(&mut self, index: usize, status: SubtopicStatus) -> Result<()>;

    /// Show user-visible error text.
    fn show_error(&mut self, text: &str) -> Result<()>;

    /// Show a rendered report under `title`.
    fn show_report(&mut self, title: &str, document: &ReportDocument) -> Result<()>;

    /// Toggle the busy indicator.
    fn set_busy(&mut self, busy: bool) -> Result<()>;
}

impl<D: DisplayAdapter + ?Sized> DisplayAdapter for &mut D {
    fn reset_all(&mut self) -> Result<()> {
        (**self).reset_all()
    }

    fn set_status_text(&mut self, text: &str) -> Result<()> {
        (**self).set_status_text(text)
    }

    fn render_subtopic_list(&mut self, entries: &[SubtopicEntry]) -> Result<()> {
        (**self).render_subtopic_list(entries)
    }

    fn patch_subtopic_row(&mut self, index: usize, status: SubtopicStatus) -> Result<()> {
        (**self).patch_subtopic_row(index, status)
    }

    fn show_error(&mut self, text: &str) -> Result<()> {
        (**self).show_error(text)
    }

    fn show_report(&mut self, title: &str, document: &ReportDocument) -> Result<()> {
        (**self).show_report(title, document)
    }

    fn set_busy(&mut self, busy: bool) -> Result<()> {
        (**self).set_busy(busy)
    }
}

impl<D: DisplayAdapter + ?Sized> DisplayAdapter for Box<D> {
    fn reset_all(&mut self) -> Result<()> {
        (**self).reset_all()
    }

    fn set_status_text(&mut self, text: &str) -> Result<()> {
        (**self).set_status_text(text)
    }

    fn render_subtopic_list(&mut self, entries: &[SubtopicEntry]) -> Result<()> {
        (**self).render_subtopic_list(entries)
    }

    fn patch_subtopic_row(&mut self, index: usize, status: SubtopicStatus) -> Result<()> {
        (**self).patch_subtopic_row(index, status)
    }

    fn show_error(&mut self, text: &str) -> Result<()> {
        (**self).show_error(text)
    }

    fn show_report(&mut self, title: &str, document: &ReportDocument) -> Result<()> {
        (**self).show_report(title, document)
    }

    fn set_busy(&mut self, busy: bool) -> Result<()> {
        (**self).set_busy(busy)
    }
}

// =============================================================================
// Display Commands
// =============================================================================

/// A display request as data.
///
/// Serialized as `{"type": <name>, "data": <payload>}` for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DisplayCommand {
    ResetAll,
    SetStatusText(String),
    RenderSubtopicList(Vec<SubtopicEntry>),
    PatchSubtopicRow {
        index: usize,
        status: SubtopicStatus,
    },
    ShowError(String),
    ShowReport {
        title: String,
        document: ReportDocument,
    },
    SetBusy(bool),
}

impl DisplayCommand {
    /// Perform this request on `display`.
    pub fn apply<D: DisplayAdapter + ?Sized>(&self, display: &mut D) -> Result<()> {
        match self {
            Self::ResetAll => display.reset_all(),
            Self::SetStatusText(text) => display.set_status_text(text),
            Self::RenderSubtopicList(entries) => display.render_subtopic_list(entries),
            Self::PatchSubtopicRow { index, status } => display.patch_subtopic_row(*index, *status),
            Self::ShowError(text) => display.show_error(text),
            Self::ShowReport { title, document } => display.show_report(title, document),
            Self::SetBusy(busy) => display.set_busy(*busy),
        }
    }

    /// Get the command type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ResetAll => "reset_all",
            Self::SetStatusText(_) => "set_status_text",
            Self::RenderSubtopicList(_) => "render_subtopic_list",
            Self::PatchSubtopicRow { .. } => "patch_subtopic_row",
            Self::ShowError(_) => "show_error",
            Self::ShowReport { .. } => "show_report",
            Self::SetBusy(_) => "set_busy",
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// Recording Display
// =============================================================================

/// Adapter that stores every request in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    commands: Vec<DisplayCommand>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far.
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Drain the recorded requests.
    pub fn take(&mut self) -> Vec<DisplayCommand> {
        std::mem::take(&mut self.commands)
    }

    fn record(&mut self, command: DisplayCommand) -> Result<()> {
        self.commands.push(command);
        Ok(())
    }
}

impl DisplayAdapter for RecordingDisplay {
    fn reset_all(&mut self) -> Result<()> {
        self.record(DisplayCommand::ResetAll)
    }

    fn set_status_text(&mut self, text: &str) -> Result<()> {
        self.record(DisplayCommand::SetStatusText(text.to_string()))
    }

    fn render_subtopic_list(&mut self, entries: &[SubtopicEntry]) -> Result<()> {
        self.record(DisplayCommand::RenderSubtopicList(entries.to_vec()))
    }

    fn patch_subtopic_row(&mut self, index: usize, status: SubtopicStatus) -> Result<()> {
        self.record(DisplayCommand::PatchSubtopicRow { index, status })
    }

    fn show_error(&mut self, text: &str) -> Result<()> {
        self.record(DisplayCommand::ShowError(text.to_string()))
    }

    fn show_report(&mut self, title: &str, document: &ReportDocument) -> Result<()> {
        self.record(DisplayCommand::ShowReport {
            title: title.to_string(),
            document: document.clone(),
        })
    }

    fn set_busy(&mut self, busy: bool) -> Result<()> {
        self.record(DisplayCommand::SetBusy(busy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;

    #[test]
    fn test_recording_display() {
        let mut display = RecordingDisplay::new();
        display.reset_all().unwrap();
        display.set_busy(true).unwrap();
        display.patch_subtopic_row(1, SubtopicStatus::Complete).unwrap();

        assert_eq!(
            display.commands(),
            &[
                DisplayCommand::ResetAll,
                DisplayCommand::SetBusy(true),
                DisplayCommand::PatchSubtopicRow {
                    index: 1,
                    status: SubtopicStatus::Complete,
                },
            ]
        );
        assert_eq!(display.take().len(), 3);
        assert!(display.commands().is_empty());
    }

    #[test]
    fn test_command_apply_replays() {
        let commands = vec![
            DisplayCommand::SetStatusText("Researching".to_string()),
            DisplayCommand::ShowReport {
                title: "Report on: X".to_string(),
                document: render("# X"),
            },
        ];

        let mut display = RecordingDisplay::new();
        for command in &commands {
            command.apply(&mut display).unwrap();
        }
        assert_eq!(display.commands(), commands.as_slice());
    }

    #[test]
    fn test_command_serialization() {
        let json = DisplayCommand::ResetAll.to_json().unwrap();
        assert_eq!(json, r#"{"type":"reset_all"}"#);

        let command = DisplayCommand::PatchSubtopicRow {
            index: 0,
            status: SubtopicStatus::InProgress,
        };
        let json = command.to_json().unwrap();
        assert!(json.contains("in-progress"));
        assert_eq!(DisplayCommand::from_json(&json).unwrap(), command);
    }

    #[test]
    fn test_command_type_name() {
        assert_eq!(DisplayCommand::SetBusy(false).type_name(), "set_busy");
        assert_eq!(DisplayCommand::ShowError("x".into()).type_name(), "show_error");
    }

    #[test]
    fn test_adapter_through_mut_ref_and_box() {
        fn report_failure<D: DisplayAdapter>(mut display: D) {
            display.show_error("oops").unwrap();
        }

        let mut inner = RecordingDisplay::new();
        report_failure(&mut inner);
        report_failure(Box::new(RecordingDisplay::new()) as Box<dyn DisplayAdapter>);
        assert_eq!(inner.commands(), &[DisplayCommand::ShowError("oops".into())]);
    }
}
