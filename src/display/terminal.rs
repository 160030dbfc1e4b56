//! Plain-text display for terminals and logs.

use std::io::Write;

use colored::{ColoredString, Colorize};

use crate::error::{Error, Result};
use crate::render::{Block, InlineText, ReportDocument, SpanStyle};
use crate::session::{SubtopicEntry, SubtopicStatus};

use super::DisplayAdapter;

/// Display adapter that appends a line-oriented rendition to a writer.
///
/// Subtopic rows are remembered so a status patch can reprint one row
/// without redrawing the list. ANSI styling is off unless enabled.
pub struct TerminalDisplay<W: Write> {
    out: W,
    ansi: bool,
    rows: Vec<SubtopicEntry>,
    busy: bool,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            ansi: false,
            rows: Vec::new(),
            busy: false,
        }
    }

    /// Enable or disable ANSI styling.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Subtopic rows as last drawn.
    pub fn rows(&self) -> &[SubtopicEntry] {
        &self.rows
    }

    /// Get the underlying writer back.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn marker(&self, status: SubtopicStatus) -> String {
        let marker = match status {
            SubtopicStatus::Pending => "[ ]",
            SubtopicStatus::InProgress => "[~]",
            SubtopicStatus::Complete => "[x]",
            SubtopicStatus::Error => "[!]",
        };
        if !self.ansi {
            return marker.to_string();
        }
        match status {
            SubtopicStatus::Pending => marker.dimmed(),
            SubtopicStatus::InProgress => marker.yellow(),
            SubtopicStatus::Complete => marker.green(),
            SubtopicStatus::Error => marker.red(),
        }
        .to_string()
    }

    fn write_row(&mut self, entry: &SubtopicEntry) -> Result<()> {
        let marker = self.marker(entry.status);
        writeln!(self.out, "  {} {}. {}", marker, entry.index + 1, entry.topic)
            .map_err(write_failed)?;
        Ok(())
    }

    fn styled(&self, text: &str, style: SpanStyle) -> String {
        if !self.ansi || style.is_plain() {
            return text.to_string();
        }
        let mut styled: ColoredString = text.normal();
        if style.strong {
            styled = styled.bold();
        }
        if style.emphasis {
            styled = styled.italic();
        }
        styled.to_string()
    }

    fn inline(&self, text: &InlineText) -> String {
        text.spans()
            .iter()
            .map(|span| self.styled(&span.text, span.style))
            .collect()
    }

    fn write_block(&mut self, block: &Block) -> Result<()> {
        match block {
            Block::Heading { level, text } => {
                let line = self.inline(text);
                writeln!(self.out, "{}", line).map_err(write_failed)?;
                let underline = match level {
                    1 => Some('='),
                    2 => Some('-'),
                    _ => None,
                };
                if let Some(ch) = underline {
                    let width = text.to_plain().chars().count();
                    writeln!(self.out, "{}", ch.to_string().repeat(width))
                        .map_err(write_failed)?;
                }
            }
            Block::BulletList { items } => {
                for item in items {
                    let line = self.inline(item);
                    writeln!(self.out, "  * {}", line).map_err(write_failed)?;
                }
            }
            Block::Paragraph { text } => {
                let line = self.inline(text);
                writeln!(self.out, "{}", line).map_err(write_failed)?;
            }
        }
        writeln!(self.out).map_err(write_failed)?;
        Ok(())
    }
}

impl<W: Write> DisplayAdapter for TerminalDisplay<W> {
    fn reset_all(&mut self) -> Result<()> {
        self.rows.clear();
        Ok(())
    }

    fn set_status_text(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "status: {}", text).map_err(write_failed)?;
        Ok(())
    }

    fn render_subtopic_list(&mut self, entries: &[SubtopicEntry]) -> Result<()> {
        self.rows = entries.to_vec();
        writeln!(self.out, "subtopics:").map_err(write_failed)?;
        for entry in entries {
            self.write_row(entry)?;
        }
        Ok(())
    }

    fn patch_subtopic_row(&mut self, index: usize, status: SubtopicStatus) -> Result<()> {
        let Some(row) = self.rows.get_mut(index) else {
            return Ok(());
        };
        row.status = status;
        let row = row.clone();
        self.write_row(&row)
    }

    fn show_error(&mut self, text: &str) -> Result<()> {
        let label = if self.ansi {
            "error:".red().bold().to_string()
        } else {
            "error:".to_string()
        };
        writeln!(self.out, "{} {}", label, text).map_err(write_failed)?;
        Ok(())
    }

    fn show_report(&mut self, title: &str, document: &ReportDocument) -> Result<()> {
        let heading = self.styled(title, SpanStyle::STRONG);
        writeln!(self.out).map_err(write_failed)?;
        writeln!(self.out, "== {} ==", heading).map_err(write_failed)?;
        writeln!(self.out).map_err(write_failed)?;
        for block in document {
            self.write_block(block)?;
        }
        self.out.flush().map_err(write_failed)?;
        Ok(())
    }

    fn set_busy(&mut self, busy: bool) -> Result<()> {
        self.busy = busy;
        Ok(())
    }
}

fn write_failed(error: std::io::Error) -> Error {
    Error::display(format!("terminal write failed: {}", error))
}

impl<W: Write> std::fmt::Debug for TerminalDisplay<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalDisplay")
            .field("ansi", &self.ansi)
            .field("rows", &self.rows.len())
            .field("busy", &self.busy)
            .finish()
    }
}
