//! Report export helpers.
//!
//! A thin binary wrapper calls [`export_report`] once a session completes to
//! keep a copy of the rendered report outside the display surface.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::render::{report_page, Block, InlineText, ReportDocument, BLOCK_SEPARATOR};

/// Supported report export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Standalone HTML page with all text escaped
    #[default]
    Html,
    /// Markdown re-serialized from the rendered blocks
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
        }
    }
}

/// Options for report export.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Written only when set; the artifact is always returned.
    pub output: Option<PathBuf>,
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            output: None,
        }
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }
}

/// Result from report export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub format: ExportFormat,
    pub artifact: String,
    pub output_path: Option<PathBuf>,
}

/// Serialize a rendered report and optionally write it to disk.
pub fn export_report(
    title: &str,
    document: &ReportDocument,
    options: &ExportOptions,
) -> Result<ExportResult> {
    let artifact = match options.format {
        ExportFormat::Html => report_page(title, document),
        ExportFormat::Markdown => document_to_markdown(title, document),
    };

    let output_path = match &options.output {
        Some(path) => {
            write_artifact(path, &artifact)?;
            info!(path = %path.display(), format = options.format.extension(), "report exported");
            Some(path.clone())
        }
        None => None,
    };

    Ok(ExportResult {
        format: options.format,
        artifact,
        output_path,
    })
}

/// Suggest a default output path for a topic and format.
pub fn suggested_output_path(topic: &str, format: ExportFormat) -> PathBuf {
    let slug = topic
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    let stem = if slug.is_empty() { "report".to_string() } else { slug };
    PathBuf::from(format!("{}.{}", stem, format.extension()))
}

fn write_artifact(path: &Path, artifact: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|error| {
            Error::Config(format!(
                "failed to create output directory '{}': {}",
                parent.display(),
                error
            ))
        })?;
    }

    fs::write(path, artifact).map_err(|error| {
        Error::Config(format!(
            "failed to write report to '{}': {}",
            path.display(),
            error
        ))
    })
}

// =============================================================================
// Markdown
// =============================================================================

/// Markdown rendition: the title as a level-1 heading, then each block.
pub fn document_to_markdown(title: &str, document: &ReportDocument) -> String {
    let mut blocks = vec![format!("# {}", title)];
    blocks.extend(document.iter().map(block_to_markdown));
    let mut markdown = blocks.join(BLOCK_SEPARATOR);
    markdown.push('\n');
    markdown
}

fn block_to_markdown(block: &Block) -> String {
    match block {
        Block::Heading { level, text } => {
            format!("{} {}", "#".repeat(usize::from(*level)), inline_to_markdown(text))
        }
        Block::BulletList { items } => items
            .iter()
            .map(|item| format!("- {}", inline_to_markdown(item)))
            .collect::<Vec<_>>()
            .join("\n"),
        Block::Paragraph { text } => inline_to_markdown(text),
    }
}

fn inline_to_markdown(text: &InlineText) -> String {
    text.spans()
        .iter()
        .map(|span| {
            let marker = match (span.style.strong, span.style.emphasis) {
                (true, true) => "***",
                (true, false) => "**",
                (false, true) => "*",
                (false, false) => "",
            };
            format!("{marker}{}{marker}", span.text)
        })
        .collect()
}
