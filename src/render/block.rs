//! Block classification for report text.
//!
//! The report is split on blank lines and each raw block is classified by its
//! prefix, first match wins:
//!
//! | Prefix | Block |
//! |---|---|
//! | `### ` | heading, level 3 |
//! | `## ` | heading, level 2 |
//! | `# ` | heading, level 1 |
//! | `- ` (first line) | bullet list, one item per line |
//! | anything else | paragraph |
//!
//! This is deliberately not a Markdown parser.

use serde::{Deserialize, Serialize};

use super::inline::{self, InlineText};

/// Separator between raw blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

const HEADING_PREFIXES: [(&str, u8); 3] = [("### ", 3), ("## ", 2), ("# ", 1)];
const BULLET_PREFIX: &str = "- ";

/// One structurally classified unit of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Heading, `level` in `1..=3`
    Heading { level: u8, text: InlineText },
    /// Bullet list with one item per source line
    BulletList { items: Vec<InlineText> },
    /// Anything else
    Paragraph { text: InlineText },
}

impl Block {
    /// Classify one raw block and inline-format its payload.
    pub fn classify(raw: &str) -> Self {
        for (prefix, level) in HEADING_PREFIXES {
            if let Some(rest) = raw.strip_prefix(prefix) {
                return Self::Heading {
                    level,
                    text: inline::format(rest),
                };
            }
        }

        if raw.starts_with(BULLET_PREFIX) {
            let items = raw
                .split('\n')
                .map(|line| inline::format(line.strip_prefix(BULLET_PREFIX).unwrap_or(line)))
                .collect();
            return Self::BulletList { items };
        }

        Self::Paragraph {
            text: inline::format(raw),
        }
    }
}

/// A rendered report: blocks in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportDocument {
    blocks: Vec<Block>,
}

impl ReportDocument {
    /// Wrap already classified blocks.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// The blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over the blocks.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }
}

impl<'a> IntoIterator for &'a ReportDocument {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Render report text into a document.
///
/// Leading, trailing and repeated separators yield empty paragraphs; nothing
/// is trimmed.
pub fn render(text: &str) -> ReportDocument {
    ReportDocument::from_blocks(text.split(BLOCK_SEPARATOR).map(Block::classify).collect())
}
