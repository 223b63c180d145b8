//! Result type for extraction output.

use serde::{Deserialize, Serialize};

use crate::options::ExtractMode;

/// Result of extracting from one HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResult {
    /// Extracted entries in output order: one per text node (text mode) or
    /// per referencing element (link mode), after post-processing.
    pub lines: Vec<String>,

    /// Mode that produced `lines`.
    pub mode: ExtractMode,

    /// Number of nodes the selector matched (1 for the whole document).
    /// Always 0 in link mode.
    pub matched: usize,
}

impl ExtractResult {
    /// Lines joined with `\n`, without a trailing separator.
    #[must_use]
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }
}
