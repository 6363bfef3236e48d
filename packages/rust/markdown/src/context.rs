//! Header-delimited sections and their content score.

use std::path::PathBuf;

use mxdocs_shared::WEAK_CONTENT_THRESHOLD;

/// One logical section of a page, opened by a header that received a separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Page the context belongs to.
    pub file: PathBuf,
    /// Index of the context's separator line in the final output.
    pub line_index: usize,
    /// Raw lines of the section, header first.
    pub lines: Vec<String>,
}

impl Context {
    pub fn new(file: impl Into<PathBuf>, line_index: usize) -> Self {
        Self {
            file: file.into(),
            line_index,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Total whitespace-delimited tokens across every line.
    ///
    /// Markdown syntax and fenced code count like prose.
    pub fn measure_content(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.split_whitespace().count())
            .sum()
    }

    pub fn is_weak(&self) -> bool {
        self.measure_content() < WEAK_CONTENT_THRESHOLD
    }
}
