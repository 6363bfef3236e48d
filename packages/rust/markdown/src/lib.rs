//! Context segmentation for documentation pages.
//!
//! [`segment`] walks a page line by line, inserts a separator marker above
//! every header that opens a new context, strips separators left by earlier
//! runs, and collapses duplicate blank lines. Boundaries are header-triggered
//! only: `---` rules never open or close a context.
//!
//! The engine does no I/O. Callers read the page, call [`segment`], and write
//! [`SegmentedDocument::text`] back.

pub mod classify;
pub mod cleanup;
pub mod context;

use std::path::{Path, PathBuf};

use mxdocs_shared::Marker;
use tracing::{debug, instrument};

pub use classify::{LineKind, classify, is_explicit_marker, is_fence, is_header, is_rule};
pub use cleanup::{Collapsed, collapse_blank_lines, finish_text};
pub use context::Context;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Outcome of segmenting one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segmented {
    /// The page carries the exclude-file marker and must be left untouched.
    Skipped,
    /// The page was transformed.
    Rewritten(SegmentedDocument),
}

/// A transformed page and the contexts discovered in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedDocument {
    /// Final page text, ending with exactly one newline (or empty).
    pub text: String,
    /// Contexts in file order.
    pub contexts: Vec<Context>,
}

impl SegmentedDocument {
    /// Whether the final text carries the abstract marker anywhere.
    pub fn has_abstract(&self) -> bool {
        self.text.contains(Marker::Abstract.as_str())
    }
}

/// Whether the raw page text opts out of processing.
pub fn is_excluded(text: &str) -> bool {
    text.contains(Marker::ExcludeFile.as_str())
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Segment one page.
#[instrument(skip_all, fields(file = %file.display()))]
pub fn segment(file: &Path, input: &str) -> Segmented {
    if is_excluded(input) {
        debug!("exclude-file marker present, skipping");
        return Segmented::Skipped;
    }

    let lines: Vec<&str> = input.lines().collect();
    let mut segmenter = Segmenter::new(file);
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];

        match classify(line) {
            LineKind::Marker(Marker::Separator) => {
                // A separator written by a previous run is followed by a blank line
                // and the header it introduced. Drop that blank too so the re-inserted
                // block lands exactly where the old one was.
                if segmenter.restates_separator(&lines, index) {
                    index += 1;
                }
            }
            kind => segmenter.feed(line, kind, Lookback::at(&lines, index)),
        }

        index += 1;
    }

    let document = segmenter.finish();
    debug!(contexts = document.contexts.len(), "segmentation complete");
    Segmented::Rewritten(document)
}

/// The one or two input lines before the current one, trimmed.
#[derive(Debug, Clone, Copy)]
struct Lookback<'a> {
    one_before: Option<&'a str>,
    two_before: Option<&'a str>,
}

impl<'a> Lookback<'a> {
    fn at(lines: &[&'a str], index: usize) -> Self {
        Self {
            one_before: index.checked_sub(1).map(|i| lines[i].trim()),
            two_before: index.checked_sub(2).map(|i| lines[i].trim()),
        }
    }

    fn contains(&self, marker: Marker) -> bool {
        [self.one_before, self.two_before]
            .into_iter()
            .flatten()
            .any(|line| line == marker.as_str())
    }
}

/// Per-page state for the single forward pass.
struct Segmenter {
    file: PathBuf,
    in_code_block: bool,
    current: Option<Context>,
    contexts: Vec<Context>,
    output: Vec<String>,
}

impl Segmenter {
    fn new(file: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
            in_code_block: false,
            current: None,
            contexts: Vec::new(),
            output: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str, kind: LineKind, before: Lookback<'_>) {
        match kind {
            // Structural markers stay in the page but belong to no context.
            LineKind::Marker(Marker::Abstract | Marker::ExcludeContext) => {
                self.output.push(line.to_string());
            }
            LineKind::Fence => {
                self.in_code_block = !self.in_code_block;
                self.emit(line);
            }
            LineKind::Header
                if !self.in_code_block
                    && !before.contains(Marker::Abstract)
                    && !before.contains(Marker::ExcludeContext) =>
            {
                self.open_context(line);
            }
            _ => self.emit(line),
        }
    }

    /// True when the separator at `index` is followed by a blank line and a
    /// header that will open a context again.
    fn restates_separator(&self, lines: &[&str], index: usize) -> bool {
        let blank_follows = lines
            .get(index + 1)
            .is_some_and(|l| cleanup::is_blank(l));
        let header_after = lines.get(index + 2).is_some_and(|l| is_header(l));

        !self.in_code_block && blank_follows && header_after
    }

    fn open_context(&mut self, header: &str) {
        if let Some(done) = self.current.take() {
            self.contexts.push(done);
        }

        let mut context = Context::new(self.file.clone(), self.output.len());
        self.output.push(Marker::Separator.as_str().to_string());
        self.output.push(String::new());
        self.output.push(header.to_string());
        context.push(header);
        self.current = Some(context);
    }

    fn emit(&mut self, line: &str) {
        self.output.push(line.to_string());
        if let Some(context) = self.current.as_mut() {
            context.push(line);
        }
    }

    fn finish(mut self) -> SegmentedDocument {
        if let Some(done) = self.current.take() {
            self.contexts.push(done);
        }

        let collapsed = collapse_blank_lines(self.output);

        // Separator lines are never blank, so every context keeps its anchor.
        for context in &mut self.contexts {
            if let Some(Some(new_index)) = collapsed.index_map.get(context.line_index) {
                context.line_index = *new_index;
            }
        }

        SegmentedDocument {
            text: finish_text(&collapsed.lines),
            contexts: self.contexts,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
