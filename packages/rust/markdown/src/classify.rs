//! Single-line classification.
//!
//! Everything here looks at one line in isolation. State (code-block parity,
//! lookback) belongs to the segmentation engine.

use std::sync::LazyLock;

use mxdocs_shared::Marker;
use regex::Regex;

/// ATX headers of level 1 to 4. Deeper levels never start a context.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,4} ").expect("header regex"));

/// Horizontal rule as written in these docs.
const RULE: &str = "---";

/// Code fence opener/closer.
const FENCE: &str = "```";

/// What a single line looks like to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Marker(Marker),
    Fence,
    Header,
    /// A `---` rule. Classified, but not a context boundary.
    Rule,
    Text,
}

/// Classify `line`. Markers take precedence, then fences, headers and rules.
pub fn classify(line: &str) -> LineKind {
    if let Some(marker) = Marker::parse_line(line) {
        LineKind::Marker(marker)
    } else if is_fence(line) {
        LineKind::Fence
    } else if is_header(line) {
        LineKind::Header
    } else if is_rule(line) {
        LineKind::Rule
    } else {
        LineKind::Text
    }
}

/// True iff the untrimmed line starts with a triple backtick.
pub fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

/// True iff the line starts with one to four `#` followed by a space.
pub fn is_header(line: &str) -> bool {
    HEADER_RE.is_match(line)
}

/// True iff the trimmed line is exactly the sentinel text for `kind`.
pub fn is_explicit_marker(line: &str, kind: Marker) -> bool {
    kind.matches(line)
}

/// True iff the trimmed line is exactly `---`.
pub fn is_rule(line: &str) -> bool {
    line.trim() == RULE
}
