//! Sentinel lines embedded in documentation pages.
//!
//! Each marker is a Markdown link-reference comment, so it renders invisibly.
//! A line carries a marker only when, after trimming, it equals the marker text.

/// Contexts scoring strictly below this many whitespace-delimited tokens are
/// reported as weak.
pub const WEAK_CONTENT_THRESHOLD: usize = 10;

/// The closed set of markers understood by the segmentation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Boundary between two contexts. Inserted by the engine, stripped on re-runs.
    Separator,
    /// Marks the section holding the page summary.
    Abstract,
    /// Opts the whole file out of processing.
    ExcludeFile,
    /// Opts the following section out of boundary insertion.
    ExcludeContext,
}

impl Marker {
    pub const ALL: [Marker; 4] = [
        Marker::Separator,
        Marker::Abstract,
        Marker::ExcludeFile,
        Marker::ExcludeContext,
    ];

    /// The literal sentinel text.
    pub const fn as_str(self) -> &'static str {
        match self {
            Marker::Separator => "[comment]: # (mx-context-auto)",
            Marker::Abstract => "[comment]: # (mx-abstract)",
            Marker::ExcludeFile => "[comment]: # (mx-exclude-file)",
            Marker::ExcludeContext => "[comment]: # (mx-exclude-context)",
        }
    }

    /// Whether `line`, trimmed, is exactly this marker.
    pub fn matches(self, line: &str) -> bool {
        line.trim() == self.as_str()
    }

    /// The marker carried by `line`, if any.
    pub fn parse_line(line: &str) -> Option<Marker> {
        let trimmed = line.trim();
        Self::ALL.into_iter().find(|m| m.as_str() == trimmed)
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
