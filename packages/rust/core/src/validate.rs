//! Post-rewrite audit of processed pages.
//!
//! Runs only after every page has been written, so diagnostics describe the
//! final text. Diagnostics are advisory and never change any page.

use std::fmt;
use std::path::PathBuf;

use crate::pipeline::ProcessedFile;

/// A content-quality warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A context scored below the weak-content threshold.
    WeakContent {
        file: PathBuf,
        line_index: usize,
        score: usize,
    },
    /// A page has no abstract marker.
    MissingAbstract { file: PathBuf },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::WeakContent {
                file,
                line_index,
                score,
            } => write!(
                f,
                "context with weak content: {score} on {}:{line_index}",
                file.display()
            ),
            Diagnostic::MissingAbstract { file } => {
                write!(f, "no abstract marker in {}", file.display())
            }
        }
    }
}

/// Audit processed pages: weak contexts first (page order, then context order),
/// then pages missing the abstract marker.
pub fn audit(files: &[ProcessedFile]) -> Vec<Diagnostic> {
    let weak = files
        .iter()
        .flat_map(|f| &f.document.contexts)
        .filter(|context| context.is_weak())
        .map(|context| Diagnostic::WeakContent {
            file: context.file.clone(),
            line_index: context.line_index,
            score: context.measure_content(),
        });

    let missing_abstract = files
        .iter()
        .filter(|f| !f.document.has_abstract())
        .map(|f| Diagnostic::MissingAbstract {
            file: f.path.clone(),
        });

    weak.chain(missing_abstract).collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use mxdocs_markdown::{Segmented, segment};
    use mxdocs_shared::Marker;

    use super::*;

    fn processed(path: &str, input: &str) -> ProcessedFile {
        let Segmented::Rewritten(document) = segment(Path::new(path), input) else {
            panic!("unexpected skip");
        };
        ProcessedFile {
            path: PathBuf::from(path),
            changed: document.text != input,
            document,
        }
    }

    #[test]
    fn weak_context_reported_with_file_and_index() {
        let abstract_marker = Marker::Abstract.as_str();
        let input = format!(
            "{abstract_marker}\nThis page explains staking rewards and how they accrue daily.\n\n\
             ## Short\nToo few words here.\n"
        );
        let diagnostics = audit(&[processed("docs/staking.md", &input)]);

        assert_eq!(
            diagnostics,
            vec![Diagnostic::WeakContent {
                file: PathBuf::from("docs/staking.md"),
                line_index: 3,
                score: 6,
            }]
        );
        assert_eq!(
            diagnostics[0].to_string(),
            "context with weak content: 6 on docs/staking.md:3"
        );
    }

    #[test]
    fn missing_abstract_reported_once_per_page() {
        let body = "# Title\n\nEnough words in this section to clear the weak content bar easily.\n";
        let diagnostics = audit(&[processed("docs/a.md", body)]);

        assert_eq!(
            diagnostics,
            vec![Diagnostic::MissingAbstract {
                file: PathBuf::from("docs/a.md")
            }]
        );
        assert_eq!(diagnostics[0].to_string(), "no abstract marker in docs/a.md");
    }

    #[test]
    fn weak_contexts_come_before_missing_abstracts() {
        let diagnostics = audit(&[
            processed("docs/a.md", "# A\nshort\n"),
            processed("docs/b.md", "# B\nshort too\n"),
        ]);

        let kinds: Vec<&str> = diagnostics
            .iter()
            .map(|d| match d {
                Diagnostic::WeakContent { .. } => "weak",
                Diagnostic::MissingAbstract { .. } => "abstract",
            })
            .collect();
        assert_eq!(kinds, ["weak", "weak", "abstract", "abstract"]);
    }

    #[test]
    fn clean_page_has_no_diagnostics() {
        let abstract_marker = Marker::Abstract.as_str();
        let input = format!(
            "{abstract_marker}\n## Overview\nA page with a summary and enough prose to count.\n"
        );
        assert!(audit(&[processed("docs/ok.md", &input)]).is_empty());
    }
}
