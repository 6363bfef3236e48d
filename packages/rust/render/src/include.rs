//! Remote Markdown fragments spliced between `BEGIN_INCLUDE_FILE` / `END_INCLUDE_FILE`.

use std::collections::HashMap;

use mxdocs_shared::{MxDocsError, Result};
use url::Url;

use crate::directive::{DirectiveKind, splice};

/// Splice already-fetched fragments into `text`.
///
/// Each region receives the fragment's lines followed by one blank line.
/// `fetched` must hold an entry for every include URL in the page.
pub fn splice_includes(text: &str, fetched: &HashMap<Url, String>) -> Result<String> {
    splice(text, DirectiveKind::IncludeFile, |directive| {
        let body = fetched.get(&directive.url).ok_or_else(|| {
            MxDocsError::directive(format!("no content fetched for {}", directive.url))
        })?;

        let mut lines: Vec<String> = body.lines().map(str::to_string).collect();
        lines.push(String::new());
        Ok(lines)
    })
}
