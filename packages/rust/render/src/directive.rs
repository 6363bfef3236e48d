//! `BEGIN_*` / `END_*` directives embedded as HTML comments.
//!
//! A directive line looks like:
//!
//! ```text
//! <!-- BEGIN_INCLUDE_FILE { "url": "https://raw.githubusercontent.com/.../part.md" } -->
//! ...stale rendered content...
//! <!-- END_INCLUDE_FILE -->
//! ```
//!
//! Everything between the pair is owned by the renderer and replaced on every run.

use mxdocs_shared::{MxDocsError, Result};
use serde_json::Value;
use url::Url;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which pair of directives to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// A remote Markdown fragment spliced in verbatim.
    IncludeFile,
    /// A remote Jupyter notebook rendered to Markdown.
    Notebook,
}

impl DirectiveKind {
    pub const fn begin(self) -> &'static str {
        match self {
            DirectiveKind::IncludeFile => "BEGIN_INCLUDE_FILE",
            DirectiveKind::Notebook => "BEGIN_NOTEBOOK",
        }
    }

    pub const fn end(self) -> &'static str {
        match self {
            DirectiveKind::IncludeFile => "END_INCLUDE_FILE",
            DirectiveKind::Notebook => "END_NOTEBOOK",
        }
    }
}

/// A parsed `BEGIN_*` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Remote content location.
    pub url: Url,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a `BEGIN_*` line.
///
/// The comment delimiters are removed, the first word (the directive keyword)
/// is dropped and the rest must be a JSON object with a string `url`. Other
/// payload fields are ignored.
pub fn parse_directive(line: &str) -> Result<Directive> {
    let content = line.replace("<!--", "").replace("-->", "");
    let content = content.trim();

    let Some((_, payload)) = content.split_once(char::is_whitespace) else {
        return Err(MxDocsError::directive(format!(
            "directive has no payload: {content:?}"
        )));
    };

    let payload: Value = serde_json::from_str(payload.trim()).map_err(|e| {
        MxDocsError::directive(format!("invalid JSON payload in {content:?}: {e}"))
    })?;

    let Value::Object(payload) = payload else {
        return Err(MxDocsError::directive(format!(
            "payload is not a JSON object: {content:?}"
        )));
    };

    let raw_url = payload
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| MxDocsError::directive(format!("payload has no \"url\": {content:?}")))?;

    let url = Url::parse(raw_url)
        .map_err(|e| MxDocsError::directive(format!("invalid url {raw_url:?}: {e}")))?;

    Ok(Directive { url })
}

/// URLs of every `BEGIN_*` directive of `kind`, in page order.
pub fn directive_urls(text: &str, kind: DirectiveKind) -> Result<Vec<Url>> {
    text.lines()
        .filter(|line| line.contains(kind.begin()))
        .map(|line| parse_directive(line).map(|d| d.url))
        .collect()
}

// ---------------------------------------------------------------------------
// Splicing
// ---------------------------------------------------------------------------

/// Replace the body of every `kind` region with the lines produced by `render`.
///
/// Directive lines are kept. Stale content between them is discarded. An
/// unterminated region, a nested `BEGIN` or a stray `END` is an error.
pub(crate) fn splice<F>(text: &str, kind: DirectiveKind, mut render: F) -> Result<String>
where
    F: FnMut(&Directive) -> Result<Vec<String>>,
{
    let mut output: Vec<String> = Vec::new();
    let mut open: Option<usize> = None;

    for (index, line) in text.lines().enumerate() {
        if line.contains(kind.begin()) {
            if let Some(start) = open {
                return Err(MxDocsError::directive(format!(
                    "{} on line {} opened before the one on line {} was closed",
                    kind.begin(),
                    index + 1,
                    start + 1
                )));
            }
            output.push(line.to_string());
            let directive = parse_directive(line)?;
            output.extend(render(&directive)?);
            open = Some(index);
        } else if line.contains(kind.end()) {
            if open.take().is_none() {
                return Err(MxDocsError::directive(format!(
                    "{} on line {} has no matching {}",
                    kind.end(),
                    index + 1,
                    kind.begin()
                )));
            }
            output.push(line.to_string());
        } else if open.is_none() {
            output.push(line.to_string());
        }
    }

    if let Some(start) = open {
        return Err(MxDocsError::directive(format!(
            "{} on line {} is never closed by {}",
            kind.begin(),
            start + 1,
            kind.end()
        )));
    }

    if output.is_empty() {
        return Ok(String::new());
    }

    let mut result = output.join("\n");
    result.push('\n');
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_url_payload() {
        let line = r#"<!-- BEGIN_INCLUDE_FILE { "url": "https://example.com/a/part.md" } -->"#;
        let directive = parse_directive(line).unwrap();
        assert_eq!(directive.url.as_str(), "https://example.com/a/part.md");
    }

    #[test]
    fn ignores_extra_payload_fields() {
        let line = r#"<!-- BEGIN_NOTEBOOK {"url": "https://example.com/nb.ipynb", "title": "Cookbook"} -->"#;
        let directive = parse_directive(line).unwrap();
        assert_eq!(directive.url.as_str(), "https://example.com/nb.ipynb");
    }

    #[test]
    fn rejects_missing_payload() {
        let err = parse_directive("<!-- BEGIN_NOTEBOOK -->").unwrap_err();
        assert!(matches!(err, MxDocsError::Directive { .. }));
        assert!(err.to_string().contains("no payload"));
    }

    #[test]
    fn rejects_bad_json() {
        let err = parse_directive(r#"<!-- BEGIN_NOTEBOOK { url: nope } -->"#).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn rejects_missing_or_relative_url() {
        let err = parse_directive(r#"<!-- BEGIN_NOTEBOOK { "href": "x" } -->"#).unwrap_err();
        assert!(err.to_string().contains("no \"url\""));

        let err = parse_directive(r#"<!-- BEGIN_NOTEBOOK { "url": "docs/x.ipynb" } -->"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid url"));
    }

    #[test]
    fn collects_urls_in_order() {
        let text = concat!(
            "intro\n",
            "<!-- BEGIN_INCLUDE_FILE { \"url\": \"https://example.com/one.md\" } -->\n",
            "<!-- END_INCLUDE_FILE -->\n",
            "<!-- BEGIN_INCLUDE_FILE { \"url\": \"https://example.com/two.md\" } -->\n",
            "<!-- END_INCLUDE_FILE -->\n",
        );
        let urls = directive_urls(text, DirectiveKind::IncludeFile).unwrap();
        let urls: Vec<&str> = urls.iter().map(Url::as_str).collect();
        assert_eq!(urls, ["https://example.com/one.md", "https://example.com/two.md"]);
        assert!(directive_urls(text, DirectiveKind::Notebook).unwrap().is_empty());
    }

    #[test]
    fn splice_replaces_stale_body() {
        let text = concat!(
            "before\n",
            "<!-- BEGIN_INCLUDE_FILE { \"url\": \"https://example.com/p.md\" } -->\n",
            "old line 1\n",
            "old line 2\n",
            "<!-- END_INCLUDE_FILE -->\n",
            "after\n",
        );
        let result =
            splice(text, DirectiveKind::IncludeFile, |_| Ok(vec!["new".to_string()])).unwrap();
        assert!(!result.contains("old line"));
        assert!(result.contains("-->\nnew\n<!-- END_INCLUDE_FILE -->\nafter\n"));
    }

    #[test]
    fn splice_rejects_unterminated_region() {
        let text = "<!-- BEGIN_NOTEBOOK { \"url\": \"https://example.com/n.ipynb\" } -->\nrest\n";
        let err = splice(text, DirectiveKind::Notebook, |_| Ok(vec![])).unwrap_err();
        assert!(err.to_string().contains("never closed"));
    }

    #[test]
    fn splice_rejects_stray_end() {
        let err = splice("a\n<!-- END_NOTEBOOK -->\n", DirectiveKind::Notebook, |_| Ok(vec![]))
            .unwrap_err();
        assert!(err.to_string().contains("no matching"));
    }

    #[test]
    fn splice_without_directives_is_unchanged() {
        let text = "# Title\n\nbody\n";
        let result = splice(text, DirectiveKind::IncludeFile, |_| {
            panic!("render must not be called")
        })
        .unwrap();
        assert_eq!(result, text);
    }
}
