//! Whitespace passes applied after segmentation.
//!
//! Both passes work on whole lines. A line is blank when it is empty or holds
//! only whitespace.

/// Lines surviving [`collapse_blank_lines`], plus where each input line went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collapsed {
    pub lines: Vec<String>,
    /// `index_map[old]` is the new index of input line `old`, or `None` if dropped.
    pub index_map: Vec<Option<usize>>,
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

// ---------------------------------------------------------------------------
// Pass 1: Collapse duplicate blank lines
// ---------------------------------------------------------------------------

/// Drop every blank line that is followed by another blank line.
///
/// The last line of a run survives, so a run of any length becomes exactly one
/// blank line. The final line is always kept.
pub fn collapse_blank_lines(lines: Vec<String>) -> Collapsed {
    let blank: Vec<bool> = lines.iter().map(|l| is_blank(l)).collect();
    let mut kept = Vec::with_capacity(lines.len());
    let mut index_map = Vec::with_capacity(lines.len());

    for (index, line) in lines.into_iter().enumerate() {
        let next_is_blank = blank.get(index + 1).copied().unwrap_or(false);

        if blank[index] && next_is_blank {
            index_map.push(None);
        } else {
            index_map.push(Some(kept.len()));
            kept.push(line);
        }
    }

    Collapsed {
        lines: kept,
        index_map,
    }
}

// ---------------------------------------------------------------------------
// Pass 2: Join with exactly one trailing newline
// ---------------------------------------------------------------------------

/// Join lines with `\n`, dropping trailing blank lines and ending with a single
/// newline. A document with no content becomes the empty string.
pub fn finish_text(lines: &[String]) -> String {
    let Some(last) = lines.iter().rposition(|l| !is_blank(l)) else {
        return String::new();
    };

    let mut text = lines[..=last].join("\n");
    text.push('\n');
    text
}
