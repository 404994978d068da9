//! Printing a rewritten [`SyntaxTree`] back to source text.
//!
//! The transformer never mutates the concrete tree. Every replaced node is
//! recorded as an [`Edit`] over the original byte range, and printing splices
//! those replacements into the untouched text around them. Formatting outside
//! the replaced nodes is therefore preserved exactly.

use std::ops::Range;

use thiserror::Error;

use super::python::{ParseError, SyntaxTree, parse_python};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    #[error("replacement {start}..{end} is outside of the source (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("replacements {first:?} and {second:?} overlap")]
    Overlap {
        first: Range<usize>,
        second: Range<usize>,
    },
    #[error("rewritten source no longer parses: {0}")]
    InvalidOutput(ParseError),
}

/// Replace `range` of the original source with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

impl Edit {
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn is_within(&self, outer: &Range<usize>) -> bool {
        outer.start <= self.range.start && self.range.end <= outer.end
    }
}

/// Render `range` of `source` with every edit inside it applied.
///
/// Edits must be sorted by start offset and must not overlap.
pub fn render_range(source: &str, range: Range<usize>, edits: &[Edit]) -> String {
    let mut out = String::with_capacity(range.len());
    let mut cursor = range.start;
    for edit in edits.iter().filter(|e| e.is_within(&range)) {
        out.push_str(&source[cursor..edit.range.start]);
        out.push_str(&edit.text);
        cursor = edit.range.end;
    }
    out.push_str(&source[cursor..range.end]);
    out
}

/// Print `tree` with `edits` applied.
///
/// With no edits the output is the input, byte for byte.
pub fn print(tree: &SyntaxTree, edits: &[Edit]) -> Result<String, PrintError> {
    let source = tree.source();
    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.range.start, e.range.end));

    for edit in &sorted {
        if edit.range.start > edit.range.end
            || edit.range.end > source.len()
            || !source.is_char_boundary(edit.range.start)
            || !source.is_char_boundary(edit.range.end)
        {
            return Err(PrintError::OutOfBounds {
                start: edit.range.start,
                end: edit.range.end,
                len: source.len(),
            });
        }
    }
    for pair in sorted.windows(2) {
        if pair[0].range.end > pair[1].range.start {
            return Err(PrintError::Overlap {
                first: pair[0].range.clone(),
                second: pair[1].range.clone(),
            });
        }
    }

    let mut out = String::with_capacity(source.len() + 64);
    if tree.has_bom() {
        out.push('\u{feff}');
    }
    let mut cursor = 0;
    for edit in sorted {
        out.push_str(&source[cursor..edit.range.start]);
        out.push_str(&edit.text);
        cursor = edit.range.end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

/// Print `tree` with `edits` applied and make sure the result still parses.
pub fn print_checked(tree: &SyntaxTree, edits: &[Edit]) -> Result<String, PrintError> {
    let printed = print(tree, edits)?;
    parse_python(&printed).map_err(PrintError::InvalidOutput)?;
    Ok(printed)
}
