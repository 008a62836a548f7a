// Copyright 2026 Martin Pool.

//! Locate and mark the first point where captured output departs from what
//! was expected.
//!
//! Highlighting is purely cosmetic: [crate::Channel::check] compares the raw
//! buffers and never looks at anything produced here.

use std::fmt;
use std::ops::Range;

use crate::ansi;

/// Return the index, in characters, of the first position at which `actual`
/// and `expected` differ.
///
/// Running off the end of either string counts as a difference at that
/// position, so for identical strings this is their length.
///
/// ```
/// assert_eq!(mace::diff::divergence("abcXdef", "abcYdef"), 3);
/// assert_eq!(mace::diff::divergence("ok 1", "ok 10"), 4);
/// assert_eq!(mace::diff::divergence("", "anything"), 0);
/// ```
pub fn divergence(actual: &str, expected: &str) -> usize {
    actual
        .chars()
        .zip(expected.chars())
        .take_while(|(a, e)| a == e)
        .count()
}

/// Color `text` so that the first `index` characters are drawn in one
/// highlight color and the remainder, from the divergence point on, in
/// another, with a reset after each.
///
/// An `index` past the end of `text` highlights the whole of it as matching.
///
/// ```
/// let marked = mace::diff::highlight("abcXdef", 3);
/// assert_eq!(marked.strip(), "abcXdef");
/// ```
pub fn highlight(text: &str, index: usize) -> Highlighted {
    let split = text
        .char_indices()
        .nth(index)
        .map_or(text.len(), |(offset, _)| offset);
    let (same, different) = text.split_at(split);
    let (matching, diverging) = (ansi::matching(), ansi::diverging());
    let mut marked = Highlighted::default();
    marked.push_marker(&matching.start);
    marked.push_str(same);
    marked.push_marker(&matching.end);
    marked.push_marker(&diverging.start);
    marked.push_str(different);
    marked.push_marker(&diverging.end);
    marked
}

/// Text with highlight markers in it.
///
/// The position of every marker is remembered, so [Highlighted::strip] takes
/// out exactly what highlighting added. Escape codes that were already part
/// of the text are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlighted {
    text: String,
    markers: Vec<Range<usize>>,
}

impl Highlighted {
    /// Append text that is not a marker.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append another highlighted text, markers included.
    pub fn push(&mut self, other: &Highlighted) {
        let offset = self.text.len();
        self.markers.extend(
            other
                .markers
                .iter()
                .map(|r| (r.start + offset)..(r.end + offset)),
        );
        self.text.push_str(&other.text);
    }

    fn push_marker(&mut self, marker: &str) {
        if marker.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(marker);
        self.markers.push(start..self.text.len());
    }

    /// The text with its markers.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Return the text with the highlight markers taken out.
    pub fn strip(&self) -> String {
        let mut plain = String::with_capacity(self.text.len());
        let mut pos = 0;
        for marker in &self.markers {
            plain.push_str(&self.text[pos..marker.start]);
            pos = marker.end;
        }
        plain.push_str(&self.text[pos..]);
        plain
    }
}

impl From<&str> for Highlighted {
    fn from(text: &str) -> Highlighted {
        Highlighted {
            text: text.to_owned(),
            markers: Vec::new(),
        }
    }
}

impl fmt::Display for Highlighted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
