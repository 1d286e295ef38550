// Source locations shared by the parsed tree, the typed tree and diagnostics.

use core::ops::Range;

use crate::{Vec, vec};

/// Half-open byte range into the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self(start..end)
    }
    pub fn combine(a: &Span, b: &Span) -> Span {
        Span::new(a.0.start, b.0.end)
    }
    pub fn str_of<'a>(&self, source: &'a str) -> &'a str {
        &source[self.0.start..self.0.end]
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self(range)
    }
}

/// Maps byte offsets to 1-based line numbers.
///
/// An index built without source text (`LineIndex::default()`) reports
/// line 0 for every offset, meaning "unknown".
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    pub fn line_of(&self, offset: usize) -> u32 {
        if self.line_starts.is_empty() {
            return 0;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact + 1,
            Err(insert_at) => insert_at,
        };
        line as u32
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_of() {
        let index = LineIndex::new("let x = 1\nx + 2\n\ny");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(9), 1);
        assert_eq!(index.line_of(10), 2);
        assert_eq!(index.line_of(14), 2);
        assert_eq!(index.line_of(16), 3);
        assert_eq!(index.line_of(17), 4);
    }

    #[test]
    fn test_unknown_source() {
        let index = LineIndex::default();
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(42), 0);
    }

    #[test]
    fn test_span_helpers() {
        let source = "1 + true";
        let span = Span::combine(&Span::new(0, 1), &Span::new(4, 8));
        assert_eq!(span, Span::from(0..8));
        assert_eq!(Span::new(4, 8).str_of(source), "true");
    }
}
