//! Domain types for segmented slide text.

use serde::{Deserialize, Serialize};

/// A range of UTF-8 byte offsets into the source text.
///
/// Spans of one segmentation are ordered and never overlap when read as
/// half-open ranges (`prev.end <= next.start`). Cursor lookups treat `end` as
/// inclusive so a caret placed right after the last character of a line still
/// belongs to that line's slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span at `offset`.
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether a cursor at `offset` falls inside this span, `end` included.
    pub fn contains_cursor(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// The same span moved `delta` bytes to the right.
    pub fn shifted(&self, delta: usize) -> Self {
        Self::new(self.start + delta, self.end + delta)
    }

    /// Slice the source this span was taken from.
    ///
    /// Returns `None` if the span does not fit the source or does not fall on
    /// character boundaries.
    pub fn slice<'src>(&self, source: &'src str) -> Option<&'src str> {
        source.get(self.start..self.end)
    }
}

/// How the segmenter reports section labels and titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentMode {
    /// Labels are collected and attached to the next content slide's
    /// `headers` (song and deck view).
    #[default]
    HeaderStyle,
    /// Labels become standalone slides, and an end marker slide closes the
    /// sequence (editor view).
    LabelStyle,
}

/// What a produced slide represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    /// Displayable lyric or deck content.
    Content,
    /// A section label or title emitted on its own (label style only).
    Label,
    /// The terminal marker appended in label style.
    End,
}

/// One unit of display produced by segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Cleaned display text, lines joined by `\n`.
    pub text: String,

    /// Whether this is content, a label or the end marker.
    pub kind: SlideKind,

    /// Raw header strings collected right before this slide (header style).
    pub headers: Vec<String>,

    /// Where this slide came from in the source text.
    pub span: Span,
}

impl Slide {
    /// Create a content slide.
    pub fn content(text: impl Into<String>, span: Span, headers: Vec<String>) -> Self {
        Self {
            text: text.into(),
            kind: SlideKind::Content,
            headers,
            span,
        }
    }

    /// Create a standalone label slide.
    pub fn label(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            kind: SlideKind::Label,
            headers: Vec::new(),
            span,
        }
    }

    /// Create the end marker slide.
    pub fn end(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            kind: SlideKind::End,
            headers: Vec::new(),
            span,
        }
    }

    /// Labels and the end marker are not lyric content.
    pub fn is_label(&self) -> bool {
        !matches!(self.kind, SlideKind::Content)
    }

    /// True when the first line of the text is a single underscore.
    ///
    /// Only affects the size class used when rendering.
    pub fn is_subtitle(&self) -> bool {
        self.text.split('\n').next() == Some("_")
    }

    /// Lines of the slide text.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_cursor_containment() {
        let span = Span::new(4, 9);
        assert!(span.contains_cursor(4));
        assert!(span.contains_cursor(9));
        assert!(!span.contains_cursor(3));
        assert!(!span.contains_cursor(10));
        assert_eq!(span.len(), 5);
        assert!(Span::empty(3).is_empty());
    }

    #[test]
    fn test_span_slice() {
        let source = "Hello\nWorld";
        assert_eq!(Span::new(6, 11).slice(source), Some("World"));
        assert_eq!(Span::new(6, 12).slice(source), None);
        assert_eq!(Span::new(0, 5).shifted(6), Span::new(6, 11));
    }

    #[test]
    fn test_subtitle_detection() {
        let span = Span::default();
        assert!(Slide::content("_\nLine one", span, vec![]).is_subtitle());
        assert!(!Slide::content("__\nLine one", span, vec![]).is_subtitle());
        assert!(!Slide::content("Line one\n_", span, vec![]).is_subtitle());
    }

    #[test]
    fn test_label_kinds() {
        let span = Span::default();
        assert!(!Slide::content("Hey", span, vec![]).is_label());
        assert!(Slide::label("Chorus", span).is_label());
        assert!(Slide::end("end", span).is_label());
    }

    #[test]
    fn test_default_mode_is_header_style() {
        assert_eq!(SegmentMode::default(), SegmentMode::HeaderStyle);
    }
}
