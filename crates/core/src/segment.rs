//! Text-to-slides segmentation.
//!
//! Each block of text separated by at least one blank line becomes a slide,
//! similar to markdown paragraphs. Title and section label lines also end a
//! slide; how they are reported depends on the [`SegmentMode`]. Chord lines
//! are invisible: they neither end a slide nor show up in it.

use crate::grammar::{Grammar, LineClass};
use crate::types::{SegmentMode, Slide, Span};

/// Text of the marker slide that closes label-style output.
pub const END_MARKER: &str = "end";

/// Configurable slide segmenter.
#[derive(Debug, Clone)]
pub struct Segmenter<'g> {
    mode: SegmentMode,
    grammar: &'g Grammar,
    end_marker: String,
}

impl Default for Segmenter<'static> {
    fn default() -> Self {
        Self::new(SegmentMode::default())
    }
}

impl Segmenter<'static> {
    /// Create a segmenter using the standard grammar.
    pub fn new(mode: SegmentMode) -> Self {
        Self {
            mode,
            grammar: Grammar::standard(),
            end_marker: END_MARKER.to_string(),
        }
    }
}

impl<'g> Segmenter<'g> {
    /// Use a different line grammar.
    pub fn with_grammar<'h>(self, grammar: &'h Grammar) -> Segmenter<'h> {
        Segmenter {
            mode: self.mode,
            grammar,
            end_marker: self.end_marker,
        }
    }

    /// Set the text of the end marker slide (label style only).
    pub fn with_end_marker(mut self, marker: impl Into<String>) -> Self {
        self.end_marker = marker.into();
        self
    }

    pub fn mode(&self) -> SegmentMode {
        self.mode
    }

    /// Split `text` into slides, in source order.
    ///
    /// Never fails: malformed markup degrades to literal text. Empty input
    /// gives no slides in header style and only the end marker in label style.
    pub fn segment(&self, text: &str) -> Vec<Slide> {
        let mut acc = Accumulator::new(self.mode);
        let mut chord_lines = 0usize;

        for (start, line) in lines_with_offsets(text) {
            let span = Span::new(start, start + line.len());

            match self.grammar.classify(line) {
                LineClass::Chords => chord_lines += 1,
                LineClass::Boundary { label } => {
                    acc.flush();
                    if let Some(label) = label {
                        acc.label(label, span);
                    }
                }
                LineClass::Text(cleaned) => acc.push(cleaned, span),
            }
        }
        acc.flush();

        let mut slides = acc.finish();
        if self.mode == SegmentMode::LabelStyle {
            slides.push(Slide::end(self.end_marker.clone(), Span::empty(text.len())));
        }

        log::debug!(
            "segmented {} bytes into {} slides ({} chord lines skipped)",
            text.len(),
            slides.len(),
            chord_lines
        );
        slides
    }
}

/// Segment `text` with the standard grammar.
pub fn segment(text: &str, mode: SegmentMode) -> Vec<Slide> {
    Segmenter::new(mode).segment(text)
}

/// Re-segment `source` and write back only what appears on slides.
///
/// Each slide becomes its headers as `# <header>` lines, then its trimmed
/// text, then a blank line. Applying this twice gives the same result as
/// applying it once.
pub fn cleanup(source: &str) -> String {
    let mut text = String::with_capacity(source.len());

    for slide in segment(source, SegmentMode::HeaderStyle) {
        for header in &slide.headers {
            text.push_str("# ");
            text.push_str(header.trim());
            text.push('\n');
        }
        text.push_str(slide.text.trim());
        text.push_str("\n\n");
    }

    text
}

/// Lines split on `\n`, each with the byte offset where it starts.
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut start = 0;
    text.split('\n').map(move |line| {
        let offset = start;
        start += line.len() + 1;
        (offset, line)
    })
}

/// Collects content lines and pending headers while walking the source.
struct Accumulator {
    mode: SegmentMode,
    slides: Vec<Slide>,
    lines: Vec<String>,
    span: Option<Span>,
    headers: Vec<String>,
}

impl Accumulator {
    fn new(mode: SegmentMode) -> Self {
        Self {
            mode,
            slides: Vec::new(),
            lines: Vec::new(),
            span: None,
            headers: Vec::new(),
        }
    }

    fn push(&mut self, line: String, line_span: Span) {
        self.span = Some(match self.span {
            Some(span) => Span::new(span.start, line_span.end),
            None => line_span,
        });
        self.lines.push(line);
    }

    fn label(&mut self, label: String, line_span: Span) {
        match self.mode {
            SegmentMode::HeaderStyle => self.headers.push(label),
            SegmentMode::LabelStyle => self.slides.push(Slide::label(label, line_span)),
        }
    }

    fn flush(&mut self) {
        if self.lines.is_empty() {
            return;
        }

        let text = self.lines.join("\n");
        let span = self.span.take().unwrap_or_default();
        let headers = std::mem::take(&mut self.headers);
        self.lines.clear();

        self.slides.push(Slide::content(text, span, headers));
    }

    /// Headers still pending here had no content after them and are dropped.
    fn finish(self) -> Vec<Slide> {
        if !self.headers.is_empty() {
            log::trace!("dropping {} trailing headers", self.headers.len());
        }
        self.slides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlideKind;

    const SONG: &str = "Verse 1:\nLine one\nLine two\n\nChorus:\nHey\n";

    fn texts(slides: &[Slide]) -> Vec<&str> {
        slides.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_header_style_attaches_headers_to_next_slide() {
        let slides = segment(SONG, SegmentMode::HeaderStyle);

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].headers, vec!["Verse 1:"]);
        assert_eq!(slides[0].text, "Line one\nLine two");
        assert_eq!(slides[0].span, Span::new(9, 26));
        assert_eq!(slides[1].headers, vec!["Chorus:"]);
        assert_eq!(slides[1].text, "Hey");
        assert_eq!(slides[1].span, Span::new(36, 39));
        assert!(slides.iter().all(|s| s.kind == SlideKind::Content));
    }

    #[test]
    fn test_label_style_emits_labels_and_end_marker() {
        let slides = segment(SONG, SegmentMode::LabelStyle);

        let kinds: Vec<_> = slides.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SlideKind::Label,
                SlideKind::Content,
                SlideKind::Label,
                SlideKind::Content,
                SlideKind::End
            ]
        );
        assert_eq!(texts(&slides), vec!["Verse 1:", "Line one\nLine two", "Chorus:", "Hey", "end"]);
        assert_eq!(slides[0].span, Span::new(0, 8));
        assert_eq!(slides[2].span, Span::new(28, 35));
        assert_eq!(slides[4].span, Span::empty(SONG.len()));
        assert!(slides.iter().all(|s| s.headers.is_empty()));
    }

    #[test]
    fn test_blank_lines_collapse() {
        let slides = segment("Hello\n\n\nWorld\n", SegmentMode::HeaderStyle);
        assert_eq!(texts(&slides), vec!["Hello", "World"]);
        assert_eq!(slides[0].span, Span::new(0, 5));
        assert_eq!(slides[1].span, Span::new(8, 13));
    }

    #[test]
    fn test_chord_lines_are_transparent() {
        let text = "Line one\nG  D/F#  Em\nLine two\n\nC   G\nNext";
        let slides = segment(text, SegmentMode::HeaderStyle);

        assert_eq!(texts(&slides), vec!["Line one\nLine two", "Next"]);
        assert_eq!(slides[0].span, Span::new(0, 29));
        // the leading chord line is not part of the slide
        assert_eq!(slides[1].span, Span::new(37, 41));
    }

    #[test]
    fn test_final_line_without_newline_is_flushed() {
        let slides = segment("One\nTwo", SegmentMode::HeaderStyle);
        assert_eq!(texts(&slides), vec!["One\nTwo"]);
        assert_eq!(slides[0].span, Span::new(0, 7));
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("", SegmentMode::HeaderStyle).is_empty());

        let slides = segment("", SegmentMode::LabelStyle);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].kind, SlideKind::End);
        assert_eq!(slides[0].span, Span::empty(0));
    }

    #[test]
    fn test_trailing_headers_are_dropped() {
        let slides = segment("Hey\n\nOutro", SegmentMode::HeaderStyle);
        assert_eq!(slides.len(), 1);
        assert!(slides[0].headers.is_empty());
    }

    #[test]
    fn test_multiple_headers_accumulate() {
        let text = "# Amazing Grace\n[Verse 1]\nAmazing grace\n";
        let slides = segment(text, SegmentMode::HeaderStyle);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].headers, vec!["Amazing Grace", "Verse 1"]);
    }

    #[test]
    fn test_label_line_ends_slide_without_blank() {
        let slides = segment("One\nChorus\nTwo", SegmentMode::HeaderStyle);
        assert_eq!(texts(&slides), vec!["One", "Two"]);
        assert_eq!(slides[1].headers, vec!["Chorus"]);
    }

    #[test]
    fn test_bare_hash_is_boundary_without_label() {
        let slides = segment("One\n#\nTwo", SegmentMode::LabelStyle);
        assert_eq!(texts(&slides), vec!["One", "Two", "end"]);
    }

    #[test]
    fn test_content_is_cleaned() {
        let text = "[G]Glo - ry (repeat)\n  to   the [D]King  ";
        let slides = segment(text, SegmentMode::HeaderStyle);
        assert_eq!(texts(&slides), vec!["Glory\nto the King"]);
    }

    #[test]
    fn test_custom_end_marker() {
        let slides = Segmenter::new(SegmentMode::LabelStyle)
            .with_end_marker("fin")
            .segment("Hey");
        assert_eq!(slides.last().map(|s| s.text.as_str()), Some("fin"));
    }

    #[test]
    fn test_malformed_input_degrades_to_text() {
        let slides = segment("[unclosed (repeat\n### \n]]", SegmentMode::HeaderStyle);
        assert_eq!(texts(&slides), vec!["[unclosed (repeat", "]]"]);
    }

    #[test]
    fn test_cleanup_output() {
        let cleaned = cleanup(SONG);
        assert_eq!(cleaned, "# Verse 1:\nLine one\nLine two\n\n# Chorus:\nHey\n\n");
    }

    #[test]
    fn test_cleanup_strips_chords_and_noise() {
        let source = "Chorus\nG     C\nHal - le - lu - jah [D]\n\n\ncolumn_break\nAmen (repeat 3x)\n";
        assert_eq!(cleanup(source), "# Chorus\nHallelujah\n\nAmen\n\n");
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let source = "# Title\n[Intro 2x]\nG  D  Em\n\nVerse:\n  one [C]two \nthree\n\n\n## Bridge\n_\nsub - title\n";
        let once = cleanup(source);
        assert_eq!(cleanup(&once), once);
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        assert_eq!(
            segment(SONG, SegmentMode::LabelStyle),
            segment(SONG, SegmentMode::LabelStyle)
        );
    }
}
