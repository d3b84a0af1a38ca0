//! WASM bindings for the slide editor.
//!
//! This crate exposes segmentation, cleanup, cursor lookup and title search
//! to JavaScript. Offsets crossing the boundary are UTF-16 code units, the
//! unit a browser text area reports for its selection.

use serde::{Deserialize, Serialize};
use slides_core::{SegmentMode, Slide, SlideKind, SongHeader, SongText};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Byte offset to UTF-16 offset conversion for one text.
struct OffsetMap {
    /// `(byte, utf16)` at every char boundary, including the end.
    points: Vec<(usize, usize)>,
}

impl OffsetMap {
    fn new(text: &str) -> Self {
        let mut utf16 = 0;
        let mut points: Vec<(usize, usize)> = text
            .char_indices()
            .map(|(byte, c)| {
                let point = (byte, utf16);
                utf16 += c.len_utf16();
                point
            })
            .collect();
        points.push((text.len(), utf16));
        Self { points }
    }

    fn to_utf16(&self, byte: usize) -> usize {
        match self.points.binary_search_by_key(&byte, |p| p.0) {
            Ok(i) => self.points[i].1,
            Err(i) => self.points[i.saturating_sub(1)].1,
        }
    }

    /// Byte offset of the char holding `utf16`, or `None` past the end.
    fn to_byte(&self, utf16: usize) -> Option<usize> {
        let upto = self.points.partition_point(|p| p.1 <= utf16);
        let (byte, _) = self.points[upto.checked_sub(1)?];
        let total = self.points.last().map_or(0, |p| p.1);
        (utf16 <= total).then_some(byte)
    }
}

/// A slide as handed to JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsSlide {
    pub text: String,
    pub kind: SlideKind,
    pub headers: Vec<String>,
    /// Start offset in UTF-16 code units.
    pub start: usize,
    /// End offset in UTF-16 code units.
    pub end: usize,
    pub is_label: bool,
    pub is_subtitle: bool,
}

impl JsSlide {
    fn from_slide(slide: Slide, offsets: &OffsetMap) -> Self {
        Self {
            start: offsets.to_utf16(slide.span.start),
            end: offsets.to_utf16(slide.span.end),
            is_label: slide.is_label(),
            is_subtitle: slide.is_subtitle(),
            text: slide.text,
            kind: slide.kind,
            headers: slide.headers,
        }
    }
}

/// A parsed song document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParsedSong {
    pub header: SongHeader,
    /// Where the body starts, in UTF-16 code units.
    pub body_offset: usize,
    pub slides: Vec<JsSlide>,
}

fn mode(label_style: bool) -> SegmentMode {
    if label_style {
        SegmentMode::LabelStyle
    } else {
        SegmentMode::HeaderStyle
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Split text into slides.
///
/// # Arguments
/// * `text` - The full editor text
/// * `label_style` - Emit labels as their own slides plus an end marker
#[wasm_bindgen]
pub fn segment(text: &str, label_style: bool) -> Result<JsValue, JsValue> {
    to_js(&segment_impl(text, label_style))
}

fn segment_impl(text: &str, label_style: bool) -> Vec<JsSlide> {
    let offsets = OffsetMap::new(text);
    slides_core::segment(text, mode(label_style))
        .into_iter()
        .map(|slide| JsSlide::from_slide(slide, &offsets))
        .collect()
}

/// Rewrite text keeping only what appears on slides.
#[wasm_bindgen]
pub fn cleanup(text: &str) -> String {
    slides_core::cleanup(text)
}

/// Index of the slide under the cursor, or `undefined`.
///
/// # Arguments
/// * `offset` - Cursor position in UTF-16 code units
#[wasm_bindgen]
pub fn locate(text: &str, offset: usize, label_style: bool) -> Option<usize> {
    let offsets = OffsetMap::new(text);
    let byte = offsets.to_byte(offset)?;
    let slides = slides_core::segment(text, mode(label_style));
    slides_core::PositionIndex::new(&slides).locate_index(byte)
}

/// Parse a song document into its header fields and slides.
#[wasm_bindgen]
pub fn parse_song(text: &str) -> Result<JsValue, JsValue> {
    to_js(&parse_song_impl(text))
}

fn parse_song_impl(text: &str) -> ParsedSong {
    let offsets = OffsetMap::new(text);
    let song = SongText::parse(text);

    ParsedSong {
        body_offset: offsets.to_utf16(song.body_offset()),
        slides: song
            .slides()
            .into_iter()
            .map(|slide| JsSlide::from_slide(slide, &offsets))
            .collect(),
        header: song.into_header(),
    }
}

/// Fuzzy match a search string against a title.
///
/// Returns `{ score, markup }` or `null` when the title does not match.
#[wasm_bindgen]
pub fn fuzzy_match(search: &str, candidate: &str) -> Result<JsValue, JsValue> {
    match slides_core::fuzzy_match(search, candidate) {
        Some(found) => to_js(&found),
        None => Ok(JsValue::NULL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_ascii() {
        let offsets = OffsetMap::new("abc");
        assert_eq!(offsets.to_utf16(2), 2);
        assert_eq!(offsets.to_byte(3), Some(3));
        assert_eq!(offsets.to_byte(4), None);
    }

    #[test]
    fn test_offsets_multibyte() {
        // 'å' is 2 bytes / 1 unit, '🎵' is 4 bytes / 2 units
        let text = "å🎵x";
        let offsets = OffsetMap::new(text);

        assert_eq!(offsets.to_utf16(0), 0);
        assert_eq!(offsets.to_utf16(2), 1);
        assert_eq!(offsets.to_utf16(6), 3);
        assert_eq!(offsets.to_utf16(7), 4);

        assert_eq!(offsets.to_byte(1), Some(2));
        // inside the surrogate pair
        assert_eq!(offsets.to_byte(2), Some(2));
        assert_eq!(offsets.to_byte(3), Some(6));
        assert_eq!(offsets.to_byte(4), Some(7));
    }

    #[test]
    fn test_segment_spans_in_utf16() {
        let slides = segment_impl("Å ja\n\nHej 🎵 då\n", false);

        assert_eq!(slides.len(), 2);
        assert_eq!((slides[0].start, slides[0].end), (0, 4));
        assert_eq!((slides[1].start, slides[1].end), (6, 15));
        assert!(!slides[1].is_label);
    }

    #[test]
    fn test_label_style_flags() {
        let slides = segment_impl("Chorus\n_\nHey\n", true);

        let kinds: Vec<_> = slides.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SlideKind::Label, SlideKind::Content, SlideKind::End]);
        assert!(slides[0].is_label);
        assert!(slides[1].is_subtitle);
        assert!(slides[2].is_label);
    }

    #[test]
    fn test_locate_uses_utf16() {
        let text = "🎵🎵\n\nHey\n";
        assert_eq!(locate(text, 1, false), Some(0));
        assert_eq!(locate(text, 5, false), None);
        assert_eq!(locate(text, 7, false), Some(1));
        assert_eq!(locate(text, 100, false), None);
    }

    #[test]
    fn test_parse_song() {
        let parsed = parse_song_impl("# Sång\n# Author: Åsa\nVerse:\nLa la\n");

        assert_eq!(parsed.header.title.as_deref(), Some("Sång"));
        assert_eq!(parsed.header.author.as_deref(), Some("Åsa"));
        assert_eq!(parsed.body_offset, 21);
        assert_eq!(parsed.slides.len(), 1);
        assert_eq!(parsed.slides[0].headers, vec!["Verse:"]);
        assert_eq!(parsed.slides[0].start, 28);
    }
}
