//! The `#` header prefix of a song document.
//!
//! A song document starts with zero or more lines beginning with `#`. The
//! first plain one is the title; `# <Field>: <value>` lines fill in a small
//! fixed set of extra fields. The prefix is stripped before segmenting the
//! song for display and written back when saving.

use crate::segment::Segmenter;
use crate::types::{SegmentMode, Slide};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// `<field>: <value>` inside a header line (after the `#`).
static FIELD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*([a-z0-9]+)\s*:\s*(.*)").unwrap());

/// Named fields that may follow the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraField {
    Author,
    Ccli,
}

impl ExtraField {
    /// All extra fields, in the order they are written.
    pub const ALL: [ExtraField; 2] = [ExtraField::Author, ExtraField::Ccli];

    /// Name used when writing the header line.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Author => "Author",
            Self::Ccli => "CCLI",
        }
    }

    /// Look up a field by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "author" => Some(Self::Author),
            "ccli" => Some(Self::Ccli),
            _ => None,
        }
    }
}

/// Title and extra fields read from a document's header prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongHeader {
    pub title: Option<String>,
    pub author: Option<String>,
    pub ccli: Option<String>,
}

impl SongHeader {
    pub fn field(&self, field: ExtraField) -> Option<&str> {
        match field {
            ExtraField::Author => self.author.as_deref(),
            ExtraField::Ccli => self.ccli.as_deref(),
        }
    }

    /// Set a field; empty values clear it.
    pub fn set_field(&mut self, field: ExtraField, value: &str) {
        let value = Some(value.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        match field {
            ExtraField::Author => self.author = value,
            ExtraField::Ccli => self.ccli = value,
        }
    }

    /// Write the prefix back: `# <title>` then one line per extra field.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            out.push_str(&format!("# {}\n", title));
        }
        for field in ExtraField::ALL {
            out.push_str(&format!(
                "# {}: {}\n",
                field.display_name(),
                self.field(field).unwrap_or("")
            ));
        }

        out
    }
}

/// Read the header prefix of `text`.
///
/// Returns the header and the byte offset where the body starts. Parsing
/// stops at the first line not starting with `#`, or at a second non-field
/// `#` line once a title has been found; that line is left in the body.
pub fn parse_prefix(text: &str) -> (SongHeader, usize) {
    let mut header = SongHeader::default();
    let mut index = 0;

    while text[index..].starts_with('#') {
        let line_end = text[index..]
            .find('\n')
            .map_or(text.len(), |i| index + i);
        let next = (line_end + 1).min(text.len());
        let line = text[index + 1..line_end].trim();

        if let Some(caps) = FIELD_REGEX.captures(line) {
            if let Some(field) = ExtraField::from_name(&caps[1]) {
                header.set_field(field, &caps[2]);
                index = next;
                continue;
            }
        }

        if header.title.is_some() {
            break;
        }
        header.title = Some(line.to_string());
        index = next;
    }

    (header, index)
}

/// Put a header prefix in front of `body`, ending with a newline.
pub fn compose(header: &SongHeader, body: &str) -> String {
    let mut text = header.render();
    text.push_str(body);
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// A song document split into its header prefix and body.
#[derive(Debug, Clone)]
pub struct SongText<'a> {
    source: &'a str,
    header: SongHeader,
    body_offset: usize,
}

impl<'a> SongText<'a> {
    pub fn parse(source: &'a str) -> Self {
        let (header, body_offset) = parse_prefix(source);
        Self {
            source,
            header,
            body_offset,
        }
    }

    pub fn header(&self) -> &SongHeader {
        &self.header
    }

    pub fn into_header(self) -> SongHeader {
        self.header
    }

    /// Byte offset in the source where the body starts.
    pub fn body_offset(&self) -> usize {
        self.body_offset
    }

    pub fn body(&self) -> &'a str {
        &self.source[self.body_offset..]
    }

    /// Header-style slides of the body, with spans in the full document's
    /// offsets.
    pub fn slides(&self) -> Vec<Slide> {
        let mut slides = Segmenter::new(SegmentMode::HeaderStyle).segment(self.body());
        for slide in &mut slides {
            slide.span = slide.span.shifted(self.body_offset);
        }
        slides
    }
}
