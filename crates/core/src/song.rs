//! Song records.

use crate::error::{Error, Result};
use crate::header::{compose, SongHeader, SongText};
use crate::segment::segment;
use crate::types::{SegmentMode, Slide};
use serde::{Deserialize, Serialize};

/// A song: header fields plus the lyric body (without the `#` prefix).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub ccli: Option<String>,
    pub text: String,
    /// Imported from an external catalog rather than written locally.
    #[serde(default)]
    pub imported: bool,
}

impl Song {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Build a song from a full document, reading the header prefix.
    pub fn from_document(id: Option<u64>, document: &str) -> Self {
        let parsed = SongText::parse(document);
        let body = parsed.body().to_string();
        let header = parsed.into_header();

        Self {
            id,
            title: header.title.unwrap_or_default(),
            author: header.author,
            ccli: header.ccli,
            text: body,
            imported: false,
        }
    }

    /// A song needs a title and some lyrics.
    pub fn check(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }
        if self.text.trim().is_empty() {
            return Err(Error::EmptyContent);
        }
        Ok(())
    }

    pub fn header(&self) -> SongHeader {
        SongHeader {
            title: Some(self.title.clone()),
            author: self.author.clone(),
            ccli: self.ccli.clone(),
        }
    }

    /// The full document as saved: header prefix followed by the body.
    pub fn document(&self) -> String {
        compose(&self.header(), &self.text)
    }

    pub fn slides(&self) -> Vec<Slide> {
        segment(&self.text, SegmentMode::HeaderStyle)
    }

    /// Text to insert into a deck: a title line tagged with the song id,
    /// followed by the body.
    pub fn paste_text(&self) -> String {
        let mut text = match self.id {
            Some(id) => format!("# {} (@{})\n", self.title, id),
            None => format!("# {}\n", self.title),
        };
        text.push_str(self.text.trim_end_matches('\n'));
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "# Amazing Grace\n# Author: John Newton\n# CCLI: 22025\nVerse 1:\nAmazing grace\nhow sweet the sound\n";

    #[test]
    fn test_from_document() {
        let song = Song::from_document(Some(7), DOCUMENT);

        assert_eq!(song.id, Some(7));
        assert_eq!(song.title, "Amazing Grace");
        assert_eq!(song.author.as_deref(), Some("John Newton"));
        assert_eq!(song.ccli.as_deref(), Some("22025"));
        assert_eq!(song.text, "Verse 1:\nAmazing grace\nhow sweet the sound\n");
    }

    #[test]
    fn test_document_round_trip() {
        let song = Song::from_document(None, DOCUMENT);
        assert_eq!(song.document(), DOCUMENT);
    }

    #[test]
    fn test_check() {
        assert!(Song::new("Title", "Lyrics").check().is_ok());
        assert_eq!(Song::new("  ", "Lyrics").check(), Err(Error::EmptyTitle));
        assert_eq!(Song::new("Title", "\n\n").check(), Err(Error::EmptyContent));
    }

    #[test]
    fn test_slides() {
        let song = Song::from_document(None, DOCUMENT);
        let slides = song.slides();

        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].headers, vec!["Verse 1:"]);
        assert_eq!(slides[0].text, "Amazing grace\nhow sweet the sound");
    }

    #[test]
    fn test_paste_text() {
        let song = Song::new("Holy", "Holy holy\n").with_id(42);
        assert_eq!(song.paste_text(), "# Holy (@42)\nHoly holy\n");
        assert_eq!(Song::new("Holy", "Holy").paste_text(), "# Holy\nHoly\n");
    }

    #[test]
    fn test_deserialize_defaults() {
        let song: Song = serde_json::from_str(r#"{"title":"Hey","text":"Ho"}"#).unwrap();
        assert_eq!(song, Song::new("Hey", "Ho"));
    }
}
