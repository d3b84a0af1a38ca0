//! Text-to-slides engine for worship song and deck documents.
//!
//! Turns free-form lyric text into an ordered list of slides, maps editor
//! cursor positions back to slides, and carries the small helpers around it:
//! the `#` header prefix of song documents, fuzzy title search and calendar
//! arithmetic for date-titled decks.

pub mod catalog;
pub mod date;
pub mod deck;
pub mod error;
pub mod fuzzy;
pub mod grammar;
pub mod header;
pub mod position;
pub mod segment;
pub mod song;
pub mod types;

pub use catalog::{Catalog, CatalogSnapshot, RecentRow, RecentUsage, SongMatch};
pub use date::{CalendarDate, Weekday};
pub use deck::{check_title, compare_titles, resolve_alias, Deck};
pub use error::{Error, Result, TitleProblem};
pub use fuzzy::{fuzzy_match, FuzzyMatch, FuzzyMatcher};
pub use grammar::{CleanupRule, Grammar, LineClass};
pub use header::{compose, parse_prefix, ExtraField, SongHeader, SongText};
pub use position::{locate, PositionIndex};
pub use segment::{cleanup, segment, Segmenter, END_MARKER};
pub use song::Song;
pub use types::{SegmentMode, Slide, SlideKind, Span};
