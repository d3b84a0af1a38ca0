//! The song and deck collection.
//!
//! A [`Catalog`] hands out immutable [`CatalogSnapshot`]s. Refreshing builds a
//! whole new snapshot and swaps it in; anyone still holding the previous one
//! keeps a consistent view.

use crate::date::CalendarDate;
use crate::deck::{title_date, Deck};
use crate::fuzzy::{escape_markup, normalize_search, FuzzyMatcher};
use crate::song::Song;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Number of decks shown in the recent usage table.
pub const RECENT_LIMIT: usize = 25;

/// A song found by [`CatalogSnapshot::search`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongMatch<'a> {
    pub song: &'a Song,
    pub score: u32,
    pub markup: String,
}

/// Which recent decks used which songs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecentUsage {
    /// One label per deck, most recent first.
    pub columns: Vec<String>,
    pub rows: Vec<RecentRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentRow {
    pub song_id: u64,
    pub title: String,
    /// `used[i]` is set when the deck in column `i` includes this song.
    pub used: Vec<bool>,
}

/// One consistent view of all songs and decks.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    songs: Vec<Song>,
    by_id: HashMap<u64, usize>,
    decks: Vec<Deck>,
}

impl CatalogSnapshot {
    /// Build a snapshot. Songs and decks that fail validation are skipped, as
    /// is any song reusing an id already taken by an earlier song.
    pub fn build(songs: Vec<Song>, decks: Vec<Deck>) -> Self {
        let mut seen = HashSet::new();
        let mut songs: Vec<Song> = songs
            .into_iter()
            .filter(|song| {
                if let Err(e) = song.check() {
                    log::warn!("skipping song {:?}: {}", song.title, e);
                    return false;
                }
                match song.id {
                    Some(id) if !seen.insert(id) => {
                        log::warn!("skipping song {:?}: duplicate id {}", song.title, id);
                        false
                    }
                    _ => true,
                }
            })
            .collect();
        songs.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        let by_id = songs
            .iter()
            .enumerate()
            .filter_map(|(i, song)| song.id.map(|id| (id, i)))
            .collect();

        let mut decks: Vec<Deck> = decks
            .into_iter()
            .filter(|deck| match deck.check() {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("skipping deck: {}", e);
                    false
                }
            })
            .collect();
        decks.sort_by(|a, b| a.compare(b));

        Self {
            songs,
            by_id,
            decks,
        }
    }

    /// All songs, by title.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// All decks, dated ones newest first.
    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn song(&self, id: u64) -> Option<&Song> {
        self.by_id.get(&id).map(|&i| &self.songs[i])
    }

    pub fn deck(&self, title: &str) -> Option<&Deck> {
        self.decks.iter().find(|deck| deck.title == title)
    }

    /// Fuzzy search over song titles.
    ///
    /// An empty query lists every song. Equal scores put locally written
    /// songs before imported ones, then sort by title.
    pub fn search(&self, query: &str) -> Vec<SongMatch<'_>> {
        if normalize_search(query).is_empty() {
            return self
                .songs
                .iter()
                .map(|song| SongMatch {
                    song,
                    score: 0,
                    markup: escape_markup(&song.title),
                })
                .collect();
        }

        FuzzyMatcher::new()
            .rank(
                query,
                &self.songs,
                |song| song.title.as_str(),
                |a, b| a.imported.cmp(&b.imported).then_with(|| a.title.cmp(&b.title)),
            )
            .into_iter()
            .map(|ranked| SongMatch {
                song: ranked.item,
                score: ranked.found.score,
                markup: ranked.found.markup,
            })
            .collect()
    }

    /// Song usage over the most recent decks that include songs.
    ///
    /// Dated decks are labelled relative to `today`. Rows are ordered by song
    /// id; ids with no song in the catalog are left out.
    pub fn recent(&self, today: &CalendarDate) -> RecentUsage {
        let recent: Vec<(&Deck, Vec<u64>)> = self
            .decks
            .iter()
            .map(|deck| (deck, deck.song_ids()))
            .filter(|(_, ids)| !ids.is_empty())
            .take(RECENT_LIMIT)
            .collect();

        let columns = recent
            .iter()
            .map(|(deck, _)| match title_date(&deck.title) {
                Some(date) => date.fuzzy_relative(today),
                None => deck.title.clone(),
            })
            .collect();

        let used_ids: BTreeSet<u64> = recent
            .iter()
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        let rows = used_ids
            .into_iter()
            .filter_map(|id| {
                let song = self.song(id)?;
                Some(RecentRow {
                    song_id: id,
                    title: song.title.clone(),
                    used: recent.iter().map(|(_, ids)| ids.contains(&id)).collect(),
                })
            })
            .collect();

        RecentUsage { columns, rows }
    }
}

/// Holds the current snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    current: Arc<CatalogSnapshot>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.current)
    }

    /// Replace the contents with a new snapshot and return it.
    pub fn refresh(&mut self, songs: Vec<Song>, decks: Vec<Deck>) -> Arc<CatalogSnapshot> {
        let snapshot = Arc::new(CatalogSnapshot::build(songs, decks));
        log::info!(
            "catalog refreshed: {} songs, {} decks",
            snapshot.songs.len(),
            snapshot.decks.len()
        );
        self.current = Arc::clone(&snapshot);
        snapshot
    }
}
