//! Decks: the set list for one service, usually titled by its date.

use crate::date::{CalendarDate, Weekday};
use crate::error::{Error, Result, TitleProblem};
use crate::segment::{cleanup, segment};
use crate::types::{SegmentMode, Slide};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::LazyLock;

pub const MIN_TITLE_LENGTH: usize = 4;
pub const MAX_TITLE_LENGTH: usize = 32;

/// Punctuation allowed in deck titles besides letters and digits.
const TITLE_PUNCTUATION: &str = " -._";

/// Words with a special meaning as deck titles (see [`resolve_alias`]).
const RESERVED_TITLES: [&str; 6] = ["new", "deck", "decks", "current", "next", "last"];

/// A song reference pasted into a deck: `# Title (@123)`.
static SONG_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#.*\(@([0-9]+)\)").unwrap());

fn is_reserved(title: &str) -> bool {
    let lower = title.to_lowercase();
    RESERVED_TITLES.contains(&lower.as_str()) || Weekday::from_name(&lower).is_some()
}

/// Check a deck title against the naming rules.
pub fn check_title(title: &str) -> Result<()> {
    let problem = if title.len() < MIN_TITLE_LENGTH {
        Some(TitleProblem::TooShort)
    } else if title.len() > MAX_TITLE_LENGTH {
        Some(TitleProblem::TooLong)
    } else if title != title.trim() {
        Some(TitleProblem::MustTrim)
    } else if is_reserved(title) {
        Some(TitleProblem::Reserved)
    } else if !title
        .chars()
        .all(|c| c.is_alphanumeric() || TITLE_PUNCTUATION.contains(c))
    {
        Some(TitleProblem::BadChars)
    } else {
        None
    };

    match problem {
        Some(problem) => Err(Error::InvalidTitle {
            title: title.to_string(),
            problem,
        }),
        None => Ok(()),
    }
}

/// The date a title names, if it is exactly `YYYY-MM-DD`.
pub fn title_date(title: &str) -> Option<CalendarDate> {
    if title.len() != 10 {
        return None;
    }
    CalendarDate::parse(title).ok()
}

/// Deck ordering: dated titles first, newest first, then the rest by title.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    match (title_date(a), title_date(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Turn a relative deck name into a date title, relative to `today`.
///
/// - `last`: the most recent Sunday (today on a Sunday)
/// - `current`, `sunday`, `sun`: the Sunday after that
/// - a weekday name, full or short: that day in the week starting last
///   Sunday if it is still ahead, otherwise in the next week
///
/// Anything else comes back unchanged.
pub fn resolve_alias(title: &str, today: CalendarDate) -> String {
    // days since Sunday
    let weekday = (today.weekday().number() % 7) as i64;
    let last_sunday = today.add_days(-weekday);

    let lower = title.trim().to_lowercase();
    let resolved = match lower.as_str() {
        "last" => last_sunday,
        "current" => last_sunday.add_days(7),
        _ => match Weekday::from_name(&lower) {
            Some(Weekday::Sunday) => last_sunday.add_days(7),
            Some(day) => {
                let mut target = day.number() as i64;
                if weekday >= target {
                    target += 7;
                }
                last_sunday.add_days(target)
            }
            None => return title.to_string(),
        },
    };

    log::debug!("resolved deck alias {:?} to {}", title, resolved);
    resolved.to_string()
}

/// A deck: a title and free text mixing pasted songs and notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    pub text: String,
}

impl Deck {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn check(&self) -> Result<()> {
        check_title(&self.title)
    }

    pub fn date(&self) -> Option<CalendarDate> {
        title_date(&self.title)
    }

    pub fn slides(&self) -> Vec<Slide> {
        segment(&self.text, SegmentMode::HeaderStyle)
    }

    /// Ids of the songs pasted into this deck, in order of appearance.
    pub fn song_ids(&self) -> Vec<u64> {
        self.text
            .lines()
            .filter_map(|line| SONG_ID_REGEX.captures(line))
            .filter_map(|caps| caps[1].parse().ok())
            .collect()
    }

    /// The deck text as it would be saved after cleanup.
    pub fn cleaned(&self) -> String {
        cleanup(&self.text)
    }

    /// Order decks the way they are listed.
    pub fn compare(&self, other: &Deck) -> Ordering {
        compare_titles(&self.title, &other.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(title: &str) -> Option<TitleProblem> {
        match check_title(title) {
            Err(Error::InvalidTitle { problem, .. }) => Some(problem),
            _ => None,
        }
    }

    #[test]
    fn test_check_title() {
        assert!(check_title("2024-03-10").is_ok());
        assert!(check_title("Easter vigil").is_ok());
        assert!(check_title("Höstmässa_2.0").is_ok());

        assert_eq!(problem("abc"), Some(TitleProblem::TooShort));
        assert_eq!(problem(&"x".repeat(33)), Some(TitleProblem::TooLong));
        assert_eq!(problem(" padded "), Some(TitleProblem::MustTrim));
        assert_eq!(problem("Decks"), Some(TitleProblem::Reserved));
        assert_eq!(problem("FRIDAY"), Some(TitleProblem::Reserved));
        assert_eq!(problem("What?!"), Some(TitleProblem::BadChars));
        assert_eq!(problem("a/b/c"), Some(TitleProblem::BadChars));
    }

    #[test]
    fn test_title_ordering() {
        let mut titles = vec!["Easter", "2023-12-24", "Advent", "2024-03-10", "2024-01-07"];
        titles.sort_by(|a, b| compare_titles(a, b));
        assert_eq!(
            titles,
            vec!["2024-03-10", "2024-01-07", "2023-12-24", "Advent", "Easter"]
        );
    }

    #[test]
    fn test_resolve_alias_on_monday() {
        let monday = CalendarDate::new(2026, 10, 19).unwrap();

        assert_eq!(resolve_alias("last", monday), "2026-10-18");
        assert_eq!(resolve_alias("Current", monday), "2026-10-25");
        assert_eq!(resolve_alias("sun", monday), "2026-10-25");
        assert_eq!(resolve_alias("mon", monday), "2026-10-26");
        assert_eq!(resolve_alias("Friday", monday), "2026-10-23");
        assert_eq!(resolve_alias("Choir practice", monday), "Choir practice");
    }

    #[test]
    fn test_resolve_alias_on_sunday() {
        let sunday = CalendarDate::new(2026, 10, 18).unwrap();

        assert_eq!(resolve_alias("last", sunday), "2026-10-18");
        assert_eq!(resolve_alias("current", sunday), "2026-10-25");
        assert_eq!(resolve_alias("sat", sunday), "2026-10-24");
    }

    #[test]
    fn test_song_ids() {
        let deck = Deck::new(
            "2024-03-10",
            concat!(
                "# Amazing Grace (@12)\nAmazing grace\n\n",
                "  # Holy (@7)\nHoly\n\n",
                "note (@3)\n# Psalm (@x)\n",
            ),
        );
        assert_eq!(deck.song_ids(), vec![12, 7]);
    }

    #[test]
    fn test_deck_slides_and_cleanup() {
        let deck = Deck::new("2024-03-10", "# Holy (@7)\nG  C\nHoly holy\n\n\nWelcome!\n");

        let slides = deck.slides();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].headers, vec!["Holy (@7)"]);
        assert_eq!(deck.cleaned(), "# Holy (@7)\nHoly holy\n\nWelcome!\n\n");
        assert_eq!(deck.date(), CalendarDate::new(2024, 3, 10).ok());
    }
}
