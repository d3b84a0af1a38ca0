//! Fuzzy title matching.
//!
//! The search characters must appear in order in the candidate; matches at
//! the start of a word score more than matches inside one. Alongside the
//! score a markup string is produced with the matched runs wrapped in
//! emphasis markers, ready to drop into a result list.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

const WORD_START_SCORE: u32 = 3;
const MIDDLE_SCORE: u32 = 1;
const SUBSTRING_SCORE: u32 = 6;
const FULL_MATCH_SCORE: u32 = 12;

/// Lowercase one character and strip its diacritics.
fn fold_char(c: char) -> char {
    let base = std::iter::once(c).nfd().next().unwrap_or(c);
    base.to_lowercase().next().unwrap_or(base)
}

/// Lowercase `text` and strip diacritics, one output character per input
/// character.
pub fn normalize(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

/// Normalize a search string: like [`normalize`] with whitespace removed.
pub fn normalize_search(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(fold_char)
        .collect()
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

/// HTML-escape `text` the same way match markup is escaped.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(&mut out, c);
    }
    out
}

/// A successful match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    pub score: u32,
    /// The candidate, HTML-escaped, with matched runs wrapped in markers.
    pub markup: String,
}

/// A ranked item from [`FuzzyMatcher::rank`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked<'a, T> {
    pub item: &'a T,
    pub found: FuzzyMatch,
}

/// Scores search strings against candidate titles.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    open: String,
    close: String,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyMatcher {
    /// Matcher emitting `<ins>`/`</ins>` around matched runs.
    pub fn new() -> Self {
        Self {
            open: "<ins>".to_string(),
            close: "</ins>".to_string(),
        }
    }

    pub fn with_markers(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open = open.into();
        self.close = close.into();
        self
    }

    /// Match a raw search string against `candidate`.
    pub fn find(&self, search: &str, candidate: &str) -> Option<FuzzyMatch> {
        self.find_normalized(&normalize_search(search), candidate)
    }

    /// Match a search string already passed through [`normalize_search`].
    ///
    /// Characters are aligned greedily left to right. Whitespace in the
    /// candidate is skipped and makes the next character a word start.
    pub fn find_normalized(&self, search: &str, candidate: &str) -> Option<FuzzyMatch> {
        let search: Vec<char> = search.chars().collect();
        if search.is_empty() {
            return None;
        }

        let mut markup = String::with_capacity(candidate.len() + 16);
        let mut compact = String::with_capacity(candidate.len());
        let mut pending_space = String::new();
        let mut si = 0;
        let mut score = 0;
        let mut word_start = true;
        let mut in_run = false;

        for c in candidate.chars() {
            if c.is_whitespace() {
                word_start = true;
                if in_run {
                    pending_space.push(c);
                } else {
                    push_escaped(&mut markup, c);
                }
                continue;
            }

            let folded = fold_char(c);
            compact.push(folded);

            if search.get(si) == Some(&folded) {
                if !in_run {
                    markup.push_str(&self.open);
                    in_run = true;
                }
                score += if word_start {
                    WORD_START_SCORE
                } else {
                    MIDDLE_SCORE
                };
                si += 1;
            } else if in_run {
                markup.push_str(&self.close);
                in_run = false;
            }

            // whitespace between two matched characters stays inside the run
            markup.push_str(&pending_space);
            pending_space.clear();
            push_escaped(&mut markup, c);
            word_start = false;
        }

        if si < search.len() {
            return None;
        }

        if in_run {
            markup.push_str(&self.close);
        }
        markup.push_str(&pending_space);

        let search: String = search.into_iter().collect();
        if compact == search {
            score += FULL_MATCH_SCORE;
        } else if compact.contains(&search) {
            score += SUBSTRING_SCORE;
        }

        Some(FuzzyMatch { score, markup })
    }

    /// Match every item and sort the hits by score, best first.
    ///
    /// Equal scores are ordered by `tie_break`; items that do not match are
    /// left out.
    pub fn rank<'a, T, F, C>(
        &self,
        search: &str,
        items: &'a [T],
        title_of: F,
        tie_break: C,
    ) -> Vec<Ranked<'a, T>>
    where
        F: Fn(&T) -> &str,
        C: Fn(&T, &T) -> Ordering,
    {
        let search = normalize_search(search);

        let mut ranked: Vec<Ranked<'a, T>> = items
            .iter()
            .filter_map(|item| {
                self.find_normalized(&search, title_of(item))
                    .map(|found| Ranked { item, found })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.found
                .score
                .cmp(&a.found.score)
                .then_with(|| tie_break(a.item, b.item))
        });
        ranked
    }
}

/// Match `search` against `candidate` with the default markers.
pub fn fuzzy_match(search: &str, candidate: &str) -> Option<FuzzyMatch> {
    FuzzyMatcher::new().find(search, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsequence_match() {
        let found = fuzzy_match("cls", "Come Let Us Sing").unwrap();
        assert_eq!(found.markup, "<ins>C</ins>ome <ins>L</ins>et U<ins>s</ins> Sing");
        assert_eq!(found.score, 7);
    }

    #[test]
    fn test_no_match() {
        assert!(fuzzy_match("xyz", "Come Let Us Sing").is_none());
        assert!(fuzzy_match("singx", "Come Let Us Sing").is_none());
    }

    #[test]
    fn test_empty_search_never_matches() {
        assert!(fuzzy_match("", "Anything").is_none());
        assert!(fuzzy_match("  ", "Anything").is_none());
    }

    #[test]
    fn test_full_match_bonus() {
        let found = fuzzy_match("Amazing Grace", "Amazing Grace").unwrap();
        assert_eq!(found.markup, "<ins>Amazing Grace</ins>");
        // a + mazing + g + race, plus the full match bonus
        assert_eq!(found.score, 3 + 6 + 3 + 4 + 12);
    }

    #[test]
    fn test_substring_bonus() {
        let found = fuzzy_match("holy", "Holy Holy Holy").unwrap();
        assert_eq!(found.markup, "<ins>Holy</ins> Holy Holy");
        assert_eq!(found.score, 3 + 1 + 1 + 1 + 6);
    }

    #[test]
    fn test_diacritics_and_case_fold() {
        assert_eq!(normalize("Åh Ängel"), "ah angel");
        assert_eq!(normalize_search(" Ö  ver "), "over");

        let found = fuzzy_match("aa", "Åh Ängel").unwrap();
        assert_eq!(found.markup, "<ins>Å</ins>h <ins>Ä</ins>ngel");
        assert_eq!(found.score, 6);
    }

    #[test]
    fn test_markup_is_escaped() {
        let found = fuzzy_match("rock", "Rock & <Roll>").unwrap();
        assert_eq!(found.markup, "<ins>Rock</ins> &amp; &lt;Roll&gt;");
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup("Tom & \"Jerry\""), "Tom &amp; &quot;Jerry&quot;");
    }

    #[test]
    fn test_custom_markers() {
        let matcher = FuzzyMatcher::new().with_markers("[", "]");
        let found = matcher.find("ls", "Let Us Sing").unwrap();
        assert_eq!(found.markup, "[L]et U[s] Sing");
    }

    #[test]
    fn test_rank_orders_by_score_then_tie_break() {
        let items = vec![
            ("Come Let Us Sing", true),
            ("Silent Night", false),
            ("Come Lord", false),
            ("Clap", false),
        ];
        let ranked = FuzzyMatcher::new().rank(
            "cl",
            &items,
            |item| item.0,
            |a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)),
        );
        let titles: Vec<_> = ranked.iter().map(|r| r.item.0).collect();

        // "Clap" gets the substring bonus; the other two tie on 6
        assert_eq!(titles, vec!["Clap", "Come Lord", "Come Let Us Sing"]);
        assert_eq!(ranked[0].found.score, 3 + 1 + 6);
    }
}
