//! Line grammar for song text.
//!
//! Everything the segmenter knows about lines lives here as data: an ordered
//! table of cleanup substitutions, the chord token pattern and the
//! title/section label pattern. The segmenter only asks a [`Grammar`] to
//! classify each line.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Upper bound on cleanup passes, for custom rules that can grow a line.
const MAX_CLEANUP_PASSES: usize = 16;

/// A single chord symbol: `G`, `F#m`, `Bbmaj7`, `Dsus4`, `C2.`.
const CHORD_PATTERN: &str = r"^[A-G](?:##?|bb?)?(?:(?:m|sus|maj|min|aug|dim)?\d?)?\.?$";

/// Section labels and titles.
///
/// 1. `word[ word]:`, colon included
/// 2. `#` markdown-style header, text after the hashes
/// 3. a section keyword with optional number and `Nx` multiplier, optionally
///    in brackets (brackets excluded)
const TITLE_PATTERN: &str = r"(?i)^(?:([a-zåäö0-9]+(?:\s+[a-zåäö0-9]+)?:)|#+(.*)|\[?((?:intro|outro|chorus|bridge|verse)(?:\s*\d+)?(?:\s*[0-9]x)?)\]?)$";

static STANDARD: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::new(
        vec![
            CleanupRule::new("repeat", r"(?i)\(repeat.*?\)", ""),
            CleanupRule::new("column_break", r"(?i)\bcolumn_break\b", ""),
            CleanupRule::new(
                "inline_chord",
                r"(?i)\[[A-G](?:##?|bb?)?(?:(?:m|sus|maj|min|aug|dim)?\d?)?\.?\]",
                "",
            ),
            // [G/// | C2/G/ |], [G /// | C2/// | 2x|], You [Dadd4]face
            CleanupRule::new(
                "chord_group",
                r"\[(?:(?:[A-G][a-z0-9]{0,4}|[0-9]x)[|/\s]*)+\]",
                "",
            ),
            CleanupRule::new("whitespace", r"\s{2,}", " "),
            // sna - ror -> snaror
            CleanupRule::new("syllable_join", r"(\w) +- +(\w)", "${1}${2}"),
        ],
        Regex::new(CHORD_PATTERN).unwrap(),
        Regex::new(TITLE_PATTERN).unwrap(),
    )
});

/// One match/replace step of line cleanup.
#[derive(Debug, Clone)]
pub struct CleanupRule {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl CleanupRule {
    /// Build a rule from a pattern known to be valid.
    ///
    /// # Panics
    /// Panics if `pattern` does not compile; use [`CleanupRule::from_regex`]
    /// for patterns that are not compile-time constants.
    pub fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self::from_regex(name, Regex::new(pattern).unwrap(), replacement)
    }

    /// Build a rule from an already compiled regex.
    pub fn from_regex(name: &'static str, pattern: Regex, replacement: &'static str) -> Self {
        Self {
            name,
            pattern,
            replacement,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the substitution to every match in `line`.
    pub fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(line, self.replacement)
    }
}

/// What a single source line means to the segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Nothing but chord symbols; invisible to segmentation.
    Chords,
    /// A blank line or a title/label line. Ends the current slide.
    Boundary { label: Option<String> },
    /// Displayable text, already cleaned.
    Text(String),
}

/// Cleanup rules plus the chord and title patterns.
#[derive(Debug, Clone)]
pub struct Grammar {
    cleanups: Vec<CleanupRule>,
    chord: Regex,
    title: Regex,
}

impl Grammar {
    /// Create a grammar from its parts.
    ///
    /// The title pattern's first non-empty capture group is used as the label.
    pub fn new(cleanups: Vec<CleanupRule>, chord: Regex, title: Regex) -> Self {
        Self {
            cleanups,
            chord,
            title,
        }
    }

    /// The grammar used for song and deck text.
    pub fn standard() -> &'static Grammar {
        &STANDARD
    }

    /// Cleanup rules in the order they are applied.
    pub fn cleanups(&self) -> &[CleanupRule] {
        &self.cleanups
    }

    /// Trim a line and run the cleanup table over it until it stops changing.
    pub fn clean_line(&self, line: &str) -> String {
        let mut current = line.trim().to_string();

        for _ in 0..MAX_CLEANUP_PASSES {
            let mut next = current.clone();
            for rule in &self.cleanups {
                next = rule.apply(&next).into_owned();
            }
            let next = next.trim();

            if next == current {
                break;
            }
            current = next.to_string();
        }

        current
    }

    /// Whether a single token is a chord symbol.
    pub fn is_chord(&self, token: &str) -> bool {
        self.chord.is_match(token)
    }

    /// Whether a line holds at least one token and every token is a chord.
    ///
    /// Tokens are separated by whitespace, `/` and `|`.
    pub fn is_chord_line(&self, line: &str) -> bool {
        let mut any_chord = false;

        for token in line
            .split(|c: char| c.is_whitespace() || c == '/' || c == '|')
            .filter(|t| !t.is_empty())
        {
            if !self.is_chord(token) {
                return false;
            }
            any_chord = true;
        }

        any_chord
    }

    /// Match a cleaned line against the title pattern.
    ///
    /// Returns `None` if the line is not a title, `Some(None)` if it is a
    /// title with no label text (a bare `#`), and `Some(Some(label))`
    /// otherwise.
    pub fn title(&self, line: &str) -> Option<Option<String>> {
        let caps = self.title.captures(line)?;

        let label = caps
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str().trim())
            .find(|s| !s.is_empty())
            .map(str::to_string);

        Some(label)
    }

    /// Classify one raw source line.
    pub fn classify(&self, raw: &str) -> LineClass {
        let line = self.clean_line(raw);

        if self.is_chord_line(&line) {
            return LineClass::Chords;
        }

        if line.is_empty() {
            return LineClass::Boundary { label: None };
        }

        match self.title(&line) {
            Some(label) => LineClass::Boundary { label },
            None => LineClass::Text(line),
        }
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::standard().clone()
    }
}
