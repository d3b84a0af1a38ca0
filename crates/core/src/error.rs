//! Error types for song and deck records.
//!
//! Segmentation itself never fails; these errors only come from validating
//! records and parsing dates at the boundary.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating records or parsing dates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A date was out of range or not in `YYYY-MM-DD` form.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A deck title breaks the title rules.
    #[error("Invalid title {title:?}: {problem}")]
    InvalidTitle {
        title: String,
        problem: TitleProblem,
    },

    /// A song has no title.
    #[error("Song title is empty")]
    EmptyTitle,

    /// A song has no content.
    #[error("Song content is empty")]
    EmptyContent,
}

/// The reason a deck title was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleProblem {
    #[error("title is too short")]
    TooShort,

    #[error("title is too long")]
    TooLong,

    #[error("title has leading/trailing spaces")]
    MustTrim,

    #[error("title is reserved")]
    Reserved,

    #[error("title has invalid characters")]
    BadChars,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidTitle {
            title: "new".to_string(),
            problem: TitleProblem::Reserved,
        };
        assert_eq!(err.to_string(), "Invalid title \"new\": title is reserved");
        assert_eq!(
            Error::InvalidDate("2021-02-30".to_string()).to_string(),
            "Invalid date: 2021-02-30"
        );
    }
}
