//! Proleptic Gregorian calendar dates.
//!
//! Enough date arithmetic for deck titles and the calendar view: ISO week
//! numbers, weekdays, day/month stepping and a fuzzy "next Sunday" style
//! description relative to today.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 3000;

const SECONDS_PER_DAY: u64 = 86_400;

/// Day of the week, numbered as in ISO 8601 (Monday = 1, Sunday = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// ISO number, 1 through 7.
    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn from_number(n: u32) -> Option<Self> {
        Self::ALL.get(n.checked_sub(1)? as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Parse a full or three-letter English name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL.into_iter().find(|day| {
            let full = day.name().to_lowercase();
            lower == full || lower == full[..3]
        })
    }
}

/// A calendar date.
///
/// Serialized as its ISO `YYYY-MM-DD` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

/// Leap year in the Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    if year % 100 == 0 {
        year % 400 == 0
    } else {
        year % 4 == 0
    }
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 2 && is_leap_year(year) {
        29
    } else {
        MONTH_DAYS[(month.clamp(1, 12) - 1) as usize]
    }
}

impl CalendarDate {
    /// Earliest representable date.
    pub const MIN: CalendarDate = CalendarDate {
        year: MIN_YEAR,
        month: 1,
        day: 1,
    };

    /// Latest representable date.
    pub const MAX: CalendarDate = CalendarDate {
        year: MAX_YEAR,
        month: 12,
        day: 31,
    };

    /// Create a date, checking that it exists and the year is in 1000..=3000.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year)
            || !(1..=12).contains(&month)
            || day < 1
            || day > days_in_month(year, month)
        {
            return Err(Error::InvalidDate(format!(
                "{:04}-{:02}-{:02}",
                year, month, day
            )));
        }
        Ok(Self { year, month, day })
    }

    /// Parse a string starting with `YYYY-MM-DD`; anything after is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidDate(text.to_string());

        let prefix = text.get(..10).ok_or_else(invalid)?;
        let bytes = prefix.as_bytes();
        let digits_ok = bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
        if !digits_ok {
            return Err(invalid());
        }

        let year = prefix[0..4].parse().map_err(|_| invalid())?;
        let month = prefix[5..7].parse().map_err(|_| invalid())?;
        let day = prefix[8..10].parse().map_err(|_| invalid())?;
        Self::new(year, month, day).map_err(|_| invalid())
    }

    /// The UTC calendar date of a point in time, limited to
    /// [`CalendarDate::MIN`]..=[`CalendarDate::MAX`].
    pub fn from_system_time(time: SystemTime) -> Self {
        let days = match time.duration_since(UNIX_EPOCH) {
            Ok(since) => (since.as_secs() / SECONDS_PER_DAY) as i64,
            Err(before) => {
                let secs = before.duration().as_secs();
                -(secs.div_ceil(SECONDS_PER_DAY) as i64)
            }
        };
        Self::from_clamped_day_number(days)
    }

    /// Today's date in UTC.
    pub fn today() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Day of the week (Tomohiko Sakamoto's method).
    pub fn weekday(&self) -> Weekday {
        const T: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
        let y = if self.month < 3 { self.year - 1 } else { self.year };
        let sunday_zero = (y + y.div_euclid(4) - y.div_euclid(100)
            + y.div_euclid(400)
            + T[(self.month - 1) as usize]
            + self.day as i32)
            .rem_euclid(7);

        match sunday_zero {
            0 => Weekday::Sunday,
            n => Weekday::from_number(n as u32).unwrap_or(Weekday::Sunday),
        }
    }

    /// Day of the year, starting at 1.
    pub fn ordinal(&self) -> u32 {
        let jan_first = Self {
            year: self.year,
            month: 1,
            day: 1,
        };
        (self.day_number() - jan_first.day_number()) as u32 + 1
    }

    /// ISO 8601 week number: the week belongs to the year its Thursday is in.
    pub fn iso_week(&self) -> u32 {
        self.week_thursday().ordinal().div_ceil(7)
    }

    /// The year the ISO week belongs to.
    pub fn iso_week_year(&self) -> i32 {
        self.week_thursday().year
    }

    fn week_thursday(&self) -> Self {
        // may fall just outside MIN..=MAX; only used for week arithmetic
        Self::from_day_number(self.day_number() + 4 - self.weekday().number() as i64)
    }

    /// The latest date on or before this one that falls on `day`.
    pub fn week_start(&self, day: Weekday) -> Self {
        let back = (self.weekday().number() + 7 - day.number()) % 7;
        self.add_days(-(back as i64))
    }

    pub fn month_start(&self) -> Self {
        Self { day: 1, ..*self }
    }

    pub fn next_month(&self) -> u32 {
        if self.month == 12 {
            1
        } else {
            self.month + 1
        }
    }

    pub fn prev_month(&self) -> u32 {
        if self.month == 1 {
            12
        } else {
            self.month - 1
        }
    }

    /// Move by `n` days (negative for the past), carrying into months and years.
    ///
    /// Results stop at [`CalendarDate::MIN`] and [`CalendarDate::MAX`].
    pub fn add_days(&self, n: i64) -> Self {
        Self::from_clamped_day_number(self.day_number().saturating_add(n))
    }

    /// Move by `n` months, clamping the day to the target month's length.
    ///
    /// Results stop at the first month of [`CalendarDate::MIN`]'s year and the
    /// last month of [`CalendarDate::MAX`]'s year.
    pub fn add_months(&self, n: i32) -> Self {
        let first = i64::from(MIN_YEAR) * 12;
        let last = i64::from(MAX_YEAR) * 12 + 11;
        let total = (i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(n))
            .clamp(first, last);

        let year = total.div_euclid(12) as i32;
        let month = total.rem_euclid(12) as u32 + 1;
        let day = self.day.min(days_in_month(year, month));
        Self { year, month, day }
    }

    /// Days from this date to `other` (negative when `other` is earlier).
    pub fn days_until(&self, other: &CalendarDate) -> i64 {
        other.day_number() - self.day_number()
    }

    /// Describe this date relative to `today`: "tomorrow", "next Sunday",
    /// "3 weeks ago" and so on.
    pub fn fuzzy_relative(&self, today: &CalendarDate) -> String {
        let diff = today.days_until(self);
        let days = diff.unsigned_abs();
        let weeks = (days + 3) / 7;
        let months = days / 30;
        let years = days / 365;

        if diff >= 0 {
            match days {
                0 => "today".to_string(),
                1 => "tomorrow".to_string(),
                2..=7 => format!("next {}", self.weekday().name()),
                _ if weeks == 1 => "next week".to_string(),
                _ if years == 1 => "next year".to_string(),
                _ if years > 1 => format!("{} years from now", years),
                _ if months > 8 => format!("{} months from now", months),
                _ => format!("{} weeks from now", weeks),
            }
        } else {
            match days {
                1 => "yesterday".to_string(),
                2..=7 => format!("last {}", self.weekday().name()),
                _ if weeks == 1 => "last week".to_string(),
                _ if years == 1 => "a year ago".to_string(),
                _ if years > 1 => format!("{} years ago", years),
                _ if months > 8 => format!("{} months ago", months),
                _ => format!("{} weeks ago", weeks),
            }
        }
    }

    /// Days since 1970-01-01.
    fn day_number(&self) -> i64 {
        let y = if self.month <= 2 {
            self.year as i64 - 1
        } else {
            self.year as i64
        };
        let m = self.month as i64;
        let d = self.day as i64;

        let era = y.div_euclid(400);
        let yoe = y.rem_euclid(400);
        let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + d - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }

    fn from_clamped_day_number(days: i64) -> Self {
        let days = days.clamp(Self::MIN.day_number(), Self::MAX.day_number());
        Self::from_day_number(days)
    }

    fn from_day_number(days: i64) -> Self {
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
        let year = (yoe + era * 400 + i64::from(month <= 2)) as i32;
        Self { year, month, day }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}
