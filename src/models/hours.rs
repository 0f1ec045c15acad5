use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display, str::FromStr};

/// Time of day as reported by the hours provider.
///
/// `next_day` marks a `+`-prefixed time, i.e. one that falls after midnight
/// of the service day (a bar closing at 2am reports `+0200`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
    #[serde(default)]
    pub next_day: bool,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour,
            minute,
            next_day: false,
        }
    }

    pub fn next_day(hour: u8, minute: u8) -> Self {
        Self {
            hour,
            minute,
            next_day: true,
        }
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.next_day {
            write!(f, "+")?;
        }
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Error parsing a provider `HHMM` time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time: {0:?}")]
pub struct ClockTimeParseError(pub String);

impl FromStr for ClockTime {
    type Err = ClockTimeParseError;

    /// Parses `HHMM`, with an optional `+` prefix meaning "next day"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ClockTimeParseError(s.to_string());
        let (digits, next_day) = match s.strip_prefix('+') {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let hour: u8 = digits[0..2].parse().map_err(|_| err())?;
        let minute: u8 = digits[2..4].parse().map_err(|_| err())?;
        if hour > 24 || minute > 59 {
            return Err(err());
        }

        Ok(Self {
            hour,
            minute,
            next_day,
        })
    }
}

/// One recurring open interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursEntry {
    /// ISO weekday numbers, Monday = 1 .. Sunday = 7
    pub days: BTreeSet<u32>,
    pub open: ClockTime,
    pub close: ClockTime,
}

impl HoursEntry {
    /// Whether `hour` on `weekday` falls inside `[open, close)`.
    ///
    /// Only the hour component is compared. A next-day open sorts before every
    /// same-day hour and a next-day close never bounds one, so a range that
    /// ends after midnight never matches.
    pub fn covers(&self, weekday: u32, hour: u8) -> bool {
        let after_open = self.open.next_day || self.open.hour <= hour;
        let before_close = !self.close.next_day && hour < self.close.hour;
        self.days.contains(&weekday) && after_open && before_close
    }
}

/// A venue's weekly hours
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoursSchedule {
    pub entries: Vec<HoursEntry>,
}

impl HoursSchedule {
    pub fn new(entries: Vec<HoursEntry>) -> Self {
        Self { entries }
    }

    pub fn is_open_at(&self, weekday: u32, hour: u8) -> bool {
        self.entries.iter().any(|e| e.covers(weekday, hour))
    }
}

/// Human-readable hours as shown on the provider's venue page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayHours {
    /// e.g. "Open until 10:00 PM"
    pub status: Option<String>,
    /// e.g. "Mon–Fri : 9:00 AM–10:00 PM"
    pub lines: Vec<String>,
}
