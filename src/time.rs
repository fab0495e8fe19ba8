use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes since midnight, in `0..1440`.
///
/// All slot and preference comparisons happen on this integer form; the
/// 12-hour labels shown to people are derived from it and must round-trip
/// exactly through [`ClockTime::parse_label`].
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ClockTime(pub u16);

impl ClockTime {
    /// Construct from an hour-of-day and minute.
    ///
    /// # Examples
    /// ```
    /// use terminfinder::time::ClockTime;
    ///
    /// assert_eq!(ClockTime::from_hm(19, 30), ClockTime(1170));
    /// ```
    pub const fn from_hm(hour: u16, minute: u16) -> ClockTime {
        ClockTime(hour * 60 + minute)
    }

    /// Parse a 12-hour clock label such as `"8:00 AM"` or `"10:30 pm"`.
    ///
    /// # Examples
    /// ```
    /// use terminfinder::time::ClockTime;
    ///
    /// assert_eq!(ClockTime::parse_label("8:00 AM"), Some(ClockTime::from_hm(8, 0)));
    /// assert_eq!(ClockTime::parse_label("12:00 AM"), Some(ClockTime(0)));
    /// assert_eq!(ClockTime::parse_label("12:30 PM"), Some(ClockTime::from_hm(12, 30)));
    /// assert_eq!(ClockTime::parse_label("13:00 PM"), None);
    /// ```
    pub fn parse_label(label: &str) -> Option<ClockTime> {
        let (clock, marker) = label.trim().rsplit_once(' ')?;
        let (hour, minute) = clock.split_once(':')?;
        let hour: u16 = hour.parse().ok()?;
        let minute: u16 = minute.parse().ok()?;
        if !(1..=12).contains(&hour) || minute > 59 {
            return None;
        }
        let offset = if marker.eq_ignore_ascii_case("am") {
            0
        } else if marker.eq_ignore_ascii_case("pm") {
            12
        } else {
            return None;
        };
        Some(ClockTime::from_hm(hour % 12 + offset, minute))
    }

    /// Parse a strict 24-hour `HH:MM` string, two digits each.
    pub fn parse_hhmm(s: &str) -> Option<ClockTime> {
        let (hour, minute) = s.split_once(':')?;
        if hour.len() != 2 || minute.len() != 2 {
            return None;
        }
        let hour: u16 = hour.parse().ok()?;
        let minute: u16 = minute.parse().ok()?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(ClockTime::from_hm(hour, minute))
    }

    /// Parse the looser time spellings the extraction step emits inside
    /// preference strings: `"19:30"`, `"8pm"`, `"8:30 pm"`, `"9 AM"`.
    ///
    /// # Examples
    /// ```
    /// use terminfinder::time::ClockTime;
    ///
    /// assert_eq!(ClockTime::parse_loose("19:30"), Some(ClockTime::from_hm(19, 30)));
    /// assert_eq!(ClockTime::parse_loose("8pm"), Some(ClockTime::from_hm(20, 0)));
    /// assert_eq!(ClockTime::parse_loose("12am"), Some(ClockTime(0)));
    /// assert_eq!(ClockTime::parse_loose("whenever"), None);
    /// ```
    pub fn parse_loose(s: &str) -> Option<ClockTime> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        let (clock, offset) = if let Some(rest) = lower.strip_suffix("pm") {
            (rest.trim_end(), 12)
        } else if let Some(rest) = lower.strip_suffix("am") {
            (rest.trim_end(), 0)
        } else {
            // No marker: 24-hour clock.
            let (hour, minute) = lower.split_once(':')?;
            let hour: u16 = hour.parse().ok()?;
            let minute: u16 = minute.parse().ok()?;
            if hour > 23 || minute > 59 {
                return None;
            }
            return Some(ClockTime::from_hm(hour, minute));
        };
        let (hour, minute): (u16, u16) = match clock.split_once(':') {
            Some((h, m)) => (h.parse().ok()?, m.parse().ok()?),
            None => (clock.parse().ok()?, 0),
        };
        if !(1..=12).contains(&hour) || minute > 59 {
            return None;
        }
        Some(ClockTime::from_hm(hour % 12 + offset, minute))
    }

    /// The 12-hour label for this time, e.g. `"8:00 AM"` or `"7:30 PM"`.
    ///
    /// # Examples
    /// ```
    /// use terminfinder::time::ClockTime;
    ///
    /// assert_eq!(ClockTime::from_hm(19, 30).label(), "7:30 PM");
    /// assert_eq!(ClockTime(0).label(), "12:00 AM");
    /// assert_eq!(ClockTime::parse_label(&ClockTime::from_hm(14, 0).label()),
    ///     Some(ClockTime::from_hm(14, 0)));
    /// ```
    pub fn label(self) -> String {
        let (hour, minute) = (self.0 / 60, self.0 % 60);
        let marker = if hour < 12 { "AM" } else { "PM" };
        let hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hour, minute, marker)
    }
}

impl fmt::Display for ClockTime {
    /// 24-hour `HH:MM` rendering, matching the partial-constraint grammar.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Inclusive [start, end] range of clock times within one day.
///
/// A range whose end precedes its start wraps past midnight.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClockRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl ClockRange {
    pub fn new(start: ClockTime, end: ClockTime) -> ClockRange {
        ClockRange { start, end }
    }

    /// # Examples
    /// ```
    /// use terminfinder::time::{ClockRange, ClockTime};
    ///
    /// let workday = ClockRange::new(ClockTime::from_hm(9, 0), ClockTime::from_hm(17, 0));
    /// assert!(workday.contains(ClockTime::from_hm(12, 0)));
    /// assert!(!workday.contains(ClockTime::from_hm(19, 0)));
    ///
    /// // 10:00 PM through 1:00 AM wraps past midnight
    /// let late = ClockRange::new(ClockTime::from_hm(22, 0), ClockTime::from_hm(1, 0));
    /// assert!(late.contains(ClockTime::from_hm(23, 30)));
    /// assert!(late.contains(ClockTime::from_hm(0, 30)));
    /// assert!(!late.contains(ClockTime::from_hm(12, 0)));
    /// ```
    pub fn contains(&self, time: ClockTime) -> bool {
        if self.end < self.start {
            time >= self.start || time <= self.end
        } else {
            self.start <= time && time <= self.end
        }
    }
}

/// A time string that does not match the partial-constraint grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed time range {0:?}: expected HH:MM-HH:MM, <HH:MM, or >=HH:MM")]
pub struct MalformedTime(pub String);

/// One sub-day constraint window, parsed from the extraction payload's
/// `HH:MM-HH:MM` | `<HH:MM` | `>=HH:MM` grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeWindow {
    Between(ClockRange),
    Before(ClockTime),
    AtOrAfter(ClockTime),
}

impl TimeWindow {
    pub fn contains(&self, time: ClockTime) -> bool {
        match self {
            TimeWindow::Between(range) => range.contains(time),
            TimeWindow::Before(end) => time < *end,
            TimeWindow::AtOrAfter(start) => time >= *start,
        }
    }
}

impl FromStr for TimeWindow {
    type Err = MalformedTime;

    /// # Examples
    /// ```
    /// use terminfinder::time::{ClockTime, TimeWindow};
    ///
    /// let window: TimeWindow = ">=19:30".parse().unwrap();
    /// assert!(window.contains(ClockTime::from_hm(20, 0)));
    /// assert!(!window.contains(ClockTime::from_hm(19, 0)));
    ///
    /// assert!("sometime in the evening".parse::<TimeWindow>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedTime(s.to_string());
        if let Some(rest) = s.strip_prefix(">=") {
            ClockTime::parse_hhmm(rest)
                .map(TimeWindow::AtOrAfter)
                .ok_or_else(malformed)
        } else if let Some(rest) = s.strip_prefix('<') {
            ClockTime::parse_hhmm(rest)
                .map(TimeWindow::Before)
                .ok_or_else(malformed)
        } else if let Some((start, end)) = s.split_once('-') {
            match (ClockTime::parse_hhmm(start), ClockTime::parse_hhmm(end)) {
                (Some(start), Some(end)) => Ok(TimeWindow::Between(ClockRange::new(start, end))),
                _ => Err(malformed()),
            }
        } else {
            Err(malformed())
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeWindow::Between(range) => write!(f, "{}-{}", range.start, range.end),
            TimeWindow::Before(end) => write!(f, "<{}", end),
            TimeWindow::AtOrAfter(start) => write!(f, ">={}", start),
        }
    }
}

impl TryFrom<String> for TimeWindow {
    type Error = MalformedTime;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeWindow> for String {
    fn from(window: TimeWindow) -> String {
        window.to_string()
    }
}
