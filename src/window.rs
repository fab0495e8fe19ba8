use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The inclusive date window an event may be scheduled in.
///
/// The timezone is a carried label only; all dates are timezone-naive
/// calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(rename = "tz")]
    pub timezone: String,
}

impl EventWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, timezone: &str) -> EventWindow {
        EventWindow {
            start,
            end,
            timezone: timezone.to_string(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn expand(&self) -> Vec<NaiveDate> {
        expand(self.start, self.end)
    }
}

/// Every calendar date from `start` to `end` inclusive, ascending.
///
/// An inverted window is a valid, empty scheduling space rather than an
/// error.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use terminfinder::window::expand;
///
/// let start = NaiveDate::from_ymd_opt(2025, 8, 30).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
///
/// assert_eq!(expand(start, end), vec![
///     NaiveDate::from_ymd_opt(2025, 8, 30).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
/// ]);
/// assert!(expand(end, start).is_empty());
/// ```
pub fn expand(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|date| *date <= end).collect()
}
