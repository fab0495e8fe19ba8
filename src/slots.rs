use crate::record::{ParticipantAvailabilityRecord, TimePreference};
use crate::time::{ClockRange, ClockTime, MalformedTime};
use chrono::{Datelike, NaiveDate, Weekday};
use log::debug;
use serde::{Deserialize, Serialize};

/// Every participant starts here; preferences only ever move the needle
/// from this point.
pub const SUITABILITY_BASELINE: f64 = 0.5;

/// Individual suitability above this counts the participant as suited to
/// the slot.
const SUITABLE_CUTOFF: f64 = 0.6;

/// Mean slot scores at or below this are not worth presenting.
const DISCARD_CUTOFF: f64 = 0.3;

const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    fn from_mean(mean: f64) -> Confidence {
        if mean > 0.8 {
            Confidence::High
        } else if mean > 0.6 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// A scored time-of-day suggestion for one candidate date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotSuggestion {
    pub time: String,
    pub score: f64,
    #[serde(rename = "suitableParticipants")]
    pub suitable_participants: Vec<String>,
    pub confidence: Confidence,
}

/// The ordered catalog of candidate slots spanning a representative day.
///
/// Injected configuration rather than a hidden constant, so alternate
/// granularities can be substituted without code changes. Labels are
/// 12-hour clock strings that round-trip exactly through
/// [`ClockTime::parse_label`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    slots: Vec<(String, ClockTime)>,
}

impl Default for SlotCatalog {
    /// 8:00 AM through 10:00 PM in 30-minute steps.
    fn default() -> SlotCatalog {
        let mut slots = Vec::with_capacity(29);
        let mut minutes = 8 * 60;
        while minutes <= 22 * 60 {
            let time = ClockTime(minutes);
            slots.push((time.label(), time));
            minutes += 30;
        }
        SlotCatalog { slots }
    }
}

impl SlotCatalog {
    /// Build a catalog from 12-hour labels, preserving their order.
    ///
    /// # Examples
    /// ```
    /// use terminfinder::slots::SlotCatalog;
    ///
    /// let catalog = SlotCatalog::from_labels(["9:00 AM", "12:15 PM", "6:00 PM"]).unwrap();
    /// assert_eq!(catalog.len(), 3);
    ///
    /// assert!(SlotCatalog::from_labels(["25:00"]).is_err());
    /// ```
    pub fn from_labels<I, S>(labels: I) -> Result<SlotCatalog, MalformedTime>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut slots = Vec::new();
        for label in labels {
            let label = label.as_ref();
            let time = ClockTime::parse_label(label)
                .ok_or_else(|| MalformedTime(label.to_string()))?;
            slots.push((time.label(), time));
        }
        Ok(SlotCatalog { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ClockTime)> {
        self.slots.iter().map(|(label, time)| (label.as_str(), *time))
    }
}

/// Score the catalog against the stated time preferences of the
/// participants available on `date`.
///
/// Dates with nobody available get an empty list, never a scored-but-empty
/// one. A slot's score is the mean per-participant suitability; slots at or
/// below the discard cutoff are dropped, the rest are sorted best-first
/// (stable, so equal scores keep catalog order) and truncated to the top
/// five.
pub fn score_slots(
    date: NaiveDate,
    available_names: &[String],
    records: &[ParticipantAvailabilityRecord],
    catalog: &SlotCatalog,
) -> Vec<TimeSlotSuggestion> {
    let participants: Vec<&ParticipantAvailabilityRecord> = records
        .iter()
        .filter(|record| available_names.contains(&record.participant_name))
        .collect();

    if participants.is_empty() {
        return Vec::new();
    }

    let mut suggestions: Vec<TimeSlotSuggestion> = catalog
        .iter()
        .filter_map(|(label, time)| {
            let mut total = 0.0;
            let mut suitable_participants = Vec::new();

            for participant in &participants {
                let suitability = suitability(participant, date, time);
                if suitability > SUITABLE_CUTOFF {
                    suitable_participants.push(participant.participant_name.clone());
                }
                total += suitability;
            }

            let mean = total / participants.len() as f64;
            if mean <= DISCARD_CUTOFF {
                return None;
            }

            Some(TimeSlotSuggestion {
                time: label.to_string(),
                score: mean,
                suitable_participants,
                confidence: Confidence::from_mean(mean),
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(MAX_SUGGESTIONS);

    debug!(
        "scored {} slots for {} with {} participants",
        suggestions.len(),
        date,
        participants.len()
    );

    suggestions
}

/// One participant's suitability for one slot on one date.
///
/// Global preferences raise the baseline; the date's partial constraints
/// then refine the result, with `avoid` windows clamping down last so a
/// stated conflict wins over any broader preference.
fn suitability(
    record: &ParticipantAvailabilityRecord,
    date: NaiveDate,
    slot: ClockTime,
) -> f64 {
    let mut score = SUITABILITY_BASELINE;

    for preference in &record.global_time_prefs {
        score = score.max(preference_boost(preference, date, slot));
    }

    if let Some(constraint) = record
        .partial_constraints
        .iter()
        .find(|constraint| constraint.date == date)
    {
        if constraint.ideal.iter().any(|window| window.contains(slot)) {
            score = score.max(1.0);
        } else if constraint.ok.iter().any(|window| window.contains(slot)) {
            score = score.max(0.8);
        }
        if constraint.avoid.iter().any(|window| window.contains(slot)) {
            score = score.min(0.2);
        }
    }

    score
}

fn preference_boost(preference: &TimePreference, date: NaiveDate, slot: ClockTime) -> f64 {
    match preference {
        TimePreference::AfterTime { preferred_time } => match parse_after(preferred_time) {
            Some(threshold) if slot >= threshold => 1.0,
            _ => 0.0,
        },
        TimePreference::RangeBound {
            start_time,
            end_time,
            days,
        } => {
            if !days.is_empty() && !days.iter().any(|day| weekday_matches(date, day)) {
                return 0.0;
            }
            match (
                ClockTime::parse_loose(start_time),
                ClockTime::parse_loose(end_time),
            ) {
                (Some(start), Some(end)) if ClockRange::new(start, end).contains(slot) => 0.8,
                _ => 0.0,
            }
        }
        TimePreference::WeekdayScoped {
            weekday,
            preference,
        } => {
            if weekday_matches(date, weekday) {
                weekday_boost(preference, slot)
            } else {
                0.0
            }
        }
        TimePreference::Other(_) => 0.0,
    }
}

/// `"after 19:30"`, `"after 8pm"`, or a bare time treated as a start.
fn parse_after(value: &str) -> Option<ClockTime> {
    let value = value.trim();
    let rest = value
        .strip_prefix("after ")
        .or_else(|| value.strip_prefix("After "))
        .unwrap_or(value);
    ClockTime::parse_loose(rest)
}

/// Boosts for the broader preference categories a weekday-scoped entry can
/// carry. An exact slot-time match is a strong signal; named day parts are
/// moderate.
fn weekday_boost(preference: &str, slot: ClockTime) -> f64 {
    let preference = preference.trim().to_ascii_lowercase();

    if let Some(rest) = preference.strip_prefix("after ") {
        return match ClockTime::parse_loose(rest) {
            Some(threshold) if slot >= threshold => 0.9,
            _ => 0.0,
        };
    }

    let in_part = |start, end| {
        ClockRange::new(ClockTime::from_hm(start, 0), ClockTime::from_hm(end, 0)).contains(slot)
    };

    if preference.contains("workday") || preference.contains("business") {
        if in_part(9, 17) {
            return 0.7;
        }
    } else if preference.contains("morning") {
        if in_part(8, 12) {
            return 0.8;
        }
    } else if preference.contains("afternoon") {
        if in_part(12, 17) {
            return 0.8;
        }
    } else if preference.contains("evening") || preference.contains("night") {
        if in_part(17, 22) {
            return 0.8;
        }
    } else if ClockTime::parse_loose(&preference) == Some(slot) {
        // This exact slot was called out as good for the weekday.
        return 1.0;
    }

    0.0
}

/// Matches full weekday names, the extraction step's three-letter forms,
/// and the collective "weekdays"/"weekends".
fn weekday_matches(date: NaiveDate, name: &str) -> bool {
    let name = name.trim().to_ascii_lowercase();
    match name.as_str() {
        "weekday" | "weekdays" => date.weekday().number_from_monday() <= 5,
        "weekend" | "weekends" => {
            matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
        }
        _ => {
            let full = date.format("%A").to_string().to_ascii_lowercase();
            name.len() >= 3 && full.starts_with(&name)
        }
    }
}
