use crate::time::{MalformedTime, TimeWindow};
use crate::window::EventWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;

/// A raw participant payload failed shape validation.
///
/// This is the single validation boundary for untrusted structured input:
/// a rejected record must never contribute zero-filled data to aggregation.
/// Whether to skip the participant or fail the whole analysis is the
/// caller's decision.
#[derive(Error, Debug)]
pub enum SchemaViolation {
    #[error("availability record does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("malformed calendar date {value:?} in `{field}`")]
    MalformedDate { field: &'static str, value: String },
    #[error(transparent)]
    MalformedTimeRange(#[from] MalformedTime),
}

/// One structured time preference, as emitted by the upstream extraction
/// step. The shapes are heterogeneous, so deserialization dispatches on
/// which fields are present; anything unrecognized lands in `Other` and
/// scores neutrally rather than rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimePreference {
    /// e.g. `{ "preferred_time": "after 19:30" }`
    AfterTime { preferred_time: String },
    /// e.g. `{ "start_time": "09:00", "end_time": "17:00", "days": ["Mon"] }`
    RangeBound {
        start_time: String,
        end_time: String,
        #[serde(default)]
        days: Vec<String>,
    },
    /// e.g. `{ "weekday": "Friday", "preference": "after 8pm" }`
    WeekdayScoped { weekday: String, preference: String },
    Other(Value),
}

/// Sub-day granularity constraints for a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialConstraint {
    pub date: NaiveDate,
    #[serde(default)]
    pub ideal: Vec<TimeWindow>,
    #[serde(default)]
    pub ok: Vec<TimeWindow>,
    #[serde(default)]
    pub avoid: Vec<TimeWindow>,
}

/// Provenance of inference performed by the extraction step. Only
/// `assumed_flexible_elsewhere` feeds classification; the rest is carried
/// opaquely for downstream display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceFlags {
    pub assumed_flexible_elsewhere: bool,
    pub expanded_ranges: Vec<String>,
    pub weekday_expansions: Vec<WeekdayExpansion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayExpansion {
    pub weekday: String,
    pub dates: Vec<String>,
}

/// One participant's availability for one event, after normalization.
///
/// Invariants held by construction through [`clean`]: the date sets are
/// disjoint (available wins a conflict), every date lies within the event
/// window, and both sets are deduplicated in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantAvailabilityRecord {
    pub participant_name: String,
    pub available_dates: BTreeSet<NaiveDate>,
    pub unavailable_dates: BTreeSet<NaiveDate>,
    pub partial_constraints: Vec<PartialConstraint>,
    pub global_time_prefs: Vec<TimePreference>,
    pub inference_flags: InferenceFlags,
    pub notes: Option<String>,
}

/// The permissive raw shape: `participant_name` is required, everything
/// else defaults to empty rather than failing. Wrong field types still
/// fail deserialization.
#[derive(Deserialize)]
struct RawRecord {
    participant_name: String,
    #[serde(default)]
    available_dates: Vec<String>,
    #[serde(default)]
    unavailable_dates: Vec<String>,
    #[serde(default)]
    partial_constraints: Vec<RawPartialConstraint>,
    #[serde(default)]
    global_time_prefs: Vec<TimePreference>,
    #[serde(default)]
    inference_flags: InferenceFlags,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Deserialize)]
struct RawPartialConstraint {
    date: String,
    #[serde(default)]
    ideal: Vec<String>,
    #[serde(default)]
    ok: Vec<String>,
    #[serde(default)]
    avoid: Vec<String>,
}

/// Validate and normalize one raw availability payload against the event
/// window.
///
/// Strict on malformed values, permissive on missing ones: absent optional
/// fields become empty collections, while a wrong type, an unparseable
/// date, or a constraint string outside the time-range grammar raises a
/// [`SchemaViolation`]. Dates are clamped to the window, deduplicated into
/// sorted order, and a date claimed both available and unavailable is kept
/// as available.
///
/// Pure over its inputs, and a fixed point: cleaning an already-cleaned
/// record again yields the same record.
pub fn clean(
    raw: &Value,
    window: &EventWindow,
) -> Result<ParticipantAvailabilityRecord, SchemaViolation> {
    let raw: RawRecord = serde_json::from_value(raw.clone())?;

    let available: BTreeSet<NaiveDate> = parse_dates("available_dates", &raw.available_dates)?
        .into_iter()
        .filter(|date| window.contains(*date))
        .collect();

    let unavailable: BTreeSet<NaiveDate> = parse_dates("unavailable_dates", &raw.unavailable_dates)?
        .into_iter()
        .filter(|date| window.contains(*date) && !available.contains(date))
        .collect();

    let mut partial_constraints = Vec::with_capacity(raw.partial_constraints.len());
    for constraint in &raw.partial_constraints {
        let date = parse_date("partial_constraints.date", &constraint.date)?;
        let cleaned = PartialConstraint {
            date,
            ideal: parse_windows(&constraint.ideal)?,
            ok: parse_windows(&constraint.ok)?,
            avoid: parse_windows(&constraint.avoid)?,
        };
        // Validated above even when dropped; a malformed entry is a schema
        // problem regardless of where its date lands.
        if window.contains(date) {
            partial_constraints.push(cleaned);
        }
    }

    Ok(ParticipantAvailabilityRecord {
        participant_name: raw.participant_name,
        available_dates: available,
        unavailable_dates: unavailable,
        partial_constraints,
        global_time_prefs: raw.global_time_prefs,
        inference_flags: raw.inference_flags,
        notes: raw.notes,
    })
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, SchemaViolation> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| SchemaViolation::MalformedDate {
        field,
        value: value.to_string(),
    })
}

fn parse_dates(field: &'static str, values: &[String]) -> Result<Vec<NaiveDate>, SchemaViolation> {
    values.iter().map(|value| parse_date(field, value)).collect()
}

fn parse_windows(values: &[String]) -> Result<Vec<TimeWindow>, SchemaViolation> {
    values
        .iter()
        .map(|value| value.parse::<TimeWindow>().map_err(SchemaViolation::from))
        .collect()
}
