use crate::record::ParticipantAvailabilityRecord;
use crate::slots::TimeSlotSuggestion;
use crate::window::EventWindow;
use chrono::NaiveDate;
use log::trace;
use serde::{Deserialize, Serialize};

/// How to classify a date a participant said nothing about.
///
/// The permissive reading treats silence as availability; the strict one
/// leaves the participant out of both tallies and out of the score's
/// denominator for that date.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmentionedPolicy {
    #[default]
    AssumeAvailable,
    Unknown,
}

/// Per-date availability across all participants. `score` is the share of
/// participants available on that date, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateAvailabilitySummary {
    pub date: NaiveDate,
    pub available_names: Vec<String>,
    pub unavailable_names: Vec<String>,
    pub score: f64,
    #[serde(rename = "suggestedTimeSlots", default)]
    pub suggested_time_slots: Vec<TimeSlotSuggestion>,
}

enum Classification {
    Available,
    Unavailable,
    Unknown,
}

fn classify(
    record: &ParticipantAvailabilityRecord,
    date: NaiveDate,
    policy: UnmentionedPolicy,
) -> Classification {
    // A hard no wins over everything else.
    if record.unavailable_dates.contains(&date) {
        Classification::Unavailable
    } else if record.available_dates.contains(&date) {
        Classification::Available
    } else if record.inference_flags.assumed_flexible_elsewhere {
        // Stated constraints elsewhere only; assumed open here.
        Classification::Available
    } else {
        match policy {
            UnmentionedPolicy::AssumeAvailable => Classification::Available,
            UnmentionedPolicy::Unknown => Classification::Unknown,
        }
    }
}

/// Classify every participant against every date in the window and score
/// each date.
///
/// Output order follows the window, not the score; ranking is the
/// assembler's concern. `suggested_time_slots` is left empty here and
/// filled in by the slot scorer.
pub fn aggregate(
    window: &EventWindow,
    records: &[ParticipantAvailabilityRecord],
    policy: UnmentionedPolicy,
) -> Vec<DateAvailabilitySummary> {
    window
        .expand()
        .into_iter()
        .map(|date| {
            let mut available_names = Vec::new();
            let mut unavailable_names = Vec::new();

            for record in records {
                match classify(record, date, policy) {
                    Classification::Available => {
                        available_names.push(record.participant_name.clone())
                    }
                    Classification::Unavailable => {
                        unavailable_names.push(record.participant_name.clone())
                    }
                    Classification::Unknown => {}
                }
            }

            let denominator = match policy {
                UnmentionedPolicy::AssumeAvailable => records.len(),
                UnmentionedPolicy::Unknown => available_names.len() + unavailable_names.len(),
            };
            // max(1) guards the zero-participant analysis.
            let score = available_names.len() as f64 / denominator.max(1) as f64;

            trace!(
                "aggregated {}: {} available, {} unavailable, score {:.3}",
                date,
                available_names.len(),
                unavailable_names.len(),
                score
            );

            DateAvailabilitySummary {
                date,
                available_names,
                unavailable_names,
                score,
                suggested_time_slots: Vec::new(),
            }
        })
        .collect()
}
