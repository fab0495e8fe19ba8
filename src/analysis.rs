use crate::aggregate::{aggregate, DateAvailabilitySummary, UnmentionedPolicy};
use crate::record::ParticipantAvailabilityRecord;
use crate::slots::{score_slots, SlotCatalog};
use crate::window::EventWindow;
use chrono::NaiveDate;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

/// Knobs for one analysis run: the unmentioned-date policy and the slot
/// catalog, both injected rather than baked in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisConfig {
    pub unmentioned: UnmentionedPolicy,
    pub catalog: SlotCatalog,
}

/// One entry of the best-first date ranking. `score` is rounded to three
/// decimal places at this boundary; the heatmap keeps full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDate {
    pub date: NaiveDate,
    pub available_count: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub top_pick: Option<NaiveDate>,
    pub runners_up: Vec<NaiveDate>,
    /// Reserved for explanatory text; empty for now.
    pub tradeoffs: Vec<String>,
}

/// Everything the presentation layer needs: the ranking, the full per-date
/// detail for calendar rendering, and the summary. All three views are
/// derived from the same aggregation pass so they cannot drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub ranked_dates: Vec<RankedDate>,
    pub heatmap: Vec<DateAvailabilitySummary>,
    pub summary: ScheduleSummary,
}

/// Run the full pipeline over a snapshot of cleaned records: aggregate
/// every date in the window, score slots for dates with anyone available,
/// and assemble the ranking.
///
/// Pure and synchronous; repeated calls over the same snapshot produce
/// identical output.
pub fn analyze(
    window: &EventWindow,
    records: &[ParticipantAvailabilityRecord],
    config: &AnalysisConfig,
) -> Analysis {
    let mut heatmap = aggregate(window, records, config.unmentioned);

    for day in heatmap.iter_mut() {
        if !day.available_names.is_empty() {
            day.suggested_time_slots =
                score_slots(day.date, &day.available_names, records, &config.catalog);
        }
    }

    debug!(
        "analyzed {} dates for {} participants ({})",
        heatmap.len(),
        records.len(),
        records.iter().map(|r| r.participant_name.as_str()).join(", ")
    );

    assemble(heatmap, records.len())
}

/// Sort the per-date summaries into the ranked view and pick the winners.
///
/// Ties on score break toward the earlier calendar date, keeping the
/// ranking deterministic. The top pick is absent for an empty window or a
/// zero-participant analysis; runners-up are the next three dates.
pub fn assemble(heatmap: Vec<DateAvailabilitySummary>, participant_count: usize) -> Analysis {
    let ranked_dates: Vec<RankedDate> = heatmap
        .iter()
        .sorted_by(|a, b| b.score.total_cmp(&a.score).then(a.date.cmp(&b.date)))
        .map(|day| RankedDate {
            date: day.date,
            available_count: day.available_names.len(),
            score: round3(day.score),
        })
        .collect();

    let (top_pick, runners_up) = if participant_count == 0 {
        (None, Vec::new())
    } else {
        (
            ranked_dates.first().map(|ranked| ranked.date),
            ranked_dates
                .iter()
                .skip(1)
                .take(3)
                .map(|ranked| ranked.date)
                .collect(),
        )
    };

    Analysis {
        ranked_dates,
        heatmap,
        summary: ScheduleSummary {
            top_pick,
            runners_up,
            tradeoffs: Vec::new(),
        },
    }
}

fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
