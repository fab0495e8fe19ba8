//! Availability aggregation and scheduling suggestions for group events.
//!
//! Free-text availability statements are turned into structured records
//! upstream; this crate validates those records against an event's date
//! window, aggregates per-date availability across participants, scores
//! candidate time-of-day slots against stated preferences, and assembles a
//! deterministic ranking of dates. Everything is a pure computation over an
//! immutable snapshot; nothing here touches storage or the network.

pub mod aggregate;
pub mod analysis;
pub mod record;
pub mod slots;
pub mod time;
pub mod window;

pub use aggregate::{aggregate, DateAvailabilitySummary, UnmentionedPolicy};
pub use analysis::{analyze, assemble, Analysis, AnalysisConfig, RankedDate, ScheduleSummary};
pub use record::{clean, ParticipantAvailabilityRecord, SchemaViolation, TimePreference};
pub use slots::{score_slots, Confidence, SlotCatalog, TimeSlotSuggestion};
pub use window::{expand, EventWindow};
