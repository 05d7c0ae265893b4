//! Feature derivation pipeline
//!
//! Converts raw lap-by-lap records into stable per-driver summary features:
//! compound normalization, wetness classification, the field pace baseline
//! and the per-driver extractor.

mod compound;
mod extractor;
pub mod pace;
mod strategy;
mod wetness;

pub use compound::{Compound, DEFAULT_COMPOUND_CODE};
pub use extractor::extract_session;
pub use pace::{field_baseline, quick_laps, FALLBACK_FIELD_PACE_SECS, QUICK_LAP_THRESHOLD};
pub use strategy::{stint_breakdown, DriverStints, StintSummary};
pub use wetness::{is_wet_session, WET_LAP_RATIO};
