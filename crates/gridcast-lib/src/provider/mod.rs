//! Upstream session data access
//!
//! The timing service is treated as a black box that returns structured lap
//! and classification records. Everything beyond fetch-and-cache lives in
//! the feature pipeline.

mod http;
mod synthetic;

pub use http::HttpSessionProvider;
pub use synthetic::{SyntheticGenerator, SYNTHETIC_FROM_SEASON};

use crate::error::Error;
use crate::models::{EventInfo, RaceSession};
use async_trait::async_trait;

/// Source of session lap and classification data
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Events of a season, in round order
    async fn event_schedule(&self, year: u16) -> Result<Vec<EventInfo>, Error>;

    /// All laps and results for one race
    async fn race_session(&self, year: u16, round: u8) -> Result<RaceSession, Error>;
}
