//! HTTP-backed session provider with an on-disk cache
//!
//! Fetch failures and not-yet-released sessions surface as
//! `Error::UpstreamUnavailable`; the caller decides whether to degrade to
//! synthetic data. Cache reads never fail a request and cache writes are
//! best-effort.

use super::SessionProvider;
use crate::error::Error;
use crate::models::{EventInfo, RaceSession};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Client timeout for upstream requests
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpSessionProvider {
    client: Client,
    base_url: String,
    cache_dir: Option<PathBuf>,
}

impl HttpSessionProvider {
    /// `cache_dir = None` disables the on-disk cache entirely
    pub fn new(base_url: &str, cache_dir: Option<PathBuf>) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache_dir,
        })
    }

    fn cache_path(&self, year: u16, round: u8) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("session_{year}_{round:02}.json")))
    }

    fn read_cached_session(&self, path: &Path) -> Option<RaceSession> {
        let text = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&text) {
            Ok(session) => {
                debug!(path = %path.display(), "session served from cache");
                Some(session)
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "discarding unreadable cache entry");
                None
            }
        }
    }

    fn write_cached_session(&self, path: &Path, session: &RaceSession) {
        let Ok(text) = serde_json::to_string(session) else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(error) = std::fs::write(path, text) {
            debug!(path = %path.display(), %error, "cache write failed");
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "upstream returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("malformed upstream payload: {e}")))
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn event_schedule(&self, year: u16) -> Result<Vec<EventInfo>, Error> {
        let url = format!("{}/schedule/{year}", self.base_url);
        self.fetch_json(&url).await
    }

    async fn race_session(&self, year: u16, round: u8) -> Result<RaceSession, Error> {
        if let Some(path) = self.cache_path(year, round) {
            if let Some(session) = self.read_cached_session(&path) {
                return Ok(session);
            }
        }

        let url = format!("{}/session/{year}/{round}", self.base_url);
        let session: RaceSession = self.fetch_json(&url).await?;

        // An event that exists but has no laps has not been run yet
        if session.laps.is_empty() {
            return Err(Error::UpstreamUnavailable(
                "session has no lap data yet".to_string(),
            ));
        }

        if let Some(path) = self.cache_path(year, round) {
            self.write_cached_session(&path, &session);
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriverResult, Lap};

    fn sample_session() -> RaceSession {
        RaceSession {
            year: 2024,
            round: 3,
            event_name: "Test Grand Prix".to_string(),
            laps: vec![Lap {
                driver: "1".to_string(),
                team: "Test Team".to_string(),
                stint: 1,
                lap_number: 1,
                lap_time_secs: Some(90.0),
                compound: "SOFT".to_string(),
            }],
            results: vec![DriverResult {
                driver: "1".to_string(),
                abbreviation: "VER".to_string(),
                full_name: "Max Verstappen".to_string(),
                broadcast_name: None,
                team: "Test Team".to_string(),
                grid_position: Some(1),
                finish_position: Some(1),
            }],
        }
    }

    #[test]
    fn test_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let provider =
            HttpSessionProvider::new("http://localhost:9", Some(dir.path().to_path_buf()))
                .unwrap();

        let path = provider.cache_path(2024, 3).unwrap();
        assert!(provider.read_cached_session(&path).is_none());

        let session = sample_session();
        provider.write_cached_session(&path, &session);

        let cached = provider.read_cached_session(&path).unwrap();
        assert_eq!(cached.event_name, session.event_name);
        assert_eq!(cached.laps.len(), 1);
    }

    #[test]
    fn test_corrupt_cache_entry_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let provider =
            HttpSessionProvider::new("http://localhost:9", Some(dir.path().to_path_buf()))
                .unwrap();

        let path = provider.cache_path(2024, 3).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert!(provider.read_cached_session(&path).is_none());
    }

    #[test]
    fn test_cache_disabled_without_dir() {
        let provider = HttpSessionProvider::new("http://localhost:9", None).unwrap();
        assert!(provider.cache_path(2024, 3).is_none());
    }

    #[tokio::test]
    async fn test_race_session_fetch_and_cache() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::to_string(&sample_session()).unwrap();
        let mock = server
            .mock("GET", "/session/2024/3")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(&body)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider =
            HttpSessionProvider::new(&server.url(), Some(dir.path().to_path_buf())).unwrap();

        let session = provider.race_session(2024, 3).await.unwrap();
        assert_eq!(session.event_name, "Test Grand Prix");
        mock.assert_async().await;

        // Second call is served from the cache; no further upstream hits
        let again = provider.race_session(2024, 3).await.unwrap();
        assert_eq!(again.event_name, session.event_name);
    }

    #[tokio::test]
    async fn test_upstream_error_maps_to_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/session/2030/1")
            .with_status(404)
            .create_async()
            .await;

        let provider = HttpSessionProvider::new(&server.url(), None).unwrap();
        let error = provider.race_session(2030, 1).await.unwrap_err();
        assert!(matches!(error, Error::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_lapless_session_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let mut session = sample_session();
        session.laps.clear();
        server
            .mock("GET", "/session/2024/3")
            .with_status(200)
            .with_body(serde_json::to_string(&session).unwrap())
            .create_async()
            .await;

        let provider = HttpSessionProvider::new(&server.url(), None).unwrap();
        let error = provider.race_session(2024, 3).await.unwrap_err();
        assert!(matches!(error, Error::UpstreamUnavailable(_)));
    }
}
