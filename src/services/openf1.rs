use reqwest::Url;
use std::collections::HashMap;

use crate::{
    models::{
        error::FetchError,
        openf1::{OpenF1Driver, OpenF1Meeting, OpenF1Position, OpenF1Session, OpenF1SessionResult},
    },
    services::upstream::Upstream,
};

/// Client for the live timing API.
#[derive(Clone)]
pub struct LiveSource {
    upstream: Upstream,
    base_url: String,
}

impl LiveSource {
    pub fn new(upstream: Upstream, base_url: &str) -> Self {
        LiveSource {
            upstream,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, FetchError> {
        Url::parse_with_params(&format!("{}/{endpoint}", self.base_url), params)
            .map(|u| u.to_string())
            .map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))
    }

    pub async fn sessions(
        &self,
        year: i32,
        session_name: Option<&str>,
    ) -> Result<Vec<OpenF1Session>, FetchError> {
        let mut params = vec![("year", year.to_string())];
        if let Some(name) = session_name {
            params.push(("session_name", name.to_string()));
        }
        self.upstream.get_json(self.url("sessions", &params)?).await
    }

    /// The most recent session of `year` that has started, by start time.
    pub async fn latest_session(&self, year: i32) -> Result<Option<OpenF1Session>, FetchError> {
        let now = chrono::Utc::now();
        let sessions = self.sessions(year, None).await?;
        Ok(sessions
            .into_iter()
            .filter(|s| s.date_start.map_or(true, |d| d <= now))
            .max_by_key(|s| s.date_start))
    }

    pub async fn drivers(&self, session_key: u32) -> Result<Vec<OpenF1Driver>, FetchError> {
        let url = self.url("drivers", &[("session_key", session_key.to_string())])?;
        self.upstream.get_json(url).await
    }

    pub async fn meetings(&self, year: i32) -> Result<Vec<OpenF1Meeting>, FetchError> {
        let url = self.url("meetings", &[("year", year.to_string())])?;
        self.upstream.get_json(url).await
    }

    pub async fn positions(&self, session_key: u32) -> Result<Vec<OpenF1Position>, FetchError> {
        let url = self.url("position", &[("session_key", session_key.to_string())])?;
        self.upstream.get_json(url).await
    }

    /// Newest position sample per driver, ordered by position.
    pub async fn latest_positions(
        &self,
        session_key: u32,
    ) -> Result<Vec<OpenF1Position>, FetchError> {
        Ok(latest_by_driver(self.positions(session_key).await?))
    }

    pub async fn session_results(
        &self,
        session_key: u32,
    ) -> Result<Vec<OpenF1SessionResult>, FetchError> {
        let url = self.url("session_result", &[("session_key", session_key.to_string())])?;
        self.upstream.get_json(url).await
    }
}

pub fn latest_by_driver(positions: Vec<OpenF1Position>) -> Vec<OpenF1Position> {
    let mut latest: HashMap<u32, OpenF1Position> = HashMap::new();
    for sample in positions {
        latest
            .entry(sample.driver_number)
            .and_modify(|existing| {
                if sample.date > existing.date {
                    *existing = sample.clone();
                }
            })
            .or_insert(sample);
    }
    let mut res: Vec<OpenF1Position> = latest.into_values().collect();
    res.sort_by_key(|p| (p.position, p.driver_number));
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(driver: u32, position: u32, minute: u32) -> OpenF1Position {
        OpenF1Position {
            driver_number: driver,
            position,
            date: Utc.with_ymd_and_hms(2024, 3, 2, 15, minute, 0).unwrap(),
            session_key: Some(9472),
            meeting_key: None,
        }
    }

    #[test]
    fn keeps_newest_sample_per_driver() {
        let reduced = latest_by_driver(vec![
            sample(1, 1, 0),
            sample(16, 2, 0),
            sample(16, 1, 30),
            sample(1, 2, 30),
            sample(1, 3, 10),
        ]);
        let summary: Vec<(u32, u32)> = reduced.iter().map(|p| (p.driver_number, p.position)).collect();
        assert_eq!(summary, vec![(16, 1), (1, 2)]);
    }
}
