use std::collections::HashMap;

use crate::{
    models::{
        driver::UNKNOWN,
        error::FetchError,
        openf1::{OpenF1Driver, OpenF1Position, OpenF1SessionResult},
        race::RaceResultEntry,
    },
    services::{or_empty, StatsService},
    utils::teams::canonical_team_name,
};

impl StatsService {
    /// Classification of one grand prix.
    pub async fn race_results(&self, year: i32, round: u32) -> Vec<RaceResultEntry> {
        let key = format!("results:{year}:{round}");
        self.resolve(
            &key,
            || async move {
                let race = self.historical.race_results(year, round).await?;
                let entries: Vec<RaceResultEntry> = race
                    .map(|r| r.results.iter().map(RaceResultEntry::from).collect())
                    .unwrap_or_default();
                Ok::<_, FetchError>(entries)
            },
            || self.live_race_results(year, round),
        )
        .await
    }

    /// The round-th race session of the year from the live feed: its
    /// official results, or failing that the last position snapshot.
    async fn live_race_results(&self, year: i32, round: u32) -> Result<Vec<RaceResultEntry>, FetchError> {
        if round == 0 {
            return Ok(Vec::new());
        }
        let mut sessions = self.live.sessions(year, Some("Race")).await?;
        sessions.sort_by_key(|s| s.date_start);
        let Some(session) = sessions.get(round as usize - 1) else {
            return Ok(Vec::new());
        };

        let drivers = or_empty("session drivers", self.live.drivers(session.session_key).await);
        let results = self.live.session_results(session.session_key).await?;
        if !results.is_empty() {
            return Ok(entries_from_session_results(&results, &drivers));
        }
        let positions = self.live.latest_positions(session.session_key).await?;
        Ok(entries_from_positions(&positions, &drivers))
    }
}

fn driver_lookup(drivers: &[OpenF1Driver]) -> HashMap<u32, &OpenF1Driver> {
    drivers.iter().map(|d| (d.driver_number, d)).collect()
}

fn entry_for(number: u32, drivers: &HashMap<u32, &OpenF1Driver>) -> RaceResultEntry {
    let driver = drivers.get(&number);
    RaceResultEntry {
        position: None,
        driver_number: Some(number),
        code: driver
            .and_then(|d| d.name_acronym.clone())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        full_name: driver
            .and_then(|d| d.display_name())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        team_name: driver
            .and_then(|d| d.team_name.as_deref())
            .map(canonical_team_name)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        grid: None,
        laps: None,
        status: UNKNOWN.to_string(),
        points: 0.0,
        time: None,
    }
}

pub fn entries_from_session_results(
    results: &[OpenF1SessionResult],
    drivers: &[OpenF1Driver],
) -> Vec<RaceResultEntry> {
    let lookup = driver_lookup(drivers);
    let mut entries: Vec<RaceResultEntry> = results
        .iter()
        .map(|r| RaceResultEntry {
            position: r.position,
            laps: r.number_of_laps,
            status: r.status().to_string(),
            points: r.points.unwrap_or(0.0).max(0.0),
            ..entry_for(r.driver_number, &lookup)
        })
        .collect();
    // Unclassified rows carry no position and go last.
    entries.sort_by_key(|e| (e.position.is_none(), e.position));
    entries
}

pub fn entries_from_positions(
    positions: &[OpenF1Position],
    drivers: &[OpenF1Driver],
) -> Vec<RaceResultEntry> {
    let lookup = driver_lookup(drivers);
    positions
        .iter()
        .map(|p| RaceResultEntry {
            position: Some(p.position),
            ..entry_for(p.driver_number, &lookup)
        })
        .collect()
}
