use std::collections::HashMap;

use crate::{
    models::{
        driver::DriverRef,
        ergast::{parse_num, parse_opt, ErgastRace, StandingsList},
        error::FetchError,
        statistics::DriverStatistics,
        standings::StandingEntry,
    },
    services::StatsService,
    utils::{race_utils::is_classified_finish, teams::constructor_team_name},
};

impl StatsService {
    /// Per-driver season statistics, highest points first.
    pub async fn statistics(&self, year: i32) -> Vec<DriverStatistics> {
        let key = format!("statistics:{year}");
        self.resolve(
            &key,
            || async move {
                let races = self.historical.points_results(year).await?;
                Ok::<_, FetchError>(season_statistics(&races))
            },
            || async move {
                let list = self.historical.driver_standings(year).await?;
                Ok::<_, FetchError>(statistics_from_standings(list.as_ref()))
            },
        )
        .await
    }
}

fn blank(driver: &DriverRef, team_name: String) -> DriverStatistics {
    DriverStatistics {
        driver_id: driver.driver_id.clone(),
        code: driver.acronym(),
        full_name: driver.full_name.clone(),
        driver_number: driver.permanent_number,
        team_name,
        races: 0,
        wins: 0,
        podiums: 0,
        poles: 0,
        points: 0.0,
        dnfs: 0,
        best_finish: None,
        fastest_laps: 0,
    }
}

pub fn season_statistics(races: &[ErgastRace]) -> Vec<DriverStatistics> {
    let mut order: Vec<String> = Vec::new();
    let mut stats: HashMap<String, DriverStatistics> = HashMap::new();

    for result in races.iter().flat_map(|r| r.results.iter()) {
        let driver = DriverRef::from(&result.driver);
        let team = constructor_team_name(&result.constructor.constructor_id, &result.constructor.name);
        let entry = stats.entry(driver.driver_id.clone()).or_insert_with(|| {
            order.push(driver.driver_id.clone());
            blank(&driver, team.clone())
        });

        let position: Option<u32> = parse_opt(result.position.as_deref());
        let status = result.status.as_deref().unwrap_or("");

        entry.team_name = team;
        if let Some(number) = parse_opt(result.number.as_deref()) {
            entry.driver_number = Some(number);
        }
        entry.races += 1;
        entry.points += result.points.as_deref().map(parse_num::<f64>).unwrap_or(0.0);
        if position == Some(1) {
            entry.wins += 1;
        }
        if position.is_some_and(|p| p <= 3) {
            entry.podiums += 1;
        }
        if parse_opt::<u32>(result.grid.as_deref()) == Some(1) {
            entry.poles += 1;
        }
        if !status.is_empty() && !is_classified_finish(status) {
            entry.dnfs += 1;
        }
        if let Some(p) = position.filter(|p| *p > 0) {
            entry.best_finish = Some(entry.best_finish.map_or(p, |best| best.min(p)));
        }
        let fastest = result
            .fastest_lap
            .as_ref()
            .and_then(|f| parse_opt::<u32>(f.rank.as_deref()));
        if fastest == Some(1) {
            entry.fastest_laps += 1;
        }
    }

    // Sprints add points only; every other counter is grand prix only.
    for result in races.iter().flat_map(|r| r.sprint_results.iter()) {
        let driver = DriverRef::from(&result.driver);
        let entry = stats.entry(driver.driver_id.clone()).or_insert_with(|| {
            order.push(driver.driver_id.clone());
            let team = constructor_team_name(&result.constructor.constructor_id, &result.constructor.name);
            blank(&driver, team)
        });
        entry.points += result.points.as_deref().map(parse_num::<f64>).unwrap_or(0.0);
    }

    let mut out: Vec<DriverStatistics> = order
        .into_iter()
        .filter_map(|id| stats.remove(&id))
        .collect();
    // Stable sort keeps first-appearance order among equal points.
    out.sort_by(|a, b| b.points.total_cmp(&a.points).then(b.wins.cmp(&a.wins)));
    out
}

/// Points and wins only; the standings carry nothing else.
pub fn statistics_from_standings(list: Option<&StandingsList>) -> Vec<DriverStatistics> {
    let Some(list) = list else {
        return Vec::new();
    };
    list.driver_standings
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let entry = StandingEntry::from_upstream(s, i as u32 + 1);
            let mut stats = blank(&entry.driver, entry.constructor.name.clone());
            stats.points = entry.points;
            stats.wins = entry.wins;
            stats
        })
        .collect()
}
