use std::collections::HashMap;

use crate::{
    models::{
        driver::DriverRef,
        ergast::{parse_num, ErgastRace, ErgastResult},
        error::FetchError,
        standings::{ConstructorRef, ConstructorStandingEntry, StandingEntry},
    },
    services::StatsService,
};

impl StatsService {
    /// Drivers' championship in upstream order.
    pub async fn driver_standings(&self, year: i32) -> Vec<StandingEntry> {
        let key = format!("standings:drivers:{year}");
        self.resolve(
            &key,
            || async move {
                let list = self.historical.driver_standings(year).await?;
                let entries: Vec<StandingEntry> = list
                    .map(|l| {
                        l.driver_standings
                            .iter()
                            .enumerate()
                            .map(|(i, s)| StandingEntry::from_upstream(s, i as u32 + 1))
                            .collect()
                    })
                    .unwrap_or_default();
                Ok::<_, FetchError>(entries)
            },
            || async move {
                let races = self.historical.points_results(year).await?;
                Ok::<_, FetchError>(derive_driver_standings(&races))
            },
        )
        .await
    }

    /// Constructors' championship in upstream order.
    pub async fn constructor_standings(&self, year: i32) -> Vec<ConstructorStandingEntry> {
        let key = format!("standings:constructors:{year}");
        self.resolve(
            &key,
            || async move {
                let list = self.historical.constructor_standings(year).await?;
                let entries: Vec<ConstructorStandingEntry> = list
                    .map(|l| {
                        l.constructor_standings
                            .iter()
                            .enumerate()
                            .map(|(i, s)| ConstructorStandingEntry::from_upstream(s, i as u32 + 1))
                            .collect()
                    })
                    .unwrap_or_default();
                Ok::<_, FetchError>(entries)
            },
            || async move {
                let races = self.historical.points_results(year).await?;
                Ok::<_, FetchError>(derive_constructor_standings(&races))
            },
        )
        .await
    }
}

struct Tally<T> {
    subject: T,
    points: f64,
    wins: u32,
    first_seen: usize,
}

/// Rank tallies by points, then wins, then first appearance in the results.
fn rank<T>(tallies: HashMap<String, Tally<T>>) -> Vec<(u32, Tally<T>)> {
    let mut ordered: Vec<Tally<T>> = tallies.into_values().collect();
    ordered.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then(b.wins.cmp(&a.wins))
            .then(a.first_seen.cmp(&b.first_seen))
    });
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, t)| (i as u32 + 1, t))
        .collect()
}

/// Grand prix rows then sprint rows; the flag marks rows that count for
/// wins.
fn scored_results(races: &[ErgastRace]) -> impl Iterator<Item = (&ErgastResult, bool)> + '_ {
    let grand_prix = races.iter().flat_map(|r| r.results.iter()).map(|r| (r, true));
    let sprints = races
        .iter()
        .flat_map(|r| r.sprint_results.iter())
        .map(|r| (r, false));
    grand_prix.chain(sprints)
}

fn points_of(result: &ErgastResult) -> f64 {
    result
        .points
        .as_deref()
        .map(parse_num::<f64>)
        .unwrap_or(0.0)
        .max(0.0)
}

fn is_win(result: &ErgastResult) -> bool {
    result.position.as_deref() == Some("1")
}

/// Standings summed from race and sprint results, for seasons the standings
/// endpoint has nothing for yet. The constructor is the one of the latest
/// grand prix.
pub fn derive_driver_standings(races: &[ErgastRace]) -> Vec<StandingEntry> {
    let mut tallies: HashMap<String, Tally<(DriverRef, ConstructorRef)>> = HashMap::new();
    for (result, grand_prix) in scored_results(races) {
        let seen = tallies.len();
        let tally = tallies
            .entry(result.driver.driver_id.clone())
            .or_insert_with(|| Tally {
                subject: (
                    DriverRef::from(&result.driver),
                    ConstructorRef::from(&result.constructor),
                ),
                points: 0.0,
                wins: 0,
                first_seen: seen,
            });
        tally.points += points_of(result);
        if grand_prix {
            tally.wins += u32::from(is_win(result));
            tally.subject.1 = ConstructorRef::from(&result.constructor);
        }
    }
    rank(tallies)
        .into_iter()
        .map(|(position, t)| StandingEntry {
            position,
            points: t.points,
            wins: t.wins,
            driver: t.subject.0,
            constructor: t.subject.1,
        })
        .collect()
}

pub fn derive_constructor_standings(races: &[ErgastRace]) -> Vec<ConstructorStandingEntry> {
    let mut tallies: HashMap<String, Tally<ConstructorRef>> = HashMap::new();
    for (result, grand_prix) in scored_results(races) {
        let seen = tallies.len();
        let tally = tallies
            .entry(result.constructor.constructor_id.clone())
            .or_insert_with(|| Tally {
                subject: ConstructorRef::from(&result.constructor),
                points: 0.0,
                wins: 0,
                first_seen: seen,
            });
        tally.points += points_of(result);
        if grand_prix {
            tally.wins += u32::from(is_win(result));
        }
    }
    rank(tallies)
        .into_iter()
        .map(|(position, t)| ConstructorStandingEntry {
            position,
            points: t.points,
            wins: t.wins,
            constructor: t.subject,
        })
        .collect()
}
