//! Constructor → drivers championship view.
//!
//! Historical standings give points and team membership, the live feed gives
//! colours and photos, and the override table corrects seats the historical
//! feed has not caught up with. Overrides are applied to the flat driver list
//! first and the constructor groups are rebuilt from it, so a driver can only
//! ever sit under one constructor.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::{
    models::{
        driver::DriverRecord,
        standings::{
            ChampionshipView, ConstructorGroup, ConstructorStandingEntry, DriverStandingRef,
            StandingEntry,
        },
    },
    services::StatsService,
    utils::{
        overrides::{reference_date, OverrideTable},
        teams::{canonical_team_name, constructor_id_for, default_team_colour, same_team},
    },
};

impl StatsService {
    pub async fn championship(&self, year: i32) -> ChampionshipView {
        let key = format!("championship:{year}");
        // Groupings depend on the override table and today's date; never
        // serve a previously built view.
        self.cache.invalidate(&key);

        let (drivers, constructors) =
            tokio::join!(self.driver_standings(year), self.constructor_standings(year));
        if drivers.is_empty() && constructors.is_empty() {
            return ChampionshipView::default();
        }
        let live = self.drivers(year).await;

        let view = build_championship(
            &drivers,
            &constructors,
            &live,
            &self.overrides,
            year,
            reference_date(year),
        );
        self.cache.set_as(&key, &view);
        view
    }
}

/// Team colours keyed by canonical team name, first live driver wins.
fn live_colours(live: &[DriverRecord]) -> HashMap<String, String> {
    let mut colours = HashMap::new();
    for driver in live {
        if let Some(colour) = &driver.team_colour {
            colours
                .entry(canonical_team_name(&driver.team_name))
                .or_insert_with(|| colour.clone());
        }
    }
    colours
}

fn colour_for(team_name: &str, colours: &HashMap<String, String>) -> Option<String> {
    colours
        .get(&canonical_team_name(team_name))
        .cloned()
        .or_else(|| default_team_colour(team_name))
}

fn find_live<'a>(standing: &StandingEntry, live: &'a [DriverRecord]) -> Option<&'a DriverRecord> {
    let code = standing.driver.code.as_deref();
    live.iter()
        .find(|d| standing.driver.permanent_number == Some(d.driver_number))
        .or_else(|| {
            let code = code?;
            live.iter()
                .find(|d| d.name_acronym.eq_ignore_ascii_case(code))
        })
        .or_else(|| {
            live.iter()
                .find(|d| d.full_name.eq_ignore_ascii_case(&standing.driver.full_name))
        })
}

pub fn build_championship(
    driver_standings: &[StandingEntry],
    constructor_standings: &[ConstructorStandingEntry],
    live: &[DriverRecord],
    overrides: &OverrideTable,
    year: i32,
    on: NaiveDate,
) -> ChampionshipView {
    let colours = live_colours(live);

    let drivers: Vec<DriverStandingRef> = driver_standings
        .iter()
        .map(|standing| {
            let live_driver = find_live(standing, live);
            let mut driver = DriverStandingRef {
                code: standing.driver.acronym(),
                full_name: standing.driver.full_name.clone(),
                driver_number: live_driver
                    .map(|d| d.driver_number)
                    .or(standing.driver.permanent_number),
                position: standing.position,
                points: standing.points,
                wins: standing.wins,
                constructor_id: standing.constructor.constructor_id.clone(),
                team_name: standing.constructor.name.clone(),
                team_colour: colour_for(&standing.constructor.name, &colours),
                headshot_url: live_driver.and_then(|d| d.headshot_url.clone()),
            };
            if let Some(rule) = overrides.find(
                year,
                on,
                standing.driver.code.as_deref(),
                &standing.driver.full_name,
            ) {
                driver.team_name = canonical_team_name(&rule.team_name);
                driver.constructor_id = rule
                    .constructor_id
                    .clone()
                    .or_else(|| constructor_id_for(&rule.team_name).map(str::to_string))
                    .unwrap_or_else(|| rule.team_name.to_lowercase().replace(' ', "_"));
                driver.team_colour = rule
                    .team_colour
                    .clone()
                    .or_else(|| colour_for(&rule.team_name, &colours));
            }
            driver
        })
        .collect();

    let mut constructors: Vec<ConstructorGroup> = constructor_standings
        .iter()
        .map(|c| ConstructorGroup {
            constructor_id: c.constructor.constructor_id.clone(),
            team_name: c.constructor.name.clone(),
            team_colour: colour_for(&c.constructor.name, &colours),
            points: c.points,
            position: c.position,
            wins: c.wins,
            drivers: Vec::new(),
        })
        .collect();

    for driver in &drivers {
        let slot = constructors.iter().position(|g| {
            g.constructor_id == driver.constructor_id || same_team(&g.team_name, &driver.team_name)
        });
        let index = match slot {
            Some(index) => index,
            None => {
                // Team missing from the constructor standings: list it last
                // with no points of its own.
                let position = constructors.iter().map(|g| g.position).max().unwrap_or(0) + 1;
                constructors.push(ConstructorGroup {
                    constructor_id: driver.constructor_id.clone(),
                    team_name: driver.team_name.clone(),
                    team_colour: driver.team_colour.clone(),
                    points: 0.0,
                    position,
                    wins: 0,
                    drivers: Vec::new(),
                });
                constructors.len() - 1
            }
        };
        constructors[index].drivers.push(driver.clone());
    }

    for group in &mut constructors {
        group.drivers.sort_by_key(|d| d.position);
    }
    constructors.sort_by_key(|g| g.position);

    ChampionshipView {
        constructors,
        drivers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{driver::DriverRef, standings::ConstructorRef};
    use crate::utils::overrides::OverrideRule;

    fn constructor(id: &str, name: &str) -> ConstructorRef {
        ConstructorRef {
            constructor_id: id.to_string(),
            name: name.to_string(),
            nationality: None,
        }
    }

    fn standing(position: u32, code: &str, name: &str, points: f64, team: ConstructorRef) -> StandingEntry {
        StandingEntry {
            position,
            points,
            wins: 0,
            driver: DriverRef {
                driver_id: code.to_lowercase(),
                code: Some(code.to_string()),
                permanent_number: None,
                full_name: name.to_string(),
                nationality: None,
            },
            constructor: team,
        }
    }

    fn team_standing(position: u32, team: ConstructorRef, points: f64) -> ConstructorStandingEntry {
        ConstructorStandingEntry {
            position,
            points,
            wins: 0,
            constructor: team,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tsunoda_rule() -> OverrideTable {
        OverrideTable::new(vec![OverrideRule {
            season: 2023,
            driver_code: "TSU".to_string(),
            driver_name: None,
            team_name: "Red Bull Racing".to_string(),
            constructor_id: Some("red_bull".to_string()),
            team_colour: Some("3671C6".to_string()),
            effective_from: date(2023, 6, 1),
            effective_until: None,
        }])
    }

    fn inputs() -> (Vec<StandingEntry>, Vec<ConstructorStandingEntry>) {
        let red_bull = constructor("red_bull", "Red Bull Racing");
        let alpha = constructor("alphatauri", "AlphaTauri");
        (
            vec![
                standing(1, "VER", "Max Verstappen", 575.0, red_bull.clone()),
                standing(2, "PER", "Sergio Pérez", 285.0, red_bull.clone()),
                standing(14, "TSU", "Yuki Tsunoda", 17.0, alpha.clone()),
                standing(20, "DEV", "Nyck de Vries", 0.0, alpha.clone()),
            ],
            vec![team_standing(1, red_bull, 860.0), team_standing(8, alpha, 25.0)],
        )
    }

    fn codes(group: &ConstructorGroup) -> Vec<&str> {
        group.drivers.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn groups_drivers_under_their_constructor() {
        let (drivers, constructors) = inputs();
        let view = build_championship(&drivers, &constructors, &[], &OverrideTable::default(), 2023, date(2023, 12, 31));
        assert_eq!(view.constructors.len(), 2);
        assert_eq!(codes(&view.constructors[0]), vec!["VER", "PER"]);
        assert_eq!(codes(&view.constructors[1]), vec!["TSU", "DEV"]);
        assert_eq!(view.constructors[0].team_colour.as_deref(), Some("3671C6"));
    }

    #[test]
    fn override_moves_driver_between_groups() {
        let (drivers, constructors) = inputs();
        let view = build_championship(&drivers, &constructors, &[], &tsunoda_rule(), 2023, date(2023, 7, 1));

        let tsu = view.drivers.iter().find(|d| d.code == "TSU").unwrap();
        assert_eq!(tsu.team_name, "Red Bull Racing");
        assert_eq!(tsu.constructor_id, "red_bull");

        let red_bull = view.constructors.iter().find(|g| g.constructor_id == "red_bull").unwrap();
        let alpha = view.constructors.iter().find(|g| g.constructor_id == "alphatauri").unwrap();
        assert!(codes(red_bull).contains(&"TSU"));
        assert!(!codes(alpha).contains(&"TSU"));

        let appearances: usize = view
            .constructors
            .iter()
            .map(|g| g.drivers.iter().filter(|d| d.code == "TSU").count())
            .sum();
        assert_eq!(appearances, 1);
    }

    #[test]
    fn override_outside_window_is_ignored() {
        let (drivers, constructors) = inputs();
        let view = build_championship(&drivers, &constructors, &[], &tsunoda_rule(), 2023, date(2023, 5, 1));
        let alpha = view.constructors.iter().find(|g| g.constructor_id == "alphatauri").unwrap();
        assert!(codes(alpha).contains(&"TSU"));
    }

    #[test]
    fn unknown_target_team_gets_its_own_group() {
        let (drivers, constructors) = inputs();
        let table = OverrideTable::new(vec![OverrideRule {
            season: 2023,
            driver_code: "DEV".to_string(),
            driver_name: None,
            team_name: "Brawn GP".to_string(),
            constructor_id: None,
            team_colour: None,
            effective_from: date(2023, 1, 1),
            effective_until: None,
        }]);
        let view = build_championship(&drivers, &constructors, &[], &table, 2023, date(2023, 7, 1));
        let last = view.constructors.last().unwrap();
        assert_eq!(last.team_name, "Brawn GP");
        assert_eq!(last.constructor_id, "brawn_gp");
        assert_eq!(last.position, 9);
        assert_eq!(codes(last), vec!["DEV"]);
    }

    #[test]
    fn live_data_supplies_photo_and_colour() {
        let (drivers, constructors) = inputs();
        let live = vec![DriverRecord {
            driver_number: 1,
            full_name: "Max VERSTAPPEN".to_string(),
            name_acronym: "VER".to_string(),
            team_name: "Red Bull Racing".to_string(),
            team_colour: Some("1E41FF".to_string()),
            country_code: Some("NED".to_string()),
            nationality: "Dutch".to_string(),
            headshot_url: Some("https://img/ver.png".to_string()),
        }];
        let view = build_championship(&drivers, &constructors, &live, &OverrideTable::default(), 2023, date(2023, 12, 31));
        let ver = &view.drivers[0];
        assert_eq!(ver.driver_number, Some(1));
        assert_eq!(ver.headshot_url.as_deref(), Some("https://img/ver.png"));
        assert_eq!(view.constructors[0].team_colour.as_deref(), Some("1E41FF"));
    }

    #[test]
    fn empty_inputs_build_empty_view() {
        let view = build_championship(&[], &[], &[], &OverrideTable::builtin(), 2025, date(2025, 6, 1));
        assert!(view.is_empty());
    }
}
