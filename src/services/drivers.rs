use std::collections::{HashMap, HashSet};

use crate::{
    models::{
        driver::{DriverRecord, PLACEHOLDER_NUMBER_BASE, UNKNOWN},
        ergast::{parse_opt, ErgastDriver, ErgastRace, StandingsList},
        error::FetchError,
        openf1::OpenF1Driver,
    },
    services::{or_empty, StatsService},
    utils::teams::{constructor_team_name, default_team_colour},
};

impl StatsService {
    /// Drivers of `year`, live session data merged with historical bios.
    pub async fn drivers(&self, year: i32) -> Vec<DriverRecord> {
        let key = format!("drivers:{year}");
        self.resolve(
            &key,
            || self.live_drivers(year),
            || self.historical_drivers(year),
        )
        .await
    }

    async fn live_drivers(&self, year: i32) -> Result<Vec<DriverRecord>, FetchError> {
        let Some(session) = self.live.latest_session(year).await? else {
            return Ok(Vec::new());
        };
        let live = self.live.drivers(session.session_key).await?;
        if live.is_empty() {
            return Ok(Vec::new());
        }
        let historical = or_empty("historical drivers", self.historical.drivers(year).await);
        Ok(merge_drivers(&live, &historical))
    }

    async fn historical_drivers(&self, year: i32) -> Result<Vec<DriverRecord>, FetchError> {
        let drivers = self.historical.drivers(year).await?;
        if drivers.is_empty() {
            return Ok(Vec::new());
        }
        let standings = or_empty(
            "driver standings",
            self.historical.driver_standings(year).await,
        );
        let numbers = if drivers.iter().all(|d| d.number().is_some()) {
            HashMap::new()
        } else {
            let races = or_empty("season results", self.historical.season_results(year).await);
            race_numbers(&races)
        };
        Ok(historical_records(&drivers, standings.as_ref(), &numbers))
    }
}

/// Find the historical entry for a live driver: permanent number, then
/// acronym, then case-insensitive full name. First match wins.
pub fn match_historical<'a>(
    live: &OpenF1Driver,
    historical: &'a [ErgastDriver],
) -> Option<&'a ErgastDriver> {
    historical
        .iter()
        .find(|h| h.number() == Some(live.driver_number))
        .or_else(|| {
            let acronym = live.name_acronym.as_deref()?;
            historical.iter().find(|h| {
                h.code
                    .as_deref()
                    .is_some_and(|code| code.eq_ignore_ascii_case(acronym))
            })
        })
        .or_else(|| {
            let name = live.display_name()?;
            historical
                .iter()
                .find(|h| h.full_name().eq_ignore_ascii_case(name.trim()))
        })
}

/// Live rows are authoritative for number, team and photo; the historical
/// feed supplies nationality and fills names the live feed left blank. Each
/// driver number appears once; the first live row wins.
pub fn merge_drivers(live: &[OpenF1Driver], historical: &[ErgastDriver]) -> Vec<DriverRecord> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(live.len());
    for driver in live {
        if !seen.insert(driver.driver_number) {
            continue;
        }
        let mut record = DriverRecord::from(driver);
        if let Some(h) = match_historical(driver, historical) {
            if let Some(nationality) = &h.nationality {
                record.nationality = nationality.clone();
            }
            if record.full_name == UNKNOWN {
                record.full_name = h.full_name();
            }
            if record.name_acronym == UNKNOWN {
                if let Some(code) = &h.code {
                    record.name_acronym = code.clone();
                }
            }
        }
        merged.push(record);
    }
    merged.sort_by_key(|d| d.driver_number);
    merged
}

/// Car number each driver raced with most recently, keyed by driver id.
pub fn race_numbers(races: &[ErgastRace]) -> HashMap<String, u32> {
    let mut numbers = HashMap::new();
    for result in races.iter().flat_map(|r| r.results.iter()) {
        if let Some(number) = parse_opt::<u32>(result.number.as_deref()) {
            numbers.insert(result.driver.driver_id.clone(), number);
        }
    }
    numbers
}

/// Records from the historical feed alone, with teams taken from the
/// standings when available.
///
/// Numbers come from the permanent number, then the race number of the
/// season. Drivers with neither, or whose number is already taken by an
/// earlier driver, get a placeholder number so that every driver is listed
/// and numbers stay unique.
pub fn historical_records(
    drivers: &[ErgastDriver],
    standings: Option<&StandingsList>,
    race_numbers: &HashMap<String, u32>,
) -> Vec<DriverRecord> {
    let teams: HashMap<&str, String> = standings
        .map(|list| {
            list.driver_standings
                .iter()
                .filter_map(|s| {
                    let constructor = s.constructors.last()?;
                    Some((
                        s.driver.driver_id.as_str(),
                        constructor_team_name(&constructor.constructor_id, &constructor.name),
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    let mut taken = HashSet::new();
    let mut seen_ids = HashSet::new();
    let mut next_placeholder = PLACEHOLDER_NUMBER_BASE;
    let mut records = Vec::with_capacity(drivers.len());
    for d in drivers {
        if !seen_ids.insert(d.driver_id.as_str()) {
            continue;
        }
        let number = d
            .number()
            .or_else(|| race_numbers.get(&d.driver_id).copied())
            .filter(|n| !taken.contains(n))
            .unwrap_or_else(|| {
                next_placeholder += 1;
                next_placeholder - 1
            });
        taken.insert(number);

        let mut record = DriverRecord::from_historical(d, number);
        if let Some(team) = teams.get(d.driver_id.as_str()) {
            record.team_colour = default_team_colour(team);
            record.team_name = team.clone();
        }
        records.push(record);
    }
    records.sort_by_key(|d| d.driver_number);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn live(number: u32, acronym: &str, name: &str, team: &str) -> OpenF1Driver {
        serde_json::from_value(json!({
            "driver_number": number,
            "name_acronym": acronym,
            "full_name": name,
            "team_name": team,
            "headshot_url": format!("https://img/{acronym}.png"),
        }))
        .unwrap()
    }

    fn historical(id: &str, number: Option<&str>, code: Option<&str>, given: &str, family: &str, nat: &str) -> ErgastDriver {
        serde_json::from_value(json!({
            "driverId": id,
            "permanentNumber": number,
            "code": code,
            "givenName": given,
            "familyName": family,
            "nationality": nat,
        }))
        .unwrap()
    }

    #[test]
    fn merges_on_acronym_when_numbers_differ() {
        let merged = merge_drivers(
            &[live(1, "VER", "Max VERSTAPPEN", "Red Bull")],
            &[historical("max_verstappen", Some("33"), Some("VER"), "Max", "Verstappen", "Dutch")],
        );
        assert_eq!(merged.len(), 1);
        let ver = &merged[0];
        assert_eq!(ver.driver_number, 1);
        assert_eq!(ver.team_name, "Red Bull Racing");
        assert_eq!(ver.nationality, "Dutch");
        assert_eq!(ver.headshot_url.as_deref(), Some("https://img/VER.png"));
    }

    #[test]
    fn number_match_takes_precedence_over_acronym() {
        let hist = [
            historical("a", Some("44"), Some("HAM"), "Lewis", "Hamilton", "British"),
            historical("b", Some("99"), Some("HAM"), "Someone", "Else", "German"),
        ];
        let found = match_historical(&live(99, "HAM", "x", "Ferrari"), &hist).unwrap();
        assert_eq!(found.driver_id, "b");
    }

    #[test]
    fn falls_back_to_case_insensitive_name() {
        let hist = [historical("zhou", None, None, "Guanyu", "Zhou", "Chinese")];
        let mut driver = live(24, "ZHO", "GUANYU ZHOU", "Kick Sauber");
        driver.name_acronym = None;
        assert_eq!(match_historical(&driver, &hist).unwrap().driver_id, "zhou");
    }

    #[test]
    fn unmatched_drivers_keep_placeholders_and_numbers_stay_unique() {
        let merged = merge_drivers(
            &[
                live(43, "COL", "Franco COLAPINTO", "Williams"),
                live(43, "COL", "Franco COLAPINTO", "Williams"),
            ],
            &[],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].nationality, UNKNOWN);
        assert_eq!(merged[0].country_code, None);
    }

    #[test]
    fn historical_only_records_take_team_from_standings() {
        let drivers = [
            historical("leclerc", Some("16"), Some("LEC"), "Charles", "Leclerc", "Monegasque"),
            historical("reserve", None, Some("RES"), "No", "Number", "Nowhere"),
        ];
        let standings: StandingsList = serde_json::from_value(json!({
            "season": "2024",
            "DriverStandings": [{
                "points": "356", "wins": "3",
                "Driver": {"driverId": "leclerc", "givenName": "Charles", "familyName": "Leclerc"},
                "Constructors": [{"constructorId": "ferrari", "name": "Ferrari"}]
            }]
        }))
        .unwrap();

        let records = historical_records(&drivers, Some(&standings), &HashMap::new());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].team_name, "Ferrari");
        assert_eq!(records[0].team_colour.as_deref(), Some("E8002D"));
        assert_eq!(records[0].nationality, "Monegasque");
        assert_eq!(records[1].full_name, "No Number");
        assert_eq!(records[1].team_name, UNKNOWN);
        assert!(records[1].has_placeholder_number());
    }

    #[test]
    fn pre_permanent_number_seasons_use_race_numbers() {
        let drivers = [
            historical("hamilton", Some("44"), Some("HAM"), "Lewis", "Hamilton", "British"),
            historical("webber", None, Some("WEB"), "Mark", "Webber", "Australian"),
            historical("trulli", None, Some("TRU"), "Jarno", "Trulli", "Italian"),
            historical("bourdais", None, Some("BOU"), "Sébastien", "Bourdais", "French"),
        ];
        let races: Vec<ErgastRace> = serde_json::from_value(json!([{
            "season": "2008", "round": "1", "raceName": "Australian Grand Prix",
            "Circuit": {"circuitId": "albert_park", "circuitName": "Albert Park"}, "date": "2008-03-16",
            "Results": [
                {"number": "22", "position": "1", "Driver": {"driverId": "hamilton", "givenName": "Lewis", "familyName": "Hamilton"},
                 "Constructor": {"constructorId": "mclaren", "name": "McLaren"}},
                {"number": "10", "position": "15", "Driver": {"driverId": "webber", "givenName": "Mark", "familyName": "Webber"},
                 "Constructor": {"constructorId": "red_bull", "name": "Red Bull"}},
                {"number": "11", "position": "16", "Driver": {"driverId": "trulli", "givenName": "Jarno", "familyName": "Trulli"},
                 "Constructor": {"constructorId": "toyota", "name": "Toyota"}}
            ]
        }]))
        .unwrap();

        let records = historical_records(&drivers, None, &race_numbers(&races));
        let rows: Vec<(u32, &str)> = records
            .iter()
            .map(|r| (r.driver_number, r.name_acronym.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![(10, "WEB"), (11, "TRU"), (44, "HAM"), (PLACEHOLDER_NUMBER_BASE, "BOU")]
        );
    }

    #[test]
    fn shared_race_number_falls_back_to_placeholder() {
        let drivers = [
            historical("sato", None, Some("SAT"), "Takuma", "Sato", "Japanese"),
            historical("davidson", None, Some("DAV"), "Anthony", "Davidson", "British"),
        ];
        let numbers = HashMap::from([
            ("sato".to_string(), 18),
            ("davidson".to_string(), 18),
        ]);
        let records = historical_records(&drivers, None, &numbers);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].driver_number, 18);
        assert_eq!(records[0].name_acronym, "SAT");
        assert!(records[1].has_placeholder_number());
    }
}
