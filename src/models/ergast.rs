//! Response shapes of the historical results API. All numbers arrive as
//! strings; `parse_num` converts them, treating malformed values as zero.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct ErgastResponse {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MrData {
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub offset: Option<String>,
    #[serde(rename = "RaceTable", default)]
    pub race_table: Option<RaceTable>,
    #[serde(rename = "StandingsTable", default)]
    pub standings_table: Option<StandingsTable>,
    #[serde(rename = "DriverTable", default)]
    pub driver_table: Option<DriverTable>,
}

impl MrData {
    pub fn total(&self) -> usize {
        self.total.as_deref().map(parse_num).unwrap_or(0)
    }

    pub fn races(self) -> Vec<ErgastRace> {
        self.race_table.map(|t| t.races).unwrap_or_default()
    }

    pub fn drivers(self) -> Vec<ErgastDriver> {
        self.driver_table.map(|t| t.drivers).unwrap_or_default()
    }

    /// Only the first standings list is meaningful for a single season query.
    pub fn standings_list(self) -> Option<StandingsList> {
        self.standings_table
            .and_then(|t| t.standings_lists.into_iter().next())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaceTable {
    #[serde(default)]
    pub season: Option<String>,
    #[serde(rename = "Races", default)]
    pub races: Vec<ErgastRace>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandingsTable {
    #[serde(default)]
    pub season: Option<String>,
    #[serde(rename = "StandingsLists", default)]
    pub standings_lists: Vec<StandingsList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverTable {
    #[serde(rename = "Drivers", default)]
    pub drivers: Vec<ErgastDriver>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandingsList {
    pub season: String,
    #[serde(default)]
    pub round: Option<String>,
    #[serde(rename = "DriverStandings", default)]
    pub driver_standings: Vec<ErgastDriverStanding>,
    #[serde(rename = "ConstructorStandings", default)]
    pub constructor_standings: Vec<ErgastConstructorStanding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErgastDriver {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "permanentNumber", default)]
    pub permanent_number: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(rename = "dateOfBirth", default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}

impl ErgastDriver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }

    pub fn number(&self) -> Option<u32> {
        self.permanent_number
            .as_deref()
            .and_then(|n| n.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErgastConstructor {
    #[serde(rename = "constructorId")]
    pub constructor_id: String,
    pub name: String,
    #[serde(default)]
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErgastDriverStanding {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(rename = "positionText", default)]
    pub position_text: Option<String>,
    pub points: String,
    pub wins: String,
    #[serde(rename = "Driver")]
    pub driver: ErgastDriver,
    #[serde(rename = "Constructors", default)]
    pub constructors: Vec<ErgastConstructor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErgastConstructorStanding {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(rename = "positionText", default)]
    pub position_text: Option<String>,
    pub points: String,
    pub wins: String,
    #[serde(rename = "Constructor")]
    pub constructor: ErgastConstructor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErgastLocation {
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErgastCircuit {
    #[serde(rename = "circuitId")]
    pub circuit_id: String,
    #[serde(rename = "circuitName")]
    pub circuit_name: String,
    #[serde(rename = "Location", default)]
    pub location: Option<ErgastLocation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSlot {
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErgastRace {
    pub season: String,
    pub round: String,
    #[serde(rename = "raceName")]
    pub race_name: String,
    #[serde(rename = "Circuit")]
    pub circuit: ErgastCircuit,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(rename = "FirstPractice", default)]
    pub first_practice: Option<ScheduleSlot>,
    #[serde(rename = "SecondPractice", default)]
    pub second_practice: Option<ScheduleSlot>,
    #[serde(rename = "ThirdPractice", default)]
    pub third_practice: Option<ScheduleSlot>,
    #[serde(rename = "SprintQualifying", alias = "SprintShootout", default)]
    pub sprint_qualifying: Option<ScheduleSlot>,
    #[serde(rename = "Sprint", default)]
    pub sprint: Option<ScheduleSlot>,
    #[serde(rename = "Qualifying", default)]
    pub qualifying: Option<ScheduleSlot>,
    #[serde(rename = "Results", default)]
    pub results: Vec<ErgastResult>,
    #[serde(rename = "SprintResults", default)]
    pub sprint_results: Vec<ErgastResult>,
}

impl ErgastRace {
    /// Schedule slots in weekend order, keyed by schedule field name. The race
    /// itself is included last.
    pub fn schedule(&self) -> Vec<(&'static str, ScheduleSlot)> {
        let mut slots = Vec::new();
        let fields = [
            ("FirstPractice", &self.first_practice),
            ("SecondPractice", &self.second_practice),
            ("ThirdPractice", &self.third_practice),
            ("SprintQualifying", &self.sprint_qualifying),
            ("Sprint", &self.sprint),
            ("Qualifying", &self.qualifying),
        ];
        for (name, slot) in fields {
            if let Some(slot) = slot {
                slots.push((name, slot.clone()));
            }
        }
        slots.push((
            "Race",
            ScheduleSlot {
                date: self.date.clone(),
                time: self.time.clone(),
            },
        ));
        slots
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErgastTime {
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErgastFastestLap {
    #[serde(default)]
    pub rank: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErgastResult {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub points: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: ErgastDriver,
    #[serde(rename = "Constructor")]
    pub constructor: ErgastConstructor,
    #[serde(default)]
    pub grid: Option<String>,
    #[serde(default)]
    pub laps: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "Time", default)]
    pub time: Option<ErgastTime>,
    #[serde(rename = "FastestLap", default)]
    pub fastest_lap: Option<ErgastFastestLap>,
}

pub fn parse_num<T: FromStr + Default>(raw: &str) -> T {
    raw.trim().parse().unwrap_or_default()
}

pub fn parse_opt<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|r| r.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_standings_envelope() {
        let body = json!({
            "MRData": {
                "total": "1",
                "StandingsTable": {
                    "season": "2024",
                    "StandingsLists": [{
                        "season": "2024",
                        "round": "24",
                        "DriverStandings": [{
                            "position": "1",
                            "positionText": "1",
                            "points": "437",
                            "wins": "9",
                            "Driver": {
                                "driverId": "max_verstappen",
                                "permanentNumber": "33",
                                "code": "VER",
                                "givenName": "Max",
                                "familyName": "Verstappen",
                                "nationality": "Dutch"
                            },
                            "Constructors": [{"constructorId": "red_bull", "name": "Red Bull"}]
                        }]
                    }]
                }
            }
        });
        let parsed: ErgastResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.mr_data.total(), 1);
        let list = parsed.mr_data.standings_list().unwrap();
        let standing = &list.driver_standings[0];
        assert_eq!(standing.driver.full_name(), "Max Verstappen");
        assert_eq!(standing.driver.number(), Some(33));
        assert_eq!(parse_num::<f64>(&standing.points), 437.0);
    }

    #[test]
    fn empty_standings_list_is_none() {
        let body = json!({"MRData": {"StandingsTable": {"StandingsLists": []}}});
        let parsed: ErgastResponse = serde_json::from_value(body).unwrap();
        assert!(parsed.mr_data.standings_list().is_none());
    }

    #[test]
    fn schedule_lists_race_last() {
        let body = json!({
            "season": "2024", "round": "6", "raceName": "Miami Grand Prix",
            "Circuit": {"circuitId": "miami", "circuitName": "Miami International Autodrome"},
            "date": "2024-05-05", "time": "20:00:00Z",
            "FirstPractice": {"date": "2024-05-03", "time": "16:30:00Z"},
            "SprintQualifying": {"date": "2024-05-03", "time": "20:30:00Z"},
            "Sprint": {"date": "2024-05-04", "time": "16:00:00Z"},
            "Qualifying": {"date": "2024-05-04", "time": "20:00:00Z"}
        });
        let race: ErgastRace = serde_json::from_value(body).unwrap();
        let names: Vec<&str> = race.schedule().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["FirstPractice", "SprintQualifying", "Sprint", "Qualifying", "Race"]);
    }

    #[test]
    fn malformed_numbers_default_to_zero() {
        assert_eq!(parse_num::<u32>("n/a"), 0);
        assert_eq!(parse_opt::<u32>(Some(" 3 ")), Some(3));
        assert_eq!(parse_opt::<u32>(None), None);
    }
}
