use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    driver::UNKNOWN,
    ergast::{parse_num, parse_opt, ErgastRace, ErgastResult},
    openf1::OpenF1Meeting,
    session::slot_start,
};
use crate::utils::teams::constructor_team_name;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub season: i32,
    pub round: u32,
    pub race_name: String,
    pub circuit_name: String,
    pub locality: Option<String>,
    pub country: Option<String>,
    pub date: Option<NaiveDate>,
    pub starts_at: Option<DateTime<Utc>>,
    pub meeting_key: Option<u32>,
}

impl From<&ErgastRace> for RaceSummary {
    fn from(race: &ErgastRace) -> Self {
        let location = race.circuit.location.as_ref();
        let start = race
            .schedule()
            .into_iter()
            .find(|(field, _)| *field == "Race")
            .and_then(|(_, slot)| slot_start(&slot));
        RaceSummary {
            season: parse_num(&race.season),
            round: parse_num(&race.round),
            race_name: race.race_name.clone(),
            circuit_name: race.circuit.circuit_name.clone(),
            locality: location.and_then(|l| l.locality.clone()),
            country: location.and_then(|l| l.country.clone()),
            date: NaiveDate::parse_from_str(&race.date, "%Y-%m-%d").ok(),
            starts_at: start,
            meeting_key: None,
        }
    }
}

impl RaceSummary {
    pub fn from_meeting(meeting: &OpenF1Meeting, season: i32, round: u32) -> Self {
        RaceSummary {
            season: meeting.year.unwrap_or(season),
            round,
            race_name: meeting
                .meeting_name
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            circuit_name: meeting
                .circuit_short_name
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            locality: meeting.location.clone(),
            country: meeting.country_name.clone(),
            date: meeting.date_start.map(|d| d.date_naive()),
            starts_at: meeting.date_start,
            meeting_key: Some(meeting.meeting_key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResultEntry {
    pub position: Option<u32>,
    pub driver_number: Option<u32>,
    pub code: String,
    pub full_name: String,
    pub team_name: String,
    pub grid: Option<u32>,
    pub laps: Option<u32>,
    pub status: String,
    pub points: f64,
    pub time: Option<String>,
}

impl From<&ErgastResult> for RaceResultEntry {
    fn from(result: &ErgastResult) -> Self {
        RaceResultEntry {
            position: parse_opt(result.position.as_deref()),
            driver_number: parse_opt(result.number.as_deref()).or(result.driver.number()),
            code: result
                .driver
                .code
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            full_name: result.driver.full_name(),
            team_name: constructor_team_name(
                &result.constructor.constructor_id,
                &result.constructor.name,
            ),
            grid: parse_opt(result.grid.as_deref()),
            laps: parse_opt(result.laps.as_deref()),
            status: result
                .status
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            points: result.points.as_deref().map(parse_num).unwrap_or(0.0),
            time: result.time.as_ref().and_then(|t| t.time.clone()),
        }
    }
}
