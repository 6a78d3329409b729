use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    ergast::{parse_num, ErgastRace, ScheduleSlot},
    openf1::OpenF1Session,
};
use crate::utils::race_utils::unmap_session_name;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_key: Option<u32>,
    pub meeting_key: Option<u32>,
    pub session_name: String,
    pub session_type: Option<String>,
    pub date_start: Option<DateTime<Utc>>,
    pub country_name: Option<String>,
    pub circuit_short_name: Option<String>,
    pub year: i32,
    pub round: Option<u32>,
}

impl SessionRecord {
    pub fn from_live(session: &OpenF1Session, year: i32) -> Self {
        SessionRecord {
            session_key: Some(session.session_key),
            meeting_key: Some(session.meeting_key),
            session_name: session.session_name.clone(),
            session_type: session.session_type.clone(),
            date_start: session.date_start,
            country_name: session.country_name.clone(),
            circuit_short_name: session.circuit_short_name.clone(),
            year: session.year.unwrap_or(year),
            round: None,
        }
    }

    /// Sessions implied by a historical schedule entry. These carry no live
    /// session keys.
    pub fn from_schedule(race: &ErgastRace) -> Vec<Self> {
        let country = race
            .circuit
            .location
            .as_ref()
            .and_then(|l| l.country.clone());
        race.schedule()
            .into_iter()
            .filter_map(|(field, slot)| {
                let (name, session_type) = unmap_session_name(field)?;
                Some(SessionRecord {
                    session_key: None,
                    meeting_key: None,
                    session_name: name.to_string(),
                    session_type: Some(session_type.to_string()),
                    date_start: slot_start(&slot),
                    country_name: country.clone(),
                    circuit_short_name: Some(race.circuit.circuit_name.clone()),
                    year: parse_num(&race.season),
                    round: Some(parse_num(&race.round)),
                })
            })
            .collect()
    }
}

/// Combine a schedule date with its optional `HH:MM:SSZ` time. A missing time
/// means midnight UTC.
pub fn slot_start(slot: &ScheduleSlot) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(&slot.date, "%Y-%m-%d").ok()?;
    let time = slot
        .time
        .as_deref()
        .and_then(|t| NaiveTime::parse_from_str(t.trim_end_matches('Z'), "%H:%M:%S").ok())
        .unwrap_or(NaiveTime::MIN);
    Some(NaiveDateTime::new(date, time).and_utc())
}
