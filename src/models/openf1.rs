//! Response rows of the live timing API. Every field the API has been seen to
//! omit is optional; mapping into canonical records happens in the sibling
//! model modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenF1Session {
    pub session_key: u32,
    pub meeting_key: u32,
    pub session_name: String,
    #[serde(default)]
    pub session_type: Option<String>,
    #[serde(default)]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub circuit_short_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenF1Driver {
    pub driver_number: u32,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub broadcast_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name_acronym: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub team_colour: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub headshot_url: Option<String>,
    #[serde(default)]
    pub session_key: Option<u32>,
}

impl OpenF1Driver {
    /// Display name, preferring the explicit full name over first/last parts.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.full_name.as_ref().filter(|n| !n.trim().is_empty()) {
            return Some(name.trim().to_string());
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            _ => self.broadcast_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenF1Meeting {
    pub meeting_key: u32,
    #[serde(default)]
    pub meeting_name: Option<String>,
    #[serde(default)]
    pub meeting_official_name: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub circuit_short_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl OpenF1Meeting {
    pub fn is_testing(&self) -> bool {
        self.meeting_name
            .as_deref()
            .map(|n| n.to_lowercase().contains("testing"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenF1Position {
    pub driver_number: u32,
    pub position: u32,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub session_key: Option<u32>,
    #[serde(default)]
    pub meeting_key: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenF1SessionResult {
    pub driver_number: u32,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub number_of_laps: Option<u32>,
    #[serde(default)]
    pub dnf: Option<bool>,
    #[serde(default)]
    pub dns: Option<bool>,
    #[serde(default)]
    pub dsq: Option<bool>,
}

impl OpenF1SessionResult {
    pub fn status(&self) -> &'static str {
        if self.dsq.unwrap_or(false) {
            "Disqualified"
        } else if self.dns.unwrap_or(false) {
            "Did not start"
        } else if self.dnf.unwrap_or(false) {
            "Retired"
        } else {
            "Finished"
        }
    }
}
