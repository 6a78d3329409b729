use serde::{Deserialize, Serialize};

use crate::models::{ergast::ErgastDriver, openf1::OpenF1Driver};
use crate::utils::teams::canonical_team_name;

pub const UNKNOWN: &str = "Unknown";

/// A driver as shown to consumers, merged from the live and historical feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRecord {
    pub driver_number: u32,
    pub full_name: String,
    pub name_acronym: String,
    pub team_name: String,
    pub team_colour: Option<String>,
    pub country_code: Option<String>,
    pub nationality: String,
    pub headshot_url: Option<String>,
}

impl From<&OpenF1Driver> for DriverRecord {
    fn from(live: &OpenF1Driver) -> Self {
        DriverRecord {
            driver_number: live.driver_number,
            full_name: live.display_name().unwrap_or_else(|| UNKNOWN.to_string()),
            name_acronym: live
                .name_acronym
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            team_name: live
                .team_name
                .as_deref()
                .map(canonical_team_name)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            team_colour: live.team_colour.clone(),
            country_code: live.country_code.clone(),
            nationality: UNKNOWN.to_string(),
            headshot_url: live.headshot_url.clone(),
        }
    }
}

/// First number handed to drivers the historical feed has no number for.
/// Real car numbers never reach it.
pub const PLACEHOLDER_NUMBER_BASE: u32 = 1000;

impl DriverRecord {
    /// Record built from the historical feed alone; the caller resolves the
    /// number, since older seasons carry no permanent numbers.
    pub fn from_historical(driver: &ErgastDriver, driver_number: u32) -> Self {
        DriverRecord {
            driver_number,
            full_name: driver.full_name(),
            name_acronym: driver
                .code
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            team_name: UNKNOWN.to_string(),
            team_colour: None,
            country_code: None,
            nationality: driver
                .nationality
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            headshot_url: None,
        }
    }

    pub fn has_placeholder_number(&self) -> bool {
        self.driver_number >= PLACEHOLDER_NUMBER_BASE
    }
}

/// Compact driver reference used inside standings and results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRef {
    pub driver_id: String,
    pub code: Option<String>,
    pub permanent_number: Option<u32>,
    pub full_name: String,
    pub nationality: Option<String>,
}

impl From<&ErgastDriver> for DriverRef {
    fn from(driver: &ErgastDriver) -> Self {
        DriverRef {
            driver_id: driver.driver_id.clone(),
            code: driver.code.clone(),
            permanent_number: driver.number(),
            full_name: driver.full_name(),
            nationality: driver.nationality.clone(),
        }
    }
}

impl DriverRef {
    /// Acronym, falling back to the upper-cased first three letters of the
    /// family name the way broadcast graphics do.
    pub fn acronym(&self) -> String {
        if let Some(code) = &self.code {
            return code.clone();
        }
        self.full_name
            .split_whitespace()
            .last()
            .map(|family| family.chars().take(3).collect::<String>().to_uppercase())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}
