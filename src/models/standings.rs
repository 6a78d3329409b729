use serde::{Deserialize, Serialize};

use crate::models::{
    driver::DriverRef,
    ergast::{parse_num, ErgastConstructor, ErgastConstructorStanding, ErgastDriverStanding},
};
use crate::utils::teams::constructor_team_name;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorRef {
    pub constructor_id: String,
    pub name: String,
    pub nationality: Option<String>,
}

impl From<&ErgastConstructor> for ConstructorRef {
    fn from(constructor: &ErgastConstructor) -> Self {
        ConstructorRef {
            constructor_id: constructor.constructor_id.clone(),
            name: constructor_team_name(&constructor.constructor_id, &constructor.name),
            nationality: constructor.nationality.clone(),
        }
    }
}

impl ConstructorRef {
    pub fn unknown() -> Self {
        ConstructorRef {
            constructor_id: "unknown".to_string(),
            name: crate::models::driver::UNKNOWN.to_string(),
            nationality: None,
        }
    }
}

/// One row of the drivers' championship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub position: u32,
    pub points: f64,
    pub wins: u32,
    pub driver: DriverRef,
    pub constructor: ConstructorRef,
}

impl StandingEntry {
    /// `rank` is the row's index in upstream order plus one. It is used when
    /// the upstream leaves the position blank for unclassified drivers.
    pub fn from_upstream(standing: &ErgastDriverStanding, rank: u32) -> Self {
        StandingEntry {
            position: upstream_position(standing.position.as_deref(), rank),
            points: parse_num::<f64>(&standing.points).max(0.0),
            wins: parse_num(&standing.wins),
            driver: DriverRef::from(&standing.driver),
            // A driver who changed teams lists every constructor; the last
            // one is the current seat.
            constructor: standing
                .constructors
                .last()
                .map(ConstructorRef::from)
                .unwrap_or_else(ConstructorRef::unknown),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorStandingEntry {
    pub position: u32,
    pub points: f64,
    pub wins: u32,
    pub constructor: ConstructorRef,
}

impl ConstructorStandingEntry {
    pub fn from_upstream(standing: &ErgastConstructorStanding, rank: u32) -> Self {
        ConstructorStandingEntry {
            position: upstream_position(standing.position.as_deref(), rank),
            points: parse_num::<f64>(&standing.points).max(0.0),
            wins: parse_num(&standing.wins),
            constructor: ConstructorRef::from(&standing.constructor),
        }
    }
}

fn upstream_position(position: Option<&str>, rank: u32) -> u32 {
    position
        .and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(rank)
}

/// Driver as nested under a constructor in the championship view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStandingRef {
    pub code: String,
    pub full_name: String,
    pub driver_number: Option<u32>,
    pub position: u32,
    pub points: f64,
    pub wins: u32,
    pub constructor_id: String,
    pub team_name: String,
    pub team_colour: Option<String>,
    pub headshot_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorGroup {
    pub constructor_id: String,
    pub team_name: String,
    pub team_colour: Option<String>,
    pub points: f64,
    pub position: u32,
    pub wins: u32,
    pub drivers: Vec<DriverStandingRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChampionshipView {
    pub constructors: Vec<ConstructorGroup>,
    pub drivers: Vec<DriverStandingRef>,
}

impl ChampionshipView {
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty() && self.drivers.is_empty()
    }
}
