use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStatistics {
    pub driver_id: String,
    pub code: String,
    pub full_name: String,
    pub driver_number: Option<u32>,
    pub team_name: String,
    pub races: u32,
    pub wins: u32,
    pub podiums: u32,
    pub poles: u32,
    pub points: f64,
    pub dnfs: u32,
    pub best_finish: Option<u32>,
    pub fastest_laps: u32,
}
