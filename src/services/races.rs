use crate::{
    models::{error::FetchError, openf1::OpenF1Meeting, race::RaceSummary},
    services::StatsService,
};

impl StatsService {
    /// Season calendar.
    pub async fn races(&self, year: i32) -> Vec<RaceSummary> {
        let key = format!("races:{year}");
        self.resolve(
            &key,
            || async move {
                let races = self.historical.races(year).await?;
                Ok::<_, FetchError>(races.iter().map(RaceSummary::from).collect::<Vec<_>>())
            },
            || async move {
                let meetings = self.live.meetings(year).await?;
                Ok::<_, FetchError>(calendar_from_meetings(meetings, year))
            },
        )
        .await
    }
}

/// Rounds numbered by meeting start, skipping pre-season testing.
pub fn calendar_from_meetings(mut meetings: Vec<OpenF1Meeting>, year: i32) -> Vec<RaceSummary> {
    meetings.retain(|m| !m.is_testing());
    meetings.sort_by_key(|m| m.date_start);
    meetings
        .iter()
        .enumerate()
        .map(|(i, m)| RaceSummary::from_meeting(m, year, i as u32 + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn testing_is_not_a_round() {
        let meetings: Vec<OpenF1Meeting> = serde_json::from_value(json!([
            {"meeting_key": 1229, "meeting_name": "Bahrain Grand Prix", "date_start": "2024-02-29T11:30:00+00:00", "year": 2024},
            {"meeting_key": 1228, "meeting_name": "Pre-Season Testing", "date_start": "2024-02-21T07:00:00+00:00", "year": 2024},
            {"meeting_key": 1230, "meeting_name": "Saudi Arabian Grand Prix", "date_start": "2024-03-07T13:30:00+00:00", "year": 2024}
        ]))
        .unwrap();
        let calendar = calendar_from_meetings(meetings, 2024);
        let rounds: Vec<(u32, &str)> = calendar
            .iter()
            .map(|r| (r.round, r.race_name.as_str()))
            .collect();
        assert_eq!(
            rounds,
            vec![(1, "Bahrain Grand Prix"), (2, "Saudi Arabian Grand Prix")]
        );
        assert_eq!(calendar[0].meeting_key, Some(1229));
    }
}
