use crate::{
    models::{ergast::ErgastRace, error::FetchError, session::SessionRecord},
    services::StatsService,
};

impl StatsService {
    /// Sessions of `year`, optionally narrowed to one session name such as
    /// "Qualifying".
    pub async fn sessions(&self, year: i32, session_name: Option<&str>) -> Vec<SessionRecord> {
        let key = format!("sessions:{year}:{}", session_name.unwrap_or("all"));
        self.resolve(
            &key,
            || async move {
                let sessions = self.live.sessions(year, session_name).await?;
                let mut records: Vec<SessionRecord> = sessions
                    .iter()
                    .map(|s| SessionRecord::from_live(s, year))
                    .collect();
                records.sort_by_key(|s| s.date_start);
                Ok::<_, FetchError>(records)
            },
            || async move {
                let races = self.historical.races(year).await?;
                Ok::<_, FetchError>(sessions_from_schedule(&races, session_name))
            },
        )
        .await
    }
}

pub fn sessions_from_schedule(races: &[ErgastRace], session_name: Option<&str>) -> Vec<SessionRecord> {
    let mut sessions: Vec<SessionRecord> = races
        .iter()
        .flat_map(SessionRecord::from_schedule)
        .filter(|s| session_name.map_or(true, |n| s.session_name.eq_ignore_ascii_case(n)))
        .collect();
    sessions.sort_by_key(|s| s.date_start);
    sessions
}
