use tracing::debug;

use crate::{
    models::{
        ergast::{ErgastDriver, ErgastRace, ErgastResponse, StandingsList},
        error::FetchError,
    },
    services::upstream::Upstream,
};

/// Largest page the historical API serves.
pub const PAGE_LIMIT: usize = 100;

/// Sprints have scored points since 2021.
pub const FIRST_SPRINT_SEASON: i32 = 2021;

/// Client for the historical results API.
#[derive(Clone)]
pub struct HistoricalSource {
    upstream: Upstream,
    base_url: String,
}

impl HistoricalSource {
    pub fn new(upstream: Upstream, base_url: &str) -> Self {
        HistoricalSource {
            upstream,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get(&self, path: &str, limit: usize, offset: usize) -> Result<ErgastResponse, FetchError> {
        let url = format!(
            "{}/{path}/?format=json&limit={limit}&offset={offset}",
            self.base_url
        );
        self.upstream.get_json(url).await
    }

    pub async fn races(&self, year: i32) -> Result<Vec<ErgastRace>, FetchError> {
        Ok(self.get(&format!("{year}/races"), PAGE_LIMIT, 0).await?.mr_data.races())
    }

    pub async fn drivers(&self, year: i32) -> Result<Vec<ErgastDriver>, FetchError> {
        Ok(self
            .get(&format!("{year}/drivers"), PAGE_LIMIT, 0)
            .await?
            .mr_data
            .drivers())
    }

    pub async fn driver_standings(&self, year: i32) -> Result<Option<StandingsList>, FetchError> {
        Ok(self
            .get(&format!("{year}/driverstandings"), PAGE_LIMIT, 0)
            .await?
            .mr_data
            .standings_list())
    }

    pub async fn constructor_standings(
        &self,
        year: i32,
    ) -> Result<Option<StandingsList>, FetchError> {
        Ok(self
            .get(&format!("{year}/constructorstandings"), PAGE_LIMIT, 0)
            .await?
            .mr_data
            .standings_list())
    }

    pub async fn race_results(&self, year: i32, round: u32) -> Result<Option<ErgastRace>, FetchError> {
        Ok(self
            .get(&format!("{year}/{round}/results"), PAGE_LIMIT, 0)
            .await?
            .mr_data
            .races()
            .into_iter()
            .next())
    }

    /// Every grand prix result of the season.
    pub async fn season_results(&self, year: i32) -> Result<Vec<ErgastRace>, FetchError> {
        self.paged_races(&format!("{year}/results")).await
    }

    /// Every sprint result of the season, carried in `sprint_results`.
    pub async fn sprint_results(&self, year: i32) -> Result<Vec<ErgastRace>, FetchError> {
        if year < FIRST_SPRINT_SEASON {
            return Ok(Vec::new());
        }
        self.paged_races(&format!("{year}/sprint")).await
    }

    /// Grand prix and sprint results folded onto one race list, for points
    /// totals.
    pub async fn points_results(&self, year: i32) -> Result<Vec<ErgastRace>, FetchError> {
        let (mut races, sprints) =
            tokio::try_join!(self.season_results(year), self.sprint_results(year))?;
        merge_race_pages(&mut races, sprints);
        Ok(races)
    }

    /// Result rows are paged, so a race can be split across two pages; rows
    /// are folded back onto their race.
    async fn paged_races(&self, path: &str) -> Result<Vec<ErgastRace>, FetchError> {
        let mut races: Vec<ErgastRace> = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.get(path, PAGE_LIMIT, offset).await?.mr_data;
            let total = page.total();
            let page_races = page.races();
            let rows: usize = page_races
                .iter()
                .map(|r| r.results.len() + r.sprint_results.len())
                .sum();
            debug!("{path}: {rows} rows at offset {offset} of {total}");

            merge_race_pages(&mut races, page_races);

            offset += PAGE_LIMIT;
            if rows == 0 || offset >= total {
                break;
            }
        }
        Ok(races)
    }
}

fn merge_race_pages(races: &mut Vec<ErgastRace>, page: Vec<ErgastRace>) {
    for race in page {
        match races
            .iter_mut()
            .find(|r| r.season == race.season && r.round == race.round)
        {
            Some(existing) => {
                existing.results.extend(race.results);
                existing.sprint_results.extend(race.sprint_results);
            }
            None => races.push(race),
        }
    }
}
