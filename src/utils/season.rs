use chrono::{Datelike, NaiveDate, Utc};
use tokio::sync::watch;

pub const FIRST_SEASON: i32 = 1950;

/// The season the F1 calendar considers current on `today`. The championship
/// does not start before March, so January and February belong to the
/// previous season.
pub fn season_for(today: NaiveDate) -> i32 {
    if today.month() < 3 {
        today.year() - 1
    } else {
        today.year()
    }
}

pub fn current_season() -> i32 {
    season_for(Utc::now().date_naive())
}

/// Selected-season state shared by the service. Changes are published to
/// every subscriber.
#[derive(Clone)]
pub struct SeasonContext {
    tx: watch::Sender<i32>,
}

impl Default for SeasonContext {
    fn default() -> Self {
        Self::new(current_season())
    }
}

impl SeasonContext {
    pub fn new(year: i32) -> Self {
        let (tx, _rx) = watch::channel(year);
        SeasonContext { tx }
    }

    pub fn selected(&self) -> i32 {
        *self.tx.borrow()
    }

    /// Publish a new selection. Subscribers are only woken when the value
    /// actually changes.
    pub fn select(&self, year: i32) -> Result<i32, String> {
        validate_season(year)?;
        self.tx.send_if_modified(|current| {
            if *current == year {
                false
            } else {
                *current = year;
                true
            }
        });
        Ok(year)
    }

    pub fn subscribe(&self) -> watch::Receiver<i32> {
        self.tx.subscribe()
    }
}

pub fn validate_season(year: i32) -> Result<i32, String> {
    let latest = current_season() + 1;
    if (FIRST_SEASON..=latest).contains(&year) {
        Ok(year)
    } else {
        Err(format!(
            "season must be between {FIRST_SEASON} and {latest}, got {year}"
        ))
    }
}
