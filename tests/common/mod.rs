#![allow(dead_code)]

use chrono::Duration;
use f1_stats::{
    services::{ergast::HistoricalSource, openf1::LiveSource, upstream::Upstream, StatsService},
    utils::{cache::ResponseCache, config::Config, overrides::OverrideTable},
};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::Value;

pub fn config_for(server: &ServerGuard) -> Config {
    Config::unthrottled(
        &format!("{}/v1", server.url()),
        &format!("{}/ergast/f1", server.url()),
    )
}

pub fn service(server: &ServerGuard) -> StatsService {
    StatsService::from_config(&config_for(server), OverrideTable::default())
}

pub fn service_with(
    server: &ServerGuard,
    cache: ResponseCache,
    overrides: OverrideTable,
) -> StatsService {
    let config = config_for(server);
    let upstream = Upstream::new(&config);
    StatsService::new(
        cache,
        LiveSource::new(upstream.clone(), &config.openf1_base_url),
        HistoricalSource::new(upstream, &config.ergast_base_url),
        overrides,
    )
}

pub fn short_lived_cache(ms: i64) -> ResponseCache {
    ResponseCache::with_ttl(Duration::milliseconds(ms))
}

/// A JSON GET mock that ignores the query string. Not yet created.
pub fn json_get(server: &mut ServerGuard, path: &str, body: Value) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
}

pub fn status_get(server: &mut ServerGuard, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(status)
}

/// A standings envelope; `kind` is `DriverStandings` or `ConstructorStandings`.
pub fn ergast_standings(kind: &str, rows: Value) -> Value {
    let mut list = serde_json::json!({"season": "2024", "round": "24"});
    list[kind] = rows;
    serde_json::json!({
        "MRData": {
            "total": "1",
            "StandingsTable": {"season": "2024", "StandingsLists": [list]}
        }
    })
}

pub fn ergast_empty_standings() -> Value {
    serde_json::json!({"MRData": {"total": "0", "StandingsTable": {"StandingsLists": []}}})
}

pub fn ergast_races(total: usize, races: Value) -> Value {
    serde_json::json!({
        "MRData": {"total": total.to_string(), "RaceTable": {"Races": races}}
    })
}

pub fn ergast_drivers(drivers: Value) -> Value {
    serde_json::json!({
        "MRData": {"total": "1", "DriverTable": {"Drivers": drivers}}
    })
}
