use tracing::info;

use crate::{
    services::StatsService,
    utils::{config::Config, overrides::OverrideTable, season::SeasonContext},
};

pub struct AppState {
    pub config: Config,
    pub stats: StatsService,
    pub season: SeasonContext,
}

impl AppState {
    pub fn init(config: Config) -> Self {
        let overrides = OverrideTable::load(config.overrides_path.as_deref());
        let stats = StatsService::from_config(&config, overrides);
        let season = SeasonContext::default();
        info!("Selected season {}", season.selected());
        AppState {
            config,
            stats,
            season,
        }
    }

    pub fn with_service(config: Config, stats: StatsService, season: SeasonContext) -> Self {
        AppState {
            config,
            stats,
            season,
        }
    }
}
