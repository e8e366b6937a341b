use std::sync::Arc;

use anyhow::Result;

use backend_application::{AnalyticsStore, AppState, Metrics};
use backend_infrastructure::{AppConfig, RestRepository};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let upstream_config = config.to_upstream_config();

        let repo = Arc::new(RestRepository::new(&upstream_config)?);
        let metrics = Arc::new(Metrics::default());
        let store = Arc::new(AnalyticsStore::new(
            repo.clone(),
            repo.clone(),
            metrics.clone(),
        ));

        let state = AppState {
            config: runtime_config,
            metadata_repo: repo,
            store,
            metrics,
        };

        Ok(Self { state })
    }
}
