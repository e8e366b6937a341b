use std::sync::Arc;

use backend_domain::ports::MetadataRepository;
use backend_domain::RuntimeConfig;

use crate::store::AnalyticsStore;
use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    /// Kept alongside the store for readiness probes.
    pub metadata_repo: Arc<dyn MetadataRepository>,
    pub store: Arc<AnalyticsStore>,
    pub metrics: Arc<Metrics>,
}
