use std::sync::Arc;

use backend_domain::ports::{GeoLookup, ScanEventRepository, WineRepository};
use backend_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub scan_repo: Arc<dyn ScanEventRepository>,
    pub wine_repo: Arc<dyn WineRepository>,
    pub geo: Arc<dyn GeoLookup>,
    pub metrics: Arc<Metrics>,
}
