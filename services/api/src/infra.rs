use desinfo::config::ClassifierConfig;
use desinfo::error::AppError;
use desinfo::workflows::analysis::{
    AnalysisService, CachedModelCatalog, DesinfoClient, ReportConfig, ScoreAggregator,
    ScoringConfig,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Analysis service backed by the remote classifier, with cached model listings.
pub(crate) type LiveAnalysisService =
    AnalysisService<DesinfoClient, CachedModelCatalog<DesinfoClient>>;

pub(crate) fn build_analysis_service(
    config: &ClassifierConfig,
) -> Result<Arc<LiveAnalysisService>, AppError> {
    let scoring = ScoringConfig::standard();
    let client = DesinfoClient::new(config, scoring.weights().clone())?;
    let catalog = CachedModelCatalog::new(client.clone(), config.model_cache_ttl);

    let service = AnalysisService::new(
        Arc::new(client),
        Arc::new(catalog),
        ScoreAggregator::new(scoring),
        ReportConfig::standard(),
    )
    .with_min_input_chars(config.min_input_chars);

    Ok(Arc::new(service))
}
