use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryResponseRepository};
use crate::routes::with_survey_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use sus_survey::config::{AppConfig, StorageBackend};
use sus_survey::error::AppError;
use sus_survey::survey::{CsvResponseRepository, SurveyService};
use sus_survey::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(results) = args.results.take() {
        config.storage.results_path = results;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let survey_routes = match config.storage.backend {
        StorageBackend::Csv => {
            info!(path = %config.storage.results_path.display(), "storing survey results on disk");
            let repository = Arc::new(CsvResponseRepository::new(&config.storage.results_path));
            with_survey_routes(Arc::new(SurveyService::new(repository)))
        }
        StorageBackend::Memory => {
            info!("storing survey results in memory");
            let repository = Arc::new(InMemoryResponseRepository::default());
            with_survey_routes(Arc::new(SurveyService::new(repository)))
        }
    };

    let app = survey_routes
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "sus survey service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
