use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySubscriptionStore, MockCheckoutGateway};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use underwriter::config::AppConfig;
use underwriter::error::AppError;
use underwriter::telemetry;
use underwriter::workflows::analysis::{AnalysisService, OpenAiCompletionClient};
use underwriter::workflows::billing::{BillingState, EntitlementService};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let analysis_service = match OpenAiCompletionClient::from_config(&config.analysis)
        .map_err(underwriter::workflows::analysis::AnalysisError::from)?
    {
        Some(client) => Some(Arc::new(AnalysisService::new(Arc::new(client)))),
        None => {
            warn!("OPENAI_API_KEY is not set; analysis endpoints will report a configuration error");
            None
        }
    };

    let store = Arc::new(InMemorySubscriptionStore::default());
    let billing = BillingState {
        entitlements: Arc::new(EntitlementService::new(store)),
        gateway: Arc::new(MockCheckoutGateway::default()),
        webhook_secret: config.billing.webhook_secret.clone(),
    };

    let app = with_api_routes(analysis_service, billing)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "apartment underwriter ready");

    axum::serve(listener, app).await?;
    Ok(())
}
