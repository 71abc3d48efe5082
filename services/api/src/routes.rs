use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use underwriter::workflows::analysis::{
    analysis_router, CompletionClient, SharedAnalysisService,
};
use underwriter::workflows::billing::{
    billing_router, BillingState, CheckoutGateway, SubscriptionStore,
};
use underwriter::workflows::underwriting::underwriting_router;

/// Compose the workflow routers with the operational endpoints.
pub(crate) fn with_api_routes<C, S, G>(
    analysis: SharedAnalysisService<C>,
    billing: BillingState<S, G>,
) -> axum::Router
where
    C: CompletionClient + 'static,
    S: SubscriptionStore + 'static,
    G: CheckoutGateway + 'static,
{
    underwriting_router()
        .merge(analysis_router(analysis))
        .merge(billing_router(billing))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemorySubscriptionStore, MockCheckoutGateway};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;
    use underwriter::workflows::analysis::OpenAiCompletionClient;
    use underwriter::workflows::billing::EntitlementService;

    fn test_router() -> axum::Router {
        let store = Arc::new(InMemorySubscriptionStore::default());
        let billing = BillingState {
            entitlements: Arc::new(EntitlementService::new(store)),
            gateway: Arc::new(MockCheckoutGateway::default()),
            webhook_secret: None,
        };
        with_api_routes::<OpenAiCompletionClient, _, _>(None, billing)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(payload["status"], "ok");
    }

    #[tokio::test]
    async fn snapshot_endpoint_is_wired_through_the_merge() {
        let body = serde_json::json!({
            "units": [{"beds": 2, "baths": 1, "rent": 950, "count": 6}],
        });
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/property/snapshot")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(payload["totalUnits"], 6);
        assert_eq!(payload["monthlyIncome"], 5700.0);
    }

    #[tokio::test]
    async fn analyze_without_configuration_surfaces_the_error_payload() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/property/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"propertyAddress": "12 Oak St"}"#))
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(payload["error"], "analysis backend not configured");
    }
}
