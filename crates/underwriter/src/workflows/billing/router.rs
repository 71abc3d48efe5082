use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::checkout::{CheckoutGateway, WebhookEvent, CHECKOUT_SESSION_COMPLETED};
use super::entitlement::{
    EntitlementError, EntitlementService, FreeTrialUsage, SubscriptionStore, UserSubscription,
};
use super::plans::{Plan, PlanId, PlanView};

/// Header carrying the shared webhook secret when one is configured.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Shared state for the billing endpoints.
pub struct BillingState<S, G> {
    pub entitlements: Arc<EntitlementService<S>>,
    pub gateway: Arc<G>,
    pub webhook_secret: Option<String>,
}

impl<S, G> Clone for BillingState<S, G> {
    fn clone(&self) -> Self {
        Self {
            entitlements: self.entitlements.clone(),
            gateway: self.gateway.clone(),
            webhook_secret: self.webhook_secret.clone(),
        }
    }
}

/// Router builder for plan listing, checkout, webhook fulfillment, and
/// download gating.
pub fn billing_router<S, G>(state: BillingState<S, G>) -> Router
where
    S: SubscriptionStore + 'static,
    G: CheckoutGateway + 'static,
{
    Router::new()
        .route("/api/v1/billing/plans", get(plans_handler))
        .route("/api/v1/billing/checkout", post(checkout_handler::<S, G>))
        .route("/api/v1/billing/webhook", post(webhook_handler::<S, G>))
        .route(
            "/api/v1/billing/entitlements",
            get(entitlements_handler::<S, G>),
        )
        .route("/api/v1/billing/download", post(download_handler::<S, G>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutRequest {
    pub(crate) plan_id: String,
    #[serde(default)]
    pub(crate) success_url: String,
    #[serde(default)]
    pub(crate) cancel_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutResponse {
    pub(crate) session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntitlementsResponse {
    pub(crate) free_trial: FreeTrialUsage,
    pub(crate) subscription: Option<UserSubscription>,
}

pub(crate) async fn plans_handler() -> Json<Vec<PlanView>> {
    Json(Plan::catalog().into_iter().map(PlanView::from).collect())
}

pub(crate) async fn checkout_handler<S, G>(
    State(state): State<BillingState<S, G>>,
    Json(payload): Json<CheckoutRequest>,
) -> Response
where
    S: SubscriptionStore + 'static,
    G: CheckoutGateway + 'static,
{
    let Some(plan_id) = PlanId::from_key(&payload.plan_id) else {
        let body = json!({ "error": "invalid plan selected" });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    };
    let plan = Plan::for_id(plan_id);

    match state
        .gateway
        .create_session(&plan, &payload.success_url, &payload.cancel_url)
    {
        Ok(session) => {
            info!(plan = plan_id.key(), session = %session.session_id, "checkout session created");
            let body = CheckoutResponse {
                session_id: session.session_id,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            warn!(plan = plan_id.key(), error = %err, "checkout session failed");
            let body = json!({ "error": "failed to create checkout session" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

pub(crate) async fn webhook_handler<S, G>(
    State(state): State<BillingState<S, G>>,
    headers: HeaderMap,
    body: String,
) -> Response
where
    S: SubscriptionStore + 'static,
    G: CheckoutGateway + 'static,
{
    if let Some(expected) = &state.webhook_secret {
        let presented = headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected.as_str()) {
            let payload = json!({ "error": "webhook signature verification failed" });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    }

    let event: WebhookEvent = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(err) => {
            let payload = json!({ "error": format!("webhook error: {err}") });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    // Only completed checkouts are fulfilled; every other event type is
    // acknowledged and dropped.
    if event.kind == CHECKOUT_SESSION_COMPLETED {
        let command = match event.fulfillment() {
            Ok(command) => command,
            Err(err) => {
                let payload = json!({
                    "error": "error fulfilling order",
                    "details": err.to_string(),
                });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
            }
        };

        match state.entitlements.activate(&command, Utc::now()) {
            Ok(subscription) => {
                info!(
                    plan = subscription.plan_id.key(),
                    downloads = subscription.downloads_remaining,
                    "subscription activated from webhook"
                );
            }
            Err(err) => {
                let payload = json!({
                    "error": "error fulfilling order",
                    "details": err.to_string(),
                });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
            }
        }
    }

    (StatusCode::OK, Json(json!({ "received": true }))).into_response()
}

pub(crate) async fn entitlements_handler<S, G>(
    State(state): State<BillingState<S, G>>,
) -> Response
where
    S: SubscriptionStore + 'static,
    G: CheckoutGateway + 'static,
{
    let free_trial = match state.entitlements.trial_usage() {
        Ok(usage) => usage,
        Err(err) => return store_failure(err),
    };
    let subscription = match state.entitlements.subscription() {
        Ok(subscription) => subscription,
        Err(err) => return store_failure(err),
    };

    (
        StatusCode::OK,
        Json(EntitlementsResponse {
            free_trial,
            subscription,
        }),
    )
        .into_response()
}

pub(crate) async fn download_handler<S, G>(State(state): State<BillingState<S, G>>) -> Response
where
    S: SubscriptionStore + 'static,
    G: CheckoutGateway + 'static,
{
    match state.entitlements.process_download(Utc::now()) {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(EntitlementError::Denied(reason)) => {
            let payload = json!({ "error": reason.detail() });
            (StatusCode::PAYMENT_REQUIRED, Json(payload)).into_response()
        }
        Err(EntitlementError::Store(err)) => store_failure(err),
    }
}

fn store_failure(err: super::entitlement::StoreError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
