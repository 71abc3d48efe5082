use serde::{Deserialize, Serialize};

use super::plans::{Plan, PlanId};

/// The completed-payment event type the webhook fulfills.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Session metadata the processor round-trips verbatim. Values stay strings
/// end-to-end; fulfillment parses them back out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutMetadata {
    pub plan_id: Option<String>,
    pub downloads: Option<String>,
    pub expires_in_days: Option<String>,
}

impl CheckoutMetadata {
    pub fn for_plan(plan: &Plan) -> Self {
        Self {
            plan_id: Some(plan.id.key().to_string()),
            downloads: Some(plan.downloads.to_string()),
            expires_in_days: Some(plan.valid_for_days.to_string()),
        }
    }
}

/// A created checkout session, ready to hand to the client for redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub session_id: String,
    pub metadata: CheckoutMetadata,
}

/// Seam for the payment processor's checkout API.
pub trait CheckoutGateway: Send + Sync {
    fn create_session(
        &self,
        plan: &Plan,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, CheckoutError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("checkout gateway unavailable: {0}")]
    Unavailable(String),
}

/// Webhook payload from the payment processor.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    pub object: WebhookObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookObject {
    pub id: String,
    #[serde(default)]
    pub metadata: CheckoutMetadata,
}

/// What a fulfilled checkout grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationCommand {
    pub plan_id: PlanId,
    pub downloads: u32,
    pub expires_in_days: i64,
    pub session_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FulfillmentError {
    #[error("webhook event '{0}' is not a completed checkout")]
    UnexpectedEvent(String),
    #[error("missing plan information in session metadata")]
    MissingPlanInformation,
    #[error("unknown plan '{0}' in session metadata")]
    UnknownPlan(String),
}

impl WebhookEvent {
    /// Convert a completed-checkout event into the quota grant it encodes.
    ///
    /// A missing plan id or a zero download count is a fulfillment error;
    /// a missing expiry falls back to 30 days.
    pub fn fulfillment(&self) -> Result<ActivationCommand, FulfillmentError> {
        if self.kind != CHECKOUT_SESSION_COMPLETED {
            return Err(FulfillmentError::UnexpectedEvent(self.kind.clone()));
        }

        let metadata = &self.data.object.metadata;
        let plan_key = metadata
            .plan_id
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(FulfillmentError::MissingPlanInformation)?;
        let plan_id = PlanId::from_key(plan_key)
            .ok_or_else(|| FulfillmentError::UnknownPlan(plan_key.to_string()))?;

        let downloads = metadata
            .downloads
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0);
        if downloads == 0 {
            return Err(FulfillmentError::MissingPlanInformation);
        }

        let expires_in_days = metadata
            .expires_in_days
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(30);

        Ok(ActivationCommand {
            plan_id,
            downloads,
            expires_in_days,
            session_id: self.data.object.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed_event(metadata: serde_json::Value) -> WebhookEvent {
        serde_json::from_value(serde_json::json!({
            "type": CHECKOUT_SESSION_COMPLETED,
            "data": { "object": { "id": "cs_test_001", "metadata": metadata } },
        }))
        .expect("event parses")
    }

    #[test]
    fn metadata_for_plan_encodes_strings() {
        let metadata = CheckoutMetadata::for_plan(&Plan::for_id(PlanId::Enterprise));
        assert_eq!(metadata.plan_id.as_deref(), Some("enterprise"));
        assert_eq!(metadata.downloads.as_deref(), Some("100"));
        assert_eq!(metadata.expires_in_days.as_deref(), Some("365"));
    }

    #[test]
    fn completed_checkout_fulfills_the_grant() {
        let event = completed_event(serde_json::json!({
            "planId": "pro",
            "downloads": "15",
            "expiresInDays": "30",
        }));
        let command = event.fulfillment().expect("fulfills");
        assert_eq!(command.plan_id, PlanId::Pro);
        assert_eq!(command.downloads, 15);
        assert_eq!(command.expires_in_days, 30);
        assert_eq!(command.session_id, "cs_test_001");
    }

    #[test]
    fn missing_expiry_defaults_to_thirty_days() {
        let event = completed_event(serde_json::json!({
            "planId": "basic",
            "downloads": "3",
        }));
        assert_eq!(event.fulfillment().expect("fulfills").expires_in_days, 30);
    }

    #[test]
    fn missing_plan_or_zero_downloads_is_an_error() {
        let no_plan = completed_event(serde_json::json!({ "downloads": "3" }));
        assert!(matches!(
            no_plan.fulfillment(),
            Err(FulfillmentError::MissingPlanInformation)
        ));

        let zero = completed_event(serde_json::json!({
            "planId": "basic",
            "downloads": "0",
        }));
        assert!(matches!(
            zero.fulfillment(),
            Err(FulfillmentError::MissingPlanInformation)
        ));
    }

    #[test]
    fn other_events_are_not_fulfilled() {
        let event: WebhookEvent = serde_json::from_value(serde_json::json!({
            "type": "payment_intent.created",
            "data": { "object": { "id": "pi_123" } },
        }))
        .expect("event parses");
        assert!(matches!(
            event.fulfillment(),
            Err(FulfillmentError::UnexpectedEvent(kind)) if kind == "payment_intent.created"
        ));
    }
}
