use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use underwriter::workflows::billing::{
    CheckoutError, CheckoutGateway, CheckoutMetadata, CheckoutSession, FreeTrialUsage, Plan,
    StoreError, SubscriptionStore, UserSubscription,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local subscription state behind the store trait. Stands in for a
/// database or browser storage; it holds a single client's entitlements.
#[derive(Default)]
pub(crate) struct InMemorySubscriptionStore {
    subscription: Mutex<Option<UserSubscription>>,
    trial: Mutex<Option<FreeTrialUsage>>,
}

impl SubscriptionStore for InMemorySubscriptionStore {
    fn subscription(&self) -> Result<Option<UserSubscription>, StoreError> {
        Ok(self
            .subscription
            .lock()
            .expect("subscription mutex poisoned")
            .clone())
    }

    fn store_subscription(&self, subscription: UserSubscription) -> Result<(), StoreError> {
        *self
            .subscription
            .lock()
            .expect("subscription mutex poisoned") = Some(subscription);
        Ok(())
    }

    fn trial_usage(&self) -> Result<FreeTrialUsage, StoreError> {
        Ok((*self.trial.lock().expect("trial mutex poisoned")).unwrap_or_default())
    }

    fn store_trial_usage(&self, usage: FreeTrialUsage) -> Result<(), StoreError> {
        *self.trial.lock().expect("trial mutex poisoned") = Some(usage);
        Ok(())
    }
}

/// Fabricates sequence-numbered checkout sessions so the billing flow can be
/// exercised without a payment-processor account.
#[derive(Default)]
pub(crate) struct MockCheckoutGateway {
    sequence: AtomicU64,
}

impl CheckoutGateway for MockCheckoutGateway {
    fn create_session(
        &self,
        plan: &Plan,
        _success_url: &str,
        _cancel_url: &str,
    ) -> Result<CheckoutSession, CheckoutError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(CheckoutSession {
            session_id: format!("cs_mock_{id:06}"),
            metadata: CheckoutMetadata::for_plan(plan),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use underwriter::workflows::billing::PlanId;

    #[test]
    fn store_starts_with_a_fresh_trial_and_no_subscription() {
        let store = InMemorySubscriptionStore::default();
        assert!(store.subscription().expect("readable").is_none());
        let trial = store.trial_usage().expect("readable");
        assert_eq!(trial.analyses_used, 0);
        assert_eq!(trial.total_allowed, 2);
    }

    #[test]
    fn mock_gateway_numbers_sessions() {
        let gateway = MockCheckoutGateway::default();
        let plan = Plan::for_id(PlanId::Basic);
        let first = gateway.create_session(&plan, "", "").expect("session");
        let second = gateway.create_session(&plan, "", "").expect("session");
        assert_eq!(first.session_id, "cs_mock_000001");
        assert_eq!(second.session_id, "cs_mock_000002");
        assert_eq!(first.metadata.plan_id.as_deref(), Some("basic"));
    }
}
