use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::checkout::ActivationCommand;
use super::plans::PlanId;

/// Analyses included before any purchase.
pub const FREE_TRIAL_ANALYSES: u32 = 2;

/// Free-trial consumption counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeTrialUsage {
    pub analyses_used: u32,
    pub total_allowed: u32,
}

impl Default for FreeTrialUsage {
    fn default() -> Self {
        Self {
            analyses_used: 0,
            total_allowed: FREE_TRIAL_ANALYSES,
        }
    }
}

impl FreeTrialUsage {
    pub fn remaining(&self) -> u32 {
        self.total_allowed.saturating_sub(self.analyses_used)
    }
}

/// The active (or lapsed) purchase for this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubscription {
    pub plan_id: PlanId,
    pub active: bool,
    pub downloads_remaining: u32,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_session_id: Option<String>,
}

/// Persistence seam for subscription and trial state. The store decides
/// where the data lives (memory, browser storage, a database); the service
/// never holds process-wide mutable state of its own.
pub trait SubscriptionStore: Send + Sync {
    fn subscription(&self) -> Result<Option<UserSubscription>, StoreError>;
    fn store_subscription(&self, subscription: UserSubscription) -> Result<(), StoreError>;
    fn trial_usage(&self) -> Result<FreeTrialUsage, StoreError>;
    fn store_trial_usage(&self, usage: FreeTrialUsage) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("subscription store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadSource {
    FreeTrial,
    Subscription,
}

/// Outcome of a granted download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadReceipt {
    pub source: DownloadSource,
    pub downloads_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    NoSubscription,
    Inactive,
    QuotaExhausted,
    Expired,
}

impl DenialReason {
    pub const fn detail(self) -> &'static str {
        match self {
            Self::NoSubscription => "no active subscription and no free trial remaining",
            Self::Inactive => "subscription has been cancelled",
            Self::QuotaExhausted => "download quota exhausted",
            Self::Expired => "subscription has expired",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EntitlementError {
    #[error("download denied: {}", .0.detail())]
    Denied(DenialReason),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Download gating over an explicit store. Free-trial uses are consumed
/// before any subscription quota; callers supply `now` so the logic stays
/// deterministic under test.
pub struct EntitlementService<S> {
    store: Arc<S>,
}

impl<S: SubscriptionStore> EntitlementService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn trial_usage(&self) -> Result<FreeTrialUsage, StoreError> {
        self.store.trial_usage()
    }

    pub fn subscription(&self) -> Result<Option<UserSubscription>, StoreError> {
        self.store.subscription()
    }

    pub fn has_free_trial_remaining(&self) -> Result<bool, StoreError> {
        Ok(self.store.trial_usage()?.remaining() > 0)
    }

    pub fn can_download(&self, now: DateTime<Utc>) -> Result<bool, StoreError> {
        if self.has_free_trial_remaining()? {
            return Ok(true);
        }

        let Some(subscription) = self.store.subscription()? else {
            return Ok(false);
        };
        Ok(subscription.active
            && subscription.downloads_remaining > 0
            && now <= subscription.expires_at)
    }

    /// Consume one download: a trial use first, else subscription quota.
    pub fn process_download(
        &self,
        now: DateTime<Utc>,
    ) -> Result<DownloadReceipt, EntitlementError> {
        let usage = self.store.trial_usage()?;
        if usage.remaining() > 0 {
            let updated = FreeTrialUsage {
                analyses_used: usage.analyses_used + 1,
                ..usage
            };
            self.store.store_trial_usage(updated)?;
            return Ok(DownloadReceipt {
                source: DownloadSource::FreeTrial,
                downloads_remaining: updated.remaining(),
            });
        }

        let Some(mut subscription) = self.store.subscription()? else {
            return Err(EntitlementError::Denied(DenialReason::NoSubscription));
        };
        if !subscription.active {
            return Err(EntitlementError::Denied(DenialReason::Inactive));
        }
        if subscription.downloads_remaining == 0 {
            return Err(EntitlementError::Denied(DenialReason::QuotaExhausted));
        }
        if now > subscription.expires_at {
            return Err(EntitlementError::Denied(DenialReason::Expired));
        }

        subscription.downloads_remaining -= 1;
        let downloads_remaining = subscription.downloads_remaining;
        self.store.store_subscription(subscription)?;

        Ok(DownloadReceipt {
            source: DownloadSource::Subscription,
            downloads_remaining,
        })
    }

    /// Install the subscription a fulfilled checkout grants.
    pub fn activate(
        &self,
        command: &ActivationCommand,
        now: DateTime<Utc>,
    ) -> Result<UserSubscription, StoreError> {
        let subscription = UserSubscription {
            plan_id: command.plan_id,
            active: true,
            downloads_remaining: command.downloads,
            expires_at: now + Duration::days(command.expires_in_days),
            checkout_session_id: Some(command.session_id.clone()),
        };
        self.store.store_subscription(subscription.clone())?;
        Ok(subscription)
    }

    /// Deactivate in place; a no-op when nothing was ever purchased.
    pub fn cancel(&self) -> Result<(), StoreError> {
        if let Some(mut subscription) = self.store.subscription()? {
            subscription.active = false;
            self.store.store_subscription(subscription)?;
        }
        Ok(())
    }
}
