//! Plans, checkout-session brokering, webhook fulfillment, and download
//! entitlements. The payment processor itself is an external collaborator
//! behind the `CheckoutGateway` trait; persistence is behind
//! `SubscriptionStore`.

pub mod checkout;
pub mod entitlement;
pub mod plans;
pub mod router;

pub use checkout::{
    ActivationCommand, CheckoutError, CheckoutGateway, CheckoutMetadata, CheckoutSession,
    FulfillmentError, WebhookEvent, CHECKOUT_SESSION_COMPLETED,
};
pub use entitlement::{
    DenialReason, DownloadReceipt, DownloadSource, EntitlementError, EntitlementService,
    FreeTrialUsage, StoreError, SubscriptionStore, UserSubscription,
};
pub use plans::{Plan, PlanId};
pub use router::{billing_router, BillingState};
