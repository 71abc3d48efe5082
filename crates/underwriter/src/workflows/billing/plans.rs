use serde::{Deserialize, Serialize};

/// The closed set of purchasable plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    Basic,
    Pro,
    Enterprise,
}

impl PlanId {
    pub const fn ordered() -> [Self; 3] {
        [Self::Basic, Self::Pro, Self::Enterprise]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Pro => "Professional",
            Self::Enterprise => "Enterprise",
        }
    }

    pub fn from_key(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "pro" => Some(Self::Pro),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }
}

/// Fixed price, quota, and validity for one plan. Prices are integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub id: PlanId,
    pub price_cents: u32,
    pub downloads: u32,
    pub valid_for_days: i64,
    pub features: &'static [&'static str],
}

impl Plan {
    pub const fn catalog() -> [Plan; 3] {
        [
            Plan {
                id: PlanId::Basic,
                price_cents: 999,
                downloads: 3,
                valid_for_days: 30,
                features: &[
                    "Download PDF reports",
                    "Basic watermark removal",
                    "Valid for 30 days",
                ],
            },
            Plan {
                id: PlanId::Pro,
                price_cents: 2999,
                downloads: 15,
                valid_for_days: 30,
                features: &[
                    "Download PDF reports",
                    "No watermarks",
                    "Excel export",
                    "Valid for 30 days",
                ],
            },
            Plan {
                id: PlanId::Enterprise,
                price_cents: 9999,
                downloads: 100,
                valid_for_days: 365,
                features: &[
                    "Unlimited PDF downloads",
                    "No watermarks",
                    "Excel & CSV exports",
                    "API access",
                    "Valid for 1 year",
                ],
            },
        ]
    }

    pub fn for_id(id: PlanId) -> Plan {
        match id {
            PlanId::Basic => Self::catalog()[0],
            PlanId::Pro => Self::catalog()[1],
            PlanId::Enterprise => Self::catalog()[2],
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.label()
    }

    pub fn price_dollars(&self) -> f64 {
        f64::from(self.price_cents) / 100.0
    }
}

/// API view of a plan for the pricing endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    pub id: PlanId,
    pub name: &'static str,
    pub price: f64,
    pub downloads: u32,
    pub valid_for_days: i64,
    pub features: Vec<&'static str>,
}

impl From<Plan> for PlanView {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id,
            name: plan.name(),
            price: plan.price_dollars(),
            downloads: plan.downloads,
            valid_for_days: plan.valid_for_days,
            features: plan.features.to_vec(),
        }
    }
}
