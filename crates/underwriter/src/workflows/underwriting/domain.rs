use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::coercion;

/// Bedroom count for a unit row, with the zero-bedroom studio sentinel.
///
/// Serializes as a JSON number, or the string `"eff"` for efficiencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Beds {
    Count(u8),
    Efficiency,
}

impl fmt::Display for Beds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Beds::Count(count) => write!(f, "{count}"),
            Beds::Efficiency => write!(f, "eff"),
        }
    }
}

impl Serialize for Beds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Beds::Count(count) => serializer.serialize_u64(u64::from(*count)),
            Beds::Efficiency => serializer.serialize_str("eff"),
        }
    }
}

impl<'de> Deserialize<'de> for Beds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum BedsRepr {
            Count(u8),
            Text(String),
        }

        match BedsRepr::deserialize(deserializer)? {
            BedsRepr::Count(count) => Ok(Beds::Count(count)),
            BedsRepr::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.eq_ignore_ascii_case("eff") || trimmed.eq_ignore_ascii_case("efficiency")
                {
                    return Ok(Beds::Efficiency);
                }
                trimmed
                    .parse::<u8>()
                    .map(Beds::Count)
                    .map_err(|_| DeError::custom(format!("'{raw}' is not a bedroom count")))
            }
        }
    }
}

/// One row of the unit-mix table.
///
/// `ttl_month_rent` is a cached derived value (`count * rent`); it is
/// recomputed by every mutator and on deserialization, never accepted from
/// the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "UnitTypeWire")]
pub struct UnitType {
    pub beds: Beds,
    pub baths: f64,
    rent: f64,
    ttl_month_rent: f64,
    count: u32,
}

impl UnitType {
    pub fn new(beds: Beds, baths: f64) -> Self {
        Self {
            beds,
            baths,
            rent: 0.0,
            ttl_month_rent: 0.0,
            count: 0,
        }
    }

    pub fn rent(&self) -> f64 {
        self.rent
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn ttl_month_rent(&self) -> f64 {
        self.ttl_month_rent
    }

    pub fn set_rent(&mut self, rent: f64) {
        self.rent = if rent.is_finite() && rent > 0.0 { rent } else { 0.0 };
        self.refresh_total();
    }

    pub fn set_count(&mut self, count: u32) {
        self.count = count;
        self.refresh_total();
    }

    fn refresh_total(&mut self) {
        self.ttl_month_rent = f64::from(self.count) * self.rent;
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitTypeWire {
    beds: Beds,
    #[serde(default, deserialize_with = "coercion::lenient_amount")]
    baths: f64,
    #[serde(default, deserialize_with = "coercion::lenient_amount")]
    rent: f64,
    #[serde(default, deserialize_with = "coercion::lenient_count")]
    count: u32,
}

impl From<UnitTypeWire> for UnitType {
    fn from(wire: UnitTypeWire) -> Self {
        let mut row = UnitType::new(wire.beds, wire.baths);
        row.set_rent(wire.rent);
        row.set_count(wire.count);
        row
    }
}

/// The fixed, ordered unit-mix table.
///
/// Eight rows are seeded at form creation and edited in place; rows are
/// never added or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitMix {
    rows: Vec<UnitType>,
}

impl UnitMix {
    /// The default form layout: 1/1, 2/1, 2/1.5, three 2/2 rows, 3/2, and an
    /// efficiency row.
    pub fn standard() -> Self {
        Self {
            rows: vec![
                UnitType::new(Beds::Count(1), 1.0),
                UnitType::new(Beds::Count(2), 1.0),
                UnitType::new(Beds::Count(2), 1.5),
                UnitType::new(Beds::Count(2), 2.0),
                UnitType::new(Beds::Count(2), 2.0),
                UnitType::new(Beds::Count(2), 2.0),
                UnitType::new(Beds::Count(3), 2.0),
                UnitType::new(Beds::Efficiency, 0.0),
            ],
        }
    }

    pub fn rows(&self) -> &[UnitType] {
        &self.rows
    }

    pub fn set_count(&mut self, index: usize, count: u32) -> Result<(), UnitMixError> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(UnitMixError::RowOutOfRange(index))?;
        row.set_count(count);
        Ok(())
    }

    pub fn set_rent(&mut self, index: usize, rent: f64) -> Result<(), UnitMixError> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(UnitMixError::RowOutOfRange(index))?;
        row.set_rent(rent);
        Ok(())
    }
}

impl Default for UnitMix {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UnitMixError {
    #[error("unit mix has no row at index {0}")]
    RowOutOfRange(usize),
}

/// The closed set of annual operating expense categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ExpenseCategory {
    Taxes,
    Insurance,
    WaterSewer,
    FloodInsurance,
    TrashRemoval,
    Electric,
    Gas,
    Oil,
    Legal,
    Management,
    Payroll,
    Repairs,
    Supplies,
    PestControl,
    Telephone,
    Advertising,
    PoolMaintenance,
    GeneralAdmin,
    ContractServices,
    Security,
    Other,
}

impl ExpenseCategory {
    pub const fn ordered() -> [Self; 21] {
        [
            Self::Taxes,
            Self::Insurance,
            Self::WaterSewer,
            Self::FloodInsurance,
            Self::TrashRemoval,
            Self::Electric,
            Self::Gas,
            Self::Oil,
            Self::Legal,
            Self::Management,
            Self::Payroll,
            Self::Repairs,
            Self::Supplies,
            Self::PestControl,
            Self::Telephone,
            Self::Advertising,
            Self::PoolMaintenance,
            Self::GeneralAdmin,
            Self::ContractServices,
            Self::Security,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Taxes => "Taxes Due next year",
            Self::Insurance => "Insurance",
            Self::WaterSewer => "Water & Sewer",
            Self::FloodInsurance => "Flood Insurance",
            Self::TrashRemoval => "Trash Removal",
            Self::Electric => "Electric",
            Self::Gas => "Gas",
            Self::Oil => "Oil",
            Self::Legal => "Legal & Acct, license & permit",
            Self::Management => "Management Fees",
            Self::Payroll => "Onsite Payroll & benefits",
            Self::Repairs => "Repairs & Maintenance",
            Self::Supplies => "Supplies & Miscellaneous",
            Self::PestControl => "Pest Control",
            Self::Telephone => "Telephone",
            Self::Advertising => "Advertising/marketing",
            Self::PoolMaintenance => "Pool Maintenance/landscaping",
            Self::GeneralAdmin => "General Admin",
            Self::ContractServices => "Other Contract Services",
            Self::Security => "Security",
            Self::Other => "Other",
        }
    }
}

/// Annual amounts by expense category. Unlisted categories read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExpenseLedger {
    amounts: BTreeMap<ExpenseCategory, f64>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: ExpenseCategory, amount: f64) {
        let amount = if amount.is_finite() && amount > 0.0 {
            amount
        } else {
            0.0
        };
        self.amounts.insert(category, amount);
    }

    pub fn amount(&self, category: ExpenseCategory) -> f64 {
        self.amounts.get(&category).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.amounts.values().sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = (ExpenseCategory, f64)> + '_ {
        self.amounts.iter().map(|(category, amount)| (*category, *amount))
    }
}

impl<'de> Deserialize<'de> for ExpenseLedger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw =
            BTreeMap::<ExpenseCategory, Option<coercion::NumberOrText>>::deserialize(deserializer)?;
        let mut ledger = ExpenseLedger::new();
        for (category, repr) in raw {
            ledger.set(category, coercion::amount_from_repr(repr).unwrap_or(0.0));
        }
        Ok(ledger)
    }
}

/// A currency amount that is explicitly present or absent.
///
/// "Unset" is distinct from zero: unset price fields leave dependent ratios
/// uncomputed and display as the "-" placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionalAmount(Option<f64>);

impl OptionalAmount {
    pub const fn unset() -> Self {
        Self(None)
    }

    pub fn set(value: f64) -> Self {
        if value.is_finite() {
            Self(Some(value))
        } else {
            Self(None)
        }
    }

    pub fn get(self) -> Option<f64> {
        self.0
    }

    pub fn or_zero(self) -> f64 {
        self.0.unwrap_or(0.0)
    }

    pub fn is_set(self) -> bool {
        self.0.is_some()
    }

    /// The value when present and nonzero; the gate for dependent ratios.
    pub fn nonzero(self) -> Option<f64> {
        self.0.filter(|value| *value != 0.0)
    }

    /// Fixed-decimal rendering, or the "-" placeholder when unset.
    pub fn format_or_dash(self, decimals: usize) -> String {
        match self.0 {
            Some(value) => format!("{value:.decimals$}"),
            None => "-".to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for OptionalAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = Option::<coercion::NumberOrText>::deserialize(deserializer)?;
        Ok(Self(coercion::amount_from_repr(repr)))
    }
}
