//! Unit mix, expense ledger, and the pure derivation of underwriting metrics.

pub(crate) mod coercion;
pub mod domain;
pub mod engine;
pub mod export;
pub mod inputs;
pub mod router;

pub use domain::{Beds, ExpenseCategory, ExpenseLedger, OptionalAmount, UnitMix, UnitMixError, UnitType};
pub use engine::FinancialSnapshot;
pub use inputs::{MortgageSchedule, MortgageTerms, PropertyIdentity, PropertyInputs};
pub use router::underwriting_router;
