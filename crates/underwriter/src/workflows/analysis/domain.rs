use serde::{Deserialize, Serialize};

/// Structured investment analysis returned by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
    pub recommended_offer_price: f64,
    pub recommended_offer_price_rationale: String,
    pub cap_rate_analysis: String,
    pub cash_flow_analysis: String,
    pub return_on_investment: String,
    pub recommendations: Vec<String>,
}

/// Strategic offer terms derived from the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferTemplate {
    pub offer_price: f64,
    pub contingencies: Vec<String>,
    pub closing_timeframe: String,
    pub financing_terms: String,
    pub due_date: String,
    pub additional_terms: String,
}

/// Who the offer letter is written on behalf of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuyerInfo {
    pub name: String,
    pub company: String,
    pub contact: String,
}
