use std::sync::Arc;

use super::client::{CompletionClient, CompletionError};
use super::domain::{AnalysisReport, BuyerInfo, OfferTemplate};
use super::parser::{self, ResponseParseError};
use super::prompts;
use super::request::AnalysisRequest;

/// Orchestrates the three collaborator calls: validation, prompt assembly,
/// completion, and response parsing.
pub struct AnalysisService<C> {
    client: Arc<C>,
}

impl<C: CompletionClient> AnalysisService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Generate the investment analysis report. Validation failures reject
    /// the request before any collaborator traffic.
    pub async fn analyze(&self, property: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        require_address(property)?;
        let completion = prompts::analysis_completion(property)?;
        let raw = self.client.complete(completion).await?;
        Ok(parser::parse_report(&raw)?)
    }

    /// Generate a strategic offer template from the property and its report.
    pub async fn generate_offer(
        &self,
        property: &AnalysisRequest,
        report: &AnalysisReport,
    ) -> Result<OfferTemplate, AnalysisError> {
        require_address(property)?;
        let completion = prompts::offer_completion(property, report)?;
        let raw = self.client.complete(completion).await?;
        Ok(parser::parse_offer(&raw)?)
    }

    /// Generate the offer letter body. Free text; no structural parsing.
    pub async fn generate_offer_letter(
        &self,
        property: &AnalysisRequest,
        template: &OfferTemplate,
        buyer: &BuyerInfo,
    ) -> Result<String, AnalysisError> {
        require_address(property)?;
        if buyer.name.trim().is_empty() {
            return Err(AnalysisError::MissingBuyerName);
        }
        let completion = prompts::offer_letter_completion(property, template, buyer)?;
        let raw = self.client.complete(completion).await?;
        Ok(raw.trim().to_string())
    }
}

fn require_address(property: &AnalysisRequest) -> Result<(), AnalysisError> {
    if property.property_address.trim().is_empty() {
        return Err(AnalysisError::MissingPropertyAddress);
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis backend not configured: OPENAI_API_KEY is not set")]
    NotConfigured,
    #[error("property address is required")]
    MissingPropertyAddress,
    #[error("buyer name is required")]
    MissingBuyerName,
    #[error("failed to encode analysis request: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Response(#[from] ResponseParseError),
}
