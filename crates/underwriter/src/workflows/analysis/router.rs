use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::workflows::underwriting::{FinancialSnapshot, PropertyInputs};

use super::client::CompletionClient;
use super::domain::{AnalysisReport, BuyerInfo, OfferTemplate};
use super::request::AnalysisRequest;
use super::service::{AnalysisError, AnalysisService};

/// Shared state for the analysis endpoints. The service is absent when no
/// API key is configured; requests then receive the configuration error.
pub type SharedAnalysisService<C> = Option<Arc<AnalysisService<C>>>;

/// Router builder for the collaborator-backed endpoints.
pub fn analysis_router<C: CompletionClient + 'static>(
    service: SharedAnalysisService<C>,
) -> Router {
    Router::new()
        .route("/api/v1/property/analyze", post(analyze_handler::<C>))
        .route("/api/v1/property/offer", post(offer_handler::<C>))
        .route(
            "/api/v1/property/offer-letter",
            post(offer_letter_handler::<C>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalyzeResponse {
    pub(crate) snapshot: FinancialSnapshot,
    pub(crate) report: AnalysisReport,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OfferRequest {
    pub(crate) property: PropertyInputs,
    pub(crate) analysis_report: AnalysisReport,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OfferLetterRequest {
    pub(crate) property: PropertyInputs,
    pub(crate) offer_template: OfferTemplate,
    pub(crate) buyer_info: BuyerInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OfferLetterResponse {
    pub(crate) offer_letter: String,
}

pub(crate) async fn analyze_handler<C: CompletionClient + 'static>(
    State(service): State<SharedAnalysisService<C>>,
    Json(inputs): Json<PropertyInputs>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let service = service.ok_or(AnalysisError::NotConfigured)?;

    let snapshot = FinancialSnapshot::derive(&inputs);
    let request = AnalysisRequest::assemble(&inputs, &snapshot);
    let report = service.analyze(&request).await?;

    Ok(Json(AnalyzeResponse { snapshot, report }))
}

pub(crate) async fn offer_handler<C: CompletionClient + 'static>(
    State(service): State<SharedAnalysisService<C>>,
    Json(payload): Json<OfferRequest>,
) -> Result<Json<OfferTemplate>, AppError> {
    let service = service.ok_or(AnalysisError::NotConfigured)?;

    let snapshot = FinancialSnapshot::derive(&payload.property);
    let request = AnalysisRequest::assemble(&payload.property, &snapshot);
    let template = service
        .generate_offer(&request, &payload.analysis_report)
        .await?;

    Ok(Json(template))
}

pub(crate) async fn offer_letter_handler<C: CompletionClient + 'static>(
    State(service): State<SharedAnalysisService<C>>,
    Json(payload): Json<OfferLetterRequest>,
) -> Result<Json<OfferLetterResponse>, AppError> {
    let service = service.ok_or(AnalysisError::NotConfigured)?;

    let snapshot = FinancialSnapshot::derive(&payload.property);
    let request = AnalysisRequest::assemble(&payload.property, &snapshot);
    let offer_letter = service
        .generate_offer_letter(&request, &payload.offer_template, &payload.buyer_info)
        .await?;

    Ok(Json(OfferLetterResponse { offer_letter }))
}
