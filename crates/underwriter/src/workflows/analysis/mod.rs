//! The external analysis collaborator: request assembly, prompt templates,
//! the completion-client seam, response parsing, and the HTTP surface.

pub mod client;
pub mod domain;
pub mod parser;
pub(crate) mod prompts;
pub mod request;
pub mod router;
pub mod service;

pub use client::{CompletionClient, CompletionError, CompletionRequest, OpenAiCompletionClient};
pub use domain::{AnalysisReport, BuyerInfo, OfferTemplate};
pub use parser::ResponseParseError;
pub use request::AnalysisRequest;
pub use router::{analysis_router, SharedAnalysisService};
pub use service::{AnalysisError, AnalysisService};
