//! Prompt templates for the three generations. Each builder encodes its
//! payloads as pretty JSON and pins the sampling temperature the collaborator
//! is called with.

use super::client::CompletionRequest;
use super::domain::{AnalysisReport, BuyerInfo, OfferTemplate};
use super::request::AnalysisRequest;

const JSON_ONLY: &str = "IMPORTANT: Return ONLY a valid JSON object with no markdown formatting, no code blocks, and no additional text.";

pub(crate) fn analysis_completion(
    property: &AnalysisRequest,
) -> Result<CompletionRequest, serde_json::Error> {
    let system = format!(
        "You are an expert real estate investment analyst specializing in apartment buildings. \
         Analyze the provided apartment property data and generate a comprehensive investment analysis report. \
         Focus on key metrics like cap rate, cash flow, ROI, and provide actionable insights. \
         Be specific, data-driven, and highlight both opportunities and risks. \
         {JSON_ONLY}"
    );

    let prompt = format!(
        "Analyze this apartment property data and provide a detailed investment analysis report:\n\n\
         {}\n\n\
         Return ONLY a JSON object with the following structure (no markdown, no code blocks, no additional text):\n\
         {{\n\
           \"summary\": \"Brief executive summary of the property and investment opportunity\",\n\
           \"strengths\": [\"List of property strengths\"],\n\
           \"weaknesses\": [\"List of property weaknesses\"],\n\
           \"opportunities\": [\"List of investment opportunities\"],\n\
           \"threats\": [\"List of investment risks\"],\n\
           \"recommendedOfferPrice\": number,\n\
           \"recommendedOfferPriceRationale\": \"Explanation for the recommended offer price\",\n\
           \"capRateAnalysis\": \"Analysis of the cap rate and how it compares to market\",\n\
           \"cashFlowAnalysis\": \"Analysis of potential cash flow\",\n\
           \"returnOnInvestment\": \"Projected ROI analysis\",\n\
           \"recommendations\": [\"List of specific recommendations\"]\n\
         }}",
        serde_json::to_string_pretty(property)?
    );

    Ok(CompletionRequest {
        system,
        prompt,
        temperature: 0.2,
    })
}

pub(crate) fn offer_completion(
    property: &AnalysisRequest,
    report: &AnalysisReport,
) -> Result<CompletionRequest, serde_json::Error> {
    let system = format!(
        "You are an expert real estate investment advisor specializing in apartment buildings. \
         Based on the property data and analysis report, generate a strategic offer template. \
         The offer should be competitive but favorable to the investor. \
         {JSON_ONLY}"
    );

    let prompt = format!(
        "Generate a strategic offer template for this property based on the data and analysis:\n\n\
         Property Data:\n{}\n\n\
         Analysis Report:\n{}\n\n\
         Return ONLY a JSON object with the following structure (no markdown, no code blocks, no additional text):\n\
         {{\n\
           \"offerPrice\": number,\n\
           \"contingencies\": [\"List of recommended contingencies\"],\n\
           \"closingTimeframe\": \"Recommended closing timeframe\",\n\
           \"financingTerms\": \"Recommended financing terms\",\n\
           \"dueDate\": \"Recommended offer expiration date (7 days from now)\",\n\
           \"additionalTerms\": \"Any additional terms or conditions\"\n\
         }}",
        serde_json::to_string_pretty(property)?,
        serde_json::to_string_pretty(report)?
    );

    Ok(CompletionRequest {
        system,
        prompt,
        temperature: 0.3,
    })
}

pub(crate) fn offer_letter_completion(
    property: &AnalysisRequest,
    template: &OfferTemplate,
    buyer: &BuyerInfo,
) -> Result<CompletionRequest, serde_json::Error> {
    let system = "You are an expert real estate professional who drafts clear, professional \
                  offer letters for apartment building acquisitions. Create a formal offer letter \
                  that is concise, professional, and includes all necessary terms."
        .to_string();

    let prompt = format!(
        "Generate a professional offer letter for the following apartment property:\n\n\
         Property Data:\n{}\n\n\
         Offer Terms:\n{}\n\n\
         Buyer Information:\n{}\n\n\
         The letter should be formatted professionally with proper sections for property details, \
         offer price, terms, contingencies, closing timeline, and next steps. Make it concise but \
         comprehensive, ready for submission to the property owner.",
        serde_json::to_string_pretty(property)?,
        serde_json::to_string_pretty(template)?,
        serde_json::to_string_pretty(buyer)?
    );

    Ok(CompletionRequest {
        system,
        prompt,
        temperature: 0.3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::underwriting::{FinancialSnapshot, PropertyInputs};

    fn sample_request() -> AnalysisRequest {
        let mut inputs = PropertyInputs::default();
        inputs.identity.property_address = "1200 Ingersoll Ave".to_string();
        let snapshot = FinancialSnapshot::derive(&inputs);
        AnalysisRequest::assemble(&inputs, &snapshot)
    }

    #[test]
    fn analysis_prompt_embeds_the_property_json() {
        let completion = analysis_completion(&sample_request()).expect("prompt builds");
        assert!(completion.prompt.contains("1200 Ingersoll Ave"));
        assert!(completion.prompt.contains("recommendedOfferPrice"));
        assert_eq!(completion.temperature, 0.2);
    }

    #[test]
    fn offer_letter_prompt_is_free_text() {
        let request = sample_request();
        let template = OfferTemplate {
            offer_price: 900000.0,
            contingencies: vec!["Inspection".to_string()],
            closing_timeframe: "45 days".to_string(),
            financing_terms: "Conventional".to_string(),
            due_date: "2026-08-13".to_string(),
            additional_terms: String::new(),
        };
        let buyer = BuyerInfo {
            name: "M. Keller".to_string(),
            company: "Keller Holdings".to_string(),
            contact: "m@kellerholdings.example".to_string(),
        };

        let completion =
            offer_letter_completion(&request, &template, &buyer).expect("prompt builds");
        assert!(completion.prompt.contains("Keller Holdings"));
        assert!(!completion.system.contains("JSON"));
    }
}
