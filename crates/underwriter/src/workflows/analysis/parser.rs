//! Cleanup and structural parsing of collaborator output.
//!
//! Models sometimes wrap the JSON payload in markdown code fences even when
//! instructed not to; fences are stripped before parsing, and a structural
//! mismatch is a distinct user-visible error rather than a crash.

use serde::de::DeserializeOwned;

use super::domain::{AnalysisReport, OfferTemplate};

const SNIPPET_LIMIT: usize = 120;

#[derive(Debug, thiserror::Error)]
pub enum ResponseParseError {
    #[error("analysis response was not valid JSON ({source}); response began: {snippet}")]
    Structure {
        #[source]
        source: serde_json::Error,
        snippet: String,
    },
}

/// Remove markdown code-fence markers from a raw model response.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains("```") {
        trimmed
            .lines()
            .filter(|line| !line.trim_start().starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    } else {
        trimmed.trim_matches('`').trim().to_string()
    }
}

pub fn parse_report(raw: &str) -> Result<AnalysisReport, ResponseParseError> {
    parse_payload(raw)
}

pub fn parse_offer(raw: &str) -> Result<OfferTemplate, ResponseParseError> {
    parse_payload(raw)
}

fn parse_payload<T: DeserializeOwned>(raw: &str) -> Result<T, ResponseParseError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(&cleaned).map_err(|source| ResponseParseError::Structure {
        source,
        snippet: snippet_of(&cleaned),
    })
}

fn snippet_of(cleaned: &str) -> String {
    let mut snippet: String = cleaned.chars().take(SNIPPET_LIMIT).collect();
    if cleaned.chars().count() > SNIPPET_LIMIT {
        snippet.push_str("...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT_JSON: &str = r#"{
        "summary": "Stable class B walk-up",
        "strengths": ["Full occupancy"],
        "weaknesses": ["Deferred maintenance"],
        "opportunities": ["Raise below-market rents"],
        "threats": ["Tax reassessment"],
        "recommendedOfferPrice": 910000,
        "recommendedOfferPriceRationale": "Priced to a 7 cap",
        "capRateAnalysis": "Above market",
        "cashFlowAnalysis": "Positive from day one",
        "returnOnInvestment": "11% cash on cash",
        "recommendations": ["Negotiate credits"]
    }"#;

    #[test]
    fn bare_json_parses() {
        let report = parse_report(REPORT_JSON).expect("parses");
        assert_eq!(report.recommended_offer_price, 910000.0);
        assert_eq!(report.strengths, vec!["Full occupancy".to_string()]);
    }

    #[test]
    fn fenced_json_parses() {
        let fenced = format!("```json\n{REPORT_JSON}\n```");
        let report = parse_report(&fenced).expect("parses");
        assert_eq!(report.summary, "Stable class B walk-up");
    }

    #[test]
    fn stray_backticks_are_trimmed() {
        let wrapped = format!("`{REPORT_JSON}`");
        assert!(parse_report(&wrapped).is_ok());
    }

    #[test]
    fn prose_yields_the_structural_error_kind() {
        let result = parse_report("I could not produce a report for this property.");
        let err = result.expect_err("prose is not a report");
        let ResponseParseError::Structure { snippet, .. } = err;
        assert!(snippet.starts_with("I could not"));
    }

    #[test]
    fn long_garbage_is_snipped_in_the_detail() {
        let raw = "x".repeat(500);
        let ResponseParseError::Structure { snippet, .. } =
            parse_report(&raw).expect_err("garbage is not a report");
        assert!(snippet.ends_with("..."));
        assert!(snippet.chars().count() <= SNIPPET_LIMIT + 3);
    }

    #[test]
    fn offer_template_parses_from_fenced_output() {
        let offer = parse_offer(
            "```json\n{\"offerPrice\": 875000, \"contingencies\": [\"Financing\"], \
             \"closingTimeframe\": \"60 days\", \"financingTerms\": \"25% down\", \
             \"dueDate\": \"2026-08-13\", \"additionalTerms\": \"None\"}\n```",
        )
        .expect("parses");
        assert_eq!(offer.offer_price, 875000.0);
        assert_eq!(offer.closing_timeframe, "60 days");
    }
}
