use axum::routing::post;
use axum::{Json, Router};

use super::engine::FinancialSnapshot;
use super::inputs::PropertyInputs;

/// Router for the pure derivation endpoint. Stateless by construction.
pub fn underwriting_router() -> Router {
    Router::new().route("/api/v1/property/snapshot", post(snapshot_handler))
}

pub(crate) async fn snapshot_handler(Json(inputs): Json<PropertyInputs>) -> Json<FinancialSnapshot> {
    Json(FinancialSnapshot::derive(&inputs))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::underwriting_router;

    #[tokio::test]
    async fn snapshot_route_derives_from_a_partial_body() {
        let router = underwriting_router();
        let body = serde_json::json!({
            "propertyAddress": "910 Grandview Ave",
            "units": [
                {"beds": 1, "baths": 1, "rent": 1000, "count": 10},
            ],
            "vacancyRate": 5,
            "opExpenseRate": 40,
            "askingPrice": 1000000,
        });

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/property/snapshot")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(payload["totalUnits"], 10);
        assert_eq!(payload["netOperatingIncome"], 66000.0);
        assert_eq!(payload["capRateAskingPrice"], 6.6);
        assert_eq!(payload["capRateOfferPrice"], Value::Null);
    }
}
