//! HTTP router.
//!
//! Middleware stack (outermost → innermost):
//! 1. Cache-Control: no-store → 2. Audit logger

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the application router: the UI page at `/`, JSON endpoints under
/// `/api/`.
pub fn build_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/samples", get(endpoints::samples::list))
        .route("/reports", post(endpoints::reports::generate))
        .route("/reports/stream", post(endpoints::reports::stream))
        .route("/follow-up", post(endpoints::follow_up::ask));

    Router::new()
        .route("/", get(endpoints::page::index))
        .nest("/api", api)
        .with_state(ctx)
        .layer(
            ServiceBuilder::new()
                // Reports carry clinical content; keep them out of caches.
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ))
                .layer(axum::middleware::from_fn(middleware::audit::log_access)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use base64::Engine;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::inference::{FailingInferenceClient, InferenceClient, MockInferenceClient};
    use crate::pipeline::ReportPipeline;
    use crate::report::BuiltinFontProvider;

    const NOTE: &str = "52세 여성, 제2형 당뇨병 (HbA1C 8.2%), BMI 32.";

    fn router_with(client: Arc<dyn InferenceClient>) -> Router {
        let pipeline = ReportPipeline::new(client, Arc::new(BuiltinFontProvider));
        build_router(ApiContext::new(pipeline))
    }

    fn mock_router() -> (Router, Arc<MockInferenceClient>) {
        let mock = Arc::new(MockInferenceClient::with_sequence(&[
            "Type 2 diabetes means your body struggles to use sugar.",
            "제2형 당뇨병은 몸이 당을 잘 사용하지 못한다는 뜻입니다.",
        ]));
        (router_with(mock.clone()), mock)
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn raw_post(uri: &str, content_type: Option<&str>, body: &'static str) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn health_reports_model() {
        let (app, _) = mock_router();
        let response = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "mock-model");
    }

    #[tokio::test]
    async fn responses_are_not_cacheable() {
        let (app, _) = mock_router();
        let response = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.headers()["cache-control"], "no-store");
    }

    #[tokio::test]
    async fn index_serves_html_page() {
        let (app, _) = mock_router();
        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(body.contains("리포트 생성하기"));
    }

    #[tokio::test]
    async fn samples_are_listed() {
        let (app, _) = mock_router();
        let response = app.oneshot(get_request("/api/samples")).await.unwrap();
        let json = body_json(response).await;
        let samples = json.as_array().unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0]["label"], "고혈압 & 고지혈증");
    }

    #[tokio::test]
    async fn generate_returns_both_reports() {
        let (app, mock) = mock_router();
        let response = app
            .oneshot(json_post("/api/reports", serde_json::json!({ "note": NOTE })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["english"]["file_name"], "patient_report_eng.pdf");
        assert_eq!(json["korean"]["file_name"], "patient_report_kor.pdf");
        assert_eq!(json["english"]["blocks"].as_array().unwrap().len(), 5);
        let pdf = base64::engine::general_purpose::STANDARD
            .decode(json["korean"]["pdf_base64"].as_str().unwrap())
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn blank_note_is_rejected_before_inference() {
        let (app, mock) = mock_router();
        let response = app
            .oneshot(json_post("/api/reports", serde_json::json!({ "note": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "EMPTY_INPUT");
        assert_eq!(json["error"]["message"], "Doctor's note 를 먼저 기입해주세요.");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_note_field_counts_as_blank() {
        let (app, _) = mock_router();
        let response = app
            .oneshot(json_post("/api/reports", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn inference_failure_returns_502() {
        let app = router_with(Arc::new(FailingInferenceClient::new()));
        let response = app
            .oneshot(json_post("/api/reports", serde_json::json!({ "note": NOTE })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INFERENCE_FAILED");
    }

    #[tokio::test]
    async fn stream_emits_stages_then_result() {
        let (app, _) = mock_router();
        let response = app
            .oneshot(json_post("/api/reports/stream", serde_json::json!({ "note": NOTE })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        let events: Vec<&str> = body
            .lines()
            .filter_map(|l| l.strip_prefix("event: "))
            .collect();
        assert_eq!(events, ["stage", "stage", "stage", "stage", "result"]);
        assert!(body.contains("\"percent\":100"));
        assert!(body.contains("patient_report_kor.pdf"));
    }

    #[tokio::test]
    async fn stream_reports_failure_as_error_event() {
        let app = router_with(Arc::new(FailingInferenceClient::new()));
        let response = app
            .oneshot(json_post("/api/reports/stream", serde_json::json!({ "note": NOTE })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        let events: Vec<&str> = body
            .lines()
            .filter_map(|l| l.strip_prefix("event: "))
            .collect();
        assert_eq!(events, ["error"]);
        assert!(body.contains("INFERENCE_FAILED"));
    }

    #[tokio::test]
    async fn stream_rejects_blank_note_with_json() {
        let (app, _) = mock_router();
        let response = app
            .oneshot(json_post("/api/reports/stream", serde_json::json!({ "note": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "EMPTY_INPUT");
    }

    #[tokio::test]
    async fn follow_up_returns_sanitized_answer() {
        let mock = Arc::new(MockInferenceClient::new("Yes ✅ you can walk daily."));
        let app = router_with(mock.clone());
        let response = app
            .oneshot(json_post(
                "/api/follow-up",
                serde_json::json!({ "note": NOTE, "question": "Can I exercise?" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["answer"], "Yes   you can walk daily.");
        assert_eq!(mock.requests()[0].len(), 3);
    }

    #[tokio::test]
    async fn follow_up_rejects_blank_question() {
        let (app, mock) = mock_router();
        let response = app
            .oneshot(json_post(
                "/api/follow-up",
                serde_json::json!({ "note": NOTE, "question": " " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "Please enter a question."
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_json_gets_structured_error() {
        let (app, mock) = mock_router();
        for uri in ["/api/reports", "/api/reports/stream", "/api/follow-up"] {
            let response = app
                .clone()
                .oneshot(raw_post(uri, Some("application/json"), "{not json"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert!(response.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("application/json"));
            let json = body_json(response).await;
            assert_eq!(json["error"]["code"], "BAD_REQUEST", "{uri}");
            assert!(!json["error"]["message"].as_str().unwrap().is_empty());
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_content_type_gets_structured_error() {
        let (app, _) = mock_router();
        let body = r#"{"note":"52세 여성"}"#;
        let response = app
            .oneshot(raw_post("/api/reports", None, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn wrong_field_type_gets_structured_error() {
        let (app, _) = mock_router();
        let response = app
            .oneshot(json_post("/api/follow-up", serde_json::json!({ "note": 42 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (app, _) = mock_router();
        let response = app.oneshot(get_request("/api/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
