//! Integration tests for the analysis flow
//!
//! wiremock stands in for the remote analysis backend; the axum router is
//! exercised in-process with tower's `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webserver::core::{DispatchOutcome, QueryDispatcher, ResultStore};
use webserver::services::export;
use webserver::{
    RealAnalysisBackend, RealStaticFileServer, WebServer, WebServerError, WebServerState,
};

fn wakad_payload() -> Value {
    json!({
        "summary": "Wakad prices rose steadily.",
        "chart": {"years": [2019, 2020], "price": [4200.0, 5000.0], "demand": [90.0, 100.0]},
        "table": [
            {
                "year": 2019,
                "final location": "Wakad",
                "flat - weighted average rate": 4200,
                "total units": 90,
                "flat_sold - igr": 70,
                "office_sold - igr": 4,
                "shop_sold - igr": 1
            },
            {
                "year": 2020,
                "final location": "Wakad",
                "flat - weighted average rate": 5000,
                "total units": 100,
                "residential_sold - igr": 80,
                "office_sold - igr": 5,
                "shop_sold - igr": 2
            }
        ],
        "meta": {"areas": ["Wakad"], "rows_returned": 2}
    })
}

fn dispatcher_for(server: &MockServer) -> QueryDispatcher<RealAnalysisBackend> {
    let backend = RealAnalysisBackend::new(reqwest::Client::new(), &server.uri());
    QueryDispatcher::new(backend, Arc::new(ResultStore::new()))
}

async fn make_webserver(backend_url: &str) -> (WebServer<RealAnalysisBackend, RealStaticFileServer>, tempfile::TempDir) {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<html>analysis page</html>").unwrap();

    let backend = RealAnalysisBackend::new(reqwest::Client::new(), backend_url);
    let static_files = RealStaticFileServer::new(static_dir.path());
    let state = WebServerState::new(backend_url.to_string());

    (WebServer::new(state, backend, static_files), static_dir)
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json_value(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn one_backend_call_with_exact_query_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/"))
        .and(body_json(json!({"query": "analysis of Wakad"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(wakad_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let outcome = dispatcher.submit("  analysis of Wakad  ").await.unwrap();

    match outcome {
        DispatchOutcome::Completed(result) => {
            assert_eq!(result.summary, "Wakad prices rose steadily.");
            assert_eq!(result.area_names(), ["Wakad"]);
            assert_eq!(result.row_count(), 2);
        }
        other => panic!("expected Completed, got {other:?}"),
    }

    // expect(1) verifies the single call on drop
}

#[tokio::test]
async fn backend_error_body_becomes_the_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "model overloaded"})))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let err = dispatcher.submit("analysis of Wakad").await.unwrap_err();

    match err {
        WebServerError::Backend(shared::BackendFailure::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "model overloaded");
        }
        other => panic!("expected Api failure, got {other:?}"),
    }
    assert!(dispatcher.store().current().await.is_none());
}

#[tokio::test]
async fn undecodable_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let err = dispatcher.submit("analysis of Wakad").await.unwrap_err();

    assert!(matches!(
        err,
        WebServerError::Backend(shared::BackendFailure::Decode(_))
    ));
}

#[tokio::test]
async fn mismatched_chart_lengths_are_rejected_before_projection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "broken",
            "chart": {"years": [2019, 2020], "price": [4200.0], "demand": [90.0, 100.0]},
            "table": [],
            "meta": {"areas": ["Wakad"], "rows_returned": 0}
        })))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let err = dispatcher.submit("analysis of Wakad").await.unwrap_err();

    assert!(matches!(err, WebServerError::Payload(_)));
    assert!(dispatcher.store().current().await.is_none());
}

#[tokio::test]
async fn dispatch_then_export_produces_spreadsheet_and_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wakad_payload()))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    dispatcher.submit("analysis of Wakad").await.unwrap();

    let result = dispatcher.store().current().await.unwrap();

    let xlsx = export::spreadsheet(&result).unwrap().unwrap();
    assert_eq!(xlsx.filename, "realestate_Wakad.xlsx");
    assert_eq!(&xlsx.bytes[..2], b"PK");

    let pdf = export::document(&result).unwrap().unwrap();
    assert_eq!(pdf.filename, "realestate_Wakad.pdf");
    assert_eq!(&pdf.bytes[..5], b"%PDF-");
}

#[tokio::test]
async fn analyze_endpoint_round_trips_a_single_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wakad_payload()))
        .mount(&server)
        .await;

    let (webserver, _static_dir) = make_webserver(&server.uri()).await;
    let router = webserver.build_router();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"query": "analysis of Wakad"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_value(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["result"]["mode"], "single");
    assert_eq!(body["result"]["rows"][1]["resSold"], 80.0);
    assert!(body["result"].get("areas").is_none());

    // The stored result now feeds the other endpoints
    let result_response = router
        .clone()
        .oneshot(Request::builder().uri("/api/result").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let result_body = body_json_value(result_response).await;
    assert_eq!(result_body["status"], "ok");

    let chart_response = router
        .clone()
        .oneshot(Request::builder().uri("/api/chart.svg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(chart_response.status(), StatusCode::OK);
    let svg = String::from_utf8(body_bytes(chart_response).await).unwrap();
    assert!(svg.contains("<svg"));

    let export_response = router
        .oneshot(
            Request::builder()
                .uri("/api/export/spreadsheet")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(export_response.status(), StatusCode::OK);
    let disposition = export_response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("realestate_Wakad.xlsx"));
    assert_eq!(&body_bytes(export_response).await[..2], b"PK");
}

#[tokio::test]
async fn compare_query_exposes_per_area_charts() {
    let payload = json!({
        "summary": "Wakad outpaces Aundh.",
        "chart": {"years": [2020], "price": [5000.0], "demand": [100.0]},
        "table": [
            {"year": 2020, "final location": "Wakad", "flat - weighted average rate": 5000, "total units": 100},
            {"year": 2020, "final location": "Aundh", "flat - weighted average rate": 7000, "total units": 60}
        ],
        "meta": {"areas": ["Wakad", "Aundh"], "rows_returned": 2}
    });

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&server)
        .await;

    let (webserver, _static_dir) = make_webserver(&server.uri()).await;
    let router = webserver.build_router();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"query": "compare Wakad and Aundh"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json_value(response).await;
    assert_eq!(body["result"]["mode"], "compare");
    assert_eq!(body["result"]["areas"].as_array().unwrap().len(), 2);
    assert!(body["result"].get("rows").is_none());

    // Flat chart is not available in compare mode
    let flat_chart = router
        .clone()
        .oneshot(Request::builder().uri("/api/chart.svg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(flat_chart.status(), StatusCode::NOT_FOUND);

    let area_chart = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/chart.svg?area=Aundh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(area_chart.status(), StatusCode::OK);

    let unknown = router
        .oneshot(
            Request::builder()
                .uri("/api/chart.svg?area=Hinjewadi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_query_is_ignored_with_no_backend_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wakad_payload()))
        .expect(0)
        .mount(&server)
        .await;

    let (webserver, _static_dir) = make_webserver(&server.uri()).await;
    let router = webserver.build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"query": "   "}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(webserver.state().store.current().await.is_none());
}

#[tokio::test]
async fn backend_failure_surfaces_as_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"error": "upstream down"})))
        .mount(&server)
        .await;

    let (webserver, _static_dir) = make_webserver(&server.uri()).await;
    let router = webserver.build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"query": "analysis of Wakad"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json_value(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("upstream down"));
    assert!(webserver.state().store.current().await.is_none());
}

#[tokio::test]
async fn empty_state_endpoints_answer_quietly() {
    let (webserver, _static_dir) = make_webserver("http://localhost:1/api").await;
    let router = webserver.build_router();

    for uri in ["/api/export/spreadsheet", "/api/export/document", "/api/chart.svg"] {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "{uri}");
    }

    let result = router
        .clone()
        .oneshot(Request::builder().uri("/api/result").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json_value(result).await["status"], "empty");

    let status = router
        .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status_body = body_json_value(status).await;
    assert_eq!(status_body["status"], "running");
    assert_eq!(status_body["has_result"], false);
}

#[tokio::test]
async fn index_and_health_are_served() {
    let (webserver, _static_dir) = make_webserver("http://localhost:1/api").await;
    let router = webserver.build_router();

    let index = router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(index.status(), StatusCode::OK);
    assert_eq!(
        index.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );

    let health = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json_value(health).await["status"], "healthy");
}
