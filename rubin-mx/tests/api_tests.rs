//! HTTP routing and handler tests

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use helpers::{sine, FakeAudioClient};
use http_body_util::BodyExt;
use rubin_mx::styles::StyleStore;
use rubin_mx::{build_router, AppState, CaptureDefaults};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    state: AppState,
    client: Arc<FakeAudioClient>,
    _styles_dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        Self::with_client(FakeAudioClient::mono(sine(80.0, 1.0, 44100, 0.5)))
    }

    fn with_client(client: FakeAudioClient) -> Self {
        let styles_dir = TempDir::new().unwrap();
        let client = Arc::new(client);
        let defaults = CaptureDefaults {
            duration: 1.0,
            sample_rate: 44100,
        };
        let state = AppState::new(StyleStore::new(styles_dir.path()), client.clone(), defaults);
        Self {
            state,
            client,
            _styles_dir: styles_dir,
        }
    }

    async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = build_router(self.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn health_reports_module_and_source() {
    let app = TestApp::new();
    let (status, body) = app.request("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "rubin-mx");
    assert_eq!(body["capture_source"], "fake");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn styles_list_includes_builtins() {
    let app = TestApp::new();
    let (status, body) = app.request("GET", "/styles", None).await;

    assert_eq!(status, StatusCode::OK);
    let styles = body["styles"].as_array().unwrap();
    assert_eq!(styles.len(), 16);
    assert!(styles.contains(&json!("techno")));
    assert!(body["user_styles"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_style_is_404_without_capturing() {
    let app = TestApp::new();
    let (status, body) = app
        .request("POST", "/evaluate", Some(json!({"style": "polka"})))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(app.client.captures(), 0);
}

#[tokio::test]
async fn evaluate_returns_scores() {
    let app = TestApp::new();
    let (status, body) = app
        .request("POST", "/evaluate", Some(json!({"style": "techno", "duration": 2.0})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["style"], "techno");
    let score = body["cohesion_score"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&score));
    assert_eq!(body["band_scores"].as_object().unwrap().len(), 7);
    assert_eq!(app.client.last_request(), Some((2.0, 44100)));
}

#[tokio::test]
async fn suggest_sorts_by_severity() {
    let app = TestApp::new();
    let (status, body) = app
        .request("POST", "/suggest", Some(json!({"style": "jazz"})))
        .await;

    assert_eq!(status, StatusCode::OK);
    let rank = |s: &Value| match s["severity"].as_str().unwrap() {
        "high" => 0,
        "medium" => 1,
        _ => 2,
    };
    let ranks: Vec<i32> = body["suggestions"].as_array().unwrap().iter().map(rank).collect();
    let mut sorted = ranks.clone();
    sorted.sort();
    assert_eq!(ranks, sorted);
    for suggestion in body["suggestions"].as_array().unwrap() {
        assert!(suggestion["problem"].is_string());
        assert!(suggestion["suggestion"].is_string());
    }
}

#[tokio::test]
async fn capture_parameters_are_validated() {
    let app = TestApp::new();
    for body in [
        json!({"style": "techno", "duration": 0.0}),
        json!({"style": "techno", "duration": 601.0}),
        json!({"style": "techno", "sample_rate": 4000}),
        json!({"style": "techno", "sample_rate": 384000}),
    ] {
        let (status, _) = app.request("POST", "/evaluate", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert_eq!(app.client.captures(), 0);
}

#[tokio::test]
async fn audition_classifies_bass() {
    let app = TestApp::new();
    let (status, body) = app
        .request("POST", "/audition", Some(json!({"style": "house"})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "bass");
    let total: f64 = body["frequency_profile"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_f64().unwrap())
        .sum();
    assert!((total - 1.0).abs() < 0.01);
}

#[tokio::test]
async fn audition_rejects_unknown_role() {
    let app = TestApp::new();
    let (status, body) = app
        .request("POST", "/audition", Some(json!({"style": "house", "role": "kazoo"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("kazoo"));

    let (status, body) = app
        .request("POST", "/audition", Some(json!({"style": "house", "role": "lead"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "lead");
}

#[tokio::test]
async fn capture_failure_is_bad_gateway() {
    let app = TestApp::with_client(FakeAudioClient::empty());
    let (status, body) = app.request("POST", "/spectral", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "CAPTURE_ERROR");
}

#[tokio::test]
async fn spectral_returns_full_analysis() {
    let app = TestApp::new();
    let (status, body) = app
        .request("POST", "/spectral", Some(json!({"duration": 1.0})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["num_channels"], 2);
    assert_eq!(body["timbre"]["mfcc_means"].as_array().unwrap().len(), 13);
    assert!(body["frequency_bands"]["bass"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn snapshots_capture_list_and_compare() {
    let app = TestApp::new();

    let (status, body) = app
        .request("POST", "/snapshots", Some(json!({"name": "before"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "before");

    app.client
        .replace(rubin_mx::analysis::AudioBuffer::mono(sine(2000.0, 1.0, 44100, 0.5)));
    app.request("POST", "/snapshots", Some(json!({"name": "after"})))
        .await;

    let (status, names) = app.request("GET", "/snapshots", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names, json!(["after", "before"]));

    let (status, diff) = app
        .request("GET", "/snapshots/compare?a=before&b=after", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(diff["spectral"]["centroid_mean"]["delta"].as_f64().unwrap() > 0.0);
    assert_eq!(diff["sample_rate"]["delta"], json!(0.0));
    assert_eq!(diff["timbre"]["chroma_means"]["delta"].as_array().unwrap().len(), 12);

    let (status, _) = app
        .request("GET", "/snapshots/compare?a=before&b=missing", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_styles_can_be_saved_and_deleted() {
    let app = TestApp::new();
    let profile = json!({
        "name": "my-mix",
        "description": "custom",
        "frequency_balance": {"bass": {"low": 1.0, "high": 5.0}},
        "stereo_width": {"low": 0.1, "high": 0.3}
    });

    let (status, _) = app.request("PUT", "/styles/my-mix", Some(profile)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request("GET", "/styles/my-mix", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["frequency_balance"]["bass"]["high"], 5.0);
    assert!(body.get("brightness").is_none());

    let (_, list) = app.request("GET", "/styles", None).await;
    assert_eq!(list["user_styles"], json!(["my-mix"]));

    let (status, _) = app.request("DELETE", "/styles/my-mix", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.request("GET", "/styles/my-mix", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn style_name_must_match_path() {
    let app = TestApp::new();
    let (status, _) = app
        .request("PUT", "/styles/other", Some(json!({"name": "mine", "description": ""})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn builtin_styles_cannot_be_deleted() {
    let app = TestApp::new();
    let (status, body) = app.request("DELETE", "/styles/rock", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, _) = app.request("DELETE", "/styles/never-saved", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
