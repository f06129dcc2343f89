use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use accessibridge_analysis::{ScoreReport, WcagCheck};
use accessibridge_assist::{AltTextGenerator, ReportSynthesizer};
use accessibridge_core::{AccessError, AltBatch, AssistProvider, FailureMode, HeuristicsReport, IssueCounts};
use accessibridge_providers::{OpenRouterConfig, OpenRouterProvider};

use crate::config::Config;

/// Shared application state for API handlers. Read-only after startup.
pub struct AppState {
    pub config: Config,
    pub alt_text: AltTextGenerator,
    pub reports: ReportSynthesizer,
}

impl AppState {
    pub fn new(config: Config, provider: Option<Arc<dyn AssistProvider>>) -> Self {
        let alt_text = AltTextGenerator::new(provider.clone()).with_failure_mode(config.alt_failure_mode);
        let reports = ReportSynthesizer::new(provider);
        Self { config, alt_text, reports }
    }

    /// Build state with an OpenRouter provider when an API key is configured.
    pub fn from_config(config: Config) -> Result<Self> {
        let provider: Option<Arc<dyn AssistProvider>> = match &config.api_key {
            Some(key) => {
                let provider_config = OpenRouterConfig::new(key.clone())
                    .with_base_url(config.api_base.clone())
                    .with_model(config.model.clone())
                    .with_timeout(config.ai_timeout());
                let provider: Arc<dyn AssistProvider> =
                    Arc::new(OpenRouterProvider::new(provider_config)?);
                info!(model = %config.model, "Registered OpenRouter provider");
                Some(provider)
            }
            None => None,
        };
        Ok(Self::new(config, provider))
    }
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.allowed_origin.as_deref());
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/generate-alt", post(generate_alt))
        .route("/accessibility-score", post(accessibility_score))
        .route("/contrast-ratio", post(contrast_ratio))
        .route("/ai-report", post(ai_report))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Restrict CORS to `allowed_origin` when set, otherwise allow everything.
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let Some(origin) = allowed_origin else {
        return CorsLayer::permissive();
    };
    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(value))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
        Err(_) => {
            warn!(origin = %origin, "ALLOWED_ORIGIN is not a valid header value, CORS left permissive");
            CorsLayer::permissive()
        }
    }
}

/// Error response: `{ "error": "..." }` with a 4xx/5xx status.
pub struct ApiError(AccessError);

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AccessError::InvalidRequestShape(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateAltRequest {
    /// Non-string entries are ignored like any other ineligible URL.
    pub image_urls: Vec<Value>,
    #[serde(default)]
    pub on_failure: Option<FailureMode>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub missing_alt_count: u32,
    #[serde(default)]
    pub contrast_issue_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct ContrastRequest {
    pub foreground: String,
    pub background: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub heuristics: HeuristicsReport,
}

async fn home(State(state): State<Arc<AppState>>) -> String {
    format!(
        "AccessiBridge API. Model={}. AI={}",
        state.config.model,
        if state.config.ai_enabled() { "ON" } else { "OFF" }
    )
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "accessibridge",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_enabled": state.config.ai_enabled(),
        "model": state.config.model,
        "timestamp": Utc::now(),
    }))
}

async fn generate_alt(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateAltRequest>, JsonRejection>,
) -> Result<Json<AltBatch>, ApiError> {
    let Json(request) = payload?;
    let urls: Vec<&str> = request.image_urls.iter().filter_map(Value::as_str).collect();
    let batch = state.alt_text.generate(&urls, request.on_failure).await;
    Ok(Json(batch))
}

async fn accessibility_score(
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreReport>, ApiError> {
    let Json(request) = payload?;
    let counts = IssueCounts {
        missing_alt: request.missing_alt_count,
        contrast_issues: request.contrast_issue_count,
    };
    Ok(Json(ScoreReport::new(counts)))
}

async fn contrast_ratio(
    payload: Result<Json<ContrastRequest>, JsonRejection>,
) -> Result<Json<WcagCheck>, ApiError> {
    let Json(request) = payload?;
    let check = WcagCheck::evaluate(&request.foreground, &request.background)?;
    Ok(Json(check))
}

async fn ai_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let report = state.reports.synthesize(&request.heuristics).await;
    Ok(Json(json!({
        "report_markdown": report.markdown,
        "summary": report.source.to_string(),
        "error": report.ai_error,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessibridge_providers::MockProvider;
    use tokio::net::TcpListener;

    async fn spawn_app(config: Config, provider: Option<Arc<dyn AssistProvider>>) -> String {
        let state = Arc::new(AppState::new(config, provider));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn post(base: &str, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = reqwest::Client::new()
            .post(format!("{base}{path}"))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_ai_disabled() {
        let base = spawn_app(Config::default(), None).await;
        let body: Value = reqwest::get(format!("{base}/health")).await.unwrap().json().await.unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["ai_enabled"], false);
        assert_eq!(body["model"], "google/gemini-flash-1.5");
    }

    #[tokio::test]
    async fn test_home_text() {
        let base = spawn_app(Config::default(), None).await;
        let text = reqwest::get(&base).await.unwrap().text().await.unwrap();
        assert_eq!(text, "AccessiBridge API. Model=google/gemini-flash-1.5. AI=OFF");
    }

    #[tokio::test]
    async fn test_generate_alt_fallback_without_key() {
        let base = spawn_app(Config::default(), None).await;
        let (status, body) = post(
            &base,
            "/generate-alt",
            json!({ "image_urls": [
                "https://a.com/1.png", 42, null, "https://x.com/page.html",
                "https://b.com/2.jpg", "https://c.com/3.gif", "https://d.com/4.gif",
                "https://e.com/5.bmp", "https://f.com/6.png"
            ] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let alts = body["alts"].as_array().unwrap();
        assert_eq!(alts.len(), 5);
        assert_eq!(alts[0]["alt"], "Image from a.com");
        assert_eq!(alts[4]["url"], "https://e.com/5.bmp");
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn test_generate_alt_reports_per_url_errors() {
        let provider = Arc::new(MockProvider::new("mock").failing_on("https://b.com/2.jpg"));
        let base = spawn_app(Config::default(), Some(provider)).await;
        let (_, body) = post(
            &base,
            "/generate-alt",
            json!({ "image_urls": ["https://a.com/1.png", "https://b.com/2.jpg"] }),
        )
        .await;
        assert_eq!(body["alts"][0]["alt"], "Mock description");
        assert_eq!(body["errors"][0]["url"], "https://b.com/2.jpg");
        assert!(body["error"].is_null());

        let (_, body) = post(
            &base,
            "/generate-alt",
            json!({ "image_urls": ["https://b.com/2.jpg"], "on_failure": "fallback" }),
        )
        .await;
        assert_eq!(body["alts"][0]["alt"], "Image from b.com");
        assert_eq!(body["errors"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_generate_alt_requires_image_urls() {
        let base = spawn_app(Config::default(), None).await;
        let (status, body) = post(&base, "/generate-alt", json!({ "urls": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("invalid request"));
    }

    #[tokio::test]
    async fn test_accessibility_score() {
        let base = spawn_app(Config::default(), None).await;
        let (status, body) = post(
            &base,
            "/accessibility-score",
            json!({ "missing_alt_count": 3, "contrast_issue_count": 2 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 66);
        assert_eq!(body["issues"]["missing_alt"], 3);

        let (_, body) = post(&base, "/accessibility-score", json!({})).await;
        assert_eq!(body["score"], 100);

        let (status, _) = post(&base, "/accessibility-score", json!({ "missing_alt_count": -1 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_contrast_ratio_endpoint() {
        let base = spawn_app(Config::default(), None).await;
        let (status, body) = post(
            &base,
            "/contrast-ratio",
            json!({ "foreground": "#000", "background": "#ffffff" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ratio"], 21.0);
        assert_eq!(body["passes_aaa"], true);

        let (status, body) = post(
            &base,
            "/contrast-ratio",
            json!({ "foreground": "#12345", "background": "#fff" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid color format"));
    }

    #[tokio::test]
    async fn test_ai_report_fallback_without_key() {
        let base = spawn_app(Config::default(), None).await;
        let (status, body) = post(
            &base,
            "/ai-report",
            json!({ "heuristics": {
                "meta": { "url": "https://blog.test/post", "title": "My Post" },
                "images": { "missingAlt": 2 },
                "landmarks": { "hasMain": true }
            } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "fallback");
        let md = body["report_markdown"].as_str().unwrap();
        assert!(md.contains("**Add alt text** to 2 images"));
        assert!(md.contains("My Post"));
        assert!(md.contains("https://blog.test/post"));
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn test_ai_report_accepts_null_heuristic_fields() {
        let base = spawn_app(Config::default(), None).await;
        let (status, body) = post(
            &base,
            "/ai-report",
            json!({ "heuristics": { "images": null, "landmarks": { "hasMain": null } } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "fallback");
        assert!(body["report_markdown"].as_str().unwrap().contains("# Accessibility Report"));
    }

    #[tokio::test]
    async fn test_ai_report_recovers_from_provider_failure() {
        let provider = Arc::new(MockProvider::new("mock").with_report_response(None));
        let base = spawn_app(Config::default(), Some(provider)).await;
        let (status, body) = post(&base, "/ai-report", json!({ "heuristics": {} })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "fallback");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_ai_report_uses_provider_text() {
        let provider = Arc::new(MockProvider::new("mock").with_report_response(Some("## Executive Summary")));
        let base = spawn_app(Config::default(), Some(provider)).await;
        let (_, body) = post(&base, "/ai-report", json!({ "heuristics": {} })).await;
        assert_eq!(body["summary"], "ai");
        assert_eq!(body["report_markdown"], "## Executive Summary");
    }

    #[tokio::test]
    async fn test_ai_report_requires_heuristics() {
        let base = spawn_app(Config::default(), None).await;
        let (status, body) = post(&base, "/ai-report", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("heuristics"));
    }
}
