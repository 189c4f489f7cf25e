//! HTTP routes: the tabbed page, embedded assets, and per-stage control endpoints.
//! Control endpoints validate input, then hand off to the configured `SchemaSession`.

use crate::render::render_index;
use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, DefaultBodyLimit, Path, Query, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use schema_miner_core::{
    to_pretty_json, ApiKey, DocumentUpload, SchemaSession, SessionError, Stage, TabbedInterface,
    TemplateErrorKind, TemplateSource,
};
use serde::Deserialize;
use std::sync::Arc;

const STYLE_CSS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/style.css"));
const TABS_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/tabs.js"));

#[derive(Clone)]
pub struct AppState {
    pub app_name: Arc<str>,
    pub interface: Arc<TabbedInterface>,
    pub template: Arc<TemplateSource>,
    pub session: Arc<dyn SchemaSession>,
    /// Body cap for `POST .../document`.
    pub max_upload_bytes: usize,
}

#[derive(Deserialize)]
struct ApiKeyRequest {
    api_key: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Deserialize)]
struct DocumentQuery {
    file_name: String,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn session_error(e: SessionError) -> ApiError {
    let status = match &e {
        SessionError::NotWired { .. } => StatusCode::NOT_IMPLEMENTED,
        SessionError::UnsupportedDocument { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        SessionError::UnknownStage(_) => StatusCode::NOT_FOUND,
        SessionError::EmptyApiKey
        | SessionError::EmptyMessage
        | SessionError::EmptyDocument { .. } => StatusCode::BAD_REQUEST,
    };
    let operation = match &e {
        SessionError::NotWired { operation } => Some(*operation),
        _ => None,
    };
    (
        status,
        Json(serde_json::json!({
            "error": e.to_string(),
            "operation": operation,
        })),
    )
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/assets/style.css", get(style_css))
        .route("/assets/tabs.js", get(tabs_js))
        .route("/api/v1/interface", get(api_interface))
        .route("/api/v1/template", get(api_template))
        .route("/api/v1/stages/:stage", get(api_stage))
        .route("/api/v1/stages/:stage/api-key", post(submit_api_key))
        .route("/api/v1/stages/:stage/chat", post(send_message))
        .route(
            "/api/v1/stages/:stage/document",
            post(upload_document).layer(upload_limit),
        )
        .route("/api/v1/stages/:stage/generate", post(generate_schema))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_request))
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    tracing::info!("[schema-miner] {} {} -> {}", method, uri, response.status());
    response
}

async fn health() -> &'static str {
    "OK"
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.app_name, &state.interface, &state.template))
}

async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

async fn tabs_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        TABS_JS,
    )
}

async fn api_interface(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "app": &*state.app_name,
        "version": schema_miner_core::version(),
        "tabs": state.interface.titles(),
        "panels": state.interface.panels,
    }))
}

/// Pretty template as plain text; failure class maps to the status code.
async fn api_template(State(state): State<AppState>) -> Response {
    match state.template.load() {
        Ok(value) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            to_pretty_json(&value),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("{}", e);
            let status = match e.kind() {
                TemplateErrorKind::NotFound => StatusCode::NOT_FOUND,
                TemplateErrorKind::Parse => StatusCode::UNPROCESSABLE_ENTITY,
                TemplateErrorKind::Other => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
        }
    }
}

fn parse_stage(raw: &str) -> Result<Stage, ApiError> {
    raw.parse::<Stage>().map_err(session_error)
}

fn body_error(rejection: BytesRejection) -> ApiError {
    (
        rejection.status(),
        Json(serde_json::json!({ "error": rejection.body_text() })),
    )
}

async fn api_stage(
    State(state): State<AppState>,
    Path(stage): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stage = parse_stage(&stage)?;
    let panel = state
        .interface
        .panel(stage)
        .ok_or_else(|| session_error(SessionError::UnknownStage(stage.number().to_string())))?;
    Ok(Json(serde_json::json!(panel)))
}

async fn submit_api_key(
    State(state): State<AppState>,
    Path(stage): Path<String>,
    Json(body): Json<ApiKeyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stage = parse_stage(&stage)?;
    let key = ApiKey::new(body.api_key).map_err(session_error)?;
    state
        .session
        .submit_api_key(stage, key)
        .await
        .map_err(session_error)?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

async fn send_message(
    State(state): State<AppState>,
    Path(stage): Path<String>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stage = parse_stage(&stage)?;
    if body.message.trim().is_empty() {
        return Err(session_error(SessionError::EmptyMessage));
    }
    let reply = state
        .session
        .send_message(stage, body.message)
        .await
        .map_err(session_error)?;
    Ok(Json(serde_json::json!({ "reply": reply })))
}

async fn upload_document(
    State(state): State<AppState>,
    Path(stage): Path<String>,
    Query(query): Query<DocumentQuery>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stage = parse_stage(&stage)?;
    let body = body.map_err(body_error)?;
    let document = DocumentUpload::new(query.file_name, body.to_vec()).map_err(session_error)?;
    state
        .session
        .upload_document(stage, document)
        .await
        .map_err(session_error)?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

async fn generate_schema(
    State(state): State<AppState>,
    Path(stage): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stage = parse_stage(&stage)?;
    let schema = state
        .session
        .generate_schema(stage)
        .await
        .map_err(session_error)?;
    Ok(Json(serde_json::json!({ "schema": schema })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_miner_core::{TextEncoding, UnwiredSession, DEFAULT_MAX_UPLOAD_BYTES};
    use std::io::Write;
    use tower::ServiceExt;

    fn test_state(template: TemplateSource) -> AppState {
        AppState {
            app_name: Arc::from("Test Miner"),
            interface: Arc::new(TabbedInterface::build()),
            template: Arc::new(template),
            session: Arc::new(UnwiredSession),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    fn upload(uri: &str, len: usize) -> Request<Body> {
        let mut body = b"%PDF-1.7\n".to_vec();
        body.resize(len, b'0');
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::from(body))
            .unwrap()
    }

    fn template_in(dir: &tempfile::TempDir, contents: &str) -> TemplateSource {
        let path = dir.path().join("json_template.json");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        TemplateSource::new(path, TextEncoding::Utf8)
    }

    async fn body_string(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn index_lists_all_tabs_and_template() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(template_in(&dir, r#"{"name": "", "properties": {}}"#)));
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let html = body_string(res).await;
        assert!(html.contains("<title>Test Miner</title>"));
        assert!(html.contains("Stage-1: Initial Schema Mining"));
        assert!(html.contains("Stage-2: Preliminary Schema Refinement"));
        assert!(html.contains("Stage-3: Finalize Schema Refinement"));
        assert_eq!(html.matches("&quot;properties&quot;: {}").count(), 3);
    }

    #[tokio::test]
    async fn template_endpoint_maps_failure_class_to_status() {
        let dir = tempfile::tempdir().unwrap();

        let ok = build_router(test_state(template_in(&dir, r#"{"name": ""}"#)));
        let res = ok
            .oneshot(Request::builder().uri("/api/v1/template").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_string(res).await, "{\n    \"name\": \"\"\n}");

        let broken = build_router(test_state(template_in(&dir, r#"{"name": "#)));
        let res = broken
            .oneshot(Request::builder().uri("/api/v1/template").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing = build_router(test_state(TemplateSource::new(
            dir.path().join("gone.json"),
            TextEncoding::Utf8,
        )));
        let res = missing
            .oneshot(Request::builder().uri("/api/v1/template").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(body_string(res).await.contains("File Not Found"));
    }

    #[tokio::test]
    async fn interface_endpoint_describes_panels() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(template_in(&dir, "{}")));
        let res = app
            .oneshot(Request::builder().uri("/api/v1/interface").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(json["app"], "Test Miner");
        assert_eq!(json["tabs"].as_array().unwrap().len(), 3);
        assert_eq!(json["panels"][0]["stage"], "initial");
        assert_eq!(json["panels"][0]["transcript"][0]["role"], "assistant");
        assert_eq!(json["panels"][1]["upload"]["button"], "Upload");
    }

    #[tokio::test]
    async fn wired_controls_report_not_implemented() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(template_in(&dir, "{}")));

        let res = app
            .clone()
            .oneshot(post_json(
                "/api/v1/stages/1/api-key",
                serde_json::json!({ "api_key": "sk-test" }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);
        let json: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(json["operation"], "submit_api_key");

        let res = app
            .clone()
            .oneshot(post_json(
                "/api/v1/stages/2/chat",
                serde_json::json!({ "message": "Atomic layer deposition" }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/stages/3/generate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);

        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/stages/1/document?file_name=process.pdf")
                    .body(Body::from("%PDF-1.7"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(template_in(&dir, "{}")));

        let res = app
            .clone()
            .oneshot(post_json("/api/v1/stages/1/api-key", serde_json::json!({ "api_key": "  " })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = app
            .clone()
            .oneshot(post_json("/api/v1/stages/1/chat", serde_json::json!({ "message": "" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/stages/2/document?file_name=paper.docx")
                    .body(Body::from("PK"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/stages/2/document?file_name=paper.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/stages/4/generate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_and_assets_are_served() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(template_in(&dir, "{}")));
        let res = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_string(res).await, "OK");

        let res = app
            .oneshot(Request::builder().uri("/assets/tabs.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn documents_above_two_mebibytes_reach_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(template_in(&dir, "{}")));
        let res = app
            .oneshot(upload("/api/v1/stages/2/document?file_name=paper.pdf", 3 * 1024 * 1024))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn oversized_document_gets_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = test_state(template_in(&dir, "{}"));
        state.max_upload_bytes = 1024;
        let app = build_router(state);
        let res = app
            .oneshot(upload("/api/v1/stages/3/document?file_name=paper.pdf", 2048))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn stage_endpoint_returns_one_panel() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(template_in(&dir, "{}")));
        let res = app
            .clone()
            .oneshot(Request::builder().uri("/api/v1/stages/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(json["title"], "Stage-1: Initial Schema Mining");
        assert_eq!(json["upload"]["action"], "generate");

        let res = app
            .oneshot(Request::builder().uri("/api/v1/stages/9").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stage_segment_must_be_an_exact_tab_number() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(template_in(&dir, "{}")));
        for uri in ["/api/v1/stages/01/generate", "/api/v1/stages/+1/generate"] {
            let res = app
                .clone()
                .oneshot(Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }
}
