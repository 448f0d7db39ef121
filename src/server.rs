//! HTTP surface: one POST endpoint per document kind.

use crate::error::{Error, Result};
use crate::record::DataRecord;
use crate::render::DocumentKind;
use crate::store::TemplateStore;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Template and download name for one endpoint.
#[derive(Debug, Clone)]
pub struct Target {
    pub template: String,
    pub filename: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub word: Target,
    pub excel: Target,
}

impl ServerConfig {
    fn target(&self, kind: DocumentKind) -> &Target {
        match kind {
            DocumentKind::Word => &self.word,
            DocumentKind::Excel => &self.excel,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn TemplateStore>,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: impl TemplateStore + 'static, config: ServerConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "document generation failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// POST /api/generate-word
async fn generate_word(
    State(state): State<AppState>,
    body: std::result::Result<Json<DataRecord>, JsonRejection>,
) -> Result<Response> {
    generate(&state, DocumentKind::Word, body).await
}

/// POST /api/generate-excel
async fn generate_excel(
    State(state): State<AppState>,
    body: std::result::Result<Json<DataRecord>, JsonRejection>,
) -> Result<Response> {
    generate(&state, DocumentKind::Excel, body).await
}

async fn generate(
    state: &AppState,
    kind: DocumentKind,
    body: std::result::Result<Json<DataRecord>, JsonRejection>,
) -> Result<Response> {
    // Reject bad input before touching the template
    let Json(record) = body.map_err(|e| Error::InvalidRecord(e.body_text()))?;
    let target = state.config.target(kind);

    let template = state.store.fetch(&target.template).await?;
    let bytes = tokio::task::spawn_blocking(move || kind.render(&template, &record))
        .await
        .map_err(|e| Error::Worker(e.to_string()))??;

    tracing::info!(
        kind = kind.extension(),
        template = %target.template,
        bytes = bytes.len(),
        "generated document"
    );

    let disposition = format!("attachment; filename=\"{}\"", target.filename);
    Ok((
        [
            (header::CONTENT_TYPE, kind.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/generate-word", post(generate_word))
        .route("/api/generate-excel", post(generate_excel))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(bind: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::store::FsTemplateStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn config() -> ServerConfig {
        ServerConfig {
            word: Target {
                template: "permiso.docx".into(),
                filename: "permiso.docx".into(),
            },
            excel: Target {
                template: "permiso.xlsx".into(),
                filename: "permiso.xlsx".into(),
            },
        }
    }

    fn app(dir: &tempfile::TempDir) -> Router {
        router(AppState::new(FsTemplateStore::new(dir.path()), config()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn error_message(response: Response) -> String {
        let value: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        value["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_generate_word() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("permiso.docx"),
            fixtures::docx("<w:t>{{nombre}} {{grupo_a}}</w:t>"),
        )
        .unwrap();

        let response = app(&dir)
            .oneshot(post_json(
                "/api/generate-word",
                r#"{"nombre": "Ana", "grupo_a": false}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            DocumentKind::Word.content_type()
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"permiso.docx\""
        );
        let bytes = body_bytes(response).await;
        assert_eq!(
            fixtures::read_part(&bytes, "word/document.xml"),
            "<w:t>Ana false</w:t>"
        );
    }

    #[tokio::test]
    async fn test_generate_excel() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("permiso.xlsx"),
            fixtures::xlsx(&[("A1", "Hello {{name}}"), ("B1", "{{other}}")]),
        )
        .unwrap();

        let response = app(&dir)
            .oneshot(post_json("/api/generate-excel", r#"{"name": "Ana"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"permiso.xlsx\""
        );
        let bytes = body_bytes(response).await;
        assert_eq!(fixtures::xlsx_value(&bytes, "A1"), "Hello Ana");
        assert_eq!(fixtures::xlsx_value(&bytes, "B1"), "{{other}}");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();

        for body in ["", "{not json", r#"{"a": {"nested": 1}}"#] {
            let response = app(&dir)
                .oneshot(post_json("/api/generate-word", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            assert!(!error_message(response).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-excel")
            .body(Body::from("{}"))
            .unwrap();

        let response = app(&dir).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(&dir)
            .oneshot(post_json("/api/generate-excel", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            error_message(response).await,
            "template not found: permiso.xlsx"
        );
    }

    #[tokio::test]
    async fn test_template_error_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("permiso.docx"),
            fixtures::docx("<w:t>{{nombre</w:t>"),
        )
        .unwrap();

        let response = app(&dir)
            .oneshot(post_json("/api/generate-word", r#"{"nombre": "Ana"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error_message(response).await.contains("unclosed tag"));
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app(&dir).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"ok");
    }
}
