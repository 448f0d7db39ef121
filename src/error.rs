use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("failed to read template {id}: {details}")]
    Storage { id: String, details: String },

    #[error("invalid Excel template: {0}")]
    InvalidWorkbook(String),

    #[error("invalid Word template: {0}")]
    InvalidDocument(String),

    #[error("template error in {part}: {details}")]
    Template { part: String, details: String },

    #[error("invalid request data: {0}")]
    InvalidRecord(String),

    #[error("render task failed: {0}")]
    Worker(String),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::TemplateNotFound(_) => 1,
            Error::Storage { .. } => 1,
            Error::Io(_) => 1,
            Error::Worker(_) => 1,
            Error::InvalidWorkbook(_) => 2,
            Error::InvalidDocument(_) => 2,
            Error::Template { .. } => 2,
            Error::InvalidRecord(_) => 3,
            Error::Json(_) => 3,
            Error::UnsupportedFormat(_) => 3,
        }
    }

    /// HTTP status reported by the generation endpoints.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRecord(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
