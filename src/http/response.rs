//! Response bodies.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::routing::{Page, PathParams};

/// Descriptor for a resolved page.
#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub page: Page,
    pub title: &'static str,
    pub pattern: &'a str,
    pub path: &'a str,
    pub params: &'a PathParams,
    pub auth: &'static str,
}

/// Errors the shell answers with.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("no route matches {path}")]
    NotFound { path: String },

    #[error("{page} needs auth state: {reason}")]
    AuthUnavailable { page: Page, reason: String },

    #[error("auth bootstrap has not been initialized")]
    NotInitialized,

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ShellError {
    pub fn status(&self) -> StatusCode {
        match self {
            ShellError::NotFound { .. } => StatusCode::NOT_FOUND,
            ShellError::AuthUnavailable { .. } | ShellError::NotInitialized => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ShellError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ShellError::NotFound { .. } => "not_found",
            ShellError::AuthUnavailable { .. } => "auth_unavailable",
            ShellError::NotInitialized => "auth_not_initialized",
            ShellError::MethodNotAllowed => "method_not_allowed",
        }
    }
}

impl IntoResponse for ShellError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.code(), "message": self.to_string() });
        let mut response = (self.status(), Json(body)).into_response();
        if let ShellError::MethodNotAllowed = self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        }
        response
    }
}
