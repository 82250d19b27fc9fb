//! HTTP错误映射

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use hepa_core::HepaError;
use serde_json::json;
use tracing::error;

/// 包装 [`HepaError`] 以实现 `IntoResponse`
#[derive(Debug)]
pub struct ApiError(pub HepaError);

impl From<HepaError> for ApiError {
    fn from(err: HepaError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            HepaError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            HepaError::PredictionService(_) | HepaError::Retrain(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = Json(json!({
            "error": true,
            "message": self.0.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
