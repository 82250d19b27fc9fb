//! HTTP处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use hepa_core::{DiagnosisRecord, Fields, HepaError};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::server::AppState;

/// API根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "service": "Hepa Diagnosis API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "diagnose": "/diagnose",
            "retrain": "/retrain",
            "records": "/diagnosticos"
        }
    }))
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 诊断预测处理器
pub async fn diagnose(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let result = state.gateway.diagnose(&payload).await?;
    Ok(Json(result))
}

/// 模型重新训练处理器
pub async fn retrain(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let result = state.gateway.retrain().await?;
    Ok(Json(result))
}

/// 记录列表处理器
pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<DiagnosisRecord>>, ApiError> {
    let records = state.records.list().await?;
    Ok(Json(records))
}

/// 记录创建处理器
pub async fn create_record(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<DiagnosisRecord>), ApiError> {
    let fields = into_fields(body)?;
    let record = state.records.create(fields).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// 记录更新处理器，没有匹配的记录时返回204
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let patch = into_fields(body)?;
    match state.records.update(&id, patch).await? {
        Some(record) => Ok(Json(record).into_response()),
        None => {
            info!("Update of unknown record {} ignored", id);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// 记录删除处理器
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.records.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn into_fields(body: Value) -> Result<Fields, HepaError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(HepaError::InvalidArgument(
            "record body must be a JSON object".to_string(),
        )),
    }
}
