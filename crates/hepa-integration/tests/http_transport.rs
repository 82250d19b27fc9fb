//! HTTP传输层与网关在本地假预测服务上的测试

use axum::{http::StatusCode, routing::post, Json, Router};
use hepa_core::HepaError;
use hepa_integration::{HttpTransport, PredictionGateway, PredictionTransport};
use serde_json::{json, Value};
use std::time::Duration;

/// 启动一个本地假预测服务，返回其基础URL
async fn spawn_fake_model() -> String {
    let app = Router::new()
        .route(
            "/predict",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"prediction": 0, "label": "0=Blood Donor", "echo": body}))
            }),
        )
        .route(
            "/train",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"ok": false, "error": "Dados insuficientes para treino"})),
                )
            }),
        )
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({}))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_diagnose_passes_remote_body_through() {
    let base_url = spawn_fake_model().await;
    let gateway = PredictionGateway::new(&base_url).unwrap();

    let payload = json!({"Age": 45, "Sex": "m", "ALT": 15.7});
    let result = gateway.diagnose(&payload).await.unwrap();

    assert_eq!(
        result,
        json!({"prediction": 0, "label": "0=Blood Donor", "echo": payload})
    );
}

#[tokio::test]
async fn test_retrain_non_success_status_is_retrain_error() {
    let base_url = spawn_fake_model().await;
    let gateway = PredictionGateway::new(&base_url).unwrap();

    let err = gateway.retrain().await.unwrap_err();
    assert!(matches!(err, HepaError::Retrain(_)));
    assert_eq!(
        err.to_string(),
        "Falha ao re-treinar modelo: Request failed with status code 500"
    );
}

#[tokio::test]
async fn test_transport_applies_request_timeout() {
    let base_url = spawn_fake_model().await;
    let transport = HttpTransport::new().unwrap();

    let url = format!("{}slow", base_url);
    let result = transport
        .post_json(&url, &json!({}), Duration::from_millis(100))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_unreachable_service_is_prediction_error() {
    // 端口0不可连接
    let gateway = PredictionGateway::new("http://127.0.0.1:0").unwrap();

    let err = gateway.diagnose(&json!({"Age": 45})).await.unwrap_err();
    assert!(matches!(err, HepaError::PredictionService(_)));
    assert!(err
        .to_string()
        .starts_with("Falha ao chamar serviço de predição: "));
}
