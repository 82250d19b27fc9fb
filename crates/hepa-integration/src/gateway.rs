//! 预测服务网关
//!
//! 把诊断和重新训练请求转发到远程预测服务，统一错误格式。
//! 每次调用只尝试一次，不重试。

use hepa_core::utils::normalize_base_url;
use hepa_core::{HepaError, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::transport::{HttpTransport, PredictionTransport};

/// 诊断请求超时
pub const PREDICT_TIMEOUT: Duration = Duration::from_millis(8000);

/// 重新训练请求超时
pub const RETRAIN_TIMEOUT: Duration = Duration::from_millis(20000);

/// 预测服务网关
#[derive(Clone)]
pub struct PredictionGateway {
    base_url: String,
    transport: Arc<dyn PredictionTransport>,
}

impl PredictionGateway {
    /// 使用默认HTTP传输创建网关
    pub fn new(base_url: &str) -> Result<Self> {
        let transport = HttpTransport::new()
            .map_err(|e| HepaError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_transport(base_url, Arc::new(transport)))
    }

    pub fn with_transport(base_url: &str, transport: Arc<dyn PredictionTransport>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 请求诊断预测，载荷必须是JSON对象
    pub async fn diagnose(&self, payload: &Value) -> Result<Value> {
        if !payload.is_object() {
            return Err(HepaError::InvalidArgument(
                "payload must be a JSON object".to_string(),
            ));
        }

        let url = format!("{}/predict", self.base_url);
        info!("Forwarding diagnosis request to {}", url);

        self.transport
            .post_json(&url, payload, PREDICT_TIMEOUT)
            .await
            .map_err(|e| {
                error!("Diagnosis request failed: {}", e);
                HepaError::PredictionService(e.to_string())
            })
    }

    /// 触发模型重新训练
    pub async fn retrain(&self) -> Result<Value> {
        let url = format!("{}/train", self.base_url);
        info!("Requesting model retraining at {}", url);

        self.transport
            .post_json(&url, &json!({}), RETRAIN_TIMEOUT)
            .await
            .map_err(|e| {
                error!("Retrain request failed: {}", e);
                HepaError::Retrain(e.to_string())
            })
    }
}
