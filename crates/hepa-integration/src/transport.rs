//! 预测服务传输层
//!
//! 把一次出站JSON调用抽象成 [`PredictionTransport`]，网关只依赖该接口。

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// 出站调用接口
#[async_trait]
pub trait PredictionTransport: Send + Sync {
    /// 以JSON请求体POST到 `url`，返回解析后的响应体
    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> Result<Value>;
}

/// 基于reqwest的HTTP传输
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hepa/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PredictionTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> Result<Value> {
        debug!("POST {} (timeout {:?})", url, timeout);

        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Prediction service responded with {}: {}", status, url);
            return Err(anyhow::anyhow!(
                "Request failed with status code {}",
                status.as_u16()
            ));
        }

        let value = response.json::<Value>().await?;
        Ok(value)
    }
}
