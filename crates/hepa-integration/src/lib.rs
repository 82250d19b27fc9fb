//! # Hepa集成模块
//!
//! 提供与外部预测服务的集成：
//! - 诊断预测请求转发
//! - 模型重新训练触发
//! - 可替换的HTTP传输层

pub mod gateway;
pub mod transport;

pub use gateway::{PredictionGateway, PREDICT_TIMEOUT, RETRAIN_TIMEOUT};
pub use transport::{HttpTransport, PredictionTransport};
