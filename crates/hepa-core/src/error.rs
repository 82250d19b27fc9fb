//! 错误定义模块

use thiserror::Error;

/// 诊断服务统一错误类型
#[derive(Error, Debug)]
pub enum HepaError {
    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("Falha ao chamar serviço de predição: {0}")]
    PredictionService(String),

    #[error("Falha ao re-treinar modelo: {0}")]
    Retrain(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

/// 诊断服务统一结果类型
pub type Result<T> = std::result::Result<T, HepaError>;
