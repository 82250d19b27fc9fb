//! # Hepa管理模块
//!
//! 提供配置加载和验证

pub mod config;

pub use config::{
    ConfigManager, HepaConfig, LoggingConfig, PredictionConfig, ServerConfig, StorageConfig,
};
