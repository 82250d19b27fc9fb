//! 配置管理
//!
//! 配置按以下顺序叠加：结构体默认值、可选的TOML配置文件、`HEPA_` 前缀的环境变量。
//! 命令行参数的覆盖由服务器入口处理。

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "HEPA";

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config/hepa.toml";

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    /// 配置数据
    config: HepaConfig,
    /// 配置文件路径
    config_path: String,
    /// 配置验证器
    validator: ConfigValidator,
}

/// 服务完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HepaConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 预测服务配置
    pub prediction: PredictionConfig,
    /// 存储配置
    pub storage: StorageConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 预测服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// 预测服务基础URL
    pub base_url: String,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 记录集合文件路径
    pub path: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别（EnvFilter语法）
    pub level: String,
}

/// 配置验证器
pub struct ConfigValidator {
    validation_rules: Vec<ValidationRule>,
}

struct ValidationRule {
    field_path: String,
    validator: fn(&HepaConfig) -> Result<()>,
    error_message: String,
}

impl ConfigManager {
    /// 从配置文件和进程环境变量加载配置
    pub fn new(config_path: &str) -> Result<Self> {
        Self::with_env(config_path, None)
    }

    /// 使用给定的环境变量表加载配置，`None` 表示读取进程环境
    pub fn with_env(config_path: &str, env: Option<HashMap<String, String>>) -> Result<Self> {
        let config = Self::load_config(config_path, env)?;
        let validator = ConfigValidator::new();
        validator.validate(&config)?;

        Ok(Self {
            config,
            config_path: config_path.to_string(),
            validator,
        })
    }

    /// 从文件加载配置
    fn load_config(config_path: &str, env: Option<HashMap<String, String>>) -> Result<HepaConfig> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: HepaConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        info!("Configuration loaded (file: {})", config_path);
        Ok(config)
    }

    /// 获取配置
    pub fn get_config(&self) -> &HepaConfig {
        &self.config
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    /// 应用覆盖后重新验证
    pub fn update_config(&mut self, new_config: HepaConfig) -> Result<()> {
        self.validator.validate(&new_config)?;
        self.config = new_config;
        Ok(())
    }

    pub fn into_config(self) -> HepaConfig {
        self.config
    }
}

impl ConfigValidator {
    /// 创建新的配置验证器
    pub fn new() -> Self {
        let validation_rules = vec![
            ValidationRule {
                field_path: "server.port".to_string(),
                validator: |config| {
                    if config.server.port == 0 {
                        Err(anyhow::anyhow!("Server port cannot be 0"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid server port".to_string(),
            },
            ValidationRule {
                field_path: "prediction.base_url".to_string(),
                validator: |config| {
                    let url = config.prediction.base_url.as_str();
                    if url.starts_with("http://") || url.starts_with("https://") {
                        Ok(())
                    } else {
                        Err(anyhow::anyhow!("Base URL must be http(s): '{}'", url))
                    }
                },
                error_message: "Invalid prediction service URL".to_string(),
            },
            ValidationRule {
                field_path: "storage.path".to_string(),
                validator: |config| {
                    if config.storage.path.trim().is_empty() {
                        Err(anyhow::anyhow!("Storage path cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid storage path".to_string(),
            },
            ValidationRule {
                field_path: "logging.level".to_string(),
                validator: |config| {
                    if config.logging.level.trim().is_empty() {
                        Err(anyhow::anyhow!("Log level cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid log level".to_string(),
            },
        ];

        Self { validation_rules }
    }

    /// 验证配置
    pub fn validate(&self, config: &HepaConfig) -> Result<()> {
        for rule in &self.validation_rules {
            if let Err(e) = (rule.validator)(config) {
                error!("Configuration validation failed for {}: {}", rule.field_path, e);
                return Err(anyhow::anyhow!("{}: {}", rule.error_message, e));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ConfigValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.validation_rules.iter().map(|r| &r.field_path))
            .finish()
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "./data/diagnosticos.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
