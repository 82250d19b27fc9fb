//! 诊断记录服务主程序

use anyhow::{Context, Result};
use clap::Parser;
use hepa_admin::config::{ConfigManager, DEFAULT_CONFIG_PATH};
use hepa_integration::PredictionGateway;
use hepa_storage::RecordStore;
use hepa_web::{AppState, WebServer};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 服务器命令行参数，未指定的项使用配置文件和环境变量中的值
#[derive(Parser, Debug)]
#[command(name = "hepa-server")]
#[command(about = "诊断记录服务：转发预测请求并管理诊断记录")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 服务器端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 预测服务基础URL
    #[arg(long)]
    prediction_url: Option<String>,

    /// 诊断记录文件路径
    #[arg(short, long)]
    storage_path: Option<String>,

    /// 日志级别
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut manager = ConfigManager::new(&args.config)?;
    let mut config = manager.get_config().clone();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.prediction_url {
        config.prediction.base_url = url;
    }
    if let Some(path) = args.storage_path {
        config.storage.path = path;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    manager.update_config(config)?;
    let config_path = manager.config_path().to_string();
    let config = manager.into_config();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .init();

    info!("启动诊断记录服务...");
    info!("  配置文件: {}", config_path);
    info!("  监听地址: {}:{}", config.server.host, config.server.port);
    info!("  预测服务: {}", config.prediction.base_url);
    info!("  记录文件: {}", config.storage.path);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;

    let records = RecordStore::open(&config.storage.path)
        .with_context(|| format!("Failed to open record store at {}", config.storage.path))?;
    let gateway = PredictionGateway::new(&config.prediction.base_url)?;

    let server = WebServer::new(addr, AppState::new(gateway, records));
    if let Err(e) = server.run().await {
        error!("服务器启动失败: {}", e);
        return Err(e.into());
    }

    Ok(())
}
