//! Web服务器

use axum::{
    routing::{get, post, put},
    Router,
};
use hepa_core::Result;
use hepa_integration::PredictionGateway;
use hepa_storage::RecordStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::handlers::{
    api_root, create_record, delete_record, diagnose, health, list_records, retrain,
    update_record,
};

/// 处理器共享状态
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<PredictionGateway>,
    pub records: Arc<RecordStore>,
}

impl AppState {
    pub fn new(gateway: PredictionGateway, records: RecordStore) -> Self {
        Self {
            gateway: Arc::new(gateway),
            records: Arc::new(records),
        }
    }
}

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        let app = create_app(state);
        Self { addr, app }
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app).await?;

        Ok(())
    }
}

/// 创建完整路由
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // 根路径
        .route("/", get(api_root))
        // 健康检查
        .route("/health", get(health))
        // 预测服务
        .route("/diagnose", post(diagnose))
        .route("/retrain", post(retrain))
        // 诊断记录
        .merge(record_routes())
        .with_state(state)
        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// 诊断记录路由
fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/diagnosticos", get(list_records).post(create_record))
        .route("/diagnosticos/:id", put(update_record).delete(delete_record))
}
