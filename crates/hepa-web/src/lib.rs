//! # Hepa Web模块
//!
//! 诊断与记录管理的HTTP API。

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{create_app, AppState, WebServer};
