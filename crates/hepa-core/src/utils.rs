//! 通用工具函数

use uuid::Uuid;

/// 生成唯一的记录标识
pub fn generate_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// 去掉基础URL末尾的一个 `/`
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.strip_suffix('/').unwrap_or(base_url).to_string()
}
