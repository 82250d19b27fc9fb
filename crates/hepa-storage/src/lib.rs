//! # Hepa存储模块
//!
//! 负责诊断记录集合的持久化。

pub mod backend;
pub mod storage;

pub use backend::*;
pub use storage::*;
