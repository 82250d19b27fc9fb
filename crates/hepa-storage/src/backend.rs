//! 集合存储后端
//!
//! 后端只负责整份集合文本的读写，解析和容错由 [`crate::RecordStore`] 处理。

use async_trait::async_trait;
use hepa_core::Result;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::info;

/// 空集合的序列化形式
pub const EMPTY_COLLECTION: &str = "[]";

/// 存储后端接口
#[async_trait]
pub trait CollectionBackend: Send + Sync {
    /// 读取整份集合，数据不存在时返回 `None`
    async fn load(&self) -> Result<Option<String>>;

    /// 覆盖写入整份集合
    async fn save(&self, data: &str) -> Result<()>;

    /// 存储位置描述，用于日志
    fn location(&self) -> String;
}

/// 文件存储后端
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// 打开文件后端，缺失的目录和文件会被同步创建
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        if !path.exists() {
            std::fs::write(&path, EMPTY_COLLECTION)?;
            info!("Initialized empty collection at {}", path.display());
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 同目录下的临时文件，保证重命名不跨文件系统
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CollectionBackend for FileBackend {
    async fn load(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // 先写临时文件再重命名覆盖，读取方只会看到完整的集合
    async fn save(&self, data: &str) -> Result<()> {
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// 内存存储后端，用于测试
#[derive(Debug)]
pub struct MemoryBackend {
    data: RwLock<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Some(EMPTY_COLLECTION.to_string())),
        }
    }

    /// 以给定内容初始化，可用于模拟损坏的数据
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: RwLock::new(Some(data.into())),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.data.read().await.clone())
    }

    async fn save(&self, data: &str) -> Result<()> {
        *self.data.write().await = Some(data.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
