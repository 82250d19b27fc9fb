//! 诊断记录存储管理

use hepa_core::utils::generate_record_id;
use hepa_core::{DiagnosisRecord, Fields, Result};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::backend::{CollectionBackend, FileBackend, MemoryBackend};

/// 记录存储
///
/// 每次变更都读取整个集合、修改后整体写回。同一存储上的变更通过
/// `write_lock` 串行执行，读取不加锁。
pub struct RecordStore {
    backend: Arc<dyn CollectionBackend>,
    write_lock: Mutex<()>,
}

impl RecordStore {
    /// 基于文件打开存储
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let backend = FileBackend::open(path)?;
        info!("Record store opened at {}", backend.location());
        Ok(Self::with_backend(Arc::new(backend)))
    }

    /// 内存存储
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()))
    }

    pub fn with_backend(backend: Arc<dyn CollectionBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// 列出全部记录
    pub async fn list(&self) -> Result<Vec<DiagnosisRecord>> {
        Ok(self.read_all().await)
    }

    /// 创建记录，调用方提供的 `id` 会被覆盖
    pub async fn create(&self, fields: Fields) -> Result<DiagnosisRecord> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await;
        let record = DiagnosisRecord::new(generate_record_id(), fields);
        records.push(record.clone());
        self.write_all(&records).await?;

        info!("Created diagnosis record {}", record.id);
        Ok(record)
    }

    /// 浅合并更新记录，找不到时集合原样写回
    pub async fn update(&self, id: &str, patch: Fields) -> Result<Option<DiagnosisRecord>> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await;
        let updated = match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.merge(patch);
                Some(record.clone())
            }
            None => None,
        };
        self.write_all(&records).await?;

        match &updated {
            Some(_) => info!("Updated diagnosis record {}", id),
            None => debug!("No diagnosis record {} to update", id),
        }
        Ok(updated)
    }

    /// 删除记录，返回是否有记录被删除
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = records.len() != before;
        self.write_all(&records).await?;

        if removed {
            info!("Deleted diagnosis record {}", id);
        } else {
            debug!("No diagnosis record {} to delete", id);
        }
        Ok(removed)
    }

    // 读取失败或数据损坏时返回空集合
    async fn read_all(&self) -> Vec<DiagnosisRecord> {
        let data = match self.backend.load().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                warn!("Collection at {} is missing, reading as empty", self.backend.location());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read collection at {}: {}", self.backend.location(), e);
                return Vec::new();
            }
        };

        let items = match serde_json::from_str::<Vec<Value>>(&data) {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    "Collection at {} is not a valid record list, reading as empty: {}",
                    self.backend.location(),
                    e
                );
                return Vec::new();
            }
        };

        // 单条损坏的记录只跳过自身
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<DiagnosisRecord>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(
                        "Skipping invalid record #{} in {}: {}",
                        index,
                        self.backend.location(),
                        e
                    );
                    None
                }
            })
            .collect()
    }

    async fn write_all(&self, records: &[DiagnosisRecord]) -> Result<()> {
        let data = serde_json::to_string_pretty(records)?;
        self.backend.save(&data).await
    }
}
