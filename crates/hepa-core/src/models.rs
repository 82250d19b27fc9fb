//! 核心数据模型定义

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 记录的自由字段（无固定schema）
pub type Fields = Map<String, Value>;

/// 标识字段名
pub const ID_FIELD: &str = "id";

/// 诊断记录
///
/// 磁盘上是一个扁平的JSON对象，`id` 与调用方提供的字段处于同一层级。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    #[serde(deserialize_with = "deserialize_record_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl DiagnosisRecord {
    /// 用给定标识和字段构造记录，字段中的 `id` 会被丢弃
    pub fn new(id: impl Into<String>, mut fields: Fields) -> Self {
        fields.remove(ID_FIELD);
        Self {
            id: id.into(),
            fields,
        }
    }

    /// 浅合并：补丁字段覆盖已有字段，`id` 不可修改
    pub fn merge(&mut self, patch: Fields) {
        for (key, value) in patch {
            if key == ID_FIELD {
                continue;
            }
            self.fields.insert(key, value);
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

// 旧数据中的标识是毫秒时间戳（数字），读取时统一转成字符串
fn deserialize_record_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "invalid record id: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = DiagnosisRecord::new("abc", fields(json!({"nome": "Amanda", "idade": 30})));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"id": "abc", "nome": "Amanda", "idade": 30}));
    }

    #[test]
    fn test_new_discards_caller_id() {
        let record = DiagnosisRecord::new("abc", fields(json!({"id": "forged", "nome": "Amanda"})));
        assert_eq!(record.id, "abc");
        assert!(record.get("id").is_none());
    }

    #[test]
    fn test_merge_keeps_id_and_overrides_fields() {
        let mut record = DiagnosisRecord::new("abc", fields(json!({"nome": "Amanda", "idade": 30})));
        record.merge(fields(json!({"id": "other", "nome": "Atualizado"})));

        assert_eq!(record.id, "abc");
        assert_eq!(record.get("nome"), Some(&json!("Atualizado")));
        assert_eq!(record.get("idade"), Some(&json!(30)));
    }

    #[test]
    fn test_legacy_numeric_id_is_accepted() {
        let record: DiagnosisRecord =
            serde_json::from_value(json!({"id": 1712345678901u64, "nome": "Amanda"})).unwrap();
        assert_eq!(record.id, "1712345678901");
        assert_eq!(record.get("nome"), Some(&json!("Amanda")));
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        let result: std::result::Result<DiagnosisRecord, _> =
            serde_json::from_value(json!({"nome": "Amanda"}));
        assert!(result.is_err());
    }
}
