//! Serde glue for SurrealDB record links
//!
//! 模型中的记录引用在 API JSON 里是 "table:id" 字符串, 从数据库读出时
//! 是 SurrealDB 原生的 RecordId 值, 两种来源都必须能解析。

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// `#[serde(default = ...)]` 用
pub fn default_true() -> bool {
    true
}

/// 缺省为 true 的布尔字段 (null 也视为 true)
pub fn bool_true<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(de)?.unwrap_or(true))
}

/// 记录引用的两种输入形态
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordIdRepr {
    /// API JSON 里的 "table:id" 字符串
    Text(String),
    /// 数据库返回的原生值
    Native(RecordId),
}

impl RecordIdRepr {
    fn into_record_id<E: DeError>(self) -> Result<RecordId, E> {
        match self {
            RecordIdRepr::Text(raw) => raw
                .parse()
                .map_err(|_| E::custom(format!("invalid record id: {raw}"))),
            RecordIdRepr::Native(id) => Ok(id),
        }
    }
}

/// `RecordId` 字段, 线上形态为 "table:id" 字符串
pub mod record_id {
    use super::*;

    pub fn serialize<S: Serializer>(id: &RecordId, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<RecordId, D::Error> {
        RecordIdRepr::deserialize(de)?.into_record_id()
    }
}

/// `Option<RecordId>` 字段, 缺省与 null 都映射为 `None`
pub mod option_record_id {
    use super::*;

    pub fn serialize<S: Serializer>(id: &Option<RecordId>, ser: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => ser.serialize_some(&id.to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<RecordId>, D::Error> {
        match Option::<RecordIdRepr>::deserialize(de)? {
            Some(repr) => repr.into_record_id().map(Some),
            None => Ok(None),
        }
    }
}
