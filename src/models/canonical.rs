use crate::error::ReconError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 标准字段 (固定5个, 扩展需改动 schema)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalKey {
    OrderId,
    ProductName,
    OrderStatus,
    SalesAmount,
    CostAmount,
}

impl CanonicalKey {
    pub const ALL: [CanonicalKey; 5] = [
        CanonicalKey::OrderId,
        CanonicalKey::ProductName,
        CanonicalKey::OrderStatus,
        CanonicalKey::SalesAmount,
        CanonicalKey::CostAmount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderId => "order_id",
            Self::ProductName => "product_name",
            Self::OrderStatus => "order_status",
            Self::SalesAmount => "sales_amount",
            Self::CostAmount => "cost_amount",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 字段映射: 标准字段 -> 原始表头 (None 表示未解析)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<CanonicalKey, Option<String>>,
}

impl ColumnMapping {
    /// 所有字段均未解析
    pub fn new() -> Self {
        Self {
            entries: CanonicalKey::ALL.iter().map(|k| (*k, None)).collect(),
        }
    }

    pub fn get(&self, key: CanonicalKey) -> Option<&str> {
        self.entries.get(&key).and_then(|v| v.as_deref())
    }

    pub fn set(&mut self, key: CanonicalKey, header: Option<String>) {
        self.entries.insert(key, header);
    }

    /// 未解析字段, 按标准字段顺序
    pub fn missing_keys(&self) -> Vec<CanonicalKey> {
        CanonicalKey::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_none())
            .collect()
    }

    /// 转为完整映射; 有未解析字段时返回 UnresolvedMapping
    pub fn resolve(&self, label: &str) -> Result<ResolvedMapping, ReconError> {
        let missing = self.missing_keys();
        if !missing.is_empty() {
            return Err(ReconError::UnresolvedMapping {
                label: label.to_string(),
                missing,
            });
        }
        let header = |k: CanonicalKey| self.get(k).unwrap_or_default().to_string();
        Ok(ResolvedMapping {
            order_id: header(CanonicalKey::OrderId),
            product_name: header(CanonicalKey::ProductName),
            order_status: header(CanonicalKey::OrderStatus),
            sales_amount: header(CanonicalKey::SalesAmount),
            cost_amount: header(CanonicalKey::CostAmount),
        })
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::new()
    }
}

/// 映射结果 (推断和手工校验共用)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingResult {
    pub mapping: ColumnMapping,
    pub missing_keys: Vec<CanonicalKey>,
}

impl MappingResult {
    pub fn from_mapping(mapping: ColumnMapping) -> Self {
        let missing_keys = mapping.missing_keys();
        Self {
            mapping,
            missing_keys,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_keys.is_empty()
    }
}

/// 5个字段全部解析后的映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMapping {
    pub order_id: String,
    pub product_name: String,
    pub order_status: String,
    pub sales_amount: String,
    pub cost_amount: String,
}

/// 清洗后的标准记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    /// 仅保留数字, 为空表示非法订单号
    pub order_id: String,
    pub order_id_raw: Option<String>,
    pub product_name: Option<String>,
    pub order_status: String,
    pub sales_amount: f64,
    pub cost_amount: f64,
}

impl CanonicalRecord {
    pub fn is_invalid_order_id(&self) -> bool {
        self.order_id.is_empty()
    }
}
