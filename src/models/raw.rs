use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 原始单元格值 (文本 / 数字 / 空)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Empty,
}

impl RawValue {
    /// 转为文本; 整数值的数字不带小数部分 (123.0 -> "123")
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawValue::Empty => None,
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{:.0}", n))
            }
            RawValue::Number(n) => Some(n.to_string()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(RawValue::Empty)
    }
}

/// 一行原始数据: 表头 -> 值
pub type RawRow = HashMap<String, RawValue>;

/// 原始数据集 (保留表头顺序)
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawDataset {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    /// 取某行某列的值, 缺失列视为空
    pub fn cell<'a>(row: &'a RawRow, header: &str) -> &'a RawValue {
        row.get(header).unwrap_or(&EMPTY)
    }
}

static EMPTY: RawValue = RawValue::Empty;
