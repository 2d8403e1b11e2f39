use crate::models::{CanonicalRecord, RawDataset, RawValue, ResolvedMapping, Warnings};
use std::collections::{HashMap, HashSet};

/// 清洗订单号: 去空白后只保留数字, 无数字时为空串
pub fn clean_order_id(value: &RawValue) -> String {
    value
        .to_text()
        .map(|text| text.chars().filter(|c| c.is_ascii_digit()).collect())
        .unwrap_or_default()
}

/// 清洗金额: 去掉货币符号、千分位和空白后解析; 空值或解析失败按 0.0 处理, 不产生告警
pub fn clean_money(value: &RawValue) -> f64 {
    let parsed = match value {
        RawValue::Empty => return 0.0,
        RawValue::Number(n) => *n,
        RawValue::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| !matches!(c, '¥' | '￥' | ',') && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                return 0.0;
            }
            cleaned.parse::<f64>().unwrap_or(0.0)
        }
    };

    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// 单侧清洗输出
#[derive(Debug, Clone, Default)]
pub struct StandardizeOutput {
    pub records: Vec<CanonicalRecord>,
    pub warnings: Warnings,
}

/// 记录标准化: 投影 -> 清洗订单号 -> 清洗金额 -> 状态过滤 -> 去重
#[derive(Debug, Clone)]
pub struct RecordStandardizer {
    valid_statuses: HashSet<String>,
}

impl Default for RecordStandardizer {
    fn default() -> Self {
        Self::new(crate::config::CleaningConfig::default().valid_statuses)
    }
}

impl RecordStandardizer {
    pub fn new<I, S>(valid_statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            valid_statuses: valid_statuses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn standardize(
        &self,
        dataset: &RawDataset,
        mapping: &ResolvedMapping,
        label: &str,
    ) -> StandardizeOutput {
        let mut warnings = Warnings::new();

        // 1-4. 投影并清洗
        let projected: Vec<CanonicalRecord> = dataset
            .rows
            .iter()
            .map(|row| {
                let raw_id = RawDataset::cell(row, &mapping.order_id);
                CanonicalRecord {
                    order_id: clean_order_id(raw_id),
                    order_id_raw: raw_id.to_text(),
                    product_name: RawDataset::cell(row, &mapping.product_name).to_text(),
                    order_status: RawDataset::cell(row, &mapping.order_status)
                        .to_text()
                        .map(|s| s.trim().to_string())
                        .unwrap_or_default(),
                    sales_amount: clean_money(RawDataset::cell(row, &mapping.sales_amount)),
                    cost_amount: clean_money(RawDataset::cell(row, &mapping.cost_amount)),
                }
            })
            .collect();

        let invalid_ids = projected.iter().filter(|r| r.is_invalid_order_id()).count();
        if invalid_ids > 0 {
            warnings.push(format!(
                "{}: detected {} non-numeric or empty order ids, marked as invalid",
                label, invalid_ids
            ));
        }

        // 5. 状态过滤
        let before_filter = projected.len();
        let filtered: Vec<CanonicalRecord> = projected
            .into_iter()
            .filter(|r| self.valid_statuses.contains(&r.order_status))
            .collect();
        let filtered_count = before_filter - filtered.len();
        if filtered_count > 0 {
            warnings.push(format!(
                "{}: filtered {} orders with invalid status",
                label, filtered_count
            ));
        }

        // 6. 去重: 保留每个订单号最后一条, 位置取最后一条所在位置
        let (duplicate_rows, keep) = {
            let mut occurrences: HashMap<&str, usize> = HashMap::new();
            let mut last_position: HashMap<&str, usize> = HashMap::new();
            for (pos, r) in filtered.iter().enumerate() {
                *occurrences.entry(r.order_id.as_str()).or_insert(0) += 1;
                last_position.insert(r.order_id.as_str(), pos);
            }
            let duplicate_rows: usize = occurrences.values().filter(|&&n| n > 1).sum();
            let keep: HashSet<usize> = last_position.into_values().collect();
            (duplicate_rows, keep)
        };

        let records: Vec<CanonicalRecord> = if duplicate_rows > 0 {
            warnings.push(format!(
                "{}: detected {} duplicate order ids, keeping the last record",
                label, duplicate_rows
            ));
            filtered
                .into_iter()
                .enumerate()
                .filter(|(pos, _)| keep.contains(pos))
                .map(|(_, r)| r)
                .collect()
        } else {
            filtered
        };

        tracing::info!(
            "{}: 清洗完成, 输入 {} 行, 输出 {} 行",
            label,
            dataset.rows.len(),
            records.len()
        );

        StandardizeOutput { records, warnings }
    }
}
