use crate::models::{
    CanonicalRecord, ReconciledRecord, StatusFlag, SummaryMetrics, Warnings, LOSS_SUFFIX,
};
use crate::service::summary::summarize;
use indexmap::IndexMap;

pub const EMPTY_RESULT_WARNING: &str =
    "reconciliation result is empty, check uploaded data and status filter conditions";

/// 对账输出
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutput {
    pub records: Vec<ReconciledRecord>,
    pub summary: SummaryMetrics,
    pub warnings: Warnings,
}

/// 按订单号建索引 (保序: 位置取首次出现, 值取最后一次出现)
fn index_by_order_id(records: &[CanonicalRecord]) -> IndexMap<&str, &CanonicalRecord> {
    let mut index = IndexMap::with_capacity(records.len());
    for r in records {
        index.insert(r.order_id.as_str(), r);
    }
    index
}

/// 合并一行: 官方值优先, 官方缺失时取客服值
fn merge_row(
    order_id: &str,
    official: Option<&CanonicalRecord>,
    service: Option<&CanonicalRecord>,
) -> ReconciledRecord {
    let status_flag = match (official.is_some(), service.is_some()) {
        (true, true) => StatusFlag::Matched,
        (true, false) => StatusFlag::MissingFromService,
        _ => StatusFlag::ExtraInService,
    };

    let product_name = official
        .and_then(|r| r.product_name.clone())
        .or_else(|| service.and_then(|r| r.product_name.clone()));
    let order_status = official
        .or(service)
        .map(|r| r.order_status.clone());
    let sales_amount = official
        .or(service)
        .map(|r| r.sales_amount)
        .unwrap_or(0.0);
    let cost_amount = official
        .or(service)
        .map(|r| r.cost_amount)
        .unwrap_or(0.0);

    let profit = sales_amount - cost_amount;
    let is_loss = profit < 0.0;
    let final_status = if is_loss {
        format!("{}{}", status_flag, LOSS_SUFFIX)
    } else {
        status_flag.to_string()
    };

    ReconciledRecord {
        index: 0,
        order_id: order_id.to_string(),
        product_name,
        order_status,
        sales_amount,
        cost_amount,
        profit,
        is_loss,
        status_flag,
        final_status,
    }
}

/// 全外连接对账
///
/// 输出顺序: 先按官方数据中订单号的出现顺序输出 Matched / MissingFromService,
/// 再按客服数据中的出现顺序输出 ExtraInService; index 从1开始连续编号。
/// 汇总指标随结果一起返回。
pub fn reconcile(official: &[CanonicalRecord], service: &[CanonicalRecord]) -> ReconcileOutput {
    let mut warnings = Warnings::new();

    let official_index = index_by_order_id(official);
    let service_index = index_by_order_id(service);

    let mut records: Vec<ReconciledRecord> =
        Vec::with_capacity(official_index.len() + service_index.len());

    for (order_id, off) in &official_index {
        let svc = service_index.get(order_id).copied();
        records.push(merge_row(order_id, Some(*off), svc));
    }

    for (order_id, svc) in &service_index {
        if !official_index.contains_key(order_id) {
            records.push(merge_row(order_id, None, Some(*svc)));
        }
    }

    for (i, r) in records.iter_mut().enumerate() {
        r.index = i + 1;
    }

    if records.is_empty() {
        warnings.push(EMPTY_RESULT_WARNING);
    }

    tracing::info!(
        "对账完成: 官方 {} 条, 客服 {} 条, 结果 {} 条",
        official_index.len(),
        service_index.len(),
        records.len()
    );

    let summary = summarize(&records);
    ReconcileOutput {
        records,
        summary,
        warnings,
    }
}
