use crate::models::{ReconciledRecord, StatusFlag, SummaryMetrics};
use std::collections::HashSet;

/// 汇总对账结果; 空结果时所有指标为0
pub fn summarize(records: &[ReconciledRecord]) -> SummaryMetrics {
    let mut summary = SummaryMetrics::default();
    let mut order_ids: HashSet<&str> = HashSet::with_capacity(records.len());

    for r in records {
        summary.total_sales += r.sales_amount;
        summary.total_cost += r.cost_amount;
        order_ids.insert(r.order_id.as_str());
        match r.status_flag {
            StatusFlag::Matched => summary.matched_count += 1,
            StatusFlag::MissingFromService => summary.missing_count += 1,
            StatusFlag::ExtraInService => summary.extra_count += 1,
        }
        if r.is_loss {
            summary.loss_count += 1;
        }
    }

    summary.total_profit = summary.total_sales - summary.total_cost;
    summary.order_count = order_ids.len();
    summary
}
