use crate::error::ReconError;
use crate::models::{ReconcileReport, ReconciledRecord, SummaryMetrics};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const RESULT_HEADERS: [&str; 8] = [
    "index",
    "order_id",
    "product_name",
    "sales_amount",
    "cost_amount",
    "profit",
    "final_status",
    "is_loss",
];

fn money(v: f64) -> String {
    format!("{:.2}", v)
}

/// 结果行 + 空行 + 汇总行
///
/// CSV 无法着色, 亏损行通过 is_loss 列和状态后缀区分。
pub fn export_result_csv<W: Write>(
    records: &[ReconciledRecord],
    summary: &SummaryMetrics,
    out: W,
) -> Result<(), ReconError> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);

    writer.write_record(RESULT_HEADERS)?;
    for r in records {
        writer.write_record(&[
            r.index.to_string(),
            r.order_id.clone(),
            r.product_name.clone().unwrap_or_default(),
            money(r.sales_amount),
            money(r.cost_amount),
            money(r.profit),
            r.final_status.clone(),
            r.is_loss.to_string(),
        ])?;
    }

    writer.write_record([""])?;
    writer.write_record(&[
        "summary".to_string(),
        format!("total_sales: {}", money(summary.total_sales)),
        format!("total_cost: {}", money(summary.total_cost)),
        format!("total_profit: {}", money(summary.total_profit)),
        format!("loss_count: {}", summary.loss_count),
        format!("order_count: {}", summary.order_count),
    ])?;

    writer.flush()?;
    Ok(())
}

/// 导出对账结果到 CSV 文件
pub fn write_result_csv(
    records: &[ReconciledRecord],
    summary: &SummaryMetrics,
    output_path: &Path,
) -> Result<(), ReconError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(output_path)?;
    export_result_csv(records, summary, file)?;
    tracing::info!("结果已导出: {} ({} 行)", output_path.display(), records.len());
    Ok(())
}

/// 导出完整报告 (warnings + summary + rows) 为 JSON
pub fn write_report_json(report: &ReconcileReport, output_path: &Path) -> Result<(), ReconError> {
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

/// 默认输出文件名, 带本地时间戳
pub fn default_output_path(dir: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("reconciliation_{}.csv", stamp))
}
