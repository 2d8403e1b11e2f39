use serde::{Deserialize, Serialize};
use std::fmt;

/// 亏损订单后缀
pub const LOSS_SUFFIX: &str = "|loss order";

/// 对账分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusFlag {
    /// 两侧都有
    Matched,
    /// 客服漏记: 仅官方有
    MissingFromService,
    /// 客服多记: 仅客服有
    ExtraInService,
}

impl StatusFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "Matched",
            Self::MissingFromService => "MissingFromService",
            Self::ExtraInService => "ExtraInService",
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 对账结果行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRecord {
    /// 从1开始的序号, 反映输出顺序
    pub index: usize,
    pub order_id: String,
    pub product_name: Option<String>,
    pub order_status: Option<String>,
    pub sales_amount: f64,
    pub cost_amount: f64,
    pub profit: f64,
    pub is_loss: bool,
    pub status_flag: StatusFlag,
    pub final_status: String,
}

/// 汇总指标
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_sales: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub order_count: usize,
    pub matched_count: usize,
    pub missing_count: usize,
    pub extra_count: usize,
    pub loss_count: usize,
}

/// 一次对账的完整输出
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub warnings: Vec<String>,
    pub summary: SummaryMetrics,
    pub rows: Vec<ReconciledRecord>,
}
