use crate::models::CanonicalKey;
use thiserror::Error;

/// 对账流程错误
///
/// 数据清洗中的异常(非法订单号、金额解析失败、无效状态、重复订单号)
/// 不在此列, 它们只会以 warning 的形式返回。
#[derive(Debug, Error)]
pub enum ReconError {
    /// 映射中仍有未解析的字段, 无法进入清洗阶段
    #[error("{label}: unresolved field mapping for {}", join_keys(.missing))]
    UnresolvedMapping {
        label: String,
        missing: Vec<CanonicalKey>,
    },

    /// 比对前任意一侧映射不完整
    #[error(
        "field mapping incomplete (official missing: [{}], service missing: [{}])",
        join_keys(.official),
        join_keys(.service)
    )]
    IncompleteMappings {
        official: Vec<CanonicalKey>,
        service: Vec<CanonicalKey>,
    },

    #[error("unsupported file format: {0}")]
    UnsupportedFile(String),

    #[error("file has no header row: {0}")]
    EmptyFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

fn join_keys(keys: &[CanonicalKey]) -> String {
    keys.iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
