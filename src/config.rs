use crate::error::ReconError;
use crate::models::CanonicalKey;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "recon.toml";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub mapping: MappingConfig,
    pub cleaning: CleaningConfig,
    pub labels: LabelConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    pub aliases: FieldAliases,
}

/// 每个标准字段的别名列表, 顺序即优先级
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAliases {
    pub order_id: Vec<String>,
    pub product_name: Vec<String>,
    pub order_status: Vec<String>,
    pub sales_amount: Vec<String>,
    pub cost_amount: Vec<String>,
}

impl FieldAliases {
    pub fn for_key(&self, key: CanonicalKey) -> &[String] {
        match key {
            CanonicalKey::OrderId => &self.order_id,
            CanonicalKey::ProductName => &self.product_name,
            CanonicalKey::OrderStatus => &self.order_status,
            CanonicalKey::SalesAmount => &self.sales_amount,
            CanonicalKey::CostAmount => &self.cost_amount,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            order_id: strings(&["订单编号", "订单号", "子订单号", "单号", "order id", "order_no", "order_id"]),
            product_name: strings(&["商品名称", "产品", "商品", "product", "item name", "product_name"]),
            order_status: strings(&["订单状态", "状态", "status", "交易状态", "order_status"]),
            sales_amount: strings(&["实付金额", "销售金额", "金额", "应收", "paid", "sales", "sales_amount"]),
            cost_amount: strings(&["成本价", "进货价", "成本", "cost", "purchase", "cost_amount"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// 有效订单状态, 其余状态的订单会被过滤
    pub valid_statuses: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            valid_statuses: strings(&["交易成功", "已发货"]),
        }
    }
}

/// 数据来源标签, 仅用于告警文本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    pub official: String,
    pub service: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            official: "official orders".to_string(),
            service: "service records".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "output".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 -> 配置文件(可选) -> 环境变量 (RECON_<SECTION>__<KEY>)
    ///
    /// 未显式指定文件时, 依次尝试 RECON_CONFIG 和 ./recon.toml。
    pub fn load(path: Option<&Path>) -> Result<Self, ReconError> {
        Self::load_with_env(path, None)
    }

    /// env 为 None 时读取进程环境变量, 否则只使用给定的键值
    fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ReconError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => {
                let name = std::env::var("RECON_CONFIG")
                    .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
                config::File::with_name(&name).required(false)
            }
        };

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("RECON")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
