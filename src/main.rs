use clap::{Parser, Subcommand};
use order_recon_rust::io::{default_output_path, read_dataset, write_report_json, write_result_csv};
use order_recon_rust::models::CanonicalKey;
use order_recon_rust::{AppConfig, ReconcileService};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "order-recon", version, about = "官方订单与客服统计对账及利润核算")]
struct Cli {
    /// 配置文件 (默认 ./recon.toml 或 RECON_CONFIG)
    #[arg(long, global = true, env = "RECON_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 推断字段映射并以 JSON 输出
    Mapping {
        #[arg(long)]
        file: PathBuf,
    },
    /// 比对两份数据并导出结果
    Compare {
        #[arg(long)]
        official: PathBuf,
        #[arg(long)]
        service: PathBuf,
        /// 官方数据手工映射 (JSON: {"order_id": "表头", ...})
        #[arg(long)]
        official_mapping: Option<PathBuf>,
        /// 客服数据手工映射
        #[arg(long)]
        service_mapping: Option<PathBuf>,
        /// 结果 CSV, 默认写入 output.dir 下带时间戳的文件
        #[arg(long)]
        output: Option<PathBuf>,
        /// 额外输出 JSON 报告
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// 读取手工映射文件; 未知字段忽略
fn load_mapping(path: &Path) -> Result<HashMap<CanonicalKey, String>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let raw: HashMap<String, String> = serde_json::from_str(&text)?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, v)| CanonicalKey::parse(&k).map(|key| (key, v)))
        .collect())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 加载配置
    let config = AppConfig::load(cli.config.as_deref())?;

    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .init();

    info!("Loaded config: {:?}", config);
    let service = ReconcileService::new(&config);

    match cli.command {
        Command::Mapping { file } => {
            let dataset = read_dataset(&file)?;
            let report = service.inspect(&dataset);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Compare {
            official,
            service: service_file,
            official_mapping,
            service_mapping,
            output,
            report,
        } => {
            let official_data = read_dataset(&official)?;
            let service_data = read_dataset(&service_file)?;

            let official_map = official_mapping.as_deref().map(load_mapping).transpose()?;
            let service_map = service_mapping.as_deref().map(load_mapping).transpose()?;

            let result = service.compare(
                &official_data,
                &service_data,
                official_map.as_ref(),
                service_map.as_ref(),
            )?;

            for w in &result.warnings {
                println!("warning: {}", w);
            }
            println!("{}", serde_json::to_string_pretty(&result.summary)?);

            let output = output.unwrap_or_else(|| default_output_path(Path::new(&config.output.dir)));
            write_result_csv(&result.rows, &result.summary, &output)?;
            println!("result written to {}", output.display());

            if let Some(report_path) = report {
                write_report_json(&result, &report_path)?;
                info!("JSON report written to {}", report_path.display());
            }
        }
    }

    Ok(())
}
