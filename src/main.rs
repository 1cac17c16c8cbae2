// ==========================================
// 电商利润核算 - 命令行入口
// ==========================================
// 流程: 加载配置 → 并发读取文件 → 核算 → 导出报表
// ==========================================

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use profit_rollup::config::ConfigManager;
use profit_rollup::engine::{BatchLoader, InputFiles, RollupPipeline, SourceLoader};
use profit_rollup::importer::{CsvParser, UniversalFileParser};
use profit_rollup::report::CsvExporter;
use profit_rollup::{logging, APP_NAME, VERSION};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "profit-rollup", version, about = "电商利润核算: 基础表/销售/广告/库存汇总")]
struct Cli {
    /// 基础信息表（CSV/Excel）
    #[arg(long)]
    master: PathBuf,

    /// 销售表，可重复指定
    #[arg(long, required = true)]
    sales: Vec<PathBuf>,

    /// 广告表，可重复指定
    #[arg(long, required = true)]
    ads: Vec<PathBuf>,

    /// 按 SKU 记录的库存表，可重复指定
    #[arg(long = "inventory-sku")]
    inventory_sku: Vec<PathBuf>,

    /// 按条码记录的库存表，可重复指定
    #[arg(long = "inventory-barcode")]
    inventory_barcode: Vec<PathBuf>,

    /// 配置文件（JSON）；缺省时读取 PROFIT_ROLLUP_CONFIG 或用户配置目录
    #[arg(long)]
    config: Option<PathBuf>,

    /// 报表输出目录
    #[arg(long = "out-dir", default_value = "rollup-output")]
    out_dir: PathBuf,

    /// 以 JSON 格式输出日志
    #[arg(long = "log-json", action = ArgAction::SetTrue)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    info!("{} v{}", APP_NAME, VERSION);

    let manager = ConfigManager::load(cli.config.as_deref()).context("加载配置失败")?;
    if let Some(path) = manager.loaded_from() {
        info!(config = %path.display(), "使用配置文件");
    }
    let config = manager.into_config();

    let csv = CsvParser::with_encodings(&config.csv_encodings);
    let encodings: Vec<&str> = csv.encodings().iter().map(|e| e.name()).collect();
    info!(encodings = ?encodings, "CSV 编码回退顺序");
    let parser = UniversalFileParser::new(csv);
    let loader = BatchLoader::new(Arc::new(parser));
    let inputs = loader
        .load(&InputFiles {
            master: Some(cli.master),
            sales: cli.sales,
            ads: cli.ads,
            inventory_sku: cli.inventory_sku,
            inventory_barcode: cli.inventory_barcode,
        })
        .await
        .context("读取输入文件失败")?;

    let report = RollupPipeline::try_new(&config)
        .and_then(|pipeline| pipeline.run(&inputs))
        .context("核算失败")?;

    let exporter = CsvExporter::new(&cli.out_dir);
    let written = exporter.export(&report).context("导出报表失败")?;

    let coverage = &report.diagnostics.ad_coverage;
    println!("运行编号: {}", report.run_id);
    println!(
        "SKU {} 行，产品 {} 个",
        report.sku_details.len(),
        report.products.len()
    );
    println!(
        "广告费覆盖率: {:.1}%（已匹配 {:.2} / 总计 {:.2}，未匹配 {} 行）",
        coverage.coverage_ratio * 100.0,
        coverage.resolved_spend,
        coverage.total_spend,
        coverage.unresolved_rows
    );
    if !report.diagnostics.orphan_ad_products.is_empty() {
        println!(
            "基础表中不存在的广告产品: {}",
            report
                .diagnostics
                .orphan_ad_products
                .iter()
                .map(|o| o.product_key.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    println!("输出目录: {}", exporter.out_dir().display());
    for path in written {
        println!("已写出: {}", path.display());
    }

    Ok(())
}
