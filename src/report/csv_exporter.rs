// ==========================================
// 电商利润核算 - 报表导出
// ==========================================
// 输出:
//   sku_detail.csv        基础表原始列 + 派生列
//   product_summary.csv   产品汇总
//   inventory_health.csv  库存健康（有库存文件时）
//   run_summary.json      运行元数据 + 诊断
// CSV 编码: UTF-8 带 BOM（Windows Excel 按 BOM 识别 UTF-8）
// ==========================================

use crate::domain::rollup::{
    InventoryHealthRow, ProductSummaryRow, RollupReport, RunDiagnostics, SkuDetailRow,
};
use crate::engine::error::{RollupError, RollupResult};
use chrono::{DateTime, Utc};
use csv::Writer;
use serde::Serialize;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SKU_DETAIL_FILE: &str = "sku_detail.csv";
pub const PRODUCT_SUMMARY_FILE: &str = "product_summary.csv";
pub const INVENTORY_HEALTH_FILE: &str = "inventory_health.csv";
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const CSV_ENCODING: &str = "utf-8-sig";

const DETAIL_COLUMNS: &[&str] = &[
    "合并销量",
    "SKU总毛利",
    "产品总毛利",
    "产品总销量",
    "产品总广告费",
    "产品广告销量",
    "最终净利润",
    "广告费/毛利",
    "自然销量",
    "自然销量占比",
];

const DETAIL_INVENTORY_COLUMNS: &[&str] = &["总库存", "补货量", "滞销货值", "库存状态"];

const PRODUCT_COLUMNS: &[&str] = &[
    "产品编号",
    "SKU数",
    "产品总毛利",
    "产品总销量",
    "产品总广告费",
    "产品广告销量",
    "最终净利润",
    "广告费/毛利",
    "自然销量",
    "自然销量占比",
];

const PRODUCT_INVENTORY_COLUMNS: &[&str] = &[
    "总库存",
    "安全库存",
    "冗余阈值",
    "补货量",
    "滞销SKU数",
    "滞销货值",
    "库存货值",
];

const INVENTORY_COLUMNS: &[&str] = &[
    "SKU",
    "产品编号",
    "条码",
    "单件成本",
    "合并销量",
    "SKU库存",
    "条码库存",
    "总库存",
    "安全库存",
    "冗余阈值",
    "补货量",
    "是否滞销",
    "滞销货值",
    "库存货值",
    "库存状态",
];

/// 运行摘要（run_summary.json）
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    run_id: &'a str,
    generated_at: DateTime<Utc>,
    version: &'static str,
    csv_encoding: &'static str,
    sku_rows: usize,
    product_rows: usize,
    inventory_rows: Option<usize>,
    diagnostics: &'a RunDiagnostics,
}

fn export_error(path: &Path, err: impl Display) -> RollupError {
    RollupError::ExportError {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

fn num(value: f64) -> String {
    value.to_string()
}

// ==========================================
// CsvExporter - 报表导出器
// ==========================================
pub struct CsvExporter {
    out_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// 导出全部报表，返回写出的文件路径
    pub fn export(&self, report: &RollupReport) -> RollupResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.out_dir).map_err(|e| export_error(&self.out_dir, e))?;

        let with_inventory = report.inventory.is_some();
        let mut written = vec![
            self.write_sku_detail(report, with_inventory)?,
            self.write_product_summary(&report.products, with_inventory)?,
        ];
        if let Some(rows) = &report.inventory {
            written.push(self.write_inventory_health(rows)?);
        }
        written.push(self.write_run_summary(report)?);

        info!(
            out_dir = %self.out_dir.display(),
            files = written.len(),
            "报表导出完成"
        );
        Ok(written)
    }

    fn write_rows<I>(&self, file_name: &str, header: Vec<String>, rows: I) -> RollupResult<PathBuf>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let path = self.out_dir.join(file_name);
        let mut file = File::create(&path).map_err(|e| export_error(&path, e))?;
        file.write_all(UTF8_BOM).map_err(|e| export_error(&path, e))?;
        let mut writer = Writer::from_writer(file);

        writer
            .write_record(&header)
            .map_err(|e| export_error(&path, e))?;
        for row in rows {
            writer
                .write_record(&row)
                .map_err(|e| export_error(&path, e))?;
        }
        writer.flush().map_err(|e| export_error(&path, e))?;
        Ok(path)
    }

    /// SKU 明细: 基础表原始列原样回显，后接派生列
    fn write_sku_detail(&self, report: &RollupReport, with_inventory: bool) -> RollupResult<PathBuf> {
        let width = report
            .sku_details
            .iter()
            .map(|d| d.cells.len())
            .max()
            .unwrap_or(0)
            .max(report.master_headers.len());

        let mut header: Vec<String> = (0..width)
            .map(|i| match report.master_headers.get(i) {
                Some(h) if !h.is_empty() => h.clone(),
                _ => format!("列{}", i + 1),
            })
            .collect();
        header.extend(DETAIL_COLUMNS.iter().map(|c| c.to_string()));
        if with_inventory {
            header.extend(DETAIL_INVENTORY_COLUMNS.iter().map(|c| c.to_string()));
        }

        let rows = report
            .sku_details
            .iter()
            .map(|detail| Self::detail_record(detail, width, with_inventory));
        self.write_rows(SKU_DETAIL_FILE, header, rows)
    }

    fn detail_record(detail: &SkuDetailRow, width: usize, with_inventory: bool) -> Vec<String> {
        let mut record: Vec<String> = (0..width)
            .map(|i| detail.cells.get(i).cloned().flatten().unwrap_or_default())
            .collect();

        record.extend([
            num(detail.sales_units),
            num(detail.sku_margin_total),
            num(detail.product_margin_total),
            num(detail.product_units_total),
            num(detail.product_ad_spend),
            num(detail.product_ad_units),
            num(detail.net_profit),
            num(detail.ad_to_margin_ratio),
            num(detail.organic_units),
            num(detail.organic_ratio),
        ]);

        if with_inventory {
            match &detail.inventory {
                Some(inv) => record.extend([
                    num(inv.total_inventory),
                    num(inv.restock_quantity),
                    num(inv.dead_stock_value),
                    inv.status.to_string(),
                ]),
                None => record.extend(std::iter::repeat(String::new()).take(4)),
            }
        }
        record
    }

    fn write_product_summary(
        &self,
        products: &[ProductSummaryRow],
        with_inventory: bool,
    ) -> RollupResult<PathBuf> {
        let mut header: Vec<String> = PRODUCT_COLUMNS.iter().map(|c| c.to_string()).collect();
        if with_inventory {
            header.extend(PRODUCT_INVENTORY_COLUMNS.iter().map(|c| c.to_string()));
        }

        let rows = products.iter().map(|p| {
            let mut record = vec![
                p.product_key.to_string(),
                p.sku_count.to_string(),
                num(p.margin_total),
                num(p.units_total),
                num(p.ad_spend_total),
                num(p.ad_attributed_units),
                num(p.net_profit),
                num(p.ad_to_margin_ratio),
                num(p.organic_units),
                num(p.organic_ratio),
            ];
            if with_inventory {
                let inv = p.inventory.unwrap_or_default();
                record.extend([
                    num(inv.total_inventory),
                    num(inv.safety_stock),
                    num(inv.redundancy_threshold),
                    num(inv.restock_quantity),
                    inv.dead_stock_sku_count.to_string(),
                    num(inv.dead_stock_value),
                    num(inv.inventory_value),
                ]);
            }
            record
        });
        self.write_rows(PRODUCT_SUMMARY_FILE, header, rows)
    }

    fn write_inventory_health(&self, rows: &[InventoryHealthRow]) -> RollupResult<PathBuf> {
        let header = INVENTORY_COLUMNS.iter().map(|c| c.to_string()).collect();
        let records = rows.iter().map(|r| {
            vec![
                r.sku_key.to_string(),
                r.product_key.to_string(),
                r.barcode_key.to_string(),
                num(r.unit_cost),
                num(r.sales_units),
                num(r.inventory_by_sku),
                num(r.inventory_by_barcode),
                num(r.total_inventory),
                num(r.safety_stock),
                num(r.redundancy_threshold),
                num(r.restock_quantity),
                if r.is_dead_stock { "是" } else { "否" }.to_string(),
                num(r.dead_stock_value),
                num(r.inventory_value),
                r.status.to_string(),
            ]
        });
        self.write_rows(INVENTORY_HEALTH_FILE, header, records)
    }

    fn write_run_summary(&self, report: &RollupReport) -> RollupResult<PathBuf> {
        let path = self.out_dir.join(RUN_SUMMARY_FILE);
        let summary = RunSummary {
            run_id: &report.run_id,
            generated_at: report.generated_at,
            version: crate::VERSION,
            csv_encoding: CSV_ENCODING,
            sku_rows: report.sku_details.len(),
            product_rows: report.products.len(),
            inventory_rows: report.inventory.as_ref().map(Vec::len),
            diagnostics: &report.diagnostics,
        };

        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(&path, json).map_err(|e| export_error(&path, e))?;
        Ok(path)
    }
}
