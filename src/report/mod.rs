// ==========================================
// 电商利润核算 - 报表层
// ==========================================
// 职责: 把核算结果写成 CSV 表格与 JSON 运行摘要
// ==========================================

pub mod csv_exporter;

pub use csv_exporter::{
    CsvExporter, INVENTORY_HEALTH_FILE, PRODUCT_SUMMARY_FILE, RUN_SUMMARY_FILE, SKU_DETAIL_FILE,
};
