// ==========================================
// 电商利润核算 - 领域模型层
// ==========================================
// 职责: 定义键类型、输入记录、汇总度量、核算输出
// 红线: 不含文件解析逻辑,不含核算逻辑
// ==========================================

pub mod measure;
pub mod record;
pub mod rollup;
pub mod types;

// 重导出核心类型
pub use measure::{AdMeasure, AdTotals, InventoryMeasure, SalesMeasure};
pub use record::{
    AdRow, BarcodeInventoryRow, RawRow, RawTable, SalesRow, SkuInventoryRow, SkuRecord,
};
pub use rollup::{
    AdCoverage, InventoryHealthRow, InventoryStatus, OrphanAdProduct, ProductInventorySummary,
    ProductSummaryRow, RollupReport, RunDiagnostics, SkuDetailRow,
};
pub use types::{AdCodeSource, BarcodeKey, MatchKey, ProductKey, SkuKey, SourceRole};
