// ==========================================
// 电商利润核算 - 核心库
// ==========================================
// 输入: 基础信息表 + 销售表 + 广告表 + 库存表（可选）
// 输出: SKU 明细 / 产品汇总 / 库存健康 / 运行诊断
// 系统定位: 一次性批处理（每次从零重算）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 键类型、记录、核算输出
pub mod domain;

// 配置层 - 列位置与核算参数
pub mod config;

// 导入层 - 文件解析与多文件汇总
pub mod importer;

// 核算层 - 汇总核算与库存分类
pub mod engine;

// 报表层 - CSV/JSON 导出
pub mod report;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AdCodeSource, BarcodeKey, MatchKey, ProductKey, SkuKey, SourceRole};

// 核算输出
pub use domain::{
    InventoryHealthRow, InventoryStatus, ProductSummaryRow, RollupReport, RunDiagnostics,
    SkuDetailRow,
};

// 配置
pub use config::{ConfigManager, RollupConfig};

// 引擎
pub use engine::{
    BatchLoader, InputFiles, InventoryClassifier, RollupEngine, RollupError, RollupInputs,
    RollupPipeline, RollupResult, SourceLoader,
};

// 报表
pub use report::CsvExporter;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "电商利润核算";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
