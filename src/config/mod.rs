// ==========================================
// 电商利润核算 - 配置层
// ==========================================
// 职责: 列位置 + 核算参数，边界处一次性校验
// 存储: JSON 文件（可选），缺省使用内置默认值
// ==========================================

pub mod column_layout;
pub mod config_manager;
pub mod error;
pub mod rollup_config;

// 重导出核心配置
pub use column_layout::{
    AdsColumns, BarcodeInventoryColumns, ColumnLayout, MasterColumns, SalesColumns,
    SkuInventoryColumns,
};
pub use config_manager::{default_config_path, ConfigManager, CONFIG_PATH_ENV};
pub use error::{ConfigError, ConfigResult};
pub use rollup_config::RollupConfig;
