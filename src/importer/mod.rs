// ==========================================
// 电商利润核算 - 导入层
// ==========================================
// 职责: 外部文件 → 原始表 → 规范化键 → 汇总度量
// 支持: Excel, CSV（多编码回退）
// ==========================================

// 模块声明
pub mod code_extractor;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod master_loader;
pub mod source_aggregator;
pub mod table_parser_trait;

// 重导出核心类型
pub use code_extractor::{extract_product_code, resolve_ad_product};
pub use data_cleaner::{barcode_key, coerce_number, normalize_key, product_key, sku_key};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use master_loader::{load_master, MasterCatalog};
pub use source_aggregator::{
    aggregate_ads, aggregate_inventory, aggregate_sales, Aggregated, InventoryAggregate,
};

// 重导出 Trait 接口
pub use table_parser_trait::TableParser;
