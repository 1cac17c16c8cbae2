// ==========================================
// 电商利润核算 - 核算输出模型
// ==========================================
// 三张逻辑表 + 诊断信息，交给报表导出器
// 红线: 每次运行从零重算，不缓存
// ==========================================

use crate::domain::types::{BarcodeKey, ProductKey, SkuKey, SourceRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// SkuDetailRow - SKU 明细表
// ==========================================
// 产品级字段按产品广播到每个成员 SKU（有意冗余）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuDetailRow {
    pub sku_key: SkuKey,
    pub product_key: ProductKey,
    pub barcode_key: BarcodeKey,
    pub unit_margin: f64,
    pub unit_cost: f64,
    pub cells: Vec<Option<String>>, // 基础信息表原始列

    pub sales_units: f64,          // 合并销量
    pub sku_margin_total: f64,     // SKU 总毛利
    pub product_margin_total: f64, // 产品总毛利（广播）
    pub product_units_total: f64,  // 产品总销量（广播）
    pub product_ad_spend: f64,     // 产品总广告费（含税）
    pub product_ad_units: f64,     // 产品广告销量
    pub net_profit: f64,           // 最终净利润
    pub ad_to_margin_ratio: f64,   // 广告费/毛利
    pub organic_units: f64,        // 自然销量
    pub organic_ratio: f64,        // 自然销量占比

    pub inventory: Option<InventoryHealthRow>,
}

// ==========================================
// ProductSummaryRow - 产品汇总表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummaryRow {
    pub product_key: ProductKey,
    pub sku_count: usize,
    pub margin_total: f64,
    pub units_total: f64,
    pub ad_spend_total: f64,
    pub ad_attributed_units: f64,
    pub net_profit: f64,
    pub ad_to_margin_ratio: f64,
    pub organic_units: f64,
    pub organic_ratio: f64,
    pub inventory: Option<ProductInventorySummary>,
}

/// 产品级库存汇总（成员 SKU 求和）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInventorySummary {
    pub total_inventory: f64,
    pub safety_stock: f64,
    pub redundancy_threshold: f64,
    pub restock_quantity: f64,
    pub dead_stock_value: f64,
    pub inventory_value: f64,
    pub dead_stock_sku_count: usize,
}

// ==========================================
// InventoryHealthRow - 库存健康表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryHealthRow {
    pub sku_key: SkuKey,
    pub product_key: ProductKey,
    pub barcode_key: BarcodeKey,
    pub unit_cost: f64,
    pub sales_units: f64,
    pub inventory_by_sku: f64,
    pub inventory_by_barcode: f64,
    pub total_inventory: f64,
    pub safety_stock: f64,
    pub redundancy_threshold: f64,
    pub restock_quantity: f64,
    pub is_dead_stock: bool,
    pub dead_stock_value: f64,
    pub inventory_value: f64,
    pub status: InventoryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    Restock,   // 需补货
    DeadStock, // 滞销压库
    Healthy,   // 正常
    Inactive,  // 无销量且无库存
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryStatus::Restock => write!(f, "需补货"),
            InventoryStatus::DeadStock => write!(f, "滞销"),
            InventoryStatus::Healthy => write!(f, "正常"),
            InventoryStatus::Inactive => write!(f, "未激活"),
        }
    }
}

// ==========================================
// 诊断信息
// ==========================================

/// 广告费覆盖率
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdCoverage {
    pub total_spend: f64,
    pub resolved_spend: f64,
    pub ad_group_spend: f64,
    pub campaign_spend: f64,
    pub unresolved_spend: f64,
    pub unresolved_rows: usize,
    pub coverage_ratio: f64, // resolved / total，总额为 0 时为 0
}

/// 提取到编号但基础表中不存在的广告产品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrphanAdProduct {
    pub product_key: ProductKey,
    pub spend: f64,
    pub attributed_units: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    pub master_rows_total: usize,
    pub master_rows_without_sku: usize,
    pub duplicate_sku_keys: Vec<SkuKey>,
    pub skus_without_product: usize,
    pub duplicate_rows_dropped: BTreeMap<SourceRole, usize>,
    pub files_per_role: BTreeMap<SourceRole, usize>,
    pub ad_coverage: AdCoverage,
    pub orphan_ad_products: Vec<OrphanAdProduct>,
}

// ==========================================
// RollupReport - 单次核算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub master_headers: Vec<String>,
    pub sku_details: Vec<SkuDetailRow>,
    pub products: Vec<ProductSummaryRow>,
    pub inventory: Option<Vec<InventoryHealthRow>>,
    pub diagnostics: RunDiagnostics,
}
