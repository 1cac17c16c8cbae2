// ==========================================
// 电商利润核算 - 汇总度量
// ==========================================
// 用途: Source Aggregator 输出，Rollup Engine 只读
// 红线: 不可变映射；缺失键由调用方决定默认值
// ==========================================

use crate::domain::types::{AdCodeSource, BarcodeKey, ProductKey, SkuKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SalesMeasure - SKU → 合并销量
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesMeasure {
    pub units: BTreeMap<SkuKey, f64>,
}

impl SalesMeasure {
    /// 未出现的 SKU 销量为 0
    pub fn units_for(&self, sku: &SkuKey) -> f64 {
        if sku.is_empty() {
            return 0.0;
        }
        self.units.get(sku).copied().unwrap_or(0.0)
    }
}

// ==========================================
// AdMeasure - 产品 → 广告费/广告销量
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdTotals {
    pub spend: f64,            // 含税广告费
    pub attributed_units: f64, // 广告转化销量
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdMeasure {
    pub by_product: BTreeMap<ProductKey, AdTotals>,

    // 覆盖率统计（含未解析行）
    pub total_spend: f64,
    pub ad_group_spend: f64,
    pub campaign_spend: f64,
    pub unresolved_spend: f64,
    pub unresolved_rows: usize,
}

impl AdMeasure {
    pub fn totals_for(&self, product: &ProductKey) -> AdTotals {
        if product.is_empty() {
            return AdTotals::default();
        }
        self.by_product.get(product).copied().unwrap_or_default()
    }

    pub fn resolved_spend(&self) -> f64 {
        self.ad_group_spend + self.campaign_spend
    }

    pub(crate) fn record_resolved_spend(&mut self, source: AdCodeSource, spend: f64) {
        match source {
            AdCodeSource::AdGroup => self.ad_group_spend += spend,
            AdCodeSource::Campaign => self.campaign_spend += spend,
        }
    }
}

// ==========================================
// InventoryMeasure - 两套标识的库存
// ==========================================
// 两个映射独立汇总、独立关联，由 InventoryCombiner 合并
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryMeasure {
    pub by_sku: BTreeMap<SkuKey, f64>,
    pub by_barcode: BTreeMap<BarcodeKey, f64>,
}

impl InventoryMeasure {
    pub fn quantity_for_sku(&self, sku: &SkuKey) -> f64 {
        if sku.is_empty() {
            return 0.0;
        }
        self.by_sku.get(sku).copied().unwrap_or(0.0)
    }

    pub fn quantity_for_barcode(&self, barcode: &BarcodeKey) -> f64 {
        if barcode.is_empty() {
            return 0.0;
        }
        self.by_barcode.get(barcode).copied().unwrap_or(0.0)
    }
}
