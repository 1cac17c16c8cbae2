// ==========================================
// 电商利润核算 - 库存健康分类
// ==========================================
// 规则:
//   总库存   = SKU 库存 + 条码库存（可替换的合并策略）
//   安全库存 = 销量 × 3
//   冗余阈值 = 销量 × 8
//   补货量   = max(0, 安全库存 − 总库存)
//   滞销     = 总库存 ≥ 冗余阈值，且二者不同时为 0
//   货值     = 总库存 × 单件成本 × 1.2
// ==========================================

use crate::config::RollupConfig;
use crate::domain::measure::InventoryMeasure;
use crate::domain::rollup::{InventoryHealthRow, InventoryStatus, ProductInventorySummary};
use crate::domain::types::{BarcodeKey, ProductKey, SkuKey};
use crate::engine::rollup::RollupOutput;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// 单个 SKU 的库存读数
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StockLevel {
    pub by_sku: f64,
    pub by_barcode: f64,
    pub total: f64,
}

// ==========================================
// InventoryCombiner Trait
// ==========================================
// 两套标识的库存如何合并成总库存
// 实现者: AdditiveCombiner
pub trait InventoryCombiner: Send + Sync {
    fn combine(&self, sku: &SkuKey, barcode: &BarcodeKey, inventory: &InventoryMeasure)
        -> StockLevel;
}

/// 直接相加（同一实物在两个源中都出现时会重复计数）
#[derive(Debug, Clone, Copy, Default)]
pub struct AdditiveCombiner;

impl InventoryCombiner for AdditiveCombiner {
    fn combine(
        &self,
        sku: &SkuKey,
        barcode: &BarcodeKey,
        inventory: &InventoryMeasure,
    ) -> StockLevel {
        let by_sku = inventory.quantity_for_sku(sku);
        let by_barcode = inventory.quantity_for_barcode(barcode);
        StockLevel {
            by_sku,
            by_barcode,
            total: by_sku + by_barcode,
        }
    }
}

/// 纯数值分类结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockAssessment {
    pub safety_stock: f64,
    pub redundancy_threshold: f64,
    pub restock_quantity: f64,
    pub is_dead_stock: bool,
    pub dead_stock_value: f64,
    pub inventory_value: f64,
    pub status: InventoryStatus,
}

// ==========================================
// InventoryClassifier - 库存健康分类器
// ==========================================
pub struct InventoryClassifier {
    safety_multiplier: f64,
    redundancy_multiplier: f64,
    landed_cost_markup: f64,
    combiner: Box<dyn InventoryCombiner>,
}

impl InventoryClassifier {
    pub fn new(config: &RollupConfig) -> Self {
        Self::with_combiner(config, Box::new(AdditiveCombiner))
    }

    pub fn with_combiner(config: &RollupConfig, combiner: Box<dyn InventoryCombiner>) -> Self {
        Self {
            safety_multiplier: config.safety_stock_multiplier,
            redundancy_multiplier: config.redundancy_multiplier,
            landed_cost_markup: config.landed_cost_markup,
            combiner,
        }
    }

    /// 根据销量、总库存、成本计算阈值与状态
    pub fn assess(&self, sales_units: f64, total_inventory: f64, unit_cost: f64) -> StockAssessment {
        let safety_stock = sales_units * self.safety_multiplier;
        let redundancy_threshold = sales_units * self.redundancy_multiplier;
        let restock_quantity = (safety_stock - total_inventory).max(0.0);

        // 销量与库存均为 0 时不算滞销
        let dormant = total_inventory == 0.0 && redundancy_threshold == 0.0;
        let is_dead_stock = !dormant && total_inventory >= redundancy_threshold;

        let inventory_value = total_inventory * unit_cost * self.landed_cost_markup;
        let dead_stock_value = if is_dead_stock { inventory_value } else { 0.0 };

        let status = if is_dead_stock {
            InventoryStatus::DeadStock
        } else if restock_quantity > 0.0 {
            InventoryStatus::Restock
        } else if dormant {
            InventoryStatus::Inactive
        } else {
            InventoryStatus::Healthy
        };

        StockAssessment {
            safety_stock,
            redundancy_threshold,
            restock_quantity,
            is_dead_stock,
            dead_stock_value,
            inventory_value,
            status,
        }
    }

    /// 对核算输出中的每个 SKU 分类（顺序与 SKU 明细一致）
    pub fn classify(
        &self,
        output: &RollupOutput,
        inventory: &InventoryMeasure,
    ) -> Vec<InventoryHealthRow> {
        let rows: Vec<InventoryHealthRow> = output
            .sku_details
            .iter()
            .map(|detail| {
                let stock = self
                    .combiner
                    .combine(&detail.sku_key, &detail.barcode_key, inventory);
                let assessment = self.assess(detail.sales_units, stock.total, detail.unit_cost);

                InventoryHealthRow {
                    sku_key: detail.sku_key.clone(),
                    product_key: detail.product_key.clone(),
                    barcode_key: detail.barcode_key.clone(),
                    unit_cost: detail.unit_cost,
                    sales_units: detail.sales_units,
                    inventory_by_sku: stock.by_sku,
                    inventory_by_barcode: stock.by_barcode,
                    total_inventory: stock.total,
                    safety_stock: assessment.safety_stock,
                    redundancy_threshold: assessment.redundancy_threshold,
                    restock_quantity: assessment.restock_quantity,
                    is_dead_stock: assessment.is_dead_stock,
                    dead_stock_value: assessment.dead_stock_value,
                    inventory_value: assessment.inventory_value,
                    status: assessment.status,
                }
            })
            .collect();

        let dead = rows.iter().filter(|r| r.is_dead_stock).count();
        let restock = rows
            .iter()
            .filter(|r| r.status == InventoryStatus::Restock)
            .count();
        info!(skus = rows.len(), dead_stock = dead, restock, "库存分类完成");

        rows
    }

    /// 把分类结果挂回 SKU 明细，并按产品求和
    pub fn attach(&self, output: &mut RollupOutput, rows: &[InventoryHealthRow]) {
        let by_sku: HashMap<&SkuKey, &InventoryHealthRow> =
            rows.iter().map(|r| (&r.sku_key, r)).collect();

        for detail in output.sku_details.iter_mut() {
            detail.inventory = by_sku.get(&detail.sku_key).map(|r| (*r).clone());
        }

        let summaries = summarize_by_product(rows);
        for product in output.products.iter_mut() {
            product.inventory = Some(
                summaries
                    .get(&product.product_key)
                    .copied()
                    .unwrap_or_default(),
            );
        }
        debug!(products = summaries.len(), "产品库存汇总完成");
    }
}

/// 产品级库存 = 成员 SKU 求和（空产品编号不参与）
pub fn summarize_by_product(
    rows: &[InventoryHealthRow],
) -> BTreeMap<ProductKey, ProductInventorySummary> {
    rows.iter()
        .filter(|r| !r.product_key.is_empty())
        .fold(BTreeMap::new(), |mut acc, row| {
            let entry: &mut ProductInventorySummary =
                acc.entry(row.product_key.clone()).or_default();
            entry.total_inventory += row.total_inventory;
            entry.safety_stock += row.safety_stock;
            entry.redundancy_threshold += row.redundancy_threshold;
            entry.restock_quantity += row.restock_quantity;
            entry.dead_stock_value += row.dead_stock_value;
            entry.inventory_value += row.inventory_value;
            if row.is_dead_stock {
                entry.dead_stock_sku_count += 1;
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::data_cleaner::{barcode_key, sku_key};

    fn classifier() -> InventoryClassifier {
        InventoryClassifier::new(&RollupConfig::default())
    }

    #[test]
    fn test_zero_sales_positive_stock_is_dead() {
        let a = classifier().assess(0.0, 5.0, 10.0);
        assert!(a.is_dead_stock);
        assert_eq!(a.status, InventoryStatus::DeadStock);
        assert_eq!(a.restock_quantity, 0.0);
        assert!((a.dead_stock_value - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sales_zero_stock_is_inactive() {
        let a = classifier().assess(0.0, 0.0, 10.0);
        assert!(!a.is_dead_stock);
        assert_eq!(a.status, InventoryStatus::Inactive);
        assert_eq!(a.dead_stock_value, 0.0);
    }

    #[test]
    fn test_restock_when_below_safety() {
        let a = classifier().assess(10.0, 12.0, 2.0);
        assert_eq!(a.safety_stock, 30.0);
        assert_eq!(a.redundancy_threshold, 80.0);
        assert_eq!(a.restock_quantity, 18.0);
        assert!(!a.is_dead_stock);
        assert_eq!(a.status, InventoryStatus::Restock);
        assert!((a.inventory_value - 28.8).abs() < 1e-9);
    }

    #[test]
    fn test_dead_stock_at_threshold() {
        let a = classifier().assess(10.0, 80.0, 1.0);
        assert!(a.is_dead_stock);
        assert!((a.dead_stock_value - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_healthy_between_thresholds() {
        let a = classifier().assess(10.0, 50.0, 1.0);
        assert_eq!(a.status, InventoryStatus::Healthy);
        assert_eq!(a.restock_quantity, 0.0);
        assert_eq!(a.dead_stock_value, 0.0);
    }

    #[test]
    fn test_additive_combiner_sums_both_sources() {
        let mut measure = InventoryMeasure::default();
        measure.by_sku.insert(sku_key(Some("S1")), 4.0);
        measure.by_barcode.insert(barcode_key(Some("880123")), 6.0);

        let level = AdditiveCombiner.combine(
            &sku_key(Some("S1")),
            &barcode_key(Some("880123")),
            &measure,
        );
        assert_eq!(level.by_sku, 4.0);
        assert_eq!(level.by_barcode, 6.0);
        assert_eq!(level.total, 10.0);

        let missing = AdditiveCombiner.combine(&sku_key(None), &barcode_key(None), &measure);
        assert_eq!(missing.total, 0.0);
    }

    struct SkuOnlyCombiner;

    impl InventoryCombiner for SkuOnlyCombiner {
        fn combine(
            &self,
            sku: &SkuKey,
            _barcode: &BarcodeKey,
            inventory: &InventoryMeasure,
        ) -> StockLevel {
            let by_sku = inventory.quantity_for_sku(sku);
            StockLevel {
                by_sku,
                by_barcode: 0.0,
                total: by_sku,
            }
        }
    }

    #[test]
    fn test_custom_combiner_replaces_additive() {
        use crate::domain::rollup::SkuDetailRow;

        let mut measure = InventoryMeasure::default();
        measure.by_sku.insert(sku_key(Some("S1")), 4.0);
        measure.by_barcode.insert(barcode_key(Some("B1")), 100.0);

        let detail = SkuDetailRow {
            sku_key: sku_key(Some("S1")),
            product_key: crate::importer::data_cleaner::product_key(Some("C1")),
            barcode_key: barcode_key(Some("B1")),
            unit_margin: 1.0,
            unit_cost: 1.0,
            cells: Vec::new(),
            sales_units: 1.0,
            sku_margin_total: 1.0,
            product_margin_total: 1.0,
            product_units_total: 1.0,
            product_ad_spend: 0.0,
            product_ad_units: 0.0,
            net_profit: 1.0,
            ad_to_margin_ratio: 0.0,
            organic_units: 1.0,
            organic_ratio: 1.0,
            inventory: None,
        };
        let output = RollupOutput {
            sku_details: vec![detail],
            products: Vec::new(),
        };

        let classifier =
            InventoryClassifier::with_combiner(&RollupConfig::default(), Box::new(SkuOnlyCombiner));
        let rows = classifier.classify(&output, &measure);
        assert_eq!(rows[0].total_inventory, 4.0);
        assert_eq!(rows[0].status, InventoryStatus::Healthy);
    }
}
