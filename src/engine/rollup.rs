// ==========================================
// 电商利润核算 - 汇总核算引擎
// ==========================================
// 流程:
// 1. SKU 左连接销量（缺失 → 0）
// 2. SKU 总毛利 = 单件毛利 × 销量
// 3. 按产品求和并广播回每个 SKU（产品总毛利 / 产品总销量）
// 4. 产品左连接广告（缺失 → 0）
// 5. 净利润 = 产品总毛利 − 产品广告费
// 6. 比率分母为 0 时取 0
// ==========================================
// 红线: 无状态引擎,所有方法都是纯函数
// 红线: 产品级数值是成员 SKU 的严格求和，不独立计算
// ==========================================

use crate::domain::measure::{AdMeasure, AdTotals, SalesMeasure};
use crate::domain::record::SkuRecord;
use crate::domain::rollup::{ProductSummaryRow, SkuDetailRow};
use crate::domain::types::ProductKey;
use std::collections::BTreeMap;
use tracing::debug;

/// 除法保护: 分母为 0 时比率定义为 0
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// 核算输出: SKU 明细 + 产品汇总
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollupOutput {
    pub sku_details: Vec<SkuDetailRow>,
    pub products: Vec<ProductSummaryRow>,
}

#[derive(Debug, Clone, Copy, Default)]
struct ProductAccumulator {
    sku_count: usize,
    margin_total: f64,
    units_total: f64,
}

/// 产品级派生指标
#[derive(Debug, Clone, Copy, PartialEq)]
struct ProductMetrics {
    margin_total: f64,
    units_total: f64,
    ads: AdTotals,
    net_profit: f64,
    ad_to_margin_ratio: f64,
    organic_units: f64,
    organic_ratio: f64,
}

impl ProductMetrics {
    fn derive(margin_total: f64, units_total: f64, ads: AdTotals) -> Self {
        let organic_units = units_total - ads.attributed_units;
        Self {
            margin_total,
            units_total,
            ads,
            net_profit: margin_total - ads.spend,
            ad_to_margin_ratio: safe_ratio(ads.spend, margin_total),
            organic_units,
            organic_ratio: safe_ratio(organic_units, units_total),
        }
    }
}

// ==========================================
// RollupEngine - 汇总核算引擎
// ==========================================
pub struct RollupEngine;

impl Default for RollupEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RollupEngine {
    pub fn new() -> Self {
        Self
    }

    /// 执行核算
    ///
    /// # 参数
    /// - `skus`: 基础信息表记录（SKU 键唯一）
    /// - `sales`: 合并销量
    /// - `ads`: 产品广告汇总
    ///
    /// # 返回
    /// SKU 明细按产品编号稳定排序（同产品内保持基础表顺序，无产品编号的排在最后）；
    /// 产品汇总每个非空产品编号一行，按编号排序
    pub fn compute(
        &self,
        skus: &[SkuRecord],
        sales: &SalesMeasure,
        ads: &AdMeasure,
    ) -> RollupOutput {
        // === 步骤 1-2: SKU 级销量与毛利 ===
        let sku_level: Vec<(&SkuRecord, f64, f64)> = skus
            .iter()
            .map(|sku| {
                let units = sales.units_for(&sku.sku_key);
                (sku, units, sku.unit_margin * units)
            })
            .collect();

        // === 步骤 3-4: 按产品分组求和 ===
        let groups = self.group_by_product(&sku_level);
        debug!(products = groups.len(), "产品分组完成");

        // === 步骤 5-7: 广播产品级指标 ===
        let mut sku_details: Vec<SkuDetailRow> = sku_level
            .iter()
            .map(|(sku, units, sku_margin)| {
                let metrics = match groups.get(&sku.product_key) {
                    Some(acc) if !sku.product_key.is_empty() => ProductMetrics::derive(
                        acc.margin_total,
                        acc.units_total,
                        ads.totals_for(&sku.product_key),
                    ),
                    // 无产品编号: 自成一组，不关联广告
                    _ => ProductMetrics::derive(*sku_margin, *units, AdTotals::default()),
                };
                Self::detail_row(sku, *units, *sku_margin, &metrics)
            })
            .collect();

        sku_details.sort_by(|a, b| {
            (a.product_key.is_empty(), &a.product_key)
                .cmp(&(b.product_key.is_empty(), &b.product_key))
        });

        let products = groups
            .iter()
            .map(|(product_key, acc)| {
                let metrics = ProductMetrics::derive(
                    acc.margin_total,
                    acc.units_total,
                    ads.totals_for(product_key),
                );
                ProductSummaryRow {
                    product_key: product_key.clone(),
                    sku_count: acc.sku_count,
                    margin_total: metrics.margin_total,
                    units_total: metrics.units_total,
                    ad_spend_total: metrics.ads.spend,
                    ad_attributed_units: metrics.ads.attributed_units,
                    net_profit: metrics.net_profit,
                    ad_to_margin_ratio: metrics.ad_to_margin_ratio,
                    organic_units: metrics.organic_units,
                    organic_ratio: metrics.organic_ratio,
                    inventory: None,
                }
            })
            .collect();

        RollupOutput {
            sku_details,
            products,
        }
    }

    /// 按产品编号求和（空编号不参与分组）
    fn group_by_product(
        &self,
        sku_level: &[(&SkuRecord, f64, f64)],
    ) -> BTreeMap<ProductKey, ProductAccumulator> {
        sku_level
            .iter()
            .filter(|(sku, _, _)| !sku.product_key.is_empty())
            .fold(BTreeMap::new(), |mut acc, (sku, units, margin)| {
                let entry: &mut ProductAccumulator =
                    acc.entry(sku.product_key.clone()).or_default();
                entry.sku_count += 1;
                entry.margin_total += margin;
                entry.units_total += units;
                acc
            })
    }

    fn detail_row(
        sku: &SkuRecord,
        units: f64,
        sku_margin: f64,
        metrics: &ProductMetrics,
    ) -> SkuDetailRow {
        SkuDetailRow {
            sku_key: sku.sku_key.clone(),
            product_key: sku.product_key.clone(),
            barcode_key: sku.barcode_key.clone(),
            unit_margin: sku.unit_margin,
            unit_cost: sku.unit_cost,
            cells: sku.row.cells.clone(),
            sales_units: units,
            sku_margin_total: sku_margin,
            product_margin_total: metrics.margin_total,
            product_units_total: metrics.units_total,
            product_ad_spend: metrics.ads.spend,
            product_ad_units: metrics.ads.attributed_units,
            net_profit: metrics.net_profit,
            ad_to_margin_ratio: metrics.ad_to_margin_ratio,
            organic_units: metrics.organic_units,
            organic_ratio: metrics.organic_ratio,
            inventory: None,
        }
    }
}
