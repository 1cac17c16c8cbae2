// ==========================================
// 电商利润核算 - 核算编排器
// ==========================================
// 用途: 协调导入、汇总、核算、库存分类的执行顺序
// 流程: 基础表 → 销售/广告/库存汇总 → 汇总核算 → 库存分类 → 诊断
// 红线: 每次运行从零重算，相同输入得到相同表格
// ==========================================

use crate::config::RollupConfig;
use crate::domain::measure::AdMeasure;
use crate::domain::record::RawTable;
use crate::domain::rollup::{AdCoverage, OrphanAdProduct, RollupReport, RunDiagnostics};
use crate::domain::types::{ProductKey, SourceRole};
use crate::engine::error::RollupResult;
use crate::engine::inventory::InventoryClassifier;
use crate::engine::rollup::{safe_ratio, RollupEngine};
use crate::importer::error::ImportError;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::master_loader::load_master;
use crate::importer::source_aggregator::{aggregate_ads, aggregate_inventory, aggregate_sales};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// RollupInputs - 已解析的输入表
// ==========================================
// 每个角色可有多个文件；基础表只有一个
#[derive(Debug, Clone, Default)]
pub struct RollupInputs {
    pub master: Option<RawTable>,
    pub sales: Vec<RawTable>,
    pub ads: Vec<RawTable>,
    pub inventory_sku: Vec<RawTable>,
    pub inventory_barcode: Vec<RawTable>,
}

impl RollupInputs {
    /// 是否提供了任一库存文件（决定是否执行库存分类）
    pub fn has_inventory(&self) -> bool {
        !self.inventory_sku.is_empty() || !self.inventory_barcode.is_empty()
    }

    pub fn files_per_role(&self) -> BTreeMap<SourceRole, usize> {
        BTreeMap::from([
            (SourceRole::Master, usize::from(self.master.is_some())),
            (SourceRole::Sales, self.sales.len()),
            (SourceRole::Ads, self.ads.len()),
            (SourceRole::InventorySku, self.inventory_sku.len()),
            (SourceRole::InventoryBarcode, self.inventory_barcode.len()),
        ])
    }
}

// ==========================================
// RollupPipeline - 核算编排器
// ==========================================
pub struct RollupPipeline {
    mapper: FieldMapper,
    engine: RollupEngine,
    classifier: InventoryClassifier,
}

impl RollupPipeline {
    /// 创建编排器（配置应已通过校验）
    pub fn new(config: &RollupConfig) -> Self {
        Self::with_classifier(config, InventoryClassifier::new(config))
    }

    /// 校验配置后创建编排器（配置来自代码而非 ConfigManager 时使用）
    pub fn try_new(config: &RollupConfig) -> RollupResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// 使用自定义库存分类器（例如替换库存合并策略）
    pub fn with_classifier(config: &RollupConfig, classifier: InventoryClassifier) -> Self {
        Self {
            mapper: FieldMapper::new(config.columns, config.ad_tax_markup),
            engine: RollupEngine::new(),
            classifier,
        }
    }

    /// 执行完整核算
    ///
    /// # 返回
    /// - Ok(RollupReport): 明细表、产品汇总、库存健康（有库存文件时）、诊断
    /// - Err: 缺少必需数据源、列数不足、基础表无有效 SKU
    #[instrument(skip(self, inputs), fields(run_id))]
    pub fn run(&self, inputs: &RollupInputs) -> RollupResult<RollupReport> {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());

        let master = inputs
            .master
            .as_ref()
            .ok_or(ImportError::MissingSource(SourceRole::Master))?;
        if inputs.sales.is_empty() {
            return Err(ImportError::MissingSource(SourceRole::Sales).into());
        }
        if inputs.ads.is_empty() {
            return Err(ImportError::MissingSource(SourceRole::Ads).into());
        }

        let with_inventory = inputs.has_inventory();
        info!(
            sales_files = inputs.sales.len(),
            ads_files = inputs.ads.len(),
            with_inventory,
            "开始核算"
        );

        // ==========================================
        // 步骤1: 基础信息表
        // ==========================================
        let catalog = load_master(&self.mapper, master, with_inventory)?;

        // ==========================================
        // 步骤2: 多文件汇总
        // ==========================================
        let sales = aggregate_sales(&self.mapper, &inputs.sales)?;
        let ads = aggregate_ads(&self.mapper, &inputs.ads)?;
        let inventory = if with_inventory {
            Some(aggregate_inventory(
                &self.mapper,
                &inputs.inventory_sku,
                &inputs.inventory_barcode,
            )?)
        } else {
            None
        };

        // ==========================================
        // 步骤3: 汇总核算
        // ==========================================
        let mut output = self
            .engine
            .compute(&catalog.records, &sales.measure, &ads.measure);
        debug!(
            sku_rows = output.sku_details.len(),
            products = output.products.len(),
            "汇总核算完成"
        );

        // ==========================================
        // 步骤4: 库存分类（仅当提供库存文件）
        // ==========================================
        let inventory_rows = inventory.as_ref().map(|agg| {
            let rows = self.classifier.classify(&output, &agg.measure);
            self.classifier.attach(&mut output, &rows);
            rows
        });

        // ==========================================
        // 步骤5: 诊断
        // ==========================================
        let master_products: BTreeSet<&ProductKey> = catalog
            .records
            .iter()
            .map(|r| &r.product_key)
            .filter(|k| !k.is_empty())
            .collect();

        let mut duplicate_rows_dropped = BTreeMap::from([
            (SourceRole::Sales, sales.duplicates_dropped),
            (SourceRole::Ads, ads.duplicates_dropped),
        ]);
        if let Some(agg) = &inventory {
            duplicate_rows_dropped.insert(SourceRole::InventorySku, agg.sku_duplicates_dropped);
            duplicate_rows_dropped.insert(
                SourceRole::InventoryBarcode,
                agg.barcode_duplicates_dropped,
            );
        }

        let diagnostics = RunDiagnostics {
            master_rows_total: catalog.rows_total,
            master_rows_without_sku: catalog.rows_without_sku,
            duplicate_sku_keys: catalog.duplicate_sku_keys.clone(),
            skus_without_product: catalog
                .records
                .iter()
                .filter(|r| r.product_key.is_empty())
                .count(),
            duplicate_rows_dropped,
            files_per_role: inputs.files_per_role(),
            ad_coverage: ad_coverage(&ads.measure),
            orphan_ad_products: orphan_ad_products(&ads.measure, &master_products),
        };
        report_diagnostics(&diagnostics);

        Ok(RollupReport {
            run_id,
            generated_at: Utc::now(),
            master_headers: catalog.headers,
            sku_details: output.sku_details,
            products: output.products,
            inventory: inventory_rows,
            diagnostics,
        })
    }
}

/// 广告费覆盖率
pub fn ad_coverage(ads: &AdMeasure) -> AdCoverage {
    let resolved_spend = ads.resolved_spend();
    AdCoverage {
        total_spend: ads.total_spend,
        resolved_spend,
        ad_group_spend: ads.ad_group_spend,
        campaign_spend: ads.campaign_spend,
        unresolved_spend: ads.unresolved_spend,
        unresolved_rows: ads.unresolved_rows,
        coverage_ratio: safe_ratio(resolved_spend, ads.total_spend),
    }
}

/// 广告中出现、基础表中不存在的产品编号（其花费不进入任何净利润）
pub fn orphan_ad_products(
    ads: &AdMeasure,
    master_products: &BTreeSet<&ProductKey>,
) -> Vec<OrphanAdProduct> {
    ads.by_product
        .iter()
        .filter(|(key, _)| !master_products.contains(key))
        .map(|(key, totals)| OrphanAdProduct {
            product_key: key.clone(),
            spend: totals.spend,
            attributed_units: totals.attributed_units,
        })
        .collect()
}

fn report_diagnostics(diagnostics: &RunDiagnostics) {
    let coverage = &diagnostics.ad_coverage;
    if coverage.unresolved_rows > 0 {
        warn!(
            unresolved_rows = coverage.unresolved_rows,
            "广告费未匹配 {:.2} / {:.2}，覆盖率 {:.1}%",
            coverage.unresolved_spend,
            coverage.total_spend,
            coverage.coverage_ratio * 100.0
        );
    }

    if !diagnostics.orphan_ad_products.is_empty() {
        let orphan_spend: f64 = diagnostics
            .orphan_ad_products
            .iter()
            .map(|o| o.spend)
            .sum();
        warn!(
            products = diagnostics.orphan_ad_products.len(),
            spend = orphan_spend,
            "广告产品编号在基础信息表中不存在"
        );
    }

    if diagnostics.skus_without_product > 0 {
        warn!(
            skus = diagnostics.skus_without_product,
            "部分 SKU 缺少产品编号，按单 SKU 核算且不分摊广告费"
        );
    }

    info!(
        coverage = format!("{:.1}%", coverage.coverage_ratio * 100.0),
        duplicate_skus = diagnostics.duplicate_sku_keys.len(),
        "核算完成"
    );
}
