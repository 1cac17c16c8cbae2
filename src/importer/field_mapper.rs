// ==========================================
// 电商利润核算 - 字段映射器
// ==========================================
// 职责: 原始行（列位置） → 角色行 + 类型转换
// 红线: 列位置一律来自 ColumnLayout
// ==========================================

use crate::config::column_layout::ColumnLayout;
use crate::domain::record::{
    AdRow, BarcodeInventoryRow, RawRow, RawTable, SalesRow, SkuInventoryRow, SkuRecord,
};
use crate::domain::types::SourceRole;
use crate::importer::code_extractor::resolve_ad_product;
use crate::importer::data_cleaner::{barcode_key, coerce_number, product_key, sku_key};
use crate::importer::error::{ImportError, ImportResult};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FieldMapper {
    columns: ColumnLayout,
    ad_tax_markup: f64,
}

impl FieldMapper {
    pub fn new(columns: ColumnLayout, ad_tax_markup: f64) -> Self {
        Self {
            columns,
            ad_tax_markup,
        }
    }

    /// 输入形状校验: 表宽度必须覆盖该角色的全部必需列
    ///
    /// 无数据行的表跳过校验（没有可误读的数据）
    pub fn ensure_columns(
        &self,
        role: SourceRole,
        table: &RawTable,
        with_inventory: bool,
    ) -> ImportResult<()> {
        if table.rows.is_empty() {
            debug!(role = %role, source = %table.source, "空表，跳过列数校验");
            return Ok(());
        }

        let width = table.width();
        for (field, index) in self.columns.required_fields(role, with_inventory) {
            if index >= width {
                return Err(ImportError::ColumnOutOfRange {
                    role,
                    file: table.source.clone(),
                    field,
                    index,
                    width,
                });
            }
        }
        Ok(())
    }

    /// 基础信息表行 → SkuRecord
    pub fn map_master_row(&self, row: &RawRow, row_number: usize) -> SkuRecord {
        let c = &self.columns.master;
        SkuRecord {
            sku_key: sku_key(row.cell(c.sku_id)),
            product_key: product_key(row.cell(c.product_code)),
            barcode_key: barcode_key(row.cell(c.barcode)),
            unit_margin: coerce_number(row.cell(c.unit_margin)),
            unit_cost: coerce_number(row.cell(c.unit_cost)),
            row: row.clone(),
            row_number,
        }
    }

    pub fn map_sales_row(&self, row: &RawRow) -> SalesRow {
        let c = &self.columns.sales;
        SalesRow {
            sku_key: sku_key(row.cell(c.sku_id)),
            units: coerce_number(row.cell(c.units_sold)),
        }
    }

    /// 广告表行 → AdRow（逐行补税，再交给汇总）
    pub fn map_ad_row(&self, row: &RawRow) -> AdRow {
        let c = &self.columns.ads;
        let resolved = resolve_ad_product(row.cell(c.ad_group), row.cell(c.campaign_name));
        let (product_key, code_source) = match resolved {
            Some((key, source)) => (Some(key), Some(source)),
            None => (None, None),
        };

        AdRow {
            product_key,
            code_source,
            spend: coerce_number(row.cell(c.spend)) * self.ad_tax_markup,
            attributed_units: coerce_number(row.cell(c.attributed_units)),
        }
    }

    pub fn map_sku_inventory_row(&self, row: &RawRow) -> SkuInventoryRow {
        let c = &self.columns.inventory_sku;
        SkuInventoryRow {
            sku_key: sku_key(row.cell(c.sku_id)),
            quantity: coerce_number(row.cell(c.quantity)),
        }
    }

    pub fn map_barcode_inventory_row(&self, row: &RawRow) -> BarcodeInventoryRow {
        let c = &self.columns.inventory_barcode;
        BarcodeInventoryRow {
            barcode_key: barcode_key(row.cell(c.barcode)),
            quantity: coerce_number(row.cell(c.quantity)),
        }
    }
}
