// ==========================================
// 电商利润核算 - 列位置配置
// ==========================================
// 红线: 只按列位置读取（表头语言/顺序不可信）
// 红线: 计算逻辑中不出现魔法列号，统一由此结构传入
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::types::SourceRole;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 必需字段：(字段名, 列位置)
pub type RequiredField = (&'static str, usize);

// ==========================================
// 基础信息表（Master）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterColumns {
    pub product_code: usize, // A列: 产品编号
    pub sku_id: usize,       // D列: SKU ID
    pub unit_cost: usize,    // G列: 单件成本
    pub unit_margin: usize,  // K列: 单件毛利
    pub barcode: usize,      // M列: 条码
}

impl Default for MasterColumns {
    fn default() -> Self {
        Self {
            product_code: 0,
            sku_id: 3,
            unit_cost: 6,
            unit_margin: 10,
            barcode: 12,
        }
    }
}

impl MasterColumns {
    /// 成本与条码仅在库存核算启用时必需
    pub fn required_fields(&self, with_inventory: bool) -> Vec<RequiredField> {
        let mut fields = vec![
            ("product_code", self.product_code),
            ("sku_id", self.sku_id),
            ("unit_margin", self.unit_margin),
        ];
        if with_inventory {
            fields.push(("unit_cost", self.unit_cost));
            fields.push(("barcode", self.barcode));
        }
        fields
    }
}

// ==========================================
// 销售表（Sales）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesColumns {
    pub sku_id: usize,     // A列
    pub units_sold: usize, // I列
}

impl Default for SalesColumns {
    fn default() -> Self {
        Self {
            sku_id: 0,
            units_sold: 8,
        }
    }
}

impl SalesColumns {
    pub fn required_fields(&self) -> Vec<RequiredField> {
        vec![("sku_id", self.sku_id), ("units_sold", self.units_sold)]
    }
}

// ==========================================
// 广告表（Ads）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdsColumns {
    pub campaign_name: usize,    // F列: 广告活动名
    pub ad_group: usize,         // G列: 广告组
    pub spend: usize,            // P列: 广告费
    pub attributed_units: usize, // AD列: 广告转化销量
}

impl Default for AdsColumns {
    fn default() -> Self {
        Self {
            campaign_name: 5,
            ad_group: 6,
            spend: 15,
            attributed_units: 29,
        }
    }
}

impl AdsColumns {
    pub fn required_fields(&self) -> Vec<RequiredField> {
        vec![
            ("campaign_name", self.campaign_name),
            ("ad_group", self.ad_group),
            ("spend", self.spend),
            ("attributed_units", self.attributed_units),
        ]
    }
}

// ==========================================
// 库存表（按 SKU）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkuInventoryColumns {
    pub sku_id: usize,   // C列
    pub quantity: usize, // H列
}

impl Default for SkuInventoryColumns {
    fn default() -> Self {
        Self {
            sku_id: 2,
            quantity: 7,
        }
    }
}

impl SkuInventoryColumns {
    pub fn required_fields(&self) -> Vec<RequiredField> {
        vec![("sku_id", self.sku_id), ("quantity", self.quantity)]
    }
}

// ==========================================
// 库存表（按条码）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeInventoryColumns {
    pub barcode: usize,  // C列
    pub quantity: usize, // K列
}

impl Default for BarcodeInventoryColumns {
    fn default() -> Self {
        Self {
            barcode: 2,
            quantity: 10,
        }
    }
}

impl BarcodeInventoryColumns {
    pub fn required_fields(&self) -> Vec<RequiredField> {
        vec![("barcode", self.barcode), ("quantity", self.quantity)]
    }
}

// ==========================================
// ColumnLayout - 全部角色的列位置
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub master: MasterColumns,
    pub sales: SalesColumns,
    pub ads: AdsColumns,
    pub inventory_sku: SkuInventoryColumns,
    pub inventory_barcode: BarcodeInventoryColumns,
}

impl ColumnLayout {
    /// 某角色的必需字段（Master 按库存启用情况取全集）
    pub fn required_fields(&self, role: SourceRole, with_inventory: bool) -> Vec<RequiredField> {
        match role {
            SourceRole::Master => self.master.required_fields(with_inventory),
            SourceRole::Sales => self.sales.required_fields(),
            SourceRole::Ads => self.ads.required_fields(),
            SourceRole::InventorySku => self.inventory_sku.required_fields(),
            SourceRole::InventoryBarcode => self.inventory_barcode.required_fields(),
        }
    }

    /// 校验: 同一角色内不同字段不得指向同一列
    pub fn validate(&self) -> Result<(), ConfigError> {
        let roles = [
            SourceRole::Master,
            SourceRole::Sales,
            SourceRole::Ads,
            SourceRole::InventorySku,
            SourceRole::InventoryBarcode,
        ];

        for role in roles {
            let mut seen: HashMap<usize, &'static str> = HashMap::new();
            for (field, index) in self.required_fields(role, true) {
                if let Some(other) = seen.insert(index, field) {
                    return Err(ConfigError::DuplicateColumn {
                        role,
                        index,
                        first: other,
                        second: field,
                    });
                }
            }
        }
        Ok(())
    }
}
