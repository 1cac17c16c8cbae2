// ==========================================
// 电商利润核算 - 输入记录模型
// ==========================================
// 用途: 文件解析 → 字段映射 → 此处结构体
// 生命周期: 仅在单次核算内
// ==========================================

use crate::domain::types::{AdCodeSource, BarcodeKey, ProductKey, SkuKey};
use serde::{Deserialize, Serialize};

// ==========================================
// RawRow - 原始行
// ==========================================
// 红线: 只按列位置寻址，不信任表头
// None = 缺失单元格
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRow {
    pub cells: Vec<Option<String>>,
}

impl RawRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// 按列位置取值；越界视为缺失
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// 全部单元格为空白
    pub fn is_blank(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

// ==========================================
// RawTable - 单个文件的解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub source: String,       // 文件名（诊断用）
    pub headers: Vec<String>, // 表头（仅用于回显与列数判断）
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// 表宽度：表头与最宽数据行取大
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(RawRow::width)
            .max()
            .unwrap_or(0)
            .max(self.headers.len())
    }
}

// ==========================================
// SkuRecord - 基础信息表一行
// ==========================================
// 每个 SKU 键唯一；加载后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuRecord {
    pub sku_key: SkuKey,
    pub product_key: ProductKey,
    pub barcode_key: BarcodeKey,
    pub unit_margin: f64, // 单件毛利
    pub unit_cost: f64,   // 单件成本
    pub row: RawRow,      // 原始行（明细表回显）
    pub row_number: usize,
}

// ==========================================
// 角色行（字段映射后的最小结构）
// ==========================================

/// 销售表一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    pub sku_key: SkuKey,
    pub units: f64,
}

/// 广告表一行（spend 已含税）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRow {
    pub product_key: Option<ProductKey>, // None = 无法解析编号
    pub code_source: Option<AdCodeSource>,
    pub spend: f64,
    pub attributed_units: f64,
}

/// 库存表（按 SKU）一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuInventoryRow {
    pub sku_key: SkuKey,
    pub quantity: f64,
}

/// 库存表（按条码）一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeInventoryRow {
    pub barcode_key: BarcodeKey,
    pub quantity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_row_cell_out_of_range() {
        let row = RawRow::new(vec![Some("A".to_string()), None]);
        assert_eq!(row.cell(0), Some("A"));
        assert_eq!(row.cell(1), None);
        assert_eq!(row.cell(9), None);
    }

    #[test]
    fn test_raw_row_blank() {
        assert!(RawRow::new(vec![None, Some("  ".to_string())]).is_blank());
        assert!(!RawRow::new(vec![None, Some("x".to_string())]).is_blank());
    }

    #[test]
    fn test_raw_table_width() {
        let table = RawTable {
            source: "t.csv".to_string(),
            headers: vec!["a".to_string(), "b".to_string()],
            rows: vec![RawRow::new(vec![None, None, Some("c".to_string())])],
        };
        assert_eq!(table.width(), 3);
    }
}
