// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 按默认列位置生成 CSV 测试文件
// ==========================================
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

pub const MASTER_WIDTH: usize = 13;
pub const SALES_WIDTH: usize = 9;
pub const ADS_WIDTH: usize = 30;
pub const INVENTORY_SKU_WIDTH: usize = 8;
pub const INVENTORY_BARCODE_WIDTH: usize = 11;

fn quote(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// 按列位置构造一行（未指定的列为空）
pub fn csv_line(width: usize, cells: &[(usize, &str)]) -> String {
    let mut values = vec![String::new(); width];
    for (idx, value) in cells {
        values[*idx] = quote(value);
    }
    values.join(",")
}

/// 生成 CSV 内容（首行为占位表头）
pub fn csv_content(width: usize, rows: &[Vec<(usize, &str)>]) -> String {
    let header: Vec<String> = (0..width).map(|i| format!("col{}", i)).collect();
    let mut content = header.join(",");
    content.push('\n');
    for row in rows {
        content.push_str(&csv_line(width, row));
        content.push('\n');
    }
    content
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(bytes).unwrap();
    path
}

pub fn write_csv(dir: &Path, name: &str, width: usize, rows: &[Vec<(usize, &str)>]) -> PathBuf {
    write_file(dir, name, csv_content(width, rows).as_bytes())
}

// ==========================================
// 各角色的行构造（默认列位置）
// ==========================================

pub fn master_row<'a>(
    product: &'a str,
    sku: &'a str,
    unit_cost: &'a str,
    unit_margin: &'a str,
    barcode: &'a str,
) -> Vec<(usize, &'a str)> {
    vec![
        (0, product),
        (3, sku),
        (6, unit_cost),
        (10, unit_margin),
        (12, barcode),
    ]
}

pub fn sales_row<'a>(sku: &'a str, units: &'a str) -> Vec<(usize, &'a str)> {
    vec![(0, sku), (8, units)]
}

pub fn ads_row<'a>(
    campaign: &'a str,
    ad_group: &'a str,
    spend: &'a str,
    units: &'a str,
) -> Vec<(usize, &'a str)> {
    vec![(5, campaign), (6, ad_group), (15, spend), (29, units)]
}

pub fn inventory_sku_row<'a>(sku: &'a str, quantity: &'a str) -> Vec<(usize, &'a str)> {
    vec![(2, sku), (7, quantity)]
}

pub fn inventory_barcode_row<'a>(barcode: &'a str, quantity: &'a str) -> Vec<(usize, &'a str)> {
    vec![(2, barcode), (10, quantity)]
}

pub fn approx_eq(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}
