// ==========================================
// 库存健康集成测试
// ==========================================
// 覆盖: 两套库存源合并、分类规则、产品级汇总、报表导出
// ==========================================

mod test_helpers;

use profit_rollup::engine::{BatchLoader, InputFiles, RollupPipeline, SourceLoader};
use profit_rollup::importer::UniversalFileParser;
use profit_rollup::report::{CsvExporter, INVENTORY_HEALTH_FILE, RUN_SUMMARY_FILE};
use profit_rollup::{InventoryStatus, RollupConfig, RollupReport};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use test_helpers::*;

fn files(dir: &Path) -> InputFiles {
    let master = write_csv(
        dir,
        "master.csv",
        MASTER_WIDTH,
        &[
            master_row("C001", "S1", "2", "5", "880001"),
            master_row("C001", "S2", "10", "3", "880002"),
            master_row("C002", "S3", "4", "1", "880003"),
            master_row("C002", "S4", "4", "1", ""),
        ],
    );
    let sales = write_csv(
        dir,
        "sales.csv",
        SALES_WIDTH,
        &[sales_row("S1", "10"), sales_row("S2", "1")],
    );
    let ads = write_csv(dir, "ads.csv", ADS_WIDTH, &[]);
    let by_sku = write_csv(
        dir,
        "stock_sku.csv",
        INVENTORY_SKU_WIDTH,
        &[
            inventory_sku_row("S1", "5"),
            inventory_sku_row("S2", "6"),
            inventory_sku_row("S3", "2"),
        ],
    );
    // 条码库存与 SKU 库存直接相加
    let by_barcode = write_csv(
        dir,
        "stock_barcode.csv",
        INVENTORY_BARCODE_WIDTH,
        &[
            inventory_barcode_row("880001", "7"),
            inventory_barcode_row("880002.0", "4"),
        ],
    );

    InputFiles {
        master: Some(master),
        sales: vec![sales],
        ads: vec![ads],
        inventory_sku: vec![by_sku],
        inventory_barcode: vec![by_barcode],
    }
}

async fn run(dir: &Path) -> RollupReport {
    profit_rollup::logging::init_test();
    let inputs = BatchLoader::new(Arc::new(UniversalFileParser::default()))
        .load(&files(dir))
        .await
        .unwrap();
    RollupPipeline::new(&RollupConfig::default())
        .run(&inputs)
        .unwrap()
}

#[tokio::test]
async fn test_inventory_classification() {
    let dir = TempDir::new().unwrap();
    let report = run(dir.path()).await;
    let rows = report.inventory.as_ref().unwrap();
    assert_eq!(rows.len(), 4);

    let find = |sku: &str| rows.iter().find(|r| r.sku_key.as_str() == sku).unwrap();

    // S1: 销量 10，库存 5 + 7 = 12 < 30 → 补货 18
    let s1 = find("S1");
    assert_eq!(s1.inventory_by_sku, 5.0);
    assert_eq!(s1.inventory_by_barcode, 7.0);
    assert_eq!(s1.total_inventory, 12.0);
    assert_eq!(s1.restock_quantity, 18.0);
    assert_eq!(s1.status, InventoryStatus::Restock);
    assert!((s1.inventory_value - 28.8).abs() < 1e-9);

    // S2: 销量 1，库存 6 + 4 = 10 ≥ 8 → 滞销
    let s2 = find("S2");
    assert_eq!(s2.total_inventory, 10.0);
    assert!(s2.is_dead_stock);
    assert!((s2.dead_stock_value - 120.0).abs() < 1e-9);

    // S3: 无销量，有库存 → 滞销
    let s3 = find("S3");
    assert!(s3.is_dead_stock);
    assert_eq!(s3.status, InventoryStatus::DeadStock);

    // S4: 无销量，无库存 → 不算滞销
    let s4 = find("S4");
    assert!(!s4.is_dead_stock);
    assert_eq!(s4.status, InventoryStatus::Inactive);
    assert_eq!(s4.dead_stock_value, 0.0);
}

#[tokio::test]
async fn test_product_inventory_is_sum_of_skus() {
    let dir = TempDir::new().unwrap();
    let report = run(dir.path()).await;
    let rows = report.inventory.as_ref().unwrap();

    for product in &report.products {
        let summary = product.inventory.unwrap();
        let members: Vec<_> = rows
            .iter()
            .filter(|r| r.product_key == product.product_key)
            .collect();
        let total: f64 = members.iter().map(|r| r.total_inventory).sum();
        let dead_value: f64 = members.iter().map(|r| r.dead_stock_value).sum();
        assert_eq!(summary.total_inventory, total);
        assert_eq!(summary.dead_stock_value, dead_value);
        assert_eq!(
            summary.dead_stock_sku_count,
            members.iter().filter(|r| r.is_dead_stock).count()
        );
    }
}

#[tokio::test]
async fn test_export_writes_inventory_health() {
    let dir = TempDir::new().unwrap();
    let report = run(dir.path()).await;

    let out = dir.path().join("out");
    let written = CsvExporter::new(&out).export(&report).unwrap();
    assert_eq!(written.len(), 4);

    let health = std::fs::read_to_string(out.join(INVENTORY_HEALTH_FILE)).unwrap();
    assert_eq!(health.lines().count(), 5);
    assert!(health.contains("需补货"));
    assert!(health.contains("滞销"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join(RUN_SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(summary["inventory_rows"], 4);
    assert_eq!(summary["run_id"], report.run_id.as_str());
}
