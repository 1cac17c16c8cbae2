// ==========================================
// 电商利润核算 - 多文件汇总
// ==========================================
// 流程: 列数校验 → 拼接 → 整行去重 → 按键求和
// 红线: 纯函数折叠成有序映射，按输入顺序累加（结果可复现）
// 红线: 空键丢弃；未出现的键不补 0，由调用方决定默认值
// ==========================================

use crate::domain::measure::{AdMeasure, AdTotals, InventoryMeasure, SalesMeasure};
use crate::domain::record::{RawRow, RawTable};
use crate::domain::types::SourceRole;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// 汇总结果 + 去重统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregated<M> {
    pub measure: M,
    pub duplicates_dropped: usize,
    pub rows_used: usize,
}

/// 拼接同角色的多个表，并去除完全相同的行（保留首次出现）
///
/// 同一导出被重复上传时不会重复计数
pub fn concat_unique_rows(tables: &[RawTable]) -> (Vec<&RawRow>, usize) {
    let mut seen: HashSet<&RawRow> = HashSet::new();
    let mut rows = Vec::new();
    let mut dropped = 0;

    for row in tables.iter().flat_map(|t| t.rows.iter()) {
        if seen.insert(row) {
            rows.push(row);
        } else {
            dropped += 1;
        }
    }
    (rows, dropped)
}

/// 按键求和（折叠）
pub fn sum_by_key<K, I>(pairs: I) -> BTreeMap<K, f64>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    pairs.into_iter().fold(BTreeMap::new(), |mut acc, (key, value)| {
        *acc.entry(key).or_insert(0.0) += value;
        acc
    })
}

fn ensure_all(
    mapper: &FieldMapper,
    role: SourceRole,
    tables: &[RawTable],
) -> ImportResult<()> {
    for table in tables {
        mapper.ensure_columns(role, table, false)?;
    }
    Ok(())
}

// ==========================================
// 销售汇总
// ==========================================
pub fn aggregate_sales(
    mapper: &FieldMapper,
    tables: &[RawTable],
) -> ImportResult<Aggregated<SalesMeasure>> {
    ensure_all(mapper, SourceRole::Sales, tables)?;
    let (rows, dropped) = concat_unique_rows(tables);

    let units = sum_by_key(
        rows.iter()
            .map(|row| mapper.map_sales_row(row))
            .filter(|sale| !sale.sku_key.is_empty())
            .map(|sale| (sale.sku_key, sale.units)),
    );

    info!(
        files = tables.len(),
        rows = rows.len(),
        duplicates = dropped,
        skus = units.len(),
        "销售表汇总完成"
    );

    Ok(Aggregated {
        measure: SalesMeasure { units },
        duplicates_dropped: dropped,
        rows_used: rows.len(),
    })
}

// ==========================================
// 广告汇总
// ==========================================
// 未解析编号的行不进入产品映射，但花费计入覆盖率分母
pub fn aggregate_ads(
    mapper: &FieldMapper,
    tables: &[RawTable],
) -> ImportResult<Aggregated<AdMeasure>> {
    ensure_all(mapper, SourceRole::Ads, tables)?;
    let (rows, dropped) = concat_unique_rows(tables);

    let measure = rows
        .iter()
        .map(|row| mapper.map_ad_row(row))
        .fold(AdMeasure::default(), |mut acc, ad| {
            acc.total_spend += ad.spend;
            match (ad.product_key, ad.code_source) {
                (Some(product), Some(source)) => {
                    let totals = acc.by_product.entry(product).or_insert_with(AdTotals::default);
                    totals.spend += ad.spend;
                    totals.attributed_units += ad.attributed_units;
                    acc.record_resolved_spend(source, ad.spend);
                }
                _ => {
                    acc.unresolved_spend += ad.spend;
                    acc.unresolved_rows += 1;
                }
            }
            acc
        });

    info!(
        files = tables.len(),
        rows = rows.len(),
        duplicates = dropped,
        products = measure.by_product.len(),
        unresolved_rows = measure.unresolved_rows,
        "广告表汇总完成"
    );

    Ok(Aggregated {
        measure,
        duplicates_dropped: dropped,
        rows_used: rows.len(),
    })
}

// ==========================================
// 库存汇总（两套标识分别汇总）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryAggregate {
    pub measure: InventoryMeasure,
    pub sku_duplicates_dropped: usize,
    pub barcode_duplicates_dropped: usize,
}

pub fn aggregate_inventory(
    mapper: &FieldMapper,
    sku_tables: &[RawTable],
    barcode_tables: &[RawTable],
) -> ImportResult<InventoryAggregate> {
    ensure_all(mapper, SourceRole::InventorySku, sku_tables)?;
    ensure_all(mapper, SourceRole::InventoryBarcode, barcode_tables)?;

    let (sku_rows, sku_dropped) = concat_unique_rows(sku_tables);
    let by_sku = sum_by_key(
        sku_rows
            .iter()
            .map(|row| mapper.map_sku_inventory_row(row))
            .filter(|inv| !inv.sku_key.is_empty())
            .map(|inv| (inv.sku_key, inv.quantity)),
    );

    let (barcode_rows, barcode_dropped) = concat_unique_rows(barcode_tables);
    let by_barcode = sum_by_key(
        barcode_rows
            .iter()
            .map(|row| mapper.map_barcode_inventory_row(row))
            .filter(|inv| !inv.barcode_key.is_empty())
            .map(|inv| (inv.barcode_key, inv.quantity)),
    );

    debug!(
        sku_keys = by_sku.len(),
        barcode_keys = by_barcode.len(),
        "库存表汇总完成"
    );

    Ok(InventoryAggregate {
        measure: InventoryMeasure { by_sku, by_barcode },
        sku_duplicates_dropped: sku_dropped,
        barcode_duplicates_dropped: barcode_dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnLayout;
    use crate::importer::data_cleaner::{barcode_key, product_key, sku_key};
    use crate::importer::error::ImportError;

    fn row(cells: &[(usize, &str)], width: usize) -> RawRow {
        let mut values = vec![None; width];
        for (idx, value) in cells {
            values[*idx] = Some(value.to_string());
        }
        RawRow::new(values)
    }

    fn table(source: &str, rows: Vec<RawRow>) -> RawTable {
        RawTable {
            source: source.to_string(),
            headers: vec![],
            rows,
        }
    }

    fn mapper() -> FieldMapper {
        FieldMapper::new(ColumnLayout::default(), 1.10)
    }

    #[test]
    fn test_concat_unique_rows_drops_cross_file_duplicates() {
        let a = table("a.csv", vec![row(&[(0, "S1"), (8, "3")], 9)]);
        let b = table(
            "b.csv",
            vec![row(&[(0, "S1"), (8, "3")], 9), row(&[(0, "S1"), (8, "4")], 9)],
        );
        let tables = [a, b];
        let (rows, dropped) = concat_unique_rows(&tables);
        assert_eq!(rows.len(), 2);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_sum_by_key() {
        let sums = sum_by_key(vec![("a", 1.0), ("b", 2.0), ("a", 3.5)]);
        assert_eq!(sums.get("a"), Some(&4.5));
        assert_eq!(sums.get("b"), Some(&2.0));
    }

    #[test]
    fn test_aggregate_sales_sums_across_files_and_skips_empty_keys() {
        let tables = [
            table(
                "s1.csv",
                vec![
                    row(&[(0, "s1"), (8, "10")], 9),
                    row(&[(0, "S2.0"), (8, "4")], 9),
                    row(&[(8, "99")], 9),
                ],
            ),
            table("s2.csv", vec![row(&[(0, "S1 "), (8, "1,000")], 9)]),
        ];
        let agg = aggregate_sales(&mapper(), &tables).unwrap();
        assert_eq!(agg.measure.units_for(&sku_key(Some("S1"))), 1010.0);
        assert_eq!(agg.measure.units_for(&sku_key(Some("S2"))), 4.0);
        assert_eq!(agg.measure.units.len(), 2);
        assert_eq!(agg.measure.units_for(&sku_key(None)), 0.0);
        assert_eq!(agg.duplicates_dropped, 0);
    }

    #[test]
    fn test_aggregate_sales_empty_is_not_error() {
        let agg = aggregate_sales(&mapper(), &[]).unwrap();
        assert!(agg.measure.units.is_empty());
    }

    #[test]
    fn test_aggregate_sales_narrow_file_is_fatal() {
        let tables = [table("narrow.csv", vec![row(&[(0, "S1")], 3)])];
        assert!(matches!(
            aggregate_sales(&mapper(), &tables),
            Err(ImportError::ColumnOutOfRange {
                role: SourceRole::Sales,
                index: 8,
                ..
            })
        ));
    }

    #[test]
    fn test_aggregate_ads_markup_and_coverage() {
        let tables = [table(
            "ads.csv",
            vec![
                row(&[(6, "C001-Brand"), (15, "100"), (29, "5")], 30),
                row(&[(5, "c001 camp"), (15, "50"), (29, "1")], 30),
                row(&[(5, "brand"), (15, "20")], 30),
            ],
        )];
        let agg = aggregate_ads(&mapper(), &tables).unwrap();
        let m = agg.measure;
        let c001 = m.totals_for(&product_key(Some("C001")));
        assert!((c001.spend - 165.0).abs() < 1e-9);
        assert_eq!(c001.attributed_units, 6.0);
        assert!((m.ad_group_spend - 110.0).abs() < 1e-9);
        assert!((m.campaign_spend - 55.0).abs() < 1e-9);
        assert!((m.unresolved_spend - 22.0).abs() < 1e-9);
        assert!((m.total_spend - 187.0).abs() < 1e-9);
        assert_eq!(m.unresolved_rows, 1);
    }

    #[test]
    fn test_aggregate_ads_duplicate_upload_counted_once() {
        let ad = row(&[(6, "C9"), (15, "100"), (29, "2")], 30);
        let tables = [
            table("ads_a.csv", vec![ad.clone()]),
            table("ads_b.csv", vec![ad]),
        ];
        let agg = aggregate_ads(&mapper(), &tables).unwrap();
        assert_eq!(agg.duplicates_dropped, 1);
        assert!((agg.measure.totals_for(&product_key(Some("C9"))).spend - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_inventory_two_key_spaces() {
        let sku_tables = [table(
            "inv_sku.csv",
            vec![
                row(&[(2, "S1"), (7, "5")], 8),
                row(&[(2, "s1"), (7, "2")], 8),
            ],
        )];
        let barcode_tables = [table(
            "inv_bar.csv",
            vec![row(&[(2, "880001.0"), (10, "7")], 11)],
        )];
        let agg = aggregate_inventory(&mapper(), &sku_tables, &barcode_tables).unwrap();
        assert_eq!(agg.measure.quantity_for_sku(&sku_key(Some("S1"))), 7.0);
        assert_eq!(
            agg.measure.quantity_for_barcode(&barcode_key(Some("880001"))),
            7.0
        );
        assert_eq!(agg.measure.quantity_for_sku(&sku_key(Some("S2"))), 0.0);
    }
}
