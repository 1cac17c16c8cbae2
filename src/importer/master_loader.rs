// ==========================================
// 电商利润核算 - 基础信息表加载
// ==========================================
// 规则: 每个 SKU 键唯一（首次出现有效，后续重复记入诊断）
// 规则: SKU 键为空的行跳过
// 红线: 无有效 SKU → 致命错误
// ==========================================

use crate::domain::record::{RawTable, SkuRecord};
use crate::domain::types::{SkuKey, SourceRole};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterCatalog {
    pub headers: Vec<String>,
    pub records: Vec<SkuRecord>,
    pub rows_total: usize,
    pub rows_without_sku: usize,
    pub duplicate_sku_keys: Vec<SkuKey>,
}

pub fn load_master(
    mapper: &FieldMapper,
    table: &RawTable,
    with_inventory: bool,
) -> ImportResult<MasterCatalog> {
    mapper.ensure_columns(SourceRole::Master, table, with_inventory)?;

    let mut seen: HashSet<SkuKey> = HashSet::new();
    let mut catalog = MasterCatalog {
        headers: table.headers.clone(),
        rows_total: table.rows.len(),
        ..MasterCatalog::default()
    };

    for (idx, row) in table.rows.iter().enumerate() {
        // 行号按表格习惯计（表头为第 1 行）
        let record = mapper.map_master_row(row, idx + 2);

        if record.sku_key.is_empty() {
            catalog.rows_without_sku += 1;
            continue;
        }

        if !seen.insert(record.sku_key.clone()) {
            warn!(
                sku = %record.sku_key,
                row_number = record.row_number,
                "重复 SKU（基础信息表），保留首次出现"
            );
            catalog.duplicate_sku_keys.push(record.sku_key);
            continue;
        }

        catalog.records.push(record);
    }

    if catalog.records.is_empty() {
        return Err(ImportError::EmptyMaster(table.source.clone()));
    }

    if catalog.rows_without_sku > 0 {
        warn!(
            skipped = catalog.rows_without_sku,
            "基础信息表存在 SKU 为空的行，已跳过"
        );
    }

    info!(
        source = %table.source,
        rows = catalog.rows_total,
        skus = catalog.records.len(),
        "基础信息表加载完成"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnLayout;
    use crate::domain::record::RawRow;

    fn row(cells: &[(usize, &str)]) -> RawRow {
        let mut values = vec![None; 13];
        for (idx, value) in cells {
            values[*idx] = Some(value.to_string());
        }
        RawRow::new(values)
    }

    fn mapper() -> FieldMapper {
        FieldMapper::new(ColumnLayout::default(), 1.10)
    }

    fn master(rows: Vec<RawRow>) -> RawTable {
        RawTable {
            source: "master.csv".to_string(),
            headers: (0..13).map(|i| format!("col{i}")).collect(),
            rows,
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let table = master(vec![
            row(&[(0, "C001"), (3, "S1"), (10, "5")]),
            row(&[(0, "C002"), (3, "s1"), (10, "9")]),
            row(&[(0, "C001"), (3, "S2"), (10, "3")]),
        ]);
        let catalog = load_master(&mapper(), &table, false).unwrap();
        assert_eq!(catalog.records.len(), 2);
        assert_eq!(catalog.records[0].unit_margin, 5.0);
        assert_eq!(catalog.duplicate_sku_keys.len(), 1);
        assert_eq!(catalog.duplicate_sku_keys[0].as_str(), "S1");
    }

    #[test]
    fn test_rows_without_sku_are_skipped() {
        let table = master(vec![
            row(&[(0, "C001"), (3, "S1"), (10, "5")]),
            row(&[(0, "C001"), (10, "5")]),
        ]);
        let catalog = load_master(&mapper(), &table, false).unwrap();
        assert_eq!(catalog.records.len(), 1);
        assert_eq!(catalog.rows_without_sku, 1);
        assert_eq!(catalog.rows_total, 2);
    }

    #[test]
    fn test_empty_master_is_fatal() {
        let table = master(vec![]);
        assert!(matches!(
            load_master(&mapper(), &table, false),
            Err(ImportError::EmptyMaster(_))
        ));

        let only_blank_sku = master(vec![row(&[(0, "C001")])]);
        assert!(matches!(
            load_master(&mapper(), &only_blank_sku, false),
            Err(ImportError::EmptyMaster(_))
        ));
    }
}
