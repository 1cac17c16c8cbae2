// ==========================================
// 电商利润核算 - 批量文件加载
// ==========================================
// 职责: 并发读取各角色的输入文件，保持声明顺序
// 红线: 任一文件失败即整体失败（不输出部分结果）
// ==========================================

use crate::domain::record::RawTable;
use crate::domain::types::SourceRole;
use crate::engine::error::{RollupError, RollupResult};
use crate::engine::orchestrator::RollupInputs;
use crate::importer::error::ImportError;
use crate::importer::table_parser_trait::TableParser;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// 各角色的输入文件路径
#[derive(Debug, Clone, Default)]
pub struct InputFiles {
    pub master: Option<PathBuf>,
    pub sales: Vec<PathBuf>,
    pub ads: Vec<PathBuf>,
    pub inventory_sku: Vec<PathBuf>,
    pub inventory_barcode: Vec<PathBuf>,
}

// ==========================================
// SourceLoader Trait
// ==========================================
// 实现者: BatchLoader
#[async_trait]
pub trait SourceLoader: Send + Sync {
    /// 加载全部输入文件
    ///
    /// # 返回
    /// - Ok(RollupInputs): 各角色的原始表（文件顺序与传入顺序一致）
    /// - Err: 文件不存在、格式不支持、编码无法识别
    async fn load(&self, files: &InputFiles) -> RollupResult<RollupInputs>;
}

// ==========================================
// BatchLoader - 基于 TableParser 的并发加载器
// ==========================================
pub struct BatchLoader {
    parser: Arc<dyn TableParser>,
}

impl BatchLoader {
    pub fn new(parser: Arc<dyn TableParser>) -> Self {
        Self { parser }
    }

    /// 并发解析同一角色的多个文件
    pub async fn load_role(&self, role: SourceRole, paths: &[PathBuf]) -> RollupResult<Vec<RawTable>> {
        let tasks = paths.iter().cloned().map(|path| {
            let parser = Arc::clone(&self.parser);
            async move {
                let file_name = path.display().to_string();
                let result = tokio::task::spawn_blocking(move || parser.parse_file(&path))
                    .await
                    .map_err(|e| RollupError::TaskJoinError(e.to_string()))?;

                match result {
                    Ok(table) => {
                        info!(role = %role, file = %file_name, rows = table.rows.len(), "文件解析完成");
                        Ok(table)
                    }
                    Err(e) => {
                        error!(role = %role, file = %file_name, error = %e, "文件解析失败");
                        Err(RollupError::from(e))
                    }
                }
            }
        });

        try_join_all(tasks).await
    }
}

#[async_trait]
impl SourceLoader for BatchLoader {
    async fn load(&self, files: &InputFiles) -> RollupResult<RollupInputs> {
        let master_path = files
            .master
            .clone()
            .ok_or(ImportError::MissingSource(SourceRole::Master))?;

        info!(
            sales = files.sales.len(),
            ads = files.ads.len(),
            inventory_sku = files.inventory_sku.len(),
            inventory_barcode = files.inventory_barcode.len(),
            "开始批量加载文件"
        );

        let master = std::slice::from_ref(&master_path);
        let (mut master, sales, ads, inventory_sku, inventory_barcode) = futures::try_join!(
            self.load_role(SourceRole::Master, master),
            self.load_role(SourceRole::Sales, &files.sales),
            self.load_role(SourceRole::Ads, &files.ads),
            self.load_role(SourceRole::InventorySku, &files.inventory_sku),
            self.load_role(SourceRole::InventoryBarcode, &files.inventory_barcode),
        )?;

        Ok(RollupInputs {
            master: master.pop(),
            sales,
            ads,
            inventory_sku,
            inventory_barcode,
        })
    }
}
