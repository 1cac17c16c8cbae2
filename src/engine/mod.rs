// ==========================================
// 电商利润核算 - 核算层
// ==========================================
// 职责: 汇总核算、库存分类、流程编排、并发加载
// 红线: 引擎无状态，不读写文件（文件读取在 batch_loader）
// ==========================================

pub mod batch_loader;
pub mod error;
pub mod inventory;
pub mod orchestrator;
pub mod rollup;

// 重导出核心引擎
pub use batch_loader::{BatchLoader, InputFiles, SourceLoader};
pub use error::{RollupError, RollupResult};
pub use inventory::{
    AdditiveCombiner, InventoryClassifier, InventoryCombiner, StockAssessment, StockLevel,
};
pub use orchestrator::{RollupInputs, RollupPipeline};
pub use rollup::{safe_ratio, RollupEngine, RollupOutput};
