// ==========================================
// 电商利润核算 - 核算层错误类型
// ==========================================

use crate::config::error::ConfigError;
use crate::importer::error::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RollupError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("文件加载任务失败: {0}")]
    TaskJoinError(String),

    #[error("报表导出失败 ({path}): {message}")]
    ExportError { path: String, message: String },

    #[error("运行摘要序列化失败: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result 类型别名
pub type RollupResult<T> = Result<T, RollupError>;
