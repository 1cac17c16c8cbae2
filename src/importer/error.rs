// ==========================================
// 电商利润核算 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 致命错误必须指明角色/字段/文件
// ==========================================

use crate::domain::types::SourceRole;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件编码无法识别 ({file}): 已尝试 {tried}")]
    EncodingError { file: String, tried: String },

    // ===== 输入形状错误 =====
    #[error("缺少必需的输入文件: {0}")]
    MissingSource(SourceRole),

    #[error("列数不足 ({role}, 文件 {file}): 字段「{field}」需要第 {index} 列（0 起），实际仅 {width} 列")]
    ColumnOutOfRange {
        role: SourceRole,
        file: String,
        field: &'static str,
        index: usize,
        width: usize,
    },

    #[error("基础信息表无有效 SKU ({0}): 没有可核算的数据")]
    EmptyMaster(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_out_of_range_message_names_role_and_index() {
        let err = ImportError::ColumnOutOfRange {
            role: SourceRole::Ads,
            file: "ads.csv".to_string(),
            field: "attributed_units",
            index: 29,
            width: 16,
        };
        let msg = err.to_string();
        assert!(msg.contains("广告表"));
        assert!(msg.contains("29"));
        assert!(msg.contains("ads.csv"));
    }
}
