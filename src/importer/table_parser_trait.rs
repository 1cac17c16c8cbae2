// ==========================================
// 电商利润核算 - 表格解析 Trait
// ==========================================
// 职责: 定义「字节 → 按列位置寻址的原始表」接口（不包含实现）
// 红线: 核算层不关心文件格式与编码回退细节
// ==========================================

use crate::domain::record::RawTable;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// TableParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait TableParser: Send + Sync {
    /// 解析文件内容为原始表
    ///
    /// # 参数
    /// - source: 文件名（用于格式判断与诊断信息）
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(RawTable): 首行为表头，其余为数据行（已跳过全空白行）
    /// - Err: 格式错误、编码无法识别
    fn parse_table(&self, source: &str, bytes: &[u8]) -> ImportResult<RawTable>;

    /// 读取并解析磁盘文件
    fn parse_file(&self, path: &Path) -> ImportResult<RawTable> {
        if !path.exists() {
            return Err(crate::importer::error::ImportError::FileNotFound(
                path.display().to_string(),
            ));
        }
        let bytes = std::fs::read(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.parse_table(&source, &bytes)
    }
}
