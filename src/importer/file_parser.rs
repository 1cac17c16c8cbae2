// ==========================================
// 电商利润核算 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls) / CSV (.csv)
// CSV 编码: 按声明顺序回退（默认 utf-8 → euc-kr → gb18030）
// 注意: EUC-KR 字节对在 GB18030 下同样合法，GB18030 必须排在 EUC-KR 之后；
//       中文 GBK 导出需在配置中把 gb18030 放到 euc-kr 之前
// ==========================================

use crate::domain::record::{RawRow, RawTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::table_parser_trait::TableParser;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use csv::ReaderBuilder;
use encoding_rs::Encoding;
use std::io::Cursor;
use tracing::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

fn to_cell(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// 首行作表头，其余作数据行（跳过全空白行）
fn split_header(source: &str, mut rows: Vec<RawRow>) -> RawTable {
    if rows.is_empty() {
        return RawTable {
            source: source.to_string(),
            headers: Vec::new(),
            rows: Vec::new(),
        };
    }

    let header = rows.remove(0);
    let headers = header
        .cells
        .into_iter()
        .map(|c| c.map(|v| v.trim().to_string()).unwrap_or_default())
        .collect();
    rows.retain(|row| !row.is_blank());

    RawTable {
        source: source.to_string(),
        headers,
        rows,
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser {
    encodings: Vec<&'static Encoding>,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            encodings: vec![
                encoding_rs::UTF_8,
                encoding_rs::EUC_KR,
                encoding_rs::GB18030,
            ],
        }
    }
}

impl CsvParser {
    /// 按编码标签构造（未知标签忽略；标签已在配置加载时校验）
    pub fn with_encodings<S: AsRef<str>>(labels: &[S]) -> Self {
        let encodings: Vec<&'static Encoding> = labels
            .iter()
            .filter_map(|label| Encoding::for_label(label.as_ref().trim().as_bytes()))
            .collect();
        if encodings.is_empty() {
            return Self::default();
        }
        Self { encodings }
    }

    pub fn encodings(&self) -> &[&'static Encoding] {
        &self.encodings
    }

    /// 按声明顺序尝试解码，首个无替换字符的结果胜出
    fn decode(&self, source: &str, bytes: &[u8]) -> ImportResult<String> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        for encoding in &self.encodings {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes)
            {
                debug!(source, encoding = encoding.name(), "CSV 编码识别完成");
                return Ok(text.into_owned());
            }
        }

        Err(ImportError::EncodingError {
            file: source.to_string(),
            tried: self
                .encodings
                .iter()
                .map(|e| e.name())
                .collect::<Vec<_>>()
                .join(" → "),
        })
    }
}

impl TableParser for CsvParser {
    fn parse_table(&self, source: &str, bytes: &[u8]) -> ImportResult<RawTable> {
        let text = self.decode(source, bytes)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(RawRow::new(record.iter().map(to_cell).collect()));
        }

        Ok(split_header(source, rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 只读第一个工作表；格式由内容识别（xlsx/xlsm/xlsb/xls）
pub struct ExcelParser;

impl ExcelParser {
    fn cell_text(cell: &Data) -> Option<String> {
        match cell {
            Data::Empty => None,
            Data::String(s) => to_cell(s),
            other => to_cell(&other.to_string()),
        }
    }

    /// 工作表区域 → 定位行
    ///
    /// 区域从首个有值单元格开始：列号按起始列补齐，前导空行不补（表头取首个有值行）
    fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
        let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

        range
            .rows()
            .map(|cells| {
                let padded = std::iter::repeat(None)
                    .take(col_offset)
                    .chain(cells.iter().map(Self::cell_text))
                    .collect();
                RawRow::new(padded)
            })
            .collect()
    }
}

impl TableParser for ExcelParser {
    fn parse_table(&self, source: &str, bytes: &[u8]) -> ImportResult<RawTable> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => {
                return Err(ImportError::ExcelParseError(format!(
                    "Excel 文件无工作表: {}",
                    source
                )))
            }
        };

        Ok(split_header(source, Self::rows_from_range(&range)))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名/文件头自动选择）
// ==========================================
pub struct UniversalFileParser {
    csv: CsvParser,
    excel: ExcelParser,
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(CsvParser::default())
    }
}

impl UniversalFileParser {
    pub fn new(csv: CsvParser) -> Self {
        Self {
            csv,
            excel: ExcelParser,
        }
    }
}

impl TableParser for UniversalFileParser {
    fn parse_table(&self, source: &str, bytes: &[u8]) -> ImportResult<RawTable> {
        let ext = source
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "txt" => self.csv.parse_table(source, bytes),
            "xlsx" | "xlsm" | "xlsb" | "xls" => self.excel.parse_table(source, bytes),
            _ if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) => {
                self.excel.parse_table(source, bytes)
            }
            "" => self.csv.parse_table(source, bytes),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
