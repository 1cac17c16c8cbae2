// ==========================================
// 电商利润核算 - 数据清洗器
// ==========================================
// 职责: 标识符标准化（匹配键） + 数值强制转换
// 红线: 全部为全函数，不返回错误
// ==========================================

use crate::domain::types::{BarcodeKey, MatchKey, ProductKey, SkuKey};

/// 标识符标准化
///
/// # 规则
/// 1. 缺失 → 空键（永不匹配）
/// 2. 去除双引号、换行符（\n / \r）
/// 3. 去除末尾的 `.0`（数值转文本的残留），连同首尾空白
/// 4. 转大写
///
/// 去 `.0` 与 TRIM 循环到稳定为止，保证幂等
pub fn normalize_key(raw: Option<&str>) -> MatchKey {
    let Some(raw) = raw else {
        return MatchKey::default();
    };

    let mut text: String = raw
        .chars()
        .filter(|c| !matches!(c, '"' | '\n' | '\r'))
        .collect();

    loop {
        let trimmed = text.trim();
        match trimmed.strip_suffix(".0") {
            Some(rest) => text = rest.to_string(),
            None => {
                text = trimmed.to_string();
                break;
            }
        }
    }

    MatchKey::from_normalized(text.to_uppercase())
}

pub fn sku_key(raw: Option<&str>) -> SkuKey {
    SkuKey::new(normalize_key(raw))
}

pub fn product_key(raw: Option<&str>) -> ProductKey {
    ProductKey::new(normalize_key(raw))
}

pub fn barcode_key(raw: Option<&str>) -> BarcodeKey {
    BarcodeKey::new(normalize_key(raw))
}

/// 数值清洗
///
/// 去千分位逗号与首尾空白后按浮点解析；
/// 无法解析 / NaN / 无穷 → 0
pub fn coerce_number(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };

    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
