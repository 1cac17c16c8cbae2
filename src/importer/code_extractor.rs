// ==========================================
// 电商利润核算 - 产品编号提取
// ==========================================
// 规则: 首个「C/c + 连续数字」，统一大写
// 优先级: 广告组 > 广告活动名 > 无法解析
// ==========================================

use crate::domain::types::{AdCodeSource, MatchKey, ProductKey};
use regex::Regex;
use std::sync::LazyLock;

static PRODUCT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[Cc][0-9]+").expect("invalid regex"));

/// 从自由文本中提取产品编号
pub fn extract_product_code(text: Option<&str>) -> Option<ProductKey> {
    let text = text?;
    PRODUCT_CODE_REGEX
        .find(text)
        .map(|m| ProductKey::new(MatchKey::from_normalized(m.as_str().to_uppercase())))
}

/// 广告行编号解析
///
/// 部分活动只在广告组层级写编号；仅用活动名会把多产品共用的花费错记到一个产品上
pub fn resolve_ad_product(
    ad_group: Option<&str>,
    campaign_name: Option<&str>,
) -> Option<(ProductKey, AdCodeSource)> {
    if let Some(code) = extract_product_code(ad_group) {
        return Some((code, AdCodeSource::AdGroup));
    }
    extract_product_code(campaign_name).map(|code| (code, AdCodeSource::Campaign))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(text: &str) -> Option<String> {
        extract_product_code(Some(text)).map(|k| k.as_str().to_string())
    }

    #[test]
    fn test_extract_first_match_uppercased() {
        assert_eq!(code("C001-Brand"), Some("C001".to_string()));
        assert_eq!(code("summer_c12_c99"), Some("C12".to_string()));
        assert_eq!(code("ABC0042x"), Some("C0042".to_string()));
    }

    #[test]
    fn test_extract_no_code() {
        assert_eq!(code("Brand awareness"), None);
        assert_eq!(code("C-001"), None);
        assert_eq!(extract_product_code(None), None);
    }

    #[test]
    fn test_ad_group_preferred_over_campaign() {
        let (key, source) = resolve_ad_product(Some("grp c77"), Some("C001 campaign")).unwrap();
        assert_eq!(key.as_str(), "C77");
        assert_eq!(source, AdCodeSource::AdGroup);
    }

    #[test]
    fn test_campaign_fallback() {
        let (key, source) = resolve_ad_product(Some("generic group"), Some("C001 campaign")).unwrap();
        assert_eq!(key.as_str(), "C001");
        assert_eq!(source, AdCodeSource::Campaign);

        let (key, _) = resolve_ad_product(None, Some("x-c5")).unwrap();
        assert_eq!(key.as_str(), "C5");
    }

    #[test]
    fn test_unresolved() {
        assert!(resolve_ad_product(Some("none"), Some("none")).is_none());
        assert!(resolve_ad_product(None, None).is_none());
    }
}
