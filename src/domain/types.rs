// ==========================================
// 电商利润核算 - 领域类型定义
// ==========================================
// 职责: 匹配键 / 三类键空间 / 数据源角色
// 红线: SKU 键、产品键、条码键互不混用
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// MatchKey - 标准化匹配键
// ==========================================
// 只能通过 data_cleaner::normalize_key 构造，保证已清洗
// 空键永不参与匹配
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchKey(String);

impl MatchKey {
    /// 由已清洗的文本构造（仅供清洗器与编号提取器使用）
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// 三个键空间使用独立新类型，编译期禁止混用
macro_rules! key_space {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(MatchKey);

        impl $name {
            pub fn new(key: MatchKey) -> Self {
                Self(key)
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

key_space!(
    /// SKU 键（细粒度，每个可售变体一个）
    SkuKey
);
key_space!(
    /// 产品键（粗粒度，聚合多个 SKU）
    ProductKey
);
key_space!(
    /// 条码键（第二库存源使用的替代标识）
    BarcodeKey
);

// ==========================================
// 数据源角色
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRole {
    Master,       // 基础信息表
    Sales,        // 销售表
    Ads,          // 广告表
    InventorySku, // 库存表（按 SKU）
    InventoryBarcode, // 库存表（按条码）
}

impl SourceRole {
    pub fn label(&self) -> &'static str {
        match self {
            SourceRole::Master => "基础信息表(Master)",
            SourceRole::Sales => "销售表(Sales)",
            SourceRole::Ads => "广告表(Ads)",
            SourceRole::InventorySku => "库存表(SKU)",
            SourceRole::InventoryBarcode => "库存表(条码)",
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// 广告编号来源
// ==========================================
// 广告组优先，活动名兜底
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdCodeSource {
    AdGroup,  // 广告组
    Campaign, // 广告活动名
}

impl fmt::Display for AdCodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdCodeSource::AdGroup => write!(f, "广告组"),
            AdCodeSource::Campaign => write!(f, "广告活动"),
        }
    }
}
