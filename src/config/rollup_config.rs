// ==========================================
// 电商利润核算 - 核算参数
// ==========================================
// 职责: 补税系数、库存倍数、CSV 编码顺序；加载后统一校验
// ==========================================

use crate::config::column_layout::ColumnLayout;
use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 核算参数（持久化于 JSON 配置文件，缺省字段取默认值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupConfig {
    /// 各输入文件的列位置
    pub columns: ColumnLayout,

    /// 广告费补税系数（逐行乘，再汇总）
    pub ad_tax_markup: f64,

    /// 到岸成本系数（库存货值/滞销货值）
    pub landed_cost_markup: f64,

    /// 安全库存 = 销量 × 该系数
    pub safety_stock_multiplier: f64,

    /// 冗余阈值 = 销量 × 该系数
    pub redundancy_multiplier: f64,

    /// CSV 编码回退顺序（encoding_rs 标签）
    pub csv_encodings: Vec<String>,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            columns: ColumnLayout::default(),
            ad_tax_markup: 1.10,
            landed_cost_markup: 1.2,
            safety_stock_multiplier: 3.0,
            redundancy_multiplier: 8.0,
            csv_encodings: vec![
                "utf-8".to_string(),
                "euc-kr".to_string(),
                "gb18030".to_string(),
            ],
        }
    }
}

impl RollupConfig {
    /// 边界校验（加载后仅执行一次）
    pub fn validate(&self) -> ConfigResult<()> {
        self.columns.validate()?;

        positive("ad_tax_markup", self.ad_tax_markup)?;
        positive("landed_cost_markup", self.landed_cost_markup)?;
        non_negative("safety_stock_multiplier", self.safety_stock_multiplier)?;
        non_negative("redundancy_multiplier", self.redundancy_multiplier)?;

        if self.csv_encodings.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "csv_encodings".to_string(),
                value: "[]".to_string(),
                message: "至少需要一种编码".to_string(),
            });
        }
        for label in &self.csv_encodings {
            if encoding_rs::Encoding::for_label(label.trim().as_bytes()).is_none() {
                return Err(ConfigError::UnknownEncoding(label.clone()));
            }
        }
        Ok(())
    }
}

fn positive(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            message: "必须为正数".to_string(),
        })
    }
}

fn non_negative(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            message: "不能为负数".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RollupConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ad_tax_markup, 1.10);
        assert_eq!(config.landed_cost_markup, 1.2);
    }

    #[test]
    fn test_negative_markup_rejected() {
        let config = RollupConfig {
            ad_tax_markup: -1.0,
            ..RollupConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let config = RollupConfig {
            csv_encodings: vec!["klingon".to_string()],
            ..RollupConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownEncoding(_))
        ));
    }
}
