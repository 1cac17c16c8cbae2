// ==========================================
// 电商利润核算 - 配置管理器
// ==========================================
// 职责: 配置加载（显式路径 > 环境变量 > 用户配置目录 > 默认值）
// 存储: JSON 文件
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::rollup_config::RollupConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 显式指定配置文件的环境变量
pub const CONFIG_PATH_ENV: &str = "PROFIT_ROLLUP_CONFIG";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: RollupConfig,
    loaded_from: Option<PathBuf>,
}

impl ConfigManager {
    /// 按优先级加载配置
    ///
    /// # 优先级
    /// 1. explicit_path（命令行 --config）
    /// 2. 环境变量 PROFIT_ROLLUP_CONFIG
    /// 3. <config_dir>/profit-rollup/config.json（存在时）
    /// 4. 内置默认值
    pub fn load(explicit_path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Self::from_file(Path::new(trimmed));
            }
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
            debug!(path = %path.display(), "用户配置文件不存在，使用默认配置");
        }

        Self::from_config(RollupConfig::default())
    }

    /// 从 JSON 文件加载
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: RollupConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.validate()?;
        info!(path = %path.display(), "配置加载完成");

        Ok(Self {
            config,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// 使用已构造的配置（测试/库调用）
    pub fn from_config(config: RollupConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            loaded_from: None,
        })
    }

    pub fn config(&self) -> &RollupConfig {
        &self.config
    }

    pub fn into_config(self) -> RollupConfig {
        self.config
    }

    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

/// 用户配置目录下的默认配置路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("profit-rollup").join("config.json"))
}
