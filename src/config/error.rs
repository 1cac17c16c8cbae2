// ==========================================
// 电商利润核算 - 配置错误类型
// ==========================================

use crate::domain::types::SourceRole;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("列位置冲突 ({role}): 字段 {first} 与 {second} 同指第 {index} 列")]
    DuplicateColumn {
        role: SourceRole,
        index: usize,
        first: &'static str,
        second: &'static str,
    },

    #[error("配置值非法 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("未知的文件编码: {0}")]
    UnknownEncoding(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
