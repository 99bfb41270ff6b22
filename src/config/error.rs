// ==========================================
// 家禽生产分析系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 加载错误 =====
    #[error("配置文件读取失败: {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    // ===== 校验错误 =====
    #[error("配置表为空: {0}")]
    EmptyTable(String),

    #[error("配置表未按升序排列: {table}")]
    UnsortedTable { table: String },

    #[error("配置值无效 (field={field}): {message}")]
    InvalidValue { field: String, message: String },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
