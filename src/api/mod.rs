// ==========================================
// 家禽生产分析系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供展示层与命令行调用
// ==========================================

pub mod analytics_api;
pub mod error;
pub mod farm_api;

// 重导出核心类型
pub use analytics_api::AnalyticsApi;
pub use error::{ApiError, ApiResult};
pub use farm_api::FarmApi;
