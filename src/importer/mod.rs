// ==========================================
// 家禽生产分析系统 - 数据导入模块
// ==========================================
// 职责: 将外部文件装载为 FarmSnapshot / DailyRecord
// 支持: JSON 全场快照 / CSV 生产日报
// ==========================================

pub mod error;
pub mod snapshot_loader;

pub use error::{ImportError, ImportResult};
pub use snapshot_loader::{
    load_daily_records_csv, load_snapshot, parse_daily_records_csv, parse_snapshot,
};
