// ==========================================
// 家禽生产分析系统 - 领域模型层
// ==========================================
// 职责: 定义批次、现场记录、告警等领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod alert;
pub mod batch;
pub mod records;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use alert::{Alert, AlertDomain, AlertKind};
pub use batch::{Batch, CostSnapshot};
pub use records::{
    BirdBehaviorObservation, ColorCounts, DailyRecord, EggProductionRecord, EnvironmentalReading,
    GradeCounts, LightingReading,
};
pub use snapshot::FarmSnapshot;
pub use types::{
    AlertSeverity, BatchStatus, EggColor, EggGrade, FeedingActivityLevel, GeneticLine,
    ProductionType, VentilationStatus,
};
