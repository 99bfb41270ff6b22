// ==========================================
// 家禽生产分析系统 - 核心库
// ==========================================
// 系统定位: 生产性能 / 环境 / 蛋品 / 光照分析与告警
// 计算器为纯函数; I/O 仅在仓储层与导入层
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 阈值表/价格表/阶段表
pub mod config;

// 引擎层 - 计算器
pub mod engine;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// API 层 - 业务接口
pub mod api;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AlertSeverity, BatchStatus, EggColor, EggGrade, FeedingActivityLevel, GeneticLine,
    ProductionType, VentilationStatus,
};

// 领域实体
pub use domain::{
    Alert, AlertKind, Batch, BirdBehaviorObservation, CostSnapshot, DailyRecord,
    EggProductionRecord, EnvironmentalReading, FarmSnapshot, LightingReading,
};

// 配置
pub use config::{ConfigError, EngineConfig};

// 引擎
pub use engine::{
    AgeCalculator, AlertAggregator, BehaviorMonitor, EconomicsCalculator, EggProductionAnalyzer,
    EnvironmentalScoringEngine, GeneticStandardResolver, HusbandryScheduler,
    LightingComplianceEvaluator, LotEvaluationOrchestrator, LotReport,
    PerformanceIndexCalculator, TimeSeriesAggregator,
};

// API
pub use api::{AnalyticsApi, ApiError, FarmApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "家禽生产分析系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
