// ==========================================
// 家禽生产分析系统 - 引擎层
// ==========================================
// 职责: 实现生产性能/环境/蛋品/光照/行为/经济分析计算器
// 红线: 计算器为纯函数,不做 I/O,缺数据时返回中性默认值
// ==========================================

pub mod age;
pub mod aggregator;
pub mod alert_aggregator;
pub mod behavior;
pub mod economics;
pub mod egg_production;
pub mod environment;
pub mod genetic_standard;
pub mod husbandry;
pub mod lighting;
pub mod orchestrator;
pub mod performance;

// 重导出核心引擎
pub use age::{AgeCalculator, DEFAULT_LEAD_DAYS};
pub use aggregator::{AggregatePoint, BatchAggregate, TimeSeriesAggregator, WeightSample};
pub use alert_aggregator::{AlertAggregator, AlertDigest, SeverityCounts};
pub use behavior::{BehaviorAssessment, BehaviorMonitor, LotDashboard, MonitoringStatus};
pub use economics::{
    BiologicalAssetValuation, EconomicsCalculator, LayerDailyEconomics, LayerDailyInput,
    SaleRequest, SaleSettlement, SaleType, SalesTotals, WeeklyProfit,
};
pub use egg_production::{
    EggEconomics, EggProductionAnalyzer, GeneticLinePerformance, GradeValue, ProductionSummary,
};
pub use environment::{EnvironmentAssessment, EnvironmentalScoringEngine};
pub use genetic_standard::GeneticStandardResolver;
pub use husbandry::HusbandryScheduler;
pub use lighting::{
    AdjustmentDirection, EffectivenessLevel, LightingCompliance, LightingComplianceEvaluator,
    LightingEffectiveness, LightingEvaluation, LightingLog, LightingReminder, LightingTarget,
    LightingWindow,
};
pub use orchestrator::{EggReport, LotEvaluationOrchestrator, LotReport, LotSnapshot};
pub use performance::{
    ComparisonRow, CostAllocation, DeviationStatus, KpiResult, PerformanceIndexCalculator,
};
