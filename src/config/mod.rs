// ==========================================
// 家禽生产分析系统 - 配置层
// ==========================================
// 职责: 将固定阈值/价格表/阶段表显式化为配置结构
// 支持按场/按地区覆写,便于确定性测试
// ==========================================

pub mod behavior_thresholds;
pub mod cost_parameters;
pub mod egg_policy;
pub mod engine_config;
pub mod environment_profile;
pub mod error;
pub mod genetic_standards;
pub mod husbandry_plan;
pub mod lighting_program;

// 重导出核心配置
pub use behavior_thresholds::BehaviorThresholds;
pub use cost_parameters::CostParameters;
pub use egg_policy::{EggPriceTable, EggQualityPolicy, EggWeightRanges};
pub use engine_config::EngineConfig;
pub use environment_profile::{
    AgeBand, AlertTiers, EnvironmentProfile, EnvironmentProfiles, EnvironmentalThresholds,
    GasHardLimits, RecommendationBands, ScoringWeights, ThresholdSchedule, TierRule,
    VentilationStatusRules,
};
pub use error::{ConfigError, ConfigResult};
pub use genetic_standards::{
    GeneticStandardTable, LineColorEntry, LineColorTable, LineStandard, StandardCheckpoint,
};
pub use husbandry_plan::{
    AdministrationRoute, FeedingPeriod, FeedingRestrictionPlan, HusbandryPlan, NutritionPhase,
    SupplementSchedule, SupplementSource,
};
pub use lighting_program::{LightingPolicy, LightingProgramEntry, LightingPrograms};
