// ==========================================
// 家禽生产分析系统 - 引擎配置汇总
// ==========================================
// 职责: 配置加载、校验、快照
// 存储: JSON 文件,缺省字段回退到行业默认值
// ==========================================

use crate::config::behavior_thresholds::BehaviorThresholds;
use crate::config::cost_parameters::CostParameters;
use crate::config::egg_policy::{EggPriceTable, EggQualityPolicy, EggWeightRanges};
use crate::config::environment_profile::EnvironmentProfiles;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::genetic_standards::{GeneticStandardTable, LineColorTable};
use crate::config::husbandry_plan::HusbandryPlan;
use crate::config::lighting_program::{LightingPolicy, LightingPrograms};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

// ==========================================
// EngineConfig - 全部计算器的显式配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub genetic_standards: GeneticStandardTable,
    pub line_colors: LineColorTable,
    pub environment: EnvironmentProfiles,
    pub lighting_programs: LightingPrograms,
    pub lighting_policy: LightingPolicy,
    pub egg_quality: EggQualityPolicy,
    pub egg_prices: EggPriceTable,
    pub egg_weight_ranges: EggWeightRanges,
    pub cost: CostParameters,
    pub behavior: BehaviorThresholds,
    pub husbandry: HusbandryPlan,
}

impl EngineConfig {
    /// 从 JSON 字符串加载并校验
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载并校验
    ///
    /// # 参数
    /// - path: 配置文件路径
    ///
    /// # 返回
    /// - Ok(EngineConfig): 合并默认值后的有效配置
    /// - Err(ConfigError): 文件读取/解析/校验失败
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!("已加载引擎配置: {}", path.display());
        Ok(config)
    }

    /// 校验全部配置表
    pub fn validate(&self) -> ConfigResult<()> {
        self.genetic_standards.validate()?;
        self.environment.validate()?;
        self.lighting_programs.validate()?;
        self.egg_prices.validate()?;
        self.egg_weight_ranges.validate()?;
        self.cost.validate()?;
        self.behavior.validate()?;
        self.husbandry.validate()?;
        Ok(())
    }

    /// 获取配置快照（JSON格式）
    ///
    /// # 用途
    /// - 随评估报告一并归档,保证结果可复现
    pub fn to_snapshot_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::genetic_standards::LineStandard;
    use crate::domain::types::GeneticLine;

    #[test]
    fn test_default_config_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"cost": {"feed_unit_price": 9.25}}"#).unwrap();
        assert_eq!(config.cost.feed_unit_price, 9.25);
        assert_eq!(config.cost.daily_overhead, 500.0);
        assert_eq!(config.egg_prices, EggPriceTable::default());
        assert_eq!(config.behavior.active_min_pct, 70.0);
    }

    #[test]
    fn test_behavior_override() {
        let config =
            EngineConfig::from_json_str(r#"{"behavior": {"active_min_pct": 60.0}}"#).unwrap();
        assert_eq!(config.behavior.active_min_pct, 60.0);
        assert_eq!(
            config.behavior.stress_severity,
            crate::domain::types::AlertSeverity::Critical
        );
        assert!(EngineConfig::from_json_str(r#"{"behavior": {"active_min_pct": -1.0}}"#).is_err());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let config = EngineConfig::default();
        let json = config.to_snapshot_json().unwrap();
        let restored = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.genetic_standards.lines.push(LineStandard {
            line: GeneticLine::Other("EMPTY".into()),
            checkpoints: vec![],
        });
        let json = serde_json::to_string(&config).unwrap();
        assert!(matches!(
            EngineConfig::from_json_str(&json),
            Err(ConfigError::EmptyTable(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = EngineConfig::from_json_file("/nonexistent/engine.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/engine.json"));
    }
}
