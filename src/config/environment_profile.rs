// ==========================================
// 家禽生产分析系统 - 环境阈值配置
// ==========================================
// 肉鸡: 按日龄分段 (第1周/第2周/第3周/第4周+)
// 蛋鸡: 固定阈值,与日龄无关
// 简化通风模型 = 受限配置 (固定阈值 + 无 emergency 级别)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::{AlertSeverity, ProductionType, VentilationStatus};
use serde::{Deserialize, Serialize};

// ==========================================
// EnvironmentalThresholds - 单组阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalThresholds {
    pub temp_min: f64,
    pub temp_max: f64,
    pub temp_ideal: f64,
    pub humidity_min: f64,
    pub humidity_max: f64,
    pub humidity_ideal: f64,
    pub min_ventilation_rate: f64,
    pub max_co2: f64,
    pub max_ammonia: f64,
    #[serde(default)]
    pub min_oxygen: Option<f64>, // 仅部分配置启用
}

impl EnvironmentalThresholds {
    fn validate(&self, table: &str) -> ConfigResult<()> {
        if !(self.temp_min <= self.temp_ideal && self.temp_ideal <= self.temp_max) {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.temp", table),
                message: "要求 temp_min <= temp_ideal <= temp_max".to_string(),
            });
        }
        if !(self.humidity_min <= self.humidity_ideal && self.humidity_ideal <= self.humidity_max)
        {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.humidity", table),
                message: "要求 humidity_min <= humidity_ideal <= humidity_max".to_string(),
            });
        }
        if self.min_ventilation_rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.min_ventilation_rate", table),
                message: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// AgeBand - 日龄分段
// ==========================================
// max_age_days = None 表示开放上界 (最后一段)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBand {
    #[serde(default)]
    pub max_age_days: Option<i64>,
    pub thresholds: EnvironmentalThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ThresholdSchedule {
    AgeBanded { bands: Vec<AgeBand> },
    Fixed { thresholds: EnvironmentalThresholds },
}

impl ThresholdSchedule {
    /// 按日龄解析阈值: 取第一个 age <= max_age_days 的分段
    pub fn resolve(&self, age_days: i64) -> Option<&EnvironmentalThresholds> {
        match self {
            ThresholdSchedule::Fixed { thresholds } => Some(thresholds),
            ThresholdSchedule::AgeBanded { bands } => bands
                .iter()
                .find(|b| b.max_age_days.map_or(true, |max| age_days <= max))
                .or_else(|| bands.last())
                .map(|b| &b.thresholds),
        }
    }

    fn validate(&self, table: &str) -> ConfigResult<()> {
        match self {
            ThresholdSchedule::Fixed { thresholds } => thresholds.validate(table),
            ThresholdSchedule::AgeBanded { bands } => {
                if bands.is_empty() {
                    return Err(ConfigError::EmptyTable(table.to_string()));
                }
                let bounded: Vec<i64> = bands.iter().filter_map(|b| b.max_age_days).collect();
                if bounded.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(ConfigError::UnsortedTable {
                        table: table.to_string(),
                    });
                }
                if bands[..bands.len() - 1]
                    .iter()
                    .any(|b| b.max_age_days.is_none())
                {
                    return Err(ConfigError::InvalidValue {
                        field: table.to_string(),
                        message: "只有最后一个分段可以不设上界".to_string(),
                    });
                }
                for band in bands {
                    band.thresholds.validate(table)?;
                }
                Ok(())
            }
        }
    }
}

// ==========================================
// 告警分层规则
// ==========================================
// 超出边界 margin 以上 → far 级别; 超出边界但在 margin 内 → near 级别
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    pub margin: f64,
    pub far: AlertSeverity,
    pub near: AlertSeverity,
}

impl TierRule {
    pub fn new(margin: f64, far: AlertSeverity, near: AlertSeverity) -> Self {
        Self { margin, far, near }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertTiers {
    pub temperature_low: TierRule,
    pub temperature_high: TierRule,
    pub humidity_low: TierRule,
    pub humidity_high: TierRule,
}

impl Default for AlertTiers {
    fn default() -> Self {
        Self {
            temperature_low: TierRule::new(3.0, AlertSeverity::Emergency, AlertSeverity::Warning),
            temperature_high: TierRule::new(3.0, AlertSeverity::Emergency, AlertSeverity::Warning),
            humidity_low: TierRule::new(10.0, AlertSeverity::Warning, AlertSeverity::Info),
            humidity_high: TierRule::new(10.0, AlertSeverity::Critical, AlertSeverity::Warning),
        }
    }
}

/// 气体硬限: 超过 max 为 warning,超过硬限为 critical
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasHardLimits {
    pub co2_critical_ppm: f64,
    pub ammonia_critical_ppm: f64,
}

impl Default for GasHardLimits {
    fn default() -> Self {
        Self {
            co2_critical_ppm: 5000.0,
            ammonia_critical_ppm: 40.0,
        }
    }
}

// ==========================================
// EnvironmentProfile - 带能力标签的环境配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentProfile {
    pub schedule: ThresholdSchedule,
    #[serde(default)]
    pub tiers: AlertTiers,
    #[serde(default)]
    pub gas_limits: GasHardLimits,
    #[serde(default = "default_ceiling")]
    pub severity_ceiling: AlertSeverity, // 能力上限
}

fn default_ceiling() -> AlertSeverity {
    AlertSeverity::Emergency
}

impl EnvironmentProfile {
    /// 肉鸡分日龄阈值
    pub fn broiler_age_banded() -> Self {
        let band = |max_age_days, temp: [f64; 3], vent, ammonia| AgeBand {
            max_age_days,
            thresholds: EnvironmentalThresholds {
                temp_min: temp[0],
                temp_max: temp[1],
                temp_ideal: temp[2],
                humidity_min: 50.0,
                humidity_max: 70.0,
                humidity_ideal: 60.0,
                min_ventilation_rate: vent,
                max_co2: 3000.0,
                max_ammonia: ammonia,
                min_oxygen: None,
            },
        };
        Self {
            schedule: ThresholdSchedule::AgeBanded {
                bands: vec![
                    band(Some(7), [30.0, 34.0, 32.0], 0.8, 10.0),
                    band(Some(14), [27.0, 30.0, 28.0], 1.2, 15.0),
                    band(Some(21), [24.0, 27.0, 25.0], 1.5, 20.0),
                    band(None, [18.0, 24.0, 21.0], 2.0, 25.0),
                ],
            },
            tiers: AlertTiers::default(),
            gas_limits: GasHardLimits::default(),
            severity_ceiling: AlertSeverity::Emergency,
        }
    }

    /// 蛋鸡固定阈值
    pub fn layer_fixed() -> Self {
        Self {
            schedule: ThresholdSchedule::Fixed {
                thresholds: EnvironmentalThresholds {
                    temp_min: 18.0,
                    temp_max: 24.0,
                    temp_ideal: 21.0,
                    humidity_min: 40.0,
                    humidity_max: 70.0,
                    humidity_ideal: 55.0,
                    min_ventilation_rate: 1.5,
                    max_co2: 3000.0,
                    max_ammonia: 20.0,
                    min_oxygen: None,
                },
            },
            tiers: AlertTiers::default(),
            gas_limits: GasHardLimits::default(),
            severity_ceiling: AlertSeverity::Emergency,
        }
    }

    /// 肉鸡简化通风监测: 固定阈值、单层告警、最高 critical
    pub fn simplified_broiler_ventilation() -> Self {
        Self {
            schedule: ThresholdSchedule::Fixed {
                thresholds: EnvironmentalThresholds {
                    temp_min: 23.0,
                    temp_max: 30.0,
                    temp_ideal: 26.5,
                    humidity_min: 50.0,
                    humidity_max: 70.0,
                    humidity_ideal: 60.0,
                    min_ventilation_rate: 1.0,
                    max_co2: 3000.0,
                    max_ammonia: 10.0,
                    min_oxygen: Some(18.0),
                },
            },
            tiers: AlertTiers {
                temperature_low: TierRule::new(3.0, AlertSeverity::Warning, AlertSeverity::Warning),
                temperature_high: TierRule::new(3.0, AlertSeverity::Warning, AlertSeverity::Warning),
                humidity_low: TierRule::new(10.0, AlertSeverity::Info, AlertSeverity::Info),
                humidity_high: TierRule::new(10.0, AlertSeverity::Info, AlertSeverity::Info),
            },
            gas_limits: GasHardLimits {
                co2_critical_ppm: 5000.0,
                ammonia_critical_ppm: 10.0,
            },
            severity_ceiling: AlertSeverity::Critical,
        }
    }

    pub fn validate(&self, table: &str) -> ConfigResult<()> {
        self.schedule.validate(table)?;
        for rule in [
            self.tiers.temperature_low,
            self.tiers.temperature_high,
            self.tiers.humidity_low,
            self.tiers.humidity_high,
        ] {
            if rule.margin < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.tiers", table),
                    message: "margin 不能为负".to_string(),
                });
            }
        }
        Ok(())
    }
}

// ==========================================
// 评分权重
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub temp_penalty_per_unit: f64,
    pub temp_penalty_cap: f64,
    pub humidity_penalty_per_unit: f64,
    pub humidity_penalty_cap: f64,
    pub ventilation_penalty_excellent: f64,
    pub ventilation_penalty_good: f64,
    pub ventilation_penalty_fair: f64,
    pub ventilation_penalty_poor: f64,
    pub ventilation_penalty_critical: f64,
    pub co2_ppm_per_point: f64,
    pub co2_penalty_cap: f64,
    pub ammonia_penalty_per_unit: f64,
    pub ammonia_penalty_cap: f64,
}

impl ScoringWeights {
    pub fn ventilation_penalty(&self, status: VentilationStatus) -> f64 {
        match status {
            VentilationStatus::Excellent => self.ventilation_penalty_excellent,
            VentilationStatus::Good => self.ventilation_penalty_good,
            VentilationStatus::Fair => self.ventilation_penalty_fair,
            VentilationStatus::Poor => self.ventilation_penalty_poor,
            VentilationStatus::Critical => self.ventilation_penalty_critical,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            temp_penalty_per_unit: 5.0,
            temp_penalty_cap: 30.0,
            humidity_penalty_per_unit: 0.5,
            humidity_penalty_cap: 25.0,
            ventilation_penalty_excellent: 0.0,
            ventilation_penalty_good: 5.0,
            ventilation_penalty_fair: 15.0,
            ventilation_penalty_poor: 25.0,
            ventilation_penalty_critical: 30.0,
            co2_ppm_per_point: 100.0,
            co2_penalty_cap: 10.0,
            ammonia_penalty_per_unit: 0.5,
            ammonia_penalty_cap: 10.0,
        }
    }
}

/// 建议生成容差: 偏离理想值超过容差才给出调整建议
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBands {
    pub temp_tolerance: f64,
    pub humidity_tolerance: f64,
}

impl Default for RecommendationBands {
    fn default() -> Self {
        Self {
            temp_tolerance: 1.0,
            humidity_tolerance: 5.0,
        }
    }
}

/// 通风状态推导规则
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VentilationStatusRules {
    pub critical_co2: f64,
    pub critical_ammonia: f64,
    pub poor_rate_ratio: f64,
    pub poor_co2: f64,
    pub poor_ammonia: f64,
    pub fair_rate_ratio: f64,
    pub fair_co2: f64,
    pub fair_ammonia: f64,
    pub excellent_rate_ratio: f64,
    pub excellent_co2: f64,
    pub excellent_ammonia: f64,
}

impl Default for VentilationStatusRules {
    fn default() -> Self {
        Self {
            critical_co2: 5000.0,
            critical_ammonia: 50.0,
            poor_rate_ratio: 0.5,
            poor_co2: 4000.0,
            poor_ammonia: 35.0,
            fair_rate_ratio: 0.8,
            fair_co2: 3500.0,
            fair_ammonia: 25.0,
            excellent_rate_ratio: 1.2,
            excellent_co2: 2000.0,
            excellent_ammonia: 15.0,
        }
    }
}

// ==========================================
// EnvironmentProfiles - 按生产类型汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentProfiles {
    pub broiler: EnvironmentProfile,
    pub layer: EnvironmentProfile,
    pub scoring: ScoringWeights,
    pub recommendation: RecommendationBands,
    pub ventilation_rules: VentilationStatusRules,
}

impl EnvironmentProfiles {
    pub fn profile_for(&self, production_type: ProductionType) -> &EnvironmentProfile {
        match production_type {
            ProductionType::Broiler => &self.broiler,
            ProductionType::Layer => &self.layer,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.broiler.validate("environment.broiler")?;
        self.layer.validate("environment.layer")
    }
}

impl Default for EnvironmentProfiles {
    fn default() -> Self {
        Self {
            broiler: EnvironmentProfile::broiler_age_banded(),
            layer: EnvironmentProfile::layer_fixed(),
            scoring: ScoringWeights::default(),
            recommendation: RecommendationBands::default(),
            ventilation_rules: VentilationStatusRules::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broiler_band_resolution() {
        let profile = EnvironmentProfile::broiler_age_banded();
        assert_eq!(profile.schedule.resolve(0).unwrap().temp_ideal, 32.0);
        assert_eq!(profile.schedule.resolve(7).unwrap().temp_ideal, 32.0);
        assert_eq!(profile.schedule.resolve(8).unwrap().temp_ideal, 28.0);
        assert_eq!(profile.schedule.resolve(21).unwrap().temp_ideal, 25.0);
        assert_eq!(profile.schedule.resolve(22).unwrap().temp_ideal, 21.0);
        assert_eq!(profile.schedule.resolve(300).unwrap().temp_ideal, 21.0);
    }

    #[test]
    fn test_layer_fixed_ignores_age() {
        let profile = EnvironmentProfile::layer_fixed();
        assert_eq!(
            profile.schedule.resolve(1),
            profile.schedule.resolve(400)
        );
    }

    #[test]
    fn test_defaults_validate() {
        assert!(EnvironmentProfiles::default().validate().is_ok());
        assert!(EnvironmentProfile::simplified_broiler_ventilation()
            .validate("simplified")
            .is_ok());
    }

    #[test]
    fn test_open_band_must_be_last() {
        let mut profile = EnvironmentProfile::broiler_age_banded();
        if let ThresholdSchedule::AgeBanded { bands } = &mut profile.schedule {
            bands[0].max_age_days = None;
        }
        assert!(profile.validate("broiler").is_err());
    }

    #[test]
    fn test_schedule_json_tagged() {
        let json = serde_json::to_value(EnvironmentProfile::layer_fixed().schedule).unwrap();
        assert_eq!(json["mode"], "fixed");
    }
}
