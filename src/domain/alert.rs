// ==========================================
// 家禽生产分析系统 - 告警领域模型
// ==========================================
// 所有计算器共用同一告警级别体系
// 告警为建议性输出,不作为控制流信号
// ==========================================

use crate::domain::types::AlertSeverity;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// AlertKind - 告警类型标签
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    // ===== 环境 =====
    Temperature,
    Humidity,
    Ventilation,
    AirQuality,
    // ===== 蛋品 =====
    EggQuality,
    EggLoss,
    EggWeight,
    ColorPurity,
    // ===== 光照 =====
    LightHoursDeviation,
    LightIntensityDeviation,
    PhotoperiodDecrease,
    // ===== 生产性能 =====
    AgeMilestone,
    Mortality,
    // ===== 禽群行为 =====
    Behavior,
}

impl AlertKind {
    /// 告警来源领域
    pub fn domain(&self) -> AlertDomain {
        match self {
            AlertKind::Temperature
            | AlertKind::Humidity
            | AlertKind::Ventilation
            | AlertKind::AirQuality => AlertDomain::Environment,
            AlertKind::EggQuality
            | AlertKind::EggLoss
            | AlertKind::EggWeight
            | AlertKind::ColorPurity => AlertDomain::EggProduction,
            AlertKind::LightHoursDeviation
            | AlertKind::LightIntensityDeviation
            | AlertKind::PhotoperiodDecrease => AlertDomain::Lighting,
            AlertKind::AgeMilestone | AlertKind::Mortality => AlertDomain::Performance,
            AlertKind::Behavior => AlertDomain::Welfare,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertKind::Temperature => "temperature",
            AlertKind::Humidity => "humidity",
            AlertKind::Ventilation => "ventilation",
            AlertKind::AirQuality => "air_quality",
            AlertKind::EggQuality => "egg_quality",
            AlertKind::EggLoss => "egg_loss",
            AlertKind::EggWeight => "egg_weight",
            AlertKind::ColorPurity => "color_purity",
            AlertKind::LightHoursDeviation => "light_hours_deviation",
            AlertKind::LightIntensityDeviation => "light_intensity_deviation",
            AlertKind::PhotoperiodDecrease => "photoperiod_decrease",
            AlertKind::AgeMilestone => "age_milestone",
            AlertKind::Mortality => "mortality",
            AlertKind::Behavior => "behavior",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertDomain {
    Environment,
    EggProduction,
    Lighting,
    Performance,
    Welfare,
}

// ==========================================
// Alert - 告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,        // 告警描述 (已本地化)
    pub recommendation: String, // 处置建议 (已本地化)
}

impl Alert {
    pub fn new(
        kind: AlertKind,
        severity: AlertSeverity,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }

    /// 按能力上限截断级别
    pub fn capped_at(mut self, ceiling: AlertSeverity) -> Self {
        if self.severity > ceiling {
            self.severity = ceiling;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capped_at_lowers_only_above_ceiling() {
        let alert = Alert::new(AlertKind::Temperature, AlertSeverity::Emergency, "m", "r");
        assert_eq!(
            alert.clone().capped_at(AlertSeverity::Critical).severity,
            AlertSeverity::Critical
        );
        let info = Alert::new(AlertKind::Humidity, AlertSeverity::Info, "m", "r");
        assert_eq!(
            info.capped_at(AlertSeverity::Critical).severity,
            AlertSeverity::Info
        );
    }

    #[test]
    fn test_kind_domain() {
        assert_eq!(AlertKind::AirQuality.domain(), AlertDomain::Environment);
        assert_eq!(AlertKind::PhotoperiodDecrease.domain(), AlertDomain::Lighting);
        assert_eq!(AlertKind::ColorPurity.domain(), AlertDomain::EggProduction);
        assert_eq!(AlertKind::Behavior.domain(), AlertDomain::Welfare);
        assert_eq!(
            serde_json::to_string(&AlertKind::AirQuality).unwrap(),
            "\"air_quality\""
        );
    }
}
