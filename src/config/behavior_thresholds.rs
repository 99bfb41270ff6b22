// ==========================================
// 家禽生产分析系统 - 禽群行为巡检阈值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::AlertSeverity;
use serde::{Deserialize, Serialize};

/// 行为巡检告警阈值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorThresholds {
    /// 活跃禽只占比低于该值 (%) 告警
    pub active_min_pct: f64,

    /// 活跃度不足的告警级别
    pub low_activity_severity: AlertSeverity,

    /// 出现应激迹象的告警级别
    pub stress_severity: AlertSeverity,

    /// 出现异常行为 (喘息/嗜睡/扎堆等) 的告警级别
    pub abnormal_behavior_severity: AlertSeverity,
}

impl Default for BehaviorThresholds {
    fn default() -> Self {
        Self {
            active_min_pct: 70.0,
            low_activity_severity: AlertSeverity::Warning,
            stress_severity: AlertSeverity::Critical,
            abnormal_behavior_severity: AlertSeverity::Critical,
        }
    }
}

impl BehaviorThresholds {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=100.0).contains(&self.active_min_pct) {
            return Err(ConfigError::InvalidValue {
                field: "behavior.active_min_pct".to_string(),
                message: format!("应在 [0, 100] 内,实际 {}", self.active_min_pct),
            });
        }
        // 行为巡检不产生 emergency 级告警
        let levels = [
            self.low_activity_severity,
            self.stress_severity,
            self.abnormal_behavior_severity,
        ];
        if levels.iter().any(|s| *s == AlertSeverity::Emergency) {
            return Err(ConfigError::InvalidValue {
                field: "behavior.*_severity".to_string(),
                message: "行为告警级别不能为 emergency".to_string(),
            });
        }
        Ok(())
    }
}
