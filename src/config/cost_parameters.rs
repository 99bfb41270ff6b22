// ==========================================
// 家禽生产分析系统 - 成本与性能参数
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 成本分摊与性能评价参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParameters {
    /// 饲料单价 (每 kg)
    pub feed_unit_price: f64,

    /// 全场每日间接费用 (按活禽占比分摊到各在养批次)
    pub daily_overhead: f64,

    /// 实际值与标准值偏差在该比例内视为达标
    pub on_target_tolerance: f64,

    /// 肉鸡出栏里程碑日龄
    pub broiler_milestone_days: i64,

    /// 里程碑提前提醒天数
    pub milestone_lead_days: i64,

    /// 累计死淘率告警阈值 (%)
    pub mortality_warning_pct: f64,
    pub mortality_critical_pct: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            feed_unit_price: 8.5,
            daily_overhead: 500.0,
            on_target_tolerance: 0.05,
            broiler_milestone_days: 42,
            milestone_lead_days: 3,
            mortality_warning_pct: 3.0,
            mortality_critical_pct: 5.0,
        }
    }
}

impl CostParameters {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.feed_unit_price < 0.0 || self.daily_overhead < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "cost.feed_unit_price/daily_overhead".to_string(),
                message: "成本参数不能为负".to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.on_target_tolerance) {
            return Err(ConfigError::InvalidValue {
                field: "cost.on_target_tolerance".to_string(),
                message: format!("应在 [0, 1) 内,实际 {}", self.on_target_tolerance),
            });
        }
        if self.mortality_warning_pct > self.mortality_critical_pct {
            return Err(ConfigError::InvalidValue {
                field: "cost.mortality_warning_pct".to_string(),
                message: "warning 阈值不能高于 critical 阈值".to_string(),
            });
        }
        Ok(())
    }
}
