// ==========================================
// 家禽生产分析系统 - 光照方案配置
// ==========================================
// 按生产类型的周龄光照表 {光照时长, 光照强度}
// 解析策略: 沿用最近已知 (取 week <= 当前周的最后一条,不向前看)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::ProductionType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingProgramEntry {
    pub week: i64,
    pub light_hours: f64,
    pub intensity_lux: f64,
    #[serde(default)]
    pub description: Option<String>,
}

fn entry(week: i64, light_hours: f64, intensity_lux: f64, description: &str) -> LightingProgramEntry {
    LightingProgramEntry {
        week,
        light_hours,
        intensity_lux,
        description: Some(description.to_string()),
    }
}

// ==========================================
// LightingPrograms - 光照方案表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingPrograms {
    pub broiler: Vec<LightingProgramEntry>,
    pub layer: Vec<LightingProgramEntry>, // 刺激期 (16-27周) + 维持期 (28周+)
}

impl LightingPrograms {
    pub fn program_for(&self, production_type: ProductionType) -> &[LightingProgramEntry] {
        match production_type {
            ProductionType::Broiler => &self.broiler,
            ProductionType::Layer => &self.layer,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (table, program) in [("lighting.broiler", &self.broiler), ("lighting.layer", &self.layer)] {
            if program.is_empty() {
                return Err(ConfigError::EmptyTable(table.to_string()));
            }
            if program.windows(2).any(|w| w[0].week >= w[1].week) {
                return Err(ConfigError::UnsortedTable {
                    table: table.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for LightingPrograms {
    fn default() -> Self {
        Self {
            broiler: vec![
                entry(1, 23.0, 20.0, "第1周: 近乎连续光照,保证采食"),
                entry(2, 18.0, 15.0, "第2周: 缩短光照,预防腿病"),
                entry(3, 18.0, 10.0, "第3周: 维持时长,降低强度"),
                entry(4, 18.0, 10.0, "第4周及以后: 维持至出栏"),
            ],
            layer: vec![
                entry(16, 10.0, 5.0, "预刺激: 自然光照"),
                entry(17, 11.0, 10.0, "开始光照刺激"),
                entry(18, 12.0, 10.0, "逐步增加 +1 小时"),
                entry(19, 13.0, 10.0, "逐步增加 +1 小时"),
                entry(20, 14.0, 10.0, "逐步增加 +1 小时"),
                entry(21, 15.0, 10.0, "逐步增加 +1 小时"),
                entry(22, 15.5, 10.0, "缓慢增加 +30 分钟"),
                entry(23, 16.0, 10.0, "缓慢增加 +30 分钟"),
                entry(24, 16.0, 10.0, "维持以达产蛋高峰"),
                entry(25, 16.0, 10.0, "维持以达产蛋高峰"),
                entry(26, 16.5, 10.0, "最终调整"),
                entry(27, 17.0, 10.0, "最大光照时长"),
                entry(28, 17.0, 10.0, "高峰期维持"),
                entry(40, 17.0, 10.0, "整个产蛋周期维持"),
                entry(60, 16.5, 10.0, "产蛋后期小幅下调"),
            ],
        }
    }
}

// ==========================================
// LightingPolicy - 光照告警与评价阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingPolicy {
    pub hours_warning_deviation: f64,   // > 0.5h → warning / 超标天
    pub hours_critical_deviation: f64,  // > 1.0h → critical
    pub intensity_warning_pct: f64,     // > 30% → warning
    pub layer_decrease_margin: f64,     // 蛋鸡实际低于目标 0.5h 以上 → critical
    pub consistency_stddev_factor: f64, // consistency = 100 - stdDev × 20
    pub adherence_critical_pct: f64,    // < 80
    pub consistency_warning_pct: f64,   // < 85
    pub layer_min_photoperiod: f64,     // < 15h
}

impl Default for LightingPolicy {
    fn default() -> Self {
        Self {
            hours_warning_deviation: 0.5,
            hours_critical_deviation: 1.0,
            intensity_warning_pct: 30.0,
            layer_decrease_margin: 0.5,
            consistency_stddev_factor: 20.0,
            adherence_critical_pct: 80.0,
            consistency_warning_pct: 85.0,
            layer_min_photoperiod: 15.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_programs_valid_and_sorted() {
        let programs = LightingPrograms::default();
        assert!(programs.validate().is_ok());
        assert_eq!(programs.program_for(ProductionType::Broiler).len(), 4);
        assert_eq!(programs.program_for(ProductionType::Layer)[0].week, 16);
    }
}
