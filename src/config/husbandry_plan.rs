// ==========================================
// 家禽生产分析系统 - 饲养管理计划配置
// ==========================================
// 营养阶段 / 补充剂计划 / 肉鸡限饲计划
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

// ==========================================
// 营养阶段 (按周龄)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPhase {
    pub phase_name: String,
    pub start_week: i64,
    pub end_week: i64,
    pub protein_percent: f64,
    pub energy_kcal_per_kg: f64,
    pub calcium_percent: f64,
    pub lysine_percent: f64,
    pub methionine_percent: f64,
}

// ==========================================
// 补充剂计划 (按日龄)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplementSource {
    Organic,
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdministrationRoute {
    Feed,
    Water,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementSchedule {
    pub supplement_name: String,
    pub source: SupplementSource,
    pub dosage_mg_per_kg_feed: f64,
    pub route: AdministrationRoute,
    pub start_day: i64,
    pub end_day: i64,
}

// ==========================================
// 限饲计划 (肉种公鸡)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedingPeriod {
    pub start_hour: u32,        // 0-23
    pub end_hour: u32,          // 0-23
    pub feed_amount_grams: f64, // 0 表示不限量
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingRestrictionPlan {
    pub start_day: i64,
    pub end_day: i64,
    pub restriction_percent: f64,
    pub daily_feed_amount_grams: f64,
    pub feeding_periods: Vec<FeedingPeriod>,
}

// ==========================================
// HusbandryPlan - 汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HusbandryPlan {
    pub nutrition_phases: Vec<NutritionPhase>,
    pub supplements: Vec<SupplementSchedule>,
    pub feeding_restriction: FeedingRestrictionPlan,
}

impl HusbandryPlan {
    pub fn validate(&self) -> ConfigResult<()> {
        if self
            .nutrition_phases
            .iter()
            .any(|p| p.start_week > p.end_week)
        {
            return Err(ConfigError::InvalidValue {
                field: "husbandry.nutrition_phases".to_string(),
                message: "start_week 不能大于 end_week".to_string(),
            });
        }
        if self.supplements.iter().any(|s| s.start_day > s.end_day) {
            return Err(ConfigError::InvalidValue {
                field: "husbandry.supplements".to_string(),
                message: "start_day 不能大于 end_day".to_string(),
            });
        }
        let plan = &self.feeding_restriction;
        if plan.start_day > plan.end_day
            || plan
                .feeding_periods
                .iter()
                .any(|p| p.start_hour > 23 || p.end_hour > 23)
        {
            return Err(ConfigError::InvalidValue {
                field: "husbandry.feeding_restriction".to_string(),
                message: "限饲日龄或时段无效".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for HusbandryPlan {
    fn default() -> Self {
        let phase = |name: &str, start_week, end_week, protein, energy, calcium, lysine, methionine| {
            NutritionPhase {
                phase_name: name.to_string(),
                start_week,
                end_week,
                protein_percent: protein,
                energy_kcal_per_kg: energy,
                calcium_percent: calcium,
                lysine_percent: lysine,
                methionine_percent: methionine,
            }
        };
        let supplement = |name: &str, dosage, route, end_day| SupplementSchedule {
            supplement_name: name.to_string(),
            source: SupplementSource::Organic,
            dosage_mg_per_kg_feed: dosage,
            route,
            start_day: 1,
            end_day,
        };

        Self {
            nutrition_phases: vec![
                phase("产蛋初期", 21, 35, 18.0, 2750.0, 3.9, 0.9, 0.45),
                phase("高峰与维持期", 36, 60, 17.0, 2700.0, 4.15, 0.84, 0.41),
                phase("产蛋后期", 61, 100, 16.0, 2675.0, 4.3, 0.78, 0.39),
            ],
            supplements: vec![
                supplement("维生素 C", 200.0, AdministrationRoute::Water, 21),
                supplement("维生素 E", 300.0, AdministrationRoute::Water, 21),
                supplement("有机硒 (酵母硒)", 0.3, AdministrationRoute::Feed, 42),
            ],
            feeding_restriction: FeedingRestrictionPlan {
                start_day: 8,
                end_day: 21,
                restriction_percent: 40.0,
                daily_feed_amount_grams: 60.0,
                feeding_periods: vec![
                    FeedingPeriod {
                        start_hour: 6,
                        end_hour: 10,
                        feed_amount_grams: 30.0,
                    },
                    FeedingPeriod {
                        start_hour: 14,
                        end_hour: 18,
                        feed_amount_grams: 30.0,
                    },
                ],
            },
        }
    }
}
