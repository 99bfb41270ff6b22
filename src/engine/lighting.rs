// ==========================================
// 家禽生产分析系统 - 光照合规评估器
// ==========================================
// 职责: 光照目标解析 / 单日偏差告警 / 多日合规率 /
//       方案有效性统计 / 下周调整提醒 / 开关灯时间
// 输入: 光照读数序列 (调用方持有的 LightingLog) + 生产类型
// 输出: LightingEvaluation
// ==========================================
// 目标解析采用"沿用最近已知": 取 week <= 当前周的最后一项,
// 从不向后查找
// ==========================================

use crate::config::lighting_program::{LightingPolicy, LightingProgramEntry, LightingPrograms};
use crate::domain::alert::{Alert, AlertKind};
use crate::domain::records::LightingReading;
use crate::domain::types::{AlertSeverity, ProductionType};
use crate::i18n::{fmt_num, t, t_with_args};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

// ==========================================
// LightingLog - 按日期有序的光照记录
// ==========================================
// 由调用方持有并追加,评估器只读
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightingLog {
    readings: Vec<LightingReading>,
}

impl LightingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_readings(readings: Vec<LightingReading>) -> Self {
        let mut log = Self::new();
        for reading in readings {
            log.append(reading);
        }
        log
    }

    /// 追加记录,保持日期有序 (同日记录排在已有记录之后)
    pub fn append(&mut self, reading: LightingReading) {
        let pos = self.readings.partition_point(|r| r.date <= reading.date);
        self.readings.insert(pos, reading);
    }

    pub fn readings(&self) -> &[LightingReading] {
        &self.readings
    }

    pub fn latest(&self) -> Option<&LightingReading> {
        self.readings.last()
    }

    /// 日期区间 [from, to] 内的记录
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> &[LightingReading] {
        let start = self.readings.partition_point(|r| r.date < from);
        let end = self.readings.partition_point(|r| r.date <= to);
        if start >= end {
            return &[];
        }
        &self.readings[start..end]
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

// ==========================================
// 结果结构
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingTarget {
    pub week: i64, // 命中的方案周
    pub light_hours: f64,
    pub intensity_lux: f64,
    pub description: Option<String>,
}

impl From<&LightingProgramEntry> for LightingTarget {
    fn from(entry: &LightingProgramEntry) -> Self {
        Self {
            week: entry.week,
            light_hours: entry.light_hours,
            intensity_lux: entry.intensity_lux,
            description: entry.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingCompliance {
    pub days: usize,
    pub average_deviation_h: f64,
    pub compliance_rate_pct: f64,
    pub days_off_target: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectivenessLevel {
    NoData,
    Critical,
    Warning,
    IncreasePhotoperiod,
    WellManaged,
}

impl EffectivenessLevel {
    fn message_key(&self) -> &'static str {
        match self {
            EffectivenessLevel::NoData => "lighting.effectiveness.no_data",
            EffectivenessLevel::Critical => "lighting.effectiveness.critical",
            EffectivenessLevel::Warning => "lighting.effectiveness.warning",
            EffectivenessLevel::IncreasePhotoperiod => "lighting.effectiveness.increase_photoperiod",
            EffectivenessLevel::WellManaged => "lighting.effectiveness.well_managed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingEffectiveness {
    pub average_photoperiod_h: f64,
    pub consistency_pct: f64,
    pub program_adherence_pct: f64,
    pub total_adjustments: usize,
    pub level: EffectivenessLevel,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentDirection {
    Increase,
    Decrease,
    Hold, // 仅强度变化
}

impl fmt::Display for AdjustmentDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentDirection::Increase => write!(f, "increase"),
            AdjustmentDirection::Decrease => write!(f, "decrease"),
            AdjustmentDirection::Hold => write!(f, "hold"),
        }
    }
}

/// 下周光照调整提醒
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingReminder {
    pub next_week: i64,
    pub current_hours: f64,
    pub current_lux: f64,
    pub next_hours: f64,
    pub next_lux: f64,
    pub direction: AdjustmentDirection,
    pub hour_change: f64, // 绝对值
    pub tip: String,
}

impl LightingReminder {
    /// 渲染为本地化提醒文本
    pub fn render(&self) -> String {
        let hours = self.hour_change.to_string();
        let action = match self.direction {
            AdjustmentDirection::Increase => t_with_args("lighting.reminder.increase", &[("hours", &hours)]),
            AdjustmentDirection::Decrease => t_with_args("lighting.reminder.decrease", &[("hours", &hours)]),
            AdjustmentDirection::Hold => t("lighting.reminder.hold"),
        };
        t_with_args(
            "lighting.reminder.summary",
            &[
                ("week", &self.next_week.to_string()),
                ("current_hours", &self.current_hours.to_string()),
                ("current_lux", &self.current_lux.to_string()),
                ("next_hours", &self.next_hours.to_string()),
                ("next_lux", &self.next_lux.to_string()),
                ("action", &action),
                ("tip", &self.tip),
            ],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightingWindow {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingEvaluation {
    pub compliance: LightingCompliance,
    pub effectiveness: LightingEffectiveness,
    pub alerts: Vec<Alert>,
    pub reminder: Option<LightingReminder>,
}

// ==========================================
// LightingComplianceEvaluator
// ==========================================
#[derive(Debug, Clone)]
pub struct LightingComplianceEvaluator {
    programs: LightingPrograms,
    policy: LightingPolicy,
}

impl LightingComplianceEvaluator {
    pub fn new(programs: LightingPrograms, policy: LightingPolicy) -> Self {
        Self { programs, policy }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 综合评估: 合规率 + 有效性 + 最新一天告警 + 下周提醒
    ///
    /// # 参数
    /// - `readings`: 按日期有序的光照记录
    /// - `production_type`: 生产类型
    /// - `current_week`: 当前周 (None 时不生成提醒)
    #[instrument(skip(self, readings), fields(count = readings.len()))]
    pub fn evaluate(
        &self,
        readings: &[LightingReading],
        production_type: ProductionType,
        current_week: Option<i64>,
    ) -> LightingEvaluation {
        // 仅对有实际记录的最新一天告警
        let alerts = readings
            .last()
            .filter(|r| r.actual_light_hours > 0.0)
            .map(|r| self.check_day(r, production_type))
            .unwrap_or_default();

        LightingEvaluation {
            compliance: self.compliance(readings),
            effectiveness: self.effectiveness(readings, production_type),
            alerts,
            reminder: current_week.and_then(|week| self.reminder(production_type, week)),
        }
    }

    /// 解析某周目标 (沿用最近已知,首项之前返回 None)
    pub fn target_for_week(&self, production_type: ProductionType, week: i64) -> Option<LightingTarget> {
        let target = self
            .programs
            .program_for(production_type)
            .iter()
            .take_while(|e| e.week <= week)
            .last()
            .map(LightingTarget::from);
        debug!(%production_type, week, resolved = ?target.as_ref().map(|t| t.week), "解析光照目标");
        target
    }

    // ==========================================
    // 单日告警
    // ==========================================

    pub fn check_day(&self, reading: &LightingReading, production_type: ProductionType) -> Vec<Alert> {
        let p = &self.policy;
        let mut alerts = Vec::new();

        let actual = reading.actual_light_hours.to_string();
        let target = reading.target_light_hours.to_string();
        let hours_deviation = (reading.actual_light_hours - reading.target_light_hours).abs();

        if hours_deviation > p.hours_critical_deviation {
            alerts.push(Alert::new(
                AlertKind::LightHoursDeviation,
                AlertSeverity::Critical,
                t_with_args("lighting.hours_critical", &[("actual", &actual), ("target", &target)]),
                t("lighting.hours_critical_action"),
            ));
        } else if hours_deviation > p.hours_warning_deviation {
            alerts.push(Alert::new(
                AlertKind::LightHoursDeviation,
                AlertSeverity::Warning,
                t_with_args("lighting.hours_warning", &[("actual", &actual), ("target", &target)]),
                t("lighting.hours_warning_action"),
            ));
        }

        // 目标强度为 0 时不计算百分比偏差
        if reading.target_intensity_lux > 0.0 {
            let pct = (reading.actual_intensity_lux - reading.target_intensity_lux).abs()
                / reading.target_intensity_lux
                * 100.0;
            if pct > p.intensity_warning_pct {
                alerts.push(Alert::new(
                    AlertKind::LightIntensityDeviation,
                    AlertSeverity::Warning,
                    t_with_args(
                        "lighting.intensity",
                        &[
                            ("pct", &fmt_num(pct, 0)),
                            ("actual", &reading.actual_intensity_lux.to_string()),
                            ("target", &reading.target_intensity_lux.to_string()),
                        ],
                    ),
                    t("lighting.intensity_action"),
                ));
            }
        }

        // 产蛋期光照不得缩短
        if production_type == ProductionType::Layer
            && reading.actual_light_hours < reading.target_light_hours - p.layer_decrease_margin
        {
            alerts.push(Alert::new(
                AlertKind::PhotoperiodDecrease,
                AlertSeverity::Critical,
                t("lighting.photoperiod_decrease"),
                t("lighting.photoperiod_decrease_action"),
            ));
        }

        alerts
    }

    // ==========================================
    // 多日统计
    // ==========================================

    /// 合规率: 空序列视为 100% / 偏差 0
    pub fn compliance(&self, readings: &[LightingReading]) -> LightingCompliance {
        if readings.is_empty() {
            return LightingCompliance {
                days: 0,
                average_deviation_h: 0.0,
                compliance_rate_pct: 100.0,
                days_off_target: 0,
            };
        }

        let deviations: Vec<f64> = readings
            .iter()
            .map(|r| (r.actual_light_hours - r.target_light_hours).abs())
            .collect();
        let days = readings.len();
        let days_off_target = deviations
            .iter()
            .filter(|d| **d > self.policy.hours_warning_deviation)
            .count();

        LightingCompliance {
            days,
            average_deviation_h: deviations.iter().sum::<f64>() / days as f64,
            compliance_rate_pct: (days - days_off_target) as f64 * 100.0 / days as f64,
            days_off_target,
        }
    }

    /// 方案有效性
    pub fn effectiveness(
        &self,
        readings: &[LightingReading],
        production_type: ProductionType,
    ) -> LightingEffectiveness {
        if readings.is_empty() {
            let level = EffectivenessLevel::NoData;
            return LightingEffectiveness {
                average_photoperiod_h: 0.0,
                consistency_pct: 0.0,
                program_adherence_pct: 0.0,
                total_adjustments: 0,
                level,
                recommendation: t(level.message_key()),
            };
        }

        let p = &self.policy;
        let n = readings.len() as f64;
        let average = readings.iter().map(|r| r.actual_light_hours).sum::<f64>() / n;
        let variance = readings
            .iter()
            .map(|r| (r.actual_light_hours - average).powi(2))
            .sum::<f64>()
            / n;
        let consistency = (100.0 - variance.sqrt() * p.consistency_stddev_factor).max(0.0);
        let adherence = self.compliance(readings).compliance_rate_pct;
        let total_adjustments = readings
            .windows(2)
            .filter(|w| w[1].target_light_hours != w[0].target_light_hours)
            .count();

        let level = if adherence < p.adherence_critical_pct {
            EffectivenessLevel::Critical
        } else if consistency < p.consistency_warning_pct {
            EffectivenessLevel::Warning
        } else if production_type == ProductionType::Layer && average < p.layer_min_photoperiod {
            EffectivenessLevel::IncreasePhotoperiod
        } else {
            EffectivenessLevel::WellManaged
        };

        LightingEffectiveness {
            average_photoperiod_h: average,
            consistency_pct: consistency,
            program_adherence_pct: adherence,
            total_adjustments,
            level,
            recommendation: t(level.message_key()),
        }
    }

    // ==========================================
    // 提醒与时间窗
    // ==========================================

    /// 比较本周与下周目标,任一不同时生成提醒
    pub fn reminder(&self, production_type: ProductionType, current_week: i64) -> Option<LightingReminder> {
        let next_week = current_week + 1;
        let current = self.target_for_week(production_type, current_week)?;
        let next = self.target_for_week(production_type, next_week)?;

        if current.light_hours == next.light_hours && current.intensity_lux == next.intensity_lux {
            return None;
        }

        let change = next.light_hours - current.light_hours;
        let direction = if change > 0.0 {
            AdjustmentDirection::Increase
        } else if change < 0.0 {
            AdjustmentDirection::Decrease
        } else {
            AdjustmentDirection::Hold
        };

        Some(LightingReminder {
            next_week,
            current_hours: current.light_hours,
            current_lux: current.intensity_lux,
            next_hours: next.light_hours,
            next_lux: next.intensity_lux,
            direction,
            hour_change: change.abs(),
            tip: next
                .description
                .unwrap_or_else(|| t("lighting.reminder.default_tip")),
        })
    }

    /// 开关灯时间: 开灯时间 + 光照时长,跨零点回绕
    pub fn lighting_window(&self, light_hours: f64, preferred_start: NaiveTime) -> LightingWindow {
        let minutes = (light_hours * 60.0).round() as i64;
        LightingWindow {
            start_time: preferred_start,
            end_time: preferred_start + Duration::minutes(minutes),
        }
    }

    /// 默认开灯时间 06:00
    pub fn default_start_time() -> NaiveTime {
        NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}
