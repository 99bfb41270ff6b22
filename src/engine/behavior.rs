// ==========================================
// 家禽生产分析系统 - 禽群行为巡检与批次看板
// ==========================================
// 职责: 行为巡检评估 (活跃度/应激/异常行为),
//       行为状态与死淘状态合并为批次看板状态
// 输入: 最近一次行为巡检 + 死淘率告警
// 输出: BehaviorAssessment / LotDashboard
// ==========================================
// 看板总体状态取行为与死淘两者中较差者
// ==========================================

use crate::config::behavior_thresholds::BehaviorThresholds;
use crate::domain::alert::{Alert, AlertKind};
use crate::domain::records::BirdBehaviorObservation;
use crate::domain::types::{AlertSeverity, FeedingActivityLevel};
use crate::i18n::{fmt_num, t, t_with_args};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

// ==========================================
// MonitoringStatus - 看板状态
// ==========================================
// 顺序: Normal < Warning < Critical
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringStatus {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl MonitoringStatus {
    /// 告警级别映射为看板状态 (info 不影响看板)
    pub fn from_severity(severity: AlertSeverity) -> Self {
        match severity {
            AlertSeverity::Info => MonitoringStatus::Normal,
            AlertSeverity::Warning => MonitoringStatus::Warning,
            AlertSeverity::Critical | AlertSeverity::Emergency => MonitoringStatus::Critical,
        }
    }

    fn worst_of<'a, I>(alerts: I) -> Self
    where
        I: IntoIterator<Item = &'a Alert>,
    {
        alerts
            .into_iter()
            .map(|a| Self::from_severity(a.severity))
            .max()
            .unwrap_or_default()
    }
}

impl fmt::Display for MonitoringStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitoringStatus::Normal => write!(f, "normal"),
            MonitoringStatus::Warning => write!(f, "warning"),
            MonitoringStatus::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 评估结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorAssessment {
    pub date: NaiveDate,
    pub active_percent: f64,
    pub feeding_activity: FeedingActivityLevel,
    pub status: MonitoringStatus,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotDashboard {
    pub batch_id: String,
    pub date: NaiveDate, // 巡检日期,无巡检时为评估日期
    pub behavior_status: MonitoringStatus,
    pub mortality_status: MonitoringStatus,
    pub overall_status: MonitoringStatus,
    pub behavior_messages: Vec<String>,
    pub mortality_messages: Vec<String>,
}

// ==========================================
// BehaviorMonitor
// ==========================================
#[derive(Debug, Clone)]
pub struct BehaviorMonitor {
    thresholds: BehaviorThresholds,
}

impl BehaviorMonitor {
    pub fn new(thresholds: BehaviorThresholds) -> Self {
        Self { thresholds }
    }

    /// 评估单次行为巡检
    ///
    /// # 规则
    /// - 活跃占比 < active_min_pct → low_activity_severity (默认 warning)
    /// - 出现应激迹象 → stress_severity (默认 critical)
    /// - 存在任一异常行为 → abnormal_behavior_severity (默认 critical)
    #[instrument(skip(self, observation), fields(batch_id = %observation.batch_id))]
    pub fn evaluate(&self, observation: &BirdBehaviorObservation) -> BehaviorAssessment {
        let mut alerts = Vec::new();

        if observation.active_percent < self.thresholds.active_min_pct {
            alerts.push(Alert::new(
                AlertKind::Behavior,
                self.thresholds.low_activity_severity,
                t_with_args(
                    "alert.behavior.low_activity",
                    &[
                        ("pct", &fmt_num(observation.active_percent, 1)),
                        ("min", &fmt_num(self.thresholds.active_min_pct, 0)),
                    ],
                ),
                t("alert.behavior.low_activity_action"),
            ));
        }

        if observation.signs_of_stress {
            alerts.push(Alert::new(
                AlertKind::Behavior,
                self.thresholds.stress_severity,
                t("alert.behavior.stress"),
                t("alert.behavior.stress_action"),
            ));
        }

        if observation.has_abnormal_behaviors() {
            alerts.push(Alert::new(
                AlertKind::Behavior,
                self.thresholds.abnormal_behavior_severity,
                t_with_args(
                    "alert.behavior.abnormal",
                    &[("behaviors", &observation.abnormal_behaviors.join(", "))],
                ),
                t("alert.behavior.abnormal_action"),
            ));
        }

        let status = MonitoringStatus::worst_of(&alerts);
        debug!(
            active_percent = observation.active_percent,
            %status,
            alerts = alerts.len(),
            "行为巡检评估完成"
        );

        BehaviorAssessment {
            date: observation.date,
            active_percent: observation.active_percent,
            feeding_activity: observation.feeding_activity,
            status,
            alerts,
        }
    }

    /// 合并行为与死淘状态为批次看板
    ///
    /// # 参数
    /// - behavior: 最近一次巡检评估,无巡检时为 None (行为状态按正常处理)
    /// - mortality: 累计死淘率告警,未触发阈值时为 None
    pub fn dashboard(
        &self,
        batch_id: &str,
        as_of: NaiveDate,
        behavior: Option<&BehaviorAssessment>,
        mortality: Option<&Alert>,
    ) -> LotDashboard {
        let behavior_status = behavior.map_or(MonitoringStatus::Normal, |b| b.status);
        let mortality_status = MonitoringStatus::worst_of(mortality);

        LotDashboard {
            batch_id: batch_id.to_string(),
            date: behavior.map_or(as_of, |b| b.date),
            behavior_status,
            mortality_status,
            overall_status: behavior_status.max(mortality_status),
            behavior_messages: behavior
                .map(|b| b.alerts.iter().map(|a| a.message.clone()).collect())
                .unwrap_or_default(),
            mortality_messages: mortality.map(|a| a.message.clone()).into_iter().collect(),
        }
    }
}
