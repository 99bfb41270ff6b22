// ==========================================
// 家禽生产分析系统 - 告警汇总
// ==========================================
// 职责: 合并各计算器告警,按级别降序稳定排序并去重
// 输出: AlertDigest (告警列表 + 各级别计数 + 最高级别)
// ==========================================

use crate::domain::alert::Alert;
use crate::domain::types::AlertSeverity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub emergency: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    fn bump(&mut self, severity: AlertSeverity) {
        match severity {
            AlertSeverity::Emergency => self.emergency += 1,
            AlertSeverity::Critical => self.critical += 1,
            AlertSeverity::Warning => self.warning += 1,
            AlertSeverity::Info => self.info += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.emergency + self.critical + self.warning + self.info
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertDigest {
    pub alerts: Vec<Alert>,
    pub counts: SeverityCounts,
    pub highest_severity: Option<AlertSeverity>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlertAggregator;

impl AlertAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 汇总告警
    ///
    /// 完全相同的告警只保留首次出现; 同级别保持输入顺序
    pub fn aggregate<I>(&self, alerts: I) -> AlertDigest
    where
        I: IntoIterator<Item = Alert>,
    {
        let mut seen = HashSet::new();
        let mut unique: Vec<Alert> = alerts
            .into_iter()
            .filter(|a| seen.insert(a.clone()))
            .collect();

        // sort_by 为稳定排序
        unique.sort_by(|a, b| b.severity.cmp(&a.severity));

        let mut counts = SeverityCounts::default();
        for alert in &unique {
            counts.bump(alert.severity);
        }

        AlertDigest {
            highest_severity: unique.first().map(|a| a.severity),
            alerts: unique,
            counts,
        }
    }
}
