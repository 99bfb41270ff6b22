// ==========================================
// 家禽生产分析系统 - 饲养管理计划
// ==========================================
// 职责: 营养阶段查询与换料提醒 / 补充剂当日清单 / 肉鸡限饲时段
// 输入: HusbandryPlan + 周龄/日龄
// 输出: 阶段 / 提醒文本 / 饲喂时段
// ==========================================

use crate::config::husbandry_plan::{
    FeedingPeriod, HusbandryPlan, NutritionPhase, SupplementSchedule,
};
use crate::i18n::t_with_args;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HusbandryScheduler {
    plan: HusbandryPlan,
}

impl HusbandryScheduler {
    pub fn new(plan: HusbandryPlan) -> Self {
        Self { plan }
    }

    // ==========================================
    // 营养阶段
    // ==========================================

    /// 周龄所在营养阶段 (区间闭合,取首个命中)
    pub fn nutrition_phase_for_week(&self, week: i64) -> Option<&NutritionPhase> {
        self.plan
            .nutrition_phases
            .iter()
            .find(|p| week >= p.start_week && week <= p.end_week)
    }

    /// 下周进入新阶段时生成提醒; 当前周不在任何阶段内时不提醒
    pub fn nutrition_reminder(&self, current_week: i64) -> Option<String> {
        self.nutrition_phase_for_week(current_week)?;
        let next = self
            .plan
            .nutrition_phases
            .iter()
            .find(|p| p.start_week == current_week + 1)?;
        debug!(current_week, phase = %next.phase_name, "营养阶段切换提醒");
        Some(t_with_args(
            "husbandry.nutrition_transition",
            &[("phase", &next.phase_name)],
        ))
    }

    // ==========================================
    // 补充剂
    // ==========================================

    pub fn active_supplements(&self, day: i64) -> Vec<&SupplementSchedule> {
        self.plan
            .supplements
            .iter()
            .filter(|s| day >= s.start_day && day <= s.end_day)
            .collect()
    }

    pub fn supplement_reminder(&self, day: i64) -> Option<String> {
        let active = self.active_supplements(day);
        if active.is_empty() {
            return None;
        }
        let names = active
            .iter()
            .map(|s| s.supplement_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Some(t_with_args("husbandry.supplement_today", &[("names", &names)]))
    }

    // ==========================================
    // 限饲
    // ==========================================

    pub fn is_under_restriction(&self, day: i64) -> bool {
        let plan = &self.plan.feeding_restriction;
        day >= plan.start_day && day <= plan.end_day
    }

    /// 限饲期内返回计划时段; 期外为全天自由采食 (0 表示不限量)
    pub fn feeding_periods_for_day(&self, day: i64) -> Vec<FeedingPeriod> {
        if self.is_under_restriction(day) {
            return self.plan.feeding_restriction.feeding_periods.clone();
        }
        vec![FeedingPeriod {
            start_hour: 0,
            end_hour: 23,
            feed_amount_grams: 0.0,
        }]
    }

    /// 当日提醒汇总 (营养阶段 + 补充剂)
    pub fn reminders(&self, week: i64, day: i64) -> Vec<String> {
        self.nutrition_reminder(week)
            .into_iter()
            .chain(self.supplement_reminder(day))
            .collect()
    }
}
