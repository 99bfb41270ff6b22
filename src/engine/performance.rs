// ==========================================
// 家禽生产分析系统 - 生产性能指标计算器
// ==========================================
// 职责: 累计料肉比 / 死淘率 / 生产效率指数 (IP/FEE)
//       遗传标准对标 / 成本分摊 / 成本快照推导
// 依赖: AgeCalculator, GeneticStandardResolver, TimeSeriesAggregator
// ==========================================
// 除零保护: 增重/存栏/日龄为 0 时结果强制为 0
// ==========================================

use crate::config::cost_parameters::CostParameters;
use crate::config::genetic_standards::GeneticStandardTable;
use crate::domain::alert::{Alert, AlertKind};
use crate::domain::batch::{Batch, CostSnapshot};
use crate::domain::records::DailyRecord;
use crate::domain::types::{AlertSeverity, ProductionType};
use crate::engine::age::AgeCalculator;
use crate::engine::aggregator::{cumulative_fcr, TimeSeriesAggregator};
use crate::engine::genetic_standard::GeneticStandardResolver;
use crate::i18n::{fmt_num, t, t_with_args};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};

// ==========================================
// KpiResult - 批次 KPI
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiResult {
    pub age_days: i64,                 // 最后一条日报相对入舍日期
    pub cumulative_fcr: f64,           // 累计料肉比
    pub cumulative_mortality: u32,     // 累计死淘
    pub mortality_rate_pct: f64,       // 死淘率 (%)
    pub average_weight_kg: f64,        // 最近抽样体重 (kg)
    pub total_weight_gain_kg: f64,     // 总增重 (kg)
    pub total_feed_kg: f64,            // 累计耗料 (kg)
    pub productivity_index: f64,       // IP/FEE
    pub live_birds: u32,               // 存栏
}

// ==========================================
// 对标偏差状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationStatus {
    OnTarget,    // |偏差| <= 容差 × 目标
    Favorable,   // 优于目标
    Unfavorable, // 劣于目标
    Unavailable, // 无标准
}

impl fmt::Display for DeviationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviationStatus::OnTarget => write!(f, "on_target"),
            DeviationStatus::Favorable => write!(f, "favorable"),
            DeviationStatus::Unfavorable => write!(f, "unfavorable"),
            DeviationStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

// ==========================================
// ComparisonRow - 抽样日对标行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub day: i64,
    pub date: NaiveDate,
    pub real_weight_g: f64,
    pub target_weight_g: f64, // 无标准时为 0
    pub real_fcr: f64,
    pub target_fcr: f64,      // 无标准时为 0
    pub weight_status: DeviationStatus,
    pub fcr_status: DeviationStatus,
}

// ==========================================
// CostAllocation - 成本分摊
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAllocation {
    pub cumulative_transformation_cost: f64,
    pub cost_per_bird: f64,
    pub cost_per_kg: f64,
}

/// 全场在养存栏 (仅 ACTIVE 批次)
pub fn farm_live_birds<'a, I>(batches: I) -> u64
where
    I: IntoIterator<Item = &'a Batch>,
{
    batches
        .into_iter()
        .filter(|b| b.is_active())
        .map(|b| b.current_bird_count as u64)
        .sum()
}

// ==========================================
// PerformanceIndexCalculator
// ==========================================
#[derive(Debug, Clone)]
pub struct PerformanceIndexCalculator {
    resolver: GeneticStandardResolver,
    cost: CostParameters,
    aggregator: TimeSeriesAggregator,
    age: AgeCalculator,
}

impl PerformanceIndexCalculator {
    pub fn new(standards: GeneticStandardTable, cost: CostParameters) -> Self {
        Self {
            resolver: GeneticStandardResolver::new(standards),
            cost,
            aggregator: TimeSeriesAggregator::new(),
            age: AgeCalculator::new(),
        }
    }

    // ==========================================
    // KPI
    // ==========================================

    /// 计算批次 KPI
    ///
    /// # 返回
    /// - None: 无日报
    /// - Some(KpiResult): 各项指标,除零情况为 0
    #[instrument(skip(self, batch, records), fields(batch_id = %batch.id, count = records.len()))]
    pub fn compute_kpis(&self, batch: &Batch, records: &[DailyRecord]) -> Option<KpiResult> {
        let agg = self.aggregator.aggregate(batch, records);
        let last_date = agg.last_date?;

        let age_days = self.age.age_in_days(batch.start_date, last_date);
        let mortality_rate_pct = self.mortality_rate(agg.cumulative_mortality, batch.initial_bird_count);

        let weight_g = match agg.last_sampled_weight_g {
            Some(w) => w,
            None => {
                warn!(batch_id = %batch.id, "尚无抽样体重,增重按 0 处理");
                0.0
            }
        };
        let average_weight_kg = weight_g / 1000.0;
        let total_weight_gain_kg = average_weight_kg * agg.live_birds as f64;
        let fcr = cumulative_fcr(agg.cumulative_feed_kg, weight_g, agg.live_birds);
        let productivity_index =
            self.productivity_index(average_weight_kg, mortality_rate_pct, age_days, fcr);

        debug!(age_days, fcr, mortality_rate_pct, productivity_index, "KPI 计算完成");

        Some(KpiResult {
            age_days,
            cumulative_fcr: fcr,
            cumulative_mortality: agg.cumulative_mortality,
            mortality_rate_pct,
            average_weight_kg,
            total_weight_gain_kg,
            total_feed_kg: agg.cumulative_feed_kg,
            productivity_index,
            live_birds: agg.live_birds,
        })
    }

    /// 死淘率 (%),入舍数为 0 时返回 0
    pub fn mortality_rate(&self, cumulative_mortality: u32, initial_bird_count: u32) -> f64 {
        if initial_bird_count == 0 {
            return 0.0;
        }
        cumulative_mortality as f64 * 100.0 / initial_bird_count as f64
    }

    /// 生产效率指数 (欧洲效率因子)
    ///
    /// (体重kg × (100 - 死淘率%)) / (日龄 × 料肉比) × 100
    pub fn productivity_index(
        &self,
        average_weight_kg: f64,
        mortality_rate_pct: f64,
        age_days: i64,
        fcr: f64,
    ) -> f64 {
        if age_days > 0 && fcr > 0.0 {
            (average_weight_kg * (100.0 - mortality_rate_pct)) / (age_days as f64 * fcr) * 100.0
        } else {
            0.0
        }
    }

    // ==========================================
    // 遗传标准对标
    // ==========================================

    /// 每个抽样体重日生成对标行
    #[instrument(skip(self, batch, records), fields(batch_id = %batch.id, line = %batch.genetic_line))]
    pub fn compare_to_standard(&self, batch: &Batch, records: &[DailyRecord]) -> Vec<ComparisonRow> {
        let agg = self.aggregator.aggregate(batch, records);

        agg.weight_samples
            .iter()
            .map(|sample| {
                let standard = self.resolver.resolve(&batch.genetic_line, sample.day);
                let target_weight_g = standard.map_or(0.0, |s| s.target_weight_g);
                let target_fcr = standard.map_or(0.0, |s| s.target_fcr);

                ComparisonRow {
                    day: sample.day,
                    date: sample.date,
                    real_weight_g: sample.real_weight_g,
                    target_weight_g,
                    real_fcr: sample.real_fcr,
                    target_fcr,
                    weight_status: self.deviation_status(sample.real_weight_g, target_weight_g, false),
                    fcr_status: self.deviation_status(sample.real_fcr, target_fcr, true),
                }
            })
            .collect()
    }

    /// 偏差状态
    ///
    /// # 参数
    /// - `lower_is_better`: 料肉比为 true (越低越好)
    pub fn deviation_status(&self, real: f64, target: f64, lower_is_better: bool) -> DeviationStatus {
        if target <= 0.0 {
            return DeviationStatus::Unavailable;
        }
        let diff = real - target;
        if diff.abs() <= target * self.cost.on_target_tolerance {
            return DeviationStatus::OnTarget;
        }
        let better = if lower_is_better { diff < 0.0 } else { diff > 0.0 };
        if better {
            DeviationStatus::Favorable
        } else {
            DeviationStatus::Unfavorable
        }
    }

    // ==========================================
    // 成本
    // ==========================================

    /// 单只成本 / 单公斤成本
    pub fn cost_allocation(
        &self,
        cumulative_transformation_cost: f64,
        current_bird_count: u32,
        total_weight_gain_kg: f64,
    ) -> CostAllocation {
        let cost_per_bird = if current_bird_count > 0 {
            cumulative_transformation_cost / current_bird_count as f64
        } else {
            0.0
        };
        let cost_per_kg = if total_weight_gain_kg > 0.0 {
            cumulative_transformation_cost / total_weight_gain_kg
        } else {
            0.0
        };
        CostAllocation {
            cumulative_transformation_cost,
            cost_per_bird,
            cost_per_kg,
        }
    }

    /// 批次存栏占全场存栏比例,全场为 0 时按 1 计
    pub fn overhead_proportion(&self, batch_live_birds: u32, farm_live_birds: u64) -> f64 {
        if farm_live_birds == 0 {
            return 1.0;
        }
        batch_live_birds as f64 / farm_live_birds as f64
    }

    /// 当日分摊间接费用
    pub fn prorate_overhead(&self, batch_live_birds: u32, farm_live_birds: u64) -> f64 {
        self.cost.daily_overhead * self.overhead_proportion(batch_live_birds, farm_live_birds)
    }

    /// 由上一快照与当日日报推导新成本快照
    ///
    /// 累计 = 上一累计 + 饲料 + 疫苗 + 分摊间接费用 (单调不减)
    pub fn next_cost_snapshot(
        &self,
        previous: Option<&CostSnapshot>,
        record: &DailyRecord,
        vaccine_cost: f64,
        batch_live_birds: u32,
        farm_live_birds: u64,
    ) -> CostSnapshot {
        let feed_cost = record.feed_consumed_kg.max(0.0) * self.cost.feed_unit_price;
        let allocated_overhead = self.prorate_overhead(batch_live_birds, farm_live_birds);
        let vaccine_cost = vaccine_cost.max(0.0);
        let previous_cumulative = previous.map_or(0.0, |s| s.cumulative_transformation_cost);

        CostSnapshot {
            batch_id: record.batch_id.clone(),
            date: record.date,
            feed_cost,
            vaccine_cost,
            allocated_overhead,
            cumulative_transformation_cost: previous_cumulative
                + feed_cost
                + vaccine_cost
                + allocated_overhead,
        }
    }

    /// 全周期转化成本: 雏鸡 + 饲料 + 间接费用 × 日报数 × 存栏占比
    pub fn transformation_cost(
        &self,
        batch: &Batch,
        records: &[DailyRecord],
        farm_live_birds: u64,
    ) -> f64 {
        let total_feed_kg: f64 = records.iter().map(|r| r.feed_consumed_kg).sum();
        let feed_cost = total_feed_kg * self.cost.feed_unit_price;
        let overhead = self.cost.daily_overhead
            * records.len() as f64
            * self.overhead_proportion(batch.current_bird_count, farm_live_birds);
        batch.chick_cost() + feed_cost + overhead
    }

    // ==========================================
    // 告警
    // ==========================================

    /// 累计死淘率告警: >= 5% critical, >= 3% warning
    pub fn mortality_alert(&self, kpis: &KpiResult) -> Option<Alert> {
        let rate = kpis.mortality_rate_pct;
        let (severity, key) = if rate >= self.cost.mortality_critical_pct {
            (AlertSeverity::Critical, "alert.mortality.critical")
        } else if rate >= self.cost.mortality_warning_pct {
            (AlertSeverity::Warning, "alert.mortality.warning")
        } else {
            return None;
        };
        Some(Alert::new(
            AlertKind::Mortality,
            severity,
            t_with_args(key, &[("rate", &fmt_num(rate, 1))]),
            t("alert.mortality.action"),
        ))
    }

    /// 肉鸡出栏日龄节点预警
    pub fn age_milestone_alert(&self, batch: &Batch, now: NaiveDate) -> Option<Alert> {
        if batch.production_type != ProductionType::Broiler || !batch.is_active() {
            return None;
        }
        let reference = batch.age_reference_date();
        let target = self.cost.broiler_milestone_days;
        if !self
            .age
            .should_alert_by_age(reference, target, now, self.cost.milestone_lead_days)
        {
            return None;
        }
        let age = self.age.age_in_days(reference, now);
        Some(Alert::new(
            AlertKind::AgeMilestone,
            AlertSeverity::Warning,
            t_with_args(
                "alert.age.milestone",
                &[("age", &age.to_string()), ("target", &target.to_string())],
            ),
            t("alert.age.milestone_action"),
        ))
    }

    /// 汇总性能类告警
    pub fn alerts(&self, batch: &Batch, kpis: Option<&KpiResult>, now: NaiveDate) -> Vec<Alert> {
        kpis.and_then(|k| self.mortality_alert(k))
            .into_iter()
            .chain(self.age_milestone_alert(batch, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{BatchStatus, GeneticLine};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn calc() -> PerformanceIndexCalculator {
        PerformanceIndexCalculator::new(GeneticStandardTable::default(), CostParameters::default())
    }

    fn batch(initial: u32) -> Batch {
        Batch {
            id: "L1".into(),
            production_type: ProductionType::Broiler,
            genetic_line: GeneticLine::Cobb500,
            start_date: d(1, 1),
            birth_date: None,
            initial_bird_count: initial,
            current_bird_count: initial,
            unit_chick_cost: 0.5,
            status: BatchStatus::Active,
            finish_date: None,
        }
    }

    fn rec(date: NaiveDate, mortality: u32, feed: f64, weight: Option<f64>) -> DailyRecord {
        DailyRecord {
            batch_id: "L1".into(),
            date,
            daily_mortality: mortality,
            feed_consumed_kg: feed,
            water_consumed_l: 0.0,
            average_weight_g: weight,
            eggs_produced: 0,
        }
    }

    #[test]
    fn test_kpis_none_without_records() {
        assert!(calc().compute_kpis(&batch(1000), &[]).is_none());
    }

    #[test]
    fn test_kpis_values() {
        // 1000 只,死淘 50,体重 2.0kg,耗料 3420kg → FCR = 3420 / (2.0 × 950) = 1.8
        let records = vec![
            rec(d(1, 11), 20, 1420.0, None),
            rec(d(2, 5), 30, 2000.0, Some(2000.0)),
        ];
        let kpis = calc().compute_kpis(&batch(1000), &records).unwrap();
        assert_eq!(kpis.age_days, 35);
        assert_eq!(kpis.live_birds, 950);
        assert!((kpis.mortality_rate_pct - 5.0).abs() < 1e-9);
        assert!((kpis.cumulative_fcr - 1.8).abs() < 1e-9);
        // (2.0 × 95) / (35 × 1.8) × 100
        let expected = (2.0 * 95.0) / (35.0 * 1.8) * 100.0;
        assert!((kpis.productivity_index - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fcr_zero_without_weight() {
        let kpis = calc()
            .compute_kpis(&batch(100), &[rec(d(1, 5), 0, 40.0, None)])
            .unwrap();
        assert_eq!(kpis.cumulative_fcr, 0.0);
        assert_eq!(kpis.productivity_index, 0.0);
        assert!(kpis.cumulative_fcr.is_finite());
    }

    #[test]
    fn test_zero_initial_birds_guarded() {
        let kpis = calc()
            .compute_kpis(&batch(0), &[rec(d(1, 5), 0, 40.0, Some(300.0))])
            .unwrap();
        assert_eq!(kpis.mortality_rate_pct, 0.0);
        assert_eq!(kpis.cumulative_fcr, 0.0);
    }

    #[test]
    fn test_deviation_status() {
        let c = calc();
        assert_eq!(c.deviation_status(1050.0, 1000.0, false), DeviationStatus::OnTarget);
        assert_eq!(c.deviation_status(1100.0, 1000.0, false), DeviationStatus::Favorable);
        assert_eq!(c.deviation_status(900.0, 1000.0, false), DeviationStatus::Unfavorable);
        assert_eq!(c.deviation_status(1.5, 1.3, true), DeviationStatus::Unfavorable);
        assert_eq!(c.deviation_status(1.1, 1.3, true), DeviationStatus::Favorable);
        assert_eq!(c.deviation_status(1.1, 0.0, true), DeviationStatus::Unavailable);
    }

    #[test]
    fn test_comparison_unknown_line_has_zero_targets() {
        let mut b = batch(100);
        b.genetic_line = GeneticLine::Other("LOCAL".into());
        let rows = calc().compare_to_standard(&b, &[rec(d(1, 8), 0, 20.0, Some(180.0))]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].target_weight_g, 0.0);
        assert_eq!(rows[0].weight_status, DeviationStatus::Unavailable);
    }

    #[test]
    fn test_cost_allocation_guards() {
        let alloc = calc().cost_allocation(1000.0, 0, 0.0);
        assert_eq!(alloc.cost_per_bird, 0.0);
        assert_eq!(alloc.cost_per_kg, 0.0);

        let alloc = calc().cost_allocation(1000.0, 100, 250.0);
        assert_eq!(alloc.cost_per_bird, 10.0);
        assert_eq!(alloc.cost_per_kg, 4.0);
    }

    #[test]
    fn test_next_cost_snapshot_cumulative() {
        let c = calc();
        let first = c.next_cost_snapshot(None, &rec(d(1, 2), 0, 100.0, None), 0.0, 500, 1000);
        // 饲料 100 × 8.5 = 850, 间接费用 500 × 0.5 = 250
        assert_eq!(first.feed_cost, 850.0);
        assert_eq!(first.allocated_overhead, 250.0);
        assert_eq!(first.cumulative_transformation_cost, 1100.0);

        let second = c.next_cost_snapshot(Some(&first), &rec(d(1, 3), 0, 0.0, None), 20.0, 500, 0);
        assert_eq!(second.allocated_overhead, 500.0);
        assert_eq!(second.cumulative_transformation_cost, 1620.0);
        assert!(second.cumulative_transformation_cost >= first.cumulative_transformation_cost);
    }

    #[test]
    fn test_transformation_cost() {
        // 雏鸡 1000 × 0.5 = 500, 饲料 20 × 8.5 = 170, 间接费用 500 × 2 × 1
        let records = vec![rec(d(1, 2), 0, 10.0, None), rec(d(1, 3), 0, 10.0, None)];
        let cost = calc().transformation_cost(&batch(1000), &records, 0);
        assert_eq!(cost, 500.0 + 170.0 + 1000.0);
    }

    #[test]
    fn test_mortality_alert_tiers() {
        let c = calc();
        let mut kpis = c
            .compute_kpis(&batch(1000), &[rec(d(1, 5), 30, 10.0, None)])
            .unwrap();
        assert_eq!(c.mortality_alert(&kpis).unwrap().severity, AlertSeverity::Warning);
        kpis.mortality_rate_pct = 5.0;
        assert_eq!(c.mortality_alert(&kpis).unwrap().severity, AlertSeverity::Critical);
        kpis.mortality_rate_pct = 2.9;
        assert!(c.mortality_alert(&kpis).is_none());
    }

    #[test]
    fn test_age_milestone_only_for_active_broilers() {
        let c = calc();
        let b = batch(100);
        assert!(c.age_milestone_alert(&b, d(2, 8)).is_none());
        assert_eq!(
            c.age_milestone_alert(&b, d(2, 9)).unwrap().kind,
            AlertKind::AgeMilestone
        );

        let mut layer = batch(100);
        layer.production_type = ProductionType::Layer;
        assert!(c.age_milestone_alert(&layer, d(3, 1)).is_none());
    }

    #[test]
    fn test_farm_live_birds_counts_active_only() {
        let a = batch(300);
        let mut finished = batch(200);
        finished.status = BatchStatus::Finished;
        assert_eq!(farm_live_birds([&a, &finished]), 300);
    }
}
