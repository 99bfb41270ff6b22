// ==========================================
// 家禽生产分析系统 - 批次评估编排器
// ==========================================
// 用途: 读取批次数据快照,依次运行全部计算器,汇总为 LotReport
// 并发: 多个在养批次并行评估,彼此无共享可变状态
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::config::husbandry_plan::FeedingPeriod;
use crate::domain::alert::Alert;
use crate::domain::batch::{Batch, CostSnapshot};
use crate::domain::records::{
    BirdBehaviorObservation, DailyRecord, EggProductionRecord, EnvironmentalReading,
    LightingReading,
};
use crate::domain::types::{GeneticLine, ProductionType};
use crate::engine::age::AgeCalculator;
use crate::engine::alert_aggregator::{AlertAggregator, AlertDigest};
use crate::engine::behavior::{BehaviorAssessment, BehaviorMonitor, LotDashboard};
use crate::engine::economics::{BiologicalAssetValuation, EconomicsCalculator};
use crate::engine::egg_production::{
    EggEconomics, EggProductionAnalyzer, GeneticLinePerformance, ProductionSummary,
};
use crate::engine::environment::{EnvironmentAssessment, EnvironmentalScoringEngine};
use crate::engine::husbandry::HusbandryScheduler;
use crate::engine::lighting::{LightingComplianceEvaluator, LightingEvaluation};
use crate::engine::performance::{
    ComparisonRow, CostAllocation, KpiResult, PerformanceIndexCalculator,
};
use crate::repository::error::RepositoryResult;
use crate::repository::lot_data_source::LotDataSource;
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// LotSnapshot - 单批次评估输入
// ==========================================
#[derive(Debug, Clone)]
pub struct LotSnapshot {
    pub batch: Batch,
    pub daily_records: Vec<DailyRecord>,
    pub environmental_readings: Vec<EnvironmentalReading>,
    pub egg_records: Vec<EggProductionRecord>,
    pub lighting_readings: Vec<LightingReading>,
    pub behavior_observations: Vec<BirdBehaviorObservation>,
    pub latest_cost: Option<CostSnapshot>,
    pub farm_live_birds: u64,
}

// ==========================================
// LotReport - 评估报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggReport {
    pub summary: ProductionSummary,
    pub line_performance: GeneticLinePerformance,
    pub economics: EggEconomics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub as_of: NaiveDate,

    // 批次信息
    pub batch_id: String,
    pub production_type: ProductionType,
    pub genetic_line: GeneticLine,
    pub age_days: i64,
    pub age_label: String,
    pub current_week: i64,

    // 生产性能
    pub kpis: Option<KpiResult>,
    pub comparison: Vec<ComparisonRow>,
    pub cost_allocation: CostAllocation,
    pub valuation: BiologicalAssetValuation,

    // 环境 / 蛋品 / 光照
    pub environment: Option<EnvironmentAssessment>, // 最近一条读数
    pub egg_production: Option<EggReport>,
    pub lighting: LightingEvaluation,

    // 行为巡检 / 看板
    pub behavior: Option<BehaviorAssessment>, // 最近一次巡检
    pub dashboard: LotDashboard,

    // 饲养管理
    pub reminders: Vec<String>,
    pub feeding_periods: Option<Vec<FeedingPeriod>>, // 仅肉鸡

    pub alerts: AlertDigest,
}

// ==========================================
// LotEvaluationOrchestrator
// ==========================================
pub struct LotEvaluationOrchestrator<S>
where
    S: LotDataSource,
{
    source: Arc<S>,
    age: AgeCalculator,
    performance: PerformanceIndexCalculator,
    environment: EnvironmentalScoringEngine,
    eggs: EggProductionAnalyzer,
    lighting: LightingComplianceEvaluator,
    behavior: BehaviorMonitor,
    husbandry: HusbandryScheduler,
    economics: EconomicsCalculator,
    aggregator: AlertAggregator,
}

impl<S> LotEvaluationOrchestrator<S>
where
    S: LotDataSource,
{
    /// 创建编排器
    ///
    /// # 参数
    /// - source: 批次数据源
    /// - config: 引擎配置 (各计算器持有其副本)
    pub fn new(source: Arc<S>, config: &EngineConfig) -> Self {
        Self {
            source,
            age: AgeCalculator::new(),
            performance: PerformanceIndexCalculator::new(
                config.genetic_standards.clone(),
                config.cost.clone(),
            ),
            environment: EnvironmentalScoringEngine::new(config.environment.clone()),
            eggs: EggProductionAnalyzer::new(
                config.line_colors.clone(),
                config.egg_quality.clone(),
                config.egg_prices.clone(),
                config.egg_weight_ranges.clone(),
            ),
            lighting: LightingComplianceEvaluator::new(
                config.lighting_programs.clone(),
                config.lighting_policy.clone(),
            ),
            behavior: BehaviorMonitor::new(config.behavior),
            husbandry: HusbandryScheduler::new(config.husbandry.clone()),
            economics: EconomicsCalculator::new(),
            aggregator: AlertAggregator::new(),
        }
    }

    // ==========================================
    // 数据读取
    // ==========================================

    /// 读取单批次评估所需的全部数据
    pub async fn load_lot(&self, batch_id: &str) -> RepositoryResult<LotSnapshot> {
        let batch = self.source.batch(batch_id).await?;
        let (
            daily_records,
            environmental_readings,
            egg_records,
            lighting_readings,
            behavior_observations,
            latest_cost,
            farm_live_birds,
        ) = futures::try_join!(
            self.source.daily_records(batch_id),
            self.source.environmental_readings(batch_id),
            self.source.egg_records(batch_id),
            self.source.lighting_readings(batch_id),
            self.source.behavior_observations(batch_id),
            self.source.latest_cost_snapshot(batch_id),
            self.source.farm_live_birds(),
        )?;

        Ok(LotSnapshot {
            batch,
            daily_records,
            environmental_readings,
            egg_records,
            lighting_readings,
            behavior_observations,
            latest_cost,
            farm_live_birds,
        })
    }

    // ==========================================
    // 评估入口
    // ==========================================

    /// 评估单个批次
    #[instrument(skip(self))]
    pub async fn evaluate_lot(&self, batch_id: &str, as_of: NaiveDate) -> RepositoryResult<LotReport> {
        let snapshot = self.load_lot(batch_id).await?;
        Ok(self.build_report(&snapshot, as_of))
    }

    /// 并行评估全部在养批次
    ///
    /// # 返回
    /// - Ok(Vec<LotReport>): 按批次读取顺序
    /// - Err: 任一批次读取失败
    pub async fn evaluate_active_lots(&self, as_of: NaiveDate) -> RepositoryResult<Vec<LotReport>> {
        let batches = self.source.active_batches().await?;
        info!(lots = batches.len(), %as_of, "开始评估在养批次");

        let results = join_all(batches.iter().map(|b| self.evaluate_lot(&b.id, as_of))).await;
        let reports = results.into_iter().collect::<RepositoryResult<Vec<_>>>()?;

        let flagged = reports
            .iter()
            .filter(|r| r.alerts.highest_severity.is_some())
            .count();
        info!(lots = reports.len(), flagged, "在养批次评估完成");
        Ok(reports)
    }

    // ==========================================
    // 报告组装 (纯计算)
    // ==========================================

    pub fn build_report(&self, lot: &LotSnapshot, as_of: NaiveDate) -> LotReport {
        let batch = &lot.batch;
        let reference = batch.age_reference_date();
        let age_days = self.age.age_in_days(reference, as_of);
        let current_week = self.age.current_week(reference, as_of);

        // ===== 步骤1: 生产性能 =====
        let kpis = self.performance.compute_kpis(batch, &lot.daily_records);
        let comparison = self.performance.compare_to_standard(batch, &lot.daily_records);
        let cumulative_cost = match &lot.latest_cost {
            Some(snapshot) => snapshot.cumulative_transformation_cost,
            None => {
                debug!(batch_id = %batch.id, "无成本快照,按日报估算转化成本");
                self.performance
                    .transformation_cost(batch, &lot.daily_records, lot.farm_live_birds)
                    - batch.chick_cost()
            }
        };
        let cost_allocation = self.performance.cost_allocation(
            cumulative_cost,
            batch.current_bird_count,
            kpis.as_ref().map_or(0.0, |k| k.total_weight_gain_kg),
        );
        let valuation = self.economics.value_at_cost(
            batch,
            cumulative_cost,
            lot.latest_cost.as_ref().map(|s| s.date),
        );

        let mut alerts: Vec<Alert> = self.performance.alerts(batch, kpis.as_ref(), as_of);

        // ===== 步骤2: 环境 =====
        let environment = lot
            .environmental_readings
            .last()
            .map(|reading| self.environment.evaluate(batch, reading));
        if let Some(assessment) = &environment {
            alerts.extend(assessment.alerts.iter().cloned());
        }

        // ===== 步骤3: 蛋品 =====
        let egg_production = if batch.production_type == ProductionType::Layer
            || !lot.egg_records.is_empty()
        {
            let summary = self.eggs.summarize(&lot.egg_records);
            let line_performance = self.eggs.evaluate_genetic_line(
                &batch.genetic_line,
                &lot.egg_records,
                batch.current_bird_count,
            );
            alerts.extend(
                self.eggs
                    .check_production_quality(&summary, Some(&line_performance)),
            );
            let economics = self.eggs.value_production(&summary);
            Some(EggReport {
                summary,
                line_performance,
                economics,
            })
        } else {
            None
        };

        // ===== 步骤4: 光照 =====
        let lighting = self.lighting.evaluate(
            &lot.lighting_readings,
            batch.production_type,
            Some(current_week),
        );
        alerts.extend(lighting.alerts.iter().cloned());

        // ===== 步骤5: 行为巡检与看板 =====
        let behavior = lot
            .behavior_observations
            .last()
            .map(|observation| self.behavior.evaluate(observation));
        if let Some(assessment) = &behavior {
            alerts.extend(assessment.alerts.iter().cloned());
        }
        let mortality_alert = kpis
            .as_ref()
            .and_then(|k| self.performance.mortality_alert(k));
        let dashboard = self.behavior.dashboard(
            &batch.id,
            as_of,
            behavior.as_ref(),
            mortality_alert.as_ref(),
        );

        // ===== 步骤6: 饲养管理提醒 =====
        let mut reminders = Vec::new();
        if batch.production_type == ProductionType::Layer {
            reminders.extend(self.husbandry.nutrition_reminder(current_week));
        }
        reminders.extend(self.husbandry.supplement_reminder(age_days));
        if let Some(reminder) = &lighting.reminder {
            reminders.push(reminder.render());
        }
        let feeding_periods = (batch.production_type == ProductionType::Broiler)
            .then(|| self.husbandry.feeding_periods_for_day(age_days));

        let alerts = self.aggregator.aggregate(alerts);
        if let Some(severity) = alerts.highest_severity {
            warn!(batch_id = %batch.id, %severity, count = alerts.alerts.len(), "批次存在告警");
        }

        LotReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            as_of,
            batch_id: batch.id.clone(),
            production_type: batch.production_type,
            genetic_line: batch.genetic_line.clone(),
            age_days,
            age_label: self.age.format_age(reference, as_of),
            current_week,
            kpis,
            comparison,
            cost_allocation,
            valuation,
            environment,
            egg_production,
            lighting,
            behavior,
            dashboard,
            reminders,
            feeding_periods,
            alerts,
        }
    }
}
