// ==========================================
// 家禽生产分析系统 - 分析 API
// ==========================================
// 职责: 面向展示层的同步计算接口,封装各计算器
// 架构: API 层 → Engine 层 (纯计算)
// 校验: 记录须属于所给批次,其余缺数据情形由引擎返回中性默认值
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::engine_config::EngineConfig;
use crate::domain::alert::Alert;
use crate::domain::batch::{Batch, CostSnapshot};
use crate::domain::records::{
    BirdBehaviorObservation, DailyRecord, EggProductionRecord, EnvironmentalReading,
    LightingReading,
};
use crate::domain::types::{GeneticLine, ProductionType};
use crate::engine::behavior::{BehaviorAssessment, BehaviorMonitor, LotDashboard};
use crate::engine::economics::{
    BiologicalAssetValuation, EconomicsCalculator, LayerDailyEconomics, LayerDailyInput,
    SaleRequest, SaleSettlement,
};
use crate::engine::egg_production::{
    EggEconomics, EggProductionAnalyzer, GeneticLinePerformance, ProductionSummary,
};
use crate::engine::environment::{EnvironmentAssessment, EnvironmentalScoringEngine};
use crate::engine::lighting::{LightingComplianceEvaluator, LightingEvaluation, LightingLog};
use crate::engine::performance::{ComparisonRow, KpiResult, PerformanceIndexCalculator};
use chrono::NaiveDate;

// ==========================================
// AnalyticsApi
// ==========================================
pub struct AnalyticsApi {
    performance: PerformanceIndexCalculator,
    environment: EnvironmentalScoringEngine,
    eggs: EggProductionAnalyzer,
    lighting: LightingComplianceEvaluator,
    behavior: BehaviorMonitor,
    economics: EconomicsCalculator,
}

impl AnalyticsApi {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
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
            economics: EconomicsCalculator::new(),
        }
    }

    // ==========================================
    // 生产性能
    // ==========================================

    /// 批次 KPI
    ///
    /// # 返回
    /// - Ok(None): 无日报
    /// - Err(ApiError::ValidationError): 日报不属于该批次
    pub fn compute_kpis(&self, batch: &Batch, records: &[DailyRecord]) -> ApiResult<Option<KpiResult>> {
        ensure_same_batch(&batch.id, records.iter().map(|r| r.batch_id.as_str()))?;
        Ok(self.performance.compute_kpis(batch, records))
    }

    /// 抽样体重日对标遗传标准
    pub fn compare_to_standard(
        &self,
        batch: &Batch,
        records: &[DailyRecord],
    ) -> ApiResult<Vec<ComparisonRow>> {
        ensure_same_batch(&batch.id, records.iter().map(|r| r.batch_id.as_str()))?;
        Ok(self.performance.compare_to_standard(batch, records))
    }

    // ==========================================
    // 环境
    // ==========================================

    pub fn score_environment(
        &self,
        batch: &Batch,
        reading: &EnvironmentalReading,
    ) -> ApiResult<EnvironmentAssessment> {
        ensure_same_batch(&batch.id, std::iter::once(reading.batch_id.as_str()))?;
        Ok(self.environment.evaluate(batch, reading))
    }

    // ==========================================
    // 蛋品
    // ==========================================

    pub fn summarize_egg_production(&self, records: &[EggProductionRecord]) -> ProductionSummary {
        self.eggs.summarize(records)
    }

    pub fn evaluate_genetic_line(
        &self,
        line: &GeneticLine,
        records: &[EggProductionRecord],
        bird_count: u32,
    ) -> GeneticLinePerformance {
        self.eggs.evaluate_genetic_line(line, records, bird_count)
    }

    pub fn check_production_quality(
        &self,
        summary: &ProductionSummary,
        line_performance: Option<&GeneticLinePerformance>,
    ) -> Vec<Alert> {
        self.eggs.check_production_quality(summary, line_performance)
    }

    pub fn value_production(&self, summary: &ProductionSummary) -> EggEconomics {
        self.eggs.value_production(summary)
    }

    // ==========================================
    // 光照
    // ==========================================

    /// 光照评估
    ///
    /// # 参数
    /// - current_week: 给出时附带下周调整提醒
    pub fn evaluate_lighting(
        &self,
        readings: &[LightingReading],
        production_type: ProductionType,
        current_week: Option<i64>,
    ) -> LightingEvaluation {
        self.lighting.evaluate(readings, production_type, current_week)
    }

    pub fn evaluate_lighting_log(
        &self,
        log: &LightingLog,
        production_type: ProductionType,
        current_week: Option<i64>,
    ) -> LightingEvaluation {
        self.lighting
            .evaluate(log.readings(), production_type, current_week)
    }

    // ==========================================
    // 行为巡检
    // ==========================================

    pub fn evaluate_behavior(
        &self,
        batch: &Batch,
        observation: &BirdBehaviorObservation,
    ) -> ApiResult<BehaviorAssessment> {
        ensure_same_batch(&batch.id, std::iter::once(observation.batch_id.as_str()))?;
        if !(0.0..=100.0).contains(&observation.active_percent) {
            return Err(ApiError::InvalidInput(format!(
                "活跃占比应在 [0, 100] 内,实际 {}",
                observation.active_percent
            )));
        }
        Ok(self.behavior.evaluate(observation))
    }

    /// 批次看板: 最近一次行为巡检 + 日报累计死淘率
    ///
    /// # 参数
    /// - observation: 最近一次巡检,无巡检时行为状态按正常处理
    pub fn lot_dashboard(
        &self,
        batch: &Batch,
        records: &[DailyRecord],
        observation: Option<&BirdBehaviorObservation>,
        as_of: NaiveDate,
    ) -> ApiResult<LotDashboard> {
        ensure_same_batch(&batch.id, records.iter().map(|r| r.batch_id.as_str()))?;
        let behavior = observation
            .map(|o| self.evaluate_behavior(batch, o))
            .transpose()?;
        let mortality = self
            .performance
            .compute_kpis(batch, records)
            .and_then(|k| self.performance.mortality_alert(&k));
        Ok(self
            .behavior
            .dashboard(&batch.id, as_of, behavior.as_ref(), mortality.as_ref()))
    }

    // ==========================================
    // 经济
    // ==========================================

    pub fn layer_daily_economics(&self, input: &LayerDailyInput) -> ApiResult<LayerDailyEconomics> {
        if input.feed_consumed_kg < 0.0 || input.egg_mass_g < 0.0 {
            return Err(ApiError::InvalidInput(
                "耗料量与蛋重不能为负".to_string(),
            ));
        }
        Ok(self.economics.layer_daily(input))
    }

    pub fn settle_sale(&self, request: &SaleRequest) -> ApiResult<SaleSettlement> {
        if request.average_weight_kg < 0.0 {
            return Err(ApiError::InvalidInput("平均体重不能为负".to_string()));
        }
        Ok(self.economics.settle_sale(request))
    }

    pub fn value_biological_asset(
        &self,
        batch: &Batch,
        latest_snapshot: Option<&CostSnapshot>,
    ) -> ApiResult<BiologicalAssetValuation> {
        if let Some(snapshot) = latest_snapshot {
            ensure_same_batch(&batch.id, std::iter::once(snapshot.batch_id.as_str()))?;
        }
        Ok(self.economics.value_biological_asset(batch, latest_snapshot))
    }
}

fn ensure_same_batch<'a>(
    batch_id: &str,
    mut record_ids: impl Iterator<Item = &'a str>,
) -> ApiResult<()> {
    match record_ids.find(|id| *id != batch_id) {
        Some(other) => Err(ApiError::ValidationError(format!(
            "记录批次不匹配: 期望 {}，实际 {}",
            batch_id, other
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::BatchStatus;

    fn batch() -> Batch {
        Batch {
            id: "L1".into(),
            production_type: ProductionType::Broiler,
            genetic_line: GeneticLine::Cobb500,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            birth_date: None,
            initial_bird_count: 100,
            current_bird_count: 100,
            unit_chick_cost: 1.0,
            status: BatchStatus::Active,
            finish_date: None,
        }
    }

    fn record(batch_id: &str) -> DailyRecord {
        DailyRecord {
            batch_id: batch_id.into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            daily_mortality: 0,
            feed_consumed_kg: 5.0,
            water_consumed_l: 0.0,
            average_weight_g: None,
            eggs_produced: 0,
        }
    }

    #[test]
    fn test_compute_kpis_rejects_foreign_records() {
        let api = AnalyticsApi::new(&EngineConfig::default());
        assert!(api.compute_kpis(&batch(), &[record("L1")]).unwrap().is_some());
        assert!(api.compute_kpis(&batch(), &[]).unwrap().is_none());
        assert!(matches!(
            api.compute_kpis(&batch(), &[record("L1"), record("L2")]),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn test_behavior_input_validated() {
        let api = AnalyticsApi::new(&EngineConfig::default());
        let mut observation = BirdBehaviorObservation {
            batch_id: "L1".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            active_percent: 130.0,
            feeding_activity: crate::domain::types::FeedingActivityLevel::Normal,
            signs_of_stress: false,
            abnormal_behaviors: vec![],
        };
        assert!(matches!(
            api.evaluate_behavior(&batch(), &observation),
            Err(ApiError::InvalidInput(_))
        ));
        observation.active_percent = 80.0;
        observation.batch_id = "L2".into();
        assert!(matches!(
            api.evaluate_behavior(&batch(), &observation),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn test_layer_daily_rejects_negative_input() {
        let api = AnalyticsApi::new(&EngineConfig::default());
        let input = LayerDailyInput {
            batch_id: "L1".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            feed_consumed_kg: -1.0,
            feed_cost_per_kg: 3.0,
            egg_mass_g: 1000.0,
            egg_price_per_kg: 10.0,
            other_costs: 0.0,
        };
        assert!(matches!(
            api.layer_daily_economics(&input),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
