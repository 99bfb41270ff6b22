// ==========================================
// 家禽生产分析系统 - 批次数据源 Trait
// ==========================================
// 职责: 定义评估流程所需的只读数据访问接口（不包含实现）
// 红线: 不包含业务逻辑; 各类记录按日期升序返回
// ==========================================

use crate::domain::batch::{Batch, CostSnapshot};
use crate::domain::records::{
    BirdBehaviorObservation, DailyRecord, EggProductionRecord, EnvironmentalReading,
    LightingReading,
};
use crate::engine::performance::farm_live_birds;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// LotDataSource Trait
// ==========================================
// 实现者: InMemoryLotRepository（由 FarmSnapshot 装载）
#[async_trait]
pub trait LotDataSource: Send + Sync {
    // ===== 批次 =====

    /// 按 ID 查询批次
    ///
    /// # 返回
    /// - Err(RepositoryError::NotFound): 批次不存在
    async fn batch(&self, batch_id: &str) -> RepositoryResult<Batch>;

    /// 全部在养批次
    async fn active_batches(&self) -> RepositoryResult<Vec<Batch>>;

    // ===== 现场记录 (按日期升序) =====

    async fn daily_records(&self, batch_id: &str) -> RepositoryResult<Vec<DailyRecord>>;

    async fn environmental_readings(
        &self,
        batch_id: &str,
    ) -> RepositoryResult<Vec<EnvironmentalReading>>;

    async fn egg_records(&self, batch_id: &str) -> RepositoryResult<Vec<EggProductionRecord>>;

    async fn lighting_readings(&self, batch_id: &str) -> RepositoryResult<Vec<LightingReading>>;

    async fn behavior_observations(
        &self,
        batch_id: &str,
    ) -> RepositoryResult<Vec<BirdBehaviorObservation>>;

    // ===== 成本 =====

    /// 最近一条成本快照,无快照时返回 None
    async fn latest_cost_snapshot(&self, batch_id: &str) -> RepositoryResult<Option<CostSnapshot>>;

    /// 全场在养存栏 (用于间接费用分摊)
    async fn farm_live_birds(&self) -> RepositoryResult<u64> {
        let batches = self.active_batches().await?;
        Ok(farm_live_birds(&batches))
    }
}
