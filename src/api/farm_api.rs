// ==========================================
// 家禽生产分析系统 - 养殖场评估 API
// ==========================================
// 职责: 封装 LotEvaluationOrchestrator,提供批次/全场评估
// 架构: API 层 → 编排器 → 数据源 (LotDataSource)
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::engine_config::EngineConfig;
use crate::engine::orchestrator::{LotEvaluationOrchestrator, LotReport};
use crate::importer::snapshot_loader::load_snapshot;
use crate::repository::in_memory_repo::InMemoryLotRepository;
use crate::repository::lot_data_source::LotDataSource;
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;

pub struct FarmApi<S>
where
    S: LotDataSource,
{
    orchestrator: LotEvaluationOrchestrator<S>,
}

impl<S> FarmApi<S>
where
    S: LotDataSource,
{
    pub fn new(source: Arc<S>, config: &EngineConfig) -> Self {
        Self {
            orchestrator: LotEvaluationOrchestrator::new(source, config),
        }
    }

    /// 评估单个批次
    ///
    /// # 返回
    /// - Err(ApiError::InvalidInput): 批次ID为空
    /// - Err(ApiError::NotFound): 批次不存在
    pub async fn evaluate_lot(&self, batch_id: &str, as_of: NaiveDate) -> ApiResult<LotReport> {
        if batch_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("批次ID不能为空".to_string()));
        }
        Ok(self.orchestrator.evaluate_lot(batch_id, as_of).await?)
    }

    /// 评估全部在养批次
    pub async fn evaluate_farm(&self, as_of: NaiveDate) -> ApiResult<Vec<LotReport>> {
        Ok(self.orchestrator.evaluate_active_lots(as_of).await?)
    }
}

impl FarmApi<InMemoryLotRepository> {
    /// 由快照文件创建 (内存数据源)
    pub fn from_snapshot_file<P: AsRef<Path>>(path: P, config: &EngineConfig) -> ApiResult<Self> {
        let snapshot = load_snapshot(path)?;
        let repo = Arc::new(InMemoryLotRepository::from_snapshot(snapshot));
        Ok(Self::new(repo, config))
    }
}
