// ==========================================
// 家禽生产分析系统 - 内存批次仓储
// ==========================================
// 职责: 以 FarmSnapshot 为数据源实现 LotDataSource
// 并发: RwLock 保护; 追加日报时的存栏扣减在同一写锁内完成
// ==========================================

use crate::domain::batch::{Batch, CostSnapshot};
use crate::domain::records::{
    BirdBehaviorObservation, DailyRecord, EggProductionRecord, EnvironmentalReading,
    LightingReading,
};
use crate::domain::snapshot::FarmSnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::lot_data_source::LotDataSource;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

// ==========================================
// InMemoryLotRepository
// ==========================================
pub struct InMemoryLotRepository {
    data: RwLock<FarmSnapshot>,
}

/// 按日期稳定排序
fn sort_by_date<T>(items: &mut [T], date_of: impl Fn(&T) -> NaiveDate) {
    items.sort_by_key(|item| date_of(item));
}

/// 过滤指定批次记录
fn for_batch<T: Clone>(items: &[T], batch_id: &str, id_of: impl Fn(&T) -> &str) -> Vec<T> {
    items
        .iter()
        .filter(|item| id_of(item) == batch_id)
        .cloned()
        .collect()
}

impl InMemoryLotRepository {
    /// 由快照创建仓储,各类记录按日期排序
    pub fn from_snapshot(mut snapshot: FarmSnapshot) -> Self {
        sort_by_date(&mut snapshot.daily_records, |r| r.date);
        sort_by_date(&mut snapshot.environmental_readings, |r| r.date);
        sort_by_date(&mut snapshot.egg_records, |r| r.date);
        sort_by_date(&mut snapshot.lighting_readings, |r| r.date);
        sort_by_date(&mut snapshot.cost_snapshots, |s| s.date);
        sort_by_date(&mut snapshot.behavior_observations, |o| o.date);

        info!(
            batches = snapshot.batches.len(),
            records = snapshot.record_count(),
            "内存仓储已装载"
        );
        Self {
            data: RwLock::new(snapshot),
        }
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, FarmSnapshot>> {
        self.data
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, FarmSnapshot>> {
        self.data
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_batch(data: &FarmSnapshot, batch_id: &str) -> RepositoryResult<()> {
        if data.batches.iter().any(|b| b.id == batch_id) {
            Ok(())
        } else {
            Err(RepositoryError::NotFound {
                entity: "Batch".to_string(),
                id: batch_id.to_string(),
            })
        }
    }

    // ===== 写入 =====

    /// 追加日报并扣减存栏 (单次读-改-写)
    ///
    /// # 返回
    /// - Ok(u32): 扣减后的当前存栏
    pub fn append_daily_record(&self, record: DailyRecord) -> RepositoryResult<u32> {
        let mut data = self.write()?;
        let batch = data
            .batches
            .iter_mut()
            .find(|b| b.id == record.batch_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Batch".to_string(),
                id: record.batch_id.clone(),
            })?;
        batch.current_bird_count = batch.current_bird_count.saturating_sub(record.daily_mortality);
        let remaining = batch.current_bird_count;

        let pos = data
            .daily_records
            .partition_point(|r| r.date <= record.date);
        debug!(batch_id = %record.batch_id, date = %record.date, remaining, "追加日报");
        data.daily_records.insert(pos, record);
        Ok(remaining)
    }

    /// 追加成本快照
    ///
    /// # 返回
    /// - Err(RepositoryError::DataSourceError): 日期早于该批次最近快照,
    ///   或累计转化成本低于最近快照
    pub fn append_cost_snapshot(&self, snapshot: CostSnapshot) -> RepositoryResult<()> {
        let mut data = self.write()?;
        Self::ensure_batch(&data, &snapshot.batch_id)?;

        if let Some(last) = data
            .cost_snapshots
            .iter()
            .filter(|s| s.batch_id == snapshot.batch_id)
            .last()
        {
            if snapshot.date < last.date {
                return Err(RepositoryError::DataSourceError(format!(
                    "成本快照日期倒退: batch_id={}, last={}, new={}",
                    snapshot.batch_id, last.date, snapshot.date
                )));
            }
            if snapshot.cumulative_transformation_cost < last.cumulative_transformation_cost {
                return Err(RepositoryError::DataSourceError(format!(
                    "累计转化成本下降: batch_id={}, last={}, new={}",
                    snapshot.batch_id,
                    last.cumulative_transformation_cost,
                    snapshot.cumulative_transformation_cost
                )));
            }
        }

        let pos = data
            .cost_snapshots
            .partition_point(|s| s.date <= snapshot.date);
        data.cost_snapshots.insert(pos, snapshot);
        Ok(())
    }
}

#[async_trait]
impl LotDataSource for InMemoryLotRepository {
    async fn batch(&self, batch_id: &str) -> RepositoryResult<Batch> {
        let data = self.read()?;
        data.batches
            .iter()
            .find(|b| b.id == batch_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Batch".to_string(),
                id: batch_id.to_string(),
            })
    }

    async fn active_batches(&self) -> RepositoryResult<Vec<Batch>> {
        let data = self.read()?;
        Ok(data.batches.iter().filter(|b| b.is_active()).cloned().collect())
    }

    async fn daily_records(&self, batch_id: &str) -> RepositoryResult<Vec<DailyRecord>> {
        let data = self.read()?;
        Self::ensure_batch(&data, batch_id)?;
        Ok(for_batch(&data.daily_records, batch_id, |r| r.batch_id.as_str()))
    }

    async fn environmental_readings(
        &self,
        batch_id: &str,
    ) -> RepositoryResult<Vec<EnvironmentalReading>> {
        let data = self.read()?;
        Self::ensure_batch(&data, batch_id)?;
        Ok(for_batch(&data.environmental_readings, batch_id, |r| r.batch_id.as_str()))
    }

    async fn egg_records(&self, batch_id: &str) -> RepositoryResult<Vec<EggProductionRecord>> {
        let data = self.read()?;
        Self::ensure_batch(&data, batch_id)?;
        Ok(for_batch(&data.egg_records, batch_id, |r| r.batch_id.as_str()))
    }

    async fn lighting_readings(&self, batch_id: &str) -> RepositoryResult<Vec<LightingReading>> {
        let data = self.read()?;
        Self::ensure_batch(&data, batch_id)?;
        Ok(for_batch(&data.lighting_readings, batch_id, |r| r.batch_id.as_str()))
    }

    async fn behavior_observations(
        &self,
        batch_id: &str,
    ) -> RepositoryResult<Vec<BirdBehaviorObservation>> {
        let data = self.read()?;
        Self::ensure_batch(&data, batch_id)?;
        Ok(for_batch(&data.behavior_observations, batch_id, |o| o.batch_id.as_str()))
    }

    async fn latest_cost_snapshot(&self, batch_id: &str) -> RepositoryResult<Option<CostSnapshot>> {
        let data = self.read()?;
        Self::ensure_batch(&data, batch_id)?;
        Ok(data
            .cost_snapshots
            .iter()
            .filter(|s| s.batch_id == batch_id)
            .last()
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{BatchStatus, GeneticLine, ProductionType};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn batch(id: &str, status: BatchStatus, birds: u32) -> Batch {
        Batch {
            id: id.to_string(),
            production_type: ProductionType::Broiler,
            genetic_line: GeneticLine::Cobb500,
            start_date: d(1),
            birth_date: None,
            initial_bird_count: birds,
            current_bird_count: birds,
            unit_chick_cost: 1.2,
            status,
            finish_date: None,
        }
    }

    fn record(id: &str, day: u32, mortality: u32) -> DailyRecord {
        DailyRecord {
            batch_id: id.to_string(),
            date: d(day),
            daily_mortality: mortality,
            feed_consumed_kg: 10.0,
            water_consumed_l: 0.0,
            average_weight_g: None,
            eggs_produced: 0,
        }
    }

    fn repo() -> InMemoryLotRepository {
        InMemoryLotRepository::from_snapshot(FarmSnapshot {
            batches: vec![
                batch("B1", BatchStatus::Active, 1000),
                batch("B2", BatchStatus::Active, 500),
                batch("B3", BatchStatus::Finished, 800),
            ],
            daily_records: vec![record("B1", 3, 1), record("B2", 1, 0), record("B1", 1, 2)],
            ..FarmSnapshot::default()
        })
    }

    #[tokio::test]
    async fn test_records_ordered_and_filtered() {
        let repo = repo();
        let records = repo.daily_records("B1").await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].date < records[1].date);
    }

    #[tokio::test]
    async fn test_unknown_batch_not_found() {
        let repo = repo();
        assert!(matches!(
            repo.batch("NOPE").await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            repo.daily_records("NOPE").await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_farm_live_birds_counts_active_only() {
        let repo = repo();
        assert_eq!(repo.active_batches().await.unwrap().len(), 2);
        assert_eq!(repo.farm_live_birds().await.unwrap(), 1500);
    }

    #[tokio::test]
    async fn test_append_daily_record_decrements_count() {
        let repo = repo();
        assert_eq!(repo.append_daily_record(record("B2", 2, 5)).unwrap(), 495);
        assert_eq!(repo.batch("B2").await.unwrap().current_bird_count, 495);
        assert_eq!(repo.daily_records("B2").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cost_snapshot_latest_and_monotonic_dates() {
        let repo = repo();
        let snap = |day, cum| CostSnapshot {
            batch_id: "B1".to_string(),
            date: d(day),
            feed_cost: 0.0,
            vaccine_cost: 0.0,
            allocated_overhead: 0.0,
            cumulative_transformation_cost: cum,
        };
        assert!(repo.latest_cost_snapshot("B1").await.unwrap().is_none());
        repo.append_cost_snapshot(snap(2, 100.0)).unwrap();
        repo.append_cost_snapshot(snap(3, 180.0)).unwrap();
        assert!(repo.append_cost_snapshot(snap(1, 200.0)).is_err());
        let latest = repo.latest_cost_snapshot("B1").await.unwrap().unwrap();
        assert_eq!(latest.cumulative_transformation_cost, 180.0);
    }

    #[tokio::test]
    async fn test_cost_snapshot_rejects_decreasing_cumulative() {
        let repo = repo();
        let snap = |day, cum| CostSnapshot {
            batch_id: "B1".to_string(),
            date: d(day),
            feed_cost: 0.0,
            vaccine_cost: 0.0,
            allocated_overhead: 0.0,
            cumulative_transformation_cost: cum,
        };
        repo.append_cost_snapshot(snap(1, 1000.0)).unwrap();
        assert!(matches!(
            repo.append_cost_snapshot(snap(2, 10.0)),
            Err(RepositoryError::DataSourceError(_))
        ));
        // 持平允许
        repo.append_cost_snapshot(snap(2, 1000.0)).unwrap();

        let latest = repo.latest_cost_snapshot("B1").await.unwrap().unwrap();
        assert_eq!(latest.date, d(2));
        assert_eq!(latest.cumulative_transformation_cost, 1000.0);
    }
}
