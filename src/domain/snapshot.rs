// ==========================================
// 家禽生产分析系统 - 养殖场数据快照
// ==========================================
// 一次性装载的全场数据,供内存仓储与导入器使用
// ==========================================

use crate::domain::batch::{Batch, CostSnapshot};
use crate::domain::records::{
    BirdBehaviorObservation, DailyRecord, EggProductionRecord, EnvironmentalReading,
    LightingReading,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmSnapshot {
    pub batches: Vec<Batch>,
    pub daily_records: Vec<DailyRecord>,
    pub environmental_readings: Vec<EnvironmentalReading>,
    pub egg_records: Vec<EggProductionRecord>,
    pub lighting_readings: Vec<LightingReading>,
    pub cost_snapshots: Vec<CostSnapshot>,
    pub behavior_observations: Vec<BirdBehaviorObservation>,
}

impl FarmSnapshot {
    pub fn record_count(&self) -> usize {
        self.daily_records.len()
            + self.environmental_readings.len()
            + self.egg_records.len()
            + self.lighting_readings.len()
            + self.cost_snapshots.len()
            + self.behavior_observations.len()
    }
}
