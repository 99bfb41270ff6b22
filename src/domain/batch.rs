// ==========================================
// 家禽生产分析系统 - 批次领域模型
// ==========================================
// 批次 (Lot/Batch) 与成本快照
// 红线: 核心引擎只读,不修改批次
// ==========================================

use crate::domain::types::{BatchStatus, GeneticLine, ProductionType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Batch - 生产批次
// ==========================================
// 不变式: current_bird_count <= initial_bird_count (由存储层保证)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: String,                        // 批次ID
    pub production_type: ProductionType,   // 生产类型
    pub genetic_line: GeneticLine,         // 遗传品系
    pub start_date: NaiveDate,             // 入舍日期
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,     // 出雏日期
    pub initial_bird_count: u32,           // 入舍数量
    pub current_bird_count: u32,           // 当前存栏
    pub unit_chick_cost: f64,              // 雏鸡单价
    pub status: BatchStatus,               // 批次状态
    #[serde(default)]
    pub finish_date: Option<NaiveDate>,    // 出栏日期
}

impl Batch {
    /// 日龄参考日期: 有出雏日期用出雏日期,否则用入舍日期
    pub fn age_reference_date(&self) -> NaiveDate {
        self.birth_date.unwrap_or(self.start_date)
    }

    pub fn is_active(&self) -> bool {
        self.status == BatchStatus::Active
    }

    /// 雏鸡总成本
    pub fn chick_cost(&self) -> f64 {
        self.initial_bird_count as f64 * self.unit_chick_cost
    }
}

// ==========================================
// CostSnapshot - 成本快照
// ==========================================
// 同一批次按日期递增,cumulative_transformation_cost 单调不减
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSnapshot {
    pub batch_id: String,
    pub date: NaiveDate,
    pub feed_cost: f64,                       // 当日饲料成本
    pub vaccine_cost: f64,                    // 当日疫苗成本
    pub allocated_overhead: f64,              // 当日分摊间接费用
    pub cumulative_transformation_cost: f64,  // 累计转化成本
}
