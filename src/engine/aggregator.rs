// ==========================================
// 家禽生产分析系统 - 时间序列聚合器
// ==========================================
// 职责: 将有序日报折叠为累计量 (耗料/死淘/产蛋) 与逐日明细
// 输入: 批次 + 日报集合 (可乱序,内部按日期稳定排序)
// 输出: BatchAggregate
// ==========================================
// 存栏 = 入舍数 - 累计死淘 (下限 0)
// 抽样体重取最近一次非空值并向后延续
// ==========================================

use crate::domain::batch::Batch;
use crate::domain::records::DailyRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ==========================================
// AggregatePoint - 逐日累计点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatePoint {
    pub date: NaiveDate,
    pub day: i64,                   // 相对入舍日期的天数
    pub daily_mortality: u32,
    pub cumulative_mortality: u32,
    pub feed_consumed_kg: f64,
    pub cumulative_feed_kg: f64,
    pub cumulative_eggs: u64,
    pub live_birds: u32,
    pub sampled_weight_g: Option<f64>,
}

// ==========================================
// WeightSample - 抽样体重行 (对标比较的实际值一侧)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    pub date: NaiveDate,
    pub day: i64,
    pub real_weight_g: f64,
    pub real_fcr: f64, // 截至当日累计料肉比
}

// ==========================================
// BatchAggregate - 聚合结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchAggregate {
    pub points: Vec<AggregatePoint>,
    pub weight_samples: Vec<WeightSample>,
    pub cumulative_feed_kg: f64,
    pub cumulative_mortality: u32,
    pub cumulative_eggs: u64,
    pub live_birds: u32,
    pub last_sampled_weight_g: Option<f64>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl BatchAggregate {
    pub fn record_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 累计料肉比: 耗料 / (体重kg × 存栏),增重为 0 时返回 0
pub fn cumulative_fcr(cumulative_feed_kg: f64, weight_g: f64, live_birds: u32) -> f64 {
    let gain_kg = weight_g / 1000.0 * live_birds as f64;
    if gain_kg > 0.0 {
        cumulative_feed_kg / gain_kg
    } else {
        0.0
    }
}

// ==========================================
// TimeSeriesAggregator
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSeriesAggregator;

impl TimeSeriesAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 按日期稳定排序 (同日记录保持输入顺序)
    pub fn sort_records(&self, records: &[DailyRecord]) -> Vec<DailyRecord> {
        let mut sorted = records.to_vec();
        sorted.sort_by_key(|r| r.date);
        sorted
    }

    /// 折叠日报为累计量
    #[instrument(skip(self, batch, records), fields(batch_id = %batch.id, count = records.len()))]
    pub fn aggregate(&self, batch: &Batch, records: &[DailyRecord]) -> BatchAggregate {
        let sorted = self.sort_records(records);

        let mut agg = BatchAggregate {
            live_birds: batch.initial_bird_count,
            ..Default::default()
        };

        for record in &sorted {
            agg.cumulative_mortality += record.daily_mortality;
            agg.cumulative_feed_kg += record.feed_consumed_kg;
            agg.cumulative_eggs += record.eggs_produced as u64;
            agg.live_birds = batch
                .initial_bird_count
                .saturating_sub(agg.cumulative_mortality);

            let day = (record.date - batch.start_date).num_days();
            let sampled = record.average_weight_g.filter(|w| *w > 0.0);

            if let Some(weight) = sampled {
                agg.last_sampled_weight_g = Some(weight);
                agg.weight_samples.push(WeightSample {
                    date: record.date,
                    day,
                    real_weight_g: weight,
                    real_fcr: cumulative_fcr(agg.cumulative_feed_kg, weight, agg.live_birds),
                });
            }

            agg.points.push(AggregatePoint {
                date: record.date,
                day,
                daily_mortality: record.daily_mortality,
                cumulative_mortality: agg.cumulative_mortality,
                feed_consumed_kg: record.feed_consumed_kg,
                cumulative_feed_kg: agg.cumulative_feed_kg,
                cumulative_eggs: agg.cumulative_eggs,
                live_birds: agg.live_birds,
                sampled_weight_g: sampled,
            });
        }

        agg.first_date = sorted.first().map(|r| r.date);
        agg.last_date = sorted.last().map(|r| r.date);
        agg
    }
}
