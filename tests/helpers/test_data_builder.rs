// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{Duration, NaiveDate};
use poultry_analytics::domain::records::{ColorCounts, GradeCounts};
use poultry_analytics::domain::types::{
    BatchStatus, FeedingActivityLevel, GeneticLine, ProductionType, VentilationStatus,
};
use poultry_analytics::{
    Batch, BirdBehaviorObservation, DailyRecord, EggProductionRecord, EnvironmentalReading,
    LightingReading,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// Batch 构建器
// ==========================================

pub struct BatchBuilder {
    id: String,
    production_type: ProductionType,
    genetic_line: GeneticLine,
    start_date: NaiveDate,
    birth_date: Option<NaiveDate>,
    initial_bird_count: u32,
    current_bird_count: Option<u32>,
    unit_chick_cost: f64,
    status: BatchStatus,
}

impl BatchBuilder {
    pub fn broiler(id: &str) -> Self {
        Self {
            id: id.to_string(),
            production_type: ProductionType::Broiler,
            genetic_line: GeneticLine::Cobb500,
            start_date: date(2024, 3, 1),
            birth_date: None,
            initial_bird_count: 1000,
            current_bird_count: None,
            unit_chick_cost: 1.5,
            status: BatchStatus::Active,
        }
    }

    pub fn layer(id: &str) -> Self {
        Self {
            production_type: ProductionType::Layer,
            genetic_line: GeneticLine::HylineBrown,
            unit_chick_cost: 4.0,
            ..Self::broiler(id)
        }
    }

    pub fn line(mut self, line: GeneticLine) -> Self {
        self.genetic_line = line;
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    pub fn birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn birds(mut self, initial: u32) -> Self {
        self.initial_bird_count = initial;
        self
    }

    pub fn current_birds(mut self, current: u32) -> Self {
        self.current_bird_count = Some(current);
        self
    }

    pub fn finished(mut self) -> Self {
        self.status = BatchStatus::Finished;
        self
    }

    pub fn build(self) -> Batch {
        Batch {
            id: self.id,
            production_type: self.production_type,
            genetic_line: self.genetic_line,
            start_date: self.start_date,
            birth_date: self.birth_date,
            initial_bird_count: self.initial_bird_count,
            current_bird_count: self.current_bird_count.unwrap_or(self.initial_bird_count),
            unit_chick_cost: self.unit_chick_cost,
            status: self.status,
            finish_date: None,
        }
    }
}

// ==========================================
// 记录构建函数
// ==========================================

/// 批次入舍后第 day 天的日报
pub fn daily(batch: &Batch, day: i64, mortality: u32, feed_kg: f64, weight_g: Option<f64>) -> DailyRecord {
    DailyRecord {
        batch_id: batch.id.clone(),
        date: batch.start_date + Duration::days(day),
        daily_mortality: mortality,
        feed_consumed_kg: feed_kg,
        water_consumed_l: feed_kg * 2.0,
        average_weight_g: weight_g,
        eggs_produced: 0,
    }
}

pub fn env_reading(batch: &Batch, day: i64, temp: f64, humidity: f64) -> EnvironmentalReading {
    EnvironmentalReading {
        batch_id: batch.id.clone(),
        date: batch.start_date + Duration::days(day),
        temperature_c: temp,
        humidity_percent: humidity,
        ventilation_rate: 2.5,
        ventilation_status: VentilationStatus::Excellent,
        co2_ppm: None,
        ammonia_ppm: None,
        oxygen_percent: None,
    }
}

/// 按等级计数的产蛋记录,颜色全部计为褐壳
pub fn egg_record(batch_id: &str, date: NaiveDate, xl: u32, l: u32, m: u32, s: u32, cracked: u32) -> EggProductionRecord {
    let total = xl + l + m + s + cracked;
    EggProductionRecord {
        batch_id: batch_id.to_string(),
        date,
        by_color: ColorCounts {
            brown: total,
            ..ColorCounts::default()
        },
        by_grade: GradeCounts {
            xl,
            l,
            m,
            s,
            cracked,
            dirty: 0,
        },
        average_weight_g: 62.0,
        total_weight_kg: total as f64 * 0.062,
    }
}

pub fn lighting(batch_id: &str, date: NaiveDate, actual: f64, target: f64) -> LightingReading {
    LightingReading {
        batch_id: batch_id.to_string(),
        date,
        actual_light_hours: actual,
        actual_intensity_lux: 10.0,
        target_light_hours: target,
        target_intensity_lux: 10.0,
        start_time: None,
        end_time: None,
    }
}

/// 批次入舍后第 day 天的行为巡检
pub fn behavior(batch: &Batch, day: i64, active_percent: f64, stress: bool, abnormal: &[&str]) -> BirdBehaviorObservation {
    BirdBehaviorObservation {
        batch_id: batch.id.clone(),
        date: batch.start_date + Duration::days(day),
        active_percent,
        feeding_activity: FeedingActivityLevel::Normal,
        signs_of_stress: stress,
        abnormal_behaviors: abnormal.iter().map(|b| b.to_string()).collect(),
    }
}
