// ==========================================
// 家禽生产分析系统 - 现场记录领域模型
// ==========================================
// 日报 / 环境读数 / 产蛋记录 / 光照读数 / 行为巡检
// 所有记录只追加,写入后不可变
// ==========================================

use crate::domain::types::{EggColor, EggGrade, FeedingActivityLevel, VentilationStatus};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// DailyRecord - 生产日报
// ==========================================
// 按 date 排序; 日期不要求连续
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub batch_id: String,
    pub date: NaiveDate,
    pub daily_mortality: u32,          // 当日死淘
    pub feed_consumed_kg: f64,         // 当日耗料 (kg)
    #[serde(default)]
    pub water_consumed_l: f64,         // 当日饮水 (L)
    #[serde(default)]
    pub average_weight_g: Option<f64>, // 抽样体重 (g),非每日
    #[serde(default)]
    pub eggs_produced: u32,            // 当日产蛋
}

// ==========================================
// EnvironmentalReading - 环境读数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    pub batch_id: String,
    pub date: NaiveDate,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub ventilation_rate: f64, // 换气次数 (次/小时)
    pub ventilation_status: VentilationStatus,
    #[serde(default)]
    pub co2_ppm: Option<f64>,
    #[serde(default)]
    pub ammonia_ppm: Option<f64>,
    #[serde(default)]
    pub oxygen_percent: Option<f64>,
}

// ==========================================
// 蛋品计数: 按颜色 / 按等级
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCounts {
    #[serde(default)]
    pub white: u32,
    #[serde(default)]
    pub brown: u32,
    #[serde(default)]
    pub blue: u32,
    #[serde(default)]
    pub cream: u32,
}

impl ColorCounts {
    pub fn get(&self, color: EggColor) -> u32 {
        match color {
            EggColor::White => self.white,
            EggColor::Brown => self.brown,
            EggColor::Blue => self.blue,
            EggColor::Cream => self.cream,
        }
    }

    /// 总蛋数以颜色计数为准
    pub fn total(&self) -> u32 {
        self.white + self.brown + self.blue + self.cream
    }

    pub fn accumulate(&mut self, other: &ColorCounts) {
        self.white += other.white;
        self.brown += other.brown;
        self.blue += other.blue;
        self.cream += other.cream;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCounts {
    #[serde(default)]
    pub xl: u32,
    #[serde(default)]
    pub l: u32,
    #[serde(default)]
    pub m: u32,
    #[serde(default)]
    pub s: u32,
    #[serde(default)]
    pub cracked: u32,
    #[serde(default)]
    pub dirty: u32,
}

impl GradeCounts {
    pub fn get(&self, grade: EggGrade) -> u32 {
        match grade {
            EggGrade::Xl => self.xl,
            EggGrade::L => self.l,
            EggGrade::M => self.m,
            EggGrade::S => self.s,
            EggGrade::Cracked => self.cracked,
            EggGrade::Dirty => self.dirty,
        }
    }

    /// 可售蛋 (XL+L+M)
    pub fn marketable(&self) -> u32 {
        self.xl + self.l + self.m
    }

    pub fn accumulate(&mut self, other: &GradeCounts) {
        self.xl += other.xl;
        self.l += other.l;
        self.m += other.m;
        self.s += other.s;
        self.cracked += other.cracked;
        self.dirty += other.dirty;
    }
}

// ==========================================
// EggProductionRecord - 产蛋记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggProductionRecord {
    pub batch_id: String,
    pub date: NaiveDate,
    pub by_color: ColorCounts,
    pub by_grade: GradeCounts,
    pub average_weight_g: f64, // 平均蛋重 (g/枚)
    pub total_weight_kg: f64,  // 总蛋重 (kg)
}

impl EggProductionRecord {
    pub fn total_eggs(&self) -> u32 {
        self.by_color.total()
    }
}

// ==========================================
// LightingReading - 光照读数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingReading {
    pub batch_id: String,
    pub date: NaiveDate,
    pub actual_light_hours: f64,
    pub actual_intensity_lux: f64,
    pub target_light_hours: f64,
    pub target_intensity_lux: f64,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

// ==========================================
// BirdBehaviorObservation - 禽群行为巡检
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirdBehaviorObservation {
    pub batch_id: String,
    pub date: NaiveDate,
    pub active_percent: f64, // 活跃且分布均匀的禽只占比 (%)
    pub feeding_activity: FeedingActivityLevel,
    #[serde(default)]
    pub signs_of_stress: bool,
    #[serde(default)]
    pub abnormal_behaviors: Vec<String>, // 如 panting / lethargy / grouping
}

impl BirdBehaviorObservation {
    pub fn has_abnormal_behaviors(&self) -> bool {
        !self.abnormal_behaviors.is_empty()
    }
}
