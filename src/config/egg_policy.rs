// ==========================================
// 家禽生产分析系统 - 蛋品质量与价格配置
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::EggGrade;
use serde::{Deserialize, Serialize};

// ==========================================
// EggQualityPolicy - 质量告警阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EggQualityPolicy {
    pub quality_warning_pct: f64,  // 可售率 < 85 → warning
    pub quality_critical_pct: f64, // < 75 → critical
    pub loss_warning_pct: f64,     // 破蛋率 > 5 → warning
    pub loss_critical_pct: f64,    // > 10 → critical
    pub weight_warning_g: f64,     // 平均蛋重 < 55 → warning
    pub weight_critical_g: f64,    // < 50 → critical
    pub purity_info_pct: f64,      // 颜色纯度 < 90 → info
    pub purity_warning_pct: f64,   // < 80 → warning
}

impl Default for EggQualityPolicy {
    fn default() -> Self {
        Self {
            quality_warning_pct: 85.0,
            quality_critical_pct: 75.0,
            loss_warning_pct: 5.0,
            loss_critical_pct: 10.0,
            weight_warning_g: 55.0,
            weight_critical_g: 50.0,
            purity_info_pct: 90.0,
            purity_warning_pct: 80.0,
        }
    }
}

// ==========================================
// EggPriceTable - 分级单价 (每枚)
// ==========================================
// 破蛋不计价
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EggPriceTable {
    pub xl: f64,
    pub l: f64,
    pub m: f64,
    pub s: f64,
    pub dirty: f64,
}

impl EggPriceTable {
    pub fn price(&self, grade: EggGrade) -> f64 {
        match grade {
            EggGrade::Xl => self.xl,
            EggGrade::L => self.l,
            EggGrade::M => self.m,
            EggGrade::S => self.s,
            EggGrade::Cracked => 0.0,
            EggGrade::Dirty => self.dirty,
        }
    }

    /// 可售等级 (XL/L/M) 平均单价,用于破蛋损失估值
    pub fn marketable_average(&self) -> f64 {
        (self.xl + self.l + self.m) / 3.0
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (field, price) in [
            ("xl", self.xl),
            ("l", self.l),
            ("m", self.m),
            ("s", self.s),
            ("dirty", self.dirty),
        ] {
            if price < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("egg_prices.{}", field),
                    message: "价格不能为负".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for EggPriceTable {
    fn default() -> Self {
        Self {
            xl: 2.50,
            l: 2.20,
            m: 1.80,
            s: 1.20,
            dirty: 1.50,
        }
    }
}

// ==========================================
// EggWeightRanges - 按重分级下限 (g)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EggWeightRanges {
    pub xl_min_g: f64,
    pub l_min_g: f64,
    pub m_min_g: f64,
}

impl Default for EggWeightRanges {
    fn default() -> Self {
        Self {
            xl_min_g: 73.0,
            l_min_g: 63.0,
            m_min_g: 53.0,
        }
    }
}

impl EggWeightRanges {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.m_min_g < self.l_min_g && self.l_min_g < self.xl_min_g) {
            return Err(ConfigError::UnsortedTable {
                table: "egg_weight_ranges".to_string(),
            });
        }
        Ok(())
    }
}
