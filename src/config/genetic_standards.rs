// ==========================================
// 家禽生产分析系统 - 遗传品系参考表
// ==========================================
// 品系 → 检查点标准 (目标体重 / 目标料肉比)
// 品系 → 预期蛋壳颜色 (含回退项)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::{EggColor, GeneticLine};
use serde::{Deserialize, Serialize};

// ==========================================
// 检查点标准
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardCheckpoint {
    pub day: i64,               // 检查点日龄
    pub target_weight_g: f64,   // 目标体重 (g)
    pub target_fcr: f64,        // 目标料肉比
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStandard {
    pub line: GeneticLine,
    pub checkpoints: Vec<StandardCheckpoint>, // 按 day 升序
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticStandardTable {
    pub lines: Vec<LineStandard>,
}

impl GeneticStandardTable {
    pub fn checkpoints_for(&self, line: &GeneticLine) -> Option<&[StandardCheckpoint]> {
        self.lines
            .iter()
            .find(|s| &s.line == line)
            .map(|s| s.checkpoints.as_slice())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for standard in &self.lines {
            let table = format!("genetic_standards.{}", standard.line);
            if standard.checkpoints.is_empty() {
                return Err(ConfigError::EmptyTable(table));
            }
            if standard
                .checkpoints
                .windows(2)
                .any(|w| w[0].day >= w[1].day)
            {
                return Err(ConfigError::UnsortedTable { table });
            }
        }
        Ok(())
    }
}

fn checkpoint(day: i64, target_weight_g: f64, target_fcr: f64) -> StandardCheckpoint {
    StandardCheckpoint {
        day,
        target_weight_g,
        target_fcr,
    }
}

impl Default for GeneticStandardTable {
    fn default() -> Self {
        Self {
            lines: vec![
                LineStandard {
                    line: GeneticLine::Cobb500,
                    checkpoints: vec![
                        checkpoint(7, 180.0, 0.891),
                        checkpoint(14, 570.0, 1.029),
                        checkpoint(21, 1116.0, 1.182),
                        checkpoint(28, 1783.0, 1.322),
                        checkpoint(35, 2521.0, 1.441),
                    ],
                },
                LineStandard {
                    line: GeneticLine::Ross308,
                    checkpoints: vec![
                        checkpoint(7, 202.0, 0.900),
                        checkpoint(14, 588.0, 1.050),
                        checkpoint(21, 1320.0, 1.250),
                        checkpoint(28, 2359.0, 1.400),
                        checkpoint(35, 3635.0, 1.550),
                    ],
                },
            ],
        }
    }
}

// ==========================================
// 品系 → 预期蛋壳颜色
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineColorEntry {
    pub line: GeneticLine,
    pub color: EggColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineColorTable {
    pub entries: Vec<LineColorEntry>,
    pub fallback: EggColor, // 未识别品系
}

impl LineColorTable {
    pub fn expected_color(&self, line: &GeneticLine) -> EggColor {
        self.entries
            .iter()
            .find(|e| &e.line == line)
            .map(|e| e.color)
            .unwrap_or(self.fallback)
    }
}

impl Default for LineColorTable {
    fn default() -> Self {
        let entry = |line, color| LineColorEntry { line, color };
        Self {
            entries: vec![
                entry(GeneticLine::HylineBrown, EggColor::Brown),
                entry(GeneticLine::LohmannBrown, EggColor::Brown),
                entry(GeneticLine::Leghorn, EggColor::White),
                entry(GeneticLine::IsaBrown, EggColor::Brown),
                entry(GeneticLine::Babcock, EggColor::White),
                entry(GeneticLine::Araucana, EggColor::Blue),
            ],
            fallback: EggColor::Brown,
        }
    }
}
