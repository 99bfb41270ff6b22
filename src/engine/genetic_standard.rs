// ==========================================
// 家禽生产分析系统 - 遗传标准解析器
// ==========================================
// 职责: 按品系 + 日龄解析最近检查点的目标体重/料肉比
// 规则: 取 |day - age| 最小的检查点,并列时取较小日龄
// 未知品系返回 None,调用方按"无标准"处理
// ==========================================

use crate::config::genetic_standards::{GeneticStandardTable, StandardCheckpoint};
use crate::domain::types::GeneticLine;
use tracing::{debug, warn};

// ==========================================
// GeneticStandardResolver
// ==========================================
#[derive(Debug, Clone)]
pub struct GeneticStandardResolver {
    table: GeneticStandardTable,
}

impl GeneticStandardResolver {
    pub fn new(table: GeneticStandardTable) -> Self {
        Self { table }
    }

    /// 解析最近检查点
    ///
    /// # 参数
    /// - `line`: 遗传品系
    /// - `age_days`: 日龄
    ///
    /// # 返回
    /// - Some(检查点): 最近检查点
    /// - None: 品系未配置标准
    pub fn resolve(&self, line: &GeneticLine, age_days: i64) -> Option<StandardCheckpoint> {
        let checkpoints = match self.table.checkpoints_for(line) {
            Some(cps) => cps,
            None => {
                warn!(line = %line, "未配置遗传标准,按无标准处理");
                return None;
            }
        };

        // 检查点按日龄升序: 以 (距离, 日龄) 为键保证并列时取较小日龄
        let nearest = checkpoints
            .iter()
            .min_by_key(|cp| ((cp.day - age_days).abs(), cp.day))
            .copied();

        if let Some(cp) = &nearest {
            debug!(line = %line, age_days, checkpoint_day = cp.day, "解析遗传标准检查点");
        }
        nearest
    }

    pub fn has_standard(&self, line: &GeneticLine) -> bool {
        self.table.checkpoints_for(line).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::genetic_standards::LineStandard;

    fn resolver() -> GeneticStandardResolver {
        GeneticStandardResolver::new(GeneticStandardTable::default())
    }

    #[test]
    fn test_exact_checkpoint_match() {
        let cp = resolver().resolve(&GeneticLine::Cobb500, 21).unwrap();
        assert_eq!(cp.day, 21);
        assert_eq!(cp.target_weight_g, 1116.0);
        assert_eq!(cp.target_fcr, 1.182);
    }

    #[test]
    fn test_nearest_checkpoint() {
        let r = resolver();
        assert_eq!(r.resolve(&GeneticLine::Ross308, 10).unwrap().day, 7);
        assert_eq!(r.resolve(&GeneticLine::Ross308, 12).unwrap().day, 14);
        assert_eq!(r.resolve(&GeneticLine::Cobb500, 1).unwrap().day, 7);
        assert_eq!(r.resolve(&GeneticLine::Cobb500, 60).unwrap().day, 35);
    }

    #[test]
    fn test_tie_prefers_smaller_day() {
        let table = GeneticStandardTable {
            lines: vec![LineStandard {
                line: GeneticLine::Other("TEST".into()),
                checkpoints: vec![
                    StandardCheckpoint {
                        day: 10,
                        target_weight_g: 300.0,
                        target_fcr: 1.0,
                    },
                    StandardCheckpoint {
                        day: 20,
                        target_weight_g: 900.0,
                        target_fcr: 1.2,
                    },
                ],
            }],
        };
        let r = GeneticStandardResolver::new(table);
        assert_eq!(r.resolve(&GeneticLine::Other("TEST".into()), 15).unwrap().day, 10);
    }

    #[test]
    fn test_unknown_line_returns_none() {
        let r = resolver();
        assert!(r.resolve(&GeneticLine::HylineBrown, 21).is_none());
        assert!(!r.has_standard(&GeneticLine::Other("X".into())));
    }
}
