// ==========================================
// 家禽生产分析系统 - 蛋品生产分析器
// ==========================================
// 职责: 颜色/等级分布汇总、可售率/破蛋率、品系颜色纯度、
//       产蛋率/蛋重量、质量告警、经济价值
// 输入: 产蛋记录集合 (+ 品系 / 存栏 / 天数)
// 输出: ProductionSummary / GeneticLinePerformance / EggEconomics / Alert
// ==========================================

use crate::config::egg_policy::{EggPriceTable, EggQualityPolicy, EggWeightRanges};
use crate::config::genetic_standards::LineColorTable;
use crate::domain::alert::{Alert, AlertKind};
use crate::domain::records::{ColorCounts, EggProductionRecord, GradeCounts};
use crate::domain::types::{AlertSeverity, EggColor, EggGrade, GeneticLine};
use crate::i18n::{fmt_num, t, t_with_args};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// ==========================================
// ProductionSummary - 产蛋汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionSummary {
    pub total_eggs: u64,
    pub by_color: ColorCounts,
    pub by_grade: GradeCounts,
    pub quality_pct: f64,      // (XL+L+M) / 总数 × 100
    pub loss_pct: f64,         // 破蛋 / 总数 × 100
    pub average_weight_g: f64, // 按蛋数加权
    pub total_weight_kg: f64,
}

// ==========================================
// GeneticLinePerformance - 品系表现
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticLinePerformance {
    pub line: GeneticLine,
    pub expected_color: EggColor,
    pub avg_production_per_bird: f64,
    pub avg_egg_weight_g: f64,
    pub color_purity_pct: f64,
    pub quality_rate_pct: f64,
}

// ==========================================
// EggEconomics - 经济价值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeValue {
    pub grade: EggGrade,
    pub count: u32,
    pub unit_price: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggEconomics {
    pub total_value: f64,
    pub value_by_grade: Vec<GradeValue>,
    pub average_value_per_egg: f64,
    pub loss_value: f64, // 破蛋按 XL/L/M 均价估算的损失
}

// ==========================================
// EggProductionAnalyzer
// ==========================================
#[derive(Debug, Clone)]
pub struct EggProductionAnalyzer {
    line_colors: LineColorTable,
    quality: EggQualityPolicy,
    prices: EggPriceTable,
    weight_ranges: EggWeightRanges,
}

impl EggProductionAnalyzer {
    pub fn new(
        line_colors: LineColorTable,
        quality: EggQualityPolicy,
        prices: EggPriceTable,
        weight_ranges: EggWeightRanges,
    ) -> Self {
        Self {
            line_colors,
            quality,
            prices,
            weight_ranges,
        }
    }

    // ==========================================
    // 汇总
    // ==========================================

    /// 汇总产蛋记录,空集合返回全 0
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn summarize(&self, records: &[EggProductionRecord]) -> ProductionSummary {
        let mut summary = ProductionSummary::default();
        let mut weight_sum = 0.0;

        for record in records {
            let eggs = record.total_eggs();
            summary.total_eggs += eggs as u64;
            summary.by_color.accumulate(&record.by_color);
            summary.by_grade.accumulate(&record.by_grade);
            summary.total_weight_kg += record.total_weight_kg;
            weight_sum += record.average_weight_g * eggs as f64;
        }

        if summary.total_eggs > 0 {
            let total = summary.total_eggs as f64;
            summary.quality_pct = summary.by_grade.marketable() as f64 * 100.0 / total;
            summary.loss_pct = summary.by_grade.cracked as f64 * 100.0 / total;
            summary.average_weight_g = weight_sum / total;
        }

        debug!(
            total_eggs = summary.total_eggs,
            quality_pct = summary.quality_pct,
            loss_pct = summary.loss_pct,
            "产蛋汇总完成"
        );
        summary
    }

    /// 品系表现: 预期颜色查表 (未知品系回退), 颜色纯度, 只均产蛋
    pub fn evaluate_genetic_line(
        &self,
        line: &GeneticLine,
        records: &[EggProductionRecord],
        bird_count: u32,
    ) -> GeneticLinePerformance {
        let summary = self.summarize(records);
        let expected_color = self.line_colors.expected_color(line);
        let matching = summary.by_color.get(expected_color) as f64;

        let color_purity_pct = if summary.total_eggs > 0 {
            matching * 100.0 / summary.total_eggs as f64
        } else {
            0.0
        };
        let avg_production_per_bird = if bird_count > 0 {
            summary.total_eggs as f64 / bird_count as f64
        } else {
            0.0
        };

        GeneticLinePerformance {
            line: line.clone(),
            expected_color,
            avg_production_per_bird,
            avg_egg_weight_g: summary.average_weight_g,
            color_purity_pct,
            quality_rate_pct: summary.quality_pct,
        }
    }

    /// 产蛋率 (%): 总蛋数 / 存栏 / 天数 × 100
    pub fn production_rate(&self, total_eggs: u64, bird_count: u32, day_count: u32) -> f64 {
        if bird_count == 0 || day_count == 0 {
            return 0.0;
        }
        total_eggs as f64 * 100.0 / bird_count as f64 / day_count as f64
    }

    /// 蛋重量: kg / 只 / 天
    pub fn egg_mass(&self, total_weight_kg: f64, bird_count: u32, day_count: u32) -> f64 {
        if bird_count == 0 || day_count == 0 {
            return 0.0;
        }
        total_weight_kg / bird_count as f64 / day_count as f64
    }

    /// 按蛋重分级
    pub fn classify_by_weight(&self, weight_g: f64) -> EggGrade {
        let r = &self.weight_ranges;
        if weight_g >= r.xl_min_g {
            EggGrade::Xl
        } else if weight_g >= r.l_min_g {
            EggGrade::L
        } else if weight_g >= r.m_min_g {
            EggGrade::M
        } else {
            EggGrade::S
        }
    }

    // ==========================================
    // 质量告警
    // ==========================================

    /// 质量告警
    ///
    /// 无蛋数据时不产生告警
    pub fn check_production_quality(
        &self,
        summary: &ProductionSummary,
        line_performance: Option<&GeneticLinePerformance>,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();
        if summary.total_eggs == 0 {
            return alerts;
        }
        let q = &self.quality;

        if summary.quality_pct < q.quality_warning_pct {
            let severity = if summary.quality_pct < q.quality_critical_pct {
                AlertSeverity::Critical
            } else {
                AlertSeverity::Warning
            };
            alerts.push(Alert::new(
                AlertKind::EggQuality,
                severity,
                t_with_args("egg.quality", &[("value", &fmt_num(summary.quality_pct, 1))]),
                t("egg.quality_action"),
            ));
        }

        if summary.loss_pct > q.loss_warning_pct {
            let severity = if summary.loss_pct > q.loss_critical_pct {
                AlertSeverity::Critical
            } else {
                AlertSeverity::Warning
            };
            alerts.push(Alert::new(
                AlertKind::EggLoss,
                severity,
                t_with_args("egg.loss", &[("value", &fmt_num(summary.loss_pct, 1))]),
                t("egg.loss_action"),
            ));
        }

        if summary.average_weight_g < q.weight_warning_g {
            let severity = if summary.average_weight_g < q.weight_critical_g {
                AlertSeverity::Critical
            } else {
                AlertSeverity::Warning
            };
            alerts.push(Alert::new(
                AlertKind::EggWeight,
                severity,
                t_with_args("egg.weight", &[("value", &fmt_num(summary.average_weight_g, 1))]),
                t("egg.weight_action"),
            ));
        }

        if let Some(perf) = line_performance.filter(|p| p.color_purity_pct < q.purity_info_pct) {
            let severity = if perf.color_purity_pct < q.purity_warning_pct {
                AlertSeverity::Warning
            } else {
                AlertSeverity::Info
            };
            alerts.push(Alert::new(
                AlertKind::ColorPurity,
                severity,
                t_with_args(
                    "egg.color_purity",
                    &[
                        ("value", &fmt_num(perf.color_purity_pct, 1)),
                        ("line", perf.line.code()),
                    ],
                ),
                t("egg.color_purity_action"),
            ));
        }

        alerts
    }

    // ==========================================
    // 经济价值
    // ==========================================

    pub fn value_production(&self, summary: &ProductionSummary) -> EggEconomics {
        let value_by_grade: Vec<GradeValue> = EggGrade::ALL
            .iter()
            .map(|&grade| {
                let count = summary.by_grade.get(grade);
                let unit_price = self.prices.price(grade);
                GradeValue {
                    grade,
                    count,
                    unit_price,
                    value: count as f64 * unit_price,
                }
            })
            .collect();

        let total_value: f64 = value_by_grade.iter().map(|v| v.value).sum();
        let average_value_per_egg = if summary.total_eggs > 0 {
            total_value / summary.total_eggs as f64
        } else {
            0.0
        };
        let loss_value = summary.by_grade.cracked as f64 * self.prices.marketable_average();

        EggEconomics {
            total_value,
            value_by_grade,
            average_value_per_egg,
            loss_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn analyzer() -> EggProductionAnalyzer {
        EggProductionAnalyzer::new(
            LineColorTable::default(),
            EggQualityPolicy::default(),
            EggPriceTable::default(),
            EggWeightRanges::default(),
        )
    }

    fn record(brown: u32, white: u32, grade: GradeCounts, avg_weight: f64) -> EggProductionRecord {
        EggProductionRecord {
            batch_id: "P1".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            by_color: ColorCounts {
                white,
                brown,
                blue: 0,
                cream: 0,
            },
            by_grade: grade,
            average_weight_g: avg_weight,
            total_weight_kg: (brown + white) as f64 * avg_weight / 1000.0,
        }
    }

    fn grades(xl: u32, l: u32, m: u32, s: u32, cracked: u32, dirty: u32) -> GradeCounts {
        GradeCounts {
            xl,
            l,
            m,
            s,
            cracked,
            dirty,
        }
    }

    #[test]
    fn test_summary_weighted_average_weight() {
        let records = vec![
            record(100, 0, grades(50, 50, 0, 0, 0, 0), 60.0),
            record(300, 0, grades(100, 100, 100, 0, 0, 0), 64.0),
        ];
        let s = analyzer().summarize(&records);
        assert_eq!(s.total_eggs, 400);
        // (100×60 + 300×64) / 400 = 63
        assert!((s.average_weight_g - 63.0).abs() < 1e-9);
        assert_eq!(s.quality_pct, 100.0);
    }

    #[test]
    fn test_empty_summary_and_no_alerts() {
        let a = analyzer();
        let s = a.summarize(&[]);
        assert_eq!(s.total_eggs, 0);
        assert_eq!(s.quality_pct, 0.0);
        assert!(a.check_production_quality(&s, None).is_empty());
    }

    #[test]
    fn test_quality_alerts_boundaries() {
        // 1000 枚, 可售 850, 破蛋 60 → 可售率 85 (边界不告警), 破蛋率 6 → warning
        let records = vec![record(1000, 0, grades(300, 300, 250, 80, 60, 10), 62.0)];
        let a = analyzer();
        let s = a.summarize(&records);
        assert_eq!(s.quality_pct, 85.0);
        assert!((s.loss_pct - 6.0).abs() < 1e-9);

        let alerts = a.check_production_quality(&s, None);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::EggLoss);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn test_weight_alert_critical() {
        let records = vec![record(100, 0, grades(0, 0, 100, 0, 0, 0), 48.0)];
        let a = analyzer();
        let alerts = a.check_production_quality(&a.summarize(&records), None);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::EggWeight);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_genetic_line_color_purity() {
        let records = vec![record(85, 15, grades(40, 40, 20, 0, 0, 0), 62.0)];
        let a = analyzer();
        let perf = a.evaluate_genetic_line(&GeneticLine::HylineBrown, &records, 50);
        assert_eq!(perf.expected_color, EggColor::Brown);
        assert_eq!(perf.color_purity_pct, 85.0);
        assert_eq!(perf.avg_production_per_bird, 2.0);

        let alerts = a.check_production_quality(&a.summarize(&records), Some(&perf));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::ColorPurity);
        assert_eq!(alerts[0].severity, AlertSeverity::Info);

        // 白壳品系同一批蛋: 纯度 15% → warning
        let leghorn = a.evaluate_genetic_line(&GeneticLine::Leghorn, &records, 50);
        assert_eq!(leghorn.color_purity_pct, 15.0);
    }

    #[test]
    fn test_unknown_line_defaults_to_brown() {
        let perf = analyzer().evaluate_genetic_line(&GeneticLine::Other("LOCAL".into()), &[], 0);
        assert_eq!(perf.expected_color, EggColor::Brown);
        assert_eq!(perf.avg_production_per_bird, 0.0);
    }

    #[test]
    fn test_rate_and_mass_guards() {
        let a = analyzer();
        assert_eq!(a.production_rate(900, 1000, 1), 90.0);
        assert_eq!(a.production_rate(900, 0, 1), 0.0);
        assert_eq!(a.egg_mass(60.0, 1000, 0), 0.0);
        assert!((a.egg_mass(60.0, 1000, 1) - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_classify_by_weight() {
        let a = analyzer();
        assert_eq!(a.classify_by_weight(73.0), EggGrade::Xl);
        assert_eq!(a.classify_by_weight(72.9), EggGrade::L);
        assert_eq!(a.classify_by_weight(53.0), EggGrade::M);
        assert_eq!(a.classify_by_weight(40.0), EggGrade::S);
    }

    #[test]
    fn test_value_production() {
        let records = vec![record(100, 0, grades(10, 20, 30, 20, 10, 10), 60.0)];
        let a = analyzer();
        let econ = a.value_production(&a.summarize(&records));
        // 10×2.5 + 20×2.2 + 30×1.8 + 20×1.2 + 0 + 10×1.5 = 162
        assert!((econ.total_value - 162.0).abs() < 1e-9);
        assert!((econ.average_value_per_egg - 1.62).abs() < 1e-9);
        assert!((econ.loss_value - 10.0 * (2.5 + 2.2 + 1.8) / 3.0).abs() < 1e-9);
        let cracked = econ
            .value_by_grade
            .iter()
            .find(|v| v.grade == EggGrade::Cracked)
            .unwrap();
        assert_eq!(cracked.value, 0.0);
    }
}
