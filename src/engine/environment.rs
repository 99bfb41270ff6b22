// ==========================================
// 家禽生产分析系统 - 环境评分引擎
// ==========================================
// 职责: 按生产类型 + 日龄解析阈值,对读数评分 (0-100)
//       生成分级告警与调整建议
// 输入: 批次 + 环境读数 (或 指定配置 + 日龄 + 读数)
// 输出: EnvironmentAssessment { score, alerts, recommendations }
// ==========================================
// 简化通风模型通过受限 EnvironmentProfile 表达,
// 共用同一评估路径
// ==========================================

use crate::config::environment_profile::{
    EnvironmentProfile, EnvironmentProfiles, EnvironmentalThresholds, TierRule,
};
use crate::domain::alert::{Alert, AlertKind};
use crate::domain::batch::Batch;
use crate::domain::records::EnvironmentalReading;
use crate::domain::types::{AlertSeverity, ProductionType, VentilationStatus};
use crate::engine::age::AgeCalculator;
use crate::i18n::{fmt_num, t, t_with_args};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

// ==========================================
// EnvironmentAssessment - 评估结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentAssessment {
    pub date: NaiveDate,
    pub age_days: i64,
    pub score: u32,
    pub alerts: Vec<Alert>,
    pub recommendations: Vec<String>,
}

// ==========================================
// EnvironmentalScoringEngine
// ==========================================
#[derive(Debug, Clone)]
pub struct EnvironmentalScoringEngine {
    profiles: EnvironmentProfiles,
    age: AgeCalculator,
}

impl EnvironmentalScoringEngine {
    pub fn new(profiles: EnvironmentProfiles) -> Self {
        Self {
            profiles,
            age: AgeCalculator::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 评估批次的一条环境读数
    ///
    /// 日龄参考: 出雏日期优先,否则入舍日期
    #[instrument(skip(self, batch, reading), fields(batch_id = %batch.id, date = %reading.date))]
    pub fn evaluate(&self, batch: &Batch, reading: &EnvironmentalReading) -> EnvironmentAssessment {
        let age_days = self.age.age_in_days(batch.age_reference_date(), reading.date);
        let profile = self.profiles.profile_for(batch.production_type);
        self.evaluate_with_profile(profile, age_days, reading)
    }

    /// 按指定配置评估 (简化通风模型等受限配置使用此入口)
    pub fn evaluate_with_profile(
        &self,
        profile: &EnvironmentProfile,
        age_days: i64,
        reading: &EnvironmentalReading,
    ) -> EnvironmentAssessment {
        let thresholds = match profile.schedule.resolve(age_days) {
            Some(th) => *th,
            None => {
                warn!(age_days, "环境阈值表为空,跳过评估");
                return EnvironmentAssessment {
                    date: reading.date,
                    age_days,
                    score: 100,
                    alerts: Vec::new(),
                    recommendations: Vec::new(),
                };
            }
        };
        debug!(
            age_days,
            temp_min = thresholds.temp_min,
            temp_max = thresholds.temp_max,
            "解析环境阈值"
        );

        EnvironmentAssessment {
            date: reading.date,
            age_days,
            score: self.score(reading, &thresholds),
            alerts: self.check_alerts(reading, profile, &thresholds),
            recommendations: self.recommendations(reading, &thresholds),
        }
    }

    /// 解析阈值
    pub fn thresholds_for(
        &self,
        production_type: ProductionType,
        age_days: i64,
    ) -> Option<EnvironmentalThresholds> {
        self.profiles
            .profile_for(production_type)
            .schedule
            .resolve(age_days)
            .copied()
    }

    // ==========================================
    // 评分
    // ==========================================

    /// 环境评分: 100 起扣,下限 0,四舍五入
    pub fn score(&self, reading: &EnvironmentalReading, th: &EnvironmentalThresholds) -> u32 {
        let w = &self.profiles.scoring;
        let mut score: f64 = 100.0;

        score -= ((reading.temperature_c - th.temp_ideal).abs() * w.temp_penalty_per_unit)
            .min(w.temp_penalty_cap);
        score -= ((reading.humidity_percent - th.humidity_ideal).abs()
            * w.humidity_penalty_per_unit)
            .min(w.humidity_penalty_cap);
        score -= w.ventilation_penalty(reading.ventilation_status);

        if let Some(co2) = reading.co2_ppm {
            if w.co2_ppm_per_point > 0.0 {
                score -= ((co2 - th.max_co2) / w.co2_ppm_per_point)
                    .max(0.0)
                    .min(w.co2_penalty_cap);
            }
        }
        if let Some(ammonia) = reading.ammonia_ppm {
            score -= ((ammonia - th.max_ammonia) * w.ammonia_penalty_per_unit)
                .max(0.0)
                .min(w.ammonia_penalty_cap);
        }

        score.clamp(0.0, 100.0).round() as u32
    }

    // ==========================================
    // 告警
    // ==========================================

    /// 分级告警,级别不超过配置能力上限
    pub fn check_alerts(
        &self,
        reading: &EnvironmentalReading,
        profile: &EnvironmentProfile,
        th: &EnvironmentalThresholds,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let tiers = &profile.tiers;

        // 温度
        let temp = reading.temperature_c;
        let temp_args = [
            ("value", temp.to_string()),
            ("ideal", th.temp_ideal.to_string()),
        ];
        if temp < th.temp_min {
            alerts.push(tiered_alert(
                AlertKind::Temperature,
                &tiers.temperature_low,
                th.temp_min - temp,
                ("environment.temperature.emergency_low", "environment.temperature.low"),
                &temp_args,
            ));
        } else if temp > th.temp_max {
            alerts.push(tiered_alert(
                AlertKind::Temperature,
                &tiers.temperature_high,
                temp - th.temp_max,
                ("environment.temperature.emergency_high", "environment.temperature.high"),
                &temp_args,
            ));
        }

        // 湿度
        let humidity = reading.humidity_percent;
        let humidity_args = [
            ("value", humidity.to_string()),
            ("ideal", th.humidity_ideal.to_string()),
        ];
        if humidity < th.humidity_min {
            alerts.push(tiered_alert(
                AlertKind::Humidity,
                &tiers.humidity_low,
                th.humidity_min - humidity,
                ("environment.humidity.far_low", "environment.humidity.low"),
                &humidity_args,
            ));
        } else if humidity > th.humidity_max {
            alerts.push(tiered_alert(
                AlertKind::Humidity,
                &tiers.humidity_high,
                humidity - th.humidity_max,
                ("environment.humidity.far_high", "environment.humidity.high"),
                &humidity_args,
            ));
        }

        // 通风状态直接映射级别
        let rate = reading.ventilation_rate.to_string();
        let ventilation = match reading.ventilation_status {
            VentilationStatus::Critical => Some((AlertSeverity::Emergency, "environment.ventilation.critical")),
            VentilationStatus::Poor => Some((AlertSeverity::Critical, "environment.ventilation.poor")),
            VentilationStatus::Fair => Some((AlertSeverity::Warning, "environment.ventilation.fair")),
            VentilationStatus::Good | VentilationStatus::Excellent => None,
        };
        if let Some((severity, key)) = ventilation {
            alerts.push(Alert::new(
                AlertKind::Ventilation,
                severity,
                t_with_args(key, &[("rate", &rate)]),
                t(&format!("{}_action", key)),
            ));
        }

        // 空气质量
        if let Some(co2) = reading.co2_ppm.filter(|v| *v > th.max_co2) {
            let severity = if co2 > profile.gas_limits.co2_critical_ppm {
                AlertSeverity::Critical
            } else {
                AlertSeverity::Warning
            };
            alerts.push(Alert::new(
                AlertKind::AirQuality,
                severity,
                t_with_args(
                    "environment.air.co2",
                    &[("value", &co2.to_string()), ("max", &th.max_co2.to_string())],
                ),
                t("environment.air.co2_action"),
            ));
        }
        if let Some(ammonia) = reading.ammonia_ppm.filter(|v| *v > th.max_ammonia) {
            let severity = if ammonia > profile.gas_limits.ammonia_critical_ppm {
                AlertSeverity::Critical
            } else {
                AlertSeverity::Warning
            };
            alerts.push(Alert::new(
                AlertKind::AirQuality,
                severity,
                t_with_args(
                    "environment.air.ammonia",
                    &[
                        ("value", &ammonia.to_string()),
                        ("max", &th.max_ammonia.to_string()),
                    ],
                ),
                t("environment.air.ammonia_action"),
            ));
        }
        if let (Some(min_oxygen), Some(oxygen)) = (th.min_oxygen, reading.oxygen_percent) {
            if oxygen < min_oxygen {
                alerts.push(Alert::new(
                    AlertKind::AirQuality,
                    AlertSeverity::Critical,
                    t_with_args(
                        "environment.air.oxygen",
                        &[("value", &oxygen.to_string()), ("min", &min_oxygen.to_string())],
                    ),
                    t("environment.air.oxygen_action"),
                ));
            }
        }

        alerts
            .into_iter()
            .map(|a| a.capped_at(profile.severity_ceiling))
            .collect()
    }

    // ==========================================
    // 调整建议
    // ==========================================

    pub fn recommendations(
        &self,
        reading: &EnvironmentalReading,
        th: &EnvironmentalThresholds,
    ) -> Vec<String> {
        let bands = &self.profiles.recommendation;
        let mut recs = Vec::new();

        let temp = reading.temperature_c;
        if temp < th.temp_ideal - bands.temp_tolerance {
            recs.push(t_with_args(
                "environment.recommend.increase_temperature",
                &[("delta", &fmt_num(th.temp_ideal - temp, 1))],
            ));
        } else if temp > th.temp_ideal + bands.temp_tolerance {
            recs.push(t_with_args(
                "environment.recommend.decrease_temperature",
                &[("delta", &fmt_num(temp - th.temp_ideal, 1))],
            ));
        }

        let humidity = reading.humidity_percent;
        if humidity < th.humidity_ideal - bands.humidity_tolerance {
            recs.push(t("environment.recommend.increase_humidity"));
        } else if humidity > th.humidity_ideal + bands.humidity_tolerance {
            recs.push(t("environment.recommend.decrease_humidity"));
        }

        let rate = reading.ventilation_rate;
        if rate < th.min_ventilation_rate {
            if rate > 0.0 {
                let pct = (th.min_ventilation_rate - rate) / rate * 100.0;
                recs.push(t_with_args(
                    "environment.recommend.increase_ventilation",
                    &[("pct", &fmt_num(pct, 0))],
                ));
            } else {
                recs.push(t_with_args(
                    "environment.recommend.restore_ventilation",
                    &[("min", &th.min_ventilation_rate.to_string())],
                ));
            }
        }

        if recs.is_empty() {
            recs.push(t("environment.recommend.optimal"));
        }
        recs
    }

    // ==========================================
    // 通风状态推导
    // ==========================================

    /// 由换气率与气体浓度推导通风状态
    pub fn derive_ventilation_status(
        &self,
        ventilation_rate: f64,
        min_ventilation_rate: f64,
        co2_ppm: Option<f64>,
        ammonia_ppm: Option<f64>,
    ) -> VentilationStatus {
        let rules = &self.profiles.ventilation_rules;
        let co2 = co2_ppm.unwrap_or(0.0);
        let ammonia = ammonia_ppm.unwrap_or(0.0);
        let ratio = if min_ventilation_rate > 0.0 {
            ventilation_rate / min_ventilation_rate
        } else {
            f64::INFINITY
        };

        if co2 > rules.critical_co2 || ammonia > rules.critical_ammonia {
            VentilationStatus::Critical
        } else if ratio < rules.poor_rate_ratio || co2 > rules.poor_co2 || ammonia > rules.poor_ammonia
        {
            VentilationStatus::Poor
        } else if ratio < rules.fair_rate_ratio || co2 > rules.fair_co2 || ammonia > rules.fair_ammonia
        {
            VentilationStatus::Fair
        } else if ratio >= rules.excellent_rate_ratio
            && co2 < rules.excellent_co2
            && ammonia < rules.excellent_ammonia
        {
            VentilationStatus::Excellent
        } else {
            VentilationStatus::Good
        }
    }
}

/// 按超界幅度选择 far/near 级别与对应文案
fn tiered_alert(
    kind: AlertKind,
    rule: &TierRule,
    excess: f64,
    keys: (&str, &str),
    args: &[(&str, String)],
) -> Alert {
    let (severity, key) = if excess > rule.margin {
        (rule.far, keys.0)
    } else {
        (rule.near, keys.1)
    };
    let args: Vec<(&str, &str)> = args.iter().map(|(k, v)| (*k, v.as_str())).collect();
    Alert::new(
        kind,
        severity,
        t_with_args(key, &args),
        t(&format!("{}_action", key)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{BatchStatus, GeneticLine};

    fn engine() -> EnvironmentalScoringEngine {
        EnvironmentalScoringEngine::new(EnvironmentProfiles::default())
    }

    fn reading(temp: f64, humidity: f64, status: VentilationStatus) -> EnvironmentalReading {
        EnvironmentalReading {
            batch_id: "L1".into(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            temperature_c: temp,
            humidity_percent: humidity,
            ventilation_rate: 2.0,
            ventilation_status: status,
            co2_ppm: None,
            ammonia_ppm: None,
            oxygen_percent: None,
        }
    }

    fn layer_thresholds() -> EnvironmentalThresholds {
        engine().thresholds_for(ProductionType::Layer, 200).unwrap()
    }

    #[test]
    fn test_broiler_bands_by_age() {
        let e = engine();
        assert_eq!(e.thresholds_for(ProductionType::Broiler, 0).unwrap().temp_ideal, 32.0);
        assert_eq!(e.thresholds_for(ProductionType::Broiler, 7).unwrap().temp_ideal, 32.0);
        assert_eq!(e.thresholds_for(ProductionType::Broiler, 8).unwrap().temp_ideal, 28.0);
        assert_eq!(e.thresholds_for(ProductionType::Broiler, 21).unwrap().temp_ideal, 25.0);
        assert_eq!(e.thresholds_for(ProductionType::Broiler, 40).unwrap().temp_ideal, 21.0);
    }

    #[test]
    fn test_perfect_reading_scores_100() {
        let th = layer_thresholds();
        let r = reading(21.0, 55.0, VentilationStatus::Excellent);
        assert_eq!(engine().score(&r, &th), 100);
    }

    #[test]
    fn test_temperature_penalty_capped() {
        let th = layer_thresholds();
        // |35 - 21| × 5 = 70 → 封顶 30
        let r = reading(35.0, 55.0, VentilationStatus::Excellent);
        assert_eq!(engine().score(&r, &th), 70);
    }

    #[test]
    fn test_score_floor_at_zero() {
        let th = layer_thresholds();
        let mut r = reading(60.0, 0.0, VentilationStatus::Critical);
        r.co2_ppm = Some(20000.0);
        r.ammonia_ppm = Some(200.0);
        // 100 - 30 - 25 - 30 - 10 - 10 = -5 → 0
        assert_eq!(engine().score(&r, &th), 0);
    }

    #[test]
    fn test_score_rounds() {
        let th = layer_thresholds();
        // 湿度偏差 5 → 扣 2.5 → 97.5 → 98
        let r = reading(21.0, 60.0, VentilationStatus::Excellent);
        assert_eq!(engine().score(&r, &th), 98);
    }

    #[test]
    fn test_temperature_alert_tiers() {
        let e = engine();
        let th = layer_thresholds();
        let profile = EnvironmentProfile::layer_fixed();

        let far = e.check_alerts(&reading(35.0, 55.0, VentilationStatus::Good), &profile, &th);
        assert_eq!(far[0].kind, AlertKind::Temperature);
        assert_eq!(far[0].severity, AlertSeverity::Emergency);

        let near = e.check_alerts(&reading(26.0, 55.0, VentilationStatus::Good), &profile, &th);
        assert_eq!(near[0].severity, AlertSeverity::Warning);

        // 恰好超出 3 度仍为 near
        let edge = e.check_alerts(&reading(15.0, 55.0, VentilationStatus::Good), &profile, &th);
        assert_eq!(edge[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn test_humidity_alert_tiers() {
        let e = engine();
        let th = layer_thresholds();
        let profile = EnvironmentProfile::layer_fixed();
        let sev = |h: f64| {
            e.check_alerts(&reading(21.0, h, VentilationStatus::Good), &profile, &th)[0].severity
        };
        assert_eq!(sev(25.0), AlertSeverity::Warning);
        assert_eq!(sev(35.0), AlertSeverity::Info);
        assert_eq!(sev(85.0), AlertSeverity::Critical);
        assert_eq!(sev(75.0), AlertSeverity::Warning);
    }

    #[test]
    fn test_ventilation_status_mapping() {
        let e = engine();
        let th = layer_thresholds();
        let profile = EnvironmentProfile::layer_fixed();
        let sev = |s| e.check_alerts(&reading(21.0, 55.0, s), &profile, &th)[0].severity;
        assert_eq!(sev(VentilationStatus::Critical), AlertSeverity::Emergency);
        assert_eq!(sev(VentilationStatus::Poor), AlertSeverity::Critical);
        assert_eq!(sev(VentilationStatus::Fair), AlertSeverity::Warning);
        assert!(e
            .check_alerts(&reading(21.0, 55.0, VentilationStatus::Good), &profile, &th)
            .is_empty());
    }

    #[test]
    fn test_gas_alerts() {
        let e = engine();
        let th = layer_thresholds();
        let profile = EnvironmentProfile::layer_fixed();
        let mut r = reading(21.0, 55.0, VentilationStatus::Good);
        r.co2_ppm = Some(3500.0);
        r.ammonia_ppm = Some(45.0);
        let alerts = e.check_alerts(&r, &profile, &th);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        assert_eq!(alerts[1].severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_simplified_profile_never_emergency() {
        let e = engine();
        let profile = EnvironmentProfile::simplified_broiler_ventilation();
        let mut r = reading(40.0, 55.0, VentilationStatus::Critical);
        r.oxygen_percent = Some(17.0);
        r.ammonia_ppm = Some(12.0);
        let assessment = e.evaluate_with_profile(&profile, 20, &r);
        assert!(assessment
            .alerts
            .iter()
            .all(|a| a.severity <= AlertSeverity::Critical));
        assert!(assessment
            .alerts
            .iter()
            .any(|a| a.kind == AlertKind::AirQuality && a.severity == AlertSeverity::Critical));
    }

    #[test]
    fn test_recommendations() {
        let e = engine();
        let th = layer_thresholds();
        assert_eq!(
            e.recommendations(&reading(21.5, 55.0, VentilationStatus::Good), &th).len(),
            1
        );

        let mut r = reading(15.0, 80.0, VentilationStatus::Good);
        r.ventilation_rate = 1.0;
        assert_eq!(e.recommendations(&r, &th).len(), 3);

        r.ventilation_rate = 0.0;
        assert_eq!(e.recommendations(&r, &th).len(), 3);
    }

    #[test]
    fn test_evaluate_uses_birth_date_for_age() {
        let batch = Batch {
            id: "L1".into(),
            production_type: ProductionType::Broiler,
            genetic_line: GeneticLine::Ross308,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 28).unwrap(),
            birth_date: Some(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()),
            initial_bird_count: 100,
            current_bird_count: 100,
            unit_chick_cost: 0.5,
            status: BatchStatus::Active,
            finish_date: None,
        };
        let assessment = engine().evaluate(&batch, &reading(28.0, 60.0, VentilationStatus::Excellent));
        assert_eq!(assessment.age_days, 12);
        assert_eq!(assessment.score, 100);
    }

    #[test]
    fn test_derive_ventilation_status() {
        let e = engine();
        assert_eq!(e.derive_ventilation_status(2.0, 1.5, Some(6000.0), None), VentilationStatus::Critical);
        assert_eq!(e.derive_ventilation_status(0.5, 1.5, None, None), VentilationStatus::Poor);
        assert_eq!(e.derive_ventilation_status(1.0, 1.5, None, None), VentilationStatus::Fair);
        assert_eq!(e.derive_ventilation_status(1.5, 1.5, Some(1000.0), Some(5.0)), VentilationStatus::Good);
        assert_eq!(e.derive_ventilation_status(2.0, 1.5, Some(1000.0), Some(5.0)), VentilationStatus::Excellent);
    }
}
