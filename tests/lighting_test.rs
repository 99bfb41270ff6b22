// ==========================================
// 光照合规集成测试
// ==========================================

mod helpers;

use chrono::Duration;
use helpers::test_data_builder::{date, lighting};
use poultry_analytics::config::EngineConfig;
use poultry_analytics::domain::types::{AlertSeverity, ProductionType};
use poultry_analytics::engine::{AdjustmentDirection, EffectivenessLevel, LightingLog};
use poultry_analytics::{AlertKind, AnalyticsApi};

fn api() -> AnalyticsApi {
    AnalyticsApi::new(&EngineConfig::default())
}

#[test]
fn test_layer_short_photoperiod_two_critical_alerts() {
    let readings = vec![lighting("L1", date(2024, 5, 1), 14.0, 16.0)];
    let eval = api().evaluate_lighting(&readings, ProductionType::Layer, None);

    let kinds: Vec<_> = eval.alerts.iter().map(|a| (a.kind, a.severity)).collect();
    assert!(kinds.contains(&(AlertKind::LightHoursDeviation, AlertSeverity::Critical)));
    assert!(kinds.contains(&(AlertKind::PhotoperiodDecrease, AlertSeverity::Critical)));
    assert!(eval.reminder.is_none());
}

#[test]
fn test_exact_schedule_is_fully_compliant() {
    let start = date(2024, 5, 1);
    let readings: Vec<_> = (0..14)
        .map(|i| {
            let hours = if i < 7 { 15.5 } else { 16.0 };
            lighting("L1", start + Duration::days(i), hours, hours)
        })
        .collect();

    let eval = api().evaluate_lighting(&readings, ProductionType::Layer, Some(22));
    assert_eq!(eval.compliance.compliance_rate_pct, 100.0);
    assert_eq!(eval.compliance.average_deviation_h, 0.0);
    assert_eq!(eval.compliance.days_off_target, 0);
    assert!(eval.alerts.is_empty());
    assert_eq!(eval.effectiveness.total_adjustments, 1);
    assert_eq!(eval.effectiveness.level, EffectivenessLevel::WellManaged);
}

#[test]
fn test_caller_owned_log_feeds_evaluator() {
    let mut log = LightingLog::new();
    log.append(lighting("L1", date(2024, 5, 3), 16.0, 16.0));
    log.append(lighting("L1", date(2024, 5, 1), 16.0, 16.0));
    log.append(lighting("L1", date(2024, 5, 2), 15.0, 16.0));

    assert_eq!(log.latest().unwrap().date, date(2024, 5, 3));
    let eval = api().evaluate_lighting_log(&log, ProductionType::Layer, None);
    assert_eq!(eval.compliance.days, 3);
    assert_eq!(eval.compliance.days_off_target, 1);
    // 最新一天合规,不告警
    assert!(eval.alerts.is_empty());
}

#[test]
fn test_reminder_for_upcoming_increase() {
    let eval = api().evaluate_lighting(&[], ProductionType::Layer, Some(18));
    let reminder = eval.reminder.unwrap();
    assert_eq!(reminder.next_week, 19);
    assert_eq!(reminder.direction, AdjustmentDirection::Increase);
    assert_eq!(reminder.current_hours, 12.0);
    assert_eq!(reminder.next_hours, 13.0);
    assert!(!reminder.render().is_empty());
    assert_eq!(eval.effectiveness.level, EffectivenessLevel::NoData);
}
