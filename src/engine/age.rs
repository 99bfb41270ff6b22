// ==========================================
// 家禽生产分析系统 - 日龄计算器
// ==========================================
// 职责: 日龄/周龄推算、可读日龄格式化、日龄节点预警
// 输入: 参考日期 (出雏日期或入舍日期) + 当前日期
// 输出: 日龄 / 周龄 / 文本 / 是否预警
// ==========================================
// 负日龄不拒绝,由调用方保证参考日期不晚于当前日期
// ==========================================

use crate::i18n::{t_count, t_with_args};
use chrono::{Duration, NaiveDate};

/// 缺省预警提前天数
pub const DEFAULT_LEAD_DAYS: i64 = 3;

// ==========================================
// AgeCalculator - 日龄计算器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct AgeCalculator;

impl AgeCalculator {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 日龄: floor((now - reference) / 1 天)
    pub fn age_in_days(&self, reference_date: NaiveDate, now: NaiveDate) -> i64 {
        (now - reference_date).num_days()
    }

    /// 周龄: floor(日龄 / 7)
    pub fn age_in_weeks(&self, reference_date: NaiveDate, now: NaiveDate) -> i64 {
        self.age_in_days(reference_date, now).div_euclid(7)
    }

    /// 光照程序使用的当前周: ceil(日龄 / 7)
    pub fn current_week(&self, reference_date: NaiveDate, now: NaiveDate) -> i64 {
        let days = self.age_in_days(reference_date, now);
        days.div_euclid(7) + if days.rem_euclid(7) > 0 { 1 } else { 0 }
    }

    /// 可读日龄: 周 + 余天,0 周时只显示天数
    pub fn format_age(&self, reference_date: NaiveDate, now: NaiveDate) -> String {
        let days = self.age_in_days(reference_date, now);
        let weeks = days.div_euclid(7);
        let remainder = days.rem_euclid(7);

        if weeks == 0 {
            return t_count("age.day", days);
        }
        if remainder == 0 {
            return t_count("age.week", weeks);
        }
        t_with_args(
            "age.weeks_and_days",
            &[
                ("weeks", &t_count("age.week", weeks)),
                ("days", &t_count("age.day", remainder)),
            ],
        )
    }

    /// 日龄节点预警: age_days >= target_days - lead_days
    pub fn should_alert_by_age(
        &self,
        reference_date: NaiveDate,
        target_days: i64,
        now: NaiveDate,
        lead_days: i64,
    ) -> bool {
        self.age_in_days(reference_date, now) >= target_days - lead_days
    }

    /// 由当前日期和周龄反推出雏日期
    pub fn birth_date_from_age(&self, current_date: NaiveDate, age_weeks: i64) -> NaiveDate {
        current_date - Duration::days(age_weeks * 7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{set_locale, LOCALE_TEST_LOCK};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_age_in_days_and_weeks() {
        let calc = AgeCalculator::new();
        let start = d(2024, 1, 1);
        assert_eq!(calc.age_in_days(start, d(2024, 1, 1)), 0);
        assert_eq!(calc.age_in_days(start, d(2024, 1, 22)), 21);
        assert_eq!(calc.age_in_weeks(start, d(2024, 1, 21)), 2);
        assert_eq!(calc.age_in_weeks(start, d(2024, 1, 22)), 3);
    }

    #[test]
    fn test_negative_age_not_rejected() {
        let calc = AgeCalculator::new();
        assert_eq!(calc.age_in_days(d(2024, 1, 10), d(2024, 1, 1)), -9);
        assert_eq!(calc.age_in_weeks(d(2024, 1, 10), d(2024, 1, 1)), -2);
    }

    #[test]
    fn test_current_week_rounds_up() {
        let calc = AgeCalculator::new();
        let start = d(2024, 1, 1);
        assert_eq!(calc.current_week(start, d(2024, 1, 1)), 0);
        assert_eq!(calc.current_week(start, d(2024, 1, 2)), 1);
        assert_eq!(calc.current_week(start, d(2024, 1, 8)), 1);
        assert_eq!(calc.current_week(start, d(2024, 1, 9)), 2);
    }

    #[test]
    fn test_should_alert_by_age() {
        let calc = AgeCalculator::new();
        let start = d(2024, 1, 1);
        // 第 38 天不预警,第 39 天开始预警
        assert!(!calc.should_alert_by_age(start, 42, d(2024, 2, 8), DEFAULT_LEAD_DAYS));
        assert!(calc.should_alert_by_age(start, 42, d(2024, 2, 9), DEFAULT_LEAD_DAYS));
    }

    #[test]
    fn test_birth_date_from_age() {
        let calc = AgeCalculator::new();
        assert_eq!(calc.birth_date_from_age(d(2024, 3, 1), 2), d(2024, 2, 16));
    }

    #[test]
    fn test_format_age_en() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let calc = AgeCalculator::new();
        let start = d(2024, 1, 1);
        assert_eq!(calc.format_age(start, d(2024, 1, 2)), "1 day");
        assert_eq!(calc.format_age(start, d(2024, 1, 6)), "5 days");
        assert_eq!(calc.format_age(start, d(2024, 1, 8)), "1 week");
        assert_eq!(calc.format_age(start, d(2024, 1, 17)), "2 weeks and 2 days");
        assert_eq!(calc.format_age(start, d(2024, 1, 9)), "1 week and 1 day");
        set_locale("zh-CN");
    }
}
