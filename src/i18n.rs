// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// 告警/建议/提醒文本均经由此模块渲染
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use poultry_analytics::i18n::t;
/// let msg = t("environment.recommend.optimal");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use poultry_analytics::i18n::t_with_args;
/// let msg = t_with_args("egg.loss", &[("value", "6.0")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 翻译计数消息（单复数）
///
/// 约定: `{base}_one` / `{base}_other` 两个键,占位符 `%{count}`
pub fn t_count(base: &str, count: i64) -> String {
    let key = if count.abs() == 1 {
        format!("{}_one", base)
    } else {
        format!("{}_other", base)
    };
    t_with_args(&key, &[("count", &count.to_string())])
}

/// 数值格式化为固定小数位（供消息参数使用）
pub fn fmt_num(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

// rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
// 依赖语言的测试需持有此锁。
#[cfg(test)]
pub(crate) static LOCALE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
