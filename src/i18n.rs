// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::api::error::ApiError;
use crate::api::simulation_api::SimulationRun;

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
/// use fleet_ops::i18n::t;
/// let msg = t("simulation.reset");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 模拟完成提示
pub fn simulation_completed_message(run: &SimulationRun) -> String {
    t_with_args(
        "simulation.completed",
        &[
            ("drivers", &run.result.driver_count.to_string()),
            ("deliveries", &run.result.total_deliveries.to_string()),
            ("profit", &run.result.total_profit.to_string()),
        ],
    )
}

/// 模拟失败提示
pub fn simulation_error_message(err: &ApiError) -> String {
    let key = match err {
        ApiError::InvalidInput(_) => "simulation.rejected",
        ApiError::Configuration(_) => "simulation.config_error",
        _ => return format!("{}: {}", t("common.failed"), err),
    };
    t_with_args(key, &[("reason", &err.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，测试并行执行时需串行化
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("simulation.reset"), "已恢复默认模拟参数");

        set_locale("en");
        assert_eq!(t("simulation.reset"), "Simulation parameters reset to defaults");

        set_locale("zh-CN");
    }

    #[test]
    fn test_config_messages_fill_arguments() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(
            t_with_args("config.restored", &[("count", "3")]),
            "Restored 3 configuration items from snapshot"
        );
        assert_eq!(
            t_with_args("config.updated", &[("key", "base_fuel_cost")]),
            "Configuration updated: base_fuel_cost"
        );

        set_locale("zh-CN");
        assert_eq!(
            t_with_args("config.restored", &[("count", "3")]),
            "已从快照恢复 3 项配置"
        );
    }

    #[test]
    fn test_error_message_includes_reason() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let err = ApiError::InvalidInput("字段driver_count错误".to_string());
        let msg = simulation_error_message(&err);
        assert!(msg.starts_with("Invalid simulation parameters"));
        assert!(msg.contains("driver_count"));

        set_locale("zh-CN");
    }
}
