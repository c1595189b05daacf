// ==========================================
// 车队运营驾驶舱 - 日志初始化
// ==========================================
// 工具: tracing + tracing-subscriber
// 环境变量:
// - RUST_LOG: 过滤器 (默认 fleet_ops=info,warn)
// - FLEET_OPS_LOG_FORMAT: text | compact | json (默认 text)
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认过滤器: 本库 info, 依赖库 warn
pub const DEFAULT_LOG_FILTER: &str = "fleet_ops=info,warn";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Compact,
    Json,
}

impl LogFormat {
    /// 解析格式名; 无法识别时回退为 Text
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Text,
        }
    }

    fn from_env() -> Self {
        std::env::var("FLEET_OPS_LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default()
    }
}

/// 初始化日志系统
///
/// # 示例
/// ```no_run
/// use fleet_ops::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // stdout 留给结果输出
    let builder = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    match LogFormat::from_env() {
        LogFormat::Text => builder.init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// 初始化测试环境的日志系统 (可重复调用)
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("fleet_ops=debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_format() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" compact "), LogFormat::Compact);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
        assert_eq!(LogFormat::default(), LogFormat::Text);
    }

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
    }
}
