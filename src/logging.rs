//! 诊断日志初始化

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 日志过滤配置读取的环境变量，例如 `AOA_LOG=aoa_gen=debug`
pub const LOG_ENV: &str = "AOA_LOG";

static INIT: Once = Once::new();

/// `AOA_LOG` 未设置或无效时使用的过滤规则
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "aoa_gen=debug" } else { "warn" }
}

/// 初始化 tracing，日志写到标准错误，标准输出只留给进度信息
///
/// 重复调用是安全的，只有第一次生效。
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .try_init();
    });
}
