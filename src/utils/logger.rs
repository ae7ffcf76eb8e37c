use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "site_schema";

/// Directives used when `RUST_LOG` is not set.
fn default_directives(verbose: bool) -> String {
    if verbose {
        // 其他 crate 保持 info，避免 html5ever 的 debug 訊息洗版
        format!("{}=debug,info", CRATE_TARGET)
    } else {
        format!("{}=info", CRATE_TARGET)
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Human-readable, one line per event on stderr.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// 給 CI 用：每行一個 JSON 事件，方便收集 build log
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(false),
        )
        .init();
}
