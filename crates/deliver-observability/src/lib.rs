//! # Deliver Observability
//!
//! Console logging setup for the Deliver API.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging.
///
/// - **Log level**: `LOG_LEVEL` environment variable (default: `info`)
/// - **Filtering**: noisy dependencies capped at `warn`
/// - **Format**: compact with file/line, ANSI auto-detected
pub fn init_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "deliver={},tower_http=warn,hyper=warn,h2=warn,sqlx=warn",
            log_level
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).init();
}
