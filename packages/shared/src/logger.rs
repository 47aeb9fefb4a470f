//! Logging setup utilities for the Hiroba chat relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Both the calling package and the binary are enabled at `default_log_level`.
pub fn default_filter(package_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},{}={},tower_http={}",
        package_name.replace('-', "_"),
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level,
        default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `package_name` - The package whose logs should be enabled (e.g., "hiroba-server")
/// * `binary_name` - The name of the binary (e.g., "hiroba-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::setup_logger;
///
/// setup_logger(env!("CARGO_PKG_NAME"), "hiroba-server", "info");
/// ```
pub fn setup_logger(package_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(package_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_uses_underscored_crate_names() {
        // テスト項目: パッケージ名とバイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let package = "hiroba-server";
        let binary = "hiroba-server";

        // when (操作):
        let filter = default_filter(package, binary, "debug");

        // then (期待する結果):
        assert_eq!(
            filter,
            "hiroba_server=debug,hiroba_server=debug,tower_http=debug"
        );
    }
}
