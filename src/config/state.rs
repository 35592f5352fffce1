// Application state module
// Read-only state shared by every connection task

use super::types::Config;
use crate::logger::AccessLogFormat;

/// Application state
///
/// The configuration is fixed at startup; request handlers read it through
/// an `Arc<AppState>` without locking. The access log format string is
/// parsed here once so the request path never re-parses it.
pub struct AppState {
    pub config: Config,
    pub access_log_format: AccessLogFormat,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            access_log_format: AccessLogFormat::from_config(&config.logging.access_log_format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parses_access_log_format_once() {
        let mut config = Config::load_from("nonexistent-config").expect("defaults load");
        config.logging.access_log_format = "json".to_string();
        let state = AppState::new(&config);
        assert!(matches!(state.access_log_format, AccessLogFormat::Json));
    }
}
