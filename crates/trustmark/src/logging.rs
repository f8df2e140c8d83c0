//! Logging initialization.
//!
//! `RUST_LOG` takes precedence over the configured minimum level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trustmark_core::LoggingInfo;

use crate::error::{Result, SdkError};

fn filter(info: &LoggingInfo) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&info.min_log_level))
}

/// Install a human-readable subscriber.
///
/// # Example
/// ```no_run
/// use trustmark::logging;
/// use trustmark_core::LoggingInfo;
///
/// logging::init(&LoggingInfo::default()).unwrap();
/// tracing::info!("annotator started");
/// ```
pub fn init(info: &LoggingInfo) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter(info))
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| SdkError::Logging(e.to_string()))
}

/// Install a JSON subscriber for log aggregation.
pub fn init_json(info: &LoggingInfo) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter(info))
        .with(fmt::layer().json().with_target(true))
        .try_init()
        .map_err(|e| SdkError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_error_not_panic() {
        let info = LoggingInfo {
            min_log_level: "debug".into(),
        };
        let first = init(&info);
        let second = init_json(&info);
        // Another test may have installed a subscriber first.
        assert!(first.is_err() || second.is_err());
        assert!(matches!(second, Err(SdkError::Logging(_))));
    }
}
