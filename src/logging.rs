//! Log output setup
//!
//! `RUST_LOG` wins over the configured filter when it is set and parses.

use tracing_subscriber::EnvFilter;
use vitrine_conf::LoggingSettings;

use crate::{AppError, AppResult};

/// Install the global fmt subscriber
///
/// Returns `false` when a subscriber was already installed, in which case
/// nothing changes.
pub fn init_logging(settings: &LoggingSettings) -> AppResult<bool> {
	let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
	let filter = build_filter(rust_log.as_deref(), &settings.filter)?;
	let installed = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_ansi(settings.ansi)
		.with_target(true)
		.try_init()
		.is_ok();
	if installed {
		tracing::debug!(filter = %settings.filter, "logging initialized");
	}
	Ok(installed)
}

/// Filter from `RUST_LOG` if usable, otherwise from `configured`
pub fn build_filter(rust_log: Option<&str>, configured: &str) -> AppResult<EnvFilter> {
	if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty())
		&& let Ok(filter) = EnvFilter::try_new(directives)
	{
		return Ok(filter);
	}
	EnvFilter::try_new(configured)
		.map_err(|e| AppError::Logging(format!("invalid log filter '{}': {}", configured, e)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(None, "info", "info")]
	#[case(Some("vitrine_cms=debug"), "info", "vitrine_cms=debug")]
	#[case(Some(""), "warn", "warn")]
	#[case(Some("vitrine=loud"), "warn", "warn")]
	fn test_build_filter_precedence(
		#[case] rust_log: Option<&str>,
		#[case] configured: &str,
		#[case] expected: &str,
	) {
		// Act
		let filter = build_filter(rust_log, configured).unwrap();

		// Assert
		assert_eq!(filter.to_string(), expected);
	}

	#[rstest]
	fn test_invalid_configured_filter_is_an_error() {
		let result = build_filter(None, "vitrine=loud");

		assert!(matches!(result, Err(AppError::Logging(_))));
	}

	#[rstest]
	fn test_second_init_is_a_no_op() {
		// Arrange
		let settings = LoggingSettings {
			ansi: false,
			..LoggingSettings::default()
		};
		let _ = init_logging(&settings);

		// Act
		let again = init_logging(&settings);

		// Assert
		assert!(matches!(again, Ok(false)));
	}
}
