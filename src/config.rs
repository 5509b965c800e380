//! Application configuration loaded from environment variables.

use std::{env, str::FromStr};

use tracing::Level;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{name} has an invalid value: {value:?}")]
	InvalidVar { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
	pub host: String,
	pub port: u16,
	/// When unset, data is kept in memory.
	pub database_url: Option<String>,
	pub max_connections: u32,
	/// Where unauthenticated requests to protected routes are redirected.
	pub login_url: String,
	pub log_level: Level,
	/// OTLP collector for exporting spans, if any.
	pub otlp_endpoint: Option<String>,
	pub rate_limit: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".into(),
			port: 3000,
			database_url: None,
			max_connections: 10,
			login_url: "/auth/login".into(),
			log_level: Level::INFO,
			otlp_endpoint: None,
			rate_limit: true,
		}
	}
}

impl Config {
	/// Load configuration from environment variables, after reading `.env` if present.
	pub fn from_env() -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();

		let default = Self::default();

		Ok(Self {
			host: var("HOST").unwrap_or(default.host),
			port: parse("PORT")?.unwrap_or(default.port),
			database_url: var("DATABASE_URL"),
			max_connections: parse("DATABASE_MAX_CONNECTIONS")?.unwrap_or(default.max_connections),
			login_url: var("LOGIN_URL").unwrap_or(default.login_url),
			log_level: parse("LOG_LEVEL")?.unwrap_or(default.log_level),
			otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
			rate_limit: parse("RATE_LIMIT")?.unwrap_or(default.rate_limit),
		})
	}
}

/// Reads a variable, treating empty values as unset.
fn var(name: &'static str) -> Option<String> {
	env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
	var(name)
		.map(|value| {
			value
				.trim()
				.parse()
				.map_err(|_| ConfigError::InvalidVar { name, value })
		})
		.transpose()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = Config::default();

		assert_eq!(config.port, 3000);
		assert_eq!(config.login_url, "/auth/login");
		assert!(config.database_url.is_none());
	}

	#[test]
	fn test_parse_rejects_garbage() {
		env::set_var("BLOG_TEST_PORT", "not-a-port");

		let result = parse::<u16>("BLOG_TEST_PORT");

		assert!(matches!(
			result,
			Err(ConfigError::InvalidVar { name: "BLOG_TEST_PORT", .. })
		));

		env::remove_var("BLOG_TEST_PORT");
	}
}
