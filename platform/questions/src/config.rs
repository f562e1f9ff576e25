use std::net::SocketAddr;
use std::time::Duration;

use chrono::FixedOffset;
use clap::{Args, Parser};
use common::logging;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid database host {0:?}, expected host[:port]")]
	InvalidDatabaseHost(String),
}

/// Live Q&A question service
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "platform-questions")]
pub struct AppConfig {
	#[command(flatten)]
	pub api: ApiConfig,

	#[command(flatten)]
	pub logging: LoggingConfig,

	#[command(flatten)]
	pub database: DatabaseConfig,

	#[command(flatten)]
	pub redis: RedisConfig,

	#[command(flatten)]
	pub questions: QuestionsConfig,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ApiConfig {
	/// The address the HTTP server binds to
	#[arg(long = "bind-address", env = "BIND_ADDRESS", default_value = "[::]:8080")]
	pub bind_address: SocketAddr,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
	/// Log filter, in the `tracing_subscriber::EnvFilter` syntax
	#[arg(long = "log-level", env = "LOG_LEVEL", default_value = "info")]
	pub level: String,

	/// Output format: default, json, pretty or compact
	#[arg(long = "log-mode", env = "LOG_MODE", default_value = "default")]
	pub mode: logging::Mode,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
	#[arg(long = "db-user", env = "DB_USER", default_value = "root")]
	pub user: String,

	#[arg(long = "db-password", env = "DB_PASSWORD", default_value = "")]
	pub password: String,

	/// `host` or `host:port`
	#[arg(long = "db-url", env = "DB_URL", default_value = "localhost:5432")]
	pub host: String,

	#[arg(long = "db-name", env = "DB_NAME", default_value = "qicoo")]
	pub name: String,

	#[arg(long = "db-max-connections", env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
	pub max_connections: u32,

	/// Apply the bundled migrations on start-up
	#[arg(long = "db-migrate", env = "DB_MIGRATE")]
	pub migrate: bool,
}

impl DatabaseConfig {
	pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
		let mut options = PgConnectOptions::new()
			.username(&self.user)
			.database(&self.name);

		if !self.password.is_empty() {
			options = options.password(&self.password);
		}

		let (host, port) = split_host_port(&self.host)?;
		options = options.host(host);
		if let Some(port) = port {
			options = options.port(port);
		}

		Ok(options)
	}
}

/// Splits `host`, `host:port`, `[v6]` or `[v6]:port`.
pub(crate) fn split_host_port(value: &str) -> Result<(&str, Option<u16>), ConfigError> {
	let invalid = || ConfigError::InvalidDatabaseHost(value.to_string());

	let (host, port) = match value.strip_prefix('[') {
		Some(rest) => {
			let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
			match tail {
				"" => (host, None),
				tail => (host, Some(tail.strip_prefix(':').ok_or_else(invalid)?)),
			}
		}
		None => match value.split_once(':') {
			Some((host, port)) => (host, Some(port)),
			None => (value, None),
		},
	};

	let port = port.map(|port| port.parse::<u16>().map_err(|_| invalid())).transpose()?;

	Ok((host, port))
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RedisConfig {
	/// Projection store connection url
	#[arg(long = "redis-url", env = "REDIS_URL", default_value = "redis://localhost:6379")]
	pub url: String,

	#[arg(long = "redis-pool-size", env = "REDIS_POOL_SIZE", default_value_t = 10)]
	pub pool_size: usize,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct QuestionsConfig {
	/// Fixed UTC offset timestamps are rendered in
	#[arg(long = "display-utc-offset", env = "DISPLAY_UTC_OFFSET", default_value = "+09:00", allow_hyphen_values = true)]
	pub display_utc_offset: FixedOffset,

	/// Upper bound for a resync triggered by a read, in milliseconds
	#[arg(long = "resync-timeout-ms", env = "RESYNC_TIMEOUT_MS", default_value_t = 5000)]
	pub resync_timeout_ms: u64,
}

impl QuestionsConfig {
	pub fn resync_timeout(&self) -> Duration {
		Duration::from_millis(self.resync_timeout_ms)
	}
}

impl AppConfig {
	/// Reads the configuration from the command line and the environment.
	pub fn load() -> Result<Self, clap::Error> {
		Self::try_parse()
	}
}
