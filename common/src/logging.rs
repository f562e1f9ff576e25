use std::fmt;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt as tfmt, reload, EnvFilter, Registry};

static RELOAD_HANDLE: OnceCell<reload::Handle<EnvFilter, Registry>> = OnceCell::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
	#[default]
	Default,
	Json,
	Pretty,
	Compact,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown logging mode: {0}, expected one of default, json, pretty, compact")]
pub struct ParseModeError(String);

impl FromStr for Mode {
	type Err = ParseModeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"default" => Ok(Self::Default),
			"json" => Ok(Self::Json),
			"pretty" => Ok(Self::Pretty),
			"compact" => Ok(Self::Compact),
			_ => Err(ParseModeError(s.to_string())),
		}
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Default => write!(f, "default"),
			Self::Json => write!(f, "json"),
			Self::Pretty => write!(f, "pretty"),
			Self::Compact => write!(f, "compact"),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
	#[error("invalid log level: {0}")]
	InvalidLevel(#[from] tracing_subscriber::filter::ParseError),
	#[error("failed to install subscriber: {0}")]
	Init(#[from] tracing_subscriber::util::TryInitError),
	#[error("failed to reload log level: {0}")]
	Reload(#[from] reload::Error),
}

/// Installs the global subscriber on the first call. Later calls only swap the
/// level filter, the output mode is fixed for the lifetime of the process.
pub fn init(level: &str, mode: Mode) -> Result<(), LoggingError> {
	let filter = EnvFilter::try_new(level)?;

	if let Some(handle) = RELOAD_HANDLE.get() {
		handle.reload(filter)?;
		return Ok(());
	}

	RELOAD_HANDLE.get_or_try_init(|| {
		let (filter, handle) = reload::Layer::new(filter);
		let registry = tracing_subscriber::registry().with(filter);

		match mode {
			Mode::Default => registry
				.with(tfmt::layer().with_file(true).with_line_number(true))
				.try_init(),
			Mode::Json => registry
				.with(tfmt::layer().json().with_file(true).with_line_number(true))
				.try_init(),
			Mode::Pretty => registry
				.with(tfmt::layer().pretty().with_file(true).with_line_number(true))
				.try_init(),
			Mode::Compact => registry.with(tfmt::layer().compact()).try_init(),
		}?;

		Ok::<_, LoggingError>(handle)
	})?;

	Ok(())
}
