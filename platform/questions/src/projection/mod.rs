use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use fred::error::{RedisError, RedisErrorKind};
use uuid::Uuid;

mod detector;
mod keys;
mod lease;
mod redis;
mod resync;

pub use detector::{ProjectionState, StalenessDetector};
pub use keys::ProjectionKeys;
pub use lease::{ResyncLease, ResyncLeases};
pub use redis::RedisProjectionStore;
pub use resync::{ResyncEngine, ResyncError, ResyncReport};

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
	#[error("projection store connection failed: {0}")]
	Connection(#[source] RedisError),
	#[error("failed to serialize question {question_id}: {source}")]
	Serialization {
		question_id: Uuid,
		#[source]
		source: serde_json::Error,
	},
	#[error("projection write failed: {0}")]
	Write(#[source] RedisError),
	#[error("projection read failed: {0}")]
	Read(#[source] RedisError),
}

fn is_connection_error(err: &RedisError) -> bool {
	matches!(
		err.kind(),
		RedisErrorKind::IO | RedisErrorKind::Timeout | RedisErrorKind::Canceled | RedisErrorKind::Tls
	)
}

impl ProjectionError {
	pub fn read(err: RedisError) -> Self {
		if is_connection_error(&err) {
			Self::Connection(err)
		} else {
			Self::Read(err)
		}
	}

	pub fn write(err: RedisError) -> Self {
		if is_connection_error(&err) {
			Self::Connection(err)
		} else {
			Self::Write(err)
		}
	}
}

/// Which of an event's projection keys currently exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presence {
	pub field_map: bool,
	pub like_index: bool,
	pub created_index: bool,
	/// Row count recorded by the last completed resync, if any.
	pub synced_rows: Option<u64>,
}

/// One question ready to be written into the projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionEntry {
	pub id: Uuid,
	/// Serialized [`crate::database::QuestionView`]
	pub payload: String,
	pub like_score: f64,
	pub created_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ranking {
	#[default]
	Like,
	Created,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown ranking {0:?}, expected like or created")]
pub struct ParseRankingError(String);

impl FromStr for Ranking {
	type Err = ParseRankingError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"like" => Ok(Self::Like),
			"created" => Ok(Self::Created),
			_ => Err(ParseRankingError(s.to_string())),
		}
	}
}

impl fmt::Display for Ranking {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Like => write!(f, "like"),
			Self::Created => write!(f, "created"),
		}
	}
}

/// The fast store holding each event's field map and ranking indexes.
#[async_trait]
pub trait ProjectionStore: Send + Sync + 'static {
	async fn presence(&self, keys: &ProjectionKeys) -> Result<Presence, ProjectionError>;

	/// Drops whatever projection exists for `keys` and writes `entries` plus the
	/// sync marker in its place, as a single unit.
	async fn replace(&self, keys: &ProjectionKeys, entries: &[ProjectionEntry]) -> Result<(), ProjectionError>;

	/// Up to `limit` question ids, highest score first.
	async fn ranked_ids(&self, keys: &ProjectionKeys, ranking: Ranking, limit: usize) -> Result<Vec<String>, ProjectionError>;

	/// Field map payloads for `ids`, in the same order. Missing fields are `None`.
	async fn fetch(&self, keys: &ProjectionKeys, ids: &[String]) -> Result<Vec<Option<String>>, ProjectionError>;
}
