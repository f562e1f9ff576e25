use async_trait::async_trait;

use crate::database::Question;

mod postgres;

pub use postgres::PgQuestionStore;

#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
	#[error("record store connection failed: {0}")]
	Connection(#[source] sqlx::Error),
	#[error("record store query failed: {0}")]
	Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RecordStoreError {
	fn from(err: sqlx::Error) -> Self {
		match err {
			sqlx::Error::Io(_)
			| sqlx::Error::Tls(_)
			| sqlx::Error::Configuration(_)
			| sqlx::Error::PoolTimedOut
			| sqlx::Error::PoolClosed
			| sqlx::Error::WorkerCrashed => Self::Connection(err),
			err => Self::Query(err),
		}
	}
}

/// The authoritative, append-only store of questions.
#[async_trait]
pub trait QuestionStore: Send + Sync + 'static {
	async fn insert(&self, question: &Question) -> Result<(), RecordStoreError>;

	/// Every question of `event_id`, oldest first.
	async fn list_by_event(&self, event_id: &str) -> Result<Vec<Question>, RecordStoreError>;
}
