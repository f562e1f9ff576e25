use async_trait::async_trait;
use sqlx::PgPool;

use super::{QuestionStore, RecordStoreError};
use crate::database::Question;

pub struct PgQuestionStore {
	pool: PgPool,
}

impl PgQuestionStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &PgPool {
		&self.pool
	}
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
	async fn insert(&self, question: &Question) -> Result<(), RecordStoreError> {
		sqlx::query(
			"INSERT INTO questions (id, object, username, event_id, program_id, comment, like_count, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
		)
		.bind(question.id)
		.bind(&question.object)
		.bind(&question.username)
		.bind(&question.event_id)
		.bind(&question.program_id)
		.bind(&question.comment)
		.bind(question.like_count)
		.bind(question.created_at)
		.bind(question.updated_at)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn list_by_event(&self, event_id: &str) -> Result<Vec<Question>, RecordStoreError> {
		Ok(sqlx::query_as::<_, Question>(
			"SELECT id, object, username, event_id, program_id, comment, like_count, created_at, updated_at FROM questions WHERE event_id = $1 ORDER BY created_at, id",
		)
		.bind(event_id)
		.fetch_all(&self.pool)
		.await?)
	}
}
