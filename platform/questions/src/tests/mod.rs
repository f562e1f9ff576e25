use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use uuid::Uuid;

use crate::config::QuestionsConfig;
use crate::database::{Question, ANONYMOUS_USERNAME, QUESTION_OBJECT};
use crate::service::QuestionService;

mod api;
mod lease;

use memory::{MemoryProjectionStore, MemoryQuestionStore};

pub fn tokyo() -> FixedOffset {
	FixedOffset::east_opt(9 * 3600).unwrap()
}

pub fn questions_config() -> QuestionsConfig {
	QuestionsConfig {
		display_utc_offset: tokyo(),
		resync_timeout_ms: 1000,
	}
}

pub fn at(secs: i64) -> DateTime<Utc> {
	Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

/// A stored question created `secs` after a fixed base instant.
pub fn question(event_id: &str, comment: &str, like_count: i32, secs: i64) -> Question {
	Question {
		id: Uuid::new_v4(),
		object: QUESTION_OBJECT.to_string(),
		username: ANONYMOUS_USERNAME.to_string(),
		event_id: event_id.to_string(),
		program_id: String::new(),
		comment: comment.to_string(),
		like_count,
		created_at: at(secs),
		updated_at: at(secs),
	}
}

pub struct Harness {
	pub records: Arc<MemoryQuestionStore>,
	pub projection: Arc<MemoryProjectionStore>,
	pub service: QuestionService,
}

impl Harness {
	pub fn new(rows: Vec<Question>) -> Self {
		Self::with_config(rows, questions_config())
	}

	pub fn with_config(rows: Vec<Question>, config: QuestionsConfig) -> Self {
		let records = Arc::new(MemoryQuestionStore::with_rows(rows));
		let projection = Arc::new(MemoryProjectionStore::default());
		let service = QuestionService::new(records.clone(), projection.clone(), &config);

		Self {
			records,
			projection,
			service,
		}
	}
}
