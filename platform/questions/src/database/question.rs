use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use uuid::Uuid;

pub const QUESTION_OBJECT: &str = "question";
pub const LIST_OBJECT: &str = "list";
/// Submitter name used until questions carry a session identity.
pub const ANONYMOUS_USERNAME: &str = "anonymous";

/// A question as it is stored in the `questions` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Question {
	pub id: Uuid,
	/// Always [`QUESTION_OBJECT`]
	pub object: String,
	pub username: String,
	pub event_id: String,
	pub program_id: String,
	pub comment: String,
	pub like_count: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Body of a question submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct NewQuestion {
	pub comment: String,
	#[serde(default)]
	pub program_id: String,
}

impl Question {
	pub fn new(event_id: &str, new: NewQuestion) -> Self {
		Self::new_at(event_id, new, Utc::now())
	}

	/// Postgres keeps microseconds, so the timestamp is truncated up front to
	/// keep the in-memory record identical to the stored row.
	pub fn new_at(event_id: &str, new: NewQuestion, now: DateTime<Utc>) -> Self {
		let now = now.trunc_subsecs(6);

		Self {
			id: Uuid::new_v4(),
			object: QUESTION_OBJECT.to_string(),
			username: ANONYMOUS_USERNAME.to_string(),
			event_id: event_id.to_string(),
			program_id: new.program_id,
			comment: new.comment,
			like_count: 0,
			created_at: now,
			updated_at: now,
		}
	}

	/// Renders the question with its timestamps in `offset`.
	pub fn display(&self, offset: &FixedOffset) -> QuestionView {
		QuestionView {
			id: self.id,
			object: self.object.clone(),
			username: self.username.clone(),
			event_id: self.event_id.clone(),
			program_id: self.program_id.clone(),
			comment: self.comment.clone(),
			created_at: self.created_at.with_timezone(offset),
			updated_at: self.updated_at.with_timezone(offset),
			like: self.like_count,
		}
	}
}

/// The public JSON shape of a question. This is also what the projection
/// stores in the field map.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuestionView {
	pub id: Uuid,
	pub object: String,
	pub username: String,
	pub event_id: String,
	pub program_id: String,
	pub comment: String,
	pub created_at: DateTime<FixedOffset>,
	pub updated_at: DateTime<FixedOffset>,
	pub like: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuestionList {
	pub object: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub data: Vec<QuestionView>,
}

impl QuestionList {
	pub fn new(data: Vec<QuestionView>) -> Self {
		Self {
			object: LIST_OBJECT.to_string(),
			kind: QUESTION_OBJECT.to_string(),
			data,
		}
	}
}
