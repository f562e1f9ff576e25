use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;

use crate::config::QuestionsConfig;
use crate::database::{NewQuestion, Question, QuestionList, QuestionView};
use crate::projection::{
	ProjectionError, ProjectionKeys, ProjectionState, ProjectionStore, Ranking, ResyncEngine, ResyncError, ResyncLeases,
	ResyncReport, StalenessDetector,
};
use crate::store::{QuestionStore, RecordStoreError};

pub const DEFAULT_RANK_LIMIT: usize = 50;
pub const MAX_RANK_LIMIT: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum QuestionError {
	#[error("invalid event id {0:?}")]
	InvalidEventId(String),
	#[error(transparent)]
	Records(#[from] RecordStoreError),
	#[error(transparent)]
	Projection(#[from] ProjectionError),
}

impl From<ResyncError> for QuestionError {
	fn from(err: ResyncError) -> Self {
		match err {
			ResyncError::Records(err) => Self::Records(err),
			ResyncError::Projection(err) => Self::Projection(err),
		}
	}
}

/// Event ids end up in projection key names, so they are limited to
/// `[a-zA-Z0-9-_]+`.
pub fn validate_event_id(event_id: &str) -> Result<(), QuestionError> {
	if !event_id.is_empty()
		&& event_id
			.bytes()
			.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
	{
		Ok(())
	} else {
		Err(QuestionError::InvalidEventId(event_id.to_string()))
	}
}

/// Read and write paths over the record store and its projection.
pub struct QuestionService {
	records: Arc<dyn QuestionStore>,
	projection: Arc<dyn ProjectionStore>,
	detector: StalenessDetector,
	engine: ResyncEngine,
	leases: ResyncLeases,
	offset: FixedOffset,
	resync_timeout: Duration,
}

impl QuestionService {
	pub fn new(records: Arc<dyn QuestionStore>, projection: Arc<dyn ProjectionStore>, config: &QuestionsConfig) -> Self {
		Self {
			detector: StalenessDetector::new(projection.clone()),
			engine: ResyncEngine::new(records.clone(), projection.clone(), config.display_utc_offset),
			leases: ResyncLeases::new(),
			offset: config.display_utc_offset,
			resync_timeout: config.resync_timeout(),
			records,
			projection,
		}
	}

	pub fn display_offset(&self) -> &FixedOffset {
		&self.offset
	}

	pub fn detector(&self) -> &StalenessDetector {
		&self.detector
	}

	pub fn leases(&self) -> &ResyncLeases {
		&self.leases
	}

	/// Rebuilds the projection of `event_id` unless it is fresh. Concurrent
	/// calls for the same event run one at a time, and every call probes again
	/// once it holds the lease, skipping its rebuild if another call already
	/// left the projection fresh.
	pub async fn ensure_fresh(&self, event_id: &str) -> Result<Option<ResyncReport>, QuestionError> {
		let state = self.detector.state(event_id).await?;
		if state == ProjectionState::Fresh {
			return Ok(None);
		}

		tracing::debug!(event_id, ?state, "projection is stale");

		// the previous holder may have finished between the probe and the lease
		let lease = self.leases.acquire(event_id).await;
		if self.detector.is_fresh(event_id).await? {
			tracing::debug!(event_id, contended = lease.contended(), "projection rebuilt before lease was taken");
			return Ok(None);
		}

		let report = self.engine.resync(event_id).await?;
		drop(lease);

		Ok(Some(report))
	}

	/// [`QuestionService::ensure_fresh`] bounded by the resync timeout. The
	/// record store stays authoritative, so a failed resync is only logged.
	async fn refresh_projection(&self, event_id: &str) {
		match tokio::time::timeout(self.resync_timeout, self.ensure_fresh(event_id)).await {
			Ok(Ok(_)) => {}
			Ok(Err(err)) => tracing::error!(event_id, error = %err, "projection resync failed"),
			Err(_) => tracing::warn!(event_id, timeout = ?self.resync_timeout, "projection resync timed out"),
		}
	}

	/// Every question of `event_id`, read from the record store after making
	/// sure the projection is in place.
	pub async fn list_questions(&self, event_id: &str) -> Result<QuestionList, QuestionError> {
		validate_event_id(event_id)?;

		self.refresh_projection(event_id).await;

		let questions = self.records.list_by_event(event_id).await.map_err(|err| {
			tracing::error!(event_id, error = %err, "failed to list questions");
			err
		})?;

		Ok(QuestionList::new(
			questions.iter().map(|question| question.display(&self.offset)).collect(),
		))
	}

	/// Stores a new question. The projection is left alone and picks the
	/// question up on the next resync.
	pub async fn create_question(&self, event_id: &str, new: NewQuestion) -> Result<Question, QuestionError> {
		validate_event_id(event_id)?;

		let question = Question::new(event_id, new);

		self.records.insert(&question).await.map_err(|err| {
			tracing::error!(event_id, question_id = %question.id, error = %err, "failed to insert question");
			err
		})?;

		tracing::debug!(event_id, question_id = %question.id, "question created");

		Ok(question)
	}

	/// Questions of `event_id` served from the projection, ordered by `ranking`.
	pub async fn rank_questions(&self, event_id: &str, ranking: Ranking, limit: usize) -> Result<QuestionList, QuestionError> {
		validate_event_id(event_id)?;

		let limit = limit.min(MAX_RANK_LIMIT);
		if limit == 0 {
			return Ok(QuestionList::new(Vec::new()));
		}

		self.refresh_projection(event_id).await;

		let keys = ProjectionKeys::for_event(event_id);
		let ids = self.projection.ranked_ids(&keys, ranking, limit).await?;
		let payloads = self.projection.fetch(&keys, &ids).await?;

		let data = ids
			.iter()
			.zip(payloads)
			.filter_map(|(id, payload)| {
				let Some(payload) = payload else {
					tracing::warn!(event_id, question_id = %id, "ranked question missing from field map");
					return None;
				};

				match serde_json::from_str::<QuestionView>(&payload) {
					Ok(view) => Some(view),
					Err(err) => {
						tracing::warn!(event_id, question_id = %id, error = %err, "failed to decode ranked question");
						None
					}
				}
			})
			.collect();

		Ok(QuestionList::new(data))
	}
}
