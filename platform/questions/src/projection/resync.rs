use std::sync::Arc;
use std::time::Instant;

use chrono::FixedOffset;

use super::{ProjectionEntry, ProjectionError, ProjectionKeys, ProjectionStore};
use crate::database::Question;
use crate::store::{QuestionStore, RecordStoreError};

#[derive(Debug, thiserror::Error)]
pub enum ResyncError {
	#[error(transparent)]
	Records(#[from] RecordStoreError),
	#[error(transparent)]
	Projection(#[from] ProjectionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResyncReport {
	/// Rows the record store returned for the event
	pub rows: usize,
	/// Rows written into the projection
	pub projected: usize,
	/// Rows dropped because they could not be serialized
	pub skipped: usize,
}

/// Rebuilds an event's projection from the record store.
pub struct ResyncEngine {
	records: Arc<dyn QuestionStore>,
	projection: Arc<dyn ProjectionStore>,
	offset: FixedOffset,
}

impl ResyncEngine {
	pub fn new(records: Arc<dyn QuestionStore>, projection: Arc<dyn ProjectionStore>, offset: FixedOffset) -> Self {
		Self {
			records,
			projection,
			offset,
		}
	}

	/// Replaces the projection of `event_id` with the rows currently in the
	/// record store. Running it again without new writes produces the same
	/// projection.
	#[tracing::instrument(skip(self), fields(rows = tracing::field::Empty, projected = tracing::field::Empty))]
	pub async fn resync(&self, event_id: &str) -> Result<ResyncReport, ResyncError> {
		let start = Instant::now();
		tracing::debug!("rebuilding projection");

		let questions = self.records.list_by_event(event_id).await.map_err(|err| {
			tracing::error!(error = %err, "failed to load questions for resync");
			err
		})?;

		let mut report = ResyncReport {
			rows: questions.len(),
			..Default::default()
		};

		let mut entries = Vec::with_capacity(questions.len());
		for question in &questions {
			match self.entry(question) {
				Ok(entry) => entries.push(entry),
				Err(err) => {
					tracing::warn!(question_id = %question.id, error = %err, "skipping question");
					report.skipped += 1;
				}
			}
		}

		self.projection
			.replace(&ProjectionKeys::for_event(event_id), &entries)
			.await
			.map_err(|err| {
				tracing::error!(error = %err, "failed to write projection");
				err
			})?;

		report.projected = entries.len();

		tracing::Span::current()
			.record("rows", report.rows)
			.record("projected", report.projected);
		tracing::info!(skipped = report.skipped, elapsed = ?start.elapsed(), "projection rebuilt");

		Ok(report)
	}

	fn entry(&self, question: &Question) -> Result<ProjectionEntry, ProjectionError> {
		let payload =
			serde_json::to_string(&question.display(&self.offset)).map_err(|source| ProjectionError::Serialization {
				question_id: question.id,
				source,
			})?;

		Ok(ProjectionEntry {
			id: question.id,
			payload,
			like_score: f64::from(question.like_count),
			created_score: question.created_at.timestamp() as f64,
		})
	}
}
