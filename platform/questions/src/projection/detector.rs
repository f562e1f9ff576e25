use std::sync::Arc;

use super::{Presence, ProjectionError, ProjectionKeys, ProjectionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionState {
	/// None of the three structures exist.
	Missing,
	/// Some but not all of the structures exist.
	Partial,
	/// All three structures exist.
	Fresh,
}

impl Presence {
	/// A key is absent from redis once its structure is empty, so an event the
	/// last resync recorded with zero rows counts as present.
	pub fn state(&self) -> ProjectionState {
		let synced_empty = self.synced_rows == Some(0);

		let present = [self.field_map, self.like_index, self.created_index]
			.into_iter()
			.filter(|exists| *exists || synced_empty)
			.count();

		match present {
			0 => ProjectionState::Missing,
			3 => ProjectionState::Fresh,
			_ => ProjectionState::Partial,
		}
	}
}

/// Read-only probe telling whether an event's projection needs a rebuild.
/// It only checks that the keys exist, not what they contain.
pub struct StalenessDetector {
	projection: Arc<dyn ProjectionStore>,
}

impl StalenessDetector {
	pub fn new(projection: Arc<dyn ProjectionStore>) -> Self {
		Self { projection }
	}

	pub async fn state(&self, event_id: &str) -> Result<ProjectionState, ProjectionError> {
		let presence = self.projection.presence(&ProjectionKeys::for_event(event_id)).await?;
		Ok(presence.state())
	}

	pub async fn is_fresh(&self, event_id: &str) -> Result<bool, ProjectionError> {
		Ok(self.state(event_id).await? == ProjectionState::Fresh)
	}
}
