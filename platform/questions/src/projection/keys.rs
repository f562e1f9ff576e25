/// Key names of one event's projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectionKeys {
	/// `questions_{event_id}`, question id to serialized question
	pub field_map: String,
	/// `questions_{event_id}_like`, question ids scored by like count
	pub like_index: String,
	/// `questions_{event_id}_created`, question ids scored by creation time
	pub created_index: String,
	/// `questions_{event_id}:synced`, number of rows the last resync wrote.
	/// Event ids cannot contain `:`, so this never names another event's key.
	pub synced: String,
}

impl ProjectionKeys {
	pub fn for_event(event_id: &str) -> Self {
		let field_map = format!("questions_{event_id}");

		Self {
			like_index: format!("{field_map}_like"),
			created_index: format!("{field_map}_created"),
			synced: format!("{field_map}:synced"),
			field_map,
		}
	}
}
