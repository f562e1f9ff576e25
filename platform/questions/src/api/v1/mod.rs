use std::sync::Arc;

use common::http::RouteError;
use hyper::Body;
use routerify::Router;

use super::error::ApiError;
use crate::global::QuestionsGlobal;

mod health;
mod questions;

pub fn routes<G: QuestionsGlobal>(_: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
	Router::builder()
		.get("/health", health::health)
		.get("/:event_id/questions", questions::list::<G>)
		.post("/:event_id/questions", questions::create::<G>)
		.get("/:event_id/questions/ranked", questions::ranked::<G>)
		.build()
		.expect("failed to build v1 router")
}
