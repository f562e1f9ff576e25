use common::http::RouteError;
use hyper::StatusCode;

use crate::projection::ProjectionError;
use crate::service::QuestionError;
use crate::store::RecordStoreError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("failed to read http body: {0}")]
	ReadBody(#[from] hyper::Error),
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
	#[error(transparent)]
	Question(#[from] QuestionError),
}

impl From<QuestionError> for RouteError<ApiError> {
	#[track_caller]
	fn from(err: QuestionError) -> Self {
		let (status, message) = match &err {
			QuestionError::InvalidEventId(_) => (StatusCode::BAD_REQUEST, "invalid event id"),
			QuestionError::Records(RecordStoreError::Connection(_))
			| QuestionError::Projection(ProjectionError::Connection(_)) => {
				(StatusCode::SERVICE_UNAVAILABLE, "storage unavailable")
			}
			QuestionError::Records(_) => (StatusCode::INTERNAL_SERVER_ERROR, "failed to query questions"),
			QuestionError::Projection(_) => (StatusCode::INTERNAL_SERVER_ERROR, "failed to read question projection"),
		};

		RouteError::from((status, message, err))
	}
}
