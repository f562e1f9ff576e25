use common::http::ext::{OptionExt, RequestGlobalExt, ResultExt};
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::ext::RequestExt;
use serde::Serialize;

use crate::api::error::Result;
use crate::database::NewQuestion;
use crate::global::QuestionsGlobal;
use crate::projection::Ranking;
use crate::service::DEFAULT_RANK_LIMIT;

/// Pretty printed with two space indentation.
fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>> {
	let body = serde_json::to_string_pretty(value)
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to serialize response"))?;

	Ok(make_response!(status, body))
}

fn event_id(req: &Request<Body>) -> Result<String> {
	Ok(req
		.param("event_id")
		.map_err_route((StatusCode::BAD_REQUEST, "missing event id"))?
		.clone())
}

pub async fn list<G: QuestionsGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let event_id = event_id(&req)?;

	let list = global.questions().list_questions(&event_id).await?;

	json_response(StatusCode::OK, &list)
}

pub async fn create<G: QuestionsGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let event_id = event_id(&req)?;

	let body = hyper::body::to_bytes(req.into_body())
		.await
		.map_err_route((StatusCode::BAD_REQUEST, "failed to read request body"))?;

	let new = serde_json::from_slice::<NewQuestion>(&body)
		.map_err_route((StatusCode::BAD_REQUEST, "invalid question, expected {\"comment\": string}"))?;

	let question = global.questions().create_question(&event_id, new).await?;

	json_response(StatusCode::CREATED, &question.display(global.questions().display_offset()))
}

pub async fn ranked<G: QuestionsGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let event_id = event_id(&req)?;

	let mut ranking = Ranking::default();
	let mut limit = DEFAULT_RANK_LIMIT;

	for (key, value) in url::form_urlencoded::parse(req.uri().query().unwrap_or_default().as_bytes()) {
		match key.as_ref() {
			"by" => {
				ranking = value
					.parse::<Ranking>()
					.map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid ranking, expected like or created"))?
			}
			"limit" => {
				limit = value
					.parse::<usize>()
					.map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid limit"))?
			}
			_ => {}
		}
	}

	let list = global.questions().rank_questions(&event_id, ranking, limit).await?;

	json_response(StatusCode::OK, &list)
}
