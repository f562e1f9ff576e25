use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use serde_json::json;

use crate::api::error::Result;

pub async fn health(_: Request<Body>) -> Result<Response<Body>> {
	Ok(make_response!(StatusCode::OK, json!({ "status": "ok" })))
}
