use std::sync::Arc;

use common::http::RouteError;
use hyper::header::{self, HeaderValue};
use hyper::Body;
use routerify::Middleware;

use super::error::ApiError;
use crate::global::QuestionsGlobal;

pub fn cors_middleware<G: QuestionsGlobal>(_: &Arc<G>) -> Middleware<Body, RouteError<ApiError>> {
	Middleware::post(|mut resp| async move {
		let headers = resp.headers_mut();
		headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
		headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS"));
		headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
		headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));

		Ok(resp)
	})
}
