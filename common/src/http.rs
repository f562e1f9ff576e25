use std::fmt::{Debug, Display};
use std::panic::Location;

use hyper::{Body, Response, StatusCode};
use routerify::RequestInfo;
use serde_json::json;

/// Builds a JSON response, `$body` is anything with a `to_string` that yields
/// the serialized document.
#[macro_export]
macro_rules! make_response {
	($status:expr, $body:expr) => {
		hyper::Response::builder()
			.status($status)
			.header(hyper::header::CONTENT_TYPE, "application/json")
			.body(hyper::Body::from($body.to_string()))
			.expect("failed to build response")
	};
}

/// Router error handler, logs the error inside the span it was raised in and
/// returns the response it carries.
pub async fn error_handler<E: std::error::Error + 'static>(
	err: Box<dyn std::error::Error + Send + Sync + 'static>,
	info: RequestInfo,
) -> Response<Body> {
	match err.downcast::<RouteError<E>>() {
		Ok(err) => {
			let location = err.location();

			err.span().in_scope(|| match err.should_log() {
				ShouldLog::Yes => {
					tracing::error!(path = %info.uri(), method = %info.method(), location = %location, error = ?err, "http error")
				}
				ShouldLog::Debug => {
					tracing::debug!(path = %info.uri(), method = %info.method(), location = %location, error = ?err, "http error")
				}
				ShouldLog::No => (),
			});

			err.response()
		}
		Err(err) => {
			tracing::error!(path = %info.uri(), method = %info.method(), error = ?err, "unhandled http error");
			make_response!(
				StatusCode::INTERNAL_SERVER_ERROR,
				json!({ "message": "internal server error", "success": false })
			)
		}
	}
}

/// An error returned from a route handler. It already carries the response
/// the client will see, plus the optional source error for the logs.
pub struct RouteError<E> {
	source: Option<E>,
	location: &'static Location<'static>,
	span: tracing::Span,
	response: Response<Body>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShouldLog {
	Yes,
	Debug,
	No,
}

impl<E> RouteError<E> {
	pub fn span(&self) -> &tracing::Span {
		&self.span
	}

	pub fn location(&self) -> &'static Location<'static> {
		self.location
	}

	pub fn status(&self) -> StatusCode {
		self.response.status()
	}

	pub fn source_error(&self) -> Option<&E> {
		self.source.as_ref()
	}

	pub fn response(self) -> Response<Body> {
		self.response
	}

	pub fn should_log(&self) -> ShouldLog {
		if self.response.status().is_server_error() {
			ShouldLog::Yes
		} else if self.source.is_some() {
			ShouldLog::Debug
		} else {
			ShouldLog::No
		}
	}

	pub fn with_source(mut self, source: Option<E>) -> Self {
		self.source = source;
		self
	}

	pub fn with_location(mut self, location: &'static Location<'static>) -> Self {
		self.location = location;
		self
	}

	#[track_caller]
	fn new(source: Option<E>, response: Response<Body>) -> Self {
		Self {
			source,
			location: Location::caller(),
			span: tracing::Span::current(),
			response,
		}
	}
}

fn message_body(message: &str) -> serde_json::Value {
	json!({ "message": message, "success": false })
}

impl<E> From<Response<Body>> for RouteError<E> {
	#[track_caller]
	fn from(res: Response<Body>) -> Self {
		Self::new(None, res)
	}
}

impl<E, S: AsRef<str>> From<(StatusCode, S)> for RouteError<E> {
	#[track_caller]
	fn from((status, message): (StatusCode, S)) -> Self {
		Self::new(None, make_response!(status, message_body(message.as_ref())))
	}
}

impl<E, S: AsRef<str>, T: Into<E>> From<(StatusCode, S, T)> for RouteError<E> {
	#[track_caller]
	fn from((status, message, source): (StatusCode, S, T)) -> Self {
		Self::new(Some(source.into()), make_response!(status, message_body(message.as_ref())))
	}
}

impl<E> From<&'_ str> for RouteError<E> {
	#[track_caller]
	fn from(message: &'_ str) -> Self {
		Self::new(None, make_response!(StatusCode::INTERNAL_SERVER_ERROR, message_body(message)))
	}
}

impl<E: Debug> Debug for RouteError<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.source {
			Some(err) => write!(f, "RouteError({}): {:?}", self.response.status(), err),
			None => write!(f, "RouteError({})", self.response.status()),
		}
	}
}

impl<E: Display> Display for RouteError<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.source {
			Some(err) => write!(f, "{}: {}", self.response.status(), err),
			None => write!(f, "{}", self.response.status()),
		}
	}
}

impl<E: std::error::Error + 'static> std::error::Error for RouteError<E> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source.as_ref().map(|err| err as &(dyn std::error::Error + 'static))
	}
}

pub mod ext {
	use std::panic::Location;
	use std::sync::{Arc, Weak};

	use hyper::StatusCode;

	use super::RouteError;

	pub trait ResultExt<T, E, E2>: Sized {
		/// Replaces the error with the response built from `ctx`, keeping the
		/// original error as the source.
		fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E2>>
		where
			RouteError<E2>: From<C>,
			E2: From<E>;

		/// Like [`ResultExt::map_err_route`] but drops the original error.
		fn map_ignore_err_route<C>(self, ctx: C) -> Result<T, RouteError<E2>>
		where
			RouteError<E2>: From<C>;
	}

	impl<T, E, E2> ResultExt<T, E, E2> for Result<T, E> {
		#[track_caller]
		fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E2>>
		where
			RouteError<E2>: From<C>,
			E2: From<E>,
		{
			match self {
				Ok(val) => Ok(val),
				Err(err) => Err(RouteError::from(ctx)
					.with_source(Some(err.into()))
					.with_location(Location::caller())),
			}
		}

		#[track_caller]
		fn map_ignore_err_route<C>(self, ctx: C) -> Result<T, RouteError<E2>>
		where
			RouteError<E2>: From<C>,
		{
			match self {
				Ok(val) => Ok(val),
				Err(_) => Err(RouteError::from(ctx).with_location(Location::caller())),
			}
		}
	}

	pub trait OptionExt<T, E>: Sized {
		fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E>>
		where
			RouteError<E>: From<C>;
	}

	impl<T, E> OptionExt<T, E> for Option<T> {
		#[track_caller]
		fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E>>
		where
			RouteError<E>: From<C>,
		{
			match self {
				Some(val) => Ok(val),
				None => Err(RouteError::from(ctx).with_location(Location::caller())),
			}
		}
	}

	/// Handlers only see a `Weak` to the global state so open keep-alive
	/// connections cannot hold the process up during shutdown.
	pub trait RequestGlobalExt<E> {
		fn get_global<G: Sync + Send + 'static>(&self) -> Result<Arc<G>, RouteError<E>>;
	}

	impl<E> RequestGlobalExt<E> for hyper::Request<hyper::Body> {
		#[track_caller]
		fn get_global<G: Sync + Send + 'static>(&self) -> Result<Arc<G>, RouteError<E>> {
			use routerify::ext::RequestExt;

			Ok(self
				.data::<Weak<G>>()
				.expect("global state not set")
				.upgrade()
				.ok_or((StatusCode::SERVICE_UNAVAILABLE, "shutting down"))?)
		}
	}
}
