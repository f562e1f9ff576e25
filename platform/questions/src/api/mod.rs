use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::server::conn::Http;
use hyper::{Body, Request, Response, StatusCode};
use routerify::{RequestServiceBuilder, Router};
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use crate::config::ApiConfig;
use crate::global::QuestionsGlobal;

pub mod error;
pub mod middleware;
pub mod v1;

pub use error::ApiError;

async fn not_found(_: Request<Body>) -> error::Result<Response<Body>> {
	Ok(make_response!(
		StatusCode::NOT_FOUND,
		json!({ "message": "not found", "success": false })
	))
}

pub fn routes<G: QuestionsGlobal>(global: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		.err_handler_with_info(common::http::error_handler::<ApiError>)
		.middleware(middleware::cors_middleware(global))
		.scope("/v1", v1::routes(global))
		.any(not_found)
		.build()
		.expect("failed to build router")
}

pub async fn run<G: QuestionsGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = global.config::<ApiConfig>();
	tracing::info!("questions api listening on {}", config.bind_address);

	let socket = if config.bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.bind(config.bind_address)?;
	let listener = socket.listen(1024)?;

	// The router only holds a Weak to the global state, so keep-alive
	// connections do not keep it alive past shutdown.
	let request_service =
		RequestServiceBuilder::new(routes(&global)).map_err(|err| anyhow::anyhow!("failed to build request service: {err}"))?;

	loop {
		select! {
			_ = global.ctx().cancelled() => {
				return Ok(());
			},
			r = listener.accept() => {
				let (socket, addr) = r?;
				let service = request_service.build(addr);

				tracing::trace!("accepted connection from {}", addr);

				tokio::spawn(async move {
					if let Err(err) = Http::new().serve_connection(socket, service).await {
						tracing::debug!(error = %err, "connection closed with error");
					}
				});
			},
		}
	}
}
