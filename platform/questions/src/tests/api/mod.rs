use std::net::SocketAddr;
use std::sync::Arc;

use common::global::{GlobalConfig, GlobalConfigProvider, GlobalCtx};
use hyper::service::Service;
use hyper::{Body, Method, Request, Response, StatusCode};
use routerify::RequestServiceBuilder;
use tokio_util::sync::CancellationToken;

use super::memory::{MemoryProjectionStore, MemoryQuestionStore};
use super::questions_config;
use crate::api::routes;
use crate::config::ApiConfig;
use crate::global::QuestionsState;
use crate::service::QuestionService;

mod v1;

struct TestGlobal {
	ctx: CancellationToken,
	config: ApiConfig,
	questions: QuestionService,
}

impl GlobalCtx for TestGlobal {
	fn ctx(&self) -> &CancellationToken {
		&self.ctx
	}
}

impl GlobalConfig for TestGlobal {}

impl GlobalConfigProvider<ApiConfig> for TestGlobal {
	fn provide_config(&self) -> &ApiConfig {
		&self.config
	}
}

impl QuestionsState for TestGlobal {
	fn questions(&self) -> &QuestionService {
		&self.questions
	}
}

struct TestApi {
	global: Arc<TestGlobal>,
	records: Arc<MemoryQuestionStore>,
	projection: Arc<MemoryProjectionStore>,
}

impl TestApi {
	fn new() -> Self {
		let records = Arc::new(MemoryQuestionStore::default());
		let projection = Arc::new(MemoryProjectionStore::default());

		let global = Arc::new(TestGlobal {
			ctx: CancellationToken::new(),
			config: ApiConfig {
				bind_address: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
			},
			questions: QuestionService::new(records.clone(), projection.clone(), &questions_config()),
		});

		Self {
			global,
			records,
			projection,
		}
	}

	async fn send(&self, method: Method, uri: &str, body: Body) -> Response<Body> {
		let mut service = RequestServiceBuilder::new(routes(&self.global))
			.expect("failed to build request service")
			.build("127.0.0.1:40000".parse::<SocketAddr>().unwrap());

		let req = Request::builder().method(method).uri(uri).body(body).unwrap();

		service.call(req).await.expect("request failed")
	}

	async fn get(&self, uri: &str) -> Response<Body> {
		self.send(Method::GET, uri, Body::empty()).await
	}

	async fn post(&self, uri: &str, body: &str) -> Response<Body> {
		self.send(Method::POST, uri, Body::from(body.to_string())).await
	}
}

async fn body_string(resp: Response<Body>) -> String {
	let bytes = hyper::body::to_bytes(resp.into_body()).await.expect("failed to read body");
	String::from_utf8(bytes.to_vec()).expect("body is not utf8")
}

async fn body_json(resp: Response<Body>) -> serde_json::Value {
	serde_json::from_str(&body_string(resp).await).expect("body is not json")
}

#[tokio::test]
async fn test_not_found() {
	let api = TestApi::new();

	let resp = api.get("/v2/nothing/here").await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	assert_eq!(
		body_json(resp).await,
		serde_json::json!({ "message": "not found", "success": false })
	);
}

#[tokio::test]
async fn test_cors_headers() {
	let api = TestApi::new();

	let resp = api.get("/v1/health").await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(
		resp.headers()
			.get(hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN)
			.and_then(|v| v.to_str().ok()),
		Some("*")
	);
	assert_eq!(body_json(resp).await, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_global_dropped() {
	let api = TestApi::new();

	let mut service = RequestServiceBuilder::new(routes(&api.global))
		.expect("failed to build request service")
		.build("127.0.0.1:40000".parse::<SocketAddr>().unwrap());

	drop(api);

	let req = Request::builder().uri("/v1/evt1/questions").body(Body::empty()).unwrap();
	let resp = service.call(req).await.expect("request failed");

	assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
