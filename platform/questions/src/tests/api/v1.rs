use hyper::StatusCode;

use super::{body_json, body_string, TestApi};
use crate::tests::question;

#[tokio::test]
async fn test_post_then_list() {
	let api = TestApi::new();

	let resp = api.post("/v1/evt1/questions", r#"{"comment":"hi"}"#).await;
	assert_eq!(resp.status(), StatusCode::CREATED);

	let created = body_json(resp).await;
	assert_eq!(created["comment"], "hi");
	assert_eq!(created["object"], "question");
	assert_eq!(created["username"], "anonymous");
	assert_eq!(created["event_id"], "evt1");
	assert_eq!(created["program_id"], "");
	assert_eq!(created["like"], 0);
	assert_eq!(created["created_at"], created["updated_at"]);
	assert!(created["created_at"].as_str().unwrap().ends_with("+09:00"));

	let resp = api.get("/v1/evt1/questions").await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(
		resp.headers().get(hyper::header::CONTENT_TYPE).unwrap(),
		"application/json"
	);

	let list = body_json(resp).await;
	assert_eq!(list["object"], "list");
	assert_eq!(list["type"], "question");
	assert_eq!(list["data"].as_array().unwrap().len(), 1);
	assert_eq!(list["data"][0]["comment"], "hi");
	assert_eq!(list["data"][0]["id"], created["id"]);
}

#[tokio::test]
async fn test_list_is_pretty_printed() {
	let api = TestApi::new();

	let body = body_string(api.get("/v1/evt1/questions").await).await;

	assert_eq!(body, "{\n  \"object\": \"list\",\n  \"type\": \"question\",\n  \"data\": []\n}");
}

#[tokio::test]
async fn test_post_program_id() {
	let api = TestApi::new();

	let resp = api
		.post("/v1/evt1/questions", r#"{"comment":"hi","program_id":"keynote"}"#)
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
	assert_eq!(body_json(resp).await["program_id"], "keynote");
	assert_eq!(api.records.rows()[0].program_id, "keynote");
}

#[tokio::test]
async fn test_post_invalid_body() {
	let api = TestApi::new();

	for body in ["", "not json", r#"{"program_id":"p"}"#, r#"{"comment":5}"#] {
		let resp = api.post("/v1/evt1/questions", body).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body:?}");
		assert_eq!(body_json(resp).await["success"], false);
	}

	assert!(api.records.rows().is_empty());
}

#[tokio::test]
async fn test_invalid_event_id() {
	let api = TestApi::new();

	let resp = api.get("/v1/bad.event/questions").await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	assert_eq!(
		body_json(resp).await,
		serde_json::json!({ "message": "invalid event id", "success": false })
	);

	let resp = api.post("/v1/bad%20event/questions", r#"{"comment":"hi"}"#).await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_unavailable() {
	let api = TestApi::new();

	api.records.fail_lists(true);
	let resp = api.get("/v1/evt1/questions").await;
	assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

	api.records.fail_inserts(true);
	let resp = api.post("/v1/evt1/questions", r#"{"comment":"hi"}"#).await;
	assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body_json(resp).await["success"], false);
}

#[tokio::test]
async fn test_list_survives_projection_outage() {
	let api = TestApi::new();
	api.records.push(question("evt1", "a", 0, 0));
	api.projection.fail_presence(true);

	let resp = api.get("/v1/evt1/questions").await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(body_json(resp).await["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ranked() {
	let api = TestApi::new();
	api.records.push(question("evt1", "low", 1, 0));
	api.records.push(question("evt1", "high", 5, 1));
	api.records.push(question("evt1", "newest", 0, 2));

	let resp = api.get("/v1/evt1/questions/ranked").await;
	assert_eq!(resp.status(), StatusCode::OK);
	let list = body_json(resp).await;
	assert_eq!(list["type"], "question");
	assert_eq!(list["data"][0]["comment"], "high");
	assert_eq!(list["data"].as_array().unwrap().len(), 3);

	let list = body_json(api.get("/v1/evt1/questions/ranked?by=created&limit=1").await).await;
	let data = list["data"].as_array().unwrap();
	assert_eq!(data.len(), 1);
	assert_eq!(data[0]["comment"], "newest");
}

#[tokio::test]
async fn test_ranked_invalid_query() {
	let api = TestApi::new();

	for uri in [
		"/v1/evt1/questions/ranked?by=votes",
		"/v1/evt1/questions/ranked?limit=ten",
		"/v1/evt1/questions/ranked?limit=-1",
	] {
		let resp = api.get(uri).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
	}

	assert_eq!(api.projection.presence_calls(), 0);
}
