//! Integration tests against a mock backend.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use automator_client::{CommitQuery, Error, McpClient};

async fn client_for(server: &MockServer) -> McpClient {
    McpClient::builder()
        .base_url(server.uri())
        .build()
        .expect("client builds")
}

#[tokio::test]
async fn jira_issue_uses_primary_path() {
    let server = MockServer::start().await;
    let payload = json!({
        "ticket": "ABC-123",
        "title": "Login bug",
        "status": "Open",
        "assignee": "alex"
    });

    Mock::given(method("GET"))
        .and(path("/jira/issue/ABC-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server).await.jira().issue("ABC-123").await.unwrap();
    assert_eq!(body, payload);
}

#[tokio::test]
async fn jira_issue_falls_back_to_legacy_path_on_404() {
    let server = MockServer::start().await;
    let payload = json!({ "ticket": "ABC-1", "title": "t", "status": "Open", "assignee": "" });

    Mock::given(method("GET"))
        .and(path("/jira/issue/ABC-1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not Found" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jira/ABC-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server).await.jira().issue("ABC-1").await.unwrap();
    assert_eq!(body, payload);
}

#[tokio::test]
async fn jira_issues_passes_status_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jira/issues/TP"))
        .and(query_param("status", "Open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server)
        .await
        .jira()
        .issues("TP", Some("Open"))
        .await
        .unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn github_commits_propagates_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/github/commits/octo/demo"))
        .and(query_param("limit", "5"))
        .and(query_param("branch", "main"))
        .and(query_param("since", "2024-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let query = CommitQuery {
        limit: Some(5),
        branch: Some("main".into()),
        since: Some("2024-01-01".into()),
        until: None,
    };
    client_for(&server)
        .await
        .github()
        .commits("octo", "demo", &query)
        .await
        .unwrap();
}

#[tokio::test]
async fn agent_call_sends_api_key_and_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/adk/agent"))
        .and(header("x-api-key", "sekrit"))
        .and(body_json(json!({
            "prompt": "list my repos",
            "session_id": "s-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [],
            "toolCalls": [{ "name": "github_get_repos", "args": {} }],
            "model_summary": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = McpClient::builder()
        .base_url(server.uri())
        .api_key("sekrit")
        .build()
        .unwrap();

    let body = client
        .agent()
        .call("list my repos", Some("s-1"), None)
        .await
        .unwrap();
    assert!(body.get("toolCalls").is_some());
}

#[tokio::test]
async fn ai_generate_posts_prompt_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ai/generate"))
        .and(body_json(json!({ "prompt": "say hi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "hi" })))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server).await.ai().generate("say hi").await.unwrap();
    assert_eq!(body["response"], "hi");
}

#[tokio::test]
async fn non_2xx_surfaces_nested_detail_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jira/projects"))
        .respond_with(
            ResponseTemplate::new(502)
                .set_body_json(json!({ "detail": "Jira credentials not configured" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).await.jira().projects().await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Jira credentials not configured");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_raw_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jira/projects"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.jira().projects().await.unwrap_err();
    assert!(err.to_string().contains("upstream exploded"));
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Port 9 (discard) is a safe bet for a refused connection.
    let client = McpClient::builder()
        .base_url("http://127.0.0.1:9")
        .build()
        .unwrap();

    let err = client.jira().projects().await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert!(!err.to_string().is_empty());
}
