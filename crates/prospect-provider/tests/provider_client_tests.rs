use mockito::Matcher;
use prospect_core::config::{GatewayConfig, ProviderConfig};
use prospect_core::error::RouterError;
use prospect_core::types::{CompanySearch, Intent, JobSearch, SearchRequest};
use prospect_provider::{GatewayClient, ProviderClient, SearchBackend};

fn provider_config(base: &str) -> ProviderConfig {
    ProviderConfig {
        api_key: "test-key".into(),
        company_url: format!("{}/linkedin/search/company", base),
        person_url: format!("{}/linkedin/search/person", base),
        job_url: format!("{}/linkedin/company/job", base),
        timeout_secs: 5,
    }
}

fn berlin_companies() -> SearchRequest {
    SearchRequest::Company(CompanySearch {
        country: Some("DE".into()),
        city: Some("Berlin".into()),
        ..Default::default()
    })
}

#[tokio::test]
async fn company_search_sends_bearer_token_and_declared_params() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"{"results":[{"linkedin_profile_url":"https://www.linkedin.com/company/acme"}],"next_page":null}"#;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/linkedin/search/company".into()))
        .match_header("authorization", "Bearer test-key")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("country".into(), "DE".into()),
            Matcher::UrlEncoded("city".into(), "Berlin".into()),
            Matcher::UrlEncoded("page_size".into(), "10".into()),
            Matcher::UrlEncoded("enrich_profiles".into(), "skip".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = ProviderClient::new(&provider_config(&server.url())).unwrap();
    let result = client.search(&berlin_companies()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.bytes, body.as_bytes());
    assert_eq!(result.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn job_search_hits_job_endpoint_with_defaults() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/linkedin/company/job".into()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("keyword".into(), "data scientist".into()),
            Matcher::UrlEncoded("job_type".into(), "anything".into()),
            Matcher::UrlEncoded("experience_level".into(), "anything".into()),
            Matcher::UrlEncoded("flexibility".into(), "anything".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"job":[]}"#)
        .create_async()
        .await;

    let client = ProviderClient::new(&provider_config(&server.url())).unwrap();
    let request = SearchRequest::Job(JobSearch {
        keyword: Some("data scientist".into()),
        ..Default::default()
    });
    let result = client.search(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.json().unwrap(), serde_json::json!({"job": []}));
}

#[tokio::test]
async fn non_success_status_surfaces_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/linkedin/search/person".into()))
        .with_status(401)
        .with_body(r#"{"code":401,"description":"Invalid API key"}"#)
        .create_async()
        .await;

    let client = ProviderClient::new(&provider_config(&server.url())).unwrap();
    let err = client
        .search(&SearchRequest::empty(Intent::Person))
        .await
        .unwrap_err();

    match err {
        RouterError::ProviderRequestFailed { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected ProviderRequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_failure_is_provider_unreachable() {
    // Port 9 (discard) on localhost has no listener in test environments.
    let client = ProviderClient::new(&provider_config("http://127.0.0.1:9")).unwrap();
    let err = client
        .search(&SearchRequest::empty(Intent::Job))
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::ProviderUnreachable(_)));
}

#[tokio::test]
async fn gateway_client_uses_intent_path_without_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/search/company".into()))
        .match_header("authorization", Matcher::Missing)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("country".into(), "DE".into()),
            Matcher::UrlEncoded("city".into(), "Berlin".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"results":[]}"#)
        .create_async()
        .await;

    let config = GatewayConfig {
        base_url: format!("{}/", server.url()),
        timeout_secs: 5,
    };
    let client = GatewayClient::new(&config).unwrap();
    let result = client.search(&berlin_companies()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.bytes, br#"{"results":[]}"#);
}

#[tokio::test]
async fn gateway_error_status_is_relayed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/search/job".into()))
        .with_status(503)
        .with_body("upstream down")
        .create_async()
        .await;

    let config = GatewayConfig {
        base_url: server.url(),
        timeout_secs: 5,
    };
    let client = GatewayClient::new(&config).unwrap();
    let err = client
        .search(&SearchRequest::empty(Intent::Job))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RouterError::ProviderRequestFailed { status: 503, ref body } if body == "upstream down"
    ));
}

#[tokio::test]
async fn gateway_envelope_is_unwrapped_to_provider_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/search/person".into()))
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error":{"code":"provider_request_failed","message":"provider request failed with status 403","data":{"status":403,"body":"{\"description\":\"Not enough credits\"}"}}}"#,
        )
        .create_async()
        .await;

    let config = GatewayConfig {
        base_url: server.url(),
        timeout_secs: 5,
    };
    let client = GatewayClient::new(&config).unwrap();
    let err = client
        .search(&SearchRequest::empty(Intent::Person))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RouterError::ProviderRequestFailed { status: 403, ref body }
            if body == r#"{"description":"Not enough credits"}"#
    ));
}
