use anyhow::Result;
use pr_conventions::checks::{
    check_linked_issues, compile_rules, default_label_rules, sync_labels, LinkedIssueRules,
};
use pr_conventions::data::OutcomeStatus;
use pr_conventions::github::{
    GitHubApi, GitHubError, HttpGitHubClient, IssueState, PullRequestRef,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pr() -> PullRequestRef {
    PullRequestRef::new("juspay", "hyperswitch", 42)
}

fn client(server: &MockServer) -> HttpGitHubClient {
    HttpGitHubClient::new("t0ken".to_string(), &server.uri(), None).unwrap()
}

fn closing_issues(total: u64, nodes: serde_json::Value, next: Option<&str>) -> serde_json::Value {
    json!({
        "data": {
            "repository": {
                "pullRequest": {
                    "closingIssuesReferences": {
                        "totalCount": total,
                        "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next },
                        "nodes": nodes
                    }
                }
            }
        }
    })
}

fn issue_node(number: u64, state: &str) -> serde_json::Value {
    json!({
        "number": number,
        "state": state,
        "title": format!("Issue {number}"),
        "repository": { "nameWithOwner": "juspay/hyperswitch" }
    })
}

#[tokio::test]
async fn graphql_request_carries_headers_and_variables() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer t0ken"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        .and(body_partial_json(json!({
            "variables": { "owner": "juspay", "repo": "hyperswitch", "number": 42, "first": 25 }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(closing_issues(
                2,
                json!([issue_node(7, "OPEN"), null]),
                None,
            )),
        )
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server).closing_issues_page(&pr(), 25, None).await?;
    assert_eq!(page.total_count, 2);
    assert_eq!(page.issues.len(), 1);
    assert_eq!(page.issues[0].state, IssueState::Open);
    assert!(!page.has_next_page);
    Ok(())
}

#[tokio::test]
async fn linked_issue_check_follows_pages() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "after": null } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(closing_issues(
            2,
            json!([issue_node(1, "OPEN")]),
            Some("MQ"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "after": "MQ" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(closing_issues(
            2,
            json!([issue_node(2, "CLOSED")]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = check_linked_issues(
        &client(&server),
        &pr(),
        &LinkedIssueRules::default(),
        None,
        None,
    )
    .await?;

    assert_eq!(outcome.status, OutcomeStatus::Failed);
    assert_eq!(
        outcome.findings[0].message,
        "linked issue juspay/hyperswitch#2 is closed: Issue 2"
    );
    Ok(())
}

#[tokio::test]
async fn graphql_errors_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [
                { "message": "Could not resolve to a Repository" },
                { "message": "rate limited" }
            ]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .closing_issues_page(&pr(), 25, None)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "GitHub GraphQL query failed: Could not resolve to a Repository; rate limited"
    );
}

#[tokio::test]
async fn error_status_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/juspay/hyperswitch/issues/42/labels"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&server)
        .await;

    let err = client(&server).issue_labels(&pr()).await.unwrap_err();
    match err.downcast_ref::<GitHubError>() {
        Some(GitHubError::ApiRequestFailed { status, body }) => {
            assert_eq!(*status, 401);
            assert_eq!(body, "Bad credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn files_are_paged() -> Result<()> {
    let server = MockServer::start().await;
    let first_page: Vec<serde_json::Value> = (0..100)
        .map(|i| json!({ "filename": format!("crates/router/src/{i}.rs"), "status": "modified" }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/repos/juspay/hyperswitch/pulls/42/files"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/juspay/hyperswitch/pulls/42/files"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "filename": "migrations/2024/up.sql",
                "status": "renamed",
                "previous_filename": "migrations/old/up.sql"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let files = pr_conventions::checks::list_changed_files(&client(&server), &pr()).await?;
    assert_eq!(files.len(), 101);
    assert_eq!(
        files[100].previous_filename.as_deref(),
        Some("migrations/old/up.sql")
    );
    Ok(())
}

#[tokio::test]
async fn label_sync_adds_and_removes() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/juspay/hyperswitch/pulls/42/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "filename": "migrations/2024/up.sql", "status": "added" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/juspay/hyperswitch/issues/42/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "M-api-contract-changes" },
            { "name": "A-core" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/juspay/hyperswitch/issues/42/labels"))
        .and(body_json(json!({ "labels": ["M-database-changes"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(
            "/repos/juspay/hyperswitch/issues/42/labels/M-api-contract-changes",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let rules = compile_rules(&default_label_rules())?;
    let outcome = sync_labels(&client(&server), &pr(), &rules, None, false).await?;

    assert_eq!(outcome.status, OutcomeStatus::Passed);
    assert_eq!(outcome.findings.len(), 2);
    Ok(())
}

#[tokio::test]
async fn removing_absent_label_succeeds() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/juspay/hyperswitch/issues/42/labels/A%20core"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Label does not exist" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client(&server).remove_label(&pr(), "A core").await?;
    Ok(())
}

#[tokio::test]
async fn dry_run_sends_no_mutations() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/juspay/hyperswitch/pulls/42/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "filename": "api-reference/openapi_spec.json", "status": "modified" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let rules = compile_rules(&default_label_rules())?;
    let outcome = sync_labels(&client(&server), &pr(), &rules, Some(Vec::new()), true).await?;
    assert_eq!(
        outcome.findings[0].message,
        "would add label `M-api-contract-changes`"
    );
    Ok(())
}

#[tokio::test]
async fn labels_are_paged() -> Result<()> {
    let server = MockServer::start().await;
    let first_page: Vec<serde_json::Value> = (0..100)
        .map(|i| json!({ "name": format!("area-{i}") }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/repos/juspay/hyperswitch/issues/42/labels"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/juspay/hyperswitch/issues/42/labels"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "name": "M-database-changes" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let labels = client(&server).issue_labels(&pr()).await?;
    assert_eq!(labels.len(), 101);
    assert_eq!(labels[100], "M-database-changes");
    Ok(())
}

#[tokio::test]
async fn pull_request_title_is_fetched() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/juspay/hyperswitch/pulls/42"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 42,
            "title": "feat(router): add refunds",
            "state": "open"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let title = client(&server).pull_request_title(&pr()).await?;
    assert_eq!(title, "feat(router): add refunds");
    Ok(())
}

#[tokio::test]
async fn unreadable_linked_issue_fails_the_check() -> Result<()> {
    let server = MockServer::start().await;
    let mut body = closing_issues(1, json!([null]), None);
    body["errors"] = json!([{
        "type": "FORBIDDEN",
        "path": ["repository", "pullRequest", "closingIssuesReferences", "nodes", 0],
        "message": "Resource not accessible by integration"
    }]);
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let outcome = check_linked_issues(
        &client(&server),
        &pr(),
        &LinkedIssueRules::default(),
        None,
        None,
    )
    .await?;

    assert_eq!(outcome.status, OutcomeStatus::Failed);
    assert_eq!(outcome.findings[0].rule, "visibility");
    Ok(())
}
