//! Tests for the sync engine

use super::*;
use crate::auth::Authenticator;
use crate::http::HttpClientConfig;
use crate::resources;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_engine(base_url: &str) -> SyncEngine {
    let config = HttpClientConfig::builder()
        .base_url(base_url)
        .no_rate_limit()
        .max_retries(0)
        .build();
    let client = HttpClient::with_auth(config, Authenticator::bearer("tly-secret")).unwrap();
    SyncEngine::new(client)
}

fn org_partitions(ids: &[&str]) -> Vec<Partition> {
    ids.iter()
        .map(|id| Partition::new(*id).with_string("organizationId", *id))
        .collect()
}

fn record_count(messages: &[Message]) -> usize {
    messages.iter().filter(|m| m.is_record()).count()
}

async fn sync_collect(
    engine: &mut SyncEngine,
    resources: &[&'static Resource],
    organizations: &[Partition],
) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    engine
        .sync(resources, organizations, &mut |m| {
            messages.push(m);
            Ok(())
        })
        .await?;
    Ok(messages)
}

async fn sync_resource_collect(
    engine: &mut SyncEngine,
    resource: &'static Resource,
    organizations: &[Partition],
) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    engine
        .sync_resource(resource, organizations, &mut |m| {
            messages.push(m);
            Ok(())
        })
        .await?;
    Ok(messages)
}

/// Mount a one-page forms listing followed by the empty page that ends the
/// walk.
async fn mount_forms_pages(mock_server: &MockServer, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/forms"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forms"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_unpaginated_resource_makes_one_request_per_partition() {
    let mock_server = MockServer::start().await;

    for org in ["org-1", "org-2"] {
        Mock::given(method("GET"))
            .and(path(format!("/organizations/{org}/users")))
            .and(query_param_is_missing("page"))
            .and(query_param_is_missing("limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": format!("{org}-u1"), "organizationId": org },
                { "id": format!("{org}-u2"), "organizationId": org }
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let mut engine = test_engine(&mock_server.uri());
    let messages = sync_resource_collect(
        &mut engine,
        &resources::USERS,
        &org_partitions(&["org-1", "org-2"]),
    )
    .await
    .unwrap();

    assert_eq!(record_count(&messages), 4);
    assert_eq!(engine.stats().pages_fetched, 2);
    assert_eq!(engine.stats().partitions_synced, 2);
}

#[tokio::test]
async fn test_schema_message_precedes_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "u1" }])))
        .mount(&mock_server)
        .await;

    let mut engine = test_engine(&mock_server.uri());
    let messages = sync_resource_collect(&mut engine, &resources::USERS, &org_partitions(&["org-1"]))
        .await
        .unwrap();

    let schema_pos = messages.iter().position(Message::is_schema).unwrap();
    let first_record_pos = messages.iter().position(Message::is_record).unwrap();
    assert!(schema_pos < first_record_pos);

    let line = messages[schema_pos].to_json_line().unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["type"], "SCHEMA");
    assert_eq!(value["stream"], "users");
    assert_eq!(value["key_properties"], json!(["id"]));
    assert_eq!(value["schema"]["properties"]["email"]["format"], "email");
}

#[tokio::test]
async fn test_paginated_walk_stops_at_empty_page() {
    let mock_server = MockServer::start().await;

    // First page carries no page param, later pages do.
    Mock::given(method("GET"))
        .and(path("/forms"))
        .and(query_param("limit", "500"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "f1" }, { "id": "f2" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forms"))
        .and(query_param("limit", "500"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "f3" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forms"))
        .and(query_param("limit", "500"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut engine = test_engine(&mock_server.uri());
    let messages = sync_resource_collect(&mut engine, &resources::FORMS, &org_partitions(&["org-1"]))
        .await
        .unwrap();

    assert_eq!(record_count(&messages), 3);
    assert_eq!(engine.stats().pages_fetched, 3);
}

#[tokio::test]
async fn test_static_params_sent_on_every_page() {
    let mock_server = MockServer::start().await;

    mount_forms_pages(&mock_server, json!([{ "id": "f1" }])).await;

    Mock::given(method("GET"))
        .and(path("/forms/f1/submissions"))
        .and(query_param("filter", "all"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "submissions": [{ "id": "s1" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forms/f1/submissions"))
        .and(query_param("filter", "all"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "submissions": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut engine = test_engine(&mock_server.uri());
    let messages = sync_collect(
        &mut engine,
        &[&resources::FORMS, &resources::SUBMISSIONS],
        &org_partitions(&["org-1"]),
    )
    .await
    .unwrap();

    let submission_records: Vec<_> = messages
        .iter()
        .filter(|m| matches!(m, Message::Record { stream, .. } if stream == "submissions"))
        .collect();
    assert_eq!(submission_records.len(), 1);
}

#[tokio::test]
async fn test_parent_fan_out_in_parent_order() {
    let mock_server = MockServer::start().await;

    mount_forms_pages(&mock_server, json!([{ "id": "f2" }, { "id": "f1" }])).await;

    for form in ["f2", "f1"] {
        Mock::given(method("GET"))
            .and(path(format!("/forms/{form}/questions")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "questions": [{ "id": format!("{form}-q1") }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let mut engine = test_engine(&mock_server.uri());
    let messages = sync_collect(
        &mut engine,
        &[&resources::FORMS, &resources::QUESTIONS],
        &org_partitions(&["org-1"]),
    )
    .await
    .unwrap();

    let question_ids: Vec<&str> = messages
        .iter()
        .filter_map(|m| match m {
            Message::Record { stream, record } if stream == "questions" => {
                record["id"].as_str()
            }
            _ => None,
        })
        .collect();
    assert_eq!(question_ids, vec!["f2-q1", "f1-q1"]);
}

#[tokio::test]
async fn test_child_without_parent_in_selection_still_fans_out() {
    let mock_server = MockServer::start().await;

    mount_forms_pages(&mock_server, json!([{ "id": "f1" }])).await;

    Mock::given(method("GET"))
        .and(path("/forms/f1/questions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "questions": [{ "id": "q1" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut engine = test_engine(&mock_server.uri());
    let messages = sync_collect(
        &mut engine,
        &[&resources::QUESTIONS],
        &org_partitions(&["org-1"]),
    )
    .await
    .unwrap();

    // Form records feed the fan-out but are not emitted.
    assert!(!messages
        .iter()
        .any(|m| matches!(m, Message::Record { stream, .. } if stream == "forms")));
    assert_eq!(record_count(&messages), 1);
}

#[tokio::test]
async fn test_partition_key_injected_into_child_records() {
    let mock_server = MockServer::start().await;

    mount_forms_pages(&mock_server, json!([{ "id": "f1" }])).await;

    Mock::given(method("GET"))
        .and(path("/forms/f1/questions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "questions": [{ "id": "q1" }]
        })))
        .mount(&mock_server)
        .await;

    let mut engine = test_engine(&mock_server.uri());
    let messages = sync_collect(
        &mut engine,
        &[&resources::QUESTIONS],
        &org_partitions(&["org-1"]),
    )
    .await
    .unwrap();

    let record = messages
        .iter()
        .find_map(|m| match m {
            Message::Record { record, .. } => Some(record),
            _ => None,
        })
        .unwrap();
    assert_eq!(record["formId"], "f1");
}

#[tokio::test]
async fn test_fetch_error_names_resource_partition_and_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/users"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let mut engine = test_engine(&mock_server.uri());
    let err = sync_resource_collect(&mut engine, &resources::USERS, &org_partitions(&["org-1"]))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("users"));
    assert!(message.contains("org-1"));
    assert!(message.contains("404"));
}

#[tokio::test]
async fn test_records_already_emitted_survive_a_later_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "u1" }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/invites"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let mut engine = test_engine(&mock_server.uri());
    let mut messages = Vec::new();
    let err = engine
        .sync(
            &[&resources::USERS, &resources::INVITES],
            &org_partitions(&["org-1"]),
            &mut |m| {
                messages.push(m);
                Ok(())
            },
        )
        .await
        .unwrap_err();

    // The users record reached the sink before invites failed.
    assert_eq!(record_count(&messages), 1);
    assert!(messages
        .iter()
        .any(|m| matches!(m, Message::Record { stream, .. } if stream == "users")));
    assert!(err.to_string().contains("invites"));
}

#[tokio::test]
async fn test_partition_errors_collected_without_fail_fast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/users"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-2/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "u1" }])))
        .mount(&mock_server)
        .await;

    let mut engine =
        test_engine(&mock_server.uri()).with_config(SyncConfig::new().with_fail_fast(false));
    let messages = sync_resource_collect(
        &mut engine,
        &resources::USERS,
        &org_partitions(&["org-1", "org-2"]),
    )
    .await
    .unwrap();

    assert_eq!(record_count(&messages), 1);
    assert_eq!(engine.stats().errors, 1);
    assert_eq!(engine.stats().partitions_synced, 1);
}

#[tokio::test]
async fn test_no_organizations_is_fatal_for_scoped_resource() {
    let mut engine = test_engine("http://127.0.0.1:1");
    let err = sync_resource_collect(&mut engine, &resources::USERS, &[])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("users"));
}

#[tokio::test]
async fn test_max_records_truncates_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "w1" }, { "id": "w2" }, { "id": "w3" }]
        })))
        .mount(&mock_server)
        .await;

    let mut engine =
        test_engine(&mock_server.uri()).with_config(SyncConfig::new().with_max_records(2));
    let messages = sync_resource_collect(&mut engine, &resources::WORKSPACES, &[])
        .await
        .unwrap();

    assert_eq!(record_count(&messages), 2);
}

#[tokio::test]
async fn test_max_records_caps_across_partitions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "u1" }, { "id": "u2" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Budget is spent on the first partition; the second is never fetched.
    Mock::given(method("GET"))
        .and(path("/organizations/org-2/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "u3" }, { "id": "u4" }
        ])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut engine =
        test_engine(&mock_server.uri()).with_config(SyncConfig::new().with_max_records(1));
    let messages = sync_resource_collect(
        &mut engine,
        &resources::USERS,
        &org_partitions(&["org-1", "org-2"]),
    )
    .await
    .unwrap();

    assert_eq!(record_count(&messages), 1);
}

#[test]
fn test_record_message_json_line() {
    let message = Message::record("forms", json!({ "id": "f1", "name": "Survey" }));
    let line = message.to_json_line().unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();

    assert_eq!(value["type"], "RECORD");
    assert_eq!(value["stream"], "forms");
    assert_eq!(value["record"]["id"], "f1");
}
