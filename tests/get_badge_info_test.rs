use anyhow::Result;
use badger::config::toml_config::{Credentials, YurplanConfig};
use badger::domain::model::{Corrections, Exceptions, TypeIds};
use badger::{BadgeRecord, BadgeType, BadgerError, YurplanClient};
use httpmock::prelude::*;
use std::collections::HashMap;

fn client_for(server: &MockServer) -> Result<YurplanClient> {
    Ok(YurplanClient::new(YurplanConfig {
        endpoint: server.base_url(),
        event_id: "6343".to_string(),
        timeout_seconds: Some(5),
        credentials: Credentials {
            api_key: "key-1".to_string(),
            email: "orga@example.com".to_string(),
            password: "hunter2".to_string(),
        },
    })?)
}

fn type_ids() -> TypeIds {
    TypeIds {
        attendee: "6343".to_string(),
        speaker: "12310".to_string(),
        sponsor: "12322".to_string(),
        staff: "12309".to_string(),
    }
}

/// Mocks login plus a ticket list for event 6343.
fn mock_event(server: &MockServer, tickets: serde_json::Value) {
    server.mock(|when, then| {
        when.method(POST).path("/auth").query_param("key", "key-1");
        then.status(200)
            .json_body(serde_json::json!({"data": {"token": "session-1"}}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/events/6343/tickets")
            .query_param("key", "key-1")
            .query_param("token", "session-1");
        then.status(200)
            .json_body(serde_json::json!({"data": {"tickets": tickets}}));
    });
}

async fn badge_info(
    tickets: serde_json::Value,
    exceptions: Exceptions,
    corrections: Corrections,
) -> Result<Vec<BadgeRecord>> {
    let server = MockServer::start();
    mock_event(&server, tickets);

    let mut client = client_for(&server)?;
    client.authenticate().await?;
    Ok(client
        .get_badge_info(&type_ids(), &exceptions, &corrections)
        .await?)
}

#[tokio::test]
async fn test_matching_ticket_becomes_attendee() -> Result<()> {
    let records = badge_info(
        serde_json::json!([{"token": "A", "type": {"id": "6343"}, "firstname": "Jo", "lastname": "X"}]),
        HashMap::new(),
        HashMap::new(),
    )
    .await?;

    assert_eq!(
        records,
        vec![BadgeRecord {
            firstname: "Jo".to_string(),
            lastname: "X".to_string(),
            token: "A".to_string(),
            badge_type: BadgeType::Attendee,
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_exception_forces_staff() -> Result<()> {
    let records = badge_info(
        serde_json::json!([{"token": "A", "type": {"id": "6343"}, "firstname": "Jo", "lastname": "X"}]),
        HashMap::from([("A".to_string(), Some(BadgeType::Staff))]),
        HashMap::new(),
    )
    .await?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].badge_type, BadgeType::Staff);
    Ok(())
}

#[tokio::test]
async fn test_unmatched_ticket_is_dropped() -> Result<()> {
    let records = badge_info(
        serde_json::json!([{"token": "A", "type": {"id": "1"}, "firstname": "Jo", "lastname": "X"}]),
        HashMap::new(),
        HashMap::new(),
    )
    .await?;

    assert!(records.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_correction_replaces_names() -> Result<()> {
    let records = badge_info(
        serde_json::json!([{"token": "A", "type": {"id": "6343"}, "firstname": "Jo", "lastname": "X"}]),
        HashMap::new(),
        HashMap::from([("A".to_string(), ("Joanna".to_string(), "Y".to_string()))]),
    )
    .await?;

    assert_eq!(records[0].firstname, "Joanna");
    assert_eq!(records[0].lastname, "Y");
    Ok(())
}

#[tokio::test]
async fn test_mixed_event_keeps_fetch_order() -> Result<()> {
    let records = badge_info(
        serde_json::json!([
            {"token": "S1", "type": {"id": 12310}, "firstname": "Sam", "lastname": "Speaker"},
            {"token": "Z9", "type": {"id": "777"}, "firstname": "Kid", "lastname": "Workshop"},
            {"token": "P1", "type": {"id": "12322"}, "firstname": "Pat", "lastname": "Sponsor"},
            {"token": "V1", "type": {"id": "777"}, "firstname": "Vic", "lastname": "Volunteer"},
            {"token": "T1", "type": {"id": "12309"}, "firstname": null}
        ]),
        HashMap::from([("V1".to_string(), None)]),
        HashMap::new(),
    )
    .await?;

    let summary: Vec<(&str, BadgeType)> = records
        .iter()
        .map(|r| (r.token.as_str(), r.badge_type))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("S1", BadgeType::Speaker),
            ("P1", BadgeType::Sponsor),
            ("V1", BadgeType::Attendee),
            ("T1", BadgeType::Staff),
        ]
    );
    assert_eq!(records[3].firstname, "");
    Ok(())
}

#[tokio::test]
async fn test_badge_info_without_login_is_unauthorized() -> Result<()> {
    let server = MockServer::start();
    let tickets_mock = server.mock(|when, then| {
        when.method(GET).path("/events/6343/tickets");
        then.status(200)
            .json_body(serde_json::json!({"data": {"tickets": []}}));
    });

    let client = client_for(&server)?;
    let result = client
        .get_badge_info(&type_ids(), &HashMap::new(), &HashMap::new())
        .await;

    assert!(matches!(result, Err(BadgerError::Unauthorized)));
    tickets_mock.assert_hits(0);
    Ok(())
}
