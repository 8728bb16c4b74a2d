//! Client for the Yurplan event-management API.
//!
//! The client authenticates once with the account credentials and keeps the
//! returned session token for every later call. There is no re-authentication:
//! a client whose login was rejected stays unauthenticated and every data call
//! fails with [`BadgerError::Unauthorized`].

use crate::config::toml_config::{Credentials, YurplanConfig};
use crate::domain::classify;
use crate::domain::model::{BadgeRecord, Corrections, Exceptions, Ticket, TypeIds};
use crate::utils::error::{BadgerError, Result};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://yurplan.com/api.php";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DETAIL_FILTER: &str = "scanv2";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct AuthData {
    token: String,
}

#[derive(Debug, Deserialize)]
struct TicketList {
    tickets: Vec<Ticket>,
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    email: &'a str,
    password: &'a str,
}

pub struct YurplanClient {
    client: Client,
    endpoint: String,
    event_id: String,
    credentials: Credentials,
    token: Option<String>,
}

impl YurplanClient {
    pub fn new(config: YurplanConfig) -> Result<Self> {
        let timeout = config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            event_id: config.event_id,
            credentials: config.credentials,
            token: None,
        })
    }

    /// Event used by [`get_badge_info`](Self::get_badge_info).
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Logs in and stores the session token.
    ///
    /// A rejected login is not an error here: the token stays unset and the
    /// next data call reports `Unauthorized`. Transport failures still
    /// propagate.
    pub async fn authenticate(&mut self) -> Result<()> {
        let endpoint = format!("{}/auth", self.endpoint);
        tracing::debug!("Authenticating against {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", self.credentials.api_key.as_str())])
            .json(&AuthRequest {
                email: &self.credentials.email,
                password: &self.credentials.password,
            })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Auth response status: {}", status);

        if !status.is_success() {
            tracing::warn!("Authentication rejected with status {}", status);
            return Ok(());
        }

        let body: Envelope<AuthData> = response.json().await?;
        self.token = Some(body.data.token);
        tracing::info!("Authenticated against the event API");
        Ok(())
    }

    /// All tickets of `event_id`, in the order the service returns them.
    pub async fn list_tickets(&self, event_id: &str) -> Result<Vec<Ticket>> {
        let endpoint = format!("{}/events/{}/tickets", self.endpoint, event_id);
        let response = self.authorized_get(&endpoint, &[]).await?;
        let body: Envelope<TicketList> = response.json().await?;

        tracing::info!(
            "Fetched {} tickets for event {}",
            body.data.tickets.len(),
            event_id
        );
        Ok(body.data.tickets)
    }

    /// Detail view of a single ticket, as the service sends it. The scan
    /// view has its own shape, so nothing beyond the JSON envelope is checked.
    pub async fn ticket_detail(
        &self,
        event_id: &str,
        ticket_id: &str,
    ) -> Result<serde_json::Value> {
        let endpoint = format!(
            "{}/events/{}/tickets/{}/show",
            self.endpoint, event_id, ticket_id
        );
        let response = self
            .authorized_get(&endpoint, &[("filter", DETAIL_FILTER)])
            .await?;
        let body: Envelope<serde_json::Value> = response.json().await?;
        Ok(body.data)
    }

    /// Fetches the configured event's tickets and classifies them into
    /// badge records.
    pub async fn get_badge_info(
        &self,
        type_ids: &TypeIds,
        exceptions: &Exceptions,
        corrections: &Corrections,
    ) -> Result<Vec<BadgeRecord>> {
        let tickets = self.list_tickets(&self.event_id).await?;
        let fetched = tickets.len();

        let records = classify::badge_records(tickets, type_ids, exceptions, corrections);
        tracing::info!(
            "{} of {} tickets qualify for a badge",
            records.len(),
            fetched
        );
        Ok(records)
    }

    async fn authorized_get(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Response> {
        let token = self.token.as_deref().ok_or(BadgerError::Unauthorized)?;

        let mut params = vec![("key", self.credentials.api_key.as_str()), ("token", token)];
        params.extend_from_slice(extra);

        tracing::debug!("Making API request to: {}", endpoint);
        let response = self.client.get(endpoint).query(&params).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(BadgerError::RemoteUnavailable {
                status: response.status().as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::collections::HashMap;

    fn config(endpoint: String) -> YurplanConfig {
        YurplanConfig {
            endpoint,
            event_id: "6343".to_string(),
            timeout_seconds: Some(5),
            credentials: Credentials {
                api_key: "key-1".to_string(),
                email: "orga@example.com".to_string(),
                password: "hunter2".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_authenticate_stores_token() {
        let server = MockServer::start();
        let auth_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth")
                .query_param("key", "key-1")
                .json_body(serde_json::json!({
                    "email": "orga@example.com",
                    "password": "hunter2"
                }));
            then.status(200)
                .json_body(serde_json::json!({"data": {"token": "session-1"}}));
        });

        let mut client = YurplanClient::new(config(server.base_url())).unwrap();
        assert!(!client.is_authenticated());

        client.authenticate().await.unwrap();

        auth_mock.assert();
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_client_unauthenticated() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth");
            then.status(401);
        });

        let mut client = YurplanClient::new(config(server.base_url())).unwrap();
        client.authenticate().await.unwrap();

        assert!(!client.is_authenticated());
        assert!(matches!(
            client.list_tickets("6343").await,
            Err(BadgerError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_data_calls_require_authentication() {
        let client = YurplanClient::new(config("http://127.0.0.1:9".to_string())).unwrap();

        assert!(matches!(
            client.list_tickets("6343").await,
            Err(BadgerError::Unauthorized)
        ));
        assert!(matches!(
            client.ticket_detail("6343", "42").await,
            Err(BadgerError::Unauthorized)
        ));
        assert!(matches!(
            client
                .get_badge_info(
                    &TypeIds {
                        attendee: "1".to_string(),
                        speaker: "2".to_string(),
                        sponsor: "3".to_string(),
                        staff: "4".to_string(),
                    },
                    &HashMap::new(),
                    &HashMap::new()
                )
                .await,
            Err(BadgerError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_ticket_detail_uses_scan_filter() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth");
            then.status(200)
                .json_body(serde_json::json!({"data": {"token": "session-1"}}));
        });
        let detail_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/events/6343/tickets/42/show")
                .query_param("key", "key-1")
                .query_param("token", "session-1")
                .query_param("filter", "scanv2");
            then.status(200).json_body(serde_json::json!({
                "data": {"token": "T42", "type": {"id": "11201"}, "firstname": "Ada", "lastname": "L"}
            }));
        });

        let mut client = YurplanClient::new(config(server.base_url())).unwrap();
        client.authenticate().await.unwrap();
        let ticket = client.ticket_detail("6343", "42").await.unwrap();

        detail_mock.assert();
        assert_eq!(ticket["token"], "T42");
        assert_eq!(ticket["type"]["id"], "11201");
    }

    #[tokio::test]
    async fn test_ticket_detail_keeps_scan_view_fields() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth");
            then.status(200)
                .json_body(serde_json::json!({"data": {"token": "session-1"}}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/events/6343/tickets/42/show");
            then.status(200).json_body(serde_json::json!({
                "data": {"id": 42, "scanned": false, "holder": {"name": "Ada L"}}
            }));
        });

        let mut client = YurplanClient::new(config(server.base_url())).unwrap();
        client.authenticate().await.unwrap();
        let ticket = client.ticket_detail("6343", "42").await.unwrap();

        assert_eq!(ticket["id"], 42);
        assert_eq!(ticket["holder"]["name"], "Ada L");
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let mut cfg = config("http://127.0.0.1:9".to_string());
        cfg.credentials.api_key = "SUPERSECRETKEY".to_string();
        let mut client = YurplanClient::new(cfg).unwrap();

        let err = client.authenticate().await.unwrap_err();

        assert!(matches!(err, BadgerError::HttpError(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
        assert!(!err.user_friendly_message().contains("SUPERSECRETKEY"));
        assert!(!format!("{:?}", err).contains("SUPERSECRETKEY"));
    }

    #[tokio::test]
    async fn test_non_success_is_remote_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth");
            then.status(200)
                .json_body(serde_json::json!({"data": {"token": "session-1"}}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/events/6343/tickets");
            then.status(503);
        });

        let mut client = YurplanClient::new(config(server.base_url())).unwrap();
        client.authenticate().await.unwrap();

        match client.list_tickets("6343").await {
            Err(BadgerError::RemoteUnavailable { status, endpoint }) => {
                assert_eq!(status, 503);
                assert!(endpoint.ends_with("/events/6343/tickets"));
            }
            other => panic!("expected RemoteUnavailable, got {:?}", other),
        }
    }
}
