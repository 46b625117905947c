//! Directory client for a Supabase (PostgREST) project
//!
//! Tables are read through `GET {SUPABASE_URL}/rest/v1/{table}?select=*` using the
//! project key for both the `apikey` header and the bearer token.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use validator::Validate;

use crate::entities::directory::{User, Vhv};
use crate::services::directory::{DirectoryError, DirectoryServiceTrait};

/// Longest error body kept in a `DirectoryError::Status`
const MAX_ERROR_BODY: usize = 512;

/// Supabase connection settings
#[derive(Debug, Clone, Validate)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[validate(url(message = "SUPABASE_URL must be a valid URL"))]
    pub url: String,

    /// Service or anon key
    #[validate(length(min = 1, message = "SUPABASE_KEY must not be empty"))]
    pub api_key: String,

    /// Table holding users
    #[validate(length(min = 1, message = "users table name must not be empty"))]
    pub users_table: String,

    /// Table holding village health volunteers
    #[validate(length(min = 1, message = "VHVs table name must not be empty"))]
    pub vhvs_table: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,
}

impl SupabaseConfig {
    /// Read the configuration from environment variables
    pub fn from_env() -> Result<Self, DirectoryError> {
        let url = env::var("SUPABASE_URL")
            .map_err(|_| DirectoryError::Config("SUPABASE_URL is not set".to_string()))?;
        let api_key = env::var("SUPABASE_KEY")
            .map_err(|_| DirectoryError::Config("SUPABASE_KEY is not set".to_string()))?;

        let timeout_seconds = env::var("SUPABASE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        Ok(Self {
            url,
            api_key,
            users_table: env::var("SUPABASE_USERS_TABLE").unwrap_or_else(|_| "users".to_string()),
            vhvs_table: env::var("SUPABASE_VHVS_TABLE").unwrap_or_else(|_| "vhvs".to_string()),
            timeout_seconds,
        })
    }
}

/// Directory client reading users and volunteers from Supabase
#[derive(Debug, Clone)]
pub struct SupabaseDirectoryClient {
    http: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseDirectoryClient {
    /// Create a client from validated configuration
    pub fn new(config: SupabaseConfig) -> Result<Self, DirectoryError> {
        config.validate().map_err(|errors| {
            let message = errors
                .field_errors()
                .iter()
                .map(|(field, errs)| {
                    let msgs: Vec<String> = errs
                        .iter()
                        .map(|err| match &err.message {
                            Some(msg) => msg.to_string(),
                            None => format!("Invalid {}", field),
                        })
                        .collect();
                    format!("{}: {}", field, msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");
            DirectoryError::Config(message)
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| DirectoryError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self, DirectoryError> {
        Self::new(SupabaseConfig::from_env()?)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url.trim_end_matches('/'), table)
    }

    async fn fetch_table<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, DirectoryError> {
        let url = self.table_url(table);
        debug!("Fetching Supabase table {}", table);

        let response = self.http
            .get(&url)
            .query(&[("select", "*")])
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DirectoryError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut end = MAX_ERROR_BODY;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                body.truncate(end);
            }
            warn!("Supabase table {} returned status {}", table, status);
            return Err(DirectoryError::Status { status: status.as_u16(), body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DirectoryError::Http(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DirectoryServiceTrait for SupabaseDirectoryClient {
    #[instrument(skip(self))]
    async fn get_users(&self) -> Result<Vec<User>, DirectoryError> {
        self.fetch_table(&self.config.users_table).await
    }

    #[instrument(skip(self))]
    async fn get_vhvs(&self) -> Result<Vec<Vhv>, DirectoryError> {
        self.fetch_table(&self.config.vhvs_table).await
    }

    fn backend_name(&self) -> &'static str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config_for(url: String) -> SupabaseConfig {
        SupabaseConfig {
            url,
            api_key: "test-key".to_string(),
            users_table: "users".to_string(),
            vhvs_table: "vhvs".to_string(),
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn test_get_users_sends_key_headers_and_decodes_rows() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/users")
            .match_query(Matcher::UrlEncoded("select".into(), "*".into()))
            .match_header("apikey", "test-key")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([
                { "id": "u1", "email": "admin@example.org", "role": "admin", "full_name": "Admin" },
                { "id": "u2", "email": "doc@example.org", "role": "doctor" }
            ]).to_string())
            .create_async()
            .await;

        let client = SupabaseDirectoryClient::new(config_for(server.url())).unwrap();
        let users = client.get_users().await.unwrap();

        mock.assert_async().await;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].full_name.as_deref(), Some("Admin"));
        assert_eq!(users[1].role, "doctor");
    }

    #[tokio::test]
    async fn test_rows_with_null_fields_and_extra_columns_are_kept() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/users")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!([
                { "id": "u1", "email": "a@x.org", "role": "admin" },
                { "id": "u2", "email": null, "role": "patient" }
            ]).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/rest/v1/vhvs")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!([
                { "id": "v1", "full_name": null, "village": "Ban", "extra_col": "x" },
                { "id": 7, "village": "Nong" }
            ]).to_string())
            .create_async()
            .await;

        let client = SupabaseDirectoryClient::new(config_for(server.url())).unwrap();

        let users = client.get_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].email, None);

        let vhvs = client.get_vhvs().await.unwrap();
        assert_eq!(vhvs.len(), 2);
        assert_eq!(vhvs[0].full_name, None);
        assert_eq!(vhvs[1].id, "7");

        let body = serde_json::to_value(&vhvs[0]).unwrap();
        assert_eq!(body["extra_col"], "x");
        assert_eq!(body["village"], "Ban");
    }

    #[tokio::test]
    async fn test_get_vhvs_reads_configured_table() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/village_volunteers")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let mut config = config_for(format!("{}/", server.url()));
        config.vhvs_table = "village_volunteers".to_string();

        let client = SupabaseDirectoryClient::new(config).unwrap();
        let vhvs = client.get_vhvs().await.unwrap();

        mock.assert_async().await;
        assert!(vhvs.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/vhvs")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let client = SupabaseDirectoryClient::new(config_for(server.url())).unwrap();
        let err = client.get_vhvs().await.unwrap_err();

        match err {
            DirectoryError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid API key"));
            },
            other => panic!("Expected Status error but got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/users")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"not":"an array"}"#)
            .create_async()
            .await;

        let client = SupabaseDirectoryClient::new(config_for(server.url())).unwrap();
        assert!(matches!(client.get_users().await, Err(DirectoryError::Decode(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = config_for("not a url".to_string());
        config.api_key = String::new();

        match SupabaseDirectoryClient::new(config) {
            Err(DirectoryError::Config(message)) => {
                assert!(message.contains("SUPABASE_URL must be a valid URL"));
                assert!(message.contains("SUPABASE_KEY must not be empty"));
            },
            other => panic!("Expected Config error but got: {:?}", other.map(|_| ())),
        }
    }
}
