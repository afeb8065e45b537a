//! API client for communicating with a Frappe/ERPNext site.
//!
//! This module provides the `FrappeClient` struct for making authenticated
//! requests against the Frappe REST API (`/api/resource`, `/api/method`).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::ApiCredentials;
use crate::models::{CampaignRecipient, CampaignRecord, CampaignSummary};
use crate::navigation::{RecipientFilter, RECIPIENT_DOCTYPE};
use crate::sync::{SyncResponse, SyncService};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Whitelisted method that refreshes one campaign from Zoho.
pub const SYNC_METHOD: &str =
    "erpnext_zoho_integration.erpnext_zoho_integration.api.sync.sync_campaign_by_name";

/// Method returning the user the API key belongs to.
const LOGGED_USER_METHOD: &str = "frappe.auth.get_logged_user";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeout for the sync call in seconds.
/// The server pulls analytics and recipients from Zoho before answering.
const SYNC_TIMEOUT_SECS: u64 = 120;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Fields requested for the campaign picker.
const CAMPAIGN_SUMMARY_FIELDS: [&str; 5] = [
    "name",
    "campaign_name",
    "zoho_campaign_status",
    "zoho_sent_time",
    "last_synced",
];

/// Maximum number of campaigns listed in the picker.
const CAMPAIGN_LIST_LIMIT: u32 = 200;

/// `/api/resource` responses wrap the payload in `data`.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// `/api/method` responses wrap the return value in `message`.
#[derive(Debug, Deserialize)]
struct MessageEnvelope<T> {
    message: T,
}

#[derive(Debug, Serialize)]
struct SyncRequest<'a> {
    campaign_name: &'a str,
}

/// Client for one Frappe site.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct FrappeClient {
    client: Client,
    base_url: Url,
    credentials: Option<ApiCredentials>,
}

impl FrappeClient {
    /// Create a client for the site at `site_url`
    pub fn new(site_url: &str) -> Result<Self> {
        let base_url = Url::parse(site_url.trim())
            .with_context(|| format!("Invalid site URL: {}", site_url))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("Site URL must be an http(s) URL: {}", site_url);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            credentials: None,
        })
    }

    /// Create a new client with the given credentials, sharing the connection pool.
    pub fn with_credentials(&self, credentials: ApiCredentials) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            credentials: Some(credentials),
        }
    }

    pub fn site_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an endpoint URL from path segments; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(ref credentials) = self.credentials {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&credentials.authorization())
                    .map_err(|_| ApiError::InvalidCredentials)?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            // Rate limited - signal to retry
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request, retrying with exponential backoff while rate limited.
    async fn send_json<T, F>(&self, url: &Url, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = build().headers(self.auth_headers()?).send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let body = response.text().await?;
                    return serde_json::from_str(&body).map_err(|e| {
                        ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", url.path(), e))
                    });
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url = %url.path(), retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &Url, query: &[(&str, String)]) -> Result<T, ApiError> {
        debug!(url = %url.path(), "GET");
        self.send_json(url, || self.client.get(url.clone()).query(query)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &Url,
        body: &B,
        timeout: Duration,
    ) -> Result<T, ApiError> {
        debug!(url = %url.path(), "POST");
        self.send_json(url, || self.client.post(url.clone()).json(body).timeout(timeout))
            .await
    }

    // ===== Data Fetching Methods =====

    /// Return the user the configured API key belongs to
    pub async fn fetch_logged_user(&self) -> Result<String> {
        let url = self.endpoint(&["api", "method", LOGGED_USER_METHOD])?;
        let envelope: MessageEnvelope<String> = self
            .get(&url, &[])
            .await
            .context("Failed to verify API credentials")?;
        Ok(envelope.message)
    }

    /// Fetch one Campaign document including its analytics child table
    pub async fn fetch_campaign(&self, name: &str) -> Result<CampaignRecord> {
        let url = self.endpoint(&["api", "resource", "Campaign", name])?;
        let envelope: DataEnvelope<CampaignRecord> = self
            .get(&url, &[])
            .await
            .with_context(|| format!("Failed to load campaign {}", name))?;
        debug!(
            campaign = %envelope.data.name,
            analytics = envelope.data.campaign_analytics.len(),
            "Campaign loaded"
        );
        Ok(envelope.data)
    }

    /// List campaigns for the picker, newest first.
    /// Unless `include_unlinked` is set only Zoho-linked campaigns are returned.
    pub async fn fetch_campaigns(&self, include_unlinked: bool) -> Result<Vec<CampaignSummary>> {
        let url = self.endpoint(&["api", "resource", "Campaign"])?;
        let filters = if include_unlinked {
            json!([])
        } else {
            json!([["zoho_campaign_key", "is", "set"]])
        };
        let query = [
            ("fields", serde_json::to_string(&CAMPAIGN_SUMMARY_FIELDS)?),
            ("filters", filters.to_string()),
            ("order_by", "modified desc".to_string()),
            ("limit_page_length", CAMPAIGN_LIST_LIMIT.to_string()),
        ];
        let envelope: DataEnvelope<Vec<CampaignSummary>> = self
            .get(&url, &query)
            .await
            .context("Failed to list campaigns")?;
        Ok(envelope.data)
    }

    /// Fetch the recipient actions matching a navigation filter
    pub async fn fetch_recipients(
        &self,
        filter: &RecipientFilter,
        limit: u32,
    ) -> Result<Vec<CampaignRecipient>> {
        let url = self.endpoint(&["api", "resource", RECIPIENT_DOCTYPE])?;
        let query = [
            ("fields", r#"["*"]"#.to_string()),
            ("filters", filter.query_filters().to_string()),
            ("order_by", "action_date desc".to_string()),
            ("limit_page_length", limit.to_string()),
        ];
        let envelope: DataEnvelope<Vec<CampaignRecipient>> = self
            .get(&url, &query)
            .await
            .with_context(|| {
                format!(
                    "Failed to load {} recipients for {}",
                    filter.action_type, filter.campaign
                )
            })?;
        debug!(count = envelope.data.len(), "Recipients loaded");
        Ok(envelope.data)
    }
}

#[async_trait]
impl SyncService for FrappeClient {
    async fn sync_campaign_by_name(&self, campaign_name: &str) -> Result<SyncResponse, ApiError> {
        let url = self.endpoint(&["api", "method", SYNC_METHOD])?;
        let envelope: MessageEnvelope<SyncResponse> = self
            .post(
                &url,
                &SyncRequest { campaign_name },
                Duration::from_secs(SYNC_TIMEOUT_SECS),
            )
            .await?;
        Ok(envelope.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> ApiCredentials {
        ApiCredentials::new("key123", "secret456")
    }

    async fn client_for(server: &MockServer) -> FrappeClient {
        FrappeClient::new(&server.uri())
            .expect("client")
            .with_credentials(credentials())
    }

    #[test]
    fn test_rejects_non_http_site_url() {
        assert!(FrappeClient::new("ftp://erp.example.com").is_err());
        assert!(FrappeClient::new("not a url").is_err());
        assert!(FrappeClient::new("https://erp.example.com/").is_ok());
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = FrappeClient::new("https://erp.example.com/").expect("client");
        let url = client
            .endpoint(&["api", "resource", "Campaign Recipient"])
            .expect("url");
        assert_eq!(url.as_str(), "https://erp.example.com/api/resource/Campaign%20Recipient");

        let url = client.endpoint(&["api", "resource", "Campaign", "A/B test"]).expect("url");
        assert_eq!(url.path(), "/api/resource/Campaign/A%2FB%20test");
    }

    #[tokio::test]
    async fn test_fetch_campaign() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/resource/Campaign/CAMP-001"))
            .and(header("Authorization", "token key123:secret456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "name": "CAMP-001",
                    "zoho_campaign_key": "abc",
                    "campaign_analytics": [
                        {"metric": "Opens", "value": "120", "percentage": null},
                        {"metric": "Unique Clicks", "value": "30", "percentage": null}
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = client_for(&server).await.fetch_campaign("CAMP-001").await.expect("campaign");
        assert_eq!(record.name, "CAMP-001");
        assert!(record.has_zoho_link());
        assert_eq!(record.campaign_analytics.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_campaign_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/resource/Campaign/MISSING"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "exc_type": "DoesNotExistError"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_campaign("MISSING").await.unwrap_err();
        let api_err = err.downcast_ref::<ApiError>().expect("api error");
        assert!(matches!(api_err, ApiError::NotFound(m) if m == "DoesNotExistError"));
    }

    #[tokio::test]
    async fn test_sync_campaign_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/api/method/{}", SYNC_METHOD)))
            .and(body_json(json!({"campaign_name": "CAMP-001"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": {"success": true, "message": "Campaign synced successfully"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .await
            .sync_campaign_by_name("CAMP-001")
            .await
            .expect("sync");
        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("Campaign synced successfully"));
    }

    #[tokio::test]
    async fn test_sync_campaign_validation_error() {
        let server = MockServer::start().await;
        let server_messages = serde_json::to_string(&vec![
            json!({"message": "This campaign is not linked to Zoho"}).to_string(),
        ])
        .expect("encode");
        Mock::given(method("POST"))
            .and(path(format!("/api/method/{}", SYNC_METHOD)))
            .respond_with(ResponseTemplate::new(417).set_body_json(json!({
                "exc_type": "ValidationError",
                "_server_messages": server_messages
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .sync_campaign_by_name("CAMP-001")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "This campaign is not linked to Zoho"));
    }

    #[tokio::test]
    async fn test_fetch_recipients_sends_filters() {
        let server = MockServer::start().await;
        let filter = RecipientFilter::new("CAMP-001", "Clicked");
        Mock::given(method("GET"))
            .and(path_regex(r"^/api/resource/Campaign(%20| )Recipient$"))
            .and(query_param("filters", filter.query_filters().to_string()))
            .and(query_param("limit_page_length", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"name": "CR-1", "campaign": "CAMP-001", "email": "a@example.com", "action_type": "Clicked"},
                    {"name": "CR-2", "campaign": "CAMP-001", "email": "b@example.com", "action_type": "Clicked", "is_spam": 0}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let recipients = client_for(&server)
            .await
            .fetch_recipients(&filter, 50)
            .await
            .expect("recipients");
        assert_eq!(recipients.len(), 2);
        assert_eq!(recipients[1].email, "b@example.com");
    }

    #[tokio::test]
    async fn test_fetch_campaigns_only_linked_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/resource/Campaign"))
            .and(query_param("filters", r#"[["zoho_campaign_key","is","set"]]"#))
            .and(query_param("order_by", "modified desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"name": "CAMP-002", "campaign_name": "Autumn", "zoho_campaign_status": "Sent"},
                    {"name": "CAMP-001", "campaign_name": ""}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let campaigns = client_for(&server).await.fetch_campaigns(false).await.expect("campaigns");
        assert_eq!(campaigns.len(), 2);
        assert_eq!(campaigns[0].display_name(), "Autumn");
        assert_eq!(campaigns[1].display_name(), "CAMP-001");
    }

    #[tokio::test]
    async fn test_fetch_logged_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/api/method/{}", LOGGED_USER_METHOD)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ops@example.com"})))
            .mount(&server)
            .await;

        let user = client_for(&server).await.fetch_logged_user().await.expect("user");
        assert_eq!(user, "ops@example.com");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_campaigns(false).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)));
    }
}
