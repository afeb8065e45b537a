//! "Sync from Zoho" action for a campaign record.
//!
//! The action is only offered for records linked to a Zoho campaign. Running it
//! asks the remote sync service to refresh the record; the caller decides how
//! to present the busy state and the resulting [`SyncOutcome`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::ApiError;
use crate::models::CampaignRecord;

/// Button label for the sync action.
pub const SYNC_LABEL: &str = "Sync from Zoho";
/// Group the sync action is listed under.
pub const SYNC_GROUP: &str = "Actions";
/// Status shown while the sync is in flight.
pub const SYNC_BUSY_MESSAGE: &str = "Syncing campaign data...";
/// Notification shown after a successful sync.
pub const SYNC_SUCCESS_MESSAGE: &str = "Campaign synced successfully";
/// Notification shown when the server reports failure without a message.
pub const SYNC_REJECTED_MESSAGE: &str = "Campaign sync did not complete";

/// Reply of the remote sync method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Remote collaborator that refreshes a campaign from Zoho.
#[async_trait]
pub trait SyncService: Send + Sync {
    async fn sync_campaign_by_name(&self, campaign_name: &str) -> Result<SyncResponse, ApiError>;
}

/// How a sync attempt ended.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The server refreshed the record; it should be reloaded.
    Synced,
    /// The server answered but reported `success = false`.
    Rejected(String),
    /// The call itself failed.
    Failed(ApiError),
}

impl SyncOutcome {
    pub fn should_reload(&self) -> bool {
        matches!(self, SyncOutcome::Synced)
    }

    /// Notification text for this outcome (untranslated).
    pub fn message(&self) -> String {
        match self {
            SyncOutcome::Synced => SYNC_SUCCESS_MESSAGE.to_string(),
            SyncOutcome::Rejected(message) => message.clone(),
            SyncOutcome::Failed(e) => format!("Sync failed: {}", e),
        }
    }
}

/// True when the record can be synced from Zoho.
pub fn sync_available(record: &CampaignRecord) -> bool {
    record.has_zoho_link()
}

/// The sync action bound to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncAction {
    campaign_name: String,
}

impl SyncAction {
    /// The action for `record`, or `None` when it has no Zoho campaign key.
    pub fn for_record(record: &CampaignRecord) -> Option<Self> {
        sync_available(record).then(|| Self {
            campaign_name: record.name.clone(),
        })
    }

    pub fn campaign_name(&self) -> &str {
        &self.campaign_name
    }

    pub fn label(&self) -> &'static str {
        SYNC_LABEL
    }

    /// Issue the sync request and classify the reply.
    pub async fn run<S: SyncService + ?Sized>(&self, service: &S) -> SyncOutcome {
        info!(campaign = %self.campaign_name, "Syncing campaign from Zoho");
        match service.sync_campaign_by_name(&self.campaign_name).await {
            Ok(response) if response.success => {
                info!(campaign = %self.campaign_name, "Campaign sync succeeded");
                SyncOutcome::Synced
            }
            Ok(response) => {
                warn!(campaign = %self.campaign_name, message = ?response.message, "Campaign sync rejected");
                SyncOutcome::Rejected(
                    response
                        .message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| SYNC_REJECTED_MESSAGE.to_string()),
                )
            }
            Err(e) => {
                warn!(campaign = %self.campaign_name, error = %e, "Campaign sync failed");
                SyncOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedSync {
        reply: Mutex<Option<Result<SyncResponse, ApiError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedSync {
        fn new(reply: Result<SyncResponse, ApiError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SyncService for ScriptedSync {
        async fn sync_campaign_by_name(&self, campaign_name: &str) -> Result<SyncResponse, ApiError> {
            self.calls.lock().unwrap().push(campaign_name.to_string());
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(ApiError::InvalidResponse("no scripted reply".into())))
        }
    }

    fn record(key: Option<&str>) -> CampaignRecord {
        CampaignRecord {
            name: "CAMP-001".to_string(),
            zoho_campaign_key: key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_action_absent_without_key() {
        assert!(SyncAction::for_record(&record(None)).is_none());
        assert!(SyncAction::for_record(&record(Some(""))).is_none());
    }

    #[test]
    fn test_action_present_with_any_key() {
        let action = SyncAction::for_record(&record(Some("k"))).expect("action");
        assert_eq!(action.campaign_name(), "CAMP-001");
        assert_eq!(action.label(), "Sync from Zoho");

        // Any non-empty string counts, whitespace included
        assert!(sync_available(&record(Some("   "))));
        assert!(SyncAction::for_record(&record(Some("   "))).is_some());
    }

    #[tokio::test]
    async fn test_success_requests_reload() {
        let service = ScriptedSync::new(Ok(SyncResponse {
            success: true,
            message: Some("Campaign synced successfully".into()),
        }));
        let action = SyncAction::for_record(&record(Some("k"))).expect("action");

        let outcome = action.run(&service).await;
        assert!(outcome.should_reload());
        assert_eq!(outcome.message(), "Campaign synced successfully");
        assert_eq!(*service.calls.lock().unwrap(), vec!["CAMP-001".to_string()]);
    }

    #[tokio::test]
    async fn test_unsuccessful_reply_is_rejected() {
        let service = ScriptedSync::new(Ok(SyncResponse {
            success: false,
            message: None,
        }));
        let action = SyncAction::for_record(&record(Some("k"))).expect("action");

        let outcome = action.run(&service).await;
        assert!(!outcome.should_reload());
        assert_eq!(outcome.message(), SYNC_REJECTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let service = ScriptedSync::new(Err(ApiError::Validation(
            "This campaign is not linked to Zoho".into(),
        )));
        let action = SyncAction::for_record(&record(Some("k"))).expect("action");

        let outcome = action.run(&service).await;
        assert!(matches!(outcome, SyncOutcome::Failed(_)));
        assert_eq!(outcome.message(), "Sync failed: This campaign is not linked to Zoho");
    }
}
