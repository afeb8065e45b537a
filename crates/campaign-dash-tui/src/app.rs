//! Application state management for campaign-dash.
//!
//! This module contains the core `App` struct that manages all application state,
//! including the open campaign, the mounted dashboard, the recipient list and
//! background task coordination.

use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use campaign_dash_core::api::FrappeClient;
use campaign_dash_core::config::Config;
use campaign_dash_core::dashboard::{render_dashboard, DashboardMount};
use campaign_dash_core::i18n::tr;
use campaign_dash_core::models::{CampaignRecipient, CampaignRecord, CampaignSummary};
use campaign_dash_core::navigation::{show_recipients_list, Navigator, RecipientFilter, Route};
use campaign_dash_core::sync::{SyncAction, SyncOutcome, SYNC_BUSY_MESSAGE};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// How long a notification stays in the status bar.
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

// ============================================================================
// UI State Types
// ============================================================================

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// List of campaigns to open
    Picker,
    /// One campaign with its dashboard
    Campaign,
    /// Recipient list filtered by campaign and action
    Recipients,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    /// A sync is in flight; input is blocked
    Syncing,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message shown in the status bar
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    expires_at: Instant,
}

impl Notification {
    fn new(message: String, kind: NotificationKind) -> Self {
        Self {
            message,
            kind,
            expires_at: Instant::now() + NOTIFICATION_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from spawned tasks back to the UI loop.
enum BackgroundResult {
    /// Campaign list for the picker
    Campaigns(Vec<CampaignSummary>),
    /// A campaign record finished loading
    RecordLoaded(CampaignRecord),
    /// Loading a campaign record failed
    RecordFailed { campaign: String, error: String },
    /// The sync call returned
    SyncFinished { campaign: String, outcome: SyncOutcome },
    /// Recipient rows for a filter
    Recipients {
        filter: RecipientFilter,
        recipients: Vec<CampaignRecipient>,
    },
    /// Loading recipient rows failed
    RecipientsFailed { filter: RecipientFilter, error: String },
    /// Anything else that went wrong
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    pub config: Config,
    api: FrappeClient,

    // UI State
    pub state: AppState,
    pub view: View,
    /// Terminal area of the last draw, used for mouse hit-testing
    pub viewport: Rect,

    // Picker
    pub campaigns: Vec<CampaignSummary>,
    pub campaign_selection: usize,
    pub campaigns_loading: bool,

    // Open campaign
    pub current_campaign: Option<String>,
    pub record: Option<CampaignRecord>,
    pub record_loading: bool,
    pub record_error: Option<String>,
    pub sync_action: Option<SyncAction>,
    pub sync_started: Option<Instant>,
    pub dashboard: DashboardMount,

    // Recipient list
    pub recipient_filter: Option<RecipientFilter>,
    pub recipients: Vec<CampaignRecipient>,
    pub recipients_loading: bool,
    pub recipients_error: Option<String>,
    pub recipient_selection: usize,

    // Background task channel
    result_rx: mpsc::Receiver<BackgroundResult>,
    result_tx: mpsc::Sender<BackgroundResult>,

    // Status
    pub status_message: Option<String>,
    pub notification: Option<Notification>,
}

impl App {
    /// Create the application from configuration, resolving API credentials
    pub fn new(config: Config) -> Result<Self> {
        let api = FrappeClient::new(config.require_site_url()?)?
            .with_credentials(config.credentials()?);
        Ok(Self::with_client(config, api))
    }

    /// Create the application around an already configured client
    pub fn with_client(config: Config, api: FrappeClient) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            api,

            state: AppState::Normal,
            view: View::Picker,
            viewport: Rect::default(),

            campaigns: Vec::new(),
            campaign_selection: 0,
            campaigns_loading: false,

            current_campaign: None,
            record: None,
            record_loading: false,
            record_error: None,
            sync_action: None,
            sync_started: None,
            dashboard: DashboardMount::new(),

            recipient_filter: None,
            recipients: Vec::new(),
            recipients_loading: false,
            recipients_error: None,
            recipient_selection: 0,

            result_rx: rx,
            result_tx: tx,

            status_message: None,
            notification: None,
        }
    }

    pub fn site_url(&self) -> &str {
        self.api.site_url()
    }

    /// Whether `name` is the open campaign, ignoring ASCII case
    fn is_open(&self, name: &str) -> bool {
        self.current_campaign
            .as_deref()
            .map_or(false, |current| current.eq_ignore_ascii_case(name))
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub fn notify(&mut self, message: String, kind: NotificationKind) {
        self.notification = Some(Notification::new(message, kind));
    }

    /// Drop the notification once its time is up
    pub fn expire_notifications(&mut self) {
        let now = Instant::now();
        if self.notification.as_ref().map(|n| n.is_expired(now)).unwrap_or(false) {
            self.notification = None;
        }
    }

    // =========================================================================
    // Picker
    // =========================================================================

    /// Load the campaign list in the background
    pub fn load_campaigns(&mut self) {
        let api = self.api.clone();
        let tx = self.result_tx.clone();
        let include_unlinked = self.config.show_all_campaigns;
        self.campaigns_loading = true;

        tokio::spawn(async move {
            let result = match api.fetch_campaigns(include_unlinked).await {
                Ok(list) => BackgroundResult::Campaigns(list),
                Err(e) => {
                    error!(error = %e, "Failed to list campaigns");
                    BackgroundResult::Error(format!("{:#}", e))
                }
            };
            Self::send_result(&tx, result).await;
        });

        self.status_message = Some(tr("Loading campaigns..."));
    }

    pub fn selected_campaign(&self) -> Option<&CampaignSummary> {
        self.campaigns.get(self.campaign_selection)
    }

    // =========================================================================
    // Campaign view lifecycle
    // =========================================================================

    /// Open a campaign: switch to its view and load the record
    pub fn open_campaign(&mut self, name: &str) {
        info!(campaign = %name, "Opening campaign");
        self.view = View::Campaign;
        self.current_campaign = Some(name.to_string());
        self.record = None;
        self.record_error = None;
        self.sync_action = None;
        self.dashboard.unmount();

        if self.config.last_campaign.as_deref() != Some(name) {
            self.config.last_campaign = Some(name.to_string());
            if let Err(e) = self.config.save() {
                warn!(error = %e, "Failed to save config");
            }
        }

        self.reload_record();
    }

    /// Fetch the open campaign again from the site
    pub fn reload_record(&mut self) {
        let Some(name) = self.current_campaign.clone() else {
            return;
        };
        let api = self.api.clone();
        let tx = self.result_tx.clone();
        self.record_loading = true;

        tokio::spawn(async move {
            let result = match api.fetch_campaign(&name).await {
                Ok(record) => BackgroundResult::RecordLoaded(record),
                Err(e) => {
                    error!(campaign = %name, error = %e, "Failed to load campaign");
                    BackgroundResult::RecordFailed {
                        campaign: name,
                        error: format!("{:#}", e),
                    }
                }
            };
            Self::send_result(&tx, result).await;
        });

        self.status_message = Some(tr("Loading campaign..."));
    }

    /// Activation hook for the campaign view.
    ///
    /// Runs whenever the view becomes active with data in hand: offers the
    /// sync action when the record is linked to Zoho and re-renders the
    /// dashboard, replacing any previously mounted one.
    pub fn activate_campaign_view(&mut self) {
        self.view = View::Campaign;
        match self.record {
            Some(ref record) => {
                self.sync_action = SyncAction::for_record(record);
                self.dashboard
                    .mount(render_dashboard(&record.campaign_analytics));
                debug!(
                    campaign = %record.name,
                    sync = self.sync_action.is_some(),
                    tiles = self.dashboard.current().map(|d| d.len()).unwrap_or(0),
                    "Campaign view activated"
                );
            }
            None => {
                self.sync_action = None;
                self.dashboard.unmount();
            }
        }
    }

    /// Leave the current view
    pub fn go_back(&mut self) {
        match self.view {
            View::Recipients => self.activate_campaign_view(),
            View::Campaign => {
                self.view = View::Picker;
                if self.campaigns.is_empty() && !self.campaigns_loading {
                    self.load_campaigns();
                }
            }
            View::Picker => {}
        }
    }

    // =========================================================================
    // Sync
    // =========================================================================

    /// Run the "Sync from Zoho" action for the open record.
    /// Does nothing when the action is not offered or a sync is running.
    pub fn start_sync(&mut self) {
        if self.state != AppState::Normal || self.view != View::Campaign {
            return;
        }
        let Some(action) = self.sync_action.clone() else {
            return;
        };

        let api = self.api.clone();
        let tx = self.result_tx.clone();
        self.state = AppState::Syncing;
        self.sync_started = Some(Instant::now());

        tokio::spawn(async move {
            let outcome = action.run(&api).await;
            Self::send_result(
                &tx,
                BackgroundResult::SyncFinished {
                    campaign: action.campaign_name().to_string(),
                    outcome,
                },
            )
            .await;
        });

        self.status_message = Some(tr(SYNC_BUSY_MESSAGE));
    }

    fn finish_sync(&mut self, campaign: String, outcome: SyncOutcome) {
        self.state = AppState::Normal;
        self.sync_started = None;
        self.status_message = None;

        let kind = if outcome.should_reload() {
            NotificationKind::Success
        } else {
            NotificationKind::Error
        };
        self.notify(tr(&outcome.message()), kind);

        if outcome.should_reload() && self.is_open(&campaign) {
            self.reload_record();
        }
    }

    // =========================================================================
    // Dashboard interaction
    // =========================================================================

    /// Open the recipient list for the tile at `index`
    pub fn activate_tile(&mut self, index: usize) {
        let Some(campaign) = self.record.as_ref().map(|r| r.name.clone()) else {
            return;
        };
        let Some(action) = self
            .dashboard
            .current()
            .and_then(|d| d.tile(index))
            .map(|t| t.action.token())
        else {
            return;
        };
        self.dashboard.select(index);
        show_recipients_list(self, &campaign, action);
    }

    pub fn activate_selected_tile(&mut self) {
        self.activate_tile(self.dashboard.selected());
    }

    // =========================================================================
    // Recipients
    // =========================================================================

    /// Load recipients for the current filter
    pub fn load_recipients(&mut self) {
        let Some(filter) = self.recipient_filter.clone() else {
            return;
        };
        let api = self.api.clone();
        let tx = self.result_tx.clone();
        let limit = self.config.recipient_page_length;
        self.recipients_loading = true;
        self.recipients_error = None;

        tokio::spawn(async move {
            let result = match api.fetch_recipients(&filter, limit).await {
                Ok(recipients) => BackgroundResult::Recipients { filter, recipients },
                Err(e) => {
                    error!(error = %e, "Failed to load recipients");
                    BackgroundResult::RecipientsFailed {
                        filter,
                        error: format!("{:#}", e),
                    }
                }
            };
            Self::send_result(&tx, result).await;
        });

        self.status_message = Some(tr("Loading recipients..."));
    }


    // =========================================================================
    // Background results
    // =========================================================================

    /// Helper to send results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<BackgroundResult>, result: BackgroundResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send background result - channel closed");
        }
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.process_result(result);
        }
    }

    fn process_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::Campaigns(list) => {
                self.campaigns_loading = false;
                self.status_message = None;
                self.campaign_selection = self.campaign_selection.min(list.len().saturating_sub(1));
                self.campaigns = list;
            }
            BackgroundResult::RecordLoaded(record) => {
                if !self.is_open(&record.name) {
                    debug!(campaign = %record.name, "Discarding record for a campaign no longer open");
                    return;
                }
                // Names resolve case-insensitively; keep the stored spelling
                self.current_campaign = Some(record.name.clone());
                self.record_loading = false;
                self.record_error = None;
                self.status_message = None;
                self.record = Some(record);
                // The record is the data-ready signal; only re-render if the
                // campaign view is the one showing.
                if self.view == View::Campaign {
                    self.activate_campaign_view();
                }
            }
            BackgroundResult::RecordFailed { campaign, error } => {
                if !self.is_open(&campaign) {
                    return;
                }
                self.record_loading = false;
                self.status_message = None;
                self.record_error = Some(error.clone());
                self.notify(error, NotificationKind::Error);
            }
            BackgroundResult::SyncFinished { campaign, outcome } => {
                self.finish_sync(campaign, outcome);
            }
            BackgroundResult::Recipients { filter, recipients } => {
                if self.recipient_filter.as_ref() != Some(&filter) {
                    return;
                }
                self.recipients_loading = false;
                self.status_message = None;
                self.recipient_selection = 0;
                self.recipients = recipients;
            }
            BackgroundResult::RecipientsFailed { filter, error } => {
                if self.recipient_filter.as_ref() != Some(&filter) {
                    return;
                }
                self.recipients_loading = false;
                self.status_message = None;
                self.recipients_error = Some(error);
            }
            BackgroundResult::Error(msg) => {
                self.campaigns_loading = false;
                self.status_message = None;
                self.notify(msg, NotificationKind::Error);
            }
        }
    }
}

impl Navigator for App {
    fn set_route(&mut self, route: Route) {
        match route {
            Route::List { doctype, filter } => {
                info!(doctype, campaign = %filter.campaign, action_type = %filter.action_type, "Showing list");
                self.view = View::Recipients;
                self.recipient_filter = Some(filter);
                self.recipients.clear();
                self.recipient_selection = 0;
                self.load_recipients();
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
