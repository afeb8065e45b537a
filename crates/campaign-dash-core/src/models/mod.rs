//! Data models for Frappe documents used by the dashboard.
//!
//! - `CampaignRecord`, `AnalyticsEntry`: the campaign being viewed and its metrics
//! - `CampaignSummary`: rows of the campaign picker
//! - `CampaignRecipient`: per-recipient actions shown in the detail list

mod de;

pub mod campaign;
pub mod recipient;

pub use campaign::{parse_frappe_datetime, AnalyticsEntry, CampaignRecord, CampaignSummary};
pub use recipient::CampaignRecipient;
