//! Campaign document models.
//!
//! `CampaignRecord` mirrors the ERPNext `Campaign` doctype extended by the Zoho
//! integration. Only the fields the dashboard and detail panel read are
//! modelled; unknown fields are ignored.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use super::de::{deserialize_non_empty, deserialize_null_as_empty, deserialize_optional_number};

/// A Campaign record as loaded from the Frappe site.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CampaignRecord {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub campaign_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_campaign_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_campaign_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_subject: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_from_email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_reply_to: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_campaign_status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_campaign_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_preview_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_sent_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub last_synced: Option<String>,
    #[serde(default)]
    pub campaign_analytics: Vec<AnalyticsEntry>,
}

impl CampaignRecord {
    /// Title for headers: the campaign name when set, otherwise the document name.
    pub fn display_name(&self) -> &str {
        self.campaign_name.as_deref().unwrap_or(&self.name)
    }

    /// True when the record is linked to a Zoho campaign: any non-empty key.
    pub fn has_zoho_link(&self) -> bool {
        self.zoho_campaign_key
            .as_deref()
            .map(|k| !k.is_empty())
            .unwrap_or(false)
    }
}

/// One row of the `campaign_analytics` child table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsEntry {
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub metric: String,
    /// Reads as 0 when empty or not a number
    #[serde(default, deserialize_with = "deserialize_number")]
    pub value: f64,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub percentage: Option<f64>,
}

impl AnalyticsEntry {
    pub fn new(metric: &str, value: f64, percentage: Option<f64>) -> Self {
        Self {
            metric: metric.to_string(),
            value,
            percentage,
        }
    }
}

/// Row shape of the campaign picker list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CampaignSummary {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub campaign_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_campaign_status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub zoho_sent_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub last_synced: Option<String>,
}

impl CampaignSummary {
    pub fn display_name(&self) -> &str {
        self.campaign_name.as_deref().unwrap_or(&self.name)
    }
}

fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_number(deserializer)?.unwrap_or(0.0))
}

/// Parse the datetime formats Frappe emits (`2024-05-01 10:30:00[.ffffff]`).
pub fn parse_frappe_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_campaign_with_string_values() {
        let json = r#"{
            "name": "SAL-CAM-2024-00001",
            "campaign_name": "Spring Launch",
            "zoho_campaign_key": "3z1a2b",
            "zoho_sent_time": "2024-04-02 09:15:00",
            "campaign_analytics": [
                {"metric": "Opens", "value": "120", "percentage": null},
                {"metric": "Open Rate %", "value": "40.5", "percentage": 40.5},
                {"metric": "Forwards", "value": 3}
            ]
        }"#;

        let record: CampaignRecord = serde_json::from_str(json).expect("parse campaign");
        assert_eq!(record.display_name(), "Spring Launch");
        assert!(record.has_zoho_link());
        assert_eq!(record.campaign_analytics.len(), 3);
        assert_eq!(record.campaign_analytics[0].value, 120.0);
        assert_eq!(record.campaign_analytics[0].percentage, None);
        assert_eq!(record.campaign_analytics[1].percentage, Some(40.5));
        assert_eq!(record.campaign_analytics[2].value, 3.0);
    }

    #[test]
    fn test_empty_zoho_key_is_not_a_link() {
        let record: CampaignRecord =
            serde_json::from_str(r#"{"name": "CAMP-001", "zoho_campaign_key": ""}"#).expect("parse");
        assert_eq!(record.zoho_campaign_key, None);
        assert!(!record.has_zoho_link());

        let record: CampaignRecord = serde_json::from_str(r#"{"name": "CAMP-001"}"#).expect("parse");
        assert!(!record.has_zoho_link());
        assert!(record.campaign_analytics.is_empty());
        assert_eq!(record.display_name(), "CAMP-001");
    }

    #[test]
    fn test_whitespace_zoho_key_is_a_link() {
        let record: CampaignRecord =
            serde_json::from_str(r#"{"name": "CAMP-001", "zoho_campaign_key": "   "}"#).expect("parse");
        assert_eq!(record.zoho_campaign_key.as_deref(), Some("   "));
        assert!(record.has_zoho_link());
    }

    #[test]
    fn test_bad_analytics_rows_do_not_fail_the_record() {
        let json = r#"{
            "name": "CAMP-001",
            "zoho_campaign_key": "zk",
            "campaign_analytics": [
                {"metric": null, "value": "3"},
                {"metric": "Forwards", "value": "N/A", "percentage": "n/a"},
                {"metric": "Opens", "value": "12"}
            ]
        }"#;

        let record: CampaignRecord = serde_json::from_str(json).expect("parse campaign");
        assert_eq!(record.campaign_analytics.len(), 3);
        assert_eq!(record.campaign_analytics[0].metric, "");
        assert_eq!(record.campaign_analytics[0].value, 3.0);
        assert_eq!(record.campaign_analytics[1].value, 0.0);
        assert_eq!(record.campaign_analytics[1].percentage, None);
        assert_eq!(record.campaign_analytics[2].value, 12.0);
    }

    #[test]
    fn test_empty_percentage_string_is_none() {
        let entry: AnalyticsEntry =
            serde_json::from_str(r#"{"metric": "Bounces", "value": "7", "percentage": ""}"#)
                .expect("parse");
        assert_eq!(entry.value, 7.0);
        assert_eq!(entry.percentage, None);
    }

    #[test]
    fn test_parse_frappe_datetime_formats() {
        assert!(parse_frappe_datetime("2024-05-01 10:30:00").is_some());
        assert!(parse_frappe_datetime("2024-05-01 10:30:00.123456").is_some());
        assert!(parse_frappe_datetime("2024-05-01T10:30:00").is_some());
        assert!(parse_frappe_datetime("yesterday").is_none());
    }
}
