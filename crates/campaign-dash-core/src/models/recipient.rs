use serde::{Deserialize, Serialize};

use super::de::{
    deserialize_check, deserialize_non_empty, deserialize_null_as_empty, deserialize_optional_number,
};

/// One recipient action row (`Campaign Recipient` doctype).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CampaignRecipient {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub campaign: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub action_type: String,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub open_count: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub action_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub contact_status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_check")]
    pub is_spam: bool,
    #[serde(default, deserialize_with = "deserialize_check")]
    pub is_optout: bool,
}

impl CampaignRecipient {
    /// Name for list display, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }

    /// "City, State, Country" with missing parts skipped.
    pub fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.city.as_deref(),
            self.state.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    pub fn opens(&self) -> u32 {
        self.open_count.map(|c| c.max(0.0) as u32).unwrap_or(0)
    }
}
