//! The fixed metric catalog the dashboard always attempts to display.

use std::fmt;

use serde::Serialize;

/// Action category used to filter the recipient list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionType {
    Opened,
    Clicked,
    Bounced,
    Unsubscribed,
    Complaint,
}

impl ActionType {
    /// Token stored on recipient rows and carried in navigation filters.
    pub fn token(&self) -> &'static str {
        match self {
            ActionType::Opened => "Opened",
            ActionType::Clicked => "Clicked",
            ActionType::Bounced => "Bounced",
            ActionType::Unsubscribed => "Unsubscribed",
            ActionType::Complaint => "Complaint",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An sRGB color from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

/// One catalog row: label substring to match, action token, display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricCatalogEntry {
    pub label: &'static str,
    pub action: ActionType,
    pub color: Rgb,
}

/// Catalog in display order.
pub const METRIC_CATALOG: [MetricCatalogEntry; 5] = [
    MetricCatalogEntry {
        label: "Opens",
        action: ActionType::Opened,
        color: Rgb(0x5e, 0x64, 0xff),
    },
    MetricCatalogEntry {
        label: "Unique Clicks",
        action: ActionType::Clicked,
        color: Rgb(0x58, 0x56, 0xd6),
    },
    MetricCatalogEntry {
        label: "Bounces",
        action: ActionType::Bounced,
        color: Rgb(0xff, 0x95, 0x00),
    },
    MetricCatalogEntry {
        label: "Unsubscribes",
        action: ActionType::Unsubscribed,
        color: Rgb(0xff, 0x3b, 0x30),
    },
    MetricCatalogEntry {
        label: "Spam Complaints",
        action: ActionType::Complaint,
        color: Rgb(0xff, 0x2d, 0x55),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_tokens() {
        let labels: Vec<&str> = METRIC_CATALOG.iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            ["Opens", "Unique Clicks", "Bounces", "Unsubscribes", "Spam Complaints"]
        );
        let tokens: Vec<&str> = METRIC_CATALOG.iter().map(|e| e.action.token()).collect();
        assert_eq!(tokens, ["Opened", "Clicked", "Bounced", "Unsubscribed", "Complaint"]);
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(METRIC_CATALOG[0].color.hex(), "#5e64ff");
        assert_eq!(METRIC_CATALOG[4].color.hex(), "#ff2d55");
    }
}
