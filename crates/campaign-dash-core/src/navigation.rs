//! Routing from a dashboard tile to the filtered recipient list.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// Doctype of the recipient detail list.
pub const RECIPIENT_DOCTYPE: &str = "Campaign Recipient";

/// Filter state handed to the recipient list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientFilter {
    pub campaign: String,
    pub action_type: String,
}

impl RecipientFilter {
    pub fn new(campaign: &str, action_type: &str) -> Self {
        Self {
            campaign: campaign.to_string(),
            action_type: action_type.to_string(),
        }
    }

    /// Frappe REST filters for this state.
    ///
    /// `action_type` uses containment so that `Bounced` also lists the stored
    /// `Hard Bounced` and `Soft Bounced` actions.
    pub fn query_filters(&self) -> Value {
        json!([
            ["campaign", "=", self.campaign],
            ["action_type", "like", format!("%{}%", self.action_type)],
        ])
    }
}

/// A navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// List view of `doctype` scoped to the given filter.
    List {
        doctype: &'static str,
        filter: RecipientFilter,
    },
}

/// Anything that can act on a navigation request.
pub trait Navigator {
    fn set_route(&mut self, route: Route);
}

/// Route to the recipient list for one campaign and action category.
pub fn show_recipients_list<N: Navigator + ?Sized>(nav: &mut N, campaign: &str, action_type: &str) {
    let filter = RecipientFilter::new(campaign, action_type);
    debug!(campaign = %filter.campaign, action_type = %filter.action_type, "Routing to recipient list");
    nav.set_route(Route::List {
        doctype: RECIPIENT_DOCTYPE,
        filter,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Vec<Route>,
    }

    impl Navigator for RecordingNavigator {
        fn set_route(&mut self, route: Route) {
            self.routes.push(route);
        }
    }

    #[test]
    fn test_filter_state_has_exactly_campaign_and_action() {
        let mut nav = RecordingNavigator::default();
        show_recipients_list(&mut nav, "CAMP-001", "Clicked");

        assert_eq!(
            nav.routes,
            vec![Route::List {
                doctype: "Campaign Recipient",
                filter: RecipientFilter::new("CAMP-001", "Clicked"),
            }]
        );

        let Route::List { filter, .. } = &nav.routes[0];
        assert_eq!(
            serde_json::to_value(filter).expect("serialize"),
            json!({"campaign": "CAMP-001", "action_type": "Clicked"})
        );
    }

    #[test]
    fn test_query_filters() {
        let filter = RecipientFilter::new("CAMP-001", "Bounced");
        assert_eq!(
            filter.query_filters(),
            json!([["campaign", "=", "CAMP-001"], ["action_type", "like", "%Bounced%"]])
        );
    }
}
