//! Campaign analytics dashboard.
//!
//! The dashboard is a pure function of a campaign's analytics entries:
//! [`render_dashboard`] turns them into at most one tile per catalog entry and
//! the host mounts the result through a [`DashboardMount`], which always
//! replaces the whole dashboard rather than patching it.

pub mod catalog;

use serde::Serialize;
use tracing::debug;

use crate::models::AnalyticsEntry;
use crate::utils::{format_percentage, format_value};

pub use catalog::{ActionType, MetricCatalogEntry, Rgb, METRIC_CATALOG};

/// One rendered metric tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    /// Catalog label, e.g. "Unique Clicks"
    pub label: &'static str,
    pub action: ActionType,
    pub color: Rgb,
    /// Label of the analytics entry backing this tile
    pub metric: String,
    pub value: f64,
    pub percentage: Option<f64>,
}

impl Tile {
    fn from_match(entry: &MetricCatalogEntry, matched: &AnalyticsEntry) -> Self {
        Self {
            label: entry.label,
            action: entry.action,
            color: entry.color,
            metric: matched.metric.clone(),
            value: matched.value,
            // Zero reads as "no percentage", same as an empty field.
            percentage: matched.percentage.filter(|p| *p != 0.0 && !p.is_nan()),
        }
    }

    pub fn display_label(&self) -> String {
        self.label.to_uppercase()
    }

    pub fn display_value(&self) -> String {
        format_value(self.value)
    }

    /// Secondary line, only present when the entry carries a percentage.
    pub fn display_percentage(&self) -> Option<String> {
        self.percentage.map(format_percentage)
    }
}

/// A full set of tiles, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub tiles: Vec<Tile>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }
}

/// Find the first analytics entry whose label contains `label` (case-sensitive).
pub fn find_metric<'a>(analytics: &'a [AnalyticsEntry], label: &str) -> Option<&'a AnalyticsEntry> {
    analytics.iter().find(|m| m.metric.contains(label))
}

/// Build the dashboard for a set of analytics entries.
///
/// Returns `None` when there are no entries at all. Catalog entries without a
/// matching analytics entry are skipped, so the dashboard may hold fewer than
/// five tiles, or none.
pub fn render_dashboard(analytics: &[AnalyticsEntry]) -> Option<Dashboard> {
    if analytics.is_empty() {
        return None;
    }

    let tiles: Vec<Tile> = METRIC_CATALOG
        .iter()
        .filter_map(|entry| find_metric(analytics, entry.label).map(|m| Tile::from_match(entry, m)))
        .collect();

    debug!(entries = analytics.len(), tiles = tiles.len(), "Rendered dashboard");
    Some(Dashboard { tiles })
}

/// The single place a view holds its dashboard, plus the interaction state
/// that belongs to the mounted instance.
#[derive(Debug, Default)]
pub struct DashboardMount {
    dashboard: Option<Dashboard>,
    selected: usize,
    hovered: Option<usize>,
    generation: u64,
}

impl DashboardMount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is mounted with `next`.
    ///
    /// The previous dashboard and its hover/selection state are dropped before
    /// the new one is installed, so at most one dashboard exists at a time.
    pub fn mount(&mut self, next: Option<Dashboard>) {
        self.unmount();
        self.dashboard = next;
        self.generation += 1;
    }

    pub fn unmount(&mut self) {
        self.dashboard = None;
        self.selected = 0;
        self.hovered = None;
    }

    /// Mounted dashboard, if it has at least one tile to draw.
    pub fn current(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref().filter(|d| !d.is_empty())
    }

    /// Incremented on every mount; lets callers detect a replaced dashboard.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_tile(&self) -> Option<&Tile> {
        self.current().and_then(|d| d.tile(self.selected))
    }

    pub fn select_next(&mut self) {
        if let Some(len) = self.current().map(Dashboard::len) {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select(&mut self, index: usize) {
        if self.current().map(|d| index < d.len()).unwrap_or(false) {
            self.selected = index;
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Update the hovered tile. Returns true when hover entered or left a tile.
    pub fn set_hovered(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|i| self.current().map(|d| *i < d.len()).unwrap_or(false));
        if self.hovered == index {
            return false;
        }
        self.hovered = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(metric: &str, value: f64, percentage: Option<f64>) -> AnalyticsEntry {
        AnalyticsEntry::new(metric, value, percentage)
    }

    #[test]
    fn test_empty_analytics_renders_nothing() {
        assert_eq!(render_dashboard(&[]), None);

        let mut mount = DashboardMount::new();
        mount.mount(render_dashboard(&[]));
        assert!(mount.current().is_none());
    }

    #[test]
    fn test_opens_and_clicks_example() {
        let analytics = vec![
            entry("Total Opens", 120.0, Some(40.0)),
            entry("Unique Clicks", 30.0, None),
        ];
        let dashboard = render_dashboard(&analytics).expect("dashboard");

        assert_eq!(dashboard.len(), 2);
        let opens = &dashboard.tiles[0];
        assert_eq!(opens.label, "Opens");
        assert_eq!(opens.display_label(), "OPENS");
        assert_eq!(opens.display_value(), "120");
        assert_eq!(opens.display_percentage().as_deref(), Some("40%"));
        assert_eq!(opens.action, ActionType::Opened);

        let clicks = &dashboard.tiles[1];
        assert_eq!(clicks.label, "Unique Clicks");
        assert_eq!(clicks.display_value(), "30");
        assert_eq!(clicks.display_percentage(), None);
        assert_eq!(clicks.action.token(), "Clicked");
    }

    #[test]
    fn test_tile_order_follows_catalog() {
        let analytics = vec![
            entry("Spam Complaints", 1.0, None),
            entry("Unsubscribes", 2.0, None),
            entry("Bounces", 3.0, None),
            entry("Unique Clicks", 4.0, None),
            entry("Opens", 5.0, None),
        ];
        let dashboard = render_dashboard(&analytics).expect("dashboard");
        let labels: Vec<&str> = dashboard.tiles.iter().map(|t| t.label).collect();
        assert_eq!(
            labels,
            ["Opens", "Unique Clicks", "Bounces", "Unsubscribes", "Spam Complaints"]
        );
        let values: Vec<f64> = dashboard.tiles.iter().map(|t| t.value).collect();
        assert_eq!(values, [5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_first_containing_entry_wins() {
        let analytics = vec![
            entry("Soft Bounces", 4.0, None),
            entry("Hard Bounces", 9.0, None),
        ];
        let dashboard = render_dashboard(&analytics).expect("dashboard");
        assert_eq!(dashboard.len(), 1);
        assert_eq!(dashboard.tiles[0].label, "Bounces");
        assert_eq!(dashboard.tiles[0].metric, "Soft Bounces");
        assert_eq!(dashboard.tiles[0].value, 4.0);
    }

    #[test]
    fn test_bounced_labels_do_not_contain_bounces() {
        // "Bounced" is not a superstring of "Bounces"; containment is literal.
        let analytics = vec![
            entry("Soft Bounced", 4.0, None),
            entry("Hard Bounced", 9.0, None),
        ];
        let dashboard = render_dashboard(&analytics).expect("dashboard");
        assert!(dashboard.is_empty());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let analytics = vec![entry("total opens", 10.0, None), entry("OPENS", 11.0, None)];
        let dashboard = render_dashboard(&analytics).expect("dashboard");
        assert!(dashboard.is_empty());
    }

    #[test]
    fn test_rate_rows_can_shadow_counts() {
        // Synced records list "Open Rate %" after "Opens"; first match is the count.
        let analytics = vec![
            entry("Emails Sent", 300.0, None),
            entry("Opens", 120.0, None),
            entry("Open Rate %", 40.0, Some(40.0)),
        ];
        let dashboard = render_dashboard(&analytics).expect("dashboard");
        assert_eq!(dashboard.tiles[0].metric, "Opens");
        assert_eq!(dashboard.tiles[0].percentage, None);
    }

    #[test]
    fn test_zero_percentage_is_hidden() {
        let dashboard = render_dashboard(&[entry("Opens", 0.0, Some(0.0))]).expect("dashboard");
        assert_eq!(dashboard.tiles[0].display_value(), "0");
        assert_eq!(dashboard.tiles[0].display_percentage(), None);
    }

    #[test]
    fn test_repeated_mounts_leave_single_identical_dashboard() {
        let analytics = vec![entry("Opens", 5.0, Some(12.5)), entry("Bounces", 1.0, None)];

        let mut once = DashboardMount::new();
        once.mount(render_dashboard(&analytics));

        let mut many = DashboardMount::new();
        for _ in 0..5 {
            many.mount(render_dashboard(&analytics));
        }

        assert_eq!(once.current(), many.current());
        assert_eq!(many.current().map(Dashboard::len), Some(2));
        assert_eq!(many.generation(), 5);
    }

    #[test]
    fn test_remount_resets_interaction_state() {
        let analytics = vec![entry("Opens", 5.0, None), entry("Bounces", 1.0, None)];
        let mut mount = DashboardMount::new();
        mount.mount(render_dashboard(&analytics));
        mount.select_next();
        assert!(mount.set_hovered(Some(1)));
        assert_eq!(mount.selected(), 1);

        mount.mount(render_dashboard(&analytics));
        assert_eq!(mount.selected(), 0);
        assert_eq!(mount.hovered(), None);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut mount = DashboardMount::new();
        mount.mount(render_dashboard(&[entry("Opens", 1.0, None), entry("Unique Clicks", 2.0, None)]));
        mount.select_next();
        mount.select_next();
        assert_eq!(mount.selected(), 1);
        mount.select_prev();
        mount.select_prev();
        assert_eq!(mount.selected(), 0);
        mount.select(7);
        assert_eq!(mount.selected(), 0);
        assert_eq!(mount.selected_tile().map(|t| t.label), Some("Opens"));
    }

    #[test]
    fn test_hover_enter_and_leave() {
        let mut mount = DashboardMount::new();
        mount.mount(render_dashboard(&[entry("Opens", 1.0, None)]));
        assert!(mount.set_hovered(Some(0)));
        assert!(!mount.set_hovered(Some(0)));
        assert!(mount.set_hovered(None));
        // Out-of-range hover is ignored
        assert!(!mount.set_hovered(Some(3)));
        assert_eq!(mount.hovered(), None);
    }
}
