use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use campaign_dash_core::i18n::tr;
use campaign_dash_core::models::CampaignRecord;
use campaign_dash_core::utils::{format_datetime, format_percentage, format_value};

use crate::app::App;
use crate::ui::dashboard::{DashboardWidget, DASHBOARD_HEIGHT};
use crate::ui::styles;

const DETAILS_HEIGHT: u16 = 9;
/// Smallest analytics table the dashboard can be anchored above
const MIN_ANALYTICS_HEIGHT: u16 = 4;

/// Regions of the campaign view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignLayout {
    pub details: Rect,
    /// Dashboard row directly above the analytics table, when there is room
    pub dashboard: Option<Rect>,
    pub analytics: Rect,
}

/// Split the main area. The dashboard row is only reserved when one is
/// mounted and the analytics table below it still fits.
pub fn layout(area: Rect, with_dashboard: bool) -> CampaignLayout {
    let room = DETAILS_HEIGHT + DASHBOARD_HEIGHT + MIN_ANALYTICS_HEIGHT;

    if with_dashboard && area.height >= room {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(DETAILS_HEIGHT),
                Constraint::Length(DASHBOARD_HEIGHT),
                Constraint::Min(MIN_ANALYTICS_HEIGHT),
            ])
            .split(area);
        CampaignLayout {
            details: chunks[0],
            dashboard: Some(chunks[1]),
            analytics: chunks[2],
        }
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(DETAILS_HEIGHT), Constraint::Min(0)])
            .split(area);
        CampaignLayout {
            details: chunks[0],
            dashboard: None,
            analytics: chunks[1],
        }
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref record) = app.record else {
        render_placeholder(frame, app, area);
        return;
    };

    let regions = layout(area, app.dashboard.current().is_some());

    render_details(frame, record, regions.details);

    if let (Some(dashboard), Some(dashboard_area)) = (app.dashboard.current(), regions.dashboard) {
        let widget = DashboardWidget::new(dashboard)
            .hovered(app.dashboard.hovered())
            .selected(Some(app.dashboard.selected()));
        frame.render_widget(widget, dashboard_area);
    }

    render_analytics(frame, record, regions.analytics);
}

fn render_placeholder(frame: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(ref error) = app.record_error {
        Line::from(Span::styled(format!(" {}", error), styles::error_style()))
    } else {
        Line::from(Span::styled(
            format!(" {}", tr("Loading campaign...")),
            styles::muted_style(),
        ))
    };

    let title = app
        .current_campaign
        .as_deref()
        .map(|n| format!(" {} ", n))
        .unwrap_or_default();

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true)),
    );
    frame.render_widget(paragraph, area);
}

fn field<'a>(label: &str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<14}", tr(label)), styles::muted_style()),
        Span::raw(value),
    ])
}

fn or_dash(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn render_details(frame: &mut Frame, record: &CampaignRecord, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            record.display_name().to_string(),
            styles::title_style(),
        )),
        field("Subject:", or_dash(&record.zoho_subject)),
        field("From:", or_dash(&record.zoho_from_email)),
        field("Status:", or_dash(&record.zoho_campaign_status)),
        field(
            "Sent:",
            record
                .zoho_sent_time
                .as_deref()
                .map(format_datetime)
                .unwrap_or_else(|| "-".to_string()),
        ),
        field(
            "Last synced:",
            record
                .last_synced
                .as_deref()
                .map(format_datetime)
                .unwrap_or_else(|| tr("Never")),
        ),
    ];

    if !record.has_zoho_link() {
        lines.push(Line::from(Span::styled(
            tr("Not linked to a Zoho campaign"),
            styles::muted_style(),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(format!(" {} ", record.name))
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(paragraph, area);
}

fn render_analytics(frame: &mut Frame, record: &CampaignRecord, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", tr("Campaign Analytics")))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    if record.campaign_analytics.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!(" {}", tr("No analytics yet")),
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new([
        Cell::from(tr("Metric")),
        Cell::from(tr("Value")),
        Cell::from(tr("Percentage")),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = record
        .campaign_analytics
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(entry.metric.clone()),
                Cell::from(format_value(entry.value)),
                Cell::from(entry.percentage.map(format_percentage).unwrap_or_default()),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
