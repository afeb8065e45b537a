use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use campaign_dash_core::i18n::tr;
use campaign_dash_core::utils::format_datetime;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let scope = if app.config.show_all_campaigns {
        tr("all")
    } else {
        tr("linked to Zoho")
    };
    let title = format!(" {} ({}, {}) ", tr("Campaigns"), app.campaigns.len(), scope);

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.campaigns.is_empty() {
        let text = if app.campaigns_loading {
            tr("Loading campaigns...")
        } else {
            tr("No campaigns found")
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!(" {}", text),
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new([
        Cell::from(tr("Campaign")),
        Cell::from(tr("Status")),
        Cell::from(tr("Sent")),
        Cell::from(tr("Last synced")),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .campaigns
        .iter()
        .enumerate()
        .map(|(i, campaign)| {
            let style = if i == app.campaign_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let when = |value: &Option<String>| {
                value
                    .as_deref()
                    .map(format_datetime)
                    .unwrap_or_else(|| "-".to_string())
            };

            Row::new(vec![
                Cell::from(campaign.display_name().to_string()),
                Cell::from(campaign.zoho_campaign_status.clone().unwrap_or_default()),
                Cell::from(when(&campaign.zoho_sent_time)),
                Cell::from(when(&campaign.last_synced)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Length(20),
        Constraint::Length(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.campaign_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
