use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use campaign_dash_core::i18n::tr;
use campaign_dash_core::navigation::RECIPIENT_DOCTYPE;
use campaign_dash_core::utils::{format_datetime, truncate_string};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let filter_text = app
        .recipient_filter
        .as_ref()
        .map(|f| format!("campaign = {} · action_type ~ {}", f.campaign, f.action_type))
        .unwrap_or_default();
    let title = format!(
        " {} ({}) - {} ",
        tr(RECIPIENT_DOCTYPE),
        app.recipients.len(),
        filter_text
    );

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let message = if let Some(ref error) = app.recipients_error {
        Some(Span::styled(format!(" {}", error), styles::error_style()))
    } else if app.recipients_loading && app.recipients.is_empty() {
        Some(Span::styled(
            format!(" {}", tr("Loading recipients...")),
            styles::muted_style(),
        ))
    } else if app.recipients.is_empty() {
        Some(Span::styled(
            format!(" {}", tr("No recipients match this filter")),
            styles::muted_style(),
        ))
    } else {
        None
    };

    if let Some(message) = message {
        frame.render_widget(Paragraph::new(Line::from(message)).block(block), area);
        return;
    }

    let header = Row::new([
        Cell::from(tr("Name")),
        Cell::from(tr("Email")),
        Cell::from(tr("Action")),
        Cell::from(tr("Opens")),
        Cell::from(tr("Location")),
        Cell::from(tr("Date")),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .recipients
        .iter()
        .enumerate()
        .map(|(i, recipient)| {
            let style = if i == app.recipient_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            Row::new(vec![
                Cell::from(truncate_string(recipient.display_name(), 28)),
                Cell::from(recipient.email.clone()),
                Cell::from(recipient.action_type.clone()),
                Cell::from(recipient.opens().to_string()),
                Cell::from(recipient.location().unwrap_or_else(|| "-".to_string())),
                Cell::from(
                    recipient
                        .action_date
                        .as_deref()
                        .map(format_datetime)
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(25),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.recipient_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
