use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use campaign_dash_core::i18n::tr;
use campaign_dash_core::sync::{SYNC_BUSY_MESSAGE, SYNC_GROUP};

use crate::app::{App, AppState, NotificationKind, View};

use super::dashboard;
use super::styles;
use super::views::{campaign, picker, recipients};

fn frame_chunks(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Action bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area)
}

/// Region the current view draws into
pub fn main_area(area: Rect) -> Rect {
    frame_chunks(area)[2]
}

/// Dashboard tile under a terminal cell, using the last drawn viewport
pub fn tile_under(app: &App, column: u16, row: u16) -> Option<usize> {
    if app.view != View::Campaign || app.record.is_none() {
        return None;
    }
    let count = app.dashboard.current()?.len();
    let regions = campaign::layout(main_area(app.viewport), true);
    dashboard::tile_at(regions.dashboard?, count, Position::new(column, row))
}

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = frame_chunks(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_action_bar(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::Syncing => render_busy_overlay(frame, app),
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Campaign Dashboard";
    let site = app.site_url();
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(format!("  {}", site), styles::muted_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.len() + site.chars().count() + help_hint.len() + 6),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

/// Breadcrumbs on the left, host actions on the right
fn render_action_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut crumbs = vec![tr("Campaigns")];
    if app.view != View::Picker {
        if let Some(ref name) = app.current_campaign {
            crumbs.push(name.clone());
        }
    }
    if app.view == View::Recipients {
        if let Some(ref filter) = app.recipient_filter {
            crumbs.push(format!("{} ({})", tr("Recipients"), filter.action_type));
        }
    }

    let mut spans = vec![Span::raw(" ")];
    let last = crumbs.len() - 1;
    for (i, crumb) in crumbs.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", styles::muted_style()));
        }
        let style = if i == last {
            styles::highlight_style()
        } else {
            styles::muted_style()
        };
        spans.push(Span::styled(crumb, style));
    }

    if app.view == View::Campaign {
        if let Some(ref action) = app.sync_action {
            let group = format!("{}: ", tr(SYNC_GROUP));
            let button = format!(" [s] {} ", tr(action.label()));
            let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
            let padding = (area.width as usize)
                .saturating_sub(used + group.chars().count() + button.chars().count() + 1);
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(Span::styled(group, styles::muted_style()));
            spans.push(Span::styled(button, styles::action_button_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Picker => picker::render(frame, app, area),
        View::Campaign => campaign::render(frame, app, area),
        View::Recipients => recipients::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.view {
        View::Picker => "[Enter] open | [r]eload | [q]uit",
        View::Campaign => "[←/→] tile | [Enter] recipients | [r]eload | [Esc] back | [q]uit",
        View::Recipients => "[↑/↓] move | [r]eload | [Esc] back | [q]uit",
    };

    let (left_text, left_style) = if let Some(ref n) = app.notification {
        let style = match n.kind {
            NotificationKind::Success => styles::success_style(),
            NotificationKind::Error => styles::error_style(),
        };
        (format!(" {} ", n.message), style)
    } else if let Some(ref msg) = app.status_message {
        (format!(" {} ", msg), styles::muted_style())
    } else {
        (String::new(), styles::muted_style())
    };

    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Blocking indicator while a sync is in flight
fn render_busy_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(44, 7, frame.area());
    frame.render_widget(Clear, area);

    let elapsed = app
        .sync_started
        .map(|t| t.elapsed().as_secs())
        .unwrap_or(0);
    const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
    let frame_idx = (elapsed as usize) % SPINNER.len();

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {} ", SPINNER[frame_idx]), styles::highlight_style()),
            Span::styled(tr(SYNC_BUSY_MESSAGE), styles::highlight_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}s", elapsed),
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(key, styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 22, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(" Campaign Dashboard", styles::title_style())),
        Line::from(Span::styled(
            format!(" version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("  ↑/↓ j/k   ", "Move in lists"),
        help_line("  ←/→ h/l   ", "Select dashboard tile"),
        help_line("  1-5       ", "Open tile by position"),
        help_line("  Enter     ", "Open campaign / tile recipients"),
        help_line("  Esc       ", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("  s         ", "Sync from Zoho"),
        help_line("  r         ", "Reload"),
        help_line("  a         ", "Toggle unlinked campaigns"),
        help_line("  q         ", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Mouse", styles::highlight_style())),
        help_line("  hover     ", "Raise tile"),
        help_line("  click     ", "Open tile recipients"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 6, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
