//! Keyboard and mouse input handling for the TUI.
//!
//! This module translates terminal events into application state changes.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, AppState, View, PAGE_SCROLL_SIZE};
use crate::ui::render::tile_under;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        // The sync overlay blocks everything until the call returns
        AppState::Syncing | AppState::Quitting => return false,
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return false;
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return true;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return false;
        }
        AppState::Normal => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return false;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return false;
        }
        KeyCode::Esc | KeyCode::Backspace => {
            app.go_back();
            return false;
        }
        _ => {}
    }

    match app.view {
        View::Picker => handle_picker_input(app, key),
        View::Campaign => handle_campaign_input(app, key),
        View::Recipients => handle_recipients_input(app, key),
    }
    false
}

fn move_selection(selection: &mut usize, len: usize, key: KeyCode) {
    if len == 0 {
        *selection = 0;
        return;
    }
    let last = len - 1;
    *selection = match key {
        KeyCode::Up | KeyCode::Char('k') => selection.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => (*selection + 1).min(last),
        KeyCode::PageUp => selection.saturating_sub(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => (*selection + PAGE_SCROLL_SIZE).min(last),
        KeyCode::Home => 0,
        KeyCode::End => last,
        _ => *selection,
    };
}

fn handle_picker_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            if let Some(name) = app.selected_campaign().map(|c| c.name.clone()) {
                app.open_campaign(&name);
            }
        }
        KeyCode::Char('r') => app.load_campaigns(),
        KeyCode::Char('a') => {
            app.config.show_all_campaigns = !app.config.show_all_campaigns;
            app.load_campaigns();
        }
        code => move_selection(&mut app.campaign_selection, app.campaigns.len(), code),
    }
}

fn handle_campaign_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') => app.start_sync(),
        KeyCode::Char('r') => app.reload_record(),
        KeyCode::Left | KeyCode::Char('h') => app.dashboard.select_prev(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.dashboard.select_next(),
        KeyCode::Enter => app.activate_selected_tile(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.activate_tile(index);
        }
        _ => {}
    }
}

fn handle_recipients_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.load_recipients(),
        code => move_selection(&mut app.recipient_selection, app.recipients.len(), code),
    }
}

/// Handle mouse input: hover raises a tile, a left click opens its recipients
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.state != AppState::Normal {
        return;
    }

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            let tile = tile_under(app, mouse.column, mouse.row);
            app.dashboard.set_hovered(tile);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = tile_under(app, mouse.column, mouse.row) {
                app.activate_tile(index);
            }
        }
        MouseEventKind::ScrollDown => scroll(app, KeyCode::Down),
        MouseEventKind::ScrollUp => scroll(app, KeyCode::Up),
        _ => {}
    }
}

fn scroll(app: &mut App, code: KeyCode) {
    match app.view {
        View::Picker => move_selection(&mut app.campaign_selection, app.campaigns.len(), code),
        View::Recipients => move_selection(&mut app.recipient_selection, app.recipients.len(), code),
        View::Campaign => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_dash_core::api::FrappeClient;
    use campaign_dash_core::config::Config;
    use campaign_dash_core::models::{AnalyticsEntry, CampaignRecord};
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    use crate::ui::render::main_area;
    use crate::ui::views::campaign;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn campaign_app() -> App {
        let api = FrappeClient::new("http://127.0.0.1:9").expect("client");
        let mut app = App::with_client(Config::default(), api);
        app.viewport = Rect::new(0, 0, 100, 40);
        app.current_campaign = Some("CAMP-001".to_string());
        app.record = Some(CampaignRecord {
            name: "CAMP-001".to_string(),
            zoho_campaign_key: Some("zk".to_string()),
            campaign_analytics: vec![
                AnalyticsEntry::new("Opens", 10.0, Some(50.0)),
                AnalyticsEntry::new("Bounces", 2.0, None),
            ],
            ..Default::default()
        });
        app.activate_campaign_view();
        app
    }

    fn tile_row(app: &App) -> u16 {
        campaign::layout(main_area(app.viewport), true)
            .dashboard
            .expect("dashboard row")
            .y
            + 2
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    #[test]
    fn test_quit_requires_confirmation() {
        let mut app = campaign_app();
        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))));
        assert_eq!(app.state, AppState::Normal);
        handle_input(&mut app, key(KeyCode::Char('q')));
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))));
    }

    #[test]
    fn test_input_ignored_while_syncing() {
        let mut app = campaign_app();
        app.state = AppState::Syncing;
        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))));
        assert!(!handle_input(&mut app, key(KeyCode::Right)));
        assert_eq!(app.state, AppState::Syncing);
        assert_eq!(app.dashboard.selected(), 0);
    }

    #[test]
    fn test_arrow_keys_select_tiles() {
        let mut app = campaign_app();
        handle_input(&mut app, key(KeyCode::Right));
        assert_eq!(app.dashboard.selected(), 1);
        handle_input(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.dashboard.selected(), 0);
    }

    #[tokio::test]
    async fn test_enter_opens_selected_tile() {
        let mut app = campaign_app();
        handle_input(&mut app, key(KeyCode::Right));
        handle_input(&mut app, key(KeyCode::Enter));
        assert_eq!(app.view, View::Recipients);
        assert_eq!(
            app.recipient_filter.as_ref().map(|f| f.action_type.as_str()),
            Some("Bounced")
        );
    }

    #[tokio::test]
    async fn test_digit_out_of_range_does_nothing() {
        let mut app = campaign_app();
        handle_input(&mut app, key(KeyCode::Char('5')));
        assert_eq!(app.view, View::Campaign);
    }

    #[test]
    fn test_move_selection_bounds() {
        let mut sel = 0;
        move_selection(&mut sel, 3, KeyCode::Up);
        assert_eq!(sel, 0);
        move_selection(&mut sel, 3, KeyCode::PageDown);
        assert_eq!(sel, 2);
        move_selection(&mut sel, 0, KeyCode::Down);
        assert_eq!(sel, 0);
    }

    // -------------------------------------------------------------------------
    // Mouse
    // -------------------------------------------------------------------------

    #[test]
    fn test_hover_enter_and_leave() {
        let mut app = campaign_app();
        let row = tile_row(&app);

        handle_mouse(&mut app, mouse(MouseEventKind::Moved, 30, row));
        assert_eq!(app.dashboard.hovered(), Some(1));

        handle_mouse(&mut app, mouse(MouseEventKind::Moved, 30, 1));
        assert_eq!(app.dashboard.hovered(), None);
    }

    #[tokio::test]
    async fn test_click_tile_routes_with_action_type() {
        let mut app = campaign_app();
        let row = tile_row(&app);

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 2, row));

        assert_eq!(app.view, View::Recipients);
        let filter = app.recipient_filter.as_ref().expect("filter");
        assert_eq!(filter.campaign, "CAMP-001");
        assert_eq!(filter.action_type, "Opened");
    }

    #[test]
    fn test_click_outside_tiles_does_nothing() {
        let mut app = campaign_app();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 99, 39));
        assert_eq!(app.view, View::Campaign);
    }

    #[test]
    fn test_mouse_ignored_while_syncing() {
        let mut app = campaign_app();
        app.state = AppState::Syncing;
        let row = tile_row(&app);
        handle_mouse(&mut app, mouse(MouseEventKind::Moved, 2, row));
        assert_eq!(app.dashboard.hovered(), None);
    }
}
