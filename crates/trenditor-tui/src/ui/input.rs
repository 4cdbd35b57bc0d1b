//! Keyboard input handling for the TUI.
//!
//! Keys go to the topmost overlay first, then to the navigation bar or the
//! page content depending on focus.

use crossterm::event::{KeyCode, KeyEvent};

use trenditor_core::models::forms::MAX_TOOT_LENGTH;
use trenditor_core::Route;

use crate::app::{App, AppState, Focus, PAGE_SCROLL_SIZE};
use crate::forms::{can_add_char, FieldKind, Form};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return false;
        }
        AppState::ConfirmingQuit => {
            return match confirm(key) {
                Some(true) => {
                    app.state = AppState::Quitting;
                    true
                }
                Some(false) => {
                    app.state = AppState::Normal;
                    false
                }
                None => false,
            };
        }
        AppState::ConfirmingLogout => {
            handle_confirmation(app, key, App::log_out);
            return false;
        }
        AppState::ConfirmingDeleteAccount => {
            handle_confirmation(app, key, App::delete_account);
            return false;
        }
        AppState::ConfirmingDeleteToot => {
            handle_confirmation(app, key, App::delete_selected_toot);
            return false;
        }
        AppState::ConfirmingClearHistory => {
            handle_confirmation(app, key, App::clear_history);
            return false;
        }
        AppState::EditingToot => {
            handle_edit_input(app, key);
            return false;
        }
        AppState::Normal | AppState::Quitting => {}
    }

    match app.focus {
        Focus::Nav => handle_nav_input(app, key),
        Focus::Content => {
            if key.code == KeyCode::Esc {
                app.focus = Focus::Nav;
            } else {
                handle_content_input(app, key);
            }
            false
        }
    }
}

/// Some(true) for yes, Some(false) for no, None for any other key
fn confirm(key: KeyEvent) -> Option<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
        _ => None,
    }
}

fn handle_confirmation(app: &mut App, key: KeyEvent, on_yes: fn(&mut App)) {
    match confirm(key) {
        Some(true) => on_yes(app),
        Some(false) => app.state = AppState::Normal,
        None => {}
    }
}

fn handle_edit_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.edit_buffer.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => app.submit_edit_toot(),
        KeyCode::Backspace => {
            app.edit_buffer.pop();
        }
        KeyCode::Char(c) => {
            let len = app.edit_buffer.chars().count();
            if can_add_char(FieldKind::Text, len, MAX_TOOT_LENGTH, c) {
                app.edit_buffer.push(c);
            }
        }
        _ => {}
    }
}

fn handle_nav_input(app: &mut App, key: KeyEvent) -> bool {
    let logged_in = app.session_view.is_logged_in();

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('x') => app.notice = None,
        KeyCode::Char(c @ '1'..='7') => {
            let index = c as usize - '1' as usize;
            if let Some(route) = Route::NAV.get(index) {
                app.navigate(*route);
            }
        }
        KeyCode::Left => app.navigate(app.route.prev()),
        KeyCode::Right => app.navigate(app.route.next()),
        KeyCode::Enter | KeyCode::Down | KeyCode::Tab => app.focus = Focus::Content,
        KeyCode::Char('p') => open_page(app, Route::Profile),
        KeyCode::Char('s') if !logged_in => open_page(app, Route::SignIn),
        KeyCode::Char('c') if !logged_in => open_page(app, Route::SignUp),
        KeyCode::Char('f') if !logged_in => open_page(app, Route::ForgotPassword),
        KeyCode::Char('l') if logged_in => app.state = AppState::ConfirmingLogout,
        KeyCode::Char('u') if logged_in => app.refresh_activity(),
        _ => {}
    }
    false
}

/// Navigate and hand focus to the page, for pages that open on a form
fn open_page(app: &mut App, route: Route) {
    app.navigate(route);
    app.focus = Focus::Content;
}

fn handle_content_input(app: &mut App, key: KeyEvent) {
    match app.route {
        Route::SignIn
        | Route::SignUp
        | Route::ForgotPassword
        | Route::Search
        | Route::Trends
        | Route::PostToot => handle_form_input(app, key),
        Route::Profile => match key.code {
            KeyCode::Char('l') => app.state = AppState::ConfirmingLogout,
            KeyCode::Char('D') => app.state = AppState::ConfirmingDeleteAccount,
            _ => {}
        },
        Route::PostedToots => handle_toots_input(app, key),
        Route::History => handle_history_input(app, key),
        Route::Home | Route::About => {}
    }
}

fn active_form(app: &mut App) -> Option<&mut Form> {
    match app.route {
        Route::SignIn => Some(&mut app.sign_in_form),
        Route::SignUp => Some(&mut app.sign_up_form),
        Route::ForgotPassword => Some(&mut app.reset_form),
        Route::Search => Some(&mut app.search_form),
        Route::Trends => Some(&mut app.trends_form),
        Route::PostToot => Some(&mut app.toot_form),
        _ => None,
    }
}

fn submit_active_form(app: &mut App) {
    match app.route {
        Route::SignIn => app.submit_sign_in(),
        Route::SignUp => app.submit_sign_up(),
        Route::ForgotPassword => app.submit_password_reset(),
        Route::Search => app.submit_search(),
        Route::Trends => app.submit_trends(),
        Route::PostToot => app.submit_toot(),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    // Result lists under the search and trends forms scroll with page keys
    match key.code {
        KeyCode::PageDown => {
            app.move_selection(1);
            return;
        }
        KeyCode::PageUp => {
            app.move_selection(-1);
            return;
        }
        _ => {}
    }

    let Some(form) = active_form(app) else {
        return;
    };
    if form.submitting {
        return;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left | KeyCode::Right => form.cycle_visibility(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.input_char(c),
        KeyCode::Enter => {
            if form.on_submit() || form.focus + 1 == form.fields.len() {
                submit_active_form(app);
            } else {
                form.focus_next();
            }
        }
        _ => {}
    }
}

fn handle_list_navigation(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home => app.selection = 0,
        KeyCode::End => app.selection = app.list_len().saturating_sub(1),
        _ => return false,
    }
    true
}

fn handle_toots_input(app: &mut App, key: KeyEvent) {
    if handle_list_navigation(app, key) {
        return;
    }
    match key.code {
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit_toot(),
        KeyCode::Char('d') if app.selected_toot().is_some() => {
            app.state = AppState::ConfirmingDeleteToot;
        }
        KeyCode::Char('r') => app.refresh_toots(),
        _ => {}
    }
}

fn handle_history_input(app: &mut App, key: KeyEvent) {
    if handle_list_navigation(app, key) {
        return;
    }
    match key.code {
        KeyCode::Char('r') => app.refresh_history(),
        KeyCode::Char('C') if !app.history.is_empty() => {
            app.state = AppState::ConfirmingClearHistory;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::app::test_support::test_app;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, key(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_quit_requires_confirmation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);

        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))));
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q')));
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_number_keys_go_through_guard() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);

        // Search is protected and nobody is signed in
        handle_input(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.route, Route::SignIn);

        app.focus = Focus::Nav;
        handle_input(&mut app, key(KeyCode::Char('7')));
        assert_eq!(app.route, Route::About);
    }

    #[tokio::test]
    async fn test_typing_fills_sign_in_form() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        handle_input(&mut app, key(KeyCode::Char('s')));
        assert_eq!(app.route, Route::SignIn);
        assert_eq!(app.focus, Focus::Content);

        type_text(&mut app, "qa@example.com");
        handle_input(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "pw");
        handle_input(&mut app, key(KeyCode::Backspace));

        assert_eq!(app.sign_in_form.value(0), "qa@example.com");
        assert_eq!(app.sign_in_form.value(1), "p");

        // Letters that are nav shortcuts are typed while the page has focus
        type_text(&mut app, "q");
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.sign_in_form.value(1), "pq");

        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.focus, Focus::Nav);
    }

    #[tokio::test]
    async fn test_enter_advances_then_submits() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        handle_input(&mut app, key(KeyCode::Char('c')));
        assert_eq!(app.route, Route::SignUp);

        handle_input(&mut app, key(KeyCode::Enter));
        assert_eq!(app.sign_up_form.focus, 1);
        handle_input(&mut app, key(KeyCode::Enter));
        handle_input(&mut app, key(KeyCode::Enter));

        // Empty form fails validation instead of submitting
        assert!(!app.sign_up_form.submitting);
        assert_eq!(app.sign_up_form.error.as_deref(), Some("Name is required"));
    }

    #[tokio::test]
    async fn test_help_overlay_swallows_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        handle_input(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::ShowingHelp);

        handle_input(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.route, Route::Home);

        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_account_shortcuts_hidden_when_signed_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        handle_input(&mut app, key(KeyCode::Char('l')));
        assert_eq!(app.state, AppState::Normal);
    }
}
