use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use trenditor_core::models::forms::MAX_TOOT_LENGTH;
use trenditor_core::{GuardDecision, Route, SessionStatus};

use crate::app::{App, AppState, Focus, NoticeKind};

use super::styles;
use super::views::{account, history, home, search, toots, trends};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_nav(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_confirm_overlay(frame, "Are you sure you want to quit?", "quit"),
        AppState::ConfirmingLogout => render_confirm_overlay(frame, "Sign out of Trenditor?", "sign out"),
        AppState::ConfirmingDeleteAccount => render_confirm_overlay(
            frame,
            "Delete your account? This cannot be undone.",
            "delete",
        ),
        AppState::ConfirmingDeleteToot => render_confirm_overlay(frame, "Delete this toot?", "delete"),
        AppState::ConfirmingClearHistory => {
            render_confirm_overlay(frame, "Clear your whole search history?", "clear")
        }
        AppState::EditingToot => render_edit_overlay(frame, app),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Trenditor";
    let account = match app.session_view.status() {
        SessionStatus::Authenticated => app
            .session_view
            .user()
            .map(|u| format!("({}) {}  [p]rofile", u.initial(), u.name))
            .unwrap_or_default(),
        SessionStatus::Unauthenticated => "[s]ign in  [c]reate account".to_string(),
        SessionStatus::Unknown | SessionStatus::Verifying => "Checking session...".to_string(),
    };
    let right = format!("{}  [?] Help", account);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + right.chars().count() + 2),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_nav(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, route) in Route::NAV.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, route.title());
        if *route == app.route {
            spans.push(Span::styled(label, styles::tab_style(app.focus == Focus::Nav)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    // Off-bar pages show their title on the right
    if !Route::NAV.contains(&app.route) {
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let title = app.route.title();
        let padding = (area.width as usize).saturating_sub(used + title.len() + 2);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(title, styles::tab_style(true)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.decision() {
        GuardDecision::Render(route) => match route {
            Route::Home => home::render_home(frame, app, area),
            Route::About => home::render_about(frame, app, area),
            Route::SignIn => account::render_sign_in(frame, app, area),
            Route::SignUp => account::render_sign_up(frame, app, area),
            Route::ForgotPassword => account::render_forgot_password(frame, app, area),
            Route::Profile => account::render_profile(frame, app, area),
            Route::Search => search::render(frame, app, area),
            Route::Trends => trends::render(frame, app, area),
            Route::PostToot => toots::render_post(frame, app, area),
            Route::PostedToots => toots::render_posted(frame, app, area),
            Route::History => history::render(frame, app, area),
        },
        // Redirects are followed on the next tick; until then show the placeholder
        GuardDecision::Loading | GuardDecision::Redirect(_) => render_loading(frame, area),
    }
}

/// Neutral placeholder shown while the session is being verified.
pub fn render_loading(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let y = inner.y + inner.height / 2;
    let line_area = Rect::new(inner.x, y.min(inner.y + inner.height.saturating_sub(1)), inner.width, 1);
    let paragraph = Paragraph::new(Line::from(Span::styled("Loading...", styles::muted_style())))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, line_area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (left_text, left_style) = match &app.notice {
        Some(notice) => {
            let style = match notice.kind {
                NoticeKind::Info => styles::muted_style(),
                NoticeKind::Success => styles::success_style(),
                NoticeKind::Error => styles::error_style(),
            };
            (format!(" {}  [x] dismiss ", notice.text), style)
        }
        None => (format!(" {} ", cache_summary(app)), styles::muted_style()),
    };

    let shortcuts = match app.focus {
        Focus::Nav => "[Enter] open | [q]uit",
        Focus::Content => "[Esc] back to menu",
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(styles::status_bar_style()), area);
}

fn cache_summary(app: &App) -> String {
    let ages = &app.cache_ages;
    let age = match app.route {
        Route::PostedToots => ages.toots.as_deref(),
        Route::History => ages.history.as_deref(),
        Route::Trends => ages.trends.as_deref(),
        _ => None,
    };
    match age {
        Some(age) => format!("Updated {}", age),
        None => app.api_base_url().to_string(),
    }
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 25, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("  Trenditor", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        key("1-7", "Switch page"),
        key("←/→", "Previous/next page"),
        key("Enter", "Focus page content"),
        key("Esc", "Back to the menu"),
        key("p", "Profile"),
        key("s / c", "Sign in / create account"),
        Line::from(""),
        Line::from(Span::styled(" Forms", styles::highlight_style())),
        key("Tab/↑/↓", "Move between fields"),
        key("Enter", "Next field or submit"),
        key("Space", "Change toot visibility"),
        Line::from(""),
        Line::from(Span::styled(" Lists", styles::highlight_style())),
        key("↑/↓", "Select"),
        key("e / d", "Edit / delete toot"),
        key("r / C", "Refresh / clear history"),
        key("u", "Refresh toots and history"),
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

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_confirm_overlay(frame: &mut Frame, question: &str, action: &str) {
    let area = centered_rect_fixed(52, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", question), styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(format!(" to {}, ", action), styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_edit_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(70, 12, frame.area());
    frame.render_widget(Clear, area);

    let count = app.edit_buffer.chars().count();
    let counter_style = if count > MAX_TOOT_LENGTH {
        styles::error_style()
    } else {
        styles::muted_style()
    };
    let lines = vec![
        Line::from(Span::styled(format!("{}▌", app.edit_buffer), styles::list_item_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{}/{}  ", count, MAX_TOOT_LENGTH), counter_style),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" save  ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Edit Toot ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
