use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;

use super::form_lines;

/// Forms sit in a fixed-width column in the middle of the page
fn form_area(area: Rect) -> Rect {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(64),
            Constraint::Fill(1),
        ])
        .split(area);
    columns[1]
}

fn render_account_form(frame: &mut Frame, app: &App, area: Rect, title: &str, form: &crate::forms::Form, footer: Vec<Line<'static>>) {
    let focused = app.focus == Focus::Content;
    let mut lines = form_lines(form, focused);
    lines.push(Line::from(""));
    lines.extend(footer);

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        form_area(area),
    );
}

fn hint(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {}", key), styles::help_key_style()),
        Span::styled(format!(" {}", desc), styles::muted_style()),
    ])
}

pub fn render_sign_in(frame: &mut Frame, app: &App, area: Rect) {
    let mut footer = vec![
        hint("[c]", "Create an account"),
        hint("[f]", "Forgot your password?"),
    ];
    // A failed verification explains why the user landed here
    if app.sign_in_form.error.is_none() {
        if let Some(ref error) = app.session_view.last_error {
            footer.insert(0, Line::from(""));
            footer.insert(0, Line::from(Span::styled(format!("  {}", error), styles::error_style())));
        }
    }
    render_account_form(frame, app, area, "Sign In", &app.sign_in_form, footer);
}

pub fn render_sign_up(frame: &mut Frame, app: &App, area: Rect) {
    let footer = vec![hint("[s]", "Already have an account? Sign in")];
    render_account_form(frame, app, area, "Create Account", &app.sign_up_form, footer);
}

pub fn render_forgot_password(frame: &mut Frame, app: &App, area: Rect) {
    let footer = vec![hint("[s]", "Back to sign in")];
    render_account_form(frame, app, area, "Reset Password", &app.reset_form, footer);
}

pub fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Content;
    let mut lines = vec![Line::from("")];

    if let Some(user) = app.session_view.user() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!(" {} ", user.initial()), styles::selected_style()),
            Span::raw("  "),
            Span::styled(user.name.clone(), styles::title_style()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Email:   ", styles::muted_style()),
            Span::styled(user.email.clone(), styles::list_item_style()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  User ID: ", styles::muted_style()),
            Span::styled(user.id.to_string(), styles::list_item_style()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Server:  ", styles::muted_style()),
            Span::styled(app.api_base_url().to_string(), styles::list_item_style()),
        ]));
    }

    if let Some(ref error) = app.session_view.last_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    lines.push(Line::from(""));
    lines.push(hint("[l]", "Sign out"));
    lines.push(Line::from(vec![
        Span::styled("  [D]", styles::help_key_style()),
        Span::styled(" Delete account", styles::error_style()),
    ]));

    let block = Block::default()
        .title(" Profile ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), form_area(area));
}
