use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use trenditor_core::models::Sentiment;

use crate::app::{App, Focus};
use crate::ui::styles;

pub fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Trenditor", styles::title_style())),
        Line::from(Span::styled(
            "  Trend and sentiment analysis for Mastodon",
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    match app.session_view.user() {
        Some(user) => {
            lines.push(Line::from(vec![
                Span::styled("  Welcome back, ", styles::list_item_style()),
                Span::styled(user.name.clone(), styles::highlight_style()),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Search keywords, analyze what is trending, and track the tone of your own toots.",
                styles::list_item_style(),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "  Sign in to search keywords, analyze trends and post toots.",
                styles::list_item_style(),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("  [s]", styles::help_key_style()),
                Span::styled(" Sign in   ", styles::muted_style()),
                Span::styled("[c]", styles::help_key_style()),
                Span::styled(" Create account", styles::muted_style()),
            ]));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.focus == Focus::Content));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

pub fn render_about(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  About Trenditor", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "  Trenditor pulls public posts from Mastodon instances and classifies each one as \
             positive, neutral or negative.",
            styles::list_item_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Positive", styles::sentiment_style(&Sentiment::Positive)),
            Span::styled("  Neutral", styles::sentiment_style(&Sentiment::Neutral)),
            Span::styled("  Negative", styles::sentiment_style(&Sentiment::Negative)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Version ", styles::muted_style()),
            Span::styled(env!("CARGO_PKG_VERSION"), styles::list_item_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.focus == Focus::Content));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
