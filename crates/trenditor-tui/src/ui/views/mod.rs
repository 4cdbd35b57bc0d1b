//! Page content. Each page renders into the main content area.

pub mod account;
pub mod history;
pub mod home;
pub mod search;
pub mod toots;
pub mod trends;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use trenditor_core::models::{Sentiment, SentimentDistribution};

use crate::forms::{FieldKind, Form};
use crate::ui::styles;

/// Width of the label column in forms
const LABEL_WIDTH: usize = 18;

/// Form lines: one row per field, the submit button, then any error.
pub fn form_lines(form: &Form, focused: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];

    for (i, field) in form.fields.iter().enumerate() {
        let active = focused && form.focus == i;
        let style = if active {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let value = match field.kind {
            FieldKind::Visibility => format!("< {} >", form.visibility),
            _ => field.display(),
        };
        let cursor = if active && field.kind != FieldKind::Visibility { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>width$}: ", field.label, width = LABEL_WIDTH), styles::muted_style()),
            Span::styled(format!("{}{}", value, cursor), style),
        ]));
    }

    lines.push(Line::from(""));
    let button = if focused && form.on_submit() {
        Span::styled(format!(" ▶ {} ◀ ", form.submit_label), styles::selected_style())
    } else {
        Span::styled(format!("   {}   ", form.submit_label), styles::list_item_style())
    };
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH + 4)),
        Span::raw("["),
        button,
        Span::raw("]"),
    ]));

    if form.submitting {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  Please wait...", styles::muted_style())));
    } else if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }
    lines
}

pub fn render_form(frame: &mut Frame, form: &Form, title: &str, focused: bool, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(form_lines(form, focused))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub fn sentiment_span(sentiment: &Sentiment) -> Span<'static> {
    Span::styled(sentiment.label().to_string(), styles::sentiment_style(sentiment))
}

/// "Positive 40% · Neutral 35% · Negative 25%"
pub fn distribution_line(dist: &SentimentDistribution) -> Line<'static> {
    let part = |sentiment: Sentiment, count: u32| {
        Span::styled(
            format!("{} {}% ({})", sentiment.label(), dist.percent(count), count),
            styles::sentiment_style(&sentiment),
        )
    };
    Line::from(vec![
        Span::raw("  "),
        part(Sentiment::Positive, dist.positive),
        Span::styled("  ·  ", styles::muted_style()),
        part(Sentiment::Neutral, dist.neutral),
        Span::styled("  ·  ", styles::muted_style()),
        part(Sentiment::Negative, dist.negative),
    ])
}
