use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use trenditor_core::models::forms::MAX_TOOT_LENGTH;
use trenditor_core::models::{Sentiment, SentimentDistribution};
use trenditor_core::utils::{format_date, strip_html, truncate};

use crate::app::{App, Focus};
use crate::ui::styles;

use super::{distribution_line, render_form, sentiment_span};

pub fn render_post(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let focused = app.focus == Focus::Content;
    render_form(frame, &app.toot_form, "Post Toot", focused, chunks[0]);

    let count = app.toot_form.value(0).chars().count();
    let counter_style = if count >= MAX_TOOT_LENGTH {
        styles::error_style()
    } else {
        styles::muted_style()
    };
    let counter = Line::from(vec![
        Span::styled(format!("  {}/{} characters", count, MAX_TOOT_LENGTH), counter_style),
        Span::styled("   Space on Visibility changes it", styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(counter), chunks[1]);
}

pub fn render_posted(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(area);

    let dist = SentimentDistribution::tally(app.toots.iter().filter_map(|t| t.sentiment.as_ref()));
    let summary = if app.toots_loading && app.toots.is_empty() {
        Line::from(Span::styled("  Loading toots...", styles::muted_style()))
    } else {
        distribution_line(&dist)
    };
    frame.render_widget(Paragraph::new(summary), chunks[0]);

    let header = Row::new(vec![Cell::from("Date"), Cell::from("Sentiment"), Cell::from("Toot")])
        .style(styles::title_style())
        .height(1);

    let content_width = (area.width as usize).saturating_sub(28);
    let rows: Vec<Row> = app
        .toots
        .iter()
        .map(|toot| {
            let date = toot.created_at.as_deref().map(format_date).unwrap_or_default();
            let sentiment = toot
                .sentiment
                .as_ref()
                .map(sentiment_span)
                .unwrap_or_else(|| sentiment_span(&Sentiment::Other("-".to_string())));
            Row::new(vec![
                Cell::from(date),
                Cell::from(sentiment),
                Cell::from(truncate(&strip_html(&toot.content), content_width)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [Constraint::Length(10), Constraint::Length(10), Constraint::Fill(1)];
    let title = if app.toots.is_empty() && !app.toots_loading {
        " My Toots - none yet ".to_string()
    } else {
        format!(" My Toots ({}) - [e]dit [d]elete [r]efresh ", app.toots.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(app.focus == Focus::Content)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, chunks[1], &mut state);
}
