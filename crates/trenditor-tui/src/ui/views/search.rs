use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use trenditor_core::models::SearchResult;
use trenditor_core::utils::{format_date, strip_html, truncate};

use crate::app::{App, Focus};
use crate::ui::styles;

use super::{distribution_line, render_form, sentiment_span};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(5)])
        .split(area);

    let focused = app.focus == Focus::Content;
    render_form(frame, &app.search_form, "Keyword Search", focused, chunks[0]);

    match &app.search_result {
        Some(result) => render_results(frame, result, Some(app.selection), chunks[1]),
        None => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(false));
            let hint = Paragraph::new(Line::from(Span::styled(
                "  Enter a keyword to see how people feel about it.",
                styles::muted_style(),
            )))
            .block(block);
            frame.render_widget(hint, chunks[1]);
        }
    }
}

/// Summary line plus a table of matching posts. Shared with the history page.
pub fn render_results(frame: &mut Frame, result: &SearchResult, selected: Option<usize>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let summary = vec![
        Line::from(vec![
            Span::styled(format!("  \"{}\"", result.keyword), styles::highlight_style()),
            Span::styled(format!(" on {} · {} posts · overall ", result.instance, result.count), styles::muted_style()),
            sentiment_span(&result.sentiment),
        ]),
        distribution_line(&result.distribution()),
    ];
    frame.render_widget(Paragraph::new(summary), chunks[0]);

    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Author"),
        Cell::from("Sentiment"),
        Cell::from("Post"),
    ])
    .style(styles::title_style())
    .height(1);

    let content_width = (area.width as usize).saturating_sub(40);
    let rows: Vec<Row> = result
        .data
        .iter()
        .map(|post| {
            let date = post.created_at.as_deref().map(format_date).unwrap_or_default();
            Row::new(vec![
                Cell::from(date),
                Cell::from(truncate(&post.author, 16)),
                Cell::from(sentiment_span(&post.sentiment)),
                Cell::from(truncate(&strip_html(&post.content), content_width)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Posts ({}) ", result.data.len()))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(selected);
    frame.render_stateful_widget(table, chunks[1], &mut state);
}
