use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use trenditor_core::models::TrendsResponse;
use trenditor_core::utils::{strip_html, truncate};

use crate::app::{App, Focus};
use crate::ui::styles;

use super::{distribution_line, render_form, sentiment_span};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5)])
        .split(area);

    let focused = app.focus == Focus::Content;
    render_form(frame, &app.trends_form, "Trend Analysis", focused, chunks[0]);

    match &app.trends {
        Some(trends) if !trends.trends().is_empty() => render_trends(frame, app, trends, chunks[1]),
        Some(_) => render_hint(frame, "  No trends returned. Try again in a moment.", chunks[1]),
        None => render_hint(frame, "  Choose how many trends to analyze and press Enter.", chunks[1]),
    }
}

fn render_hint(frame: &mut Frame, text: &'static str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, styles::muted_style()))).block(block),
        area,
    );
}

fn render_trends(frame: &mut Frame, app: &App, trends: &TrendsResponse, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let header = Row::new(vec![Cell::from("Trend"), Cell::from("Overall"), Cell::from("Posts")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = trends
        .trends()
        .iter()
        .map(|trend| {
            Row::new(vec![
                Cell::from(format!("#{}", trend.name)),
                Cell::from(sentiment_span(&trend.overall_sentiment)),
                Cell::from(format!("{:>5}", trend.posts.len())),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [Constraint::Fill(1), Constraint::Length(10), Constraint::Length(5)];
    let meta = &trends.data.meta;
    let title = format!(" Trends ({}) · {} posts ", meta.total_trends.max(trends.trends().len() as u32), meta.total_posts);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, chunks[0], &mut state);

    let Some(trend) = trends.trends().get(app.selection) else {
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("  #{}", trend.name), styles::highlight_style()),
            Span::styled("  overall ", styles::muted_style()),
            sentiment_span(&trend.overall_sentiment),
        ]),
        distribution_line(&trend.sentiment_distribution),
        Line::from(""),
    ];

    let content_width = (chunks[1].width as usize).saturating_sub(32);
    for post in &trend.posts {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<16} ", truncate(&post.author, 16)), styles::muted_style()),
            Span::styled(format!("{:<9} ", post.sentiment.label()), styles::sentiment_style(&post.sentiment)),
            Span::styled(truncate(&strip_html(&post.content), content_width), styles::list_item_style()),
        ]));
    }

    let block = Block::default()
        .title(" Posts ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), chunks[1]);
}
