use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;

use super::search::render_results;
use super::sentiment_span;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.history.is_empty() {
        let text = if app.history_loading {
            "  Loading history..."
        } else {
            "  No searches yet. Your keyword searches will show up here."
        };
        let block = Block::default()
            .title(" History ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(app.focus == Focus::Content));
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, styles::muted_style()))).block(block),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let header = Row::new(vec![
        Cell::from("Keyword"),
        Cell::from("Instance"),
        Cell::from("Posts"),
        Cell::from("Overall"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .history
        .iter()
        .map(|item| {
            Row::new(vec![
                Cell::from(item.keyword.clone()),
                Cell::from(item.instance.clone()),
                Cell::from(format!("{:>5}", item.count)),
                Cell::from(sentiment_span(&item.sentiment)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(5),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" History ({}) - [r]efresh [C]lear ", app.history.len()))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(app.focus == Focus::Content)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, chunks[0], &mut state);

    if let Some(item) = app.history.get(app.selection) {
        render_results(frame, item, None, chunks[1]);
    }
}
