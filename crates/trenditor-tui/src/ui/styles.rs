use ratatui::style::{Color, Modifier, Style};

use trenditor_core::models::Sentiment;

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const POSITIVE: Color = Color::Rgb(96, 176, 96);
pub const NEUTRAL: Color = Color::Rgb(208, 176, 64);
pub const NEGATIVE: Color = Color::Rgb(200, 72, 72);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn success_style() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn error_style() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(NEUTRAL)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

/// Positive is green, negative is red, anything else is yellow.
pub fn sentiment_color(sentiment: &Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => POSITIVE,
        Sentiment::Negative => NEGATIVE,
        Sentiment::Neutral | Sentiment::Other(_) => NEUTRAL,
    }
}

pub fn sentiment_style(sentiment: &Sentiment) -> Style {
    Style::default()
        .fg(sentiment_color(sentiment))
        .add_modifier(Modifier::BOLD)
}
