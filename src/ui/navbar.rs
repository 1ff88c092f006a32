use crate::app::{App, Route};
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub const BRAND: &str = "🎬 Movie Rating Platform";

/// Navbar entries for the current session, each with its shortcut key.
pub fn links(app: &App) -> Vec<(&'static str, String, bool)> {
    let mut links = vec![("m", "Movies".to_string(), app.route == Route::Movies)];
    match app.state.session.user() {
        Some(user) => {
            links.push(("a", "Add Movie".to_string(), app.route == Route::AddMovie));
            links.push(("", format!("Welcome, {}", user.username), false));
            links.push(("l", "Logout".to_string(), false));
        }
        None => {
            links.push(("l", "Login".to_string(), app.route == Route::Login));
            links.push(("n", "Register".to_string(), app.route == Route::Register));
        }
    }
    links
}

pub fn render(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let mut spans = vec![Span::styled(
        format!(" {BRAND}  "),
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    )];

    for (key, label, active) in links(app) {
        let style = if active {
            Style::default()
                .fg(palette.highlight_fg)
                .bg(palette.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.fg)
        };
        if key.is_empty() {
            spans.push(Span::styled(format!(" {label} "), Style::default().fg(palette.muted)));
        } else {
            spans.push(Span::styled(format!(" [{key}] "), Style::default().fg(palette.muted)));
            spans.push(Span::styled(label, style));
        }
        spans.push(Span::raw(" "));
    }

    let theme = app.state.theme.preference();
    spans.push(Span::styled(
        format!(" [t] {} {}", theme.icon(), theme.label()),
        Style::default().fg(palette.muted),
    ));

    let navbar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette.border)),
    );
    frame.render_widget(navbar, area);
}
