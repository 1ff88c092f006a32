use super::centered_rect;
use crate::theme::Palette;
use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("q / Ctrl+C", "Quit application"),
            ("m", "Movies"),
            ("a", "Add a movie (login required)"),
            ("l", "Login, or logout when signed in"),
            ("n", "Register"),
            ("t", "Choose theme"),
            ("Esc", "Back / cancel"),
        ],
    ),
    (
        "Movie List",
        &[
            ("↑/k ↓/j", "Move selection"),
            ("Enter", "Open movie details"),
            ("/", "Search by title, genre, director"),
            ("←/[ →/]", "Previous / next page"),
        ],
    ),
    (
        "Movie Details",
        &[
            ("↑/↓ PgUp/PgDn", "Scroll"),
            ("r", "Rate this movie"),
            ("←/→", "Change score while rating"),
            ("o", "Open IMDB page"),
        ],
    ),
    (
        "Forms",
        &[
            ("Tab / Shift+Tab", "Next / previous field"),
            ("Ctrl+U", "Clear field"),
            ("Enter", "Submit"),
        ],
    ),
];

pub fn render(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let mut help_text = vec![Line::from("")];
    for (title, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )));
        for (key, action) in *keys {
            help_text.push(Line::from(vec![
                Span::styled(format!("    {key:<16}"), Style::default().fg(palette.rating)),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" Help: Keybindings ")
                .title_bottom(
                    Line::from(" Press ? or Esc to close ").style(Style::default().fg(palette.muted)),
                ),
        )
        .style(Style::default().fg(palette.fg));

    frame.render_widget(help, area);
}
