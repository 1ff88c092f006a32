mod form;
mod help;
mod movie_detail;
mod movie_list;
mod navbar;
pub mod theme_toggle;

use crate::app::{App, NoticeKind, Page};
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    let palette = app.palette();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    navbar::render(app, frame, chunks[0], &palette);

    match &app.page {
        Page::Movies(list) => movie_list::render(list, frame, chunks[1], &palette),
        Page::MovieDetail(detail) => {
            movie_detail::render(detail, app.is_authenticated(), frame, chunks[1], &palette)
        }
        Page::Login(page) => form::render_login(page, frame, chunks[1], &palette),
        Page::Register(page) => form::render_register(page, frame, chunks[1], &palette),
        Page::AddMovie(page) => form::render_add_movie(page, frame, chunks[1], &palette),
    }

    render_status(app, frame, chunks[2], &palette);

    if let Some(picker) = &app.theme_picker {
        picker.render(frame, &palette);
    }

    if let Some(notice) = &app.notice {
        render_notice(notice.kind, &notice.message, frame, &palette);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame, &palette);
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let mut hints = match &app.page {
        Page::Movies(list) if list.editing_search => vec![
            key_hint("Enter", " Search  ", palette),
            key_hint("Esc", " Cancel  ", palette),
        ],
        Page::Movies(_) => vec![
            key_hint("↑↓", " Navigate  ", palette),
            key_hint("/", " Search  ", palette),
            key_hint("←→", " Page  ", palette),
            key_hint("Enter", " Open  ", palette),
        ],
        Page::MovieDetail(detail) if detail.editing => vec![
            key_hint("←→", " Score  ", palette),
            key_hint("type", " Comment  ", palette),
            key_hint("Enter", " Submit  ", palette),
            key_hint("Esc", " Cancel  ", palette),
        ],
        Page::MovieDetail(_) => vec![
            key_hint("↑↓", " Scroll  ", palette),
            key_hint("r", " Rate  ", palette),
            key_hint("o", " IMDB  ", palette),
            key_hint("Esc", " Back  ", palette),
        ],
        Page::Login(_) | Page::Register(_) | Page::AddMovie(_) => vec![
            key_hint("Tab", " Next field  ", palette),
            key_hint("Enter", " Submit  ", palette),
            key_hint("Esc", " Cancel  ", palette),
        ],
    };
    if !app.is_editing() {
        hints.push(key_hint("?", " Help  ", palette));
        hints.push(key_hint("q", " Quit  ", palette));
    }
    let mut spans: Vec<Span> = hints.into_iter().flatten().collect();
    spans.push(Span::styled(
        app.status_msg.as_str(),
        Style::default().fg(palette.muted),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_notice(kind: NoticeKind, message: &str, frame: &mut Frame, palette: &Palette) {
    let area = centered_rect_fixed(50, 5, frame.area());
    frame.render_widget(Clear, area);

    let colour = match kind {
        NoticeKind::Success => palette.success,
        NoticeKind::Error => palette.error,
    };
    let notice = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.fg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colour))
                .title_bottom(
                    Line::from(" Press any key ").style(Style::default().fg(palette.muted)),
                ),
        );
    frame.render_widget(notice, area);
}

/// Bold key name followed by its description, as used in the status bars.
fn key_hint<'a>(key: &'a str, label: &'a str, palette: &Palette) -> [Span<'a>; 2] {
    [
        Span::styled(
            format!(" {key}"),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(label, Style::default().fg(palette.fg)),
    ]
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Centered rectangle of a fixed size, clipped to `area`.
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
