use crate::pages::{AddMovie, Form, LoginPage, RegisterPage};
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

const LABEL_WIDTH: usize = 16;

pub fn render_login(page: &LoginPage, frame: &mut Frame, area: Rect, palette: &Palette) {
    let footer = Line::from(Span::styled(
        "Don't have an account? Esc, then [n] to register",
        Style::default().fg(palette.muted),
    ));
    let button = if page.loading { "Logging in..." } else { "Login" };
    render_form(
        " Login ",
        &page.form,
        page.error.as_deref(),
        button,
        Some(footer),
        frame,
        centered_column(area, 60),
        palette,
    );
}

pub fn render_register(page: &RegisterPage, frame: &mut Frame, area: Rect, palette: &Palette) {
    let footer = Line::from(Span::styled(
        "Already have an account? Esc, then [l] to login",
        Style::default().fg(palette.muted),
    ));
    let button = if page.loading { "Registering..." } else { "Register" };
    render_form(
        " Register ",
        &page.form,
        page.error.as_deref(),
        button,
        Some(footer),
        frame,
        centered_column(area, 60),
        palette,
    );
}

pub fn render_add_movie(page: &AddMovie, frame: &mut Frame, area: Rect, palette: &Palette) {
    render_form(
        " Add New Movie ",
        &page.form,
        page.error.as_deref(),
        page.submit_label(),
        None,
        frame,
        area,
        palette,
    );
}

/// Lines for every field, with section headings, hints and the focus marker.
pub fn field_lines<'a>(form: &'a Form, palette: &Palette) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    for (idx, field) in form.fields.iter().enumerate() {
        if let Some(section) = field.section {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                section,
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            )));
        }

        let focused = idx == form.focus;
        let marker = if focused { "▸ " } else { "  " };
        let label = format!(
            "{}{}",
            field.label,
            if field.required { " *" } else { "" }
        );
        let pad = LABEL_WIDTH.saturating_sub(label.width());

        let value_style = if field.disabled {
            Style::default().fg(palette.muted).add_modifier(Modifier::CROSSED_OUT)
        } else if focused {
            Style::default().fg(palette.highlight_fg).bg(palette.highlight_bg)
        } else {
            Style::default().fg(palette.fg)
        };
        let value = if field.value.is_empty() {
            Span::styled(field.placeholder, Style::default().fg(palette.muted))
        } else if field.masked {
            Span::styled("*".repeat(field.value.chars().count()), value_style)
        } else {
            Span::styled(field.value.as_str(), value_style)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(palette.accent)),
            Span::styled(
                format!("{label}{}: ", " ".repeat(pad)),
                Style::default().fg(if focused { palette.accent } else { palette.muted }),
            ),
            value,
        ]));

        if let Some(hint) = field.hint {
            lines.push(Line::from(Span::styled(
                format!("{}{hint}", " ".repeat(LABEL_WIDTH + 4)),
                Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
            )));
        }
    }
    lines
}

#[allow(clippy::too_many_arguments)]
fn render_form(
    title: &str,
    form: &Form,
    error: Option<&str>,
    button: &str,
    footer: Option<Line>,
    frame: &mut Frame,
    area: Rect,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(title.to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if error.is_some() { 2 } else { 0 }),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(inner);

    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(error)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(palette.error)),
            chunks[0],
        );
    }

    // Keep the focused field in view on short terminals.
    let lines = field_lines(form, palette);
    let focus_line = lines
        .iter()
        .position(|l| l.spans.first().is_some_and(|s| s.content == "▸ "))
        .unwrap_or(0);
    let visible = chunks[1].height as usize;
    let scroll = focus_line.saturating_sub(visible.saturating_sub(2));
    frame.render_widget(
        Paragraph::new(lines).scroll((scroll as u16, 0)),
        chunks[1],
    );

    let mut bottom = vec![Line::from(Span::styled(
        format!("[Enter] {button}   [Esc] Cancel"),
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
    ))];
    bottom.extend(footer);
    frame.render_widget(Paragraph::new(bottom).alignment(Alignment::Center), chunks[2]);
}

fn centered_column(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
