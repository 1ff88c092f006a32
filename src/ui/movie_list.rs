use crate::api::Movie;
use crate::pages::movie_list::{average_label, count_label, summarize};
use crate::pages::MovieList;
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

const SEARCH_PLACEHOLDER: &str = "Search movies by title, genre, director...";

pub fn render(list: &MovieList, frame: &mut Frame, area: Rect, palette: &Palette) {
    // Layout: search(3) + list(min) + pagination(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(if list.shows_pagination() { 1 } else { 0 }),
        ])
        .split(area);

    render_search(list, frame, chunks[0], palette);

    if let Some(error) = &list.error {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(" Movies ");
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(palette.error)),
            rows[0],
        );
        render_cards(list, frame, rows[1], palette, false);
    } else if list.loading && list.movies.is_empty() {
        let loading = Paragraph::new("Loading movies...")
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.border))
                    .title(" Movies "),
            );
        frame.render_widget(loading, chunks[1]);
    } else if list.is_empty() {
        render_empty(list, frame, chunks[1], palette);
    } else {
        render_cards(list, frame, chunks[1], palette, true);
    }

    if list.shows_pagination() {
        render_pagination(list, frame, chunks[2], palette);
    }
}

fn render_search(list: &MovieList, frame: &mut Frame, area: Rect, palette: &Palette) {
    let style = if list.editing_search {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.muted)
    };
    let label = if list.editing_search {
        " 🔍 (Enter to search, Esc to cancel): "
    } else {
        " 🔍 (/): "
    };
    let text = if list.search.is_empty() && !list.editing_search {
        Line::from(vec![
            Span::styled(label, style),
            Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(palette.muted)),
        ])
    } else {
        Line::from(vec![
            Span::styled(label, style),
            Span::styled(list.search.as_str(), Style::default().fg(palette.fg)),
        ])
    };
    let bar = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(" Search "),
    );
    frame.render_widget(bar, area);

    if list.editing_search {
        let cursor_x = area.x + 1 + label.width() as u16 + list.search.width() as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Lines drawn for one movie card.
pub fn card_lines<'a>(movie: &'a Movie, palette: &Palette) -> Vec<Line<'a>> {
    vec![
        Line::from(vec![
            Span::styled(
                movie.title.as_str(),
                Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", movie.release_year),
                Style::default().fg(palette.muted),
            ),
        ]),
        Line::from(vec![
            Span::styled(movie.genre.as_str(), Style::default().fg(palette.accent)),
            Span::styled("  Director: ", Style::default().fg(palette.muted)),
            Span::styled(movie.director.as_str(), Style::default().fg(palette.fg)),
        ]),
        Line::from(Span::styled(
            summarize(&movie.description),
            Style::default().fg(palette.fg),
        )),
        Line::from(vec![
            Span::styled(
                format!("⭐ {}", average_label(movie.average_rating)),
                Style::default().fg(palette.rating),
            ),
            Span::styled(
                format!(" ({})", count_label(movie.ratings_count)),
                Style::default().fg(palette.muted),
            ),
        ]),
        Line::from(""),
    ]
}

fn render_cards(list: &MovieList, frame: &mut Frame, area: Rect, palette: &Palette, bordered: bool) {
    let items: Vec<ListItem> = list
        .movies
        .iter()
        .map(|movie| ListItem::new(card_lines(movie, palette)))
        .collect();

    let mut widget = List::new(items)
        .highlight_style(
            Style::default()
                .bg(palette.highlight_bg)
                .fg(palette.highlight_fg),
        )
        .highlight_symbol("▸ ");
    if bordered {
        let title = if list.loading { " Movies (loading...) " } else { " Movies " };
        widget = widget.block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(title)
                .title_bottom(
                    Line::from(format!(" {} total ", list.count)).alignment(Alignment::Right),
                ),
        );
    }

    let mut state = ListState::default();
    state.select(Some(list.selected));
    frame.render_stateful_widget(widget, area, &mut state);
}

/// Empty-state wording, including the search hint when a term is active.
pub fn empty_message(list: &MovieList) -> String {
    let hint = if list.search.trim().is_empty() {
        ""
    } else {
        "Try a different search term or "
    };
    format!("No movies found. {hint}add a new movie [a].")
}

fn render_empty(list: &MovieList, frame: &mut Frame, area: Rect, palette: &Palette) {
    let empty = Paragraph::new(empty_message(list))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.muted))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(" Movies "),
        );
    frame.render_widget(empty, area);
}

fn render_pagination(list: &MovieList, frame: &mut Frame, area: Rect, palette: &Palette) {
    let enabled = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(palette.muted);
    let line = Line::from(vec![
        Span::styled(
            "← Previous",
            if list.can_previous() { enabled } else { disabled },
        ),
        Span::styled(
            format!("   Page {} of {}   ", list.page, list.total_pages),
            Style::default().fg(palette.fg),
        ),
        Span::styled("Next →", if list.can_next() { enabled } else { disabled }),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::fixtures::movie;
    use crate::theme::Palette;

    #[test]
    fn test_empty_message_mentions_search() {
        let mut list = MovieList::new();
        assert_eq!(empty_message(&list), "No movies found. add a new movie [a].");
        list.search = "zzz".into();
        assert_eq!(
            empty_message(&list),
            "No movies found. Try a different search term or add a new movie [a]."
        );
    }

    #[test]
    fn test_card_shows_rating_line() {
        let mut m = movie(1);
        m.average_rating = Some(3.5);
        m.ratings_count = 1;
        let lines = card_lines(&m, &Palette::DARK);
        let rating: String = lines[3].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(rating, "⭐ 3.5 (1 rating)");
    }
}
