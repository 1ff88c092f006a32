use crate::api::Movie;
use crate::pages::movie_detail::{MAX_SCORE, MIN_SCORE, score_label};
use crate::pages::movie_list::{average_label, count_label};
use crate::pages::MovieDetail;
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(
    detail: &MovieDetail,
    authenticated: bool,
    frame: &mut Frame,
    area: Rect,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let message = if detail.loading {
        Some(("Loading movie details...", palette.muted))
    } else if let Some(error) = &detail.error {
        Some((error.as_str(), palette.error))
    } else if detail.movie.is_none() {
        Some(("Movie not found", palette.error))
    } else {
        None
    };
    if let Some((text, colour)) = message {
        let widget = Paragraph::new(text)
            .style(Style::default().fg(colour))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(widget, area);
        return;
    }
    let Some(movie) = &detail.movie else {
        return;
    };

    // Layout: movie info(min) + rating form(7)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(7)])
        .split(area);

    let content = Paragraph::new(movie_lines(movie, palette))
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0))
        .block(
            block
                .title(format!(" {} ", movie.title))
                .title_bottom(
                    Line::from(format!(" scroll: {} ", detail.scroll)).alignment(Alignment::Right),
                ),
        );
    frame.render_widget(content, chunks[0]);

    if authenticated {
        render_rating_form(detail, frame, chunks[1], palette);
    } else {
        let prompt = Paragraph::new("Please login to rate this movie. [l]")
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.border)),
            );
        frame.render_widget(prompt, chunks[1]);
    }
}

fn labelled<'a>(label: &'a str, value: String, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(palette.muted).add_modifier(Modifier::BOLD)),
        Span::styled(value, Style::default().fg(palette.fg)),
    ])
}

fn heading<'a>(text: &'a str, palette: &Palette) -> Line<'a> {
    Line::from(Span::styled(
        text,
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
    ))
}

/// Poster reference with its dimensions when both are known.
pub fn poster_line(movie: &Movie) -> Option<String> {
    let poster = movie.poster()?;
    Some(match movie.poster_dimensions() {
        Some((w, h)) => format!("{poster} ({w}×{h})"),
        None => poster.to_string(),
    })
}

/// Everything above the rating form, in reading order.
pub fn movie_lines<'a>(movie: &'a Movie, palette: &Palette) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    if let Some(poster) = poster_line(movie) {
        lines.push(labelled("Poster: ", poster, palette));
    }

    let mut meta = vec![
        Span::styled("Release Year: ", Style::default().fg(palette.muted)),
        Span::styled(movie.release_year.to_string(), Style::default().fg(palette.fg)),
        Span::styled("   Genre: ", Style::default().fg(palette.muted)),
        Span::styled(movie.genre.as_str(), Style::default().fg(palette.fg)),
        Span::styled("   Director: ", Style::default().fg(palette.muted)),
        Span::styled(movie.director.as_str(), Style::default().fg(palette.fg)),
    ];
    if let Some(rank) = movie.imdb_rank {
        meta.push(Span::styled("   IMDB Rating: ", Style::default().fg(palette.muted)));
        meta.push(Span::styled(format!("⭐ {rank}"), Style::default().fg(palette.rating)));
    }
    lines.push(Line::from(meta));

    if let Some(actors) = &movie.actors {
        lines.push(labelled("Actors: ", actors.clone(), palette));
    }
    if let Some(aka) = &movie.aka {
        lines.push(labelled("Also Known As: ", aka.clone(), palette));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("⭐ {}", average_label(movie.average_rating)),
            Style::default().fg(palette.rating).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({})", count_label(movie.ratings_count)),
            Style::default().fg(palette.muted),
        ),
    ]));

    lines.push(Line::from(""));
    lines.push(heading("Description", palette));
    lines.extend(
        movie
            .description
            .lines()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(palette.fg)))),
    );

    lines.push(Line::from(""));
    lines.push(labelled("Added by: ", movie.created_by.username.clone(), palette));
    if let Some(id) = &movie.imdb_id {
        lines.push(labelled("IMDB ID: ", id.clone(), palette));
    }
    if let Some(url) = &movie.imdb_url {
        lines.push(Line::from(vec![
            Span::styled("IMDB: ", Style::default().fg(palette.muted).add_modifier(Modifier::BOLD)),
            Span::styled(
                url.as_str(),
                Style::default().fg(palette.link).add_modifier(Modifier::UNDERLINED),
            ),
            Span::styled(" [o] View on IMDB", Style::default().fg(palette.muted)),
        ]));
    }
    if let Some(iv) = &movie.imdb_iv {
        lines.push(labelled("IMDB IV: ", iv.clone(), palette));
    }

    lines.push(Line::from(""));
    lines.push(heading("User Ratings", palette));
    if movie.ratings.is_empty() {
        lines.push(Line::from(Span::styled(
            "No ratings yet. Be the first to rate this movie!",
            Style::default().fg(palette.muted),
        )));
    }
    for rating in &movie.ratings {
        lines.push(Line::from(vec![
            Span::styled(
                rating.author(),
                Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  ⭐ {}", rating.score), Style::default().fg(palette.rating)),
            Span::styled(
                format!(
                    "  {}",
                    rating.created_at.with_timezone(&chrono::Local).format("%x")
                ),
                Style::default().fg(palette.muted),
            ),
        ]));
        if let Some(comment) = rating.comment_text() {
            lines.push(Line::from(Span::styled(
                format!("  {comment}"),
                Style::default().fg(palette.fg),
            )));
        }
    }

    lines
}

fn render_rating_form(detail: &MovieDetail, frame: &mut Frame, area: Rect, palette: &Palette) {
    let border = if detail.editing { palette.accent } else { palette.border };
    let score = detail.form.score;

    let stars: String = (MIN_SCORE..=MAX_SCORE)
        .map(|s| if s <= score { '★' } else { '☆' })
        .collect();
    let comment = if detail.form.comment.is_empty() && !detail.editing {
        Span::styled(
            "Share your thoughts about this movie...",
            Style::default().fg(palette.muted),
        )
    } else {
        Span::styled(detail.form.comment.as_str(), Style::default().fg(palette.fg))
    };

    let action = if detail.editing || detail.submitting {
        format!("[Enter] {}", detail.submit_label())
    } else {
        "[r] Rate".to_string()
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Score (1-5): ", Style::default().fg(palette.muted)),
            Span::styled(stars, Style::default().fg(palette.rating)),
            Span::styled(
                format!("  {score} - {}", score_label(score)),
                Style::default().fg(palette.fg),
            ),
        ]),
        Line::from(vec![
            Span::styled("Comment (optional): ", Style::default().fg(palette.muted)),
            comment,
        ]),
        Line::from(""),
        Line::from(Span::styled(
            action,
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
    ];

    let form = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", detail.mode.heading())),
    );
    frame.render_widget(form, area);
}
