use crate::api::{ApiError, Movie, RatingInput, User};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

pub fn score_label(score: u8) -> &'static str {
    match score {
        1 => "Poor",
        2 => "Fair",
        3 => "Good",
        4 => "Very Good",
        _ => "Excellent",
    }
}

/// Whether submitting the rating form creates a new rating or replaces the
/// user's existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingMode {
    Create,
    Update,
}

impl RatingMode {
    pub fn heading(self) -> &'static str {
        match self {
            Self::Create => "Rate This Movie",
            Self::Update => "Update Your Rating",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Create => "Submit Rating",
            Self::Update => "Update Rating",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::Create => "Rating submitted successfully!",
            Self::Update => "Rating updated successfully!",
        }
    }
}

pub const RATING_FAILED: &str = "Failed to submit rating. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingForm {
    pub score: u8,
    pub comment: String,
}

impl Default for RatingForm {
    fn default() -> Self {
        Self {
            score: MAX_SCORE,
            comment: String::new(),
        }
    }
}

impl RatingForm {
    /// Form contents for `user` viewing `movie`: their existing rating when
    /// they have one, the defaults otherwise.
    pub fn for_viewer(movie: &Movie, user: Option<&User>) -> (Self, RatingMode) {
        match user.and_then(|u| movie.rating_by(u.id)) {
            Some(existing) => (
                Self {
                    score: existing.score.clamp(MIN_SCORE, MAX_SCORE),
                    comment: existing.comment.clone().unwrap_or_default(),
                },
                RatingMode::Update,
            ),
            None => (Self::default(), RatingMode::Create),
        }
    }

    pub fn raise(&mut self) {
        self.score = (self.score + 1).min(MAX_SCORE);
    }

    pub fn lower(&mut self) {
        self.score = self.score.saturating_sub(1).max(MIN_SCORE);
    }

    pub fn input(&self) -> RatingInput {
        RatingInput {
            score: self.score,
            comment: self.comment.clone(),
        }
    }
}

/// What a key press in the rating form asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingKey {
    Submit,
    Leave,
    Handled,
}

/// State of a single movie's page.
#[derive(Debug, Clone)]
pub struct MovieDetail {
    pub id: i64,
    pub movie: Option<Movie>,
    pub loading: bool,
    pub error: Option<String>,
    pub form: RatingForm,
    pub mode: RatingMode,
    pub submitting: bool,
    /// Success message held back until the movie has been fetched again.
    pub pending_notice: Option<&'static str>,
    /// Keys go to the rating form instead of page navigation.
    pub editing: bool,
    pub scroll: u16,
}

impl MovieDetail {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            movie: None,
            loading: true,
            error: None,
            form: RatingForm::default(),
            mode: RatingMode::Create,
            submitting: false,
            pending_notice: None,
            editing: false,
            scroll: 0,
        }
    }

    /// Apply a fetched movie and re-derive the form for the current viewer.
    pub fn apply_movie(&mut self, result: Result<Movie, ApiError>, viewer: Option<&User>) {
        self.loading = false;
        match result {
            Ok(movie) => {
                let (form, mode) = RatingForm::for_viewer(&movie, viewer);
                self.form = form;
                self.mode = mode;
                self.movie = Some(movie);
                self.error = None;
            }
            Err(ApiError::NotFound) => {
                self.movie = None;
                self.error = Some("Movie not found".to_string());
            }
            Err(e) => {
                tracing::warn!(id = self.id, error = %e, "failed to load movie");
                self.error = Some("Failed to load movie details".to_string());
            }
        }
    }

    /// Start submitting the form. `None` while a submission is in flight.
    pub fn begin_submit(&mut self) -> Option<(RatingInput, RatingMode)> {
        if self.submitting || self.movie.is_none() {
            return None;
        }
        self.submitting = true;
        self.editing = false;
        Some((self.form.input(), self.mode))
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Submitting..."
        } else {
            self.mode.submit_label()
        }
    }

    pub fn handle_form_key(&mut self, key: KeyEvent) -> RatingKey {
        match key.code {
            KeyCode::Enter => RatingKey::Submit,
            KeyCode::Esc => RatingKey::Leave,
            KeyCode::Left | KeyCode::Down => {
                self.form.lower();
                RatingKey::Handled
            }
            KeyCode::Right | KeyCode::Up => {
                self.form.raise();
                RatingKey::Handled
            }
            KeyCode::Backspace => {
                self.form.comment.pop();
                RatingKey::Handled
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.comment.push(c);
                RatingKey::Handled
            }
            _ => RatingKey::Handled,
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll = self.scroll.saturating_add(20);
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(20);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::fixtures::{movie, rating, user};
    use crate::pages::form::key;

    #[test]
    fn test_existing_rating_switches_to_update() {
        let ana = user(1, "ana");
        let bo = user(2, "bo");
        let mut m = movie(5);
        m.ratings = vec![
            rating(10, &bo, 2, Some("meh")),
            rating(11, &ana, 4, Some("great")),
        ];

        let mut page = MovieDetail::new(5);
        page.apply_movie(Ok(m), Some(&ana));
        assert_eq!(page.mode, RatingMode::Update);
        assert_eq!(page.form, RatingForm { score: 4, comment: "great".into() });
        assert_eq!(page.submit_label(), "Update Rating");
        assert_eq!(page.mode.heading(), "Update Your Rating");
    }

    #[test]
    fn test_no_rating_defaults_to_create() {
        let bo = user(2, "bo");
        let mut m = movie(5);
        m.ratings = vec![rating(10, &bo, 2, None)];

        let mut page = MovieDetail::new(5);
        page.apply_movie(Ok(m.clone()), Some(&user(1, "ana")));
        assert_eq!(page.mode, RatingMode::Create);
        assert_eq!(page.form, RatingForm::default());
        assert_eq!(page.form.score, 5);
        assert_eq!(page.submit_label(), "Submit Rating");

        let mut anonymous = MovieDetail::new(5);
        anonymous.apply_movie(Ok(m), None);
        assert_eq!(anonymous.mode, RatingMode::Create);
    }

    #[test]
    fn test_null_comment_becomes_empty() {
        let ana = user(1, "ana");
        let mut m = movie(5);
        m.ratings = vec![rating(11, &ana, 3, None)];
        let (form, mode) = RatingForm::for_viewer(&m, Some(&ana));
        assert_eq!(form.comment, "");
        assert_eq!(form.score, 3);
        assert_eq!(mode, RatingMode::Update);
    }

    #[test]
    fn test_load_errors() {
        let mut page = MovieDetail::new(9);
        page.apply_movie(Err(ApiError::NotFound), None);
        assert_eq!(page.error.as_deref(), Some("Movie not found"));

        let mut page = MovieDetail::new(9);
        page.apply_movie(
            Err(ApiError::Api {
                status: 500,
                body: String::new(),
            }),
            None,
        );
        assert_eq!(page.error.as_deref(), Some("Failed to load movie details"));
        assert!(!page.loading);
    }

    #[test]
    fn test_score_stays_in_range() {
        let mut form = RatingForm::default();
        form.raise();
        assert_eq!(form.score, 5);
        for _ in 0..10 {
            form.lower();
        }
        assert_eq!(form.score, 1);
        assert_eq!(score_label(1), "Poor");
        assert_eq!(score_label(4), "Very Good");
    }

    #[test]
    fn test_form_keys_and_single_submission() {
        let mut page = MovieDetail::new(5);
        page.apply_movie(Ok(movie(5)), None);
        page.editing = true;

        page.handle_form_key(key(KeyCode::Left));
        page.handle_form_key(key(KeyCode::Char('o')));
        page.handle_form_key(key(KeyCode::Char('k')));
        assert_eq!(page.handle_form_key(key(KeyCode::Enter)), RatingKey::Submit);

        let (input, mode) = page.begin_submit().unwrap();
        assert_eq!(input, RatingInput { score: 4, comment: "ok".into() });
        assert_eq!(mode, RatingMode::Create);
        assert!(!page.editing);
        assert_eq!(page.submit_label(), "Submitting...");
        assert!(page.begin_submit().is_none());
    }
}
