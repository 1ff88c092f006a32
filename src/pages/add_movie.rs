use super::form::{Form, FormField, FormInput};
use crate::api::{ApiError, Movie, MoviePayload, NewMovie, PosterFile};
use chrono::Datelike;
use crossterm::event::KeyEvent;
use std::path::PathBuf;
use thiserror::Error;

const POSTER_URL_LOCKED: &str = "Clear file selection to use URL instead";

pub const MIN_RELEASE_YEAR: i32 = 1900;
/// Release years may run this far past the current year.
pub const FUTURE_YEARS: i32 = 5;

/// Client-side validation failures, reported before any request is sent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Release year must be a number")]
    InvalidYear,

    #[error("Release year must be between {min} and {max}")]
    YearOutOfRange { min: i32, max: i32 },

    #[error("IMDB rating must be a number between 0 and 10")]
    InvalidImdbRank,

    #[error("{0} must be a positive whole number")]
    InvalidDimension(&'static str),

    #[error("Poster file not found: {}", .0.display())]
    PosterMissing(PathBuf),
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Add-movie form state.
#[derive(Debug, Clone)]
pub struct AddMovie {
    pub form: Form,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for AddMovie {
    fn default() -> Self {
        Self::new()
    }
}

impl AddMovie {
    pub fn new() -> Self {
        Self::with_year(current_year())
    }

    fn with_year(year: i32) -> Self {
        let form = Form::new(vec![
            FormField::new("title", "Title")
                .required()
                .section("Basic Information"),
            FormField::new("description", "Description").required(),
            FormField::new("release_year", "Release Year")
                .required()
                .with_value(year.to_string()),
            FormField::new("genre", "Genre")
                .required()
                .placeholder("e.g., Drama, Action, Comedy"),
            FormField::new("director", "Director").required(),
            FormField::new("actors", "Actors").hint("Comma-separated list of actors"),
            FormField::new("imdb_id", "IMDB ID")
                .placeholder("e.g., tt0111161")
                .section("IMDB Information (Optional)"),
            FormField::new("imdb_rank", "IMDB Rating").placeholder("0.0 - 10.0"),
            FormField::new("imdb_url", "IMDB URL").placeholder("https://www.imdb.com/title/..."),
            FormField::new("aka", "Also Known As").hint("Alternative titles"),
            FormField::new("imdb_iv", "IMDB IV"),
            FormField::new("poster_file", "Poster File")
                .placeholder("/path/to/poster.jpg")
                .section("Poster Image (Optional)"),
            FormField::new("poster_url", "Poster URL").placeholder("https://..."),
            FormField::new("photo_width", "Width"),
            FormField::new("photo_height", "Height"),
        ]);
        Self {
            form,
            loading: false,
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        let input = self.form.handle_key(key);
        if input == FormInput::Edited {
            self.sync_poster_source();
        }
        input
    }

    /// The URL field is locked while a poster file path is entered.
    pub fn sync_poster_source(&mut self) {
        let has_file = self.form.non_empty("poster_file").is_some();
        self.form.set_disabled("poster_url", has_file);
        self.form
            .set_hint("poster_url", has_file.then_some(POSTER_URL_LOCKED));
    }

    /// Validate the form and build the request body.
    pub fn build_payload(&self) -> Result<MoviePayload, FormError> {
        self.build_payload_for(current_year())
    }

    fn build_payload_for(&self, year_now: i32) -> Result<MoviePayload, FormError> {
        if let Some(label) = self.form.missing_required() {
            return Err(FormError::Required(label));
        }

        let release_year: i32 = self
            .form
            .value("release_year")
            .trim()
            .parse()
            .map_err(|_| FormError::InvalidYear)?;
        let max = year_now + FUTURE_YEARS;
        if !(MIN_RELEASE_YEAR..=max).contains(&release_year) {
            return Err(FormError::YearOutOfRange {
                min: MIN_RELEASE_YEAR,
                max,
            });
        }

        let imdb_rank = match self.form.non_empty("imdb_rank") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(rank) if (0.0..=10.0).contains(&rank) => Some(rank),
                _ => return Err(FormError::InvalidImdbRank),
            },
            None => None,
        };

        let photo_width = self.dimension("photo_width", "Width")?;
        let photo_height = self.dimension("photo_height", "Height")?;

        let poster = match self.form.non_empty("poster_file") {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.is_file() {
                    return Err(FormError::PosterMissing(path));
                }
                Some(PosterFile::new(path))
            }
            None => None,
        };

        let movie = NewMovie {
            title: self.form.value("title").trim().to_string(),
            description: self.form.value("description").trim().to_string(),
            release_year,
            genre: self.form.value("genre").trim().to_string(),
            director: self.form.value("director").trim().to_string(),
            imdb_id: self.form.non_empty("imdb_id"),
            imdb_rank,
            actors: self.form.non_empty("actors"),
            aka: self.form.non_empty("aka"),
            imdb_url: self.form.non_empty("imdb_url"),
            imdb_iv: self.form.non_empty("imdb_iv"),
            poster_url: self.form.non_empty("poster_url"),
            photo_width,
            photo_height,
        };
        Ok(MoviePayload::new(movie, poster))
    }

    fn dimension(&self, name: &str, label: &'static str) -> Result<Option<u32>, FormError> {
        match self.form.non_empty(name) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(v) if v >= 1 => Ok(Some(v)),
                _ => Err(FormError::InvalidDimension(label)),
            },
            None => Ok(None),
        }
    }

    /// Validate and mark pending. Validation failures land in `error`.
    pub fn begin_submit(&mut self) -> Option<MoviePayload> {
        if self.loading {
            return None;
        }
        match self.build_payload() {
            Ok(payload) => {
                self.error = None;
                self.loading = true;
                Some(payload)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading { "Creating..." } else { "Add Movie" }
    }

    /// Returns the new movie's id on success.
    pub fn apply(&mut self, result: Result<Movie, ApiError>) -> Option<i64> {
        self.loading = false;
        match result {
            Ok(movie) => {
                tracing::info!(id = movie.id, "movie created");
                Some(movie.id)
            }
            Err(e @ ApiError::Poster { .. }) => {
                self.error = Some(e.to_string());
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to create movie");
                self.error = Some(
                    e.field_message("message")
                        .unwrap_or_else(|| "Failed to create movie".to_string()),
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::fixtures::movie;
    use crate::pages::form::{key, type_text};
    use crossterm::event::KeyCode;
    use std::io::Write;

    fn filled() -> AddMovie {
        let mut page = AddMovie::with_year(2025);
        page.form.set_value("title", "X");
        page.form.set_value("description", "Y");
        page.form.set_value("release_year", "2024");
        page.form.set_value("genre", "Drama");
        page.form.set_value("director", "Z");
        page
    }

    #[test]
    fn test_defaults_to_current_year() {
        let page = AddMovie::with_year(2031);
        assert_eq!(page.form.value("release_year"), "2031");
        assert_eq!(page.submit_label(), "Add Movie");
        assert_eq!(
            page.form.field("actors").and_then(|f| f.hint),
            Some("Comma-separated list of actors")
        );
    }

    #[test]
    fn test_minimal_movie_is_json_without_optionals() {
        let payload = filled().build_payload_for(2025).unwrap();
        let MoviePayload::Json(movie) = payload else {
            panic!("expected a JSON payload");
        };
        assert_eq!(
            serde_json::to_value(&movie).unwrap(),
            serde_json::json!({
                "title": "X",
                "description": "Y",
                "release_year": 2024,
                "genre": "Drama",
                "director": "Z",
            })
        );
    }

    #[test]
    fn test_blank_optionals_are_omitted() {
        let mut page = filled();
        page.form.set_value("actors", "   ");
        page.form.set_value("imdb_id", "tt0111161");
        page.form.set_value("imdb_rank", "9.3");
        let movie = page.build_payload_for(2025).unwrap().movie().clone();
        assert_eq!(movie.actors, None);
        assert_eq!(movie.imdb_id.as_deref(), Some("tt0111161"));
        assert_eq!(movie.imdb_rank, Some(9.3));
    }

    #[test]
    fn test_validation_errors() {
        let mut page = filled();
        page.form.set_value("genre", "");
        assert_eq!(page.build_payload_for(2025), Err(FormError::Required("Genre")));

        let mut page = filled();
        page.form.set_value("release_year", "1899");
        assert_eq!(
            page.build_payload_for(2025),
            Err(FormError::YearOutOfRange { min: 1900, max: 2030 })
        );
        page.form.set_value("release_year", "2030");
        assert!(page.build_payload_for(2025).is_ok());
        page.form.set_value("release_year", "soon");
        assert_eq!(page.build_payload_for(2025), Err(FormError::InvalidYear));

        let mut page = filled();
        page.form.set_value("imdb_rank", "10.5");
        assert_eq!(page.build_payload_for(2025), Err(FormError::InvalidImdbRank));

        let mut page = filled();
        page.form.set_value("photo_width", "0");
        assert_eq!(
            page.build_payload_for(2025),
            Err(FormError::InvalidDimension("Width"))
        );

        let mut page = filled();
        page.form.set_value("poster_file", "/definitely/not/here.png");
        assert!(matches!(
            page.build_payload_for(2025),
            Err(FormError::PosterMissing(_))
        ));
    }

    #[test]
    fn test_poster_file_displaces_url() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"png").unwrap();

        let mut page = filled();
        page.form.set_value("poster_url", "https://img.example/p.jpg");
        page.form.focus = page
            .form
            .fields
            .iter()
            .position(|f| f.name == "poster_file")
            .unwrap();
        type_text(&mut page.form, &file.path().to_string_lossy());
        page.sync_poster_source();

        assert!(page.form.field("poster_url").unwrap().disabled);
        assert_eq!(
            page.form.field("poster_url").and_then(|f| f.hint),
            Some("Clear file selection to use URL instead")
        );

        match page.build_payload_for(2025).unwrap() {
            MoviePayload::Multipart { movie, poster } => {
                assert_eq!(movie.poster_url, None);
                assert_eq!(poster.path, file.path());
            }
            other => panic!("expected multipart, got {other:?}"),
        }

        let clear = KeyEvent::new(KeyCode::Char('u'), crossterm::event::KeyModifiers::CONTROL);
        page.handle_key(clear);
        assert!(!page.form.field("poster_url").unwrap().disabled);
        assert_eq!(page.form.field("poster_url").unwrap().hint, None);
        let MoviePayload::Json(movie) = page.build_payload_for(2025).unwrap() else {
            panic!("expected a JSON payload");
        };
        assert_eq!(movie.poster_url.as_deref(), Some("https://img.example/p.jpg"));
    }

    #[test]
    fn test_submit_and_result() {
        let mut page = AddMovie::with_year(2025);
        assert!(page.begin_submit().is_none());
        assert_eq!(page.error.as_deref(), Some("Title is required"));

        let mut page = filled();
        assert!(page.begin_submit().is_some());
        assert_eq!(page.submit_label(), "Creating...");
        assert!(page.begin_submit().is_none());
        assert_eq!(page.apply(Ok(movie(42))), Some(42));
        assert!(!page.loading);
    }

    #[test]
    fn test_server_error_messages() {
        let mut page = filled();
        page.apply(Err(ApiError::Api {
            status: 400,
            body: r#"{"message": "Movie already exists"}"#.into(),
        }));
        assert_eq!(page.error.as_deref(), Some("Movie already exists"));

        page.apply(Err(ApiError::Api {
            status: 500,
            body: "<html>".into(),
        }));
        assert_eq!(page.error.as_deref(), Some("Failed to create movie"));
    }

    #[test]
    fn test_escape_cancels() {
        let mut page = AddMovie::with_year(2025);
        assert_eq!(page.handle_key(key(KeyCode::Esc)), FormInput::Cancel);
    }
}
