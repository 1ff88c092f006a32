use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Page size the backend paginates movie listings with.
pub const PAGE_SIZE: u64 = 10;

/// Public identity of an account, as embedded in movies, ratings and sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Token pair issued on login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

/// Body of a successful `/auth/login/` or `/auth/register/` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: Tokens,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

/// A single user's score for a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    #[serde(default)]
    pub movie: Option<i64>,
    pub user: User,
    #[serde(default)]
    pub username: String,
    pub score: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    /// Name shown next to the rating; falls back to the nested user record.
    pub fn author(&self) -> &str {
        if self.username.is_empty() {
            &self.user.username
        } else {
            &self.username
        }
    }

    /// Comment text, treating a blank comment as absent.
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Movie record as returned by the list and detail endpoints.
///
/// List responses leave `ratings` empty; the detail endpoint embeds them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub genre: String,
    pub director: String,
    pub created_by: User,
    #[serde(default, deserialize_with = "decimal")]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub ratings_count: u32,
    #[serde(default)]
    pub ratings: Vec<Rating>,

    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default, deserialize_with = "decimal")]
    pub imdb_rank: Option<f64>,
    #[serde(default)]
    pub imdb_url: Option<String>,
    #[serde(default)]
    pub imdb_iv: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub aka: Option<String>,

    #[serde(default)]
    pub poster_image: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub photo_width: Option<u32>,
    #[serde(default)]
    pub photo_height: Option<u32>,
}

impl Movie {
    /// Uploaded image wins over a remote poster URL.
    pub fn poster(&self) -> Option<&str> {
        non_blank(&self.poster_image).or_else(|| non_blank(&self.poster_url))
    }

    pub fn poster_dimensions(&self) -> Option<(u32, u32)> {
        match (self.photo_width, self.photo_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// The rating left by `user_id`, if any.
    pub fn rating_by(&self, user_id: i64) -> Option<&Rating> {
        self.ratings.iter().find(|r| r.user.id == user_id)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Django serialises decimals as strings; accept either representation.
fn decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Float(f64),
        Text(String),
    }

    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Number::Float(v)) => Ok(Some(v)),
        Some(Number::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Number::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub results: Vec<T>,
}

/// Rating listings come back paginated or as a bare array depending on the
/// server's pagination settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RatingList {
    Paged(Page<Rating>),
    Plain(Vec<Rating>),
}

impl RatingList {
    pub fn into_vec(self) -> Vec<Rating> {
        match self {
            Self::Paged(page) => page.results,
            Self::Plain(ratings) => ratings,
        }
    }
}

/// Query for `GET /movies/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    pub page: u32,
    pub search: Option<String>,
}

impl MovieQuery {
    pub fn new(page: u32, search: &str) -> Self {
        let search = search.trim();
        Self {
            page: page.max(1),
            search: (!search.is_empty()).then(|| search.to_string()),
        }
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string())];
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params
    }
}

/// Fields accepted when creating or replacing a movie.
///
/// Optional fields set to `None` are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub genre: String,
    pub director: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_rank: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aka: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_iv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_height: Option<u32>,
}

impl NewMovie {
    /// Non-empty fields as text pairs, in form order, for multipart encoding.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        let mut push = |name: &'static str, value: String| {
            if !value.is_empty() {
                fields.push((name, value));
            }
        };

        push("title", self.title.clone());
        push("description", self.description.clone());
        push("release_year", self.release_year.to_string());
        push("genre", self.genre.clone());
        push("director", self.director.clone());
        if let Some(v) = &self.imdb_id {
            push("imdb_id", v.clone());
        }
        if let Some(v) = self.imdb_rank {
            push("imdb_rank", v.to_string());
        }
        if let Some(v) = &self.actors {
            push("actors", v.clone());
        }
        if let Some(v) = &self.aka {
            push("aka", v.clone());
        }
        if let Some(v) = &self.imdb_url {
            push("imdb_url", v.clone());
        }
        if let Some(v) = &self.imdb_iv {
            push("imdb_iv", v.clone());
        }
        if let Some(v) = &self.poster_url {
            push("poster_url", v.clone());
        }
        if let Some(v) = self.photo_width {
            push("photo_width", v.to_string());
        }
        if let Some(v) = self.photo_height {
            push("photo_height", v.to_string());
        }
        fields
    }
}

/// Editable fields of an existing movie; the uploaded image stays on the server.
impl From<&Movie> for NewMovie {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            description: movie.description.clone(),
            release_year: movie.release_year,
            genre: movie.genre.clone(),
            director: movie.director.clone(),
            imdb_id: movie.imdb_id.clone(),
            imdb_rank: movie.imdb_rank,
            actors: movie.actors.clone(),
            aka: movie.aka.clone(),
            imdb_url: movie.imdb_url.clone(),
            imdb_iv: movie.imdb_iv.clone(),
            poster_url: movie.poster_url.clone(),
            photo_width: movie.photo_width,
            photo_height: movie.photo_height,
        }
    }
}

/// Poster image on local disk, read when the request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterFile {
    pub path: PathBuf,
}

impl PosterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "poster".to_string())
    }

    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            _ => "application/octet-stream",
        }
    }
}

/// Body of a create-movie request: plain JSON, or multipart when a poster
/// file travels with it.
#[derive(Debug, Clone, PartialEq)]
pub enum MoviePayload {
    Json(NewMovie),
    Multipart { movie: NewMovie, poster: PosterFile },
}

impl MoviePayload {
    /// Picks the encoding from the presence of a poster file. An attached
    /// file always displaces the poster URL.
    pub fn new(mut movie: NewMovie, poster: Option<PosterFile>) -> Self {
        match poster {
            Some(poster) => {
                movie.poster_url = None;
                Self::Multipart { movie, poster }
            }
            None => Self::Json(movie),
        }
    }

    pub fn movie(&self) -> &NewMovie {
        match self {
            Self::Json(movie) => movie,
            Self::Multipart { movie, .. } => movie,
        }
    }
}

/// Body of `POST /movies/{id}/ratings/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingInput {
    pub score: u8,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_movie_json() -> serde_json::Value {
        json!({
            "id": 7,
            "title": "Heat",
            "description": "A crew of thieves.",
            "release_year": 1995,
            "genre": "Crime",
            "director": "Michael Mann",
            "created_by": {"id": 1, "username": "ana", "email": "ana@example.com"},
            "average_rating": 4.5,
            "ratings_count": 2,
            "imdb_rank": "8.3",
            "ratings": [{
                "id": 3,
                "movie": 7,
                "user": {"id": 2, "username": "bo"},
                "username": "bo",
                "score": 4,
                "comment": "",
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:00:00Z"
            }],
            "created_at": "2024-04-30T09:00:00Z"
        })
    }

    #[test]
    fn test_movie_deserializes_with_string_decimal() {
        let movie: Movie = serde_json::from_value(sample_movie_json()).unwrap();
        assert_eq!(movie.imdb_rank, Some(8.3));
        assert_eq!(movie.average_rating, Some(4.5));
        assert_eq!(movie.ratings.len(), 1);
        assert_eq!(movie.ratings[0].comment_text(), None);
        assert!(movie.poster().is_none());
    }

    #[test]
    fn test_new_movie_from_existing_keeps_editable_fields() {
        let movie: Movie = serde_json::from_value(sample_movie_json()).unwrap();
        let edit = NewMovie::from(&movie);
        assert_eq!(edit.title, "Heat");
        assert_eq!(edit.imdb_rank, Some(8.3));
        let body = serde_json::to_value(&edit).unwrap();
        assert!(body.get("created_by").is_none());
        assert!(body.get("poster_url").is_none());
    }

    #[test]
    fn test_list_movie_without_ratings_field() {
        let mut value = sample_movie_json();
        value.as_object_mut().unwrap().remove("ratings");
        value["average_rating"] = json!(0);
        let movie: Movie = serde_json::from_value(value).unwrap();
        assert!(movie.ratings.is_empty());
        assert_eq!(movie.average_rating, Some(0.0));
    }

    #[test]
    fn test_rating_by_matches_user_id() {
        let movie: Movie = serde_json::from_value(sample_movie_json()).unwrap();
        assert_eq!(movie.rating_by(2).map(|r| r.id), Some(3));
        assert!(movie.rating_by(1).is_none());
    }

    #[test]
    fn test_poster_prefers_uploaded_image() {
        let mut movie: Movie = serde_json::from_value(sample_movie_json()).unwrap();
        movie.poster_url = Some("https://img.example/heat.jpg".into());
        assert_eq!(movie.poster(), Some("https://img.example/heat.jpg"));
        movie.poster_image = Some("/media/posters/heat.png".into());
        assert_eq!(movie.poster(), Some("/media/posters/heat.png"));
    }

    #[test]
    fn test_movie_query_omits_blank_search() {
        let query = MovieQuery::new(0, "   ");
        assert_eq!(query.page, 1);
        assert_eq!(query.params(), vec![("page", "1".to_string())]);

        let query = MovieQuery::new(3, " drama ");
        assert_eq!(
            query.params(),
            vec![("page", "3".to_string()), ("search", "drama".to_string())]
        );
    }

    #[test]
    fn test_new_movie_json_skips_missing_optionals() {
        let movie = NewMovie {
            title: "X".into(),
            description: "Y".into(),
            release_year: 2024,
            genre: "Drama".into(),
            director: "Z".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "X",
                "description": "Y",
                "release_year": 2024,
                "genre": "Drama",
                "director": "Z"
            })
        );
    }

    #[test]
    fn test_payload_with_file_drops_poster_url() {
        let movie = NewMovie {
            title: "X".into(),
            poster_url: Some("https://img.example/x.jpg".into()),
            ..Default::default()
        };
        let payload = MoviePayload::new(movie.clone(), Some(PosterFile::new("/tmp/x.png")));
        match &payload {
            MoviePayload::Multipart { movie, poster } => {
                assert!(movie.poster_url.is_none());
                assert!(!movie.text_fields().iter().any(|(k, _)| *k == "poster_url"));
                assert_eq!(poster.mime_type(), "image/png");
                assert_eq!(poster.file_name(), "x.png");
            }
            other => panic!("expected multipart payload, got {other:?}"),
        }

        let payload = MoviePayload::new(movie, None);
        assert_eq!(
            payload.movie().poster_url.as_deref(),
            Some("https://img.example/x.jpg")
        );
    }
}
