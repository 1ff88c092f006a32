use super::{ApiClient, ApiError, Movie, MoviePayload, MovieQuery, NewMovie, Page, PosterFile};
use reqwest::Method;
use reqwest::multipart::{Form, Part};

/// `/movies/*` endpoints.
pub struct MoviesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MoviesApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /movies/?page=&search=`
    pub async fn list(&self, query: &MovieQuery) -> Result<Page<Movie>, ApiError> {
        let builder = self
            .client
            .request(Method::GET, "/movies/")
            .query(&query.params());
        ApiClient::send(builder).await
    }

    /// `GET /movies/{id}/`, with the movie's ratings embedded.
    pub async fn get(&self, id: i64) -> Result<Movie, ApiError> {
        let builder = self.client.request(Method::GET, &format!("/movies/{id}/"));
        ApiClient::send(builder).await
    }

    /// `POST /movies/`. JSON payloads go out as JSON; a poster file switches
    /// the whole body to `multipart/form-data`.
    pub async fn create(&self, payload: &MoviePayload) -> Result<Movie, ApiError> {
        tracing::info!(
            title = %payload.movie().title,
            with_poster = matches!(payload, MoviePayload::Multipart { .. }),
            "creating movie"
        );
        let builder = self.client.request(Method::POST, "/movies/");
        let builder = match payload {
            MoviePayload::Json(movie) => builder.json(movie),
            MoviePayload::Multipart { movie, poster } => {
                builder.multipart(multipart_form(movie, poster).await?)
            }
        };
        ApiClient::send(builder).await
    }

    /// `PUT /movies/{id}/`
    pub async fn update(&self, id: i64, movie: &NewMovie) -> Result<Movie, ApiError> {
        let builder = self
            .client
            .request(Method::PUT, &format!("/movies/{id}/"))
            .json(movie);
        ApiClient::send(builder).await
    }

    /// `DELETE /movies/{id}/`
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let builder = self.client.request(Method::DELETE, &format!("/movies/{id}/"));
        ApiClient::send_empty(builder).await
    }
}

async fn multipart_form(movie: &NewMovie, poster: &PosterFile) -> Result<Form, ApiError> {
    let bytes = tokio::fs::read(&poster.path)
        .await
        .map_err(|source| ApiError::Poster {
            path: poster.path.clone(),
            source,
        })?;
    tracing::debug!(file = %poster.path.display(), size = bytes.len(), "attaching poster");

    let mut form = Form::new();
    for (name, value) in movie.text_fields() {
        form = form.text(name, value);
    }
    let part = Part::bytes(bytes)
        .file_name(poster.file_name())
        .mime_str(poster.mime_type())?;
    Ok(form.part("poster_image", part))
}
