use super::{ApiClient, ApiError, Rating, RatingInput, RatingList};
use reqwest::Method;

/// Rating endpoints, nested under movies and users.
pub struct RatingsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RatingsApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /movies/{id}/ratings/`. The server keys the rating on the caller,
    /// so a second call for the same movie replaces the earlier score.
    pub async fn create_or_update(
        &self,
        movie_id: i64,
        input: &RatingInput,
    ) -> Result<Rating, ApiError> {
        let builder = self
            .client
            .request(Method::POST, &format!("/movies/{movie_id}/ratings/"))
            .json(input);
        ApiClient::send(builder).await
    }

    /// `GET /movies/{id}/ratings/`
    pub async fn for_movie(&self, movie_id: i64) -> Result<Vec<Rating>, ApiError> {
        let builder = self
            .client
            .request(Method::GET, &format!("/movies/{movie_id}/ratings/"));
        Ok(ApiClient::send::<RatingList>(builder).await?.into_vec())
    }

    /// `GET /users/{id}/ratings/`
    pub async fn for_user(&self, user_id: i64) -> Result<Vec<Rating>, ApiError> {
        let builder = self
            .client
            .request(Method::GET, &format!("/users/{user_id}/ratings/"));
        Ok(ApiClient::send::<RatingList>(builder).await?.into_vec())
    }
}
