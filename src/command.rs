use crate::api::{
    ApiClient, ApiError, AuthResponse, Credentials, Movie, MoviePayload, MovieQuery, Page,
    RatingInput, Registration,
};
use crate::pages::RatingMode;

/// Requests the UI asks the event loop to run against the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch one page of the movie list
    LoadMovies(MovieQuery),

    /// Fetch a movie's detail
    LoadMovie(i64),

    /// Create or replace the current user's rating
    SubmitRating {
        movie_id: i64,
        input: RatingInput,
        mode: RatingMode,
    },

    /// Create a movie
    CreateMovie(MoviePayload),

    Login(Credentials),

    Register(Registration),
}

/// Responses sent from request tasks back to the UI
#[derive(Debug)]
pub enum Outcome {
    Movies(Result<Page<Movie>, ApiError>),

    Movie {
        id: i64,
        result: Result<Movie, ApiError>,
    },

    RatingSubmitted {
        movie_id: i64,
        mode: RatingMode,
        result: Result<(), ApiError>,
    },

    MovieCreated(Result<Movie, ApiError>),

    LoggedIn(Result<AuthResponse, ApiError>),

    Registered(Result<AuthResponse, ApiError>),
}

impl Command {
    /// Short label for logs. Never includes the payload, which may hold
    /// credentials.
    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadMovies(_) => "load_movies",
            Command::LoadMovie(_) => "load_movie",
            Command::SubmitRating { .. } => "submit_rating",
            Command::CreateMovie(_) => "create_movie",
            Command::Login(_) => "login",
            Command::Register(_) => "register",
        }
    }

    /// Run the request and wrap the response for the UI.
    pub async fn run(self, api: &ApiClient) -> Outcome {
        match self {
            Command::LoadMovies(query) => Outcome::Movies(api.movies().list(&query).await),
            Command::LoadMovie(id) => Outcome::Movie {
                id,
                result: api.movies().get(id).await,
            },
            Command::SubmitRating {
                movie_id,
                input,
                mode,
            } => Outcome::RatingSubmitted {
                movie_id,
                mode,
                result: api
                    .ratings()
                    .create_or_update(movie_id, &input)
                    .await
                    .map(|_| ()),
            },
            Command::CreateMovie(payload) => {
                Outcome::MovieCreated(api.movies().create(&payload).await)
            }
            Command::Login(credentials) => Outcome::LoggedIn(api.auth().login(&credentials).await),
            Command::Register(registration) => {
                Outcome::Registered(api.auth().register(&registration).await)
            }
        }
    }
}
