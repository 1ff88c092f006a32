//! Per-route page state. Each page owns its form and loading flags and turns
//! user intent into API requests; the router in `app` decides when pages are
//! entered and feeds responses back.

pub mod add_movie;
pub mod auth;
pub mod form;
pub mod movie_detail;
pub mod movie_list;

pub use add_movie::AddMovie;
pub use auth::{LoginPage, RegisterPage};
pub use form::{Form, FormField, FormInput};
pub use movie_detail::{MovieDetail, RatingForm, RatingMode};
pub use movie_list::MovieList;
