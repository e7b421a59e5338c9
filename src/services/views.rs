// src/services/views.rs
//
// Read models handed to callers of the services.
// Associations are resolved to names; ids stay as plain integers.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{Movie, Review, User};
use crate::error::AppResult;
use crate::repositories::MovieRepository;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieView {
    pub id: i64,
    pub title: String,
    pub release_year: i32,
    pub description: String,
    pub director: Option<String>,
    pub actors: Vec<String>,
    pub genres: Vec<String>,
    pub runtime_minutes: u32,
    pub revenue: f64,
    pub review_count: usize,
}

impl MovieView {
    /// Resolves the director, actor and genre names of `movie`
    pub fn build(movie: &Movie, repo: &dyn MovieRepository) -> AppResult<Self> {
        let director = match movie.director {
            Some(id) => repo.get_director_by_id(id)?.map(|d| d.full_name),
            None => None,
        };
        let actors = repo
            .get_actors_by_ids(&movie.actors)?
            .into_iter()
            .map(|a| a.full_name)
            .collect();
        let genres = repo
            .get_genres_by_ids(&movie.genres)?
            .into_iter()
            .map(|g| g.name)
            .collect();

        Ok(Self {
            id: movie.id.value(),
            title: movie.title.clone(),
            release_year: movie.release_year,
            description: movie.description.clone(),
            director,
            actors,
            genres,
            runtime_minutes: movie.runtime_minutes,
            revenue: movie.revenue,
            review_count: movie.reviews.len(),
        })
    }

    pub fn build_all(movies: &[Movie], repo: &dyn MovieRepository) -> AppResult<Vec<Self>> {
        movies.iter().map(|m| Self::build(m, repo)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
    pub id: i64,
    pub movie_id: i64,
    pub author_id: i64,
    pub text: String,
    pub rating: Option<u8>,
    pub timestamp: NaiveDateTime,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.value(),
            movie_id: review.movie().value(),
            author_id: review.author().value(),
            text: review.text.clone(),
            rating: review.rating,
            timestamp: review.timestamp,
        }
    }
}

/// A user without credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub watched_movies: usize,
    pub reviews: usize,
    pub time_spent_watching_minutes: u64,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.value(),
            username: user.username.clone(),
            watched_movies: user.watched_movies.len(),
            reviews: user.reviews.len(),
            time_spent_watching_minutes: user.time_spent_watching_minutes,
        }
    }
}
