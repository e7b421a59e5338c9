use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::domain::ids::{MovieId, ReviewId, UserId};
use crate::domain::movie::Movie;
use crate::domain::names::normalize_username;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Lowercased, trimmed. Natural key.
    pub username: String,

    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Watched movies, first watch order, no duplicates
    pub watched_movies: Vec<MovieId>,

    pub reviews: Vec<ReviewId>,

    /// Sum of runtimes of watched movies
    pub time_spent_watching_minutes: u64,
}

impl User {
    pub fn new(id: UserId, username: impl AsRef<str>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            username: normalize_username(username.as_ref()),
            password_hash: password_hash.into(),
            watched_movies: Vec::new(),
            reviews: Vec::new(),
            time_spent_watching_minutes: 0,
        }
    }

    /// Marks `movie` as watched. Watching the same movie twice counts once.
    /// Returns whether the movie was newly recorded.
    pub fn watch_movie(&mut self, movie: &Movie) -> bool {
        if self.watched_movies.contains(&movie.id) {
            return false;
        }
        self.watched_movies.push(movie.id);
        self.time_spent_watching_minutes += u64::from(movie.runtime_minutes);
        true
    }

    pub fn has_watched(&self, movie: MovieId) -> bool {
        self.watched_movies.contains(&movie)
    }

    pub fn add_review(&mut self, review: ReviewId) {
        if !self.reviews.contains(&review) {
            self.reviews.push(review);
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.username.hash(state);
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<User {}>", self.username)
    }
}
