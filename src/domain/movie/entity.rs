use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::domain::ids::{ActorId, DirectorId, GenreId, MovieId, ReviewId};

/// A movie in the catalog
///
/// Identity is the (title, release_year) pair. Equality, ordering and
/// hashing ignore every other field, including the surrogate id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Surrogate identifier
    pub id: MovieId,

    pub title: String,

    pub release_year: i32,

    pub description: String,

    /// Zero when unknown
    pub runtime_minutes: u32,

    /// Revenue in millions, never negative
    pub revenue: f64,

    /// At most one director
    pub director: Option<DirectorId>,

    /// Actors in billing order
    pub actors: Vec<ActorId>,

    /// Genres, no duplicates
    pub genres: Vec<GenreId>,

    /// Reviews, maintained by the repository
    pub reviews: Vec<ReviewId>,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>, release_year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            release_year,
            description: String::new(),
            runtime_minutes: 0,
            revenue: 0.0,
            director: None,
            actors: Vec::new(),
            genres: Vec::new(),
            reviews: Vec::new(),
        }
    }

    /// Sets the revenue. Negative and non-finite values are ignored.
    pub fn set_revenue(&mut self, revenue: f64) {
        if revenue.is_finite() && revenue >= 0.0 {
            self.revenue = revenue;
        }
    }

    pub fn set_director(&mut self, director: DirectorId) {
        self.director = Some(director);
    }

    pub fn add_actor(&mut self, actor: ActorId) {
        self.actors.push(actor);
    }

    pub fn remove_actor(&mut self, actor: ActorId) {
        self.actors.retain(|a| *a != actor);
    }

    /// Returns false if the genre was already attached
    pub fn add_genre(&mut self, genre: GenreId) -> bool {
        if self.genres.contains(&genre) {
            return false;
        }
        self.genres.push(genre);
        true
    }

    pub fn remove_genre(&mut self, genre: GenreId) {
        self.genres.retain(|g| *g != genre);
    }

    pub fn add_review(&mut self, review: ReviewId) {
        if !self.reviews.contains(&review) {
            self.reviews.push(review);
        }
    }

    pub fn is_classified_as(&self, genre: GenreId) -> bool {
        self.genres.contains(&genre)
    }

    pub fn number_of_actors(&self) -> usize {
        self.actors.len()
    }

    pub fn number_of_genres(&self) -> usize {
        self.genres.len()
    }

    pub fn number_of_reviews(&self) -> usize {
        self.reviews.len()
    }

    fn sort_key(&self) -> (i32, &str) {
        (self.release_year, self.title.as_str())
    }
}

impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Movie {}

impl PartialOrd for Movie {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Movie {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Hash for Movie {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (&self.title, self.release_year).hash(state);
    }
}

impl std::fmt::Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Movie {}, {}>", self.title, self.release_year)
    }
}
