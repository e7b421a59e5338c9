// src/domain/genre.rs

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::ids::{GenreId, MovieId};
use super::{DomainError, DomainResult};

/// A genre classifying movies (many-to-many)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,

    pub name: String,

    /// Movies in association order, no duplicates
    pub classified_movies: Vec<MovieId>,
}

impl Genre {
    pub fn new(id: GenreId, name: impl AsRef<str>) -> Self {
        Self {
            id,
            name: name.as_ref().trim().to_string(),
            classified_movies: Vec::new(),
        }
    }

    pub fn add_movie(&mut self, movie: MovieId) {
        if !self.classified_movies.contains(&movie) {
            self.classified_movies.push(movie);
        }
    }

    pub fn is_applied_to(&self, movie: MovieId) -> bool {
        self.classified_movies.contains(&movie)
    }

    pub fn number_of_classified_movies(&self) -> usize {
        self.classified_movies.len()
    }
}

impl PartialEq for Genre {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Genre {}

impl Hash for Genre {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Genre {}>", self.name)
    }
}

pub fn validate_genre(genre: &Genre) -> DomainResult<()> {
    if genre.name.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Genre name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let mut genre = Genre::new(GenreId(1), "Sci-Fi");
        genre.add_movie(MovieId(1));
        genre.add_movie(MovieId(2));
        genre.add_movie(MovieId(1));
        assert_eq!(genre.number_of_classified_movies(), 2);
        assert!(genre.is_applied_to(MovieId(2)));
        assert!(!genre.is_applied_to(MovieId(3)));
    }

    #[test]
    fn test_validation() {
        assert!(validate_genre(&Genre::new(GenreId(1), " ")).is_err());
        assert!(validate_genre(&Genre::new(GenreId(1), "Horror")).is_ok());
    }
}
