// src/domain/director.rs
//
// Director entity - a person credited with directing movies

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::ids::{DirectorId, MovieId};
use super::{DomainError, DomainResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Director {
    pub id: DirectorId,

    /// Trimmed full name, the natural key
    pub full_name: String,

    pub directed_movies: Vec<MovieId>,
}

impl Director {
    pub fn new(id: DirectorId, full_name: impl AsRef<str>) -> Self {
        Self {
            id,
            full_name: full_name.as_ref().trim().to_string(),
            directed_movies: Vec::new(),
        }
    }

    pub fn add_directed_movie(&mut self, movie: MovieId) {
        if !self.directed_movies.contains(&movie) {
            self.directed_movies.push(movie);
        }
    }
}

impl PartialEq for Director {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for Director {}

impl Hash for Director {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name.hash(state);
    }
}

impl std::fmt::Display for Director {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Director {}>", self.full_name)
    }
}

pub fn validate_director(director: &Director) -> DomainResult<()> {
    if director.full_name.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Director name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
