use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::domain::ids::{ActorId, MovieId};

/// An actor, identified by their trimmed full name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,

    pub full_name: String,

    /// Co-stars, ascending by id, no duplicates
    pub colleagues: Vec<ActorId>,

    /// Movies in association order
    pub played_movies: Vec<MovieId>,
}

impl Actor {
    pub fn new(id: ActorId, full_name: impl AsRef<str>) -> Self {
        Self {
            id,
            full_name: full_name.as_ref().trim().to_string(),
            colleagues: Vec::new(),
            played_movies: Vec::new(),
        }
    }

    /// Records a co-star. Returns false if already known or if `colleague`
    /// is this actor.
    pub fn add_colleague(&mut self, colleague: ActorId) -> bool {
        if colleague == self.id {
            return false;
        }
        match self.colleagues.binary_search(&colleague) {
            Ok(_) => false,
            Err(pos) => {
                self.colleagues.insert(pos, colleague);
                true
            }
        }
    }

    pub fn add_played_movie(&mut self, movie: MovieId) {
        if !self.played_movies.contains(&movie) {
            self.played_movies.push(movie);
        }
    }

    pub fn worked_with(&self, colleague: ActorId) -> bool {
        self.colleagues.binary_search(&colleague).is_ok()
    }

    pub fn number_of_colleagues(&self) -> usize {
        self.colleagues.len()
    }
}

/// Pairs every actor of `cast` with every other member of `cast`.
///
/// Actors outside the cast are untouched; cast ids without a matching
/// actor are still recorded as colleagues of the ones that exist.
pub fn pair_colleagues(actors: &mut [Actor], cast: &[ActorId]) {
    for actor in actors.iter_mut().filter(|a| cast.contains(&a.id)) {
        for colleague in cast {
            actor.add_colleague(*colleague);
        }
    }
}

impl PartialEq for Actor {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for Actor {}

impl Hash for Actor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name.hash(state);
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Actor {}>", self.full_name)
    }
}
