// src/domain/ids.rs
//
// Surrogate identifiers
//
// Entities reference each other through these ids, never through
// embedded values. Ids are plain integers so they map 1:1 onto the
// INTEGER PRIMARY KEY columns of the relational schema.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a Movie (the `Rank` column of the source data)
    MovieId
);
entity_id!(ActorId);
entity_id!(DirectorId);
entity_id!(GenreId);
entity_id!(UserId);
entity_id!(ReviewId);

/// Entity families that own an id sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Movie,
    Actor,
    Director,
    Genre,
    User,
    Review,
}

impl EntityKind {
    /// Name of the table holding this entity
    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::Movie => "movies",
            EntityKind::Actor => "actors",
            EntityKind::Director => "directors",
            EntityKind::Genre => "genres",
            EntityKind::User => "users",
            EntityKind::Review => "reviews",
        }
    }
}
