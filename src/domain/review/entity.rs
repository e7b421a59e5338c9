use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{MovieId, ReviewId, UserId};
use crate::domain::movie::Movie;
use crate::domain::user::User;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// A user's review of a movie
///
/// Author and movie are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,

    author: UserId,

    movie: MovieId,

    pub text: String,

    /// 1..=10, `None` when the source rating was out of range
    pub rating: Option<u8>,

    pub timestamp: NaiveDateTime,
}

impl Review {
    /// Builds a review. A rating outside 1..=10 is discarded.
    pub fn new(
        id: ReviewId,
        author: UserId,
        movie: MovieId,
        text: impl Into<String>,
        rating: i64,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            author,
            movie,
            text: text.into(),
            rating: checked_rating(id, rating),
            timestamp,
        }
    }

    /// Rebuilds a review from already validated parts
    pub fn from_parts(
        id: ReviewId,
        author: UserId,
        movie: MovieId,
        text: String,
        rating: Option<u8>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            author,
            movie,
            text,
            rating,
            timestamp,
        }
    }

    pub fn author(&self) -> UserId {
        self.author
    }

    pub fn movie(&self) -> MovieId {
        self.movie
    }
}

fn checked_rating(id: ReviewId, rating: i64) -> Option<u8> {
    match u8::try_from(rating) {
        Ok(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Some(r),
        _ => {
            log::warn!("Review {}: rating {} out of range, discarded", id, rating);
            None
        }
    }
}

/// Creates a review and links it into the author's and the movie's
/// review lists.
pub fn make_review(
    id: ReviewId,
    text: impl Into<String>,
    author: &mut User,
    movie: &mut Movie,
    rating: i64,
    timestamp: NaiveDateTime,
) -> Review {
    let review = Review::new(id, author.id, movie.id, text, rating, timestamp);
    author.add_review(review.id);
    movie.add_review(review.id);
    review
}

/// Parses `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DDTHH:MM:SS`
/// (fractional seconds accepted). A bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl std::fmt::Display for Review {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.rating {
            Some(r) => write!(f, "<Review {}: {}/10 {}>", self.movie, r, self.text),
            None => write!(f, "<Review {}: {}>", self.movie, self.text),
        }
    }
}
