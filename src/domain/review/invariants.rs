use super::entity::{Review, MAX_RATING, MIN_RATING};
use crate::domain::movie::Movie;
use crate::domain::user::User;
use crate::domain::{DomainError, DomainResult};

/// Validates all Review invariants
pub fn validate_review(review: &Review) -> DomainResult<()> {
    if let Some(rating) = review.rating {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(DomainError::InvariantViolation(format!(
                "Rating {} outside {}..={}",
                rating, MIN_RATING, MAX_RATING
            )));
        }
    }
    Ok(())
}

/// Checks that `review` is reachable from both `author` and `movie`.
///
/// Both repository backends run this before storing a review.
pub fn validate_review_links(review: &Review, author: &User, movie: &Movie) -> DomainResult<()> {
    if author.id != review.author() || !author.reviews.contains(&review.id) {
        return Err(DomainError::IntegrityViolation(format!(
            "Review {} is not linked to user {}",
            review.id, author.username
        )));
    }
    if movie.id != review.movie() || !movie.reviews.contains(&review.id) {
        return Err(DomainError::IntegrityViolation(format!(
            "Review {} is not linked to movie {}",
            review.id, movie
        )));
    }
    Ok(())
}

/// Critical Review Invariants:
///
/// 1. A review belongs to exactly one user and one movie
/// 2. Author and movie never change after construction
/// 3. A stored review is listed by its author and by its movie
/// 4. Rating is either absent or within 1..=10

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{MovieId, ReviewId, UserId};
    use crate::domain::review::{make_review, parse_timestamp};
    use chrono::NaiveDate;

    fn ts() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 3, 15)
            .and_then(|d| d.and_hms_opt(13, 41, 1))
            .unwrap()
    }

    #[test]
    fn test_rating_out_of_range_is_discarded() {
        let low = Review::new(ReviewId(1), UserId(1), MovieId(1), "meh", 0, ts());
        let high = Review::new(ReviewId(2), UserId(1), MovieId(1), "wow", 11, ts());
        let ok = Review::new(ReviewId(3), UserId(1), MovieId(1), "fine", 10, ts());
        assert_eq!(low.rating, None);
        assert_eq!(high.rating, None);
        assert_eq!(ok.rating, Some(10));
        assert!(validate_review(&ok).is_ok());
    }

    #[test]
    fn test_make_review_links_both_sides() {
        let mut user = User::new(UserId(1), "Thorke", "hash");
        let mut movie = Movie::new(MovieId(1), "Guardians of the Galaxy", 2014);

        let review = make_review(ReviewId(7), "great", &mut user, &mut movie, 8, ts());

        assert_eq!(user.reviews, vec![ReviewId(7)]);
        assert_eq!(movie.reviews, vec![ReviewId(7)]);
        assert!(validate_review_links(&review, &user, &movie).is_ok());
    }

    #[test]
    fn test_unlinked_review_fails() {
        let user = User::new(UserId(1), "thorke", "hash");
        let mut movie = Movie::new(MovieId(1), "Split", 2016);
        let review = Review::new(ReviewId(1), UserId(1), MovieId(1), "text", 5, ts());

        let err = validate_review_links(&review, &user, &movie).unwrap_err();
        assert!(matches!(err, DomainError::IntegrityViolation(_)));

        movie.add_review(ReviewId(1));
        assert!(validate_review_links(&review, &user, &movie).is_err());
    }

    #[test]
    fn test_review_for_other_movie_fails() {
        let mut user = User::new(UserId(1), "thorke", "hash");
        let mut movie = Movie::new(MovieId(1), "Split", 2016);
        let mut other = Movie::new(MovieId(2), "Sing", 2016);
        let review = make_review(ReviewId(1), "text", &mut user, &mut movie, 5, ts());
        other.add_review(ReviewId(1));

        assert!(validate_review_links(&review, &user, &other).is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2020-03-15T13:41:01"), Some(ts()));
        assert_eq!(parse_timestamp("2020-03-15 13:41:01"), Some(ts()));
        assert_eq!(
            parse_timestamp("2020-03-15"),
            NaiveDate::from_ymd_opt(2020, 3, 15).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(parse_timestamp("15/03/2020"), None);
    }
}
