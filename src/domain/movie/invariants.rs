use super::entity::Movie;
use crate::domain::{DomainError, DomainResult};

/// Earliest release year accepted by the catalog
pub const MIN_RELEASE_YEAR: i32 = 1900;

/// Validates all Movie invariants
pub fn validate_movie(movie: &Movie) -> DomainResult<()> {
    validate_title(&movie.title)?;
    validate_release_year(movie.release_year)?;
    Ok(())
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Movie title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_release_year(year: i32) -> DomainResult<()> {
    if year < MIN_RELEASE_YEAR {
        return Err(DomainError::InvariantViolation(format!(
            "Release year {} is before {}",
            year, MIN_RELEASE_YEAR
        )));
    }
    Ok(())
}

/// Invariants that must hold true for the Movie domain:
///
/// 1. Identity is (title, release_year), the id is a surrogate
/// 2. Ordering is by release year, then title
/// 3. Title cannot be empty
/// 4. Release year is 1900 or later
/// 5. Revenue is never negative
/// 6. A genre is attached at most once

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{ActorId, GenreId, MovieId};

    #[test]
    fn test_valid_movie() {
        let movie = Movie::new(MovieId(1), "Moana", 2016);
        assert!(validate_movie(&movie).is_ok());
    }

    #[test]
    fn test_empty_title_fails() {
        let movie = Movie::new(MovieId(1), "  ", 2016);
        assert!(validate_movie(&movie).is_err());
    }

    #[test]
    fn test_early_year_fails() {
        let movie = Movie::new(MovieId(1), "Moana", 1899);
        assert!(validate_movie(&movie).is_err());
    }

    #[test]
    fn test_ordering_by_year_then_title() {
        let a = Movie::new(MovieId(1), "Zorro", 2001);
        let b = Movie::new(MovieId(2), "Alien", 2002);
        let c = Movie::new(MovieId(3), "Batman", 2002);
        assert!(a < b);
        assert!(b < c);

        let mut movies = vec![c.clone(), a.clone(), b.clone()];
        movies.sort();
        assert_eq!(movies, vec![a, b, c]);
    }

    #[test]
    fn test_equality_ignores_id() {
        let a = Movie::new(MovieId(1), "Moana", 2016);
        let b = Movie::new(MovieId(99), "Moana", 2016);
        assert_eq!(a, b);
        assert_ne!(a, Movie::new(MovieId(1), "Moana", 2017));
    }

    #[test]
    fn test_negative_revenue_ignored() {
        let mut movie = Movie::new(MovieId(1), "Moana", 2016);
        movie.set_revenue(248.75);
        movie.set_revenue(-1.0);
        movie.set_revenue(f64::NAN);
        assert_eq!(movie.revenue, 248.75);
    }

    #[test]
    fn test_genre_added_once() {
        let mut movie = Movie::new(MovieId(1), "Moana", 2016);
        assert!(movie.add_genre(GenreId(1)));
        assert!(!movie.add_genre(GenreId(1)));
        assert_eq!(movie.number_of_genres(), 1);
        assert!(movie.is_classified_as(GenreId(1)));
        movie.remove_genre(GenreId(1));
        assert!(!movie.is_classified_as(GenreId(1)));
    }

    #[test]
    fn test_remove_actor_keeps_cast_order() {
        let mut movie = Movie::new(MovieId(1), "Moana", 2016);
        movie.add_actor(ActorId(3));
        movie.add_actor(ActorId(1));
        movie.add_actor(ActorId(2));
        movie.remove_actor(ActorId(1));
        assert_eq!(movie.actors, vec![ActorId(3), ActorId(2)]);

        movie.remove_actor(ActorId(9));
        assert_eq!(movie.actors.len(), 2);
    }

    #[test]
    fn test_display() {
        let movie = Movie::new(MovieId(1), "Moana", 2016);
        assert_eq!(movie.to_string(), "<Movie Moana, 2016>");
    }
}
