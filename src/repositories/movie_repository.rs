// src/repositories/movie_repository.rs
//
// The catalog repository contract shared by the in-memory and SQLite
// backends.
//
// Lookups on a missing key yield `None` or an empty Vec, never an error.
// Commands take `&mut self`; callers sharing a repository across threads
// wrap it in a lock.

use crate::domain::{
    validate_review_links, Actor, ActorId, Director, DirectorId, DomainError, EntityKind, Genre,
    GenreId, Movie, MovieId, Review, ReviewId, User,
};
use crate::error::{AppError, AppResult};
use crate::loader::CatalogDataset;

/// Number of movies returned by `get_top_6_highest_revenue_movies`
pub const TOP_REVENUE_LIMIT: usize = 6;

#[cfg_attr(test, mockall::automock)]
pub trait MovieRepository: Send + Sync {
    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    /// Next free surrogate id for `kind` (max stored + 1, starting at 1)
    fn next_id(&self, kind: EntityKind) -> AppResult<i64>;

    /// Stores a loader dataset: genres, actors, directors, movies, users,
    /// then reviews.
    fn import_dataset(&mut self, dataset: &CatalogDataset) -> AppResult<()> {
        for genre in &dataset.genres {
            self.add_genre(genre)?;
        }
        for actor in &dataset.actors {
            self.add_actor(actor)?;
        }
        for director in &dataset.directors {
            self.add_director(director)?;
        }
        for movie in &dataset.movies {
            self.add_movie(movie)?;
        }
        for user in &dataset.users {
            self.add_user(user)?;
        }
        for review in &dataset.reviews {
            let (author, movie) = dataset.review_parties(review)?;
            self.add_review(review, author, movie)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Stores a user. Watched movies and reviews start empty.
    fn add_user(&mut self, user: &User) -> AppResult<()>;

    /// Case-insensitive username lookup
    fn get_user(&self, username: &str) -> AppResult<Option<User>>;

    fn get_user_reviews(&self, user: &User) -> AppResult<Vec<Review>> {
        match self.get_user(&user.username)? {
            Some(stored) => self.get_reviews_by_ids(&stored.reviews),
            None => Ok(Vec::new()),
        }
    }

    fn get_user_watched_movies(&self, user: &User) -> AppResult<Vec<Movie>> {
        match self.get_user(&user.username)? {
            Some(stored) => self.get_movies_by_ids(&stored.watched_movies),
            None => Ok(Vec::new()),
        }
    }

    /// `None` when the user is not stored
    fn get_user_time_spent_watching_minutes(&self, user: &User) -> AppResult<Option<u64>> {
        Ok(self
            .get_user(&user.username)?
            .map(|stored| stored.time_spent_watching_minutes))
    }

    /// Marks a stored movie as watched by a stored user.
    /// Returns false when either is unknown or the movie was already watched.
    fn record_watched_movie(&mut self, username: &str, movie: MovieId) -> AppResult<bool>;

    // ------------------------------------------------------------------
    // Actors
    // ------------------------------------------------------------------

    /// Stores an actor. Colleagues and played movies start empty; they
    /// are established by `add_movie`.
    fn add_actor(&mut self, actor: &Actor) -> AppResult<()>;

    /// Lookup by normalized full name
    fn get_actor(&self, full_name: &str) -> AppResult<Option<Actor>>;

    /// Actors for `ids`, in the order requested. Unknown ids are skipped.
    fn get_actors_by_ids(&self, ids: &[ActorId]) -> AppResult<Vec<Actor>>;

    fn check_actor_existence(&self, actor: &Actor) -> AppResult<bool>;

    /// Colleagues of the stored actor, ascending by id
    fn get_actor_colleagues(&self, actor: &Actor) -> AppResult<Vec<Actor>> {
        match self.get_actor(&actor.full_name)? {
            Some(stored) => self.get_actors_by_ids(&stored.colleagues),
            None => Ok(Vec::new()),
        }
    }

    fn get_total_number_of_actors(&self) -> AppResult<usize>;

    // ------------------------------------------------------------------
    // Directors
    // ------------------------------------------------------------------

    fn add_director(&mut self, director: &Director) -> AppResult<()>;

    /// Lookup by normalized full name
    fn get_director(&self, full_name: &str) -> AppResult<Option<Director>>;

    fn get_director_by_id(&self, id: DirectorId) -> AppResult<Option<Director>>;

    fn check_director_existence(&self, director: &Director) -> AppResult<bool>;

    fn get_total_number_of_directors(&self) -> AppResult<usize>;

    // ------------------------------------------------------------------
    // Genres
    // ------------------------------------------------------------------

    fn add_genre(&mut self, genre: &Genre) -> AppResult<()>;

    /// Exact (trimmed) name lookup
    fn get_genre(&self, name: &str) -> AppResult<Option<Genre>>;

    /// All genres, by id
    fn get_genres(&self) -> AppResult<Vec<Genre>>;

    /// Genres for `ids`, in the order requested. Unknown ids are skipped.
    fn get_genres_by_ids(&self, ids: &[GenreId]) -> AppResult<Vec<Genre>>;

    fn check_genre_existence(&self, genre: &Genre) -> AppResult<bool>;

    fn get_total_number_of_genres(&self) -> AppResult<usize>;

    // ------------------------------------------------------------------
    // Movies
    // ------------------------------------------------------------------

    /// Stores a movie and establishes its associations: reverse links on
    /// its director, actors and genres, and colleague pairs among its
    /// actors.
    ///
    /// Fails with `InvariantViolation` for an invalid or already stored
    /// movie, or one referencing an unknown actor, director or genre.
    fn add_movie(&mut self, movie: &Movie) -> AppResult<()>;

    fn get_movie(&self, title: &str, release_year: i32) -> AppResult<Option<Movie>>;

    fn get_movie_by_id(&self, id: MovieId) -> AppResult<Option<Movie>>;

    /// Movies for `ids`, in the order requested. Unknown ids are skipped.
    fn get_movies_by_ids(&self, ids: &[MovieId]) -> AppResult<Vec<Movie>>;

    fn get_movies_by_release_year(&self, year: i32) -> AppResult<Vec<Movie>>;

    fn get_movies_played_by_actor(&self, full_name: &str) -> AppResult<Vec<Movie>>;

    fn get_movies_directed_by_director(&self, full_name: &str) -> AppResult<Vec<Movie>>;

    /// Movies played by `actor` and directed by `director`, in the actor's
    /// association order
    fn search_movies_by_actor_and_director(
        &self,
        actor: &str,
        director: &str,
    ) -> AppResult<Vec<Movie>>;

    /// Case-insensitive substring match on title
    fn search_movies_by_title(&self, fragment: &str) -> AppResult<Vec<Movie>>;

    fn get_movie_ids_for_genre(&self, name: &str) -> AppResult<Vec<MovieId>>;

    /// First movie (by title) of the latest release year
    fn get_latest_movie(&self) -> AppResult<Option<Movie>>;

    /// First movie (by title) of the earliest release year
    fn get_oldest_movie(&self) -> AppResult<Option<Movie>>;

    /// Closest release year strictly before `movie`'s.
    /// `None` for the earliest year or an unknown movie.
    fn get_release_year_of_previous_movie(&self, movie: &Movie) -> AppResult<Option<i32>>;

    /// Closest release year strictly after `movie`'s.
    /// `None` for the latest year or an unknown movie.
    fn get_release_year_of_next_movie(&self, movie: &Movie) -> AppResult<Option<i32>>;

    fn get_total_number_of_movies(&self) -> AppResult<usize>;

    /// Highest revenue first; equal revenues keep (year, title) order
    fn get_top_revenue_movies(&self, limit: usize) -> AppResult<Vec<Movie>>;

    fn get_top_6_highest_revenue_movies(&self) -> AppResult<Vec<Movie>> {
        self.get_top_revenue_movies(TOP_REVENUE_LIMIT)
    }

    fn get_earliest_year(&self) -> AppResult<Option<i32>> {
        Ok(self.get_oldest_movie()?.map(|m| m.release_year))
    }

    fn get_latest_year(&self) -> AppResult<Option<i32>> {
        Ok(self.get_latest_movie()?.map(|m| m.release_year))
    }

    // ------------------------------------------------------------------
    // Movie attributes
    //
    // Each resolves the stored copy of `movie` by natural key and yields
    // `None` when it is not stored.
    // ------------------------------------------------------------------

    fn get_movie_actors(&self, movie: &Movie) -> AppResult<Option<Vec<Actor>>> {
        match self.get_movie(&movie.title, movie.release_year)? {
            Some(stored) => Ok(Some(self.get_actors_by_ids(&stored.actors)?)),
            None => Ok(None),
        }
    }

    /// `None` also when the stored movie has no director
    fn get_movie_director(&self, movie: &Movie) -> AppResult<Option<Director>> {
        match self
            .get_movie(&movie.title, movie.release_year)?
            .and_then(|stored| stored.director)
        {
            Some(id) => self.get_director_by_id(id),
            None => Ok(None),
        }
    }

    fn get_movie_genres(&self, movie: &Movie) -> AppResult<Option<Vec<Genre>>> {
        match self.get_movie(&movie.title, movie.release_year)? {
            Some(stored) => Ok(Some(self.get_genres_by_ids(&stored.genres)?)),
            None => Ok(None),
        }
    }

    fn get_movie_reviews(&self, movie: &Movie) -> AppResult<Option<Vec<Review>>> {
        match self.get_movie(&movie.title, movie.release_year)? {
            Some(stored) => Ok(Some(self.get_reviews_by_ids(&stored.reviews)?)),
            None => Ok(None),
        }
    }

    fn get_movie_description(&self, movie: &Movie) -> AppResult<Option<String>> {
        Ok(self
            .get_movie(&movie.title, movie.release_year)?
            .map(|stored| stored.description))
    }

    fn get_movie_release_year(&self, movie: &Movie) -> AppResult<Option<i32>> {
        Ok(self
            .get_movie(&movie.title, movie.release_year)?
            .map(|stored| stored.release_year))
    }

    fn get_movie_runtime_minutes(&self, movie: &Movie) -> AppResult<Option<u32>> {
        Ok(self
            .get_movie(&movie.title, movie.release_year)?
            .map(|stored| stored.runtime_minutes))
    }

    // ------------------------------------------------------------------
    // Reviews
    // ------------------------------------------------------------------

    /// Stores a review after `validate_review_links` accepted it.
    ///
    /// `author` and `movie` are the caller's copies, which must already
    /// list the review. The stored user and movie get the review id
    /// appended. Nothing is stored on failure.
    fn add_review(&mut self, review: &Review, author: &User, movie: &Movie) -> AppResult<()>;

    /// All reviews, by id
    fn get_reviews(&self) -> AppResult<Vec<Review>>;

    /// Reviews for `ids`, in the order requested. Unknown ids are skipped.
    fn get_reviews_by_ids(&self, ids: &[ReviewId]) -> AppResult<Vec<Review>>;

    fn get_total_number_of_reviews(&self) -> AppResult<usize>;

    // ------------------------------------------------------------------
    // Recommendations
    // ------------------------------------------------------------------

    /// Movies of the user's reviews, in review order
    fn get_user_reviewed_movies(&self, username: &str) -> AppResult<Vec<Movie>> {
        let Some(user) = self.get_user(username)? else {
            return Ok(Vec::new());
        };
        let movie_ids: Vec<MovieId> = self
            .get_reviews_by_ids(&user.reviews)?
            .iter()
            .map(Review::movie)
            .collect();
        self.get_movies_by_ids(&movie_ids)
    }

    /// Genres of `reviewed_movies`, first seen first, no duplicates
    fn get_user_interested_genres(&self, reviewed_movies: &[Movie]) -> AppResult<Vec<Genre>> {
        let mut genre_ids: Vec<GenreId> = Vec::new();
        for genre in reviewed_movies.iter().flat_map(|m| m.genres.iter()) {
            if !genre_ids.contains(genre) {
                genre_ids.push(*genre);
            }
        }
        self.get_genres_by_ids(&genre_ids)
    }

    /// Highest revenue movie classified as `genre`; ties go to the first
    /// classified movie. `None` for an unknown or empty genre.
    fn get_top_movie_by_genre(&self, genre: &Genre) -> AppResult<Option<Movie>> {
        let ids = self.get_movie_ids_for_genre(&genre.name)?;
        let movies = self.get_movies_by_ids(&ids)?;
        Ok(top_by_revenue(movies))
    }

    /// One top movie per interested genre, no duplicates
    fn get_suggestions_for_user(&self, username: &str) -> AppResult<Vec<Movie>> {
        let reviewed = self.get_user_reviewed_movies(username)?;
        let genres = self.get_user_interested_genres(&reviewed)?;

        let mut suggestions: Vec<Movie> = Vec::new();
        for genre in &genres {
            if let Some(movie) = self.get_top_movie_by_genre(genre)? {
                if !suggestions.contains(&movie) {
                    suggestions.push(movie);
                }
            }
        }
        Ok(suggestions)
    }
}

/// Max revenue, first wins on ties
pub(crate) fn top_by_revenue(movies: Vec<Movie>) -> Option<Movie> {
    movies.into_iter().fold(None, |best: Option<Movie>, movie| match best {
        Some(b) if movie.revenue > b.revenue => Some(movie),
        Some(b) => Some(b),
        None => Some(movie),
    })
}

/// The copy of `movie` a backend stores: actors and genres deduplicated
/// (first occurrence kept), reviews cleared.
pub(crate) fn prepare_movie(movie: &Movie) -> Movie {
    let mut stored = movie.clone();
    stored.actors = distinct(&movie.actors);
    stored.genres = distinct(&movie.genres);
    stored.reviews.clear();
    stored
}

fn distinct<T: Copy + PartialEq>(ids: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

/// Shared pre-persistence check for `add_review`
pub(crate) fn check_review(review: &Review, author: &User, movie: &Movie) -> AppResult<()> {
    validate_review_links(review, author, movie)?;
    Ok(())
}

pub(crate) fn already_stored(what: impl std::fmt::Display) -> AppError {
    AppError::Domain(DomainError::InvariantViolation(format!(
        "{} is already stored",
        what
    )))
}

pub(crate) fn unknown_reference(what: impl std::fmt::Display) -> AppError {
    AppError::Domain(DomainError::InvariantViolation(format!(
        "{} is not stored",
        what
    )))
}
