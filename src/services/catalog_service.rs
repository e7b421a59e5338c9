// src/services/catalog_service.rs
//
// Catalog queries and review submission
//
// RULES:
// - Lookups that the caller addressed by key fail with a ServiceError
//   when the key is unknown; list queries return empty lists
// - Searches fail with NoSearchResults when nothing matches
// - The repository is borrowed for the lifetime of the service

use chrono::Utc;

use super::views::{MovieView, ReviewView};
use super::{ServiceError, ServiceResult};
use crate::domain::{make_review, EntityKind, Movie, MovieId, ReviewId};
use crate::repositories::MovieRepository;

/// Movies of one release year with the neighboring years that have movies
#[derive(Debug, Clone, PartialEq)]
pub struct YearPage {
    pub movies: Vec<MovieView>,
    pub previous_year: Option<i32>,
    pub next_year: Option<i32>,
}

pub struct CatalogService<'a> {
    repo: &'a mut dyn MovieRepository,
}

impl<'a> CatalogService<'a> {
    pub fn new(repo: &'a mut dyn MovieRepository) -> Self {
        Self { repo }
    }

    fn view(&self, movie: &Movie) -> ServiceResult<MovieView> {
        Ok(MovieView::build(movie, &*self.repo)?)
    }

    fn views(&self, movies: &[Movie]) -> ServiceResult<Vec<MovieView>> {
        Ok(MovieView::build_all(movies, &*self.repo)?)
    }

    fn stored_movie(&self, movie_id: i64) -> ServiceResult<Movie> {
        self.repo
            .get_movie_by_id(MovieId(movie_id))?
            .ok_or(ServiceError::NonExistentMovie(movie_id))
    }

    pub fn get_movie(&self, movie_id: i64) -> ServiceResult<MovieView> {
        let movie = self.stored_movie(movie_id)?;
        self.view(&movie)
    }

    pub fn get_latest_movie(&self) -> ServiceResult<Option<MovieView>> {
        self.repo
            .get_latest_movie()?
            .map(|m| self.view(&m))
            .transpose()
    }

    pub fn get_oldest_movie(&self) -> ServiceResult<Option<MovieView>> {
        self.repo
            .get_oldest_movie()?
            .map(|m| self.view(&m))
            .transpose()
    }

    /// Movies of `year`. Neighbor years are only reported when the year
    /// has movies.
    pub fn get_movies_by_release_year(&self, year: i32) -> ServiceResult<YearPage> {
        let movies = self.repo.get_movies_by_release_year(year)?;
        let (previous_year, next_year) = match movies.first() {
            Some(first) => (
                self.repo.get_release_year_of_previous_movie(first)?,
                self.repo.get_release_year_of_next_movie(first)?,
            ),
            None => (None, None),
        };
        Ok(YearPage {
            movies: self.views(&movies)?,
            previous_year,
            next_year,
        })
    }

    /// Unknown ids are skipped
    pub fn get_movies_by_ids(&self, ids: &[i64]) -> ServiceResult<Vec<MovieView>> {
        let ids: Vec<MovieId> = ids.iter().copied().map(MovieId).collect();
        let movies = self.repo.get_movies_by_ids(&ids)?;
        self.views(&movies)
    }

    pub fn search_movies_by_actor(&self, full_name: &str) -> ServiceResult<Vec<MovieView>> {
        if self.repo.get_actor(full_name)?.is_none() {
            return Err(ServiceError::NonExistentActor(full_name.to_string()));
        }
        let movies = self.repo.get_movies_played_by_actor(full_name)?;
        self.views(&movies)
    }

    pub fn search_movies_by_director(&self, full_name: &str) -> ServiceResult<Vec<MovieView>> {
        if self.repo.get_director(full_name)?.is_none() {
            return Err(ServiceError::NonExistentDirector(full_name.to_string()));
        }
        let movies = self.repo.get_movies_directed_by_director(full_name)?;
        self.views(&movies)
    }

    pub fn search_movies_by_actor_and_director(
        &self,
        actor: &str,
        director: &str,
    ) -> ServiceResult<Vec<MovieView>> {
        let movies = self.repo.search_movies_by_actor_and_director(actor, director)?;
        if movies.is_empty() {
            return Err(ServiceError::NoSearchResults);
        }
        self.views(&movies)
    }

    pub fn search_movies_by_title(&self, fragment: &str) -> ServiceResult<Vec<MovieView>> {
        let movies = self.repo.search_movies_by_title(fragment)?;
        if movies.is_empty() {
            return Err(ServiceError::NoSearchResults);
        }
        self.views(&movies)
    }

    pub fn get_reviews_for_movie(&self, movie_id: i64) -> ServiceResult<Vec<ReviewView>> {
        let movie = self.stored_movie(movie_id)?;
        let reviews = self.repo.get_reviews_by_ids(&movie.reviews)?;
        Ok(reviews.iter().map(ReviewView::from).collect())
    }

    /// Adds a review by `username` for `movie_id`, timestamped now.
    /// Returns the new review id.
    pub fn add_review(
        &mut self,
        movie_id: i64,
        username: &str,
        text: &str,
        rating: i64,
    ) -> ServiceResult<i64> {
        let mut movie = self.stored_movie(movie_id)?;
        let mut user = self
            .repo
            .get_user(username)?
            .ok_or_else(|| ServiceError::UnknownUser(username.to_string()))?;

        let id = ReviewId(self.repo.next_id(EntityKind::Review)?);
        let timestamp = Utc::now().naive_utc();
        let review = make_review(id, text, &mut user, &mut movie, rating, timestamp);
        self.repo.add_review(&review, &user, &movie)?;

        log::info!("Review {} added by {} for {}", review.id, user.username, movie);
        Ok(review.id.value())
    }

    pub fn get_top_revenue_movies(&self) -> ServiceResult<Vec<MovieView>> {
        let movies = self.repo.get_top_6_highest_revenue_movies()?;
        self.views(&movies)
    }

    pub fn get_suggestions_for_user(&self, username: &str) -> ServiceResult<Vec<MovieView>> {
        let movies = self.repo.get_suggestions_for_user(username)?;
        self.views(&movies)
    }

    pub fn get_genre_names(&self) -> ServiceResult<Vec<String>> {
        Ok(self.repo.get_genres()?.into_iter().map(|g| g.name).collect())
    }
}
