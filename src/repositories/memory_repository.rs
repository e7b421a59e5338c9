// src/repositories/memory_repository.rs
//
// In-memory catalog repository
//
// Storage rules:
// - `movies` is always sorted by (release_year, title); inserts are
//   sorted-inserts to the left of equal keys
// - `movie_index` maps every MovieId to its position in `movies`
// - Other entities are kept ordered by id and scanned linearly
// - Queries never reorder storage

use std::collections::HashMap;

use super::movie_repository::{
    already_stored, check_review, prepare_movie, unknown_reference, MovieRepository,
};
use crate::domain::{
    fold_case, normalize_person_name, normalize_username, pair_colleagues, validate_actor,
    validate_director, validate_genre, validate_movie, validate_user, Actor, ActorId, Director,
    DirectorId, DomainError, EntityKind, Genre, GenreId, Movie, MovieId, Review, ReviewId, User,
};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct MemoryMovieRepository {
    users: Vec<User>,
    actors: Vec<Actor>,
    directors: Vec<Director>,
    genres: Vec<Genre>,
    movies: Vec<Movie>,
    movie_index: HashMap<MovieId, usize>,
    reviews: Vec<Review>,
}

/// Inserts `item` keeping `items` ordered by `key`
fn insert_by_id<T, K: Ord>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> K) {
    let k = key(&item);
    let pos = items.partition_point(|existing| key(existing) < k);
    items.insert(pos, item);
}

impl MemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored movies in storage order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    fn find_actor(&self, full_name: &str) -> Option<&Actor> {
        let wanted = normalize_person_name(full_name);
        self.actors
            .iter()
            .find(|a| normalize_person_name(&a.full_name) == wanted)
    }

    fn find_director(&self, full_name: &str) -> Option<&Director> {
        let wanted = normalize_person_name(full_name);
        self.directors
            .iter()
            .find(|d| normalize_person_name(&d.full_name) == wanted)
    }

    fn find_genre(&self, name: &str) -> Option<&Genre> {
        let wanted = name.trim();
        self.genres.iter().find(|g| g.name == wanted)
    }

    fn find_user_position(&self, username: &str) -> Option<usize> {
        let wanted = normalize_username(username);
        self.users.iter().position(|u| u.username == wanted)
    }

    fn movie_ref(&self, id: MovieId) -> Option<&Movie> {
        self.movie_index.get(&id).and_then(|&i| self.movies.get(i))
    }

    fn movie_mut(&mut self, id: MovieId) -> Option<&mut Movie> {
        match self.movie_index.get(&id) {
            Some(&i) => self.movies.get_mut(i),
            None => None,
        }
    }

    /// Position of `movie` in storage, by natural key
    fn position_of(&self, movie: &Movie) -> Option<usize> {
        self.movies.binary_search(movie).ok()
    }

    fn check_references(&self, movie: &Movie) -> AppResult<()> {
        if let Some(director) = movie.director {
            if !self.directors.iter().any(|d| d.id == director) {
                return Err(unknown_reference(format!("Director {}", director)));
            }
        }
        if let Some(actor) = movie
            .actors
            .iter()
            .find(|id| !self.actors.iter().any(|a| a.id == **id))
        {
            return Err(unknown_reference(format!("Actor {}", actor)));
        }
        if let Some(genre) = movie
            .genres
            .iter()
            .find(|id| !self.genres.iter().any(|g| g.id == **id))
        {
            return Err(unknown_reference(format!("Genre {}", genre)));
        }
        Ok(())
    }

    /// Sorted insert plus re-indexing of every shifted movie
    fn insert_movie(&mut self, movie: Movie) {
        let pos = self.movies.partition_point(|m| m < &movie);
        self.movies.insert(pos, movie);
        for (i, m) in self.movies.iter().enumerate().skip(pos) {
            self.movie_index.insert(m.id, i);
        }
    }

    fn collect_movies(&self, ids: &[MovieId]) -> Vec<Movie> {
        ids.iter()
            .filter_map(|id| self.movie_ref(*id))
            .cloned()
            .collect()
    }
}

impl MovieRepository for MemoryMovieRepository {
    fn next_id(&self, kind: EntityKind) -> AppResult<i64> {
        let max = match kind {
            EntityKind::Movie => self.movies.iter().map(|m| m.id.value()).max(),
            EntityKind::Actor => self.actors.iter().map(|a| a.id.value()).max(),
            EntityKind::Director => self.directors.iter().map(|d| d.id.value()).max(),
            EntityKind::Genre => self.genres.iter().map(|g| g.id.value()).max(),
            EntityKind::User => self.users.iter().map(|u| u.id.value()).max(),
            EntityKind::Review => self.reviews.iter().map(|r| r.id.value()).max(),
        };
        Ok(max.unwrap_or(0) + 1)
    }

    // Users

    fn add_user(&mut self, user: &User) -> AppResult<()> {
        validate_user(user)?;
        if self.find_user_position(&user.username).is_some()
            || self.users.iter().any(|u| u.id == user.id)
        {
            return Err(already_stored(user));
        }
        let mut stored = user.clone();
        stored.watched_movies.clear();
        stored.reviews.clear();
        stored.time_spent_watching_minutes = 0;
        insert_by_id(&mut self.users, stored, |u| u.id);
        Ok(())
    }

    fn get_user(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .find_user_position(username)
            .map(|i| self.users[i].clone()))
    }

    fn record_watched_movie(&mut self, username: &str, movie: MovieId) -> AppResult<bool> {
        let Some(movie) = self.movie_ref(movie).cloned() else {
            return Ok(false);
        };
        match self.find_user_position(username) {
            Some(i) => Ok(self.users[i].watch_movie(&movie)),
            None => Ok(false),
        }
    }

    // Actors

    fn add_actor(&mut self, actor: &Actor) -> AppResult<()> {
        validate_actor(actor)?;
        if self.check_actor_existence(actor)? || self.actors.iter().any(|a| a.id == actor.id) {
            return Err(already_stored(actor));
        }
        insert_by_id(&mut self.actors, Actor::new(actor.id, &actor.full_name), |a| a.id);
        Ok(())
    }

    fn get_actor(&self, full_name: &str) -> AppResult<Option<Actor>> {
        Ok(self.find_actor(full_name).cloned())
    }

    fn get_actors_by_ids(&self, ids: &[ActorId]) -> AppResult<Vec<Actor>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.actors.iter().find(|a| a.id == *id))
            .cloned()
            .collect())
    }

    fn check_actor_existence(&self, actor: &Actor) -> AppResult<bool> {
        Ok(self.actors.iter().any(|a| a == actor))
    }

    fn get_total_number_of_actors(&self) -> AppResult<usize> {
        Ok(self.actors.len())
    }

    // Directors

    fn add_director(&mut self, director: &Director) -> AppResult<()> {
        validate_director(director)?;
        if self.check_director_existence(director)?
            || self.directors.iter().any(|d| d.id == director.id)
        {
            return Err(already_stored(director));
        }
        insert_by_id(
            &mut self.directors,
            Director::new(director.id, &director.full_name),
            |d| d.id,
        );
        Ok(())
    }

    fn get_director(&self, full_name: &str) -> AppResult<Option<Director>> {
        Ok(self.find_director(full_name).cloned())
    }

    fn get_director_by_id(&self, id: DirectorId) -> AppResult<Option<Director>> {
        Ok(self.directors.iter().find(|d| d.id == id).cloned())
    }

    fn check_director_existence(&self, director: &Director) -> AppResult<bool> {
        Ok(self.directors.iter().any(|d| d == director))
    }

    fn get_total_number_of_directors(&self) -> AppResult<usize> {
        Ok(self.directors.len())
    }

    // Genres

    fn add_genre(&mut self, genre: &Genre) -> AppResult<()> {
        validate_genre(genre)?;
        if self.check_genre_existence(genre)? || self.genres.iter().any(|g| g.id == genre.id) {
            return Err(already_stored(genre));
        }
        insert_by_id(&mut self.genres, Genre::new(genre.id, &genre.name), |g| g.id);
        Ok(())
    }

    fn get_genre(&self, name: &str) -> AppResult<Option<Genre>> {
        Ok(self.find_genre(name).cloned())
    }

    fn get_genres(&self) -> AppResult<Vec<Genre>> {
        Ok(self.genres.clone())
    }

    fn get_genres_by_ids(&self, ids: &[GenreId]) -> AppResult<Vec<Genre>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.genres.iter().find(|g| g.id == *id))
            .cloned()
            .collect())
    }

    fn check_genre_existence(&self, genre: &Genre) -> AppResult<bool> {
        Ok(self.genres.iter().any(|g| g == genre))
    }

    fn get_total_number_of_genres(&self) -> AppResult<usize> {
        Ok(self.genres.len())
    }

    // Movies

    fn add_movie(&mut self, movie: &Movie) -> AppResult<()> {
        validate_movie(movie)?;
        if self.position_of(movie).is_some() || self.movie_index.contains_key(&movie.id) {
            return Err(already_stored(movie));
        }
        let stored = prepare_movie(movie);
        self.check_references(&stored)?;

        if let Some(director_id) = stored.director {
            if let Some(director) = self.directors.iter_mut().find(|d| d.id == director_id) {
                director.add_directed_movie(stored.id);
            }
        }
        for actor in self
            .actors
            .iter_mut()
            .filter(|a| stored.actors.contains(&a.id))
        {
            actor.add_played_movie(stored.id);
        }
        pair_colleagues(&mut self.actors, &stored.actors);
        for genre in self
            .genres
            .iter_mut()
            .filter(|g| stored.genres.contains(&g.id))
        {
            genre.add_movie(stored.id);
        }

        self.insert_movie(stored);
        Ok(())
    }

    fn get_movie(&self, title: &str, release_year: i32) -> AppResult<Option<Movie>> {
        let probe = Movie::new(MovieId(0), title, release_year);
        Ok(self.position_of(&probe).map(|i| self.movies[i].clone()))
    }

    fn get_movie_by_id(&self, id: MovieId) -> AppResult<Option<Movie>> {
        Ok(self.movie_ref(id).cloned())
    }

    fn get_movies_by_ids(&self, ids: &[MovieId]) -> AppResult<Vec<Movie>> {
        Ok(self.collect_movies(ids))
    }

    fn get_movies_by_release_year(&self, year: i32) -> AppResult<Vec<Movie>> {
        let start = self.movies.partition_point(|m| m.release_year < year);
        Ok(self.movies[start..]
            .iter()
            .take_while(|m| m.release_year == year)
            .cloned()
            .collect())
    }

    fn get_movies_played_by_actor(&self, full_name: &str) -> AppResult<Vec<Movie>> {
        Ok(self
            .find_actor(full_name)
            .map(|a| self.collect_movies(&a.played_movies))
            .unwrap_or_default())
    }

    fn get_movies_directed_by_director(&self, full_name: &str) -> AppResult<Vec<Movie>> {
        Ok(self
            .find_director(full_name)
            .map(|d| self.collect_movies(&d.directed_movies))
            .unwrap_or_default())
    }

    fn search_movies_by_actor_and_director(
        &self,
        actor: &str,
        director: &str,
    ) -> AppResult<Vec<Movie>> {
        let (Some(actor), Some(director)) = (self.find_actor(actor), self.find_director(director))
        else {
            return Ok(Vec::new());
        };
        Ok(self
            .collect_movies(&actor.played_movies)
            .into_iter()
            .filter(|m| m.director == Some(director.id))
            .collect())
    }

    fn search_movies_by_title(&self, fragment: &str) -> AppResult<Vec<Movie>> {
        let needle = fold_case(fragment);
        Ok(self
            .movies
            .iter()
            .filter(|m| fold_case(&m.title).contains(&needle))
            .cloned()
            .collect())
    }

    fn get_movie_ids_for_genre(&self, name: &str) -> AppResult<Vec<MovieId>> {
        Ok(self
            .find_genre(name)
            .map(|g| g.classified_movies.clone())
            .unwrap_or_default())
    }

    fn get_latest_movie(&self) -> AppResult<Option<Movie>> {
        let Some(last) = self.movies.last() else {
            return Ok(None);
        };
        let start = self
            .movies
            .partition_point(|m| m.release_year < last.release_year);
        Ok(self.movies.get(start).cloned())
    }

    fn get_oldest_movie(&self) -> AppResult<Option<Movie>> {
        Ok(self.movies.first().cloned())
    }

    fn get_release_year_of_previous_movie(&self, movie: &Movie) -> AppResult<Option<i32>> {
        let Some(pos) = self.position_of(movie) else {
            return Ok(None);
        };
        Ok(self.movies[..pos]
            .iter()
            .rev()
            .find(|m| m.release_year < movie.release_year)
            .map(|m| m.release_year))
    }

    fn get_release_year_of_next_movie(&self, movie: &Movie) -> AppResult<Option<i32>> {
        let Some(pos) = self.position_of(movie) else {
            return Ok(None);
        };
        Ok(self.movies[pos + 1..]
            .iter()
            .find(|m| m.release_year > movie.release_year)
            .map(|m| m.release_year))
    }

    fn get_total_number_of_movies(&self) -> AppResult<usize> {
        Ok(self.movies.len())
    }

    fn get_top_revenue_movies(&self, limit: usize) -> AppResult<Vec<Movie>> {
        let mut by_revenue = self.movies.clone();
        by_revenue.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        by_revenue.truncate(limit);
        Ok(by_revenue)
    }

    // Reviews

    fn add_review(&mut self, review: &Review, author: &User, movie: &Movie) -> AppResult<()> {
        check_review(review, author, movie)?;

        let Some(user_pos) = self.users.iter().position(|u| u.id == author.id) else {
            return Err(AppError::Domain(DomainError::IntegrityViolation(format!(
                "Review {} author {} is not stored",
                review.id, author
            ))));
        };
        if self.movie_ref(movie.id).is_none() {
            return Err(AppError::Domain(DomainError::IntegrityViolation(format!(
                "Review {} movie {} is not stored",
                review.id, movie
            ))));
        }
        if self.reviews.iter().any(|r| r.id == review.id) {
            return Err(already_stored(format!("Review {}", review.id)));
        }

        insert_by_id(&mut self.reviews, review.clone(), |r| r.id);
        self.users[user_pos].add_review(review.id);
        if let Some(stored) = self.movie_mut(movie.id) {
            stored.add_review(review.id);
        }
        Ok(())
    }

    fn get_reviews(&self) -> AppResult<Vec<Review>> {
        Ok(self.reviews.clone())
    }

    fn get_reviews_by_ids(&self, ids: &[ReviewId]) -> AppResult<Vec<Review>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.reviews.iter().find(|r| r.id == *id))
            .cloned()
            .collect())
    }

    fn get_total_number_of_reviews(&self) -> AppResult<usize> {
        Ok(self.reviews.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::contract_tests;

    fn movie(id: i64, title: &str, year: i32) -> Movie {
        Movie::new(MovieId(id), title, year)
    }

    fn is_sorted(movies: &[Movie]) -> bool {
        movies.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn test_sorted_insert_keeps_order_and_index() {
        let mut repo = MemoryMovieRepository::new();
        let inputs = [
            movie(1, "Split", 2016),
            movie(2, "Prometheus", 2012),
            movie(3, "Guardians of the Galaxy", 2014),
            movie(4, "Mindhorn", 2016),
            movie(5, "Arrival", 2016),
            movie(6, "Alien", 1979),
        ];
        for m in &inputs {
            repo.add_movie(m).unwrap();
            assert!(is_sorted(repo.movies()));
        }

        let titles: Vec<&str> = repo.movies().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Alien", "Prometheus", "Guardians of the Galaxy", "Arrival", "Mindhorn", "Split"]
        );
        for m in &inputs {
            assert_eq!(repo.get_movie_by_id(m.id).unwrap().as_ref(), Some(m));
        }
    }

    #[test]
    fn test_queries_do_not_reorder_storage() {
        let mut repo = MemoryMovieRepository::new();
        let mut cheap = movie(1, "Alpha", 2010);
        cheap.set_revenue(1.0);
        let mut rich = movie(2, "Beta", 2011);
        rich.set_revenue(100.0);
        repo.add_movie(&cheap).unwrap();
        repo.add_movie(&rich).unwrap();

        let top = repo.get_top_revenue_movies(1).unwrap();
        assert_eq!(top[0].title, "Beta");
        repo.get_latest_movie().unwrap();
        assert_eq!(repo.movies()[0].title, "Alpha");
    }

    #[test]
    fn test_neighbor_years_for_unknown_movie() {
        let mut repo = MemoryMovieRepository::new();
        repo.add_movie(&movie(1, "Split", 2016)).unwrap();
        let unknown = movie(9, "Ice Age", 2002);
        assert_eq!(repo.get_release_year_of_previous_movie(&unknown).unwrap(), None);
        assert_eq!(repo.get_release_year_of_next_movie(&unknown).unwrap(), None);
    }

    #[test]
    fn test_duplicate_movie_rejected() {
        let mut repo = MemoryMovieRepository::new();
        repo.add_movie(&movie(1, "Split", 2016)).unwrap();
        assert!(repo.add_movie(&movie(2, "Split", 2016)).is_err());
        assert!(repo.add_movie(&movie(1, "Sing", 2016)).is_err());
        assert_eq!(repo.get_total_number_of_movies().unwrap(), 1);
    }

    #[test]
    fn test_fixture_contract() {
        let mut repo = MemoryMovieRepository::new();
        contract_tests::run_all(&mut repo);
    }

    #[test]
    fn test_association_contract() {
        let mut repo = MemoryMovieRepository::new();
        contract_tests::associations_are_established(&mut repo);
    }

    #[test]
    fn test_review_contract() {
        let mut repo = MemoryMovieRepository::new();
        contract_tests::reviews_require_back_links(&mut repo);
    }

    #[test]
    fn test_suggestion_contract() {
        let mut repo = MemoryMovieRepository::new();
        contract_tests::suggestions_merge_shared_genres(&mut repo);
    }
}
