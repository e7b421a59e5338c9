// src/services/user_service.rs
//
// Registration, authentication and watch history

use super::views::{MovieView, UserView};
use super::{ServiceError, ServiceResult};
use crate::domain::{EntityKind, MovieId, User, UserId};
use crate::infrastructure::{hash_password, verify_password};
use crate::repositories::MovieRepository;

pub struct UserService<'a> {
    repo: &'a mut dyn MovieRepository,
}

impl<'a> UserService<'a> {
    pub fn new(repo: &'a mut dyn MovieRepository) -> Self {
        Self { repo }
    }

    fn stored_user(&self, username: &str) -> ServiceResult<User> {
        self.repo
            .get_user(username)?
            .ok_or_else(|| ServiceError::UnknownUser(username.to_string()))
    }

    /// Registers a user with a hashed password. Usernames are unique
    /// ignoring case.
    pub fn register(&mut self, username: &str, password: &str) -> ServiceResult<UserView> {
        if self.repo.get_user(username)?.is_some() {
            return Err(ServiceError::NameNotUnique(username.to_string()));
        }
        let id = UserId(self.repo.next_id(EntityKind::User)?);
        let user = User::new(id, username, hash_password(password));
        self.repo.add_user(&user)?;

        log::info!("Registered user {}", user.username);
        Ok(UserView::from(&user))
    }

    pub fn authenticate(&self, username: &str, password: &str) -> ServiceResult<UserView> {
        match self.repo.get_user(username)? {
            Some(user) if verify_password(password, &user.password_hash) => {
                Ok(UserView::from(&user))
            }
            _ => Err(ServiceError::Authentication),
        }
    }

    pub fn get_user(&self, username: &str) -> ServiceResult<UserView> {
        Ok(UserView::from(&self.stored_user(username)?))
    }

    /// Returns false when the movie was already watched
    pub fn record_watched_movie(&mut self, username: &str, movie_id: i64) -> ServiceResult<bool> {
        self.stored_user(username)?;
        if self.repo.get_movie_by_id(MovieId(movie_id))?.is_none() {
            return Err(ServiceError::NonExistentMovie(movie_id));
        }
        Ok(self.repo.record_watched_movie(username, MovieId(movie_id))?)
    }

    pub fn get_watched_movies(&self, username: &str) -> ServiceResult<Vec<MovieView>> {
        let user = self.stored_user(username)?;
        let movies = self.repo.get_movies_by_ids(&user.watched_movies)?;
        Ok(MovieView::build_all(&movies, &*self.repo)?)
    }
}
