// src/domain/simulation.rs
//
// WatchingSimulation - a group of users watching one movie together
//
// Users joining the simulation have the movie marked as watched.
// Reviews are gathered per watcher from the reviews they own.

use super::ids::UserId;
use super::movie::Movie;
use super::review::Review;
use super::user::User;

#[derive(Debug, Clone)]
pub struct WatchingSimulation {
    movie: Movie,
    watchers: Vec<User>,
    reviews: Vec<(UserId, Review)>,
}

impl WatchingSimulation {
    pub fn new(movie: Movie) -> Self {
        Self {
            movie,
            watchers: Vec::new(),
            reviews: Vec::new(),
        }
    }

    pub fn movie(&self) -> &Movie {
        &self.movie
    }

    pub fn watchers(&self) -> &[User] {
        &self.watchers
    }

    pub fn number_of_users_watching(&self) -> usize {
        self.watchers.len()
    }

    pub fn number_of_reviews(&self) -> usize {
        self.reviews.len()
    }

    /// Adds a watcher and marks the movie watched for them.
    /// Returns false if the user is already watching.
    pub fn add_user(&mut self, mut user: User) -> bool {
        if self.watchers.contains(&user) {
            return false;
        }
        user.watch_movie(&self.movie);
        self.watchers.push(user);
        true
    }

    /// Collects the watchers' reviews of this movie from `reviews`.
    ///
    /// Only reviews listed by their author count. Already collected reviews
    /// are not added again.
    pub fn collect_reviews(&mut self, reviews: &[Review]) {
        for user in &self.watchers {
            for review in reviews.iter().filter(|r| {
                r.movie() == self.movie.id && r.author() == user.id && user.reviews.contains(&r.id)
            }) {
                if !self.reviews.iter().any(|(_, r)| r.id == review.id) {
                    self.reviews.push((user.id, review.clone()));
                }
            }
        }
    }

    pub fn reviews_by(&self, user: UserId) -> Vec<&Review> {
        self.reviews
            .iter()
            .filter(|(u, _)| *u == user)
            .map(|(_, r)| r)
            .collect()
    }

    /// Renders collected reviews grouped by watcher, in joining order
    pub fn live_reviews(&self) -> String {
        let mut out = format!("Live Reviews for {}:\n", self.movie);
        for user in &self.watchers {
            for review in self.reviews_by(user.id) {
                out.push_str(&format!("{}  --->  {}\n", user, review.text));
            }
        }
        out
    }
}

impl std::fmt::Display for WatchingSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Movie Watching Simulation - {} : {}\nNumber of users watching: {}\nNumber of reviews received: {}",
            self.movie.title,
            self.movie.release_year,
            self.number_of_users_watching(),
            self.number_of_reviews()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{MovieId, ReviewId};
    use crate::domain::review::make_review;
    use chrono::NaiveDate;

    fn ts() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 9, 1)
            .and_then(|d| d.and_hms_opt(20, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_joining_marks_movie_watched() {
        let mut movie = Movie::new(MovieId(1), "Moana", 2016);
        movie.runtime_minutes = 107;
        let mut sim = WatchingSimulation::new(movie);

        assert!(sim.add_user(User::new(UserId(1), "dbowie", "h")));
        assert!(!sim.add_user(User::new(UserId(1), "dbowie", "h")));

        assert_eq!(sim.number_of_users_watching(), 1);
        assert!(sim.watchers()[0].has_watched(MovieId(1)));
        assert_eq!(sim.watchers()[0].time_spent_watching_minutes, 107);
    }

    #[test]
    fn test_collects_only_this_movies_reviews() {
        let mut moana = Movie::new(MovieId(1), "Moana", 2016);
        let mut other = Movie::new(MovieId(2), "Ice Age", 2002);
        let mut alice = User::new(UserId(1), "alice", "h");
        let mut bob = User::new(UserId(2), "bob", "h");

        let reviews = vec![
            make_review(ReviewId(1), "Great songs", &mut alice, &mut moana, 9, ts()),
            make_review(ReviewId(2), "Too cold", &mut alice, &mut other, 4, ts()),
            make_review(ReviewId(3), "Loved it", &mut bob, &mut moana, 8, ts()),
        ];

        let mut sim = WatchingSimulation::new(moana);
        sim.add_user(alice);
        sim.add_user(bob);
        sim.collect_reviews(&reviews);
        sim.collect_reviews(&reviews);

        assert_eq!(sim.number_of_reviews(), 2);
        assert_eq!(
            sim.live_reviews(),
            "Live Reviews for <Movie Moana, 2016>:\n\
             <User alice>  --->  Great songs\n\
             <User bob>  --->  Loved it\n"
        );
        assert!(sim.to_string().contains("Number of reviews received: 2"));
    }
}
