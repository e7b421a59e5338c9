// src/loader/dataset.rs
//
// Builds a CatalogDataset from movies.csv, users.csv and reviews.csv
//
// RULES:
// - Genres, actors and directors get ids 1, 2, ... in first-seen order
// - Malformed revenue or runtime becomes 0; a malformed rating is discarded
// - Rows with a bad id or year, an invalid movie, an unknown user or movie,
//   or an unparsable timestamp are skipped with a warning
// - Only I/O and CSV framing errors abort the load

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use super::csv_reader::{read_rows, CsvRow};
use crate::domain::{
    make_review, pair_colleagues, parse_timestamp, validate_movie, validate_user, Actor, ActorId,
    Director, DirectorId, DomainError, Genre, GenreId, Movie, MovieId, Review, ReviewId, User,
    UserId,
};
use crate::error::{AppError, AppResult};
use crate::infrastructure::hash_password;

pub const MOVIES_FILE: &str = "movies.csv";
pub const USERS_FILE: &str = "users.csv";
pub const REVIEWS_FILE: &str = "reviews.csv";

mod column {
    pub const ID: usize = 0;
    pub const TITLE: usize = 1;
    pub const GENRES: usize = 2;
    pub const DESCRIPTION: usize = 3;
    pub const DIRECTOR: usize = 4;
    pub const ACTORS: usize = 5;
    pub const YEAR: usize = 6;
    pub const RUNTIME: usize = 7;
    pub const REVENUE: usize = 10;
}

/// Everything read from the data files, ready for `import_dataset`
#[derive(Debug, Clone, Default)]
pub struct CatalogDataset {
    pub genres: Vec<Genre>,
    pub actors: Vec<Actor>,
    pub directors: Vec<Director>,
    pub movies: Vec<Movie>,
    pub users: Vec<User>,
    pub reviews: Vec<Review>,
    pub skipped_rows: usize,
}

impl CatalogDataset {
    /// The author and movie of `review` within this dataset
    pub fn review_parties(&self, review: &Review) -> AppResult<(&User, &Movie)> {
        let author = self.users.iter().find(|u| u.id == review.author());
        let movie = self.movies.iter().find(|m| m.id == review.movie());
        match (author, movie) {
            (Some(author), Some(movie)) => Ok((author, movie)),
            _ => Err(AppError::Domain(DomainError::IntegrityViolation(format!(
                "Review {} refers to a user or movie outside the dataset",
                review.id
            )))),
        }
    }

    pub fn summary(&self) -> PopulateSummary {
        PopulateSummary {
            movies: self.movies.len(),
            actors: self.actors.len(),
            directors: self.directors.len(),
            genres: self.genres.len(),
            users: self.users.len(),
            reviews: self.reviews.len(),
            skipped_rows: self.skipped_rows,
        }
    }
}

/// Counts reported after population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopulateSummary {
    pub movies: usize,
    pub actors: usize,
    pub directors: usize,
    pub genres: usize,
    pub users: usize,
    pub reviews: usize,
    pub skipped_rows: usize,
}

/// Names in first-seen order, each with the movies naming it
#[derive(Default)]
struct FirstSeen {
    names: Vec<String>,
    positions: HashMap<String, usize>,
    movies: Vec<Vec<MovieId>>,
}

impl FirstSeen {
    /// 1-based id of `name`, assigned on first sight
    fn record(&mut self, name: &str, movie: MovieId) -> i64 {
        let pos = match self.positions.get(name) {
            Some(&pos) => pos,
            None => {
                self.names.push(name.to_string());
                self.movies.push(Vec::new());
                self.positions.insert(name.to_string(), self.names.len() - 1);
                self.names.len() - 1
            }
        };
        if !self.movies[pos].contains(&movie) {
            self.movies[pos].push(movie);
        }
        pos as i64 + 1
    }

    fn into_entries(self) -> impl Iterator<Item = (i64, String, Vec<MovieId>)> {
        self.names
            .into_iter()
            .zip(self.movies)
            .enumerate()
            .map(|(i, (name, movies))| (i as i64 + 1, name, movies))
    }
}

/// Loads the three data files under `data_path`
pub fn load_dataset(data_path: &Path) -> AppResult<CatalogDataset> {
    let mut dataset = CatalogDataset::default();
    load_movies(&read_rows(&data_path.join(MOVIES_FILE))?, &mut dataset);
    load_users(&read_rows(&data_path.join(USERS_FILE))?, &mut dataset);
    load_reviews(&read_rows(&data_path.join(REVIEWS_FILE))?, &mut dataset);
    Ok(dataset)
}

/// Revenue in millions; anything unparsable, negative or non-finite is 0
fn parse_revenue(raw: &str) -> f64 {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

fn skip(dataset: &mut CatalogDataset, file: &str, row: &CsvRow, reason: &str) {
    log::warn!("{} line {}: {}, row skipped", file, row.line, reason);
    dataset.skipped_rows += 1;
}

fn load_movies(rows: &[CsvRow], dataset: &mut CatalogDataset) {
    let mut genres = FirstSeen::default();
    let mut actors = FirstSeen::default();
    let mut directors = FirstSeen::default();
    let mut casts: Vec<Vec<ActorId>> = Vec::new();

    for row in rows {
        let Ok(id) = row.field(column::ID).parse::<i64>() else {
            skip(dataset, MOVIES_FILE, row, "invalid id");
            continue;
        };
        let Ok(year) = row.field(column::YEAR).parse::<i32>() else {
            skip(dataset, MOVIES_FILE, row, "invalid release year");
            continue;
        };

        let mut movie = Movie::new(MovieId(id), row.field(column::TITLE), year);
        if let Err(e) = validate_movie(&movie) {
            skip(dataset, MOVIES_FILE, row, &e.to_string());
            continue;
        }
        if dataset
            .movies
            .iter()
            .any(|m| m.id == movie.id || *m == movie)
        {
            skip(dataset, MOVIES_FILE, row, "duplicate movie");
            continue;
        }

        movie.description = row.field(column::DESCRIPTION).to_string();
        movie.runtime_minutes = row.field(column::RUNTIME).parse().unwrap_or(0);
        movie.set_revenue(parse_revenue(row.field(column::REVENUE)));

        for name in row.list(column::GENRES) {
            movie.add_genre(GenreId(genres.record(name, movie.id)));
        }
        let director = row.field(column::DIRECTOR);
        if !director.is_empty() {
            movie.set_director(DirectorId(directors.record(director, movie.id)));
        }
        for name in row.list(column::ACTORS) {
            let actor = ActorId(actors.record(name, movie.id));
            if !movie.actors.contains(&actor) {
                movie.add_actor(actor);
            }
        }

        casts.push(movie.actors.clone());
        dataset.movies.push(movie);
    }

    dataset.genres = genres
        .into_entries()
        .map(|(id, name, movies)| {
            let mut genre = Genre::new(GenreId(id), name);
            movies.into_iter().for_each(|m| genre.add_movie(m));
            genre
        })
        .collect();

    dataset.directors = directors
        .into_entries()
        .map(|(id, name, movies)| {
            let mut director = Director::new(DirectorId(id), name);
            movies.into_iter().for_each(|m| director.add_directed_movie(m));
            director
        })
        .collect();

    dataset.actors = actors
        .into_entries()
        .map(|(id, name, movies)| {
            let mut actor = Actor::new(ActorId(id), name);
            movies.into_iter().for_each(|m| actor.add_played_movie(m));
            actor
        })
        .collect();

    for cast in &casts {
        pair_colleagues(&mut dataset.actors, cast);
    }
}

fn load_users(rows: &[CsvRow], dataset: &mut CatalogDataset) {
    for row in rows {
        let Ok(id) = row.field(0).parse::<i64>() else {
            skip(dataset, USERS_FILE, row, "invalid id");
            continue;
        };
        let user = User::new(UserId(id), row.field(1), hash_password(row.field(2)));
        if let Err(e) = validate_user(&user) {
            skip(dataset, USERS_FILE, row, &e.to_string());
            continue;
        }
        if dataset.users.iter().any(|u| u.id == user.id || *u == user) {
            skip(dataset, USERS_FILE, row, "duplicate user");
            continue;
        }
        dataset.users.push(user);
    }
}

fn load_reviews(rows: &[CsvRow], dataset: &mut CatalogDataset) {
    for row in rows {
        let (Ok(id), Ok(user_id), Ok(movie_id)) = (
            row.field(0).parse::<i64>(),
            row.field(1).parse::<i64>(),
            row.field(2).parse::<i64>(),
        ) else {
            skip(dataset, REVIEWS_FILE, row, "invalid id");
            continue;
        };
        if dataset.reviews.iter().any(|r| r.id == ReviewId(id)) {
            skip(dataset, REVIEWS_FILE, row, "duplicate review");
            continue;
        }
        let Some(user_pos) = dataset.users.iter().position(|u| u.id == UserId(user_id)) else {
            skip(dataset, REVIEWS_FILE, row, "unknown user");
            continue;
        };
        let Some(movie_pos) = dataset.movies.iter().position(|m| m.id == MovieId(movie_id)) else {
            skip(dataset, REVIEWS_FILE, row, "unknown movie");
            continue;
        };
        let Some(timestamp) = parse_timestamp(row.field(5)) else {
            skip(dataset, REVIEWS_FILE, row, "invalid timestamp");
            continue;
        };
        // non-numeric ratings are discarded like out-of-range ones
        let rating = row.field(4).parse::<i64>().unwrap_or(0);

        let review = make_review(
            ReviewId(id),
            row.field(3),
            &mut dataset.users[user_pos],
            &mut dataset.movies[movie_pos],
            rating,
            timestamp,
        );
        dataset.reviews.push(review);
    }
}
