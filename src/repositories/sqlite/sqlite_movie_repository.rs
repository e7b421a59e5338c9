// src/repositories/sqlite/sqlite_movie_repository.rs
//
// SQLite catalog repository
//
// Rows are mapped to domain values explicitly (row_to_*), then the id
// lists are filled from the junction tables (hydrate_*). Junction rows
// are read in id order, which is the order associations were made.
//
// Name matching goes through the `normalize_name` and `fold_case` SQL
// functions registered on every pooled connection.

use std::sync::Arc;

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use super::session::SessionContext;
use crate::db::{self, ConnectionPool, DatabaseStats};
use crate::domain::{
    fold_case, normalize_person_name, normalize_username, parse_timestamp, validate_actor,
    validate_director, validate_genre, validate_movie, validate_user, Actor, ActorId, Director,
    DirectorId, DomainError, EntityKind, Genre, GenreId, Movie, MovieId, Review, ReviewId, User,
    UserId,
};
use crate::error::{AppError, AppResult};
use crate::loader::CatalogDataset;
use crate::repositories::movie_repository::{
    already_stored, check_review, prepare_movie, unknown_reference, MovieRepository,
};

const MOVIE_COLUMNS: &str =
    "m.id, m.title, m.description, m.release_year, m.runtime_minutes, m.revenue";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub struct SqliteMovieRepository {
    session: SessionContext,
}

impl SqliteMovieRepository {
    /// Opens the repository over `pool`, creating the schema if needed
    pub fn new(pool: Arc<ConnectionPool>) -> AppResult<Self> {
        let session = SessionContext::new(pool);
        session.read(db::initialize_database)?;
        Ok(Self { session })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Empties every catalog table
    pub fn reset_database(&mut self) -> AppResult<()> {
        self.session.with_connection(db::reset_database)
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        self.session.read(db::is_database_empty)
    }

    pub fn database_stats(&self) -> AppResult<DatabaseStats> {
        self.session.read(db::get_database_stats)
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn row_to_movie(row: &Row) -> Result<Movie, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let title: String = row.get(1)?;
    let release_year: i32 = row.get(3)?;
    let runtime: i64 = row.get(4)?;

    let mut movie = Movie::new(MovieId(id), title, release_year);
    movie.description = row.get(2)?;
    movie.runtime_minutes = u32::try_from(runtime).unwrap_or(0);
    movie.set_revenue(row.get(5)?);
    Ok(movie)
}

fn row_to_actor(row: &Row) -> Result<Actor, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    Ok(Actor::new(ActorId(id), name))
}

fn row_to_director(row: &Row) -> Result<Director, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    Ok(Director::new(DirectorId(id), name))
}

fn row_to_genre(row: &Row) -> Result<Genre, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    Ok(Genre::new(GenreId(id), name))
}

fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let username: String = row.get(1)?;
    let password: String = row.get(2)?;
    Ok(User::new(UserId(id), username, password))
}

fn row_to_review(row: &Row) -> Result<Review, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let user_id: i64 = row.get(1)?;
    let movie_id: i64 = row.get(2)?;
    let text: String = row.get(3)?;
    let rating: Option<i64> = row.get(4)?;
    let raw_timestamp: String = row.get(5)?;

    let timestamp = parse_timestamp(&raw_timestamp).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            format!("invalid review timestamp '{}'", raw_timestamp).into(),
        )
    })?;

    Ok(Review::from_parts(
        ReviewId(id),
        UserId(user_id),
        MovieId(movie_id),
        text,
        rating.and_then(|r| u8::try_from(r).ok()),
        timestamp,
    ))
}

/// Turns `QueryReturnedNoRows` into `None`
fn optional<T>(result: Result<T, rusqlite::Error>) -> AppResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e)),
    }
}

fn query_ids(conn: &Connection, sql: &str, key: i64) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let ids = stmt
        .query_map([key], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

fn exists(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> AppResult<bool> {
    Ok(conn.query_row(sql, params, |row| row.get(0))?)
}

// ============================================================================
// HYDRATION
// ============================================================================

fn hydrate_movie(conn: &Connection, mut movie: Movie) -> AppResult<Movie> {
    let key = movie.id.value();

    movie.director = query_ids(
        conn,
        "SELECT director_id FROM movie_directors WHERE movie_id = ?1 ORDER BY id",
        key,
    )?
    .first()
    .map(|id| DirectorId(*id));

    movie.actors = query_ids(
        conn,
        "SELECT actor_id FROM movie_actors WHERE movie_id = ?1 ORDER BY id",
        key,
    )?
    .into_iter()
    .map(ActorId)
    .collect();

    movie.genres = query_ids(
        conn,
        "SELECT genre_id FROM movie_genres WHERE movie_id = ?1 ORDER BY id",
        key,
    )?
    .into_iter()
    .map(GenreId)
    .collect();

    movie.reviews = query_ids(
        conn,
        "SELECT id FROM reviews WHERE movie_id = ?1 ORDER BY id",
        key,
    )?
    .into_iter()
    .map(ReviewId)
    .collect();

    Ok(movie)
}

fn hydrate_actor(conn: &Connection, mut actor: Actor) -> AppResult<Actor> {
    let key = actor.id.value();

    actor.played_movies = query_ids(
        conn,
        "SELECT movie_id FROM movie_actors WHERE actor_id = ?1 ORDER BY id",
        key,
    )?
    .into_iter()
    .map(MovieId)
    .collect();

    // co-stars through any shared movie
    actor.colleagues = query_ids(
        conn,
        "SELECT DISTINCT other.actor_id
         FROM movie_actors me
         JOIN movie_actors other ON other.movie_id = me.movie_id
         WHERE me.actor_id = ?1 AND other.actor_id != ?1
         ORDER BY other.actor_id",
        key,
    )?
    .into_iter()
    .map(ActorId)
    .collect();

    Ok(actor)
}

fn hydrate_director(conn: &Connection, mut director: Director) -> AppResult<Director> {
    director.directed_movies = query_ids(
        conn,
        "SELECT movie_id FROM movie_directors WHERE director_id = ?1 ORDER BY id",
        director.id.value(),
    )?
    .into_iter()
    .map(MovieId)
    .collect();
    Ok(director)
}

fn hydrate_genre(conn: &Connection, mut genre: Genre) -> AppResult<Genre> {
    genre.classified_movies = query_ids(
        conn,
        "SELECT movie_id FROM movie_genres WHERE genre_id = ?1 ORDER BY id",
        genre.id.value(),
    )?
    .into_iter()
    .map(MovieId)
    .collect();
    Ok(genre)
}

fn hydrate_user(conn: &Connection, mut user: User) -> AppResult<User> {
    let key = user.id.value();

    user.watched_movies = query_ids(
        conn,
        "SELECT movie_id FROM user_watched_movies WHERE user_id = ?1 ORDER BY id",
        key,
    )?
    .into_iter()
    .map(MovieId)
    .collect();

    user.reviews = query_ids(
        conn,
        "SELECT id FROM reviews WHERE user_id = ?1 ORDER BY id",
        key,
    )?
    .into_iter()
    .map(ReviewId)
    .collect();

    let minutes: i64 = conn.query_row(
        "SELECT COALESCE(SUM(m.runtime_minutes), 0)
         FROM user_watched_movies w
         JOIN movies m ON m.id = w.movie_id
         WHERE w.user_id = ?1",
        [key],
        |row| row.get(0),
    )?;
    user.time_spent_watching_minutes = u64::try_from(minutes).unwrap_or(0);

    Ok(user)
}

// ============================================================================
// QUERIES
// ============================================================================

fn select_movies(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> AppResult<Vec<Movie>> {
    let mut stmt = conn.prepare(sql)?;
    let movies = stmt
        .query_map(params, row_to_movie)?
        .collect::<Result<Vec<_>, _>>()?;
    movies
        .into_iter()
        .map(|movie| hydrate_movie(conn, movie))
        .collect()
}

fn select_movie(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> AppResult<Option<Movie>> {
    match optional(conn.query_row(sql, params, row_to_movie))? {
        Some(movie) => Ok(Some(hydrate_movie(conn, movie)?)),
        None => Ok(None),
    }
}

fn movie_by_id(conn: &Connection, id: MovieId) -> AppResult<Option<Movie>> {
    select_movie(
        conn,
        &format!("SELECT {} FROM movies m WHERE m.id = ?1", MOVIE_COLUMNS),
        [id.value()],
    )
}

fn actor_by_id(conn: &Connection, id: ActorId) -> AppResult<Option<Actor>> {
    match optional(conn.query_row(
        "SELECT id, name FROM actors WHERE id = ?1",
        [id.value()],
        row_to_actor,
    ))? {
        Some(actor) => Ok(Some(hydrate_actor(conn, actor)?)),
        None => Ok(None),
    }
}

fn genre_by_id(conn: &Connection, id: GenreId) -> AppResult<Option<Genre>> {
    match optional(conn.query_row(
        "SELECT id, name FROM genres WHERE id = ?1",
        [id.value()],
        row_to_genre,
    ))? {
        Some(genre) => Ok(Some(hydrate_genre(conn, genre)?)),
        None => Ok(None),
    }
}

fn review_by_id(conn: &Connection, id: ReviewId) -> AppResult<Option<Review>> {
    optional(conn.query_row(
        "SELECT id, user_id, movie_id, review_text, ratings, timestamp
         FROM reviews WHERE id = ?1",
        [id.value()],
        row_to_review,
    ))
}

/// Id of the first actor (by id) whose normalized name matches
fn actor_id_by_name(conn: &Connection, full_name: &str) -> AppResult<Option<i64>> {
    optional(conn.query_row(
        "SELECT id FROM actors WHERE normalize_name(name) = ?1 ORDER BY id LIMIT 1",
        [normalize_person_name(full_name)],
        |row| row.get(0),
    ))
}

fn director_id_by_name(conn: &Connection, full_name: &str) -> AppResult<Option<i64>> {
    optional(conn.query_row(
        "SELECT id FROM directors WHERE normalize_name(name) = ?1 ORDER BY id LIMIT 1",
        [normalize_person_name(full_name)],
        |row| row.get(0),
    ))
}

fn user_by_name(conn: &Connection, username: &str) -> AppResult<Option<User>> {
    match optional(conn.query_row(
        "SELECT id, username, password FROM users WHERE username = ?1",
        [normalize_username(username)],
        row_to_user,
    ))? {
        Some(user) => Ok(Some(hydrate_user(conn, user)?)),
        None => Ok(None),
    }
}

fn movie_exists(conn: &Connection, id: MovieId) -> AppResult<bool> {
    exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM movies WHERE id = ?1)",
        [id.value()],
    )
}

fn stored_movie_key_exists(conn: &Connection, movie: &Movie) -> AppResult<bool> {
    exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM movies WHERE title = ?1 AND release_year = ?2)",
        params![movie.title, movie.release_year],
    )
}

fn count(conn: &Connection, table: &str) -> AppResult<usize> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(usize::try_from(n).unwrap_or(0))
}

// ============================================================================
// COMMANDS
//
// Each takes the transaction's connection so single adds and the bulk
// import share them.
// ============================================================================

fn insert_user(conn: &Connection, user: &User) -> AppResult<()> {
    validate_user(user)?;
    if exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 OR id = ?2)",
        params![user.username, user.id.value()],
    )? {
        return Err(already_stored(user));
    }
    conn.execute(
        "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
        params![user.id.value(), user.username, user.password_hash],
    )?;
    Ok(())
}

fn insert_actor(conn: &Connection, actor: &Actor) -> AppResult<()> {
    validate_actor(actor)?;
    if exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM actors WHERE name = ?1 OR id = ?2)",
        params![actor.full_name, actor.id.value()],
    )? {
        return Err(already_stored(actor));
    }
    conn.execute(
        "INSERT INTO actors (id, name) VALUES (?1, ?2)",
        params![actor.id.value(), actor.full_name],
    )?;
    Ok(())
}

fn insert_director(conn: &Connection, director: &Director) -> AppResult<()> {
    validate_director(director)?;
    if exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM directors WHERE name = ?1 OR id = ?2)",
        params![director.full_name, director.id.value()],
    )? {
        return Err(already_stored(director));
    }
    conn.execute(
        "INSERT INTO directors (id, name) VALUES (?1, ?2)",
        params![director.id.value(), director.full_name],
    )?;
    Ok(())
}

fn insert_genre(conn: &Connection, genre: &Genre) -> AppResult<()> {
    validate_genre(genre)?;
    if exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM genres WHERE name = ?1 OR id = ?2)",
        params![genre.name, genre.id.value()],
    )? {
        return Err(already_stored(genre));
    }
    conn.execute(
        "INSERT INTO genres (id, name) VALUES (?1, ?2)",
        params![genre.id.value(), genre.name],
    )?;
    Ok(())
}

fn insert_movie(conn: &Connection, movie: &Movie) -> AppResult<()> {
    validate_movie(movie)?;
    if stored_movie_key_exists(conn, movie)? || movie_exists(conn, movie.id)? {
        return Err(already_stored(movie));
    }
    let stored = prepare_movie(movie);

    if let Some(director) = stored.director {
        if !exists(
            conn,
            "SELECT EXISTS(SELECT 1 FROM directors WHERE id = ?1)",
            [director.value()],
        )? {
            return Err(unknown_reference(format!("Director {}", director)));
        }
    }
    for actor in &stored.actors {
        if !exists(
            conn,
            "SELECT EXISTS(SELECT 1 FROM actors WHERE id = ?1)",
            [actor.value()],
        )? {
            return Err(unknown_reference(format!("Actor {}", actor)));
        }
    }
    for genre in &stored.genres {
        if !exists(
            conn,
            "SELECT EXISTS(SELECT 1 FROM genres WHERE id = ?1)",
            [genre.value()],
        )? {
            return Err(unknown_reference(format!("Genre {}", genre)));
        }
    }

    conn.execute(
        "INSERT INTO movies (id, title, description, release_year, runtime_minutes, revenue)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            stored.id.value(),
            stored.title,
            stored.description,
            stored.release_year,
            i64::from(stored.runtime_minutes),
            stored.revenue,
        ],
    )?;

    if let Some(director) = stored.director {
        conn.execute(
            "INSERT INTO movie_directors (movie_id, director_id) VALUES (?1, ?2)",
            [stored.id.value(), director.value()],
        )?;
    }

    let mut add_actor = conn.prepare_cached(
        "INSERT INTO movie_actors (movie_id, actor_id) VALUES (?1, ?2)",
    )?;
    for actor in &stored.actors {
        add_actor.execute([stored.id.value(), actor.value()])?;
    }

    let mut add_genre = conn.prepare_cached(
        "INSERT INTO movie_genres (movie_id, genre_id) VALUES (?1, ?2)",
    )?;
    for genre in &stored.genres {
        add_genre.execute([stored.id.value(), genre.value()])?;
    }

    Ok(())
}

/// `check_review` must have passed already
fn insert_review(conn: &Connection, review: &Review) -> AppResult<()> {
    if !exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        [review.author().value()],
    )? {
        return Err(AppError::Domain(DomainError::IntegrityViolation(format!(
            "Review {} author {} is not stored",
            review.id,
            review.author()
        ))));
    }
    if !movie_exists(conn, review.movie())? {
        return Err(AppError::Domain(DomainError::IntegrityViolation(format!(
            "Review {} movie {} is not stored",
            review.id,
            review.movie()
        ))));
    }
    if exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM reviews WHERE id = ?1)",
        [review.id.value()],
    )? {
        return Err(already_stored(format!("Review {}", review.id)));
    }

    conn.execute(
        "INSERT INTO reviews (id, user_id, movie_id, review_text, ratings, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            review.id.value(),
            review.author().value(),
            review.movie().value(),
            review.text,
            review.rating.map(i64::from),
            review.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

// ============================================================================
// CONTRACT
// ============================================================================

impl MovieRepository for SqliteMovieRepository {
    fn next_id(&self, kind: EntityKind) -> AppResult<i64> {
        self.session.read(|conn| {
            Ok(conn.query_row(
                &format!("SELECT COALESCE(MAX(id), 0) + 1 FROM {}", kind.table_name()),
                [],
                |row| row.get(0),
            )?)
        })
    }

    /// One transaction for the whole dataset
    fn import_dataset(&mut self, dataset: &CatalogDataset) -> AppResult<()> {
        for review in &dataset.reviews {
            let (author, movie) = dataset.review_parties(review)?;
            check_review(review, author, movie)?;
        }
        self.session.write(|tx| {
            for genre in &dataset.genres {
                insert_genre(tx, genre)?;
            }
            for actor in &dataset.actors {
                insert_actor(tx, actor)?;
            }
            for director in &dataset.directors {
                insert_director(tx, director)?;
            }
            for movie in &dataset.movies {
                insert_movie(tx, movie)?;
            }
            for user in &dataset.users {
                insert_user(tx, user)?;
            }
            for review in &dataset.reviews {
                insert_review(tx, review)?;
            }
            Ok(())
        })?;
        log::debug!(
            "Imported {} movies and {} reviews in one transaction",
            dataset.movies.len(),
            dataset.reviews.len()
        );
        Ok(())
    }

    // Users

    fn add_user(&mut self, user: &User) -> AppResult<()> {
        self.session.write(|tx| insert_user(tx, user))
    }

    fn get_user(&self, username: &str) -> AppResult<Option<User>> {
        self.session.read(|conn| user_by_name(conn, username))
    }

    fn record_watched_movie(&mut self, username: &str, movie: MovieId) -> AppResult<bool> {
        self.session.write(|tx| {
            let Some(user) = user_by_name(tx, username)? else {
                return Ok(false);
            };
            if !movie_exists(tx, movie)? {
                return Ok(false);
            }
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO user_watched_movies (user_id, movie_id) VALUES (?1, ?2)",
                [user.id.value(), movie.value()],
            )?;
            Ok(inserted > 0)
        })
    }

    // Actors

    fn add_actor(&mut self, actor: &Actor) -> AppResult<()> {
        self.session.write(|tx| insert_actor(tx, actor))
    }

    fn get_actor(&self, full_name: &str) -> AppResult<Option<Actor>> {
        self.session.read(|conn| match actor_id_by_name(conn, full_name)? {
            Some(id) => actor_by_id(conn, ActorId(id)),
            None => Ok(None),
        })
    }

    fn get_actors_by_ids(&self, ids: &[ActorId]) -> AppResult<Vec<Actor>> {
        self.session.read(|conn| {
            let mut actors = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(actor) = actor_by_id(conn, *id)? {
                    actors.push(actor);
                }
            }
            Ok(actors)
        })
    }

    fn check_actor_existence(&self, actor: &Actor) -> AppResult<bool> {
        self.session.read(|conn| {
            exists(
                conn,
                "SELECT EXISTS(SELECT 1 FROM actors WHERE name = ?1)",
                [&actor.full_name],
            )
        })
    }

    fn get_total_number_of_actors(&self) -> AppResult<usize> {
        self.session.read(|conn| count(conn, "actors"))
    }

    // Directors

    fn add_director(&mut self, director: &Director) -> AppResult<()> {
        self.session.write(|tx| insert_director(tx, director))
    }

    fn get_director(&self, full_name: &str) -> AppResult<Option<Director>> {
        match self
            .session
            .read(|conn| director_id_by_name(conn, full_name))?
        {
            Some(id) => self.get_director_by_id(DirectorId(id)),
            None => Ok(None),
        }
    }

    fn get_director_by_id(&self, id: DirectorId) -> AppResult<Option<Director>> {
        self.session.read(|conn| {
            match optional(conn.query_row(
                "SELECT id, name FROM directors WHERE id = ?1",
                [id.value()],
                row_to_director,
            ))? {
                Some(director) => Ok(Some(hydrate_director(conn, director)?)),
                None => Ok(None),
            }
        })
    }

    fn check_director_existence(&self, director: &Director) -> AppResult<bool> {
        self.session.read(|conn| {
            exists(
                conn,
                "SELECT EXISTS(SELECT 1 FROM directors WHERE name = ?1)",
                [&director.full_name],
            )
        })
    }

    fn get_total_number_of_directors(&self) -> AppResult<usize> {
        self.session.read(|conn| count(conn, "directors"))
    }

    // Genres

    fn add_genre(&mut self, genre: &Genre) -> AppResult<()> {
        self.session.write(|tx| insert_genre(tx, genre))
    }

    fn get_genre(&self, name: &str) -> AppResult<Option<Genre>> {
        self.session.read(|conn| {
            match optional(conn.query_row(
                "SELECT id, name FROM genres WHERE name = ?1 ORDER BY id LIMIT 1",
                [name.trim()],
                row_to_genre,
            ))? {
                Some(genre) => Ok(Some(hydrate_genre(conn, genre)?)),
                None => Ok(None),
            }
        })
    }

    fn get_genres(&self) -> AppResult<Vec<Genre>> {
        self.session.read(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM genres ORDER BY id")?;
            let genres = stmt
                .query_map([], row_to_genre)?
                .collect::<Result<Vec<_>, _>>()?;
            genres
                .into_iter()
                .map(|genre| hydrate_genre(conn, genre))
                .collect()
        })
    }

    fn get_genres_by_ids(&self, ids: &[GenreId]) -> AppResult<Vec<Genre>> {
        self.session.read(|conn| {
            let mut genres = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(genre) = genre_by_id(conn, *id)? {
                    genres.push(genre);
                }
            }
            Ok(genres)
        })
    }

    fn check_genre_existence(&self, genre: &Genre) -> AppResult<bool> {
        self.session.read(|conn| {
            exists(
                conn,
                "SELECT EXISTS(SELECT 1 FROM genres WHERE name = ?1)",
                [&genre.name],
            )
        })
    }

    fn get_total_number_of_genres(&self) -> AppResult<usize> {
        self.session.read(|conn| count(conn, "genres"))
    }

    // Movies

    fn add_movie(&mut self, movie: &Movie) -> AppResult<()> {
        self.session.write(|tx| insert_movie(tx, movie))
    }

    fn get_movie(&self, title: &str, release_year: i32) -> AppResult<Option<Movie>> {
        self.session.read(|conn| {
            select_movie(
                conn,
                &format!(
                    "SELECT {} FROM movies m WHERE m.title = ?1 AND m.release_year = ?2",
                    MOVIE_COLUMNS
                ),
                params![title, release_year],
            )
        })
    }

    fn get_movie_by_id(&self, id: MovieId) -> AppResult<Option<Movie>> {
        self.session.read(|conn| movie_by_id(conn, id))
    }

    fn get_movies_by_ids(&self, ids: &[MovieId]) -> AppResult<Vec<Movie>> {
        self.session.read(|conn| {
            let mut movies = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(movie) = movie_by_id(conn, *id)? {
                    movies.push(movie);
                }
            }
            Ok(movies)
        })
    }

    fn get_movies_by_release_year(&self, year: i32) -> AppResult<Vec<Movie>> {
        self.session.read(|conn| {
            select_movies(
                conn,
                &format!(
                    "SELECT {} FROM movies m WHERE m.release_year = ?1 ORDER BY m.title",
                    MOVIE_COLUMNS
                ),
                [year],
            )
        })
    }

    fn get_movies_played_by_actor(&self, full_name: &str) -> AppResult<Vec<Movie>> {
        self.session.read(|conn| {
            let Some(actor) = actor_id_by_name(conn, full_name)? else {
                return Ok(Vec::new());
            };
            select_movies(
                conn,
                &format!(
                    "SELECT {} FROM movies m
                     JOIN movie_actors ma ON ma.movie_id = m.id
                     WHERE ma.actor_id = ?1
                     ORDER BY ma.id",
                    MOVIE_COLUMNS
                ),
                [actor],
            )
        })
    }

    fn get_movies_directed_by_director(&self, full_name: &str) -> AppResult<Vec<Movie>> {
        self.session.read(|conn| {
            let Some(director) = director_id_by_name(conn, full_name)? else {
                return Ok(Vec::new());
            };
            select_movies(
                conn,
                &format!(
                    "SELECT {} FROM movies m
                     JOIN movie_directors md ON md.movie_id = m.id
                     WHERE md.director_id = ?1
                     ORDER BY md.id",
                    MOVIE_COLUMNS
                ),
                [director],
            )
        })
    }

    fn search_movies_by_actor_and_director(
        &self,
        actor: &str,
        director: &str,
    ) -> AppResult<Vec<Movie>> {
        self.session.read(|conn| {
            let (Some(actor), Some(director)) = (
                actor_id_by_name(conn, actor)?,
                director_id_by_name(conn, director)?,
            ) else {
                return Ok(Vec::new());
            };
            select_movies(
                conn,
                &format!(
                    "SELECT {} FROM movies m
                     JOIN movie_actors ma ON ma.movie_id = m.id
                     JOIN movie_directors md ON md.movie_id = m.id
                     WHERE ma.actor_id = ?1 AND md.director_id = ?2
                     ORDER BY ma.id",
                    MOVIE_COLUMNS
                ),
                [actor, director],
            )
        })
    }

    fn search_movies_by_title(&self, fragment: &str) -> AppResult<Vec<Movie>> {
        self.session.read(|conn| {
            select_movies(
                conn,
                &format!(
                    "SELECT {} FROM movies m
                     WHERE ?1 = '' OR instr(fold_case(m.title), ?1) > 0
                     ORDER BY m.release_year, m.title",
                    MOVIE_COLUMNS
                ),
                [fold_case(fragment)],
            )
        })
    }

    fn get_movie_ids_for_genre(&self, name: &str) -> AppResult<Vec<MovieId>> {
        self.session.read(|conn| {
            let mut stmt = conn.prepare(
                "SELECT mg.movie_id FROM movie_genres mg
                 JOIN genres g ON g.id = mg.genre_id
                 WHERE g.name = ?1
                 ORDER BY mg.id",
            )?;
            let ids = stmt
                .query_map([name.trim()], |row| row.get(0))?
                .collect::<Result<Vec<i64>, _>>()?;
            Ok(ids.into_iter().map(MovieId).collect())
        })
    }

    fn get_latest_movie(&self) -> AppResult<Option<Movie>> {
        self.session.read(|conn| {
            select_movie(
                conn,
                &format!(
                    "SELECT {} FROM movies m ORDER BY m.release_year DESC, m.title ASC LIMIT 1",
                    MOVIE_COLUMNS
                ),
                [],
            )
        })
    }

    fn get_oldest_movie(&self) -> AppResult<Option<Movie>> {
        self.session.read(|conn| {
            select_movie(
                conn,
                &format!(
                    "SELECT {} FROM movies m ORDER BY m.release_year ASC, m.title ASC LIMIT 1",
                    MOVIE_COLUMNS
                ),
                [],
            )
        })
    }

    fn get_release_year_of_previous_movie(&self, movie: &Movie) -> AppResult<Option<i32>> {
        self.session.read(|conn| {
            if !stored_movie_key_exists(conn, movie)? {
                return Ok(None);
            }
            Ok(conn.query_row(
                "SELECT MAX(release_year) FROM movies WHERE release_year < ?1",
                [movie.release_year],
                |row| row.get(0),
            )?)
        })
    }

    fn get_release_year_of_next_movie(&self, movie: &Movie) -> AppResult<Option<i32>> {
        self.session.read(|conn| {
            if !stored_movie_key_exists(conn, movie)? {
                return Ok(None);
            }
            Ok(conn.query_row(
                "SELECT MIN(release_year) FROM movies WHERE release_year > ?1",
                [movie.release_year],
                |row| row.get(0),
            )?)
        })
    }

    fn get_total_number_of_movies(&self) -> AppResult<usize> {
        self.session.read(|conn| count(conn, "movies"))
    }

    fn get_top_revenue_movies(&self, limit: usize) -> AppResult<Vec<Movie>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.session.read(|conn| {
            select_movies(
                conn,
                &format!(
                    "SELECT {} FROM movies m
                     ORDER BY m.revenue DESC, m.release_year ASC, m.title ASC
                     LIMIT ?1",
                    MOVIE_COLUMNS
                ),
                [limit],
            )
        })
    }

    // Reviews

    fn add_review(&mut self, review: &Review, author: &User, movie: &Movie) -> AppResult<()> {
        check_review(review, author, movie)?;
        self.session.write(|tx| insert_review(tx, review))
    }

    fn get_reviews(&self) -> AppResult<Vec<Review>> {
        self.session.read(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, movie_id, review_text, ratings, timestamp
                 FROM reviews ORDER BY id",
            )?;
            let reviews = stmt
                .query_map([], row_to_review)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(reviews)
        })
    }

    fn get_reviews_by_ids(&self, ids: &[ReviewId]) -> AppResult<Vec<Review>> {
        self.session.read(|conn| {
            let mut reviews = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(review) = review_by_id(conn, *id)? {
                    reviews.push(review);
                }
            }
            Ok(reviews)
        })
    }

    fn get_total_number_of_reviews(&self) -> AppResult<usize> {
        self.session.read(|conn| count(conn, "reviews"))
    }

    // Recommendations

    /// Ties on revenue go to the earliest association with the genre
    fn get_top_movie_by_genre(&self, genre: &Genre) -> AppResult<Option<Movie>> {
        self.session.read(|conn| {
            select_movie(
                conn,
                &format!(
                    "SELECT {} FROM movies m
                     JOIN movie_genres mg ON mg.movie_id = m.id
                     JOIN genres g ON g.id = mg.genre_id
                     WHERE g.name = ?1
                     ORDER BY m.revenue DESC, mg.id ASC
                     LIMIT 1",
                    MOVIE_COLUMNS
                ),
                [genre.name.trim()],
            )
        })
    }
}
