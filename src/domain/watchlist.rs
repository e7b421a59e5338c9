// src/domain/watchlist.rs
//
// WatchList - movies a user plans to watch, each with a scheduled date
//
// Rules:
// - Insertion order is preserved
// - A movie appears at most once (natural key equality)
// - Adding a movie twice keeps the first scheduled date

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::movie::Movie;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMovie {
    pub movie: Movie,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchList {
    entries: Vec<ScheduledMovie>,
}

impl WatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the movie is already scheduled
    pub fn add_movie(&mut self, movie: Movie, date: NaiveDate) -> bool {
        if self.contains(&movie) {
            return false;
        }
        self.entries.push(ScheduledMovie { movie, date });
        true
    }

    /// Returns false when the movie was not in the list
    pub fn remove_movie(&mut self, movie: &Movie) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.movie != movie);
        self.entries.len() != before
    }

    pub fn contains(&self, movie: &Movie) -> bool {
        self.entries.iter().any(|e| &e.movie == movie)
    }

    /// Negative and out-of-range indexes yield `None`
    pub fn select_movie_to_watch(&self, index: i64) -> Option<&Movie> {
        let index = usize::try_from(index).ok()?;
        self.entries.get(index).map(|e| &e.movie)
    }

    pub fn first_movie(&self) -> Option<&Movie> {
        self.entries.first().map(|e| &e.movie)
    }

    pub fn scheduled_date(&self, movie: &Movie) -> Option<NaiveDate> {
        self.entries.iter().find(|e| &e.movie == movie).map(|e| e.date)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.entries.iter().map(|e| &e.movie)
    }

    /// Entries ordered by scheduled date, insertion order among equal dates
    pub fn schedule(&self) -> Vec<&ScheduledMovie> {
        let mut sorted: Vec<&ScheduledMovie> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.date);
        sorted
    }

    /// Human readable schedule, one line per movie (d/m/yyyy dates)
    pub fn schedule_summary(&self) -> String {
        let mut out =
            String::from("You have scheduled the following movies to watch in the future: \n");
        for entry in self.schedule() {
            out.push_str(&format!(
                "Movie: {}, {} is scheduled on {}/{}/{}\n",
                entry.movie.title,
                entry.movie.release_year,
                entry.date.day(),
                entry.date.month(),
                entry.date.year()
            ));
        }
        out
    }
}
