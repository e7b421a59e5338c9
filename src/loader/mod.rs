// src/loader/mod.rs
//
// Catalog population from CSV data files

mod csv_reader;
mod dataset;

pub use csv_reader::{read_rows, CsvRow};
pub use dataset::{
    load_dataset, CatalogDataset, PopulateSummary, MOVIES_FILE, REVIEWS_FILE, USERS_FILE,
};

use std::path::Path;

use crate::error::AppResult;
use crate::repositories::MovieRepository;

/// Loads the data files under `data_path` and imports them into `repo`.
///
/// The repository is expected to be empty. For a database backend that is
/// already populated, call `reset_database` first.
pub fn populate(data_path: &Path, repo: &mut dyn MovieRepository) -> AppResult<PopulateSummary> {
    log::info!("Populating catalog from {}", data_path.display());

    let dataset = load_dataset(data_path)?;
    repo.import_dataset(&dataset)?;

    let summary = dataset.summary();
    log::info!(
        "Catalog populated: {} movies, {} actors, {} directors, {} genres, {} users, {} reviews ({} rows skipped)",
        summary.movies,
        summary.actors,
        summary.directors,
        summary.genres,
        summary.users,
        summary.reviews,
        summary.skipped_rows
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryMovieRepository;

    #[test]
    fn test_populate_memory_repository_from_fixture() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data");
        let mut repo = MemoryMovieRepository::new();

        let summary = populate(&data, &mut repo).unwrap();

        assert_eq!(summary.movies, 10);
        assert_eq!(repo.get_total_number_of_movies().unwrap(), 10);
        assert_eq!(repo.get_total_number_of_reviews().unwrap(), 3);
        assert!(repo.get_user("fmercury").unwrap().is_some());
    }

    #[test]
    fn test_populate_fails_without_data_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = MemoryMovieRepository::new();
        assert!(populate(dir.path(), &mut repo).is_err());
        assert_eq!(repo.get_total_number_of_movies().unwrap(), 0);
    }
}
