// src/main.rs
//
// Command-line front end: loads the catalog into the configured backend
// and prints query results as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use moviehub::{
    create_connection_pool, populate, CatalogService, Config, MemoryMovieRepository,
    MovieRepository, RepositoryKind, SqliteMovieRepository,
};

#[derive(Parser)]
#[command(name = "moviehub", about = "Browse a movie catalog")]
struct Cli {
    /// Backend to load the catalog into (overrides MOVIEHUB_REPOSITORY)
    #[arg(long, value_enum)]
    repository: Option<RepositoryKind>,

    /// Directory holding movies.csv, users.csv and reviews.csv
    #[arg(long)]
    data: Option<PathBuf>,

    /// Truncate and reload the database before running the command
    #[arg(long)]
    repopulate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Catalog counts, latest and oldest movie, top revenue
    Stats,
    /// Search movies by title, actor and/or director
    Search {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        actor: Option<String>,
        #[arg(long)]
        director: Option<String>,
    },
    /// Movies released in a year
    Year { year: i32 },
    /// Movie suggestions based on a user's reviews
    Suggest { username: String },
}

#[derive(Serialize)]
struct Stats {
    movies: usize,
    actors: usize,
    directors: usize,
    genres: usize,
    reviews: usize,
    latest: Option<moviehub::MovieView>,
    oldest: Option<moviehub::MovieView>,
    top_revenue: Vec<moviehub::MovieView>,
}

fn open_repository(config: &Config) -> anyhow::Result<Box<dyn MovieRepository>> {
    match config.repository {
        RepositoryKind::Memory => {
            let mut repo = MemoryMovieRepository::new();
            populate(&config.data_path, &mut repo).context("populating in-memory catalog")?;
            Ok(Box::new(repo))
        }
        RepositoryKind::Database => {
            let pool = create_connection_pool(&config.database_path, config.pool_size)
                .with_context(|| format!("opening {}", config.database_path.display()))?;
            let mut repo = SqliteMovieRepository::new(Arc::new(pool))?;

            if config.repopulate && !repo.is_empty()? {
                log::info!("Repopulating {}", config.database_path.display());
                repo.reset_database()?;
            }
            if repo.is_empty()? {
                populate(&config.data_path, &mut repo).context("populating database")?;
            }
            Ok(Box::new(repo))
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(command: Command, repo: &mut dyn MovieRepository) -> anyhow::Result<()> {
    let counts = (
        repo.get_total_number_of_movies()?,
        repo.get_total_number_of_actors()?,
        repo.get_total_number_of_directors()?,
        repo.get_total_number_of_genres()?,
        repo.get_total_number_of_reviews()?,
    );
    let service = CatalogService::new(repo);

    match command {
        Command::Stats => {
            let (movies, actors, directors, genres, reviews) = counts;
            print_json(&Stats {
                movies,
                actors,
                directors,
                genres,
                reviews,
                latest: service.get_latest_movie()?,
                oldest: service.get_oldest_movie()?,
                top_revenue: service.get_top_revenue_movies()?,
            })
        }
        Command::Search {
            title,
            actor,
            director,
        } => {
            let found = match (title, actor, director) {
                (Some(title), _, _) => service.search_movies_by_title(&title)?,
                (None, Some(actor), Some(director)) => {
                    service.search_movies_by_actor_and_director(&actor, &director)?
                }
                (None, Some(actor), None) => service.search_movies_by_actor(&actor)?,
                (None, None, Some(director)) => service.search_movies_by_director(&director)?,
                (None, None, None) => anyhow::bail!("search needs --title, --actor or --director"),
            };
            print_json(&found)
        }
        Command::Year { year } => {
            let page = service.get_movies_by_release_year(year)?;
            print_json(&serde_json::json!({
                "year": year,
                "previous_year": page.previous_year,
                "next_year": page.next_year,
                "movies": page.movies,
            }))
        }
        Command::Suggest { username } => {
            print_json(&service.get_suggestions_for_user(&username)?)
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,moviehub=debug".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(repository) = cli.repository {
        config.repository = repository;
    }
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    config.repopulate |= cli.repopulate;

    let mut repo = open_repository(&config)?;
    run(cli.command, repo.as_mut())
}
