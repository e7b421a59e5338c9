// src/repositories/contract_tests.rs
//
// Behavior every MovieRepository backend must share.
// Each backend's test module calls these against a fresh, empty repository.

use std::path::PathBuf;

use chrono::NaiveDate;

use super::MovieRepository;
use crate::domain::{
    make_review, Actor, ActorId, Director, DirectorId, Genre, GenreId, Movie, MovieId, Review,
    ReviewId, User, UserId,
};
use crate::loader::populate;

fn fixture_path() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"))
}

fn titles(movies: &[Movie]) -> Vec<&str> {
    movies.iter().map(|m| m.title.as_str()).collect()
}

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 9)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

/// Populates from the fixture and checks every query against it
pub fn run_all(repo: &mut dyn MovieRepository) {
    populate(&fixture_path(), repo).unwrap();

    counts(repo);
    movie_lookup(repo);
    queries_by_year(repo);
    people_queries(repo);
    title_search(repo);
    neighbor_years(repo);
    revenue_and_suggestions(repo);
    existence_checks(repo);
    user_queries(repo);
}

fn counts(repo: &dyn MovieRepository) {
    assert_eq!(repo.get_total_number_of_movies().unwrap(), 10);
    assert_eq!(repo.get_total_number_of_actors().unwrap(), 39);
    assert_eq!(repo.get_total_number_of_directors().unwrap(), 10);
    assert_eq!(repo.get_total_number_of_genres().unwrap(), 14);
    assert_eq!(repo.get_total_number_of_reviews().unwrap(), 3);

    let genres: Vec<String> = repo.get_genres().unwrap().into_iter().map(|g| g.name).collect();
    assert_eq!(
        genres,
        vec![
            "Action", "Adventure", "Sci-Fi", "Mystery", "Horror", "Thriller", "Animation",
            "Comedy", "Family", "Fantasy", "Drama", "Music", "Biography", "Romance"
        ]
    );

    let sci_fi = repo.get_genre("Sci-Fi").unwrap().unwrap();
    assert_eq!(sci_fi.number_of_classified_movies(), 2);
    let comedy = repo.get_genre("Comedy").unwrap().unwrap();
    assert_eq!(comedy.number_of_classified_movies(), 3);
    assert_eq!(repo.get_movie_ids_for_genre("Horror").unwrap().len(), 1);
    assert!(repo.get_movie_ids_for_genre("Fake Genre").unwrap().is_empty());
}

fn movie_lookup(repo: &dyn MovieRepository) {
    let guardians = repo.get_movie("Guardians of the Galaxy", 2014).unwrap().unwrap();
    assert_eq!(guardians.id, MovieId(1));
    assert_eq!(guardians.runtime_minutes, 121);
    assert!(guardians.description.starts_with("A group of intergalactic criminals"));

    let director = repo.get_movie_director(&guardians).unwrap().unwrap();
    assert_eq!(director.full_name, "James Gunn");

    let actors: Vec<String> = repo
        .get_movie_actors(&guardians)
        .unwrap()
        .unwrap()
        .into_iter()
        .map(|a| a.full_name)
        .collect();
    assert_eq!(actors, vec!["Chris Pratt", "Vin Diesel", "Bradley Cooper", "Zoe Saldana"]);

    let reviews: Vec<String> = repo
        .get_movie_reviews(&guardians)
        .unwrap()
        .unwrap()
        .into_iter()
        .map(|r| r.text)
        .collect();
    assert_eq!(reviews, vec!["This movie is great!", "This movie is awesome", "Love it!"]);

    let passengers = repo.get_movie_by_id(MovieId(10)).unwrap().unwrap();
    let genres: Vec<String> = repo
        .get_movie_genres(&passengers)
        .unwrap()
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(genres, vec!["Adventure", "Drama", "Romance"]);

    assert!(repo.get_movie_by_id(MovieId(99999)).unwrap().is_none());
    let missing = Movie::new(MovieId(0), "Nonexistent", 2001);
    assert!(repo.get_movie_genres(&missing).unwrap().is_none());
    assert!(repo.get_movie_director(&missing).unwrap().is_none());
    assert!(repo.get_movie_description(&missing).unwrap().is_none());

    let picked = repo
        .get_movies_by_ids(&[MovieId(1), MovieId(3), MovieId(7), MovieId(10)])
        .unwrap();
    assert_eq!(
        titles(&picked),
        vec!["Guardians of the Galaxy", "Split", "La La Land", "Passengers"]
    );
    let partial = repo.get_movies_by_ids(&[MovieId(2), MovieId(35455647)]).unwrap();
    assert_eq!(titles(&partial), vec!["Prometheus"]);
}

fn queries_by_year(repo: &dyn MovieRepository) {
    assert_eq!(repo.get_movies_by_release_year(2014).unwrap().len(), 1);
    assert_eq!(repo.get_movies_by_release_year(2016).unwrap().len(), 8);
    assert!(repo.get_movies_by_release_year(1800).unwrap().is_empty());
    assert!(repo.get_movies_by_release_year(2030).unwrap().is_empty());

    let latest = repo.get_latest_movie().unwrap().unwrap();
    assert_eq!((latest.title.as_str(), latest.release_year), ("La La Land", 2016));
    let oldest = repo.get_oldest_movie().unwrap().unwrap();
    assert_eq!((oldest.title.as_str(), oldest.release_year), ("Prometheus", 2012));

    assert_eq!(repo.get_earliest_year().unwrap(), Some(2012));
    assert_eq!(repo.get_latest_year().unwrap(), Some(2016));
}

fn people_queries(repo: &dyn MovieRepository) {
    assert_eq!(
        titles(&repo.get_movies_played_by_actor("Chris Pratt").unwrap()),
        vec!["Guardians of the Galaxy", "Passengers"]
    );
    assert_eq!(
        titles(&repo.get_movies_played_by_actor("Bradley Cooper").unwrap()),
        vec!["Guardians of the Galaxy"]
    );
    assert!(repo.get_movies_played_by_actor("Fake Actor").unwrap().is_empty());

    assert_eq!(
        titles(&repo.get_movies_directed_by_director("James Gunn").unwrap()),
        vec!["Guardians of the Galaxy"]
    );
    assert!(repo.get_movies_directed_by_director("Fake Director").unwrap().is_empty());

    assert_eq!(
        titles(
            &repo
                .search_movies_by_actor_and_director("Ryan Gosling", "Damien Chazelle")
                .unwrap()
        ),
        vec!["La La Land"]
    );
    assert!(repo
        .search_movies_by_actor_and_director("Fake Actor", "Damien Chazelle")
        .unwrap()
        .is_empty());
    assert!(repo
        .search_movies_by_actor_and_director("Ryan Gosling", "Fake Director")
        .unwrap()
        .is_empty());

    let pratt = repo.get_actor("chris  pratt").unwrap().unwrap();
    let colleagues: Vec<String> = repo
        .get_actor_colleagues(&pratt)
        .unwrap()
        .into_iter()
        .map(|a| a.full_name)
        .collect();
    assert_eq!(colleagues.len(), 6);
    assert!(colleagues.contains(&"Zoe Saldana".to_string()));
    assert!(colleagues.contains(&"Jennifer Lawrence".to_string()));
    assert!(!colleagues.contains(&"Chris Pratt".to_string()));
}

fn title_search(repo: &dyn MovieRepository) {
    let exact = repo.search_movies_by_title("Suicide Squad").unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].id, MovieId(5));

    let fuzzy = repo.search_movies_by_title("the").unwrap();
    assert_eq!(
        titles(&fuzzy),
        vec!["Prometheus", "Guardians of the Galaxy", "The Great Wall", "The Lost City of Z"]
    );
    assert_eq!(repo.search_movies_by_title("").unwrap().len(), 10);
    assert!(repo.search_movies_by_title("zzz").unwrap().is_empty());
}

fn neighbor_years(repo: &dyn MovieRepository) {
    let guardians = repo.get_movie_by_id(MovieId(1)).unwrap().unwrap();
    assert_eq!(repo.get_release_year_of_previous_movie(&guardians).unwrap(), Some(2012));
    assert_eq!(repo.get_release_year_of_next_movie(&guardians).unwrap(), Some(2016));

    let prometheus = repo.get_movie_by_id(MovieId(2)).unwrap().unwrap();
    assert_eq!(repo.get_release_year_of_previous_movie(&prometheus).unwrap(), None);

    let split = repo.get_movie_by_id(MovieId(3)).unwrap().unwrap();
    assert_eq!(repo.get_release_year_of_next_movie(&split).unwrap(), None);
}

fn revenue_and_suggestions(repo: &dyn MovieRepository) {
    assert_eq!(
        titles(&repo.get_top_6_highest_revenue_movies().unwrap()),
        vec![
            "Guardians of the Galaxy",
            "Suicide Squad",
            "Sing",
            "La La Land",
            "Split",
            "Prometheus"
        ]
    );

    let action = repo.get_genre("Action").unwrap().unwrap();
    assert_eq!(
        repo.get_top_movie_by_genre(&action).unwrap().unwrap().title,
        "Guardians of the Galaxy"
    );
    let fantasy = repo.get_genre("Fantasy").unwrap().unwrap();
    assert_eq!(
        repo.get_top_movie_by_genre(&fantasy).unwrap().unwrap().title,
        "Suicide Squad"
    );
    assert!(repo
        .get_top_movie_by_genre(&Genre::new(GenreId(99), "Fake Genre"))
        .unwrap()
        .is_none());

    let reviewed = repo.get_user_reviewed_movies("thorke").unwrap();
    assert_eq!(reviewed.len(), 1);
    assert_eq!(reviewed[0].id, MovieId(1));

    let interested: Vec<String> = repo
        .get_user_interested_genres(&reviewed)
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(interested, vec!["Action", "Adventure", "Sci-Fi"]);

    assert_eq!(
        titles(&repo.get_suggestions_for_user("thorke").unwrap()),
        vec!["Guardians of the Galaxy"]
    );
    assert!(repo.get_suggestions_for_user("prince").unwrap().is_empty());
}

fn existence_checks(repo: &dyn MovieRepository) {
    assert!(repo
        .check_director_existence(&Director::new(DirectorId(0), "Sean Foley"))
        .unwrap());
    assert!(!repo
        .check_director_existence(&Director::new(DirectorId(0), "Fake Director"))
        .unwrap());
    assert!(repo.check_actor_existence(&Actor::new(ActorId(0), "Matt Damon")).unwrap());
    assert!(!repo.check_actor_existence(&Actor::new(ActorId(0), "Fake Actor")).unwrap());
    assert!(repo.check_genre_existence(&Genre::new(GenreId(0), "Animation")).unwrap());
    assert!(!repo.check_genre_existence(&Genre::new(GenreId(0), "Fake Genre")).unwrap());
    assert!(repo.get_actor("Fake Actor").unwrap().is_none());
    assert!(repo.get_director("Fake Director").unwrap().is_none());
}

fn user_queries(repo: &mut dyn MovieRepository) {
    let fmercury = repo.get_user("FMercury").unwrap().unwrap();
    assert_eq!(fmercury.username, "fmercury");
    assert!(repo.get_user("prince").unwrap().is_none());

    let reviews = repo.get_user_reviews(&fmercury).unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].text, "This movie is great!");
    assert_eq!(reviews[0].rating, Some(8));

    assert!(repo.record_watched_movie("fmercury", MovieId(3)).unwrap());
    assert!(repo.record_watched_movie("fmercury", MovieId(7)).unwrap());
    assert!(!repo.record_watched_movie("fmercury", MovieId(3)).unwrap());
    assert!(!repo.record_watched_movie("fmercury", MovieId(99999)).unwrap());
    assert!(!repo.record_watched_movie("prince", MovieId(3)).unwrap());

    assert_eq!(
        titles(&repo.get_user_watched_movies(&fmercury).unwrap()),
        vec!["Split", "La La Land"]
    );
    assert_eq!(
        repo.get_user_time_spent_watching_minutes(&fmercury).unwrap(),
        Some(117 + 128)
    );
    let stranger = User::new(UserId(99), "prince", "hash");
    assert_eq!(repo.get_user_time_spent_watching_minutes(&stranger).unwrap(), None);

    let dave_id = repo.next_id(crate::domain::EntityKind::User).unwrap();
    let dave = User::new(UserId(dave_id), "Dave", "hash");
    repo.add_user(&dave).unwrap();
    assert_eq!(repo.get_user("dave").unwrap(), Some(dave.clone()));
    assert!(repo.add_user(&User::new(UserId(50), "DAVE", "other")).is_err());
}

/// Builds a small catalog by hand and checks the reverse links `add_movie`
/// and `add_review` establish
pub fn associations_are_established(repo: &mut dyn MovieRepository) {
    let drama = Genre::new(GenreId(1), "Drama");
    let music = Genre::new(GenreId(2), "Music");
    let gosling = Actor::new(ActorId(1), "Ryan Gosling");
    let stone = Actor::new(ActorId(2), "Emma Stone");
    let simmons = Actor::new(ActorId(3), "J.K. Simmons");
    let chazelle = Director::new(DirectorId(1), "Damien Chazelle");

    for genre in [&drama, &music] {
        repo.add_genre(genre).unwrap();
    }
    for actor in [&gosling, &stone, &simmons] {
        repo.add_actor(actor).unwrap();
    }
    repo.add_director(&chazelle).unwrap();

    let mut la_la_land = Movie::new(MovieId(1), "La La Land", 2016);
    la_la_land.set_director(chazelle.id);
    la_la_land.add_actor(gosling.id);
    la_la_land.add_actor(stone.id);
    la_la_land.add_genre(drama.id);
    la_la_land.add_genre(music.id);
    repo.add_movie(&la_la_land).unwrap();

    let mut whiplash = Movie::new(MovieId(2), "Whiplash", 2014);
    whiplash.set_director(chazelle.id);
    whiplash.add_actor(simmons.id);
    whiplash.add_actor(simmons.id);
    whiplash.add_genre(drama.id);
    whiplash.add_genre(music.id);
    repo.add_movie(&whiplash).unwrap();

    let stored = repo.get_movie("Whiplash", 2014).unwrap().unwrap();
    assert_eq!(stored.actors, vec![simmons.id]);

    let director = repo.get_director("Damien Chazelle").unwrap().unwrap();
    assert_eq!(director.directed_movies, vec![MovieId(1), MovieId(2)]);

    let gosling = repo.get_actor("Ryan Gosling").unwrap().unwrap();
    assert_eq!(gosling.played_movies, vec![MovieId(1)]);
    assert!(gosling.worked_with(stone.id));
    assert!(!gosling.worked_with(simmons.id));

    let drama = repo.get_genre("Drama").unwrap().unwrap();
    assert_eq!(drama.classified_movies, vec![MovieId(1), MovieId(2)]);

    assert_eq!(titles(&repo.get_movies_by_release_year(2014).unwrap()), vec!["Whiplash"]);
    assert_eq!(repo.get_oldest_movie().unwrap().unwrap().title, "Whiplash");

    let mut orphan = Movie::new(MovieId(3), "First Man", 2018);
    orphan.add_actor(ActorId(42));
    assert!(repo.add_movie(&orphan).is_err());
    assert_eq!(repo.get_total_number_of_movies().unwrap(), 2);

    let mut user = User::new(UserId(1), "thorke", "hash");
    repo.add_user(&user).unwrap();
    let mut movie = repo.get_movie("La La Land", 2016).unwrap().unwrap();
    let review = make_review(ReviewId(1), "Loved the music", &mut user, &mut movie, 9, timestamp());
    repo.add_review(&review, &user, &movie).unwrap();

    let stored_user = repo.get_user("thorke").unwrap().unwrap();
    assert_eq!(stored_user.reviews, vec![ReviewId(1)]);
    let stored_movie = repo.get_movie_by_id(MovieId(1)).unwrap().unwrap();
    assert_eq!(stored_movie.reviews, vec![ReviewId(1)]);
    assert_eq!(repo.get_reviews().unwrap(), vec![review.clone()]);
    assert!(repo.add_review(&review, &user, &movie).is_err());
}

/// Suggestions for a user whose reviewed movies share a genre list every
/// genre and every suggested movie once
pub fn suggestions_merge_shared_genres(repo: &mut dyn MovieRepository) {
    let drama = Genre::new(GenreId(1), "Drama");
    let music = Genre::new(GenreId(2), "Music");
    let war = Genre::new(GenreId(3), "War");
    for genre in [&drama, &music, &war] {
        repo.add_genre(genre).unwrap();
    }

    let catalog = [
        ("Alpha", 2001, 10.0, vec![drama.id, music.id]),
        ("Beta", 2002, 50.0, vec![music.id, war.id]),
        ("Gamma", 2003, 30.0, vec![drama.id]),
    ];
    for (id, (title, year, revenue, genres)) in catalog.into_iter().enumerate() {
        let mut movie = Movie::new(MovieId(id as i64 + 1), title, year);
        movie.set_revenue(revenue);
        for genre in genres {
            movie.add_genre(genre);
        }
        repo.add_movie(&movie).unwrap();
    }

    let mut amy = User::new(UserId(1), "amy", "hash");
    repo.add_user(&amy).unwrap();
    for (review_id, movie_id) in [(1, MovieId(1)), (2, MovieId(2))] {
        let mut movie = repo.get_movie_by_id(movie_id).unwrap().unwrap();
        let review =
            make_review(ReviewId(review_id), "Great", &mut amy, &mut movie, 8, timestamp());
        repo.add_review(&review, &amy, &movie).unwrap();
    }

    let reviewed = repo.get_user_reviewed_movies("amy").unwrap();
    assert_eq!(titles(&reviewed), vec!["Alpha", "Beta"]);

    let interested: Vec<String> = repo
        .get_user_interested_genres(&reviewed)
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(interested, vec!["Drama", "Music", "War"]);

    assert_eq!(
        titles(&repo.get_suggestions_for_user("amy").unwrap()),
        vec!["Gamma", "Beta"]
    );
}

/// A review missing from its author's or movie's review list is rejected
/// without side effects
pub fn reviews_require_back_links(repo: &mut dyn MovieRepository) {
    populate(&fixture_path(), repo).unwrap();
    let before = repo.get_total_number_of_reviews().unwrap();

    let user = repo.get_user("thorke").unwrap().unwrap();
    let movie = repo.get_movie_by_id(MovieId(3)).unwrap().unwrap();
    let unlinked = Review::new(ReviewId(100), user.id, movie.id, "testing", 6, timestamp());

    let err = repo.add_review(&unlinked, &user, &movie).unwrap_err();
    assert!(err.is_integrity_violation());

    let mut linked_user = user.clone();
    linked_user.add_review(unlinked.id);
    let err = repo.add_review(&unlinked, &linked_user, &movie).unwrap_err();
    assert!(err.is_integrity_violation());

    let mut linked_movie = movie.clone();
    linked_movie.add_review(unlinked.id);
    let err = repo.add_review(&unlinked, &user, &linked_movie).unwrap_err();
    assert!(err.is_integrity_violation());

    assert_eq!(repo.get_total_number_of_reviews().unwrap(), before);
    assert_eq!(repo.get_user("thorke").unwrap().unwrap().reviews.len(), 1);

    repo.add_review(&unlinked, &linked_user, &linked_movie).unwrap();
    assert_eq!(repo.get_total_number_of_reviews().unwrap(), before + 1);
}
