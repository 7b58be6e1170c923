//! Integration tests for the build pipeline.
//!
//! These run the feature, vectorizer and similarity stages together on a
//! small hand-written catalog.

use data_loader::RawMovieRecord;
use pipeline::BuildPipeline;

fn record(id: u32, title: &str, genres: &str, keywords: &str, cast: &str, crew: &str) -> RawMovieRecord {
    RawMovieRecord {
        id,
        title: title.to_string(),
        genres: genres.to_string(),
        keywords: keywords.to_string(),
        cast: cast.to_string(),
        crew: crew.to_string(),
        popularity: None,
    }
}

fn create_test_records() -> Vec<RawMovieRecord> {
    let space_genres = r#"[{"id": 878, "name": "Science Fiction"}, {"id": 12, "name": "Adventure"}]"#;
    let space_keywords = r#"[{"id": 1, "name": "space travel"}, {"id": 2, "name": "alien"}]"#;
    let space_cast = r#"[{"name": "Matthew McConaughey", "order": 0}, {"name": "Anne Hathaway", "order": 1}]"#;
    let space_crew = r#"[{"name": "Christopher Nolan", "job": "Director"}]"#;

    vec![
        record(1, "Star Voyage", space_genres, space_keywords, space_cast, space_crew),
        record(2, "Star Voyage II", space_genres, space_keywords, space_cast, space_crew),
        record(
            3,
            "Paris Letters",
            r#"[{"id": 10749, "name": "Romance"}]"#,
            r#"[{"id": 9, "name": "love letter"}]"#,
            r#"[{"name": "Audrey Tautou", "order": 0}]"#,
            r#"[{"name": "Jean Director", "job": "Director"}]"#,
        ),
    ]
}

#[test]
fn test_end_to_end_similarity() {
    let artifacts = BuildPipeline::new().run(&create_test_records()).unwrap();
    let sim = &artifacts.similarity;

    assert_eq!(artifacts.movies.len(), 3);
    assert_eq!(sim.size(), 3);
    assert!(sim.get(0, 1) > 0.99);
    assert!(sim.get(0, 2).abs() < 1e-6);
    assert_eq!(sim.get(2, 2), 1.0);
}

#[test]
fn test_soup_order() {
    let artifacts = BuildPipeline::new().run(&create_test_records()).unwrap();

    assert_eq!(
        artifacts.movies[0].soup,
        "spacetravel alien MatthewMcConaughey AnneHathaway ChristopherNolan ScienceFiction Adventure"
    );
}

#[test]
fn test_build_is_deterministic() {
    let records = create_test_records();

    let first = BuildPipeline::new().run(&records).unwrap();
    let second = BuildPipeline::new().run(&records).unwrap();

    assert_eq!(first.similarity, second.similarity);
    assert_eq!(first.vector_space, second.vector_space);
}

#[test]
fn test_malformed_record_degrades() {
    let mut records = create_test_records();
    records.push(record(4, "Broken", "", "", "", ""));

    let artifacts = BuildPipeline::new().run(&records).unwrap();
    let broken = &artifacts.movies[3];

    assert!(broken.genres.is_empty());
    assert!(broken.keywords.is_empty());
    assert_eq!(broken.soup, "");
    assert_eq!(artifacts.similarity.get(3, 3), 0.0);
    assert_eq!(artifacts.similarity.get(0, 3), 0.0);
}

#[test]
fn test_empty_corpus_is_an_error() {
    assert!(BuildPipeline::new().run(&[]).is_err());
}
