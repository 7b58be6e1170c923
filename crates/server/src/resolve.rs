//! Turning a free-text query into one catalog title.
//!
//! Every front-end (HTTP, CLI, REPL) goes through [`resolve_title`] so they
//! all disambiguate the same way:
//! 1. A candidate equal to the query (ignoring case) wins
//! 2. Otherwise a single candidate wins
//! 3. Otherwise the query is ambiguous and the candidates are suggestions

use crate::recommender::Recommender;

/// Maximum number of suggestions shown for an ambiguous query
pub const SUGGESTION_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Ambiguous(Vec<String>),
    NotFound,
}

pub fn resolve_title(recommender: &Recommender, query: &str) -> Resolution {
    let candidates = recommender.search_movies(query);
    let wanted = query.trim().to_lowercase();

    if let Some(exact) = candidates.iter().find(|c| c.to_lowercase() == wanted) {
        return Resolution::Resolved(exact.clone());
    }

    match candidates.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Resolved(candidates[0].clone()),
        _ => Resolution::Ambiguous(candidates),
    }
}

/// The first [`SUGGESTION_LIMIT`] candidates
pub fn suggestions(candidates: &[String]) -> Vec<String> {
    candidates.iter().take(SUGGESTION_LIMIT).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogIndex;
    use pipeline::{ProcessedMovie, SimilarityMatrix};

    fn recommender(titles: &[&str]) -> Recommender {
        let n = titles.len();
        let movies = titles
            .iter()
            .map(|t| ProcessedMovie {
                id: 0,
                title: t.to_string(),
                genres: vec![],
                keywords: vec![],
                cast: vec![],
                director: vec![],
                soup: String::new(),
            })
            .collect();
        let similarity = SimilarityMatrix::from_parts(n, vec![0.0; n * n]).unwrap();
        Recommender::new(CatalogIndex::new(movies, similarity).unwrap())
    }

    #[test]
    fn test_exact_match_resolves() {
        let rec = recommender(&["Avatar", "Avatar 2"]);
        assert_eq!(
            resolve_title(&rec, "AVATAR"),
            Resolution::Resolved("Avatar".to_string())
        );
    }

    #[test]
    fn test_single_partial_resolves() {
        let rec = recommender(&["Avatar", "The Godfather"]);
        assert_eq!(
            resolve_title(&rec, "godfather"),
            Resolution::Resolved("The Godfather".to_string())
        );
    }

    #[test]
    fn test_several_partials_are_ambiguous() {
        let rec = recommender(&["Toy Story", "Toy Story 2", "Alien"]);
        assert_eq!(
            resolve_title(&rec, "toy"),
            Resolution::Ambiguous(vec!["Toy Story".to_string(), "Toy Story 2".to_string()])
        );
    }

    #[test]
    fn test_duplicate_exact_titles_resolve_to_first() {
        let rec = recommender(&["Heat", "HEAT"]);
        assert_eq!(
            resolve_title(&rec, "heat"),
            Resolution::Resolved("Heat".to_string())
        );
    }

    #[test]
    fn test_not_found() {
        let rec = recommender(&["Avatar"]);
        assert_eq!(resolve_title(&rec, "nope"), Resolution::NotFound);
    }

    #[test]
    fn test_suggestions_are_capped() {
        let candidates: Vec<String> = (0..15).map(|i| format!("Movie {i}")).collect();
        let capped = suggestions(&candidates);
        assert_eq!(capped.len(), SUGGESTION_LIMIT);
        assert_eq!(capped[0], "Movie 0");
    }
}
