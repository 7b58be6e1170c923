//! Title search and similarity ranking over a frozen catalog.
//!
//! ## Search
//! 1. Exact phase: titles equal to the query, ignoring case and surrounding
//!    whitespace. If any match, only those are returned.
//! 2. Partial phase: titles containing the query, in catalog order.
//!
//! ## Recommend
//! Takes an exact title (resolved by the caller), ranks every other row of
//! the catalog by similarity, highest first, ties in catalog order.

use crate::catalog::CatalogIndex;
use crate::error::{RecommendError, Result};
use tracing::{debug, instrument};

/// Default number of recommendations
pub const DEFAULT_TOP_N: usize = 5;

/// Read-only query engine; shareable across threads once built.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: CatalogIndex,
}

impl Recommender {
    pub fn new(catalog: CatalogIndex) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    /// Titles matching `query`; empty when nothing matches.
    pub fn search_movies(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();

        let exact: Vec<String> = self
            .catalog
            .titles()
            .filter(|title| title.to_lowercase() == query)
            .map(str::to_string)
            .collect();
        if !exact.is_empty() {
            return exact;
        }

        self.catalog
            .titles()
            .filter(|title| title.to_lowercase().contains(&query))
            .map(str::to_string)
            .collect()
    }

    /// The `top_n` titles most similar to `movie_title`.
    ///
    /// `movie_title` must match a catalog title exactly; the movie itself is
    /// never part of the result. Fewer than `top_n` titles come back when the
    /// catalog is that small.
    #[instrument(skip(self))]
    pub fn recommend(&self, movie_title: &str, top_n: usize) -> Result<Vec<String>> {
        let row = self
            .catalog
            .position(movie_title)
            .ok_or_else(|| RecommendError::TitleNotFound {
                title: movie_title.to_string(),
            })?;

        let mut ranked: Vec<(usize, f32)> = self
            .catalog
            .similarity()
            .row(row)
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| *i != row)
            .collect();
        // Stable: equal scores keep catalog order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let recommendations: Vec<String> = ranked
            .into_iter()
            .take(top_n)
            .filter_map(|(i, _)| self.catalog.title_at(i).map(str::to_string))
            .collect();

        debug!(
            "{} recommendations for '{}' (row {})",
            recommendations.len(),
            movie_title,
            row
        );
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::{ProcessedMovie, SimilarityMatrix};

    fn movie(title: &str) -> ProcessedMovie {
        ProcessedMovie {
            id: 0,
            title: title.to_string(),
            genres: vec![],
            keywords: vec![],
            cast: vec![],
            director: vec![],
            soup: String::new(),
        }
    }

    fn recommender(titles: &[&str], values: Vec<f32>) -> Recommender {
        let similarity = SimilarityMatrix::from_parts(titles.len(), values).unwrap();
        let movies = titles.iter().map(|t| movie(t)).collect();
        Recommender::new(CatalogIndex::new(movies, similarity).unwrap())
    }

    fn searchable(titles: &[&str]) -> Recommender {
        let n = titles.len();
        recommender(titles, vec![0.0; n * n])
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let rec = searchable(&["Batman", "Batman Begins", "The Dark Knight"]);

        assert_eq!(rec.search_movies("batman begins"), vec!["Batman Begins"]);
        assert_eq!(rec.search_movies("  Batman Begins "), vec!["Batman Begins"]);
    }

    #[test]
    fn test_exact_match_excludes_partials() {
        let rec = searchable(&["Avengers: Endgame", "Avengers", "The Avengers"]);
        assert_eq!(rec.search_movies("avengers"), vec!["Avengers"]);
    }

    #[test]
    fn test_all_exact_matches_returned() {
        let rec = searchable(&["Heat", "HEAT", "Heatwave"]);
        assert_eq!(rec.search_movies("heat"), vec!["Heat", "HEAT"]);
    }

    #[test]
    fn test_partial_matches_in_catalog_order() {
        let rec = searchable(&["The Dark Knight Rises", "Batman", "The Dark Knight"]);
        assert_eq!(
            rec.search_movies("dark"),
            vec!["The Dark Knight Rises", "The Dark Knight"]
        );
    }

    #[test]
    fn test_search_no_match() {
        let rec = searchable(&["Alien"]);
        assert!(rec.search_movies("zzz").is_empty());
    }

    #[test]
    fn test_recommend_ranks_by_similarity() {
        #[rustfmt::skip]
        let rec = recommender(&["A", "B", "C", "D"], vec![
            1.0, 0.2, 0.9, 0.5,
            0.2, 1.0, 0.0, 0.0,
            0.9, 0.0, 1.0, 0.0,
            0.5, 0.0, 0.0, 1.0,
        ]);

        assert_eq!(rec.recommend("A", 3).unwrap(), vec!["C", "D", "B"]);
        assert_eq!(rec.recommend("A", 1).unwrap(), vec!["C"]);
    }

    #[test]
    fn test_recommend_ties_keep_catalog_order() {
        #[rustfmt::skip]
        let rec = recommender(&["A", "B", "C"], vec![
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        ]);

        assert_eq!(rec.recommend("C", 5).unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_recommend_excludes_self_even_with_duplicates() {
        #[rustfmt::skip]
        let rec = recommender(&["A", "A copy", "B"], vec![
            1.0, 1.0, 0.1,
            1.0, 1.0, 0.1,
            0.1, 0.1, 1.0,
        ]);

        assert_eq!(rec.recommend("A copy", 2).unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_recommend_unknown_title() {
        let rec = searchable(&["Alien"]);
        let err = rec.recommend("alien", 5).unwrap_err();
        assert!(matches!(err, RecommendError::TitleNotFound { ref title } if title == "alien"));
    }

    #[test]
    fn test_recommend_small_catalog() {
        let rec = recommender(&["Solo"], vec![1.0]);
        assert!(rec.recommend("Solo", 5).unwrap().is_empty());
    }
}
