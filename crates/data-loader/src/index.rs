//! Joining the movies and credits tables into a RawCatalog.
//!
//! - Inner join on `movies.id == credits.movie_id`, movie-table order kept
//! - Title reconciliation (movie title wins)
//! - Popularity-based corpus cap applied before the feature build

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Inner-join movies with their credits.
///
/// Movies without a credits row are dropped. A movie with several credit
/// rows produces one record per row, like a relational join would.
pub fn join_records(movies: &[MovieRow], credits: &[CreditRow]) -> Vec<RawMovieRecord> {
    let mut credits_by_movie: HashMap<MovieId, Vec<&CreditRow>> = HashMap::new();
    for credit in credits {
        credits_by_movie
            .entry(credit.movie_id)
            .or_default()
            .push(credit);
    }

    let mut records = Vec::with_capacity(movies.len());
    for movie in movies {
        let Some(matches) = credits_by_movie.get(&movie.id) else {
            continue;
        };
        for credit in matches {
            if credit.title != movie.title {
                debug!(
                    "Title mismatch for movie {}: keeping '{}', dropping '{}'",
                    movie.id, movie.title, credit.title
                );
            }
            records.push(RawMovieRecord::from_rows(movie, credit));
        }
    }
    records
}

impl RawCatalog {
    /// Load and join the TMDB tables found in `data_dir`.
    ///
    /// Expects `tmdb_5000_movies.csv` and `tmdb_5000_credits.csv`.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading TMDB dataset from {:?}", data_dir);

        let movies_path = parser::movies_path(data_dir);
        let credits_path = parser::credits_path(data_dir);

        // The two files are independent, parse them side by side
        let (movies, credits) = rayon::join(
            || parser::parse_movies(&movies_path),
            || parser::parse_credits(&credits_path),
        );
        let movies = movies?;
        let credits = credits?;

        let records = join_records(&movies, &credits);
        info!(
            "Loaded {} movies and {} credits, {} joined records",
            movies.len(),
            credits.len(),
            records.len()
        );

        Ok(Self::new(records))
    }

    /// Keep only the `limit` most popular records.
    ///
    /// Sorting is stable: equal popularity keeps table order. Records with no
    /// popularity go last. `None` leaves the catalog untouched.
    pub fn truncate_by_popularity(mut self, limit: Option<usize>) -> Self {
        let Some(limit) = limit else {
            return self;
        };

        let before = self.records.len();
        self.records.sort_by(|a, b| match (a.popularity, b.popularity) {
            (Some(pa), Some(pb)) => pb.total_cmp(&pa),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        self.records.truncate(limit);

        info!(
            "Corpus capped at {} by popularity ({} -> {} records)",
            limit,
            before,
            self.records.len()
        );
        self
    }
}
