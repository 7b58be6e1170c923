//! Feature building: raw joined records to normalized token lists and a soup.
//!
//! Every ProcessedMovie carries four token lists (genres, keywords, cast,
//! director) whose tokens have their whitespace removed, so that
//! "Science Fiction" becomes one token "ScienceFiction" and "Tom Hanks"
//! doesn't collide with "Tom Cruise" on "tom" in the bag-of-words step.

use crate::decode::{CastEntry, CrewEntry, NamedEntry, decode_entries};
use data_loader::{MovieId, RawMovieRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default number of billed cast members kept per movie
pub const DEFAULT_CAST_LIMIT: usize = 3;

const DIRECTOR_JOB: &str = "Director";

/// A movie after feature extraction.
///
/// Row position in a `Vec<ProcessedMovie>` is the movie's identity for the
/// vector and similarity matrices; `id` is kept for reference only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedMovie {
    pub id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    pub cast: Vec<String>,
    /// Zero or one entry
    pub director: Vec<String>,
    /// keywords, cast, director, genres joined by spaces
    pub soup: String,
}

/// Result of a feature build
#[derive(Debug, Clone)]
pub struct FeatureOutput {
    pub movies: Vec<ProcessedMovie>,
    /// Structured-list cells that failed to decode and were read as empty
    pub malformed_fields: usize,
}

/// Turns raw records into ProcessedMovies.
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    cast_limit: usize,
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self {
            cast_limit: DEFAULT_CAST_LIMIT,
        }
    }

    /// Configure how many cast members are kept (default: 3)
    pub fn with_cast_limit(mut self, limit: usize) -> Self {
        self.cast_limit = limit;
        self
    }

    /// Build features for every record, in input order.
    ///
    /// Malformed structured-list cells never fail the build; they are
    /// counted and the corresponding list is empty.
    pub fn build_features(&self, records: &[RawMovieRecord]) -> FeatureOutput {
        let mut malformed_fields = 0;
        let movies: Vec<ProcessedMovie> = records
            .iter()
            .map(|record| self.process(record, &mut malformed_fields))
            .collect();

        if malformed_fields > 0 {
            warn!(
                "{} structured fields failed to decode and were treated as empty",
                malformed_fields
            );
        }
        debug!("Built features for {} movies", movies.len());

        FeatureOutput {
            movies,
            malformed_fields,
        }
    }

    fn process(&self, record: &RawMovieRecord, malformed: &mut usize) -> ProcessedMovie {
        let genres = collapse(names(&decoded(&record.genres, malformed)));
        let keywords = collapse(names(&decoded(&record.keywords, malformed)));
        let cast = collapse(billed_cast(&decoded(&record.cast, malformed), self.cast_limit));
        let director = collapse(fetch_director(&decoded(&record.crew, malformed)));

        let soup = create_soup(&keywords, &cast, &director, &genres);

        ProcessedMovie {
            id: record.id,
            title: record.title.clone(),
            genres,
            keywords,
            cast,
            director,
            soup,
        }
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn decoded<T: serde::de::DeserializeOwned>(raw: &str, malformed: &mut usize) -> Vec<T> {
    match decode_entries(raw) {
        Ok(entries) => entries,
        Err(e) => {
            *malformed += 1;
            debug!("Malformed structured field ({}): {:.40}", e, raw);
            Vec::new()
        }
    }
}

/// Names of every entry, in list order
fn names(entries: &[NamedEntry]) -> Vec<String> {
    entries.iter().map(|e| e.name.clone()).collect()
}

/// Names of the first `limit` cast entries; a nameless one among them is skipped
fn billed_cast(cast: &[CastEntry], limit: usize) -> Vec<String> {
    cast.iter()
        .take(limit)
        .filter_map(|member| member.name.clone())
        .collect()
}

/// Name of the first crew member whose job is exactly "Director"
fn fetch_director(crew: &[CrewEntry]) -> Vec<String> {
    crew.iter()
        .find(|member| member.job.as_deref() == Some(DIRECTOR_JOB))
        .and_then(|member| member.name.clone())
        .into_iter()
        .collect()
}

/// Strip whitespace inside each token: "Tom Hanks" -> "TomHanks"
pub fn collapse(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| t.split_whitespace().collect::<String>())
        .collect()
}

/// Concatenate the token lists in the fixed order keywords, cast, director, genres
pub fn create_soup(
    keywords: &[String],
    cast: &[String],
    director: &[String],
    genres: &[String],
) -> String {
    [keywords, cast, director, genres]
        .iter()
        .flat_map(|list| list.iter())
        .filter(|token| !token.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
