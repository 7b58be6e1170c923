//! Core domain types for the TMDB 5000 dataset.
//!
//! The raw tables keep their structured-list columns (genres, keywords,
//! cast, crew) as the serialized strings found in the CSV files. Decoding
//! them is the feature builder's job, so a single bad cell never stops a load.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// TMDB movie identifier (shared by the movies and credits tables)
pub type MovieId = u32;

// =============================================================================
// Raw Table Rows
// =============================================================================

/// One row of `tmdb_5000_movies.csv`, restricted to the columns we use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRow {
    pub id: MovieId,
    pub title: String,
    /// Serialized list of `{id, name}` objects
    pub genres: String,
    /// Serialized list of `{id, name}` objects
    pub keywords: String,
    /// `None` when the cell is empty or not a number
    pub popularity: Option<f64>,
}

/// One row of `tmdb_5000_credits.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRow {
    pub movie_id: MovieId,
    /// Duplicate of the movie title; discarded by the join
    pub title: String,
    /// Serialized list of `{name, order, character, ...}` objects
    pub cast: String,
    /// Serialized list of `{name, job, department, ...}` objects
    pub crew: String,
}

// =============================================================================
// Joined Record
// =============================================================================

/// A movie row merged with its credits row.
///
/// This is the input of the feature builder. `title` always comes from the
/// movies table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMovieRecord {
    pub id: MovieId,
    pub title: String,
    pub genres: String,
    pub keywords: String,
    pub cast: String,
    pub crew: String,
    pub popularity: Option<f64>,
}

impl RawMovieRecord {
    /// Merge a movie row with one of its credit rows.
    ///
    /// The credits title is dropped; the movie table is canonical.
    pub fn from_rows(movie: &MovieRow, credit: &CreditRow) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            keywords: movie.keywords.clone(),
            cast: credit.cast.clone(),
            crew: credit.crew.clone(),
            popularity: movie.popularity,
        }
    }
}

// =============================================================================
// RawCatalog
// =============================================================================

/// The joined raw table, in movie-table order.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    pub(crate) records: Vec<RawMovieRecord>,
}

impl RawCatalog {
    /// Create a catalog from already joined records
    pub fn new(records: Vec<RawMovieRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[RawMovieRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<RawMovieRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
