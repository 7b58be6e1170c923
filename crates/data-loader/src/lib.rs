//! # Data Loader Crate
//!
//! This crate reads the TMDB 5000 dataset (movies + credits CSV files) and
//! joins them into the raw table the feature pipeline consumes.
//!
//! ## Main Components
//!
//! - **types**: Raw rows (MovieRow, CreditRow) and the joined RawMovieRecord
//! - **parser**: Parse the CSV files into Rust structs
//! - **index**: Inner join and popularity cap, producing a RawCatalog
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::RawCatalog;
//! use std::path::Path;
//!
//! let catalog = RawCatalog::load_from_files(Path::new("data/tmdb"))?
//!     .truncate_by_popularity(Some(3000));
//!
//! println!("{} movies ready for the feature build", catalog.len());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::join_records;
pub use types::{CreditRow, MovieId, MovieRow, RawCatalog, RawMovieRecord};
