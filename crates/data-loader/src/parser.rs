//! Parser for the TMDB 5000 CSV files.
//!
//! - tmdb_5000_movies.csv: budget,genres,homepage,id,keywords,...,popularity,...,title,...
//! - tmdb_5000_credits.csv: movie_id,title,cast,crew
//!
//! Columns are located by header name so extra or reordered columns are fine.
//! The structured-list cells contain JSON with embedded commas and quotes,
//! which is why this goes through the `csv` crate rather than a line split.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::{Reader, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const MOVIES_FILE: &str = "tmdb_5000_movies.csv";
const CREDITS_FILE: &str = "tmdb_5000_credits.csv";

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|_| DataLoadError::FileNotFound {
        path: path.display().to_string(),
    })
}

/// Resolves header names to column positions
struct Columns {
    file: &'static str,
    headers: StringRecord,
}

impl Columns {
    fn read<R: Read>(reader: &mut Reader<R>, file: &'static str) -> Result<Self> {
        Ok(Self {
            file,
            headers: reader.headers()?.clone(),
        })
    }

    fn position(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| DataLoadError::MissingColumn {
                file: self.file.to_string(),
                column: column.to_string(),
            })
    }

    fn optional(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == column)
    }
}

fn line_of(record: &StringRecord) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or_default()
}

fn field(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or_default().to_string()
}

fn parse_id(record: &StringRecord, idx: usize, file: &str, name: &str) -> Result<MovieId> {
    let raw = record.get(idx).unwrap_or_default().trim();
    raw.parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_of(record),
        reason: format!("Invalid {}: '{}' ({})", name, raw, e),
    })
}

/// Parse the movies table from any reader
pub fn parse_movies_from_reader<R: Read>(input: R) -> Result<Vec<MovieRow>> {
    let mut reader = Reader::from_reader(input);
    let columns = Columns::read(&mut reader, MOVIES_FILE)?;

    let id_col = columns.position("id")?;
    let title_col = columns.position("title")?;
    let genres_col = columns.position("genres")?;
    let keywords_col = columns.position("keywords")?;
    let popularity_col = columns.optional("popularity");

    let mut movies = Vec::new();
    for record in reader.records() {
        let record = record?;
        movies.push(MovieRow {
            id: parse_id(&record, id_col, MOVIES_FILE, "id")?,
            title: field(&record, title_col),
            genres: field(&record, genres_col),
            keywords: field(&record, keywords_col),
            popularity: popularity_col
                .and_then(|idx| record.get(idx))
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|p| p.is_finite()),
        });
    }
    Ok(movies)
}

/// Parse the credits table from any reader
pub fn parse_credits_from_reader<R: Read>(input: R) -> Result<Vec<CreditRow>> {
    let mut reader = Reader::from_reader(input);
    let columns = Columns::read(&mut reader, CREDITS_FILE)?;

    let movie_id_col = columns.position("movie_id")?;
    let title_col = columns.position("title")?;
    let cast_col = columns.position("cast")?;
    let crew_col = columns.position("crew")?;

    let mut credits = Vec::new();
    for record in reader.records() {
        let record = record?;
        credits.push(CreditRow {
            movie_id: parse_id(&record, movie_id_col, CREDITS_FILE, "movie_id")?,
            title: field(&record, title_col),
            cast: field(&record, cast_col),
            crew: field(&record, crew_col),
        });
    }
    Ok(credits)
}

/// Parse tmdb_5000_movies.csv
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRow>> {
    parse_movies_from_reader(open(path)?)
}

/// Parse tmdb_5000_credits.csv
pub fn parse_credits(path: &Path) -> Result<Vec<CreditRow>> {
    parse_credits_from_reader(open(path)?)
}

pub(crate) fn movies_path(data_dir: &Path) -> std::path::PathBuf {
    data_dir.join(MOVIES_FILE)
}

pub(crate) fn credits_path(data_dir: &Path) -> std::path::PathBuf {
    data_dir.join(CREDITS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES_CSV: &str = "budget,genres,id,keywords,popularity,title\n\
        237000000,\"[{\"\"id\"\": 28, \"\"name\"\": \"\"Action\"\"}]\",19995,\"[{\"\"id\"\": 1463, \"\"name\"\": \"\"culture clash\"\"}]\",150.437577,Avatar\n\
        0,[],42,[],,Untitled\n";

    const CREDITS_CSV: &str = "movie_id,title,cast,crew\n\
        19995,Avatar,\"[{\"\"name\"\": \"\"Sam Worthington\"\", \"\"order\"\": 0}]\",\"[{\"\"name\"\": \"\"James Cameron\"\", \"\"job\"\": \"\"Director\"\"}]\"\n";

    #[test]
    fn test_parse_movies() {
        let movies = parse_movies_from_reader(MOVIES_CSV.as_bytes()).unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 19995);
        assert_eq!(movies[0].title, "Avatar");
        assert_eq!(movies[0].genres, r#"[{"id": 28, "name": "Action"}]"#);
        assert_eq!(movies[0].popularity, Some(150.437577));
        assert_eq!(movies[1].popularity, None);
        assert_eq!(movies[1].keywords, "[]");
    }

    #[test]
    fn test_parse_credits() {
        let credits = parse_credits_from_reader(CREDITS_CSV.as_bytes()).unwrap();

        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].movie_id, 19995);
        assert!(credits[0].crew.contains("James Cameron"));
    }

    #[test]
    fn test_invalid_id_reports_line() {
        let csv = "id,title,genres,keywords\nabc,Broken,[],[]\n";
        let err = parse_movies_from_reader(csv.as_bytes()).unwrap_err();

        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, MOVIES_FILE);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column() {
        let csv = "movie_id,title,cast\n1,A,[]\n";
        let err = parse_credits_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { ref column, .. } if column == "crew"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_movies(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
