//! Decoding of the serialized structured-list columns.
//!
//! TMDB stores genres, keywords, cast and crew as JSON arrays of objects
//! inside a CSV cell. A cell that does not decode is treated as an empty
//! list: [`parse_or_default`] is the decode-or-fallback combinator, and
//! [`decode_entries`] exposes the failure for callers that want to count it.

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A `{.., name, ..}` entry (genres, keywords, cast)
#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

/// A cast entry. `name` is only read on the billed entries that are kept,
/// so one incomplete entry further down doesn't spoil the list.
#[derive(Debug, Clone, Deserialize)]
pub struct CastEntry {
    #[serde(default)]
    pub name: Option<String>,
}

/// A crew entry; only the job and name matter here, and `name` only on
/// the director
#[derive(Debug, Clone, Deserialize)]
pub struct CrewEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

/// Decode a serialized list, reporting malformed input.
pub fn decode_entries<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

/// Decode a serialized list, falling back to an empty list.
pub fn parse_or_default<T: DeserializeOwned>(raw: &str) -> Vec<T> {
    decode_entries(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named_entries() {
        let entries: Vec<NamedEntry> =
            parse_or_default(r#"[{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]"#);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Action", "Adventure"]);
    }

    #[test]
    fn test_malformed_falls_back_to_empty() {
        assert!(parse_or_default::<NamedEntry>("").is_empty());
        assert!(parse_or_default::<NamedEntry>("not a list").is_empty());
        assert!(parse_or_default::<NamedEntry>(r#"[{"id": 1}]"#).is_empty());
        assert!(decode_entries::<NamedEntry>("[{").is_err());
    }

    #[test]
    fn test_crew_job_is_optional() {
        let crew: Vec<CrewEntry> = parse_or_default(r#"[{"name": "Someone"}, {"job": "Grip"}]"#);
        assert_eq!(crew.len(), 2);
        assert_eq!(crew[0].job, None);
        assert_eq!(crew[1].name, None);
    }
}
