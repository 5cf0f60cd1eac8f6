//! Shared data types: the collection element and the metadata record.

use serde::{Deserialize, Serialize};

/// A movie in the user's collection.
///
/// `id` is the opaque identifier assigned by the metadata service; it is
/// never generated locally. A movie is immutable once added and is removed
/// only by clearing the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
}

/// Descriptive record for a movie, as returned by the metadata service.
///
/// Field names mirror the OMDb wire format (PascalCase, `imdbID`). Only
/// `Title` is required; an OMDb error body carries neither, so it fails to
/// parse and the lookup client folds it to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(rename = "imdbID", default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
}

impl MovieRecord {
    /// Minimal record with just a title. Handy in tests and prompts.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            genre: None,
            director: None,
            plot: None,
            imdb_id: None,
        }
    }
}
