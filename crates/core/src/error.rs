//! Error taxonomy for dataset loading.
//!
//! Only whole-load failures are errors: a lookup miss in an index or an
//! absent optional field always resolves to a fallback value instead.

use std::fmt;

use thiserror::Error;

/// The three remote documents that make up one dataset load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// The unit collection (`units.json`).
    Units,
    /// The warband collection (`warbands.json`).
    Warbands,
    /// The summary metadata record (`index.json`).
    Meta,
}

impl Resource {
    /// File name of the document under the API base URL.
    pub fn file_name(self) -> &'static str {
        match self {
            Resource::Units => "units.json",
            Resource::Warbands => "warbands.json",
            Resource::Meta => "index.json",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Units => write!(f, "units"),
            Resource::Warbands => write!(f, "warbands"),
            Resource::Meta => write!(f, "meta"),
        }
    }
}

/// Failure of one whole `load_all` attempt.
///
/// A failed attempt never installs anything; callers keep whatever
/// snapshot they already had.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// One or more documents answered with a non-success status.
    /// Carries all three HTTP status codes for diagnostics.
    #[error("failed to load api: units={units} warbands={warbands} meta={meta}")]
    Load {
        /// HTTP status of the units document.
        units: u16,
        /// HTTP status of the warbands document.
        warbands: u16,
        /// HTTP status of the metadata document.
        meta: u16,
    },
    /// A request never produced a response.
    #[error("request for {resource} failed: {source}")]
    Request {
        /// The document whose request failed.
        resource: Resource,
        /// Transport-level cause.
        #[source]
        source: reqwest::Error,
    },
    /// A response body was not valid data in the expected shape.
    #[error("failed to parse {resource}: {source}")]
    Parse {
        /// The document whose body failed to parse.
        resource: Resource,
        /// Deserialization cause.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_reports_all_three_statuses() {
        let err = DatasetError::Load {
            units: 200,
            warbands: 404,
            meta: 200,
        };
        assert_eq!(
            err.to_string(),
            "failed to load api: units=200 warbands=404 meta=200"
        );
    }

    #[test]
    fn resources_name_their_documents() {
        assert_eq!(Resource::Units.file_name(), "units.json");
        assert_eq!(Resource::Meta.file_name(), "index.json");
        assert_eq!(Resource::Warbands.to_string(), "warbands");
    }
}
