//! Fetching and assembly of dataset snapshots.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{header::CACHE_CONTROL, Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::AppConfig,
    error::{DatasetError, Resource},
    models::{DatasetMeta, Unit, Warband},
};

use super::index::CrossIndex;

/// The atomically-replaced bundle of both collections plus their indexes
/// and metadata. Immutable for the lifetime of one loaded session; a
/// reload replaces it wholesale.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// All published units, in document order.
    pub units: Vec<Unit>,
    /// All published warbands, in document order.
    pub warbands: Vec<Warband>,
    /// Advisory summary metadata.
    pub meta: DatasetMeta,
    /// Id lookups over both collections.
    pub index: CrossIndex,
    /// When this snapshot was assembled.
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Status-line summary; metadata counts win when present, with the
    /// collections themselves as the authoritative fallback.
    pub fn status_line(&self) -> String {
        let units = self
            .meta
            .counts
            .units
            .unwrap_or(self.units.len() as u64);
        let warbands = self
            .meta
            .counts
            .warbands
            .unwrap_or(self.warbands.len() as u64);
        format!("Loaded: {units} units, {warbands} warbands")
    }
}

/// Fetches the three published JSON documents and assembles snapshots.
///
/// The loader never touches process-wide state; installing a snapshot is
/// the caller's job (see [`super::SnapshotSlot`]).
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    client: Client,
    base_url: String,
}

struct Fetched {
    status: StatusCode,
    body: String,
}

impl DatasetLoader {
    /// Build a loader from configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch all three documents concurrently and assemble one snapshot.
    ///
    /// Strict join: either every document loads and parses, or the attempt
    /// fails as a whole and the caller keeps whatever snapshot it had.
    pub async fn load_all(&self) -> Result<Snapshot, DatasetError> {
        let (units_res, warbands_res, meta_res) = tokio::join!(
            self.fetch(Resource::Units),
            self.fetch(Resource::Warbands),
            self.fetch(Resource::Meta),
        );
        let units = units_res?;
        let warbands = warbands_res?;
        let meta = meta_res?;

        if !units.status.is_success() || !warbands.status.is_success() || !meta.status.is_success()
        {
            return Err(DatasetError::Load {
                units: units.status.as_u16(),
                warbands: warbands.status.as_u16(),
                meta: meta.status.as_u16(),
            });
        }

        let units: Vec<Unit> = parse(Resource::Units, &units.body)?;
        let warbands: Vec<Warband> = parse(Resource::Warbands, &warbands.body)?;
        let meta: DatasetMeta = parse(Resource::Meta, &meta.body)?;

        let index = CrossIndex::build(&units, &warbands);
        Ok(Snapshot {
            units,
            warbands,
            meta,
            index,
            loaded_at: Utc::now(),
        })
    }

    async fn fetch(&self, resource: Resource) -> Result<Fetched, DatasetError> {
        let url = format!("{}/{}", self.base_url, resource.file_name());
        // Always bypass intermediate caches: freshness is a requirement,
        // not an optimization.
        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|source| DatasetError::Request { resource, source })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| DatasetError::Request { resource, source })?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "fetched document");
        Ok(Fetched { status, body })
    }
}

fn parse<T: DeserializeOwned>(resource: Resource, body: &str) -> Result<T, DatasetError> {
    serde_json::from_str(body).map_err(|source| DatasetError::Parse { resource, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testing::{default_routes, serve};
    use crate::models::StatValue;

    fn loader_for(base_url: String) -> DatasetLoader {
        let config = AppConfig {
            api_base_url: base_url,
            ..AppConfig::default()
        };
        DatasetLoader::new(&config).expect("build loader")
    }

    #[tokio::test]
    async fn loads_and_indexes_all_three_documents() {
        let base = serve(default_routes()).await;
        let snapshot = loader_for(base).load_all().await.expect("load_all");

        assert_eq!(snapshot.units.len(), 2);
        assert_eq!(snapshot.warbands.len(), 1);
        assert_eq!(snapshot.status_line(), "Loaded: 2 units, 1 warbands");

        let swordsman = snapshot.index.unit("u1").expect("u1 indexed");
        assert_eq!(swordsman.gold(), 30);
        assert_eq!(
            swordsman
                .profile
                .as_ref()
                .and_then(|profile| profile.movement.clone()),
            Some(StatValue::Number(4.0))
        );
        assert_eq!(snapshot.index.warband_label("w1"), "Mercenaries");
        // u2 references a warband that does not exist; loading tolerates it.
        assert_eq!(snapshot.index.warband_label("w404"), "w404");
    }

    #[tokio::test]
    async fn one_failed_document_fails_the_whole_attempt_with_statuses() {
        let mut routes = default_routes();
        routes.remove("warbands.json");
        let base = serve(routes).await;

        let err = loader_for(base)
            .load_all()
            .await
            .expect_err("load must fail");
        match err {
            DatasetError::Load {
                units,
                warbands,
                meta,
            } => {
                assert_eq!(units, 200);
                assert_eq!(warbands, 404);
                assert_eq!(meta, 200);
            }
            other => panic!("expected Load error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let mut routes = default_routes();
        routes.insert("units.json", (200, "{not json".to_string()));
        let base = serve(routes).await;

        let err = loader_for(base)
            .load_all()
            .await
            .expect_err("load must fail");
        match err {
            DatasetError::Parse { resource, .. } => assert_eq!(resource, Resource::Units),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_shape_is_a_parse_error_too() {
        let mut routes = default_routes();
        // An object where an array of warbands is expected.
        routes.insert("warbands.json", (200, META_LIKE.to_string()));
        let base = serve(routes).await;

        let err = loader_for(base)
            .load_all()
            .await
            .expect_err("load must fail");
        match err {
            DatasetError::Parse { resource, .. } => assert_eq!(resource, Resource::Warbands),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    const META_LIKE: &str = r#"{"counts": {"units": 0}}"#;
}
