//! The `TripleStore` capability and its two backend dialects.
//!
//! Fuseki accepts a raw Turtle document upload on its graph-store endpoint;
//! GraphDB only takes SPARQL updates on its statements endpoint, so inserts
//! are rewritten through [`sparql::turtle_to_update`]. Both answer SELECT
//! queries with `application/sparql-results+json`. The dialect is picked once
//! at construction; call sites hold an `Arc<dyn TripleStore>` and never
//! branch on it.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::StoreError;
use crate::results::SelectResults;
use crate::sparql;

/// Timeout for insert requests.
const INSERT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for SELECT queries.
const QUERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for the reachability probe.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// The graph store capability: atomic batch insert, pattern query, probe.
#[async_trait]
pub trait TripleStore: Send + Sync {
    /// Submits a Turtle document for atomic insertion.
    async fn insert_turtle(&self, turtle: &str) -> Result<(), StoreError>;

    /// Executes a read-only SELECT query.
    async fn select(&self, query: &str) -> Result<SelectResults, StoreError>;

    /// Lightweight reachability probe.
    async fn health(&self) -> Result<(), StoreError>;
}

/// Which triple store dialect a node talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Apache Jena Fuseki.
    Fuseki,
    /// Ontotext GraphDB.
    GraphDb,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fuseki" => Ok(Self::Fuseki),
            "graphdb" => Ok(Self::GraphDb),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// Constructs the store implementation for the configured dialect.
pub fn open_store(backend: Backend, base_url: &str, repository: &str) -> Arc<dyn TripleStore> {
    match backend {
        Backend::Fuseki => Arc::new(FusekiStore::new(base_url, repository)),
        Backend::GraphDb => Arc::new(GraphDbStore::new(base_url, repository)),
    }
}

fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(QUERY_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// Reads the body of a non-success response into a typed error, logged with
/// status and detail so a failed insert is never reported as stored.
async fn ensure_success(resp: reqwest::Response, op: &str) -> Result<reqwest::Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::error!(op, status = status.as_u16(), %body, "triple store request failed");
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Fuseki dialect: raw Turtle uploads against a dataset.
pub struct FusekiStore {
    client: reqwest::Client,
    base_url: String,
    dataset: String,
}

impl FusekiStore {
    pub fn new(base_url: &str, dataset: &str) -> Self {
        Self {
            client: build_http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset: dataset.to_string(),
        }
    }

    fn data_endpoint(&self) -> String {
        format!("{}/{}/data", self.base_url, self.dataset)
    }

    fn query_endpoint(&self) -> String {
        format!("{}/{}/query", self.base_url, self.dataset)
    }

    fn health_endpoint(&self) -> String {
        format!("{}/$/ping", self.base_url)
    }
}

#[async_trait]
impl TripleStore for FusekiStore {
    async fn insert_turtle(&self, turtle: &str) -> Result<(), StoreError> {
        let resp = self
            .client
            .post(self.data_endpoint())
            .timeout(INSERT_TIMEOUT)
            .header(CONTENT_TYPE, "text/turtle")
            .body(turtle.to_string())
            .send()
            .await?;
        ensure_success(resp, "insert").await?;
        Ok(())
    }

    async fn select(&self, query: &str) -> Result<SelectResults, StoreError> {
        let resp = self
            .client
            .get(self.query_endpoint())
            .query(&[("query", query)])
            .header(ACCEPT, "application/sparql-results+json")
            .send()
            .await?;
        let resp = ensure_success(resp, "query").await?;
        Ok(resp.json().await?)
    }

    async fn health(&self) -> Result<(), StoreError> {
        let resp = self
            .client
            .get(self.health_endpoint())
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        ensure_success(resp, "health").await?;
        Ok(())
    }
}

/// GraphDB dialect: SPARQL updates against a repository.
pub struct GraphDbStore {
    client: reqwest::Client,
    base_url: String,
    repository: String,
}

impl GraphDbStore {
    pub fn new(base_url: &str, repository: &str) -> Self {
        Self {
            client: build_http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
        }
    }

    fn update_endpoint(&self) -> String {
        format!("{}/repositories/{}/statements", self.base_url, self.repository)
    }

    fn query_endpoint(&self) -> String {
        format!("{}/repositories/{}", self.base_url, self.repository)
    }

    fn health_endpoint(&self) -> String {
        format!("{}/rest/repositories", self.base_url)
    }
}

#[async_trait]
impl TripleStore for GraphDbStore {
    async fn insert_turtle(&self, turtle: &str) -> Result<(), StoreError> {
        let update = sparql::turtle_to_update(turtle);
        let resp = self
            .client
            .post(self.update_endpoint())
            .timeout(INSERT_TIMEOUT)
            .form(&[("update", update.as_str())])
            .send()
            .await?;
        ensure_success(resp, "insert").await?;
        Ok(())
    }

    async fn select(&self, query: &str) -> Result<SelectResults, StoreError> {
        let resp = self
            .client
            .get(self.query_endpoint())
            .query(&[("query", query)])
            .header(ACCEPT, "application/sparql-results+json")
            .send()
            .await?;
        let resp = ensure_success(resp, "query").await?;
        Ok(resp.json().await?)
    }

    async fn health(&self) -> Result<(), StoreError> {
        let resp = self
            .client
            .get(self.health_endpoint())
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        ensure_success(resp, "health").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuseki_endpoints_follow_the_dataset_layout() {
        let store = FusekiStore::new("http://localhost:3030/", "weft");
        assert_eq!(store.data_endpoint(), "http://localhost:3030/weft/data");
        assert_eq!(store.query_endpoint(), "http://localhost:3030/weft/query");
        assert_eq!(store.health_endpoint(), "http://localhost:3030/$/ping");
    }

    #[test]
    fn graphdb_endpoints_follow_the_repository_layout() {
        let store = GraphDbStore::new("http://localhost:7200", "weft");
        assert_eq!(
            store.update_endpoint(),
            "http://localhost:7200/repositories/weft/statements"
        );
        assert_eq!(
            store.query_endpoint(),
            "http://localhost:7200/repositories/weft"
        );
        assert_eq!(
            store.health_endpoint(),
            "http://localhost:7200/rest/repositories"
        );
    }

    #[test]
    fn backend_parses_from_config_strings() {
        assert_eq!("fuseki".parse::<Backend>().unwrap(), Backend::Fuseki);
        assert_eq!("graphdb".parse::<Backend>().unwrap(), Backend::GraphDb);
        assert!("oracle".parse::<Backend>().is_err());
    }

    #[tokio::test]
    async fn health_failure_surfaces_as_typed_transport_error() {
        // Nothing listens on this port; the probe must come back as a
        // StoreError, not a panic.
        let store = FusekiStore::new("http://127.0.0.1:1", "weft");
        let err = store.health().await.expect_err("probe should fail");
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
