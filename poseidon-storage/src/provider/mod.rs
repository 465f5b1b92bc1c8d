//! Journal provider abstraction.
//!
//! `JournalProvider` is the capability set every data source offers. The
//! concrete sources form a closed set in [`Provider`]; adding a source means
//! adding a variant, not branching at call sites.

mod mock;

pub use mock::MockProvider;

use async_trait::async_trait;
use poseidon_core::{
    Brief, JournalDetail, JournalPage, PageParams, PoseidonResult, SearchParams, SearchResponse,
};
use std::sync::Arc;

use crate::catalog::Catalog;

#[async_trait]
pub trait JournalProvider: Send + Sync {
    /// Short provider name reported by the health endpoint.
    fn name(&self) -> &'static str;

    /// One page of the catalog.
    async fn fetch_all(&self, params: &PageParams) -> PoseidonResult<JournalPage>;

    /// A journal with its trends, or `None` for an unknown id.
    async fn fetch_by_id(&self, id: &str) -> PoseidonResult<Option<JournalDetail>>;

    /// Score, filter and paginate the catalog.
    async fn search(&self, params: &SearchParams) -> PoseidonResult<SearchResponse>;

    /// Templated briefing for one journal. Fails with `NotFound` for an unknown id.
    async fn generate_brief(&self, id: &str, query: Option<&str>) -> PoseidonResult<Brief>;
}

/// Every provider the server can run with.
#[derive(Debug, Clone)]
pub enum Provider {
    Mock(MockProvider),
}

impl Provider {
    /// Build the provider selected by `PROVIDER_MODE`.
    ///
    /// Matching is case-insensitive. Unknown modes fall back to the mock
    /// provider with a warning.
    pub fn from_mode(mode: &str) -> PoseidonResult<Self> {
        match mode.to_lowercase().as_str() {
            "mock" => {}
            other => {
                tracing::warn!(mode = %other, "Unknown provider mode, defaulting to mock");
            }
        }
        let catalog = Catalog::builtin()?;
        Ok(Self::Mock(MockProvider::new(Arc::new(catalog))))
    }
}

#[async_trait]
impl JournalProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Self::Mock(p) => p.name(),
        }
    }

    async fn fetch_all(&self, params: &PageParams) -> PoseidonResult<JournalPage> {
        match self {
            Self::Mock(p) => p.fetch_all(params).await,
        }
    }

    async fn fetch_by_id(&self, id: &str) -> PoseidonResult<Option<JournalDetail>> {
        match self {
            Self::Mock(p) => p.fetch_by_id(id).await,
        }
    }

    async fn search(&self, params: &SearchParams) -> PoseidonResult<SearchResponse> {
        match self {
            Self::Mock(p) => p.search(params).await,
        }
    }

    async fn generate_brief(&self, id: &str, query: Option<&str>) -> PoseidonResult<Brief> {
        match self {
            Self::Mock(p) => p.generate_brief(id, query).await,
        }
    }
}
