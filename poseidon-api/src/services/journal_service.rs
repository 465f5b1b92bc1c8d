//! Journal service: provider reads memoized in the response cache.
//!
//! Read paths (`list`, `get_by_id`, `search`) check the cache under a key
//! built from the operation name and its parameters. A hit returns the
//! stored value (pages and search responses flagged `cached: true`); a miss
//! calls the provider and stores the result with the cache's default TTL.
//! Briefs are never cached since the same id can be asked about in
//! different query contexts.

use poseidon_core::{
    Brief, JournalDetail, JournalPage, PageParams, PoseidonResult, SearchParams, SearchResponse,
};
use poseidon_storage::{generate_key, JournalProvider, Provider, TtlCache};
use serde::Serialize;
use std::sync::Arc;

use crate::constants::{CACHE_PREFIX_BY_ID, CACHE_PREFIX_LIST, CACHE_PREFIX_SEARCH};

/// Everything the service stores in the response cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedRead {
    Page(JournalPage),
    Journal(JournalDetail),
    Search(SearchResponse),
}

pub type ResponseCache = TtlCache<CachedRead>;

#[derive(Debug, Serialize)]
struct IdKey<'a> {
    id: &'a str,
}

pub struct JournalService {
    provider: Provider,
    cache: Arc<ResponseCache>,
}

impl JournalService {
    pub fn new(provider: Provider, cache: Arc<ResponseCache>) -> Self {
        Self { provider, cache }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// One page of the catalog.
    pub async fn list(&self, params: &PageParams) -> PoseidonResult<JournalPage> {
        let key = cache_key(CACHE_PREFIX_LIST, params);
        if let Some(CachedRead::Page(mut page)) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Cache hit");
            page.cached = true;
            return Ok(page);
        }

        tracing::debug!(key = %key, "Cache miss");
        let page = self.provider.fetch_all(params).await?;
        self.cache.set(key, CachedRead::Page(page.clone()));
        Ok(page)
    }

    /// A journal with its trends. Unknown ids are not cached.
    pub async fn get_by_id(&self, id: &str) -> PoseidonResult<Option<JournalDetail>> {
        let key = cache_key(CACHE_PREFIX_BY_ID, &IdKey { id });
        if let Some(CachedRead::Journal(detail)) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(Some(detail));
        }

        tracing::debug!(key = %key, "Cache miss");
        let detail = self.provider.fetch_by_id(id).await?;
        if let Some(detail) = &detail {
            self.cache.set(key, CachedRead::Journal(detail.clone()));
        }
        Ok(detail)
    }

    pub async fn search(&self, params: &SearchParams) -> PoseidonResult<SearchResponse> {
        let key = cache_key(CACHE_PREFIX_SEARCH, params);
        if let Some(CachedRead::Search(mut response)) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Cache hit");
            response.cached = true;
            return Ok(response);
        }

        tracing::debug!(key = %key, "Cache miss");
        let response = self.provider.search(params).await?;
        self.cache.set(key, CachedRead::Search(response.clone()));
        Ok(response)
    }

    pub async fn generate_brief(&self, id: &str, query: Option<&str>) -> PoseidonResult<Brief> {
        self.provider.generate_brief(id, query).await
    }
}

/// Key from the operation prefix and the serialized parameters.
///
/// Parameter types here always serialize to a JSON object; should that ever
/// fail the prefix alone is used, which only coarsens caching.
fn cache_key<T: Serialize>(prefix: &str, params: &T) -> String {
    match serde_json::to_value(params) {
        Ok(value) => generate_key(prefix, Some(&value)),
        Err(err) => {
            tracing::warn!(prefix, error = %err, "Cache key parameters did not serialize");
            generate_key(prefix, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn service() -> JournalService {
        let provider = Provider::from_mode("mock").expect("builtin catalog parses");
        JournalService::new(provider, Arc::new(TtlCache::new(Duration::from_secs(300))))
    }

    #[test]
    fn test_cache_key_shapes() {
        assert_eq!(
            cache_key(CACHE_PREFIX_LIST, &PageParams::default()),
            "journals:all:{}"
        );
        assert_eq!(
            cache_key(CACHE_PREFIX_LIST, &PageParams::new(Some(5), Some(0))),
            r#"journals:all:{"limit":5,"offset":0}"#
        );
        assert_eq!(
            cache_key(CACHE_PREFIX_BY_ID, &IdKey { id: "jls" }),
            r#"journals:id:{"id":"jls"}"#
        );
    }

    #[tokio::test]
    async fn test_list_second_call_cached() -> PoseidonResult<()> {
        let service = service();
        let first = service.list(&PageParams::default()).await?;
        assert!(!first.cached);

        let second = service.list(&PageParams::default()).await?;
        assert!(second.cached);
        assert_eq!(second.data, first.data);

        // A different page is a different key
        let other = service.list(&PageParams::new(Some(3), None)).await?;
        assert!(!other.cached);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_second_call_cached() -> PoseidonResult<()> {
        let service = service();
        let params = SearchParams::with_query("collaborative learning");
        assert!(!service.search(&params).await?.cached);
        let again = service.search(&params).await?;
        assert!(again.cached);
        assert!(again.results.iter().any(|r| r.journal.id == "ijcscl"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_id_not_cached() -> PoseidonResult<()> {
        let service = service();
        assert_eq!(service.get_by_id("non-existent").await?, None);
        assert_eq!(service.cache().len(), 0);

        assert!(service.get_by_id("jls").await?.is_some());
        assert_eq!(service.cache().len(), 1);
        assert!(service.get_by_id("jls").await?.is_some());
        assert_eq!(service.cache().stats().hits, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_brief_not_cached() -> PoseidonResult<()> {
        let service = service();
        service.generate_brief("aied", None).await?;
        assert!(service.cache().is_empty());
        assert!(service.generate_brief("nope", None).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_entry_refetched() -> PoseidonResult<()> {
        let provider = Provider::from_mode("mock")?;
        let service = JournalService::new(provider, Arc::new(TtlCache::new(Duration::ZERO)));
        service.list(&PageParams::default()).await?;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(!service.list(&PageParams::default()).await?.cached);
        Ok(())
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(service().provider_name(), "mock");
    }
}
