//! Cached, retrying client for the Pokédex API
//!
//! [`DataClient`] exposes two read operations, a list page and a detail
//! record. Both are memoized for the lifetime of the client and survive
//! transient upstream failures through a bounded linear-backoff retry loop.
//!
//! The application builds one client and lends it to whatever needs data;
//! there is no global instance.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CachedResponse, ResponseCache};
use crate::config::ClientConfig;
use crate::data::api::{DetailsResponse, ListResponse};
use crate::data::{PokemonDetails, PokemonPage, PokemonRef};
use crate::error::{FetchError, RequestError};
use crate::transport::{HttpTransport, RawResponse, Transport};

/// Client for the Pokédex list and detail endpoints
pub struct DataClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
}

impl fmt::Debug for DataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataClient")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Default for DataClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl DataClient {
    /// Create a client that talks HTTP through `reqwest`
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            cache: ResponseCache::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch one page of the catalog
    ///
    /// # Arguments
    /// * `offset` - Number of items to skip
    /// * `limit` - Page size; must be positive
    ///
    /// # Returns
    /// * `Ok(Arc<PokemonPage>)` - Items with positional ids `offset + 1 ..`
    /// * `Err(FetchError)` - If retries are exhausted or the body does not decode
    ///
    /// A page that was fetched once is served from the cache for the rest of
    /// the client's lifetime.
    pub async fn fetch_list(&self, offset: u32, limit: u32) -> Result<Arc<PokemonPage>, FetchError> {
        if limit == 0 {
            return Err(FetchError::InvalidRequest(
                "limit must be greater than zero".to_string(),
            ));
        }

        let key = list_cache_key(offset, limit);
        if let Some(page) = self.cache.get_page(&key) {
            debug!(key = %key, "cache hit");
            return Ok(page);
        }
        debug!(key = %key, "cache miss");

        let url = self.config.list_url(offset, limit);
        let raw: ListResponse = self.fetch_with_retry(&url).await?;
        let page = Arc::new(PokemonPage::from_response(raw, offset, limit));

        self.cache.insert(key, CachedResponse::Page(page.clone()));
        Ok(page)
    }

    /// Fetch a 1-based page using the configured page size
    pub async fn fetch_page(&self, page_number: u32) -> Result<Arc<PokemonPage>, FetchError> {
        let limit = self.config.page_size;
        let offset = page_number.saturating_sub(1).saturating_mul(limit);
        self.fetch_list(offset, limit).await
    }

    /// Fetch the normalized detail record for one creature
    ///
    /// # Arguments
    /// * `id` - Positive numeric id or non-empty name
    ///
    /// The capture timestamp is set on the first successful fetch and is
    /// never refreshed; later calls return the cached record unchanged.
    pub async fn fetch_details(
        &self,
        id: impl Into<PokemonRef>,
    ) -> Result<Arc<PokemonDetails>, FetchError> {
        let id = id.into();
        if let Some(reason) = id.validation_error() {
            return Err(FetchError::InvalidRequest(reason.to_string()));
        }

        let key = id.cache_key();
        if let Some(details) = self.cache.get_details(&key) {
            debug!(key = %key, "cache hit");
            return Ok(details);
        }
        debug!(key = %key, "cache miss");

        let url = self.config.details_url(&id.to_string());
        let raw: DetailsResponse = self.fetch_with_retry(&url).await?;
        let details = Arc::new(PokemonDetails::from_response(raw, Utc::now()));

        self.cache
            .insert(key, CachedResponse::Details(details.clone()));
        Ok(details)
    }

    /// Fetch several detail records concurrently
    ///
    /// Results come back in input order, each with its own outcome; one
    /// failure does not affect the others.
    pub async fn fetch_details_many(
        &self,
        ids: &[PokemonRef],
    ) -> Vec<Result<Arc<PokemonDetails>, FetchError>> {
        join_all(ids.iter().map(|id| self.fetch_details(id.clone()))).await
    }

    /// Drop every cached response
    pub fn clear_cache(&self) {
        let dropped = self.cache.len();
        self.cache.clear();
        info!(entries = dropped, "cache cleared");
    }

    /// Snapshot of the cache for diagnostics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// GET `url` with a per-attempt timeout and linear-backoff retries, then
    /// decode the body
    ///
    /// Timeouts, non-2xx statuses and network failures are retried up to
    /// `max_retries` times, sleeping `backoff_step * (attempt + 1)` in
    /// between. A body that fails to decode is terminal and never retried.
    async fn fetch_with_retry<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let mut attempt: u32 = 0;
        let response = loop {
            match self.attempt(url).await {
                Ok(response) => break response,
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff_for(attempt);
                    warn!(
                        url,
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt + 1,
                        source: err,
                    });
                }
            }
        };

        serde_json::from_slice(&response.body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// One physical attempt, bounded by the configured timeout
    async fn attempt(&self, url: &str) -> Result<RawResponse, RequestError> {
        let timeout = self.config.timeout;
        let response = tokio::time::timeout(timeout, self.transport.get(url))
            .await
            .map_err(|_| RequestError::Timeout(timeout))?
            .map_err(|err| match err {
                RequestError::Timeout(_) => RequestError::Timeout(timeout),
                other => other,
            })?;

        if !response.is_success() {
            return Err(RequestError::HttpStatus {
                status: response.status,
            });
        }
        Ok(response)
    }
}

/// Cache key for a list page: `list_<offset>_<limit>`
pub fn list_cache_key(offset: u32, limit: u32) -> String {
    format!("list_{}_{}", offset, limit)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::transport::scripted::{ScriptedTransport, Step};

    fn list_body(names: &[&str], next: bool) -> String {
        let results: Vec<_> = names
            .iter()
            .map(|name| serde_json::json!({"name": name, "url": ""}))
            .collect();
        let next_url = next.then_some("https://pokeapi.co/api/v2/pokemon?offset=48&limit=12");
        serde_json::json!({
            "count": 1302,
            "next": next_url,
            "previous": null,
            "results": results,
        })
        .to_string()
    }

    fn details_body(id: u32, name: &str) -> String {
        let front = format!("{}.png", id);
        serde_json::json!({
            "id": id,
            "name": name,
            "height": 7,
            "weight": 69,
            "base_experience": 64,
            "order": id,
            "sprites": {"front_default": front},
            "types": [{"slot": 1, "type": {"name": "grass", "url": ""}}],
            "stats": [{"base_stat": 45, "effort": 0, "stat": {"name": "hp", "url": ""}}],
            "abilities": [{"ability": {"name": "overgrow", "url": ""}, "is_hidden": false, "slot": 1}],
            "moves": []
        })
        .to_string()
    }

    fn client_with(transport: &Arc<ScriptedTransport>) -> DataClient {
        DataClient::with_transport(ClientConfig::default(), transport.clone())
    }

    #[tokio::test]
    async fn test_list_is_fetched_once_per_key() {
        let transport = Arc::new(ScriptedTransport::always(Step::ok(list_body(
            &["bulbasaur", "ivysaur"],
            true,
        ))));
        let client = client_with(&transport);

        let first = client.fetch_list(0, 36).await.unwrap();
        for _ in 0..5 {
            let again = client.fetch_list(0, 36).await.unwrap();
            assert!(Arc::ptr_eq(&first, &again));
        }

        assert_eq!(transport.calls(), 1);
        assert_eq!(client.cache_stats().keys, vec!["list_0_36"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_after_linear_backoff() {
        let transport = Arc::new(ScriptedTransport::new([
            Step::status(500),
            Step::status(502),
            Step::ok(details_body(1, "bulbasaur")),
        ]));
        let client = client_with(&transport);

        let start = Instant::now();
        let details = client.fetch_details(1u32).await.unwrap();

        assert_eq!(details.name, "bulbasaur");
        assert_eq!(transport.calls(), 3);
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert!(start.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_backend_exhausts_retries() {
        let transport = Arc::new(ScriptedTransport::always(Step::status(503)));
        let client = client_with(&transport);

        let start = Instant::now();
        let err = client.fetch_list(0, 36).await.unwrap_err();

        assert_eq!(transport.calls(), 4);
        assert!(start.elapsed() >= Duration::from_secs(6));
        match err {
            FetchError::RetriesExhausted {
                attempts, source, ..
            } => {
                assert_eq!(attempts, 4);
                assert_eq!(source.status(), Some(503));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failures_are_retried() {
        let transport = Arc::new(ScriptedTransport::new([
            Step::Fail("connection reset".to_string()),
            Step::ok(details_body(4, "charmander")),
        ]));
        let client = client_with(&transport);

        let details = client.fetch_details("charmander").await.unwrap();
        assert_eq!(details.id, 4);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_times_out_and_is_retried() {
        let transport = Arc::new(ScriptedTransport::new([
            Step::Stall(Duration::from_secs(20), 200, details_body(7, "squirtle")),
            Step::ok(details_body(7, "squirtle")),
        ]));
        let client = client_with(&transport);

        let start = Instant::now();
        let details = client.fetch_details(7u32).await.unwrap();

        assert_eq!(details.name, "squirtle");
        assert_eq!(transport.calls(), 2);
        // 10s timeout on the first attempt, then a 1s backoff
        assert!(start.elapsed() >= Duration::from_secs(11));
        assert!(start.elapsed() < Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_reported_after_exhaustion() {
        let transport = Arc::new(ScriptedTransport::always(Step::Stall(
            Duration::from_secs(60),
            200,
            "{}".to_string(),
        )));
        let client = client_with(&transport);

        let err = client.fetch_details(1u32).await.unwrap_err();
        assert_eq!(transport.calls(), 4);
        assert!(matches!(
            err,
            FetchError::RetriesExhausted {
                source: RequestError::Timeout(t),
                ..
            } if t == Duration::from_secs(10)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_error_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::always(Step::ok("<html>oops</html>")));
        let client = client_with(&transport);

        let start = Instant::now();
        let err = client.fetch_details(1u32).await.unwrap_err();

        assert!(err.is_decode());
        assert_eq!(transport.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(client.cache_stats().keys.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_a_decode_error() {
        let transport = Arc::new(ScriptedTransport::always(Step::ok(r#"{"count": "many"}"#)));
        let client = client_with(&transport);

        let err = client.fetch_list(0, 10).await.unwrap_err();
        assert!(err.is_decode());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_list_ids_follow_offset() {
        let names: Vec<String> = (0..12).map(|i| format!("r{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let transport = Arc::new(ScriptedTransport::always(Step::ok(list_body(&refs, true))));
        let client = client_with(&transport);

        let page = client.fetch_list(36, 12).await.unwrap();

        let ids: Vec<u32> = page.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, (37..=48).collect::<Vec<_>>());
        let got: Vec<&str> = page.items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(got, refs);
        assert!(page.has_more);
        assert_eq!(page.total_count, 1302);
        assert_eq!(
            transport.urls(),
            vec!["https://pokeapi.co/api/v2/pokemon?offset=36&limit=12"]
        );
    }

    #[tokio::test]
    async fn test_details_cache_isolated_per_key_and_cleared() {
        let transport = Arc::new(ScriptedTransport::new([
            Step::ok(details_body(1, "bulbasaur")),
            Step::ok(details_body(2, "ivysaur")),
            Step::ok(details_body(1, "bulbasaur")),
        ]));
        let client = client_with(&transport);

        client.fetch_details(1u32).await.unwrap();
        client.fetch_details(2u32).await.unwrap();
        assert_eq!(transport.calls(), 2);
        assert_eq!(
            client.cache_stats(),
            CacheStats {
                size: 2,
                keys: vec!["details_1".to_string(), "details_2".to_string()],
            }
        );

        client.clear_cache();
        assert_eq!(client.cache_stats().size, 0);

        client.fetch_details(1u32).await.unwrap();
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            transport.urls(),
            vec![
                "https://pokeapi.co/api/v2/pokemon/1",
                "https://pokeapi.co/api/v2/pokemon/2",
                "https://pokeapi.co/api/v2/pokemon/1",
            ]
        );
    }

    #[tokio::test]
    async fn test_cached_details_keep_first_timestamp() {
        let transport = Arc::new(ScriptedTransport::always(Step::ok(details_body(
            25, "pikachu",
        ))));
        let client = client_with(&transport);

        let first = client.fetch_details("pikachu").await.unwrap();
        let second = client.fetch_details("Pikachu").await.unwrap();

        assert_eq!(first.fetched_at, second.fetched_at);
        assert_eq!(*first, *second);
        assert_eq!(transport.calls(), 1);
        assert_eq!(client.cache_stats().keys, vec!["details_pikachu"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_never_populate_cache() {
        let transport = Arc::new(ScriptedTransport::always(Step::status(404)));
        let client = client_with(&transport);

        assert!(client.fetch_details("missingno").await.is_err());
        assert!(client.fetch_list(0, 36).await.is_err());
        assert_eq!(client.cache_stats().size, 0);
    }

    #[tokio::test]
    async fn test_invalid_requests_skip_network() {
        let transport = Arc::new(ScriptedTransport::always(Step::ok("{}")));
        let client = client_with(&transport);

        assert!(matches!(
            client.fetch_list(0, 0).await,
            Err(FetchError::InvalidRequest(_))
        ));
        assert!(matches!(
            client.fetch_details(0u32).await,
            Err(FetchError::InvalidRequest(_))
        ));
        assert!(matches!(
            client.fetch_details("  ").await,
            Err(FetchError::InvalidRequest(_))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_path_like_names_skip_network() {
        let transport = Arc::new(ScriptedTransport::always(Step::ok(details_body(25, "pikachu"))));
        let client = client_with(&transport);

        for name in ["pikachu?limit=1", "../berry/1", "pikachu#top"] {
            assert!(
                matches!(client.fetch_details(name).await, Err(FetchError::InvalidRequest(_))),
                "{} should be rejected",
                name
            );
        }
        assert_eq!(transport.calls(), 0);
        assert!(client.cache_stats().keys.is_empty());
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let transport = Arc::new(ScriptedTransport::always(Step::status(500)));
        let client = DataClient::with_transport(
            ClientConfig::default().with_max_retries(0),
            transport.clone(),
        );

        let err = client.fetch_details(1u32).await.unwrap_err();
        assert_eq!(transport.calls(), 1);
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_fetch_page_uses_configured_page_size() {
        let transport = Arc::new(ScriptedTransport::always(Step::ok(list_body(&["a"], true))));
        let client = client_with(&transport);

        let page = client.fetch_page(2).await.unwrap();
        assert_eq!(page.offset, 36);
        assert_eq!(page.limit, 36);
        assert_eq!(page.page_number(), 2);
        assert_eq!(client.cache_stats().keys, vec!["list_36_36"]);
    }

    #[tokio::test]
    async fn test_fetch_details_many_keeps_input_order() {
        let transport = Arc::new(ScriptedTransport::new([
            Step::ok(details_body(1, "bulbasaur")),
            Step::ok(details_body(2, "ivysaur")),
        ]));
        let client = client_with(&transport);

        let ids = vec![PokemonRef::from("bulbasaur"), PokemonRef::from("ivysaur")];
        let results = client.fetch_details_many(&ids).await;

        assert_eq!(results.len(), 2);
        let names: Vec<String> = results
            .into_iter()
            .map(|result| result.unwrap().name.clone())
            .collect();
        assert_eq!(names, ["bulbasaur", "ivysaur"]);
        assert_eq!(client.cache_stats().size, 2);
    }

    #[test]
    fn test_list_cache_key_format() {
        assert_eq!(list_cache_key(0, 36), "list_0_36");
        assert_eq!(list_cache_key(36, 12), "list_36_12");
    }
}
