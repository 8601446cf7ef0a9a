//! Reactive side of the query cache.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::cache::{FetchDecision, OptimisticInsert, QueryCache, QueryKey};
use crate::error::ApiError;
use crate::toast::Toaster;

#[derive(Clone, Copy)]
pub struct QueryClient {
    cache: RwSignal<QueryCache>,
    toaster: Toaster,
}

impl QueryClient {
    pub fn new(toaster: Toaster) -> Self {
        Self { cache: RwSignal::new(QueryCache::new()), toaster }
    }

    pub fn cache(&self) -> RwSignal<QueryCache> {
        self.cache
    }

    pub fn toaster(&self) -> Toaster {
        self.toaster
    }

    /// Stale every entry under `prefix`; views showing them refetch
    pub fn invalidate(&self, prefix: &QueryKey) {
        self.cache.update(|c| {
            c.invalidate(prefix);
        });
    }

    pub fn optimistic_insert<T: Serialize>(&self, key: &QueryKey, record: &T) -> Option<OptimisticInsert> {
        let record = serde_json::to_value(record)
            .inspect_err(|err| log::error!("[query] optimistic record does not encode: {err}"))
            .ok()?;
        self.cache.try_update(|c| c.optimistic_insert(key, record)).flatten()
    }

    pub fn rollback_insert(&self, insert: &OptimisticInsert) {
        self.cache.try_update(|c| c.rollback_insert(insert));
    }

    /// Swap in the created record; when that cannot happen the list is
    /// staled so a refetch picks the record up
    pub fn commit_insert<T: Serialize>(&self, insert: &OptimisticInsert, record: &T) -> bool {
        match serde_json::to_value(record) {
            Ok(record) => self.cache.try_update(|c| c.commit_insert(insert, record)).unwrap_or(false),
            Err(err) => {
                log::error!("[query] committed record does not encode: {err}");
                self.invalidate(&insert.key);
                false
            }
        }
    }

    /// Run a mutation: `pending` is raised for its duration and a failure is
    /// toasted before `on_done` sees the result.
    pub fn mutate<T, Fut>(&self, pending: RwSignal<bool>, request: Fut, on_done: impl FnOnce(Result<T, ApiError>) + 'static)
    where
        T: 'static,
        Fut: Future<Output = Result<T, ApiError>> + 'static,
    {
        let toaster = self.toaster;
        pending.set(true);
        spawn_local(async move {
            let result = request.await;
            if let Err(err) = &result {
                log::error!("[mutation] {err}");
                toaster.error(err);
            }
            let _ = pending.try_set(false);
            on_done(result);
        });
    }
}

pub fn provide_query_client(toaster: Toaster) -> QueryClient {
    let client = QueryClient::new(toaster);
    provide_context(client);
    client
}

pub fn use_query_client() -> QueryClient {
    expect_context::<QueryClient>()
}

/// Reactive view of one cache entry
pub struct QueryResult<T: Send + Sync + 'static> {
    pub key: Memo<QueryKey>,
    pub data: Signal<Option<T>>,
    pub is_loading: Signal<bool>,
    pub error: Signal<Option<ApiError>>,
}

impl<T: Send + Sync + 'static> Clone for QueryResult<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for QueryResult<T> {}

/// Subscribe to the entry for `key`, fetching it when absent or stale.
///
/// `key` is tracked; `fetch` is called untracked right after the key
/// settles, so it should read the same inputs with `get_untracked`.
pub fn use_query<T, Fut>(
    key: impl Fn() -> QueryKey + Send + Sync + 'static,
    fetch: impl Fn() -> Fut + 'static,
) -> QueryResult<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let client = use_query_client();
    let cache = client.cache;
    let toaster = client.toaster;
    let current = Memo::new(move |_| key());

    Effect::new(move |_| {
        let key = current.get();
        if !cache.with(|c| c.needs_fetch(&key)) {
            return;
        }
        let Some(ticket) = cache.try_update(|c| c.begin_fetch(&key)).and_then(FetchDecision::into_ticket) else {
            return;
        };
        log::debug!("[query] fetching {key}");
        let request = untrack(&fetch);
        spawn_local(async move {
            let result = request.await.and_then(|data| serde_json::to_value(&data).map_err(ApiError::from));
            let failure = result.as_ref().err().cloned();
            let applied = cache.try_update(|c| c.resolve(&ticket, result)).unwrap_or(false);
            // A superseded request is dropped silently; its replacement reports
            if let (true, Some(err)) = (applied, failure) {
                log::error!("[query] {} failed: {err}", ticket.key);
                toaster.error(&err);
            }
        });
    });

    QueryResult {
        key: current,
        data: Signal::derive(move || {
            let key = current.get();
            cache.with(|c| c.get::<T>(&key))
        }),
        is_loading: Signal::derive(move || {
            let key = current.get();
            cache.with(|c| c.is_loading(&key))
        }),
        error: Signal::derive(move || {
            let key = current.get();
            cache.with(|c| c.error(&key).cloned())
        }),
    }
}
