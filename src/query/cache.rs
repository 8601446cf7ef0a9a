//! Cache bookkeeping, free of any reactive runtime.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::TEMP_ID_PREFIX;

/// Ordered key segments, e.g. `["patients", "ada", "0", "10"]`
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CacheEntry {
    pub data: Option<Value>,
    pub status: QueryStatus,
    pub error: Option<ApiError>,
    /// Bumped by every invalidation
    pub generation: u64,
    stale: bool,
    in_flight: Option<u64>,
}

impl CacheEntry {
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// Proof that the holder started the current request for `key`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: QueryKey,
    id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchDecision {
    /// Caller must run the request and resolve the ticket
    Start(FetchTicket),
    /// Another caller's request for this key is in flight
    Shared,
    /// Cached data is current
    Fresh,
}

impl FetchDecision {
    pub fn into_ticket(self) -> Option<FetchTicket> {
        match self {
            FetchDecision::Start(ticket) => Some(ticket),
            _ => None,
        }
    }
}

/// Handle for an optimistic list insert
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptimisticInsert {
    pub key: QueryKey,
    pub temp_id: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryCache {
    entries: BTreeMap<QueryKey, CacheEntry>,
    next_ticket: u64,
    next_temp: u64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, key: &QueryKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        self.entry(key).map(|e| e.status).unwrap_or_default()
    }

    pub fn error(&self, key: &QueryKey) -> Option<&ApiError> {
        self.entry(key).and_then(|e| e.error.as_ref())
    }

    pub fn generation(&self, key: &QueryKey) -> u64 {
        self.entry(key).map(|e| e.generation).unwrap_or_default()
    }

    /// True while no data has arrived yet or a refetch is running
    pub fn is_loading(&self, key: &QueryKey) -> bool {
        self.entry(key).map_or(true, |e| matches!(e.status, QueryStatus::Loading | QueryStatus::Idle))
    }

    /// Whether a view showing `key` should start a request.
    ///
    /// Failed entries stay failed until invalidated; nothing retries on its own.
    pub fn needs_fetch(&self, key: &QueryKey) -> bool {
        match self.entry(key) {
            None => true,
            Some(e) if e.is_fetching() => false,
            Some(e) => e.stale || e.status == QueryStatus::Idle,
        }
    }

    pub fn begin_fetch(&mut self, key: &QueryKey) -> FetchDecision {
        let needs = self.needs_fetch(key);
        let entry = self.entries.entry(key.clone()).or_default();
        if entry.is_fetching() {
            return FetchDecision::Shared;
        }
        if !needs {
            return FetchDecision::Fresh;
        }
        self.next_ticket += 1;
        entry.in_flight = Some(self.next_ticket);
        entry.status = QueryStatus::Loading;
        FetchDecision::Start(FetchTicket { key: key.clone(), id: self.next_ticket })
    }

    /// Store a request result. Returns false when the ticket was superseded
    /// (the key was invalidated meanwhile) and the result was dropped.
    pub fn resolve(&mut self, ticket: &FetchTicket, result: Result<Value, ApiError>) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return false;
        };
        if entry.in_flight != Some(ticket.id) {
            log::debug!("[query] dropping superseded result for {}", ticket.key);
            return false;
        }
        entry.in_flight = None;
        entry.stale = false;
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.status = QueryStatus::Success;
                entry.error = None;
            }
            Err(err) => {
                entry.status = QueryStatus::Error;
                entry.error = Some(err);
            }
        }
        true
    }

    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let data = self.entry(key)?.data.clone()?;
        serde_json::from_value(data)
            .inspect_err(|err| log::error!("[query] cached data for {key} does not decode: {err}"))
            .ok()
    }

    pub fn set_data(&mut self, key: &QueryKey, data: Value) {
        let entry = self.entries.entry(key.clone()).or_default();
        entry.data = Some(data);
        entry.status = QueryStatus::Success;
        entry.error = None;
    }

    /// Mark every entry under `prefix` stale and cancel its in-flight request.
    /// Returns how many entries were touched.
    pub fn invalidate(&mut self, prefix: &QueryKey) -> usize {
        let mut count = 0;
        for (key, entry) in self.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                entry.in_flight = None;
                entry.generation += 1;
                count += 1;
            }
        }
        log::debug!("[query] invalidated {count} entries under {prefix}");
        count
    }

    /// Prepend `record` to the list cached under `key` with a temporary id.
    ///
    /// Works on plain arrays and on paginated objects (`items` and
    /// `total_count`). Returns `None` when the cached data is not a list.
    pub fn optimistic_insert(&mut self, key: &QueryKey, mut record: Value) -> Option<OptimisticInsert> {
        self.next_temp += 1;
        let temp_id = format!("{TEMP_ID_PREFIX}{}", self.next_temp);
        if let Value::Object(fields) = &mut record {
            fields.insert("id".into(), Value::String(temp_id.clone()));
        }

        let entry = self.entries.entry(key.clone()).or_default();
        let data = entry.data.get_or_insert_with(|| Value::Array(Vec::new()));
        let list = list_mut(data)?;
        list.insert(0, record);
        adjust_total(data, 1);
        if entry.status == QueryStatus::Idle {
            entry.status = QueryStatus::Success;
        }
        Some(OptimisticInsert { key: key.clone(), temp_id })
    }

    /// Remove exactly the temporary record of `insert`
    pub fn rollback_insert(&mut self, insert: &OptimisticInsert) -> bool {
        let Some(data) = self.entries.get_mut(&insert.key).and_then(|e| e.data.as_mut()) else {
            return false;
        };
        let Some(list) = list_mut(data) else {
            return false;
        };
        let before = list.len();
        list.retain(|item| !has_id(item, &insert.temp_id));
        let removed = before != list.len();
        if removed {
            adjust_total(data, -1);
        }
        removed
    }

    /// Swap the temporary record for the one the backend returned.
    ///
    /// When the placeholder is gone (a refetch replaced the list while the
    /// create was in flight) the entry is staled instead, so the list is
    /// reloaded and the new record shows up. Returns whether the swap happened.
    pub fn commit_insert(&mut self, insert: &OptimisticInsert, record: Value) -> bool {
        let slot = self
            .entries
            .get_mut(&insert.key)
            .and_then(|e| e.data.as_mut())
            .and_then(list_mut)
            .and_then(|list| list.iter_mut().find(|item| has_id(item, &insert.temp_id)));
        match slot {
            Some(slot) => {
                *slot = record;
                true
            }
            None => {
                log::debug!("[query] {} gone from {}, refetching", insert.temp_id, insert.key);
                self.invalidate(&insert.key);
                false
            }
        }
    }
}

fn has_id(item: &Value, id: &str) -> bool {
    item.get("id").and_then(Value::as_str) == Some(id)
}

fn list_mut(data: &mut Value) -> Option<&mut Vec<Value>> {
    match data {
        Value::Array(list) => Some(list),
        Value::Object(fields) => fields.get_mut("items").and_then(Value::as_array_mut),
        _ => None,
    }
}

fn adjust_total(data: &mut Value, delta: i64) {
    if let Some(total) = data.get_mut("total_count") {
        let current = total.as_i64().unwrap_or_default();
        *total = Value::from((current + delta).max(0));
    }
}
