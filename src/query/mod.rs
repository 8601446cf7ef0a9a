//! Query Cache
//!
//! Request results keyed by resource and filter parameters, shared by every
//! view that asks for the same key.

mod cache;
mod client;

pub use cache::{CacheEntry, FetchDecision, FetchTicket, OptimisticInsert, QueryCache, QueryKey, QueryStatus};
pub use client::{provide_query_client, use_query, use_query_client, QueryClient, QueryResult};
