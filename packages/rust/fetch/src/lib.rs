//! Concurrent source downloading for listforge.
//!
//! This crate owns the fetch pipeline: a shared HTTP client, a
//! per-source fetcher with a typed failure taxonomy, and a bounded
//! worker pool that produces exactly one [`FetchOutcome`] per submitted
//! URL. Merging and reporting live downstream in `listforge-core`.

pub mod fetcher;
pub mod pool;

pub use fetcher::{FetchError, FetchOutcome, build_client, fetch_source};
pub use pool::{fetch_all, fetch_all_with};
