//! Bounded download pool: fan out over a fixed number of workers,
//! fan in exactly one outcome per submitted URL.
//!
//! Workers pull from a shared pending queue with no priority; the
//! outcome channel is pre-sized to the input length so a send never
//! blocks a worker behind a slow collector. The pool makes no ordering
//! promise — each outcome carries its original index and the merge
//! layer reorders downstream.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::fetcher::{FetchOutcome, fetch_source};

/// Download every URL with at most `concurrency` requests in flight.
///
/// Returns exactly `urls.len()` outcomes, in completion order. A failed
/// download never aborts or delays the others; the pool is single-use
/// and returns only after every worker has exited.
pub async fn fetch_all(client: &Client, urls: &[String], concurrency: usize) -> Vec<FetchOutcome> {
    fetch_all_with(client, urls, concurrency, |_, _, _| {}).await
}

/// Like [`fetch_all`], invoking `on_outcome(outcome, collected, total)`
/// as each outcome arrives. Used by the CLI for per-source progress.
pub async fn fetch_all_with<F>(
    client: &Client,
    urls: &[String],
    concurrency: usize,
    mut on_outcome: F,
) -> Vec<FetchOutcome>
where
    F: FnMut(&FetchOutcome, usize, usize),
{
    let total = urls.len();
    if total == 0 {
        return Vec::new();
    }

    // Excess capacity is harmless; just never spawn more workers than
    // there is work to hand out.
    let workers = concurrency.clamp(1, total);

    let queue: VecDeque<(usize, String)> = urls.iter().cloned().enumerate().collect();
    let queue = Arc::new(Mutex::new(queue));
    let (tx, mut rx) = mpsc::channel::<FetchOutcome>(total);

    debug!(total, workers, "starting download pool");

    let mut handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let queue = Arc::clone(&queue);
        let tx = tx.clone();
        let client = client.clone();

        handles.push(tokio::spawn(async move {
            loop {
                let item = queue.lock().expect("pending queue lock poisoned").pop_front();
                let Some((index, url)) = item else {
                    break;
                };

                debug!(worker_id, index, %url, "worker picked up source");
                let result = fetch_source(&client, &url).await;
                let outcome = FetchOutcome { index, url, result };

                // The receiver outlives the workers; a closed channel
                // means the run was dropped wholesale.
                if tx.send(outcome).await.is_err() {
                    break;
                }
            }
        }));
    }
    drop(tx);

    let mut outcomes = Vec::with_capacity(total);
    while let Some(outcome) = rx.recv().await {
        on_outcome(&outcome, outcomes.len() + 1, total);
        outcomes.push(outcome);
    }

    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "download worker panicked");
        }
    }

    debug!(
        collected = outcomes.len(),
        "download pool drained"
    );

    outcomes
}
