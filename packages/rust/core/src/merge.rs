//! Outcome partitioning and deterministic payload merging.
//!
//! The pool hands back outcomes in completion order; this module
//! restores source-list order, joins the successful payloads, and
//! derives the run summary. Merging the same outcome set in any arrival
//! order yields a byte-identical payload.

use tracing::debug;

use listforge_fetch::FetchOutcome;
use listforge_shared::{ListforgeError, Result, RunSummary};

/// Merged payload plus the statistics derived alongside it.
#[derive(Debug)]
pub struct Aggregate {
    /// Successful contents joined with a single `\n` between pairs.
    pub payload: Vec<u8>,
    /// Counts and the ordered list of failed URLs.
    pub summary: RunSummary,
}

/// Partition outcomes and merge the successes in source-list order.
///
/// Fails with [`ListforgeError::AllSourcesFailed`] when a non-empty run
/// produced no successful download — there is no meaningful artifact to
/// emit. An empty run merges to an empty payload; whether that is an
/// error is the caller's call.
pub fn aggregate(urls: &[String], outcomes: Vec<FetchOutcome>) -> Result<Aggregate> {
    let total = urls.len();

    let mut successes: Vec<(usize, Vec<u8>)> = Vec::new();
    let mut failures: Vec<(usize, String)> = Vec::new();

    for outcome in outcomes {
        match outcome.result {
            Ok(content) => successes.push((outcome.index, content)),
            Err(_) => failures.push((outcome.index, outcome.url)),
        }
    }

    // Completion order is arbitrary; original input position is the
    // only ordering that matters.
    successes.sort_by_key(|(index, _)| *index);
    failures.sort_by_key(|(index, _)| *index);

    let summary = RunSummary {
        total,
        success: successes.len(),
        failed: failures.into_iter().map(|(_, url)| url).collect(),
    };

    if summary.is_total_failure() {
        return Err(ListforgeError::AllSourcesFailed { total });
    }

    let payload = join_payloads(successes.iter().map(|(_, content)| content.as_slice()));

    debug!(
        total,
        success = summary.success,
        failed = summary.failed_count(),
        payload_bytes = payload.len(),
        "merged downloaded sources"
    );

    Ok(Aggregate { payload, summary })
}

/// Concatenate payloads with a single newline between each pair —
/// none before the first or after the last.
fn join_payloads<'a>(parts: impl Iterator<Item = &'a [u8]>) -> Vec<u8> {
    let mut payload = Vec::new();
    for (i, part) in parts.enumerate() {
        if i > 0 {
            payload.push(b'\n');
        }
        payload.extend_from_slice(part);
    }
    payload
}
