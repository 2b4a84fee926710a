//! Aggregation, compilation, and artifact pipeline for listforge.
//!
//! Downstream of `listforge-fetch`: takes raw fetch outcomes, merges
//! them deterministically, runs the external rule compiler, and writes
//! the annotated output artifact plus CI counters.

pub mod artifact;
pub mod compiler;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod sources;

pub use merge::{Aggregate, aggregate};
pub use pipeline::{
    BuildConfig, BuildOutcome, BuildResult, ProgressReporter, SilentProgress, build,
};
