//! Series utilities shared by connectors and the orchestrator.
//!
//! Modules include:
//! - `anchor`: pick the overlap anchor of a freshly fetched segment
//! - `scale`: rescale an older segment against a newer one and fold a chain of segments
//! - `aggregate`: average a fine-grained series into weekly or monthly buckets
//! - `normalize`: rescale a series so its global maximum is exactly 100
/// Bucket averaging to a coarser granularity.
pub mod aggregate;
/// Overlap anchor selection.
pub mod anchor;
/// Final 0..=100 normalization.
pub mod normalize;
/// Pairwise overlap scaling and chain folding.
pub mod scale;
