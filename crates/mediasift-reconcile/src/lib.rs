//! # mediasift-reconcile
//!
//! Builds consensus maps between the format strings three probing tools
//! report for the same track position.
//!
//! - [`TagMap`] -- one observed `(primary, secondary, tertiary)` format
//!   triple and how many tracks shared it.
//! - [`TagMapSet`] -- the per-kind maps, keyed case-insensitively by the
//!   primary tool's format.
//! - [`CrossToolReconciler`] -- walks three [`MediaInfo`](mediasift_core::MediaInfo)
//!   collections in parallel and folds each file into a [`TagMapSet`].

pub mod reconciler;
pub mod tagmap;

pub use reconciler::{CountMismatch, CrossToolReconciler, ReconcileOutcome};
pub use tagmap::{TagMap, TagMapSet, UNDEFINED_FORMAT};
