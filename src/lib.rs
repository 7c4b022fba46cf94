//! mediasift - cross-tool media track reconciliation and selection
//!
//! This library crate ties the component crates together into a per-file
//! [`analysis::FileAnalysis`] and re-exports them for integration testing.

pub mod analysis;

pub use mediasift_bitrate;
pub use mediasift_core;
pub use mediasift_reconcile;
pub use mediasift_select;
