//! # mediasift-select
//!
//! Track selection for one tool's view of a media file.
//!
//! ## Overview
//!
//! - [`LanguageMatcher`] -- IETF tag prefix matching over a pluggable
//!   [`TagHierarchy`].
//! - [`Condition`] -- leaf predicates over a single [`Track`](mediasift_core::Track).
//! - [`Expr`] -- boolean rule trees combining conditions with AND/OR/NOT.
//! - [`TrackPartitioner`] -- keeps every track in exactly one of the
//!   selected / not-selected partitions while they are classified and moved.

pub mod condition;
pub mod expr;
pub mod language;
pub mod partition;

pub use condition::Condition;
pub use expr::Expr;
pub use language::{LanguageMatcher, SubtagHierarchy, TagHierarchy};
pub use partition::TrackPartitioner;
