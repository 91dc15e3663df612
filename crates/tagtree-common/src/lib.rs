//! Common utilities for tagtree.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Warning System** - deduplicated `tracing` warnings for lenient input handling
//! - **Network** - document retrieval for callers that start from a URI

pub mod net;
pub mod warning;
