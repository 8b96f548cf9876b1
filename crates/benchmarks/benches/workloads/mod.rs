//! # Filter Workloads
//!
//! - `operations` - single and bulk add / contains / delete, shared-prefix keys
//! - `sizing` - parameter selection, encode / decode
//! - `contention` - scoped threads hammering one shared filter

pub mod contention;
pub mod operations;
pub mod sizing;
