//! Tier 1 (structure) and tier 2 (content) checks.

pub mod content;
pub mod structural;
