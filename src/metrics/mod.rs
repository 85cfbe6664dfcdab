//! Water-access metrics.
//!
//! This module turns loaded rows into typed village records, derives each
//! village's access percentage and tier, and rolls the records up into
//! per-district summaries.

pub mod access;
pub mod aggregate;
pub mod transform;
pub mod types;
pub mod utility;
