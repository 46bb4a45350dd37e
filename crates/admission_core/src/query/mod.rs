//! Read-side views joined across admission records.
//!
//! # Responsibility
//! - Shape read models that span several tables.
//! - Stay outside the write path: nothing here mutates or validates.

pub mod exam_results;
