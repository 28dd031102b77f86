//! Core types and trait definitions for DevAccountBook.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod entry;
pub mod error;
pub mod explore;
pub mod graph;
pub mod sheet;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod testgraph;
