//! OpenComp Common - Shared types for the compliance aggregation engine
//!
//! This crate provides the small vocabulary every other OpenComp crate
//! speaks:
//! - Value objects (`Percentage`)
//! - Error handling (`CompError`, `DomainError`)
//!
//! Nothing in here performs I/O. Value objects validate on construction
//! and are immutable afterwards.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::*;
