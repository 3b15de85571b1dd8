//! OpenComp Domain Primitives
//!
//! Value objects shared by the engine and its callers. Entities (controls,
//! policies, evidence) live with the engine because only it interprets them.

pub mod value_objects;

pub use value_objects::*;
