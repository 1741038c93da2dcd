//! CLI command implementations.

pub mod blend;
pub mod common;
pub mod layer;
pub mod run;
