//! Infrastructure layer
//!
//! Network and external process implementations of the seams the core
//! build unit depends on.

pub mod fetch;
pub mod toolchain;
