//! Shared test utilities for dirsearch integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Nothing here touches the network: searches run against
//! [`FakeDirectory`], an in-memory client that records what it was asked.

pub mod assertions;
pub mod builders;
pub mod fake_directory;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fake_directory::*;
pub use fixtures::*;
