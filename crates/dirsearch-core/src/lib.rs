//! dirsearch-core — directory lookup core library.
//!
//! Translates between an application-level query model and a directory
//! server's search protocol. The wire protocol itself sits behind the
//! [`DirectoryClient`] trait.
//!
//! # Architecture
//!
//! ```text
//! DirectorySearch ──► FilterCompiler ──► DirectoryClient ──► materialize ──► Vec<Person>
//!                          │                                     │
//!                          └──────────── SchemaRegistry ─────────┘
//! ```
//!
//! The registry is built once and shared read-only. Every search runs on
//! its own tokio task with a client it owns exclusively.

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod materialize;
pub mod schema;
pub mod search;
pub mod types;

pub use client::{ClientFactory, DirectoryClient};
pub use config::Config;
pub use error::{ClientError, Error, Result};
pub use filter::{FilterCompiler, QueryExpression, ValueEscaping, MATCH_ANY};
pub use schema::SchemaRegistry;
pub use search::DirectorySearch;
pub use types::{
    Completion, DerefPolicy, Person, PersonField, RawEntry, Scope, SearchConstraints,
    SearchEvent, SearchRequest,
};
