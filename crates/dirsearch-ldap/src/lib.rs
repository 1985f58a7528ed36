//! dirsearch-ldap — `ldap3`-backed [`DirectoryClient`] for dirsearch.
//!
//! Opens an anonymous `ldap://host:port` session per search, streams the
//! result entries through a paged-results adapter and classifies the final
//! result code: `success` is a complete search, `sizeLimitExceeded` a
//! truncated one, anything else a failure.
//!
//! [`DirectoryClient`]: dirsearch_core::DirectoryClient

mod client;
mod convert;

pub use client::{LdapClient, LdapClientFactory};
pub use convert::{classify, raw_entry};
