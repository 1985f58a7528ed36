//! Test builders — ergonomic constructors for `RawEntry` values and configs.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use crate::common::fixtures::{BASE_DN, HOST};
use dirsearch_core::{Config, RawEntry};

// ---------------------------------------------------------------------------
// EntryBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for person-shaped [`RawEntry`] fixtures.
///
/// # Example
///
/// ```rust
/// let entry = EntryBuilder::new("jdoe")
///     .sn("Doe")
///     .given_name("Jane")
///     .mail(["jane@example.com", "jd@example.com"])
///     .build();
/// ```
pub struct EntryBuilder {
    entry: RawEntry,
}

impl EntryBuilder {
    /// Entry `uid=<uid>,ou=people,...` carrying its `uid` attribute.
    pub fn new(uid: &str) -> Self {
        Self {
            entry: RawEntry::new(format!("uid={uid},{BASE_DN}")).with("uid", [uid]),
        }
    }

    pub fn attr<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry.push(name, values);
        self
    }

    pub fn sn(self, surname: &str) -> Self {
        self.attr("sn", [surname])
    }

    pub fn given_name(self, name: &str) -> Self {
        self.attr("givenName", [name])
    }

    pub fn cn(self, name: &str) -> Self {
        self.attr("cn", [name])
    }

    pub fn mail<I, S>(self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attr("mail", addresses)
    }

    pub fn build(self) -> RawEntry {
        self.entry
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Entry with just a uid and surname.
pub fn person_entry(uid: &str, surname: &str) -> RawEntry {
    EntryBuilder::new(uid).sn(surname).build()
}

/// Entry that will be dropped by the surname filter.
pub fn nameless_entry(uid: &str) -> RawEntry {
    EntryBuilder::new(uid).cn(uid).build()
}

/// Defaults plus host and search base, i.e. a config that validates.
pub fn test_config() -> Config {
    let mut config = Config::defaults();
    config.directory.host = HOST.to_string();
    config.directory.search_base = BASE_DN.to_string();
    config
}
