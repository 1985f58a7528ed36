//! Core types for dirsearch-core.
//!
//! This module defines the data structures shared across the pipeline: the
//! materialized [`Person`], the [`PersonField`] discriminant the schema
//! registry maps attribute names onto, the loosely-typed [`RawEntry`] a
//! directory client delivers, and the per-call [`SearchConstraints`].

use serde::Serialize;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

/// A person record reconstructed from a directory entry.
///
/// Scalar fields keep the last value seen for any of their attribute
/// aliases; list fields accumulate every value in the order it arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Distinguished name of the entry this person was built from.
    pub dn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Surname. A person without one is never returned from a search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_number: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mobiles: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
}

impl Person {
    /// Create an empty person for the entry with the given DN.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            ..Self::default()
        }
    }

    /// True when the mandatory surname is present and non-empty.
    pub fn has_surname(&self) -> bool {
        self.last_name.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Apply the values of one attribute to `field`.
    ///
    /// List fields get every value appended; scalar fields take the last
    /// value and overwrite whatever an earlier attribute put there.
    pub fn apply(&mut self, field: PersonField, values: &[String]) {
        match self.slot(field) {
            Slot::Scalar(slot) => {
                if let Some(last) = values.last() {
                    *slot = Some(last.clone());
                }
            }
            Slot::List(list) => list.extend(values.iter().cloned()),
        }
    }

    /// Current values of `field`, scalar or list, in stored order.
    pub fn values(&self, field: PersonField) -> Vec<&str> {
        let scalar = match field {
            PersonField::Uid => &self.uid,
            PersonField::FirstName => &self.first_name,
            PersonField::LastName => &self.last_name,
            PersonField::FullName => &self.full_name,
            PersonField::Title => &self.title,
            PersonField::Department => &self.department,
            PersonField::Organization => &self.organization,
            PersonField::EmployeeNumber => &self.employee_number,
            PersonField::Email => return self.emails.iter().map(String::as_str).collect(),
            PersonField::Phone => return self.phones.iter().map(String::as_str).collect(),
            PersonField::Mobile => return self.mobiles.iter().map(String::as_str).collect(),
            PersonField::Address => return self.addresses.iter().map(String::as_str).collect(),
        };
        scalar.as_deref().into_iter().collect()
    }

    fn slot(&mut self, field: PersonField) -> Slot<'_> {
        match field {
            PersonField::Uid => Slot::Scalar(&mut self.uid),
            PersonField::FirstName => Slot::Scalar(&mut self.first_name),
            PersonField::LastName => Slot::Scalar(&mut self.last_name),
            PersonField::FullName => Slot::Scalar(&mut self.full_name),
            PersonField::Title => Slot::Scalar(&mut self.title),
            PersonField::Department => Slot::Scalar(&mut self.department),
            PersonField::Organization => Slot::Scalar(&mut self.organization),
            PersonField::EmployeeNumber => Slot::Scalar(&mut self.employee_number),
            PersonField::Email => Slot::List(&mut self.emails),
            PersonField::Phone => Slot::List(&mut self.phones),
            PersonField::Mobile => Slot::List(&mut self.mobiles),
            PersonField::Address => Slot::List(&mut self.addresses),
        }
    }
}

enum Slot<'a> {
    Scalar(&'a mut Option<String>),
    List(&'a mut Vec<String>),
}

// ---------------------------------------------------------------------------
// PersonField
// ---------------------------------------------------------------------------

/// Every writable field of a [`Person`], addressable by its query name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PersonField {
    Uid,
    FirstName,
    LastName,
    FullName,
    Title,
    Department,
    Organization,
    EmployeeNumber,
    Email,
    Phone,
    Mobile,
    Address,
}

impl PersonField {
    pub const ALL: [PersonField; 12] = [
        PersonField::Uid,
        PersonField::FirstName,
        PersonField::LastName,
        PersonField::FullName,
        PersonField::Title,
        PersonField::Department,
        PersonField::Organization,
        PersonField::EmployeeNumber,
        PersonField::Email,
        PersonField::Phone,
        PersonField::Mobile,
        PersonField::Address,
    ];

    /// Name used for this field in query expressions and configuration.
    pub fn name(self) -> &'static str {
        match self {
            PersonField::Uid => "uid",
            PersonField::FirstName => "firstName",
            PersonField::LastName => "lastName",
            PersonField::FullName => "fullName",
            PersonField::Title => "title",
            PersonField::Department => "department",
            PersonField::Organization => "organization",
            PersonField::EmployeeNumber => "employeeNumber",
            PersonField::Email => "email",
            PersonField::Phone => "phone",
            PersonField::Mobile => "mobile",
            PersonField::Address => "address",
        }
    }

    /// Look a field up by its query name (exact match).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl std::fmt::Display for PersonField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// RawEntry
// ---------------------------------------------------------------------------

/// One entry as delivered by a directory client: a DN plus an ordered
/// multimap of attribute name to raw string values.
///
/// The same attribute name may appear more than once; consumers see the
/// pairs in the order they were pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub dn: String,
    pub attributes: Vec<(String, Vec<String>)>,
}

impl RawEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute with its values, builder style.
    pub fn with<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(name, values);
        self
    }

    pub fn push<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .push((name.into(), values.into_iter().map(Into::into).collect()));
    }
}

// ---------------------------------------------------------------------------
// Search constraints and outcome
// ---------------------------------------------------------------------------

/// Alias dereferencing policy passed through to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerefPolicy {
    Never,
    InSearching,
    FindingBase,
    Always,
}

/// Search scope relative to the base DN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Base,
    OneLevel,
    Subtree,
}

/// Server-side limits for a single search call. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConstraints {
    /// Maximum number of entries the server should return; 0 = unlimited.
    pub size_limit: u32,
    /// Server-side time limit; zero = unlimited.
    pub time_limit: Duration,
    pub deref: DerefPolicy,
    /// Page size used when the client pages through results.
    pub batch_size: u32,
}

/// Everything a directory client needs to run one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub base: String,
    pub scope: Scope,
    pub filter: String,
    /// Attribute names to request from the server.
    pub attributes: Vec<String>,
    pub constraints: SearchConstraints,
}

/// How a search stream ended, as decided by the directory client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// All matching entries were delivered.
    Complete,
    /// The server stopped early because more results exist than the size
    /// limit allows. Entries delivered so far are valid.
    Truncated,
    /// The search failed; the reason is carried as reported by the client.
    Failed(crate::error::ClientError),
}

/// One step of a search stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Entry(RawEntry),
    Done(Completion),
}
