//! Schema registry — bidirectional mapping between [`PersonField`]s and
//! directory attribute names.
//!
//! Each field is declared with a delimiter-separated alias list (comma,
//! space or semicolon). A field may alias several attributes; an attribute
//! resolves to exactly one field. When two declarations claim the same
//! attribute, the later declaration wins the reverse mapping and no error
//! is raised. The forward list of the earlier field is left as declared.
//!
//! Attribute lookups are ASCII case-insensitive because directory servers
//! treat attribute descriptions that way.
//!
//! The registry is built once and then only read, so it is shared between
//! concurrent searches behind an `Arc` without locking.

use crate::error::{Error, Result};
use crate::types::PersonField;
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

/// Default alias declarations for [`Person`](crate::Person) fields.
pub const PERSON_SCHEMA: &[(PersonField, &str)] = &[
    (PersonField::Uid, "uid"),
    (PersonField::FirstName, "givenName"),
    (PersonField::LastName, "sn"),
    (PersonField::FullName, "cn, displayName"),
    (PersonField::Title, "title"),
    (PersonField::Department, "ou; departmentNumber"),
    (PersonField::Organization, "o"),
    (PersonField::EmployeeNumber, "employeeNumber"),
    (PersonField::Email, "mail, rfc822Mailbox, mailAlternateAddress"),
    (PersonField::Phone, "telephoneNumber homePhone"),
    (PersonField::Mobile, "mobile"),
    (PersonField::Address, "postalAddress; street"),
];

/// Split an alias declaration into its attribute tokens.
///
/// Empty tokens are dropped and duplicates collapse onto their first
/// occurrence, so the result is an ordered set.
pub fn parse_aliases(declaration: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in declaration
        .split([',', ' ', ';'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        if !tokens.iter().any(|t| t.eq_ignore_ascii_case(token)) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    by_field: BTreeMap<PersonField, Vec<String>>,
    /// Keyed by lowercased attribute name.
    by_attribute: HashMap<String, PersonField>,
}

impl SchemaRegistry {
    /// Registry for the default [`PERSON_SCHEMA`] declarations.
    pub fn person() -> Self {
        Self::from_declarations(PERSON_SCHEMA.iter().copied())
    }

    /// Build a registry from `(field, alias declaration)` pairs, in order.
    ///
    /// A field declared twice keeps only its last declaration: tokens of the
    /// earlier one no longer resolve to it.
    pub fn from_declarations<'a, I>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (PersonField, &'a str)>,
    {
        let mut registry = Self::default();
        for (field, declaration) in declarations {
            if let Some(stale) = registry.by_field.remove(&field) {
                for token in stale {
                    let key = token.to_ascii_lowercase();
                    if registry.by_attribute.get(&key) == Some(&field) {
                        registry.by_attribute.remove(&key);
                    }
                }
            }
            let tokens = parse_aliases(declaration);
            for token in &tokens {
                if let Some(previous) = registry
                    .by_attribute
                    .insert(token.to_ascii_lowercase(), field)
                {
                    if previous != field {
                        tracing::debug!(
                            attribute = %token,
                            %previous,
                            %field,
                            "schema: attribute re-registered, later field wins"
                        );
                    }
                }
            }
            registry.by_field.insert(field, tokens);
        }
        registry
    }

    /// The default person schema with some declarations replaced.
    ///
    /// `overrides` maps a field's query name to a new alias declaration.
    /// Replaced declarations keep their original position, so collision
    /// precedence follows [`PERSON_SCHEMA`] order. Unknown field names are
    /// a configuration error.
    pub fn person_with_overrides(overrides: &BTreeMap<String, String>) -> Result<Self> {
        let mut declarations: Vec<(PersonField, &str)> = PERSON_SCHEMA.to_vec();
        for (name, declaration) in overrides {
            let field = PersonField::from_name(name)
                .ok_or_else(|| Error::Configuration(format!("schema.{name}")))?;
            if parse_aliases(declaration).is_empty() {
                return Err(Error::Configuration(format!("schema.{name}")));
            }
            for entry in declarations.iter_mut().filter(|(f, _)| *f == field) {
                entry.1 = declaration.as_str();
            }
        }
        Ok(Self::from_declarations(declarations))
    }

    /// Attribute tokens aliased by `field`, in declaration order. Empty if
    /// the field was never declared.
    pub fn attributes_for(&self, field: PersonField) -> &[String] {
        self.by_field.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Attribute tokens for a field given by query name.
    pub fn attributes_for_name(&self, name: &str) -> Option<&[String]> {
        let field = PersonField::from_name(name)?;
        self.by_field.get(&field).map(Vec::as_slice)
    }

    /// The field that owns `attribute`, if any.
    pub fn field_for(&self, attribute: &str) -> Option<PersonField> {
        self.by_attribute
            .get(&attribute.to_ascii_lowercase())
            .copied()
    }

    /// Every registered attribute token, grouped by field in field order.
    /// Used as the attribute selection for searches.
    pub fn attribute_names(&self) -> Vec<String> {
        self.by_field.values().flatten().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
