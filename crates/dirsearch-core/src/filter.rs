//! Filter compiler — renders a [`QueryExpression`] into the directory
//! server's parenthesized prefix filter grammar.
//!
//! | Expression          | Rendered                         |
//! |---------------------|----------------------------------|
//! | absent, `And([])`, `Or([])` | `(objectClass=*)`        |
//! | `And([a, b])`       | `(&AB)`                          |
//! | `Or([a, b])`        | `(\|AB)`                         |
//! | `Not(a)`            | `(!A)`                           |
//! | `Equals(f, v)`      | `(attr=v)` per alias of `f`      |
//! | `Contains(f, v)`    | `(attr=*v*)` per alias of `f`    |
//!
//! A field aliasing several attributes expands into a disjunction with one
//! clause per alias. A single alias is emitted bare. A field name the
//! registry does not know is used verbatim as the attribute name.
//!
//! Compilation is purely structural: nothing is simplified, reordered or
//! deduplicated.

use crate::error::{Error, Result};
use crate::schema::SchemaRegistry;
use serde::{Deserialize, Serialize};

/// Filter matching every entry.
pub const MATCH_ANY: &str = "(objectClass=*)";

// ---------------------------------------------------------------------------
// Expression tree
// ---------------------------------------------------------------------------

/// A composable query over [`Person`](crate::Person) fields.
///
/// Serialized externally tagged, e.g.
/// `{"or":[{"equals":{"field":"lastName","value":"Smith"}}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryExpression {
    And(Vec<QueryExpression>),
    Or(Vec<QueryExpression>),
    Not(Box<QueryExpression>),
    Equals { field: String, value: String },
    Contains { field: String, value: String },
}

impl QueryExpression {
    pub fn and(children: impl IntoIterator<Item = QueryExpression>) -> Self {
        Self::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = QueryExpression>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: QueryExpression) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Parse an expression from its JSON form.
    ///
    /// Anything that is not a recognised expression, including variants
    /// introduced by newer producers, fails with
    /// [`Error::UnsupportedFilter`].
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::UnsupportedFilter(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Compiler
// ---------------------------------------------------------------------------

/// How values are embedded into clauses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueEscaping {
    /// Values are inserted as given. Callers must keep grammar
    /// metacharacters (`*`, `(`, `)`, `\`) out of them.
    #[default]
    Verbatim,
    /// Metacharacters are replaced by `\XX` hex escapes (RFC 4515), so a
    /// value always matches literally.
    Rfc4515,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler<'a> {
    registry: &'a SchemaRegistry,
    escaping: ValueEscaping,
}

impl<'a> FilterCompiler<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            escaping: ValueEscaping::default(),
        }
    }

    pub fn with_escaping(mut self, escaping: ValueEscaping) -> Self {
        self.escaping = escaping;
        self
    }

    /// Compile `expr`; `None` matches everything.
    pub fn compile(&self, expr: Option<&QueryExpression>) -> String {
        let mut out = String::new();
        match expr {
            Some(expr) => self.render(expr, &mut out),
            None => out.push_str(MATCH_ANY),
        }
        tracing::debug!(filter = %out, "filter: compiled");
        out
    }

    fn render(&self, expr: &QueryExpression, out: &mut String) {
        match expr {
            QueryExpression::And(children) => self.render_group('&', children, out),
            QueryExpression::Or(children) => self.render_group('|', children, out),
            QueryExpression::Not(inner) => {
                out.push_str("(!");
                self.render(inner, out);
                out.push(')');
            }
            QueryExpression::Equals { field, value } => {
                let value = self.escape(value);
                self.render_aliases(field, &value, out);
            }
            QueryExpression::Contains { field, value } => {
                let value = format!("*{}*", self.escape(value));
                self.render_aliases(field, &value, out);
            }
        }
    }

    fn render_group(&self, op: char, children: &[QueryExpression], out: &mut String) {
        if children.is_empty() {
            out.push_str(MATCH_ANY);
            return;
        }
        out.push('(');
        out.push(op);
        for child in children {
            self.render(child, out);
        }
        out.push(')');
    }

    /// One `(attr=value)` clause per alias of `field`, OR-ed when there is
    /// more than one.
    fn render_aliases(&self, field: &str, value: &str, out: &mut String) {
        let attributes = match self.registry.attributes_for_name(field) {
            Some(attrs) if !attrs.is_empty() => attrs,
            _ => {
                push_clause(field, value, out);
                return;
            }
        };
        if let [only] = attributes {
            push_clause(only, value, out);
            return;
        }
        out.push_str("(|");
        for attribute in attributes {
            push_clause(attribute, value, out);
        }
        out.push(')');
    }

    fn escape(&self, value: &str) -> String {
        match self.escaping {
            ValueEscaping::Verbatim => value.to_string(),
            ValueEscaping::Rfc4515 => escape_value(value),
        }
    }
}

fn push_clause(attribute: &str, value: &str, out: &mut String) {
    out.push('(');
    out.push_str(attribute);
    out.push('=');
    out.push_str(value);
    out.push(')');
}

/// Escape filter metacharacters as `\XX` hex pairs.
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '*' => escaped.push_str("\\2a"),
            '(' => escaped.push_str("\\28"),
            ')' => escaped.push_str("\\29"),
            '\\' => escaped.push_str("\\5c"),
            '\0' => escaped.push_str("\\00"),
            other => escaped.push(other),
        }
    }
    escaped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
