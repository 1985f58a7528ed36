//! Command-line query terms.
//!
//! Each term is `field=value` (equality) or `field~value` (substring),
//! optionally prefixed with `!` to negate it. Several terms are AND-ed;
//! no terms at all means "match everything".

use dirsearch_core::QueryExpression;
use regex::Regex;
use std::sync::LazyLock;

static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<neg>!)?(?P<field>[A-Za-z][A-Za-z0-9.-]*)(?P<op>[=~])(?P<value>.*)$")
        .expect("term pattern must compile")
});

/// Parse one term. Returns `Err(message)` describing what is wrong.
pub fn parse_term(input: &str) -> Result<QueryExpression, String> {
    let caps = TERM
        .captures(input.trim())
        .ok_or_else(|| format!("invalid term {input:?}: expected field=value or field~value"))?;

    let field = &caps["field"];
    let value = &caps["value"];
    if value.is_empty() {
        return Err(format!("invalid term {input:?}: empty value"));
    }

    let expr = match &caps["op"] {
        "=" => QueryExpression::equals(field, value),
        _ => QueryExpression::contains(field, value),
    };
    Ok(if caps.name("neg").is_some() {
        QueryExpression::not(expr)
    } else {
        expr
    })
}

/// Combine terms into one expression. A single term is returned as-is.
pub fn parse_terms<S: AsRef<str>>(terms: &[S]) -> Result<Option<QueryExpression>, String> {
    let mut parsed = terms
        .iter()
        .map(|t| parse_term(t.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(match parsed.len() {
        0 => None,
        1 => parsed.pop(),
        _ => Some(QueryExpression::And(parsed)),
    })
}
