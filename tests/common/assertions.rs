//! Domain-specific assertion macros for dirsearch harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that say which
//! expression or result set broke the expectation.

/// Assert that compiling an expression against a registry yields `expected`.
///
/// ```rust
/// assert_filter!(&registry, QueryExpression::equals("lastName", "x"), "(sn=x)");
/// ```
#[macro_export]
macro_rules! assert_filter {
    ($registry:expr, $expr:expr, $expected:expr) => {{
        let registry: &dirsearch_core::SchemaRegistry = $registry;
        let expr: dirsearch_core::QueryExpression = $expr;
        let actual = dirsearch_core::FilterCompiler::new(registry).compile(Some(&expr));
        pretty_assertions::assert_eq!(
            actual,
            $expected,
            "assert_filter! failed for expression {:?}",
            expr
        );
    }};
}

/// Assert the DNs of a result list, in order.
///
/// ```rust
/// assert_dns!(people, ["uid=a,...", dn("b")]);
/// ```
#[macro_export]
macro_rules! assert_dns {
    ($people:expr, [$($dn:expr),* $(,)?]) => {{
        let actual: Vec<String> = $people.iter().map(|p| p.dn.clone()).collect();
        let expected: Vec<String> = vec![$($dn.to_string()),*];
        pretty_assertions::assert_eq!(actual, expected, "assert_dns! failed: result order or membership differs");
    }};
}
