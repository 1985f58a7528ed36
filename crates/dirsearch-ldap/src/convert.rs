//! Conversions between `ldap3` values and dirsearch-core types.

use dirsearch_core::{ClientError, Completion, DerefPolicy, RawEntry, Scope};
use ldap3::{DerefAliases, LdapError, SearchEntry};

/// `sizeLimitExceeded` (RFC 4511 §4.1.9).
const RC_SIZE_LIMIT_EXCEEDED: u32 = 4;

/// Map a final LDAP result code to how the search ended.
pub fn classify(rc: u32, text: &str) -> Completion {
    match rc {
        0 => Completion::Complete,
        RC_SIZE_LIMIT_EXCEEDED => Completion::Truncated,
        code => Completion::Failed(ClientError::Rejected {
            code,
            message: text.to_string(),
        }),
    }
}

/// Convert a search entry into a [`RawEntry`].
///
/// `ldap3` hands attributes over in a hash map, so they are sorted by name,
/// ignoring ASCII case as attribute names do, to keep materialization
/// deterministic. Values keep server order. Binary attributes have no
/// string form and are dropped.
pub fn raw_entry(entry: SearchEntry) -> RawEntry {
    let mut attributes: Vec<(String, Vec<String>)> = entry.attrs.into_iter().collect();
    attributes.sort_by_cached_key(|(name, _)| name.to_ascii_lowercase());
    if !entry.bin_attrs.is_empty() {
        tracing::trace!(
            dn = %entry.dn,
            count = entry.bin_attrs.len(),
            "ldap: binary attributes skipped"
        );
    }
    RawEntry {
        dn: entry.dn,
        attributes,
    }
}

pub(crate) fn completion_for_error(err: LdapError) -> Completion {
    match err {
        LdapError::LdapResult { result } => classify(result.rc, &result.text),
        other => ClientError::Protocol(other.to_string()).into(),
    }
}

pub(crate) fn client_error(err: LdapError) -> ClientError {
    match err {
        LdapError::LdapResult { result } => ClientError::Rejected {
            code: result.rc,
            message: result.text,
        },
        other => ClientError::Protocol(other.to_string()),
    }
}

pub(crate) fn deref_aliases(policy: DerefPolicy) -> DerefAliases {
    match policy {
        DerefPolicy::Never => DerefAliases::Never,
        DerefPolicy::InSearching => DerefAliases::Searching,
        DerefPolicy::FindingBase => DerefAliases::Finding,
        DerefPolicy::Always => DerefAliases::Always,
    }
}

pub(crate) fn scope(scope: Scope) -> ldap3::Scope {
    match scope {
        Scope::Base => ldap3::Scope::Base,
        Scope::OneLevel => ldap3::Scope::OneLevel,
        Scope::Subtree => ldap3::Scope::Subtree,
    }
}

/// `ldap://host:port`, bracketing IPv6 literals.
pub(crate) fn ldap_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("ldap://[{host}]:{port}")
    } else {
        format!("ldap://{host}:{port}")
    }
}

/// Protocol limits are signed 32-bit; zero keeps its "unlimited" meaning.
pub(crate) fn clamp_limit(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
