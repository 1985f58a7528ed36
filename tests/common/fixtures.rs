//! Static directory data used across harnesses.

use crate::common::builders::EntryBuilder;
use dirsearch_core::RawEntry;

pub const HOST: &str = "ldap.test.invalid";
pub const BASE_DN: &str = "ou=people,dc=example,dc=com";

/// A small directory: three people with surnames and one service account
/// without one, in that server order.
pub fn sample_directory() -> Vec<RawEntry> {
    vec![
        EntryBuilder::new("jsmith")
            .sn("Smith")
            .given_name("John")
            .cn("John Smith")
            .mail(["john.smith@example.com"])
            .attr("telephoneNumber", ["+1 555 0100"])
            .build(),
        EntryBuilder::new("mjones")
            .sn("Jones")
            .given_name("Mary")
            .mail(["mary.jones@example.com"])
            .attr("rfc822Mailbox", ["mj@example.com"])
            .attr("objectClass", ["top", "inetOrgPerson"])
            .build(),
        EntryBuilder::new("svc-backup")
            .cn("Backup Service")
            .build(),
        EntryBuilder::new("abrown")
            .sn("Brown")
            .attr("mobile", ["+1 555 0199", "+1 555 0198"])
            .build(),
    ]
}
