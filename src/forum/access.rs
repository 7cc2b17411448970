//! Forum access resolution.
//!
//! A forum carries a list of access entries, each an opaque identity-matching
//! token: a two-character cohort prefix or an eight-character member id. Given
//! those entries and a requesting identity, [`resolve_access`] decides whether
//! the requester may open the forum.
//!
//! The decision rules, in order:
//!
//! 1. A forum with no entries is open to everyone, regardless of the stored
//!    access mode flag.
//! 2. Anonymous-tier requesters (role `"a"`) are denied whenever an entry
//!    list is present, with no creator or entry override.
//! 3. SE requesters (role `"se"`) are admitted when their id starts with any
//!    prefix entry, equals any exact entry, or equals the forum creator's id.
//!
//! Rule 2 is intentionally asymmetric with rule 3: the creator exception does
//! not apply to the anonymous role. Malformed entries never match and never
//! cause an error; their length is neither 2 nor 8, or the comparison simply
//! fails.

use serde::{Deserialize, Serialize};

use crate::validation::{EXACT_ENTRY_LEN, PREFIX_ENTRY_LEN};

/// Requester role tag, mirroring the backend's two user classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// SE user, identified by `sid`.
    #[serde(rename = "se")]
    Se,
    /// Anonymous user, identified by `aid`.
    #[serde(rename = "a")]
    Anonymous,
}

impl Role {
    /// Wire tag used in request payloads and the config file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Se => "se",
            Role::Anonymous => "a",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "se" => Ok(Role::Se),
            "a" => Ok(Role::Anonymous),
            other => Err(format!("unknown role '{}', expected \"se\" or \"a\"", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity/role pair evaluated against a forum's access entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    /// `sid` for SE users, `aid` for anonymous users.
    pub id: String,
    pub role: Role,
}

impl Requester {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Requester { id: id.into(), role }
    }

    /// SE requester (`sid` identity).
    pub fn se(id: impl Into<String>) -> Self {
        Requester::new(id, Role::Se)
    }

    /// Anonymous requester (`aid` identity).
    pub fn anonymous(id: impl Into<String>) -> Self {
        Requester::new(id, Role::Anonymous)
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }
}

/// Decide whether `requester` may open a forum.
///
/// `creator_id` is the forum creator's `sid`; `entries` are the access entry
/// strings scoped to this forum (see
/// [`entries_for_forum`](crate::models::entries_for_forum) for extracting them
/// from a page response). Pure and total: malformed entries are skipped by the
/// length split and never produce an error.
pub fn resolve_access(creator_id: &str, entries: &[&str], requester: &Requester) -> AccessDecision {
    if entries.is_empty() {
        return AccessDecision::Allowed;
    }

    if requester.role == Role::Anonymous {
        return AccessDecision::Denied;
    }

    let prefix_match = entries
        .iter()
        .filter(|e| e.len() == PREFIX_ENTRY_LEN)
        .any(|e| requester.id.starts_with(*e));
    let exact_match = entries
        .iter()
        .filter(|e| e.len() == EXACT_ENTRY_LEN)
        .any(|e| requester.id == **e);

    if prefix_match || exact_match || requester.id == creator_id {
        AccessDecision::Allowed
    } else {
        AccessDecision::Denied
    }
}
