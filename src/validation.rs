//! Access entry validation for forum access lists.
//!
//! Entries come in two shapes, told apart by length: a two-character cohort
//! prefix (admission year, 52–67) and an eight-character member id
//! (`<cohort>` + `01` + four digits). Invalid input is rejected here with the
//! user-facing message and never committed; the resolver downstream only ever
//! sees strings that were accepted by these checks or arrived from the
//! backend as-is.

use thiserror::Error;

/// Inclusive admission-year cohort bounds for access entries.
pub const COHORT_MIN: u32 = 52;
pub const COHORT_MAX: u32 = 67;

/// Length of a cohort-prefix entry.
pub const PREFIX_ENTRY_LEN: usize = 2;
/// Length of an exact member-id entry.
pub const EXACT_ENTRY_LEN: usize = 8;

/// Entry shape, classified by string length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Cohort-wide grant: two digits, 52–67.
    Prefix,
    /// Individual grant: eight characters, `<cohort>01dddd`.
    Exact,
}

/// Validation errors with the exact messages surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("Please enter a number between 52 and 67")]
    InvalidPrefix,

    #[error("Must follow pattern: \"52-67\" + \"01\" + four digits")]
    InvalidExact,

    #[error("Access entry must be 2 or 8 characters long")]
    InvalidLength,
}

/// Classify a raw entry string by length. Returns `None` for lengths that are
/// neither shape.
pub fn classify_entry(raw: &str) -> Option<EntryKind> {
    match raw.len() {
        PREFIX_ENTRY_LEN => Some(EntryKind::Prefix),
        EXACT_ENTRY_LEN => Some(EntryKind::Exact),
        _ => None,
    }
}

/// Validate a cohort-prefix entry: two decimal digits in 52–67.
pub fn validate_prefix_entry(raw: &str) -> Result<&str, EntryError> {
    if raw.len() != PREFIX_ENTRY_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EntryError::InvalidPrefix);
    }
    let value: u32 = raw.parse().map_err(|_| EntryError::InvalidPrefix)?;
    if !(COHORT_MIN..=COHORT_MAX).contains(&value) {
        return Err(EntryError::InvalidPrefix);
    }
    Ok(raw)
}

/// Validate an exact member-id entry: `<cohort 52-67>` + `"01"` + four digits.
pub fn validate_exact_entry(raw: &str) -> Result<&str, EntryError> {
    if raw.len() != EXACT_ENTRY_LEN || !raw.is_ascii() {
        return Err(EntryError::InvalidExact);
    }
    let cohort: u32 = raw[0..2].parse().map_err(|_| EntryError::InvalidExact)?;
    if !(COHORT_MIN..=COHORT_MAX).contains(&cohort) {
        return Err(EntryError::InvalidExact);
    }
    if &raw[2..4] != "01" {
        return Err(EntryError::InvalidExact);
    }
    if !raw[4..8].bytes().all(|b| b.is_ascii_digit()) {
        return Err(EntryError::InvalidExact);
    }
    Ok(raw)
}

/// Validate an entry of either shape, dispatching on length.
pub fn validate_entry(raw: &str) -> Result<EntryKind, EntryError> {
    match classify_entry(raw) {
        Some(EntryKind::Prefix) => validate_prefix_entry(raw).map(|_| EntryKind::Prefix),
        Some(EntryKind::Exact) => validate_exact_entry(raw).map(|_| EntryKind::Exact),
        None => Err(EntryError::InvalidLength),
    }
}

/// Client-side pending access-entry set, held until form submission.
///
/// Entries are appended only after validation. Removal is by value-equality
/// filtering: a single remove clears every instance equal to the value, so
/// duplicate values cannot be removed independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEntries {
    values: Vec<String>,
}

impl PendingEntries {
    pub fn new() -> Self {
        PendingEntries::default()
    }

    /// Validate and append an entry. Invalid input is not committed.
    pub fn add(&mut self, raw: &str) -> Result<EntryKind, EntryError> {
        let kind = validate_entry(raw)?;
        self.values.push(raw.to_string());
        Ok(kind)
    }

    /// Remove every instance equal to `value`.
    pub fn remove(&mut self, value: &str) {
        self.values.retain(|v| v != value);
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether this entry set makes the forum effectively private.
    ///
    /// An empty set behaves as public regardless of the stored mode flag, so
    /// the mode shown and submitted tracks the set's contents.
    pub fn is_private(&self) -> bool {
        !self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_bounds_are_inclusive() {
        assert!(validate_prefix_entry("52").is_ok());
        assert!(validate_prefix_entry("67").is_ok());
        assert_eq!(validate_prefix_entry("51"), Err(EntryError::InvalidPrefix));
        assert_eq!(validate_prefix_entry("68"), Err(EntryError::InvalidPrefix));
    }

    #[test]
    fn prefix_rejects_non_digits() {
        assert_eq!(validate_prefix_entry("5x"), Err(EntryError::InvalidPrefix));
        assert_eq!(validate_prefix_entry("  "), Err(EntryError::InvalidPrefix));
    }

    #[test]
    fn exact_requires_cohort_infix_and_digits() {
        assert!(validate_exact_entry("66012345").is_ok());
        assert!(validate_exact_entry("52010000").is_ok());

        // Cohort out of range
        assert_eq!(validate_exact_entry("51012345"), Err(EntryError::InvalidExact));
        // Infix must be literally "01"
        assert_eq!(validate_exact_entry("66022345"), Err(EntryError::InvalidExact));
        // Tail must be all digits
        assert_eq!(validate_exact_entry("660123x5"), Err(EntryError::InvalidExact));
        // Wrong length
        assert_eq!(validate_exact_entry("6601234"), Err(EntryError::InvalidExact));
    }

    #[test]
    fn validate_entry_dispatches_on_length() {
        assert_eq!(validate_entry("60"), Ok(EntryKind::Prefix));
        assert_eq!(validate_entry("60012345"), Ok(EntryKind::Exact));
        assert_eq!(validate_entry("601"), Err(EntryError::InvalidLength));
        assert_eq!(validate_entry(""), Err(EntryError::InvalidLength));
    }

    #[test]
    fn error_messages_match_the_form_text() {
        assert_eq!(
            EntryError::InvalidPrefix.to_string(),
            "Please enter a number between 52 and 67"
        );
        assert_eq!(
            EntryError::InvalidExact.to_string(),
            "Must follow pattern: \"52-67\" + \"01\" + four digits"
        );
    }

    #[test]
    fn pending_entries_round_trip() {
        let mut pending = PendingEntries::new();
        assert!(!pending.is_private());

        pending.add("60").unwrap();
        assert!(pending.is_private());
        assert_eq!(pending.values(), &["60".to_string()]);

        pending.remove("60");
        assert!(pending.is_empty());
        assert!(!pending.is_private());
    }

    #[test]
    fn pending_entries_reject_invalid_without_commit() {
        let mut pending = PendingEntries::new();
        assert!(pending.add("99").is_err());
        assert!(pending.add("99999999").is_err());
        assert!(pending.is_empty());
    }

    #[test]
    fn remove_clears_every_equal_instance() {
        let mut pending = PendingEntries::new();
        pending.add("60").unwrap();
        pending.add("61").unwrap();
        pending.add("60").unwrap();

        pending.remove("60");
        assert_eq!(pending.values(), &["61".to_string()]);
    }
}
