//! Access entry validation and pending-set tests

use coboard::validation::{
    classify_entry, validate_entry, validate_exact_entry, validate_prefix_entry, EntryError,
    EntryKind, PendingEntries,
};

#[test]
fn every_cohort_in_range_validates_as_prefix() {
    for cohort in 52..=67 {
        let raw = cohort.to_string();
        assert!(
            validate_prefix_entry(&raw).is_ok(),
            "cohort {} must validate",
            cohort
        );
    }
    assert!(validate_prefix_entry("51").is_err());
    assert!(validate_prefix_entry("68").is_err());
    assert!(validate_prefix_entry("00").is_err());
}

#[test]
fn exact_entries_follow_the_full_pattern() {
    assert_eq!(validate_entry("66012345"), Ok(EntryKind::Exact));
    assert_eq!(validate_entry("52019999"), Ok(EntryKind::Exact));

    // Wrong infix, wrong cohort, non-digit tail.
    assert_eq!(validate_exact_entry("66112345"), Err(EntryError::InvalidExact));
    assert_eq!(validate_exact_entry("68012345"), Err(EntryError::InvalidExact));
    assert_eq!(validate_exact_entry("6601abcd"), Err(EntryError::InvalidExact));
}

#[test]
fn classification_is_purely_by_length() {
    assert_eq!(classify_entry("xx"), Some(EntryKind::Prefix));
    assert_eq!(classify_entry("xxxxxxxx"), Some(EntryKind::Exact));
    assert_eq!(classify_entry(""), None);
    assert_eq!(classify_entry("xxx"), None);
}

#[test]
fn rejected_input_is_never_committed() {
    let mut pending = PendingEntries::new();
    assert_eq!(pending.add("51"), Err(EntryError::InvalidPrefix));
    assert_eq!(pending.add("66112345"), Err(EntryError::InvalidExact));
    assert_eq!(pending.add("123"), Err(EntryError::InvalidLength));
    assert!(pending.is_empty());
}

#[test]
fn add_then_remove_restores_prior_state() {
    let mut pending = PendingEntries::new();
    pending.add("66013333").unwrap();
    let before = pending.clone();

    pending.add("60").unwrap();
    assert_eq!(pending.len(), 2);

    pending.remove("60");
    assert_eq!(pending, before);
}

#[test]
fn removal_is_value_based_and_clears_duplicates_together() {
    let mut pending = PendingEntries::new();
    pending.add("60").unwrap();
    pending.add("60").unwrap();
    pending.add("61").unwrap();

    // Duplicate values cannot be removed independently; one call clears both.
    pending.remove("60");
    assert_eq!(pending.values(), &["61".to_string()]);

    // Removing a value that is not present is a no-op.
    pending.remove("62");
    assert_eq!(pending.len(), 1);
}

#[test]
fn entry_set_drives_the_effective_access_mode() {
    let mut pending = PendingEntries::new();
    assert!(!pending.is_private());

    pending.add("67").unwrap();
    assert!(pending.is_private());

    pending.remove("67");
    assert!(!pending.is_private());
}
