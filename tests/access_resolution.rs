//! Forum access resolution tests over the public API

use coboard::forum::access::{resolve_access, AccessDecision, Requester};
use coboard::models::{entries_for_forum, AccessRecord, BoardPage};

#[test]
fn empty_entry_list_is_open_to_any_requester() {
    let requesters = [
        Requester::se("66012345"),
        Requester::se(""),
        Requester::anonymous("guest1"),
    ];
    for requester in &requesters {
        assert_eq!(
            resolve_access("52010001", &[], requester),
            AccessDecision::Allowed,
            "empty entries must admit {:?}",
            requester
        );
    }
}

#[test]
fn cohort_prefix_admits_the_whole_cohort() {
    let entries = vec!["60"];
    for id in ["60010001", "60019999", "60abcdef"] {
        assert!(resolve_access("52010001", &entries, &Requester::se(id)).is_allowed());
    }
    for id in ["61010001", "06010001", ""] {
        assert!(!resolve_access("52010001", &entries, &Requester::se(id)).is_allowed());
    }
}

#[test]
fn exact_entry_admits_only_that_member() {
    let entries = vec!["63011234"];
    assert!(resolve_access("52010001", &entries, &Requester::se("63011234")).is_allowed());
    assert!(!resolve_access("52010001", &entries, &Requester::se("63011235")).is_allowed());
    assert!(!resolve_access("52010001", &entries, &Requester::se("6301123")).is_allowed());
}

#[test]
fn creator_bypasses_entry_checks_on_se_path() {
    let entries = vec!["52", "53018888"];
    let creator = Requester::se("67010042");
    assert!(resolve_access("67010042", &entries, &creator).is_allowed());
}

#[test]
fn anonymous_role_is_denied_without_override() {
    let entries = vec!["60", "60014567"];

    // Matching entry strings and even the creator id do not help role "a".
    assert!(!resolve_access("66012345", &entries, &Requester::anonymous("60014567")).is_allowed());
    assert!(!resolve_access("66012345", &entries, &Requester::anonymous("60019999")).is_allowed());
    assert!(!resolve_access("66012345", &entries, &Requester::anonymous("66012345")).is_allowed());

    // But an empty list stays open for everyone.
    assert!(resolve_access("66012345", &[], &Requester::anonymous("60014567")).is_allowed());
}

#[test]
fn malformed_entries_are_ignored_not_errors() {
    // None of these are length 2 or 8, or they fail the comparisons; the
    // resolver must skip them without failing.
    let entries = vec!["", "6", "601", "60012", "600123456", "--", "x"];
    assert!(!resolve_access("52010001", &entries, &Requester::se("60011111")).is_allowed());

    // A well-formed entry among garbage still matches.
    let entries = vec!["", "601", "60"];
    assert!(resolve_access("52010001", &entries, &Requester::se("60011111")).is_allowed());
}

#[test]
fn board_page_records_are_scoped_per_forum() {
    let records = vec![
        AccessRecord { forum_id: 1, user_id: "60".to_string() },
        AccessRecord { forum_id: 2, user_id: "61".to_string() },
        AccessRecord { forum_id: 2, user_id: "52017777".to_string() },
    ];

    assert_eq!(entries_for_forum(&records, 1), vec!["60"]);
    assert_eq!(entries_for_forum(&records, 2), vec!["61", "52017777"]);
    assert!(entries_for_forum(&records, 3).is_empty());
}

#[test]
fn board_page_decision_matches_per_forum_entries() {
    let page: BoardPage = serde_json::from_str(
        r#"{
            "forums": [
                {"forum_id": 1, "forum_name": "Open Hall", "creator_id": "52010001",
                 "board": "cpe", "total_contributors": 0},
                {"forum_id": 2, "forum_name": "Cohort 61", "creator_id": "52010001",
                 "board": "cpe", "total_contributors": 3}
            ],
            "tags": [],
            "access": [{"forum_id": 2, "user_id": "61"}]
        }"#,
    )
    .unwrap();

    let outsider = Requester::se("60010001");
    let member = Requester::se("61010001");

    // Forum 1 has no records at all: open to everyone.
    assert!(page.resolve_forum_access(&page.forums[0], &outsider).is_allowed());
    // Forum 2 admits only cohort 61 (and its creator).
    assert!(!page.resolve_forum_access(&page.forums[1], &outsider).is_allowed());
    assert!(page.resolve_forum_access(&page.forums[1], &member).is_allowed());
    assert!(page
        .resolve_forum_access(&page.forums[1], &Requester::se("52010001"))
        .is_allowed());
}
