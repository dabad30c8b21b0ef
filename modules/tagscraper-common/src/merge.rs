use std::collections::HashSet;

use crate::types::RecordSet;

/// Combine freshly scraped records with the previously stored set.
///
/// Fresh records come first and win over stored ones sharing a reference;
/// stored records not seen in `fresh` follow in their stored order. With no
/// stored set the result is `fresh` with later duplicates dropped.
pub fn merge(previous: Option<RecordSet>, fresh: RecordSet) -> RecordSet {
    let mut seen = HashSet::new();
    fresh
        .into_iter()
        .chain(previous.into_iter().flatten())
        .filter(|record| seen.insert(record.reference.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;

    fn rec(title: &str, reference: &str) -> Record {
        Record::new(title, reference)
    }

    #[test]
    fn absent_previous_dedups_fresh_keeping_first() {
        let fresh = vec![rec("one", "r1"), rec("one again", "r1"), rec("two", "r2")];
        assert_eq!(
            merge(None, fresh),
            vec![rec("one", "r1"), rec("two", "r2")]
        );
    }

    #[test]
    fn fresh_entry_overrides_stored_entry_with_same_reference() {
        let previous = vec![rec("a", "x")];
        let fresh = vec![rec("b", "x"), rec("c", "y")];
        assert_eq!(
            merge(Some(previous), fresh),
            vec![rec("b", "x"), rec("c", "y")]
        );
    }

    #[test]
    fn stored_only_entries_follow_fresh_in_stored_order() {
        let previous = vec![rec("old1", "o1"), rec("shared", "s"), rec("old2", "o2")];
        let fresh = vec![rec("new", "n"), rec("shared newer", "s")];
        assert_eq!(
            merge(Some(previous), fresh),
            vec![
                rec("new", "n"),
                rec("shared newer", "s"),
                rec("old1", "o1"),
                rec("old2", "o2"),
            ]
        );
    }

    #[test]
    fn empty_previous_is_not_absent_but_merges_the_same() {
        let fresh = vec![rec("t", "u"), rec("t", "u")];
        assert_eq!(merge(Some(Vec::new()), fresh.clone()), merge(None, fresh));
    }

    #[test]
    fn empty_fresh_keeps_stored_set() {
        let previous = vec![rec("a", "1"), rec("b", "2")];
        assert_eq!(merge(Some(previous.clone()), Vec::new()), previous);
    }

    #[test]
    fn repeated_merge_with_same_fresh_is_idempotent() {
        let previous = vec![rec("p1", "1"), rec("p2", "2"), rec("p3", "3")];
        let fresh = vec![rec("f2", "2"), rec("f4", "4"), rec("f4 dup", "4")];

        let once = merge(Some(previous), fresh.clone());
        let twice = merge(Some(once.clone()), fresh);
        assert_eq!(once, twice);
    }

    #[test]
    fn titles_do_not_affect_identity() {
        let fresh = vec![rec("same", "1"), rec("same", "2")];
        assert_eq!(merge(None, fresh.clone()), fresh);
    }
}
