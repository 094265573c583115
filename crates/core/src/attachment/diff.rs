//! Keep-list diffing of an existing attachment list.

use std::collections::HashSet;

use crate::storage::Locator;

/// Client-supplied set of attachments to keep on update.
///
/// Entries are full locators or bare storage identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepList(HashSet<String>);

impl KeepList {
    /// Parses a comma-delimited keep-list field.
    ///
    /// Entries are trimmed and blanks dropped. An absent field keeps nothing.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(String::from)
                .collect()
        })
        .map(Self)
        .unwrap_or_default()
    }

    /// Whether a locator is named by this keep-list.
    #[must_use]
    pub fn keeps(&self, locator: &Locator) -> bool {
        self.0.contains(locator.as_str())
            || locator
                .storage_id()
                .is_some_and(|id| self.0.contains(id))
    }

    /// Whether the keep-list names nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KeepList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Split of an existing attachment list against a keep-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentDiff {
    /// Locators to keep, in their original order.
    pub retained: Vec<Locator>,
    /// Locators to evict from the store, in their original order.
    pub to_delete: Vec<Locator>,
}

/// Partitions `current` into retained and to-delete locators.
///
/// Keep-list entries matching nothing in `current` are ignored.
#[must_use]
pub fn diff(current: &[Locator], keep: &KeepList) -> AttachmentDiff {
    let (retained, to_delete) = current
        .iter()
        .cloned()
        .partition(|locator| keep.keeps(locator));

    AttachmentDiff {
        retained,
        to_delete,
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn locators() -> impl Strategy<Value = Vec<Locator>> {
        prop::collection::vec("[a-z0-9]{1,8}", 0..12).prop_map(|ids| {
            ids.into_iter()
                .map(|id| Locator::new(format!("https://cdn.example.com/images/{id}.png")))
                .collect()
        })
    }

    // Retained and to-delete partition the current list: together they hold
    // every locator, and no locator lands in both.
    proptest! {
        #[test]
        fn prop_diff_partitions_current(
            current in locators(),
            keep in prop::collection::vec("[a-z0-9]{1,8}", 0..12),
        ) {
            let keep = KeepList::from_iter(keep);
            let AttachmentDiff { retained, to_delete } = diff(&current, &keep);

            prop_assert_eq!(retained.len() + to_delete.len(), current.len());
            for locator in &current {
                let in_retained = retained.contains(locator);
                let in_deleted = to_delete.contains(locator);
                prop_assert!(in_retained != in_deleted);
                prop_assert_eq!(in_retained, keep.keeps(locator));
            }
        }
    }

    // Both halves keep the relative order of the current list.
    proptest! {
        #[test]
        fn prop_diff_preserves_order(
            current in locators(),
            keep in prop::collection::vec("[a-z0-9]{1,8}", 0..12),
        ) {
            let keep = KeepList::from_iter(keep);
            let result = diff(&current, &keep);

            let expected_retained: Vec<_> =
                current.iter().filter(|l| keep.keeps(l)).cloned().collect();
            let expected_deleted: Vec<_> =
                current.iter().filter(|l| !keep.keeps(l)).cloned().collect();
            prop_assert_eq!(result.retained, expected_retained);
            prop_assert_eq!(result.to_delete, expected_deleted);
        }
    }
}
