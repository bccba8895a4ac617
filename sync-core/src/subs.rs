//! Room-subscription bookkeeping.
//!
//! The engine tracks the set of rooms the caller wants subscribed
//! (`desired`) against the set the server has already been told about
//! (`confirmed`). Each request carries only the diff; after the round trip
//! succeeds, exactly that diff is folded into `confirmed`.

use std::collections::BTreeSet;

use slidesync_types::RoomId;

/// Desired vs confirmed room-subscription sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionSet {
    desired: BTreeSet<RoomId>,
    confirmed: BTreeSet<RoomId>,
}

/// The subscription changes carried by one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionDiff {
    /// Rooms to subscribe: desired but not yet confirmed.
    pub added: Vec<RoomId>,
    /// Rooms to unsubscribe: confirmed but no longer desired.
    pub removed: Vec<RoomId>,
}

impl SubscriptionDiff {
    /// Whether this diff carries no changes.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl SubscriptionSet {
    /// Create an empty subscription set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the desired set wholesale.
    pub fn replace_desired(&mut self, desired: BTreeSet<RoomId>) {
        self.desired = desired;
    }

    /// Clone of the desired set.
    pub fn desired(&self) -> BTreeSet<RoomId> {
        self.desired.clone()
    }

    /// Clone of the confirmed set.
    pub fn confirmed(&self) -> BTreeSet<RoomId> {
        self.confirmed.clone()
    }

    /// The changes the next request must carry, in deterministic order.
    pub fn diff(&self) -> SubscriptionDiff {
        SubscriptionDiff {
            added: self.desired.difference(&self.confirmed).cloned().collect(),
            removed: self.confirmed.difference(&self.desired).cloned().collect(),
        }
    }

    /// Fold a successfully transmitted diff into the confirmed set.
    ///
    /// Only the diff that was actually sent is applied; desired-set changes
    /// made while the request was in flight stay pending for the next diff.
    pub fn commit(&mut self, diff: &SubscriptionDiff) {
        for room_id in &diff.added {
            self.confirmed.insert(room_id.clone());
        }
        for room_id in &diff.removed {
            self.confirmed.remove(room_id);
        }
    }

    /// Forget every confirmed subscription so all desired rooms are re-sent.
    /// Used when the subscription params template changes.
    pub fn clear_confirmed(&mut self) {
        self.confirmed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<RoomId> {
        ids.iter().map(|id| RoomId::new(*id)).collect()
    }

    #[test]
    fn diff_splits_added_and_removed() {
        let mut subs = SubscriptionSet::new();
        subs.replace_desired(set(&["!a:x", "!b:x"]));
        subs.commit(&SubscriptionDiff {
            added: vec![RoomId::new("!b:x"), RoomId::new("!c:x")],
            removed: vec![],
        });

        let diff = subs.diff();
        assert_eq!(diff.added, vec![RoomId::new("!a:x")]);
        assert_eq!(diff.removed, vec![RoomId::new("!c:x")]);
    }

    #[test]
    fn commit_applies_exactly_the_sent_diff() {
        let mut subs = SubscriptionSet::new();
        subs.replace_desired(set(&["!a:x", "!b:x"]));
        let diff = subs.diff();

        // The desired set moves on while the request is in flight.
        subs.replace_desired(set(&["!b:x", "!d:x"]));
        subs.commit(&diff);

        assert_eq!(subs.confirmed(), set(&["!a:x", "!b:x"]));
        // The next diff picks up the in-flight mutation.
        let next = subs.diff();
        assert_eq!(next.added, vec![RoomId::new("!d:x")]);
        assert_eq!(next.removed, vec![RoomId::new("!a:x")]);
    }

    #[test]
    fn empty_diff_when_in_sync() {
        let mut subs = SubscriptionSet::new();
        subs.replace_desired(set(&["!a:x"]));
        subs.commit(&subs.diff());
        assert!(subs.diff().is_empty());
    }

    #[test]
    fn clear_confirmed_resends_everything() {
        let mut subs = SubscriptionSet::new();
        subs.replace_desired(set(&["!a:x", "!b:x"]));
        subs.commit(&subs.diff());
        assert!(subs.diff().is_empty());

        subs.clear_confirmed();
        let diff = subs.diff();
        assert_eq!(diff.added, vec![RoomId::new("!a:x"), RoomId::new("!b:x")]);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn diff_order_is_deterministic() {
        let mut subs = SubscriptionSet::new();
        subs.replace_desired(set(&["!c:x", "!a:x", "!b:x"]));
        let diff = subs.diff();
        assert_eq!(
            diff.added,
            vec![RoomId::new("!a:x"), RoomId::new("!b:x"), RoomId::new("!c:x")]
        );
    }
}
