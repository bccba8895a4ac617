//! Per-list window state.
//!
//! A [`SlidingList`] tracks one server-side room list: the user-controlled
//! request parameters, a sparse index→room-id map covering the tracked
//! windows, and the server-reported total joined count.
//!
//! Ranges are the only non-sticky parameter: they change on every scroll and
//! are transmitted on every request. All other parameters are retained by
//! the server, so a list is retransmitted in full only while its `modified`
//! flag is set.

use std::collections::HashMap;

use slidesync_types::{ListParams, RangeSpec, RoomId};

/// State for one sliding list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidingList {
    params: ListParams,
    /// True whenever any sticky parameter changed since the last successful
    /// transmission. A fresh list starts modified: nothing has been sent yet.
    modified: bool,
    pub(crate) room_index_to_room_id: HashMap<u64, RoomId>,
    joined_count: u64,
}

/// A read-only snapshot of a list's derived state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListData {
    /// Server-reported total joined count for the list.
    pub joined_count: u64,
    /// Sparse index→room-id map for the tracked windows.
    pub room_index_to_room_id: HashMap<u64, RoomId>,
}

impl SlidingList {
    /// Create a new list from request parameters.
    pub fn new(params: ListParams) -> Self {
        Self {
            params,
            modified: true,
            room_index_to_room_id: HashMap::new(),
            joined_count: 0,
        }
    }

    /// Replace the parameters wholesale.
    ///
    /// The index map and joined count are derived from the old parameters
    /// (different filters or sort produce a differently-ordered server list),
    /// so both are cleared and the list is marked modified.
    pub fn replace(&mut self, params: ListParams) {
        self.params = params;
        self.room_index_to_room_id.clear();
        self.joined_count = 0;
        self.modified = true;
    }

    /// Update only the tracked ranges. Leaves `modified` untouched: ranges
    /// are not sticky and are transmitted regardless.
    pub fn update_ranges(&mut self, ranges: Vec<RangeSpec>) {
        self.params.ranges = ranges;
    }

    /// The request fragment for this list: the full parameters when the list
    /// is modified (or when sticky fields are explicitly requested), else a
    /// ranges-only fragment.
    pub fn snapshot(&self, include_sticky: bool) -> ListParams {
        if self.modified || include_sticky {
            self.params.clone()
        } else {
            self.params.ranges_only()
        }
    }

    /// Mark the sticky parameters as transmitted.
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    /// Whether the sticky parameters await transmission.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Whether `index` falls inside any tracked range.
    pub fn index_in_range(&self, index: u64) -> bool {
        self.params.ranges.iter().any(|range| range.contains(index))
    }

    /// The current request parameters.
    pub fn params(&self) -> &ListParams {
        &self.params
    }

    /// The server-reported total joined count.
    pub fn joined_count(&self) -> u64 {
        self.joined_count
    }

    /// Record the server-reported total joined count.
    pub fn set_joined_count(&mut self, count: u64) {
        self.joined_count = count;
    }

    /// The room id currently mapped at `index`, if any.
    pub fn room_at(&self, index: u64) -> Option<&RoomId> {
        self.room_index_to_room_id.get(&index)
    }

    /// Clone of the derived state for external consumers.
    pub fn data(&self) -> ListData {
        ListData {
            joined_count: self.joined_count,
            room_index_to_room_id: self.room_index_to_room_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidesync_types::ListFilters;

    fn params() -> ListParams {
        ListParams {
            ranges: vec![RangeSpec::new(0, 9)],
            sort: Some(vec!["by_recency".into()]),
            filters: Some(ListFilters {
                is_dm: Some(true),
                ..ListFilters::default()
            }),
            timeline_limit: Some(1),
            required_state: None,
            slow_get_all_rooms: None,
        }
    }

    #[test]
    fn new_list_starts_modified_and_empty() {
        let list = SlidingList::new(params());
        assert!(list.is_modified());
        assert_eq!(list.joined_count(), 0);
        assert!(list.data().room_index_to_room_id.is_empty());
    }

    #[test]
    fn replace_clears_derived_state_and_marks_modified() {
        let mut list = SlidingList::new(params());
        list.room_index_to_room_id.insert(0, RoomId::new("!a:x"));
        list.set_joined_count(50);
        list.clear_modified();

        let mut different = params();
        different.filters = Some(ListFilters {
            is_encrypted: Some(true),
            ..ListFilters::default()
        });
        list.replace(different);

        assert!(list.is_modified());
        assert_eq!(list.joined_count(), 0);
        assert!(list.data().room_index_to_room_id.is_empty());
    }

    #[test]
    fn update_ranges_leaves_modified_untouched() {
        let mut list = SlidingList::new(params());
        list.clear_modified();

        list.update_ranges(vec![RangeSpec::new(10, 19)]);
        assert!(!list.is_modified());
        assert!(list.index_in_range(15));
        assert!(!list.index_in_range(5));

        // Also preserved in the modified direction.
        let mut dirty = SlidingList::new(params());
        dirty.update_ranges(vec![RangeSpec::new(0, 4)]);
        assert!(dirty.is_modified());
    }

    #[test]
    fn snapshot_sends_sticky_fields_only_while_modified() {
        let mut list = SlidingList::new(params());

        let first = list.snapshot(false);
        assert!(first.sort.is_some());
        assert!(first.filters.is_some());

        list.clear_modified();
        let second = list.snapshot(false);
        assert_eq!(second.ranges, vec![RangeSpec::new(0, 9)]);
        assert!(second.sort.is_none());
        assert!(second.filters.is_none());
        assert!(second.timeline_limit.is_none());

        let sticky = list.snapshot(true);
        assert_eq!(sticky, *list.params());
    }

    #[test]
    fn index_in_range_spans_all_ranges() {
        let mut list = SlidingList::new(params());
        list.update_ranges(vec![RangeSpec::new(0, 2), RangeSpec::new(8, 9)]);
        assert!(list.index_in_range(0));
        assert!(list.index_in_range(2));
        assert!(!list.index_in_range(5));
        assert!(list.index_in_range(8));
        assert!(!list.index_in_range(10));
    }
}
