//! Replay of positional list operations into a [`SlidingList`].
//!
//! The server expresses list changes as an ordered sequence of
//! `DELETE | INSERT | INVALIDATE | SYNC` operations against absolute list
//! indices. Replay is a pure function of the list and the operation
//! sequence; the caller decides when (and whether) a response's operations
//! are applied.
//!
//! A DELETE opens a gap that a later INSERT in the same sequence may consume:
//! inserting into an occupied slot shifts the occupants between the insert
//! point and the gap by one position toward the gap. Indices that fall
//! outside every tracked range are skipped during the shift (their contents
//! are not owned by this client), while the operations themselves address
//! the sparse map by absolute index.

use slidesync_types::{ListOp, ListResponse, RoomId};

use crate::list::SlidingList;

/// Apply one list's response to the local state: record the total count,
/// then replay the operations in order.
pub fn apply_list_response(list: &mut SlidingList, response: &ListResponse) {
    list.set_joined_count(response.count);

    let mut gap_index: Option<u64> = None;
    for op in &response.ops {
        match op {
            ListOp::Delete { index } => {
                list.room_index_to_room_id.remove(index);
                gap_index = Some(*index);
            }
            ListOp::Insert { index, room_id } => {
                apply_insert(list, *index, room_id.clone(), gap_index);
            }
            ListOp::Invalidate { range } => {
                list.room_index_to_room_id
                    .retain(|&index, _| !range.contains(index));
            }
            ListOp::Sync { range, room_ids } => {
                for index in range.start()..=range.end() {
                    match room_ids.get((index - range.start()) as usize) {
                        Some(room_id) => {
                            list.room_index_to_room_id.insert(index, room_id.clone());
                        }
                        // Fewer ids than the range width: end of the list.
                        None => break,
                    }
                }
            }
        }
    }
}

fn apply_insert(list: &mut SlidingList, index: u64, room_id: RoomId, gap_index: Option<u64>) {
    if list.room_index_to_room_id.contains_key(&index) {
        let Some(gap) = gap_index else {
            tracing::warn!(
                "INSERT at occupied index {} with no preceding DELETE, dropping op",
                index
            );
            return;
        };

        if gap > index {
            let mut i = gap;
            while i > index {
                if list.index_in_range(i) {
                    shift(list, i, i - 1);
                }
                i -= 1;
            }
        } else {
            for i in gap..index {
                if list.index_in_range(i) {
                    shift(list, i, i + 1);
                }
            }
        }
    }
    list.room_index_to_room_id.insert(index, room_id);
}

/// Move the occupant of `source` into `target`; an empty source clears the
/// target (the map stays sparse).
fn shift(list: &mut SlidingList, target: u64, source: u64) {
    match list.room_index_to_room_id.get(&source).cloned() {
        Some(room_id) => {
            list.room_index_to_room_id.insert(target, room_id);
        }
        None => {
            list.room_index_to_room_id.remove(&target);
        }
    }
}
