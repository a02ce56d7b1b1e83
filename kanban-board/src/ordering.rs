//! Ordering primitive and drop destination resolution.
//!
//! Both column order and card order are plain sequences; a drag moves one
//! element with [`reorder`], and [`resolve_destination_index`] turns a drop
//! signal (target index plus closest edge) into the `finish_index` that
//! [`reorder`] expects.

use serde::{Deserialize, Serialize};

/// Move the element at `start_index` so it ends up at `finish_index`.
///
/// `finish_index` is measured in the resulting sequence (move semantics,
/// not swap). The input is left untouched.
///
/// # Panics
///
/// Panics if either index is out of bounds, like [`Vec::remove`].
pub fn reorder<T: Clone>(list: &[T], start_index: usize, finish_index: usize) -> Vec<T> {
    let mut result = list.to_vec();
    let moved = result.remove(start_index);
    result.insert(finish_index, moved);
    result
}

/// Side of a drop target the pointer is closest to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Direction a list is laid out in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Cards in a column
    Vertical,
    /// Columns on a board
    Horizontal,
}

impl Edge {
    /// True when this edge means "insert after the target" on `axis`.
    /// An edge that does not belong to the axis counts as "before".
    pub fn is_after(self, axis: Axis) -> bool {
        matches!(
            (axis, self),
            (Axis::Vertical, Edge::Bottom) | (Axis::Horizontal, Edge::Right)
        )
    }
}

/// A drop signal within one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropSignal {
    /// Index of the element being dragged
    pub start_index: usize,
    /// Index of the element under the pointer; the last index when dropping
    /// on empty container space
    pub index_of_target: usize,
    /// Edge hint, `None` when the target is not a sibling element
    pub closest_edge: Option<Edge>,
    pub axis: Axis,
}

/// Compute the `finish_index` for [`reorder`] from a drop signal.
///
/// Removing the dragged element shifts every later index down by one, so a
/// forward move lands one slot earlier than the raw target position.
pub fn resolve_destination_index(signal: DropSignal) -> usize {
    let DropSignal {
        start_index,
        index_of_target,
        closest_edge,
        axis,
    } = signal;

    if start_index == index_of_target {
        return start_index;
    }

    let Some(edge) = closest_edge else {
        return index_of_target;
    };

    let after = edge.is_after(axis);
    if start_index < index_of_target {
        if after {
            index_of_target
        } else {
            index_of_target - 1
        }
    } else if after {
        index_of_target + 1
    } else {
        index_of_target
    }
}
