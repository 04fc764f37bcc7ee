//! Index arithmetic for drag-to-reorder.

/// Insertion offset for moving the element at `from` onto the element at
/// `to`, expressed in pre-removal coordinates.
///
/// Forward moves land *after* the target, backward moves *before* it.
pub fn move_offset(from: usize, to: usize) -> usize {
    if to > from {
        to + 1
    } else {
        to
    }
}

/// Move `items[from]` onto the slot of `items[to]`.
///
/// Returns `false` (and leaves `items` untouched) when the move is a no-op
/// or either index is out of bounds.
pub fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let offset = move_offset(from, to);
    // The removal shifts everything after `from` one slot to the left.
    let insert_at = if offset > from { offset - 1 } else { offset };
    let item = items.remove(from);
    items.insert(insert_at, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_forward_is_after_target() {
        assert_eq!(move_offset(2, 5), 6);
    }

    #[test]
    fn offset_backward_is_target() {
        assert_eq!(move_offset(5, 1), 1);
    }

    #[test]
    fn forward_move_lands_after_target() {
        let mut v = vec!['a', 'b', 'c', 'd', 'e', 'f'];
        assert!(reorder(&mut v, 2, 5));
        assert_eq!(v, vec!['a', 'b', 'd', 'e', 'f', 'c']);
        assert_eq!(v.iter().position(|c| *c == 'c'), Some(5));
    }

    #[test]
    fn backward_move_lands_before_target() {
        let mut v = vec!['a', 'b', 'c', 'd', 'e', 'f'];
        assert!(reorder(&mut v, 5, 1));
        assert_eq!(v, vec!['a', 'f', 'b', 'c', 'd', 'e']);
    }

    #[test]
    fn adjacent_swap_forward() {
        let mut v = vec![1, 2, 3];
        assert!(reorder(&mut v, 0, 1));
        assert_eq!(v, vec![2, 1, 3]);
    }

    #[test]
    fn same_index_is_noop() {
        let mut v = vec![1, 2, 3];
        assert!(!reorder(&mut v, 1, 1));
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn out_of_bounds_is_noop() {
        let mut v = vec![1, 2, 3];
        assert!(!reorder(&mut v, 0, 3));
        assert!(!reorder(&mut v, 7, 0));
        assert_eq!(v, vec![1, 2, 3]);
    }
}
