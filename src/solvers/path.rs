use std::collections::HashMap;

use crate::grid::Cell;

/// Walks the parent links back from `end` and returns the path in start-to-end order.
///
/// Returns `None` when `end` was never reached from `start`, or if the links do not lead
/// back to `start` without looping.
pub fn reconstruct(parents: &HashMap<Cell, Cell>, start: Cell, end: Cell) -> Option<Vec<Cell>> {
    let mut path = vec![end];
    let mut child = end;
    while let Some(&parent) = parents.get(&child) {
        // A chain longer than the number of links must contain a cycle
        if path.len() > parents.len() {
            return None;
        }
        path.push(parent);
        child = parent;
    }
    if child != start {
        return None;
    }
    path.reverse();
    Some(path)
}
