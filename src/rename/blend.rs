use indexmap::IndexSet;

use crate::avatar::BlendTrees;

use super::{Field, FieldEdit, ObjectId};

/// Add `root` and every blend tree reachable through its children to
/// `visited`, in depth-first pre-order.
///
/// A tree already in `visited` is not entered again, so aliased or cyclic
/// children are harmless. Keys naming no tree are ignored. Uses an explicit
/// stack rather than recursion.
pub fn collect(trees: &BlendTrees, root: &str, visited: &mut IndexSet<String>) {
    let mut stack = vec![root];
    while let Some(key) = stack.pop() {
        let Some(tree) = trees.get(key) else {
            continue;
        };
        if !visited.insert(key.to_string()) {
            continue;
        }
        let children: Vec<&str> = tree.child_trees().collect();
        stack.extend(children.into_iter().rev());
    }
}

/// Rewrite `blend_parameter` / `blend_parameter_y` equal to `from` in every
/// tree reachable from `root` that is not yet in `visited`.
pub fn rename(
    trees: &mut BlendTrees,
    root: &str,
    visited: &mut IndexSet<String>,
    from: &str,
    to: &str,
    edits: &mut Vec<FieldEdit>,
) {
    let start = visited.len();
    collect(trees, root, visited);
    for key in visited.iter().skip(start) {
        let Some(tree) = trees.get_mut(key) else {
            continue;
        };
        let id = || ObjectId::BlendTree(key.clone());
        if tree.blend_parameter == from {
            tree.blend_parameter = to.to_string();
            log::debug!("{}: blend parameter -> {to}", id());
            edits.push(FieldEdit {
                object: id(),
                field: Field::BlendParameter,
            });
        }
        if tree.blend_parameter_y == from {
            tree.blend_parameter_y = to.to_string();
            log::debug!("{}: blend parameter Y -> {to}", id());
            edits.push(FieldEdit {
                object: id(),
                field: Field::BlendParameterY,
            });
        }
    }
}
