use sequoia::{NodeRef, Tree};

use std::collections::HashSet;

use quickcheck_macros::quickcheck;

use crate::Op;

/// Applies a set of operations to a tree and a plain list of keys.
/// This way we can ensure that after a random smattering of inserts
/// and removes we have the same keys in both.
fn do_ops(ops: &[Op<i8>], tree: &mut Tree, keys: &mut Vec<i64>) -> bool {
    for op in ops {
        match *op {
            Op::Insert(k) => {
                tree.insert(i64::from(k));
                keys.push(i64::from(k));
            }
            Op::Remove(k) => {
                let removed = tree.remove(i64::from(k));
                match keys.iter().position(|&x| x == i64::from(k)) {
                    Some(pos) => {
                        keys.swap_remove(pos);
                        if removed != Some(i64::from(k)) {
                            return false;
                        }
                    }
                    None => {
                        if removed.is_some() {
                            return false;
                        }
                    }
                }
            }
        }
        if !tree.check_height() || !tree.is_tall() {
            return false;
        }
    }
    true
}

/// Recomputes every height from scratch and compares it with the cached one.
fn heights_are_exact(node: Option<NodeRef<'_>>) -> Option<usize> {
    match node {
        None => Some(0),
        Some(n) => {
            let left = heights_are_exact(n.left())?;
            let right = heights_are_exact(n.right())?;
            (n.height() == left.max(right) + 1).then(|| n.height())
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut keys = Vec::new();

    if !do_ops(&ops, &mut tree, &mut keys) {
        return false;
    }
    keys.sort_unstable();

    let inserts = ops.iter().filter(|op| matches!(op, Op::Insert(_))).count();
    tree.in_order() == keys
        && tree.size() == inserts
        && heights_are_exact(tree.root()) == Some(tree.height())
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(i64::from(*x));
    }

    xs.iter()
        .all(|&x| tree.search(i64::from(x)).map(|n| n.value()) == Some(i64::from(x)))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(i64::from(*x));
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|&x| tree.search(i64::from(x)).is_none())
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(i64::from(*x));
    }
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while tree.remove(i64::from(*delete)).is_some() {}
        if !tree.check_height() || !tree.is_tall() {
            return false;
        }
    }

    let mut still_present = xs;
    for delete in &deletes {
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|&x| !tree.contains(i64::from(x)))
        && still_present.iter().all(|&x| tree.contains(i64::from(x)))
        && tree.len() == still_present.len()
}
