use super::arena::{NodeId, SizeTree};

/// Compute aggregated sizes for all interior nodes (bottom-up).
/// After this, each node with children has `size` equal to the sum of its children.
/// Leaves keep their own size.
pub fn aggregate_sizes(tree: &mut SizeTree) {
    // Children always have higher indices than their parents in the arena
    // (guaranteed by add_child), so a reverse sweep visits children first.
    let len = tree.nodes.len();
    for i in (0..len).rev() {
        let node = &tree.nodes[i];
        if node.first_child.is_none() {
            continue;
        }

        let mut total = 0.0;
        let mut child = node.first_child;
        while let Some(child_id) = child {
            total += tree.nodes[child_id.index()].size;
            child = tree.nodes[child_id.index()].next_sibling;
        }
        tree.nodes[i].size = total;
    }
}

/// Detach the children of every interior node whose size is zero, turning it into a leaf.
/// Layout needs a positive size under any node with children; an all-empty
/// directory has nothing to show anyway. Detached nodes stay in the arena but are
/// no longer reachable from the root. Returns the number of nodes turned into leaves.
pub fn prune_empty(tree: &mut SizeTree) -> usize {
    let mut pruned = 0;
    for node in tree.nodes.iter_mut() {
        if node.first_child.is_some() && node.size <= 0.0 {
            node.first_child = None;
            node.last_child = None;
            pruned += 1;
        }
    }
    pruned
}

/// Sort children of every node by size (descending, stable).
/// The span selector expects children sorted this way.
/// This re-links the sibling list without moving nodes in the arena.
pub fn sort_children_by_size(tree: &mut SizeTree) {
    let len = tree.nodes.len();
    for i in 0..len {
        if tree.nodes[i].first_child.is_none() {
            continue;
        }

        let mut children: Vec<NodeId> = Vec::new();
        let mut child = tree.nodes[i].first_child;
        while let Some(child_id) = child {
            children.push(child_id);
            child = tree.nodes[child_id.index()].next_sibling;
        }

        children.sort_by(|a, b| {
            tree.nodes[b.index()]
                .size
                .total_cmp(&tree.nodes[a.index()].size)
        });

        tree.nodes[i].first_child = children.first().copied();
        tree.nodes[i].last_child = children.last().copied();
        for (index, pair) in children.windows(2).enumerate() {
            tree.nodes[pair[0].index()].next_sibling = Some(pair[1]);
            tree.nodes[pair[0].index()].index = index as u32;
        }
        if let Some(&last) = children.last() {
            tree.nodes[last.index()].next_sibling = None;
            tree.nodes[last.index()].index = (children.len() - 1) as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_bottom_up() {
        let mut tree = SizeTree::new("root", 0.0);
        let root = tree.root;
        let dir = tree.push(root, "dir", 0.0);
        tree.push(dir, "a", 3.0);
        tree.push(dir, "b", 4.0);
        tree.push(root, "c", 5.0);

        aggregate_sizes(&mut tree);

        assert_eq!(tree.get(dir).size, 7.0);
        assert_eq!(tree.get(root).size, 12.0);
    }

    #[test]
    fn prune_empty_turns_zero_sized_dirs_into_leaves() {
        let mut tree = SizeTree::new("root", 0.0);
        let root = tree.root;
        let empty = tree.push(root, "empty", 0.0);
        let nested = tree.push(empty, "nested", 0.0);
        tree.push(nested, ".gitkeep", 0.0);
        let full = tree.push(root, "full", 0.0);
        tree.push(full, "data", 8.0);

        aggregate_sizes(&mut tree);
        assert_eq!(prune_empty(&mut tree), 2);

        assert!(!tree.get(empty).has_children());
        assert!(!tree.get(nested).has_children());
        assert!(tree.get(full).has_children());
        let labels: Vec<&str> = tree.children(root).map(|id| tree.get(id).label()).collect();
        assert_eq!(labels, ["empty", "full"]);
    }

    #[test]
    fn sorts_descending_and_refreshes_indices() {
        let mut tree = SizeTree::new("root", 10.0);
        let root = tree.root;
        tree.push(root, "small", 1.0);
        tree.push(root, "big", 6.0);
        tree.push(root, "mid", 3.0);

        sort_children_by_size(&mut tree);

        let order: Vec<(&str, u32)> = tree
            .children(root)
            .map(|id| (tree.get(id).label(), tree.get(id).index))
            .collect();
        assert_eq!(order, [("big", 0), ("mid", 1), ("small", 2)]);

        // Appending after a sort must still land at the end.
        let tail = tree.push(root, "tail", 0.0);
        assert_eq!(tree.get(tail).index, 3);
        assert_eq!(tree.children(root).last(), Some(tail));
    }
}
