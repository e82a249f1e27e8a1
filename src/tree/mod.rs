pub mod aggregate;
pub mod arena;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use self::arena::{NodeId, SizeNode, SizeTree};
use crate::error::{LayoutError, Result};
use crate::scanner::types::RawFileEntry;

/// Relative slack allowed when comparing a parent's size to the sum of its children.
const SUM_TOLERANCE: f64 = 1e-9;

/// Check the invariants the layout engine assumes but never enforces:
/// finite non-negative sizes, children sorted descending, parents at least as
/// large as their children, and strictly positive parents of non-empty lists.
pub fn validate(tree: &SizeTree) -> Result<()> {
    for (i, node) in tree.nodes.iter().enumerate() {
        let id = NodeId(i as u32);
        if !node.size.is_finite() || node.size < 0.0 {
            return Err(invalid(tree, id, format!("size {} is not a finite non-negative number", node.size)));
        }

        if !node.has_children() {
            continue;
        }
        if node.size <= 0.0 {
            return Err(invalid(tree, id, "node with children must have a positive size".into()));
        }

        let mut sum = 0.0;
        let mut previous = f64::INFINITY;
        for child in tree.children(id) {
            let size = tree.get(child).size;
            if size > previous {
                return Err(invalid(
                    tree,
                    id,
                    format!("children are not sorted by size descending ({previous} before {size})"),
                ));
            }
            previous = size;
            sum += size;
        }

        if sum > node.size * (1.0 + SUM_TOLERANCE) {
            return Err(invalid(
                tree,
                id,
                format!("children sum to {sum}, more than the node size {}", node.size),
            ));
        }
    }

    Ok(())
}

fn invalid(tree: &SizeTree, id: NodeId, reason: String) -> LayoutError {
    LayoutError::InvalidInput(format!("node '{}': {}", tree.build_path(id), reason))
}

/// Find the deepest common ancestor of all entries.
fn find_common_root(entries: &[RawFileEntry]) -> PathBuf {
    let Some(first) = entries.first() else {
        return PathBuf::new();
    };

    let mut root = first.path.clone();
    for entry in entries.iter().skip(1) {
        while !entry.path.starts_with(&root) {
            match root.parent() {
                Some(parent) => root = parent.to_path_buf(),
                None => return PathBuf::new(),
            }
        }
    }

    root
}

/// Build a SizeTree from a flat list of RawFileEntry (from the scanner).
/// Directory sizes are aggregated, zero-size directories collapsed into leaves and
/// children sorted, so the result passes `validate`.
pub fn build_tree(entries: &[RawFileEntry]) -> SizeTree {
    if entries.is_empty() {
        return SizeTree::new("(empty)", 0.0);
    }

    let dir_count = entries.iter().filter(|e| e.is_dir).count();
    tracing::info!(
        "Building tree from {} entries ({} dirs, {} files)",
        entries.len(),
        dir_count,
        entries.len() - dir_count
    );

    let root_path = find_common_root(entries);
    let root_name = root_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root_path.to_string_lossy().to_string());

    tracing::debug!("Root '{}' at {}", root_name, root_path.display());

    let mut tree = SizeTree::new(&root_name, 0.0);

    // Map from path → NodeId for parent lookups
    let mut path_map: HashMap<PathBuf, NodeId> = HashMap::new();
    path_map.insert(root_path.clone(), tree.root);

    // Directories first so files always find their parent
    for entry in entries.iter().filter(|e| e.is_dir) {
        if entry.path != root_path {
            ensure_node(&mut tree, &mut path_map, &entry.path);
        }
    }

    for entry in entries.iter().filter(|e| !e.is_dir) {
        if entry.path == root_path {
            // Scanning a single file: the root itself carries the weight.
            tree.get_mut(tree.root).size = entry.size as f64;
            continue;
        }

        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let parent_path = entry.path.parent().unwrap_or(Path::new(""));
        let parent_id = ensure_node(&mut tree, &mut path_map, parent_path);

        let id = tree.add_child(parent_id, SizeNode::new(Some(&name), entry.size as f64));
        path_map.insert(entry.path.clone(), id);
    }

    aggregate::aggregate_sizes(&mut tree);
    let pruned = aggregate::prune_empty(&mut tree);
    if pruned > 0 {
        tracing::debug!("Collapsed {} zero-size directories into leaves", pruned);
    }
    aggregate::sort_children_by_size(&mut tree);

    tracing::info!(
        "Tree built: {} total nodes, {} direct children of root",
        tree.len(),
        tree.children(tree.root).count()
    );

    tree
}

/// Ensure a directory node exists at the given path, creating intermediate nodes as needed.
/// Iterative, so deep paths cannot overflow the stack.
fn ensure_node(tree: &mut SizeTree, path_map: &mut HashMap<PathBuf, NodeId>, path: &Path) -> NodeId {
    if let Some(&id) = path_map.get(path) {
        return id;
    }

    // Missing ancestors from the target upward
    let mut missing = Vec::new();
    let mut current = path.to_path_buf();
    loop {
        if path_map.contains_key(&current) {
            break;
        }
        missing.push(current.clone());

        match current.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => current = parent.to_path_buf(),
            _ => break,
        }
    }

    let mut last_id = tree.root;
    for ancestor in missing.into_iter().rev() {
        let parent_id = ancestor
            .parent()
            .and_then(|p| path_map.get(p).copied())
            .unwrap_or(tree.root);

        let name = ancestor
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let id = tree.add_child(parent_id, SizeNode::new(Some(&name), 0.0));
        path_map.insert(ancestor, id);
        last_id = id;
    }

    last_id
}
