use compact_str::CompactString;

use crate::error::{LayoutError, Result};

/// Index into the arena `Vec<SizeNode>`. Uses u32 to save memory (supports up to ~4 billion nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single weighted node, stored in a flat arena.
/// Uses sibling-list representation: each node has `first_child` and `next_sibling`.
#[derive(Debug, Clone)]
pub struct SizeNode {
    /// Opaque caption, never read by the layout math
    pub label: Option<CompactString>,
    /// Weight. Must be >= the sum of the children's sizes.
    pub size: f64,
    /// Parent node index (None for root)
    pub parent: Option<NodeId>,
    /// First child node index (None for leaves)
    pub first_child: Option<NodeId>,
    /// Last child, so appends keep input order in O(1)
    pub last_child: Option<NodeId>,
    /// Next sibling node index (None if last child)
    pub next_sibling: Option<NodeId>,
    /// Position among the parent's children (root = 0)
    pub index: u32,
    /// Depth in the tree (root = 0)
    pub depth: u16,
}

impl SizeNode {
    pub fn new(label: Option<&str>, size: f64) -> Self {
        SizeNode {
            label: label.map(CompactString::new),
            size,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            index: 0,
            depth: 0,
        }
    }

    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

/// The weighted hierarchy stored as a flat arena of nodes.
#[derive(Debug, Clone)]
pub struct SizeTree {
    /// All nodes in contiguous memory
    pub nodes: Vec<SizeNode>,
    /// Root node index
    pub root: NodeId,
}

impl SizeTree {
    /// Create a tree holding only a root node.
    pub fn new(root_label: &str, size: f64) -> Self {
        SizeTree {
            nodes: vec![SizeNode::new(Some(root_label), size)],
            root: NodeId(0),
        }
    }

    /// Append a child after the parent's existing children. Returns the new node's ID.
    pub fn add_child(&mut self, parent: NodeId, mut node: SizeNode) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        let last_child = self.nodes[parent.index()].last_child;
        node.parent = Some(parent);
        node.depth = self.nodes[parent.index()].depth + 1;
        node.next_sibling = None;
        node.index = match last_child {
            Some(last) => self.nodes[last.index()].index + 1,
            None => 0,
        };

        // Append to the parent's child list (O(1))
        match last_child {
            Some(last) => self.nodes[last.index()].next_sibling = Some(new_id),
            None => self.nodes[parent.index()].first_child = Some(new_id),
        }
        self.nodes[parent.index()].last_child = Some(new_id);

        self.nodes.push(node);
        new_id
    }

    /// Shorthand for `add_child` with a label and size.
    pub fn push(&mut self, parent: NodeId, label: &str, size: f64) -> NodeId {
        self.add_child(parent, SizeNode::new(Some(label), size))
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> &SizeNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> &mut SizeNode {
        &mut self.nodes[id.index()]
    }

    /// Total number of nodes, root included. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root is the only node.
    pub fn has_only_root(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Iterate over children of a node, in input order.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.nodes[parent.index()].first_child,
        }
    }

    /// The `index`-th child of `parent`, if any.
    pub fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).nth(index)
    }

    /// Resolve a path of child indices from the root.
    /// Returns every node from the root down to the addressed one.
    pub fn resolve_path(&self, path: &[usize]) -> Result<Vec<NodeId>> {
        let mut chain = Vec::with_capacity(path.len() + 1);
        let mut current = self.root;
        chain.push(current);

        for (depth, &index) in path.iter().enumerate() {
            current = self.child(current, index).ok_or_else(|| LayoutError::InvalidPath {
                path: path.to_vec(),
                depth,
                index,
            })?;
            chain.push(current);
        }

        Ok(chain)
    }

    /// Inverse of `resolve_path`: the child indices leading from the root to `id`.
    pub fn path_of(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.get(id).depth as usize);
        let mut current = id;

        while let Some(parent) = self.get(current).parent {
            path.push(self.get(current).index as usize);
            current = parent;
        }

        path.reverse();
        path
    }

    /// Breadcrumb of labels from the root down to `id`.
    pub fn build_path(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            let node = self.get(node_id);
            parts.push(node.label().to_string());
            current = node.parent;
        }

        parts.reverse();
        parts.join("/")
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a SizeTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].next_sibling;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SizeTree {
        // root -> [A, B, C], C -> [D, E]
        let mut tree = SizeTree::new("root", 100.0);
        let root = tree.root;
        tree.push(root, "A", 50.0);
        tree.push(root, "B", 30.0);
        let c = tree.push(root, "C", 20.0);
        tree.push(c, "D", 12.0);
        tree.push(c, "E", 8.0);
        tree
    }

    #[test]
    fn children_keep_insertion_order_and_index() {
        let tree = sample();
        let labels: Vec<&str> = tree.children(tree.root).map(|id| tree.get(id).label()).collect();
        assert_eq!(labels, ["A", "B", "C"]);

        let indices: Vec<u32> = tree.children(tree.root).map(|id| tree.get(id).index).collect();
        assert_eq!(indices, [0, 1, 2]);
    }

    #[test]
    fn has_only_root_until_first_child() {
        let mut tree = SizeTree::new("root", 1.0);
        assert!(tree.has_only_root());
        assert_eq!(tree.len(), 1);

        let root = tree.root;
        tree.push(root, "A", 1.0);
        assert!(!tree.has_only_root());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn resolve_path_returns_chain_from_root() {
        let tree = sample();
        let chain = tree.resolve_path(&[2, 0]).unwrap();
        let labels: Vec<&str> = chain.iter().map(|&id| tree.get(id).label()).collect();
        assert_eq!(labels, ["root", "C", "D"]);
    }

    #[test]
    fn resolve_empty_path_is_root() {
        let tree = sample();
        assert_eq!(tree.resolve_path(&[]).unwrap(), vec![tree.root]);
    }

    #[test]
    fn resolve_out_of_range_reports_depth() {
        let tree = sample();
        let err = tree.resolve_path(&[2, 5]).unwrap_err();
        match err {
            LayoutError::InvalidPath { depth, index, .. } => {
                assert_eq!(depth, 1);
                assert_eq!(index, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn path_of_inverts_resolve() {
        let tree = sample();
        let chain = tree.resolve_path(&[2, 1]).unwrap();
        let leaf = *chain.last().unwrap();
        assert_eq!(tree.path_of(leaf), vec![2, 1]);
        assert_eq!(tree.build_path(leaf), "root/C/E");
        assert_eq!(tree.get(leaf).depth, 2);
    }
}
