use std::collections::HashMap;

use crate::error::Result;
use crate::tree::arena::{NodeId, SizeTree};

/// An axis-aligned rectangle. Child rectangles are expressed relative to the
/// top-left corner of their parent's box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Shrink by `[top, right, bottom, left]`, never below zero size.
    pub fn inset(&self, [top, right, bottom, left]: [f64; 4]) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0.0),
            height: (self.height - top - bottom).max(0.0),
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Half-open containment: the right and bottom edges are exclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// A positioned rectangle in the treemap layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub node: NodeId,
    /// Index of the parent's entry in `Layout::rects` (None for top-level entries)
    pub parent: Option<usize>,
    /// Position relative to the parent's box
    pub rect: Rect,
    pub depth: u16,
}

/// The full layout result (rects + fast lookup).
/// Entries are in pre-order: a parent always precedes its children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// All placed rectangles
    pub rects: Vec<LayoutRect>,
    /// node → index into `rects`
    pub node_to_rect: HashMap<NodeId, usize>,
}

impl Layout {
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub(crate) fn push(&mut self, rect: LayoutRect) -> usize {
        let idx = self.rects.len();
        self.node_to_rect.insert(rect.node, idx);
        self.rects.push(rect);
        idx
    }

    /// The placed rectangle of `node`, if it received one.
    pub fn rect_of(&self, node: NodeId) -> Option<&LayoutRect> {
        self.node_to_rect.get(&node).map(|&idx| &self.rects[idx])
    }

    /// Indices of the entries placed directly inside entry `index`.
    /// Entries are in pre-order, so the scan stops at the end of `index`'s subtree.
    pub fn children_of(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let depth = self.rects[index].depth;
        self.rects
            .iter()
            .enumerate()
            .skip(index + 1)
            .take_while(move |(_, r)| r.depth > depth)
            .filter(move |(_, r)| r.parent == Some(index))
            .map(|(i, _)| i)
    }

    /// Rectangle of entry `index` in the coordinate space of the outermost box.
    pub fn absolute_rect(&self, index: usize) -> Rect {
        let entry = &self.rects[index];
        let mut rect = entry.rect;
        let mut parent = entry.parent;

        while let Some(p) = parent {
            let outer = &self.rects[p];
            rect = rect.translate(outer.rect.x, outer.rect.y);
            parent = outer.parent;
        }

        rect
    }

    /// Absolute rectangles for every entry, computed in one forward pass.
    pub fn absolute_rects(&self) -> Vec<Rect> {
        let mut out: Vec<Rect> = Vec::with_capacity(self.rects.len());
        for entry in &self.rects {
            let rect = match entry.parent {
                Some(p) => entry.rect.translate(out[p].x, out[p].y),
                None => entry.rect,
            };
            out.push(rect);
        }
        out
    }

    /// Placement of the node addressed by `path` (child indices from the tree root).
    /// `Ok(None)` means the node exists but was truncated out of the layout.
    pub fn rect_at(&self, tree: &SizeTree, path: &[usize]) -> Result<Option<&LayoutRect>> {
        let chain = tree.resolve_path(path)?;
        Ok(chain.last().and_then(|&id| self.rect_of(id)))
    }

    /// Deepest entry whose absolute rectangle contains the point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.absolute_rects()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.contains(x, y))
            .max_by_key(|(i, _)| (self.rects[*i].depth, *i))
            .map(|(i, _)| i)
    }
}
