//! Hand-off from layout to whatever draws it.
//!
//! The layout core never depends on this module; a renderer implements
//! [`RectConsumer`] and is driven by [`emit`].

pub mod ascii;

use crate::layout::{Layout, Rect};
use crate::tree::arena::{SizeNode, SizeTree};

/// Receives each placed node and produces the caller's visual handle for it.
pub trait RectConsumer {
    type Handle;

    /// `rect` is absolute (relative to the outermost box).
    fn consume(&mut self, node: &SizeNode, rect: Rect, depth: u16) -> Self::Handle;
}

/// Feed every entry of `layout` to `consumer`, parents before children.
/// Handles come back in the same order as `layout.rects`.
pub fn emit<C: RectConsumer>(layout: &Layout, tree: &SizeTree, consumer: &mut C) -> Vec<C::Handle> {
    layout
        .absolute_rects()
        .into_iter()
        .zip(&layout.rects)
        .map(|(rect, entry)| consumer.consume(tree.get(entry.node), rect, entry.depth))
        .collect()
}
