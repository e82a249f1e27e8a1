// Public library interface for squarify-rs
// The diagnostic binaries build on the same modules

pub mod error;
pub mod layout;
pub mod render;
pub mod scanner;
pub mod tree;

pub use error::{LayoutError, Result};
pub use layout::{layout_tree, Layout, LayoutConfig, LayoutEngine, LayoutRect, Rect};
pub use tree::arena::{NodeId, SizeNode, SizeTree};
