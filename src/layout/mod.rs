mod config;
mod result;
pub mod span;
mod squarify;

pub use config::LayoutConfig;
pub use result::{Layout, LayoutRect, Rect};
pub use span::{select_span, Span};
pub use squarify::{layout_tree, LayoutEngine};
