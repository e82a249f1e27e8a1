use super::config::LayoutConfig;
use super::result::{Layout, LayoutRect, Rect};
use super::span::{select_span, Span};
use crate::error::{LayoutError, Result};
use crate::tree::arena::{NodeId, SizeTree};

/// Lay out a whole tree inside a `container_width` x `container_height` box.
///
/// Inputs are validated first, so a malformed tree or config fails here with
/// `LayoutError::InvalidInput` instead of producing NaN geometry. Entry 0 of
/// the result is the root, covering the container.
pub fn layout_tree(
    tree: &SizeTree,
    container_width: f64,
    container_height: f64,
    config: &LayoutConfig,
) -> Result<Layout> {
    for (name, value) in [("width", container_width), ("height", container_height)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(LayoutError::InvalidInput(format!(
                "container {name} {value} must be finite and positive"
            )));
        }
    }
    config.validate()?;
    crate::tree::validate(tree)?;

    let engine = LayoutEngine::new(tree, config);
    let bounds = Rect::new(0.0, 0.0, container_width, container_height);

    let mut layout = Layout::default();
    let root = layout.push(LayoutRect {
        node: tree.root,
        parent: None,
        rect: bounds,
        depth: 0,
    });
    engine.layout_children(tree.root, Some(root), bounds, 0, &mut layout);

    Ok(layout)
}

/// Recursive squarified layout over a `SizeTree`. Does no validation of its own.
pub struct LayoutEngine<'a> {
    tree: &'a SizeTree,
    config: &'a LayoutConfig,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(tree: &'a SizeTree, config: &'a LayoutConfig) -> Self {
        Self { tree, config }
    }

    /// Place every descendant of `node` inside `allotted`.
    /// `node` itself gets no entry; its children are the top-level entries.
    pub fn layout(&self, node: NodeId, allotted: Rect, depth: u16) -> Layout {
        let mut layout = Layout::default();
        self.layout_children(node, None, allotted, depth, &mut layout);
        layout
    }

    fn layout_children(
        &self,
        parent: NodeId,
        parent_entry: Option<usize>,
        allotted: Rect,
        depth: u16,
        out: &mut Layout,
    ) {
        let node = self.tree.get(parent);
        if !node.has_children() {
            return;
        }
        if depth >= self.config.max_depth {
            return;
        }

        let content = allotted.inset(self.config.padding);
        if content.width <= 0.0
            || content.height <= 0.0
            || content.width < self.config.min_width
            || content.height < self.config.min_height
        {
            tracing::debug!(
                "Skipping children of '{}': content {:.1}x{:.1} below minimum",
                node.label(),
                content.width,
                content.height
            );
            return;
        }

        let total = node.size;
        let children: Vec<NodeId> = self.tree.children(parent).collect();
        let weights: Vec<f64> = children.iter().map(|&id| self.tree.get(id).size).collect();

        if depth == 0 {
            tracing::info!(
                "Laying out {} children of '{}' (size={}) in {:.0}x{:.0} area",
                children.len(),
                node.label(),
                total,
                content.width,
                content.height
            );
        }

        // Weight units per unit of length, chosen so that area is conserved.
        let scale = (total / (content.width * content.height)).sqrt();
        // Strips run across the full content width.
        let space = scale * content.width;

        let mut start = 0;
        let mut y = content.y;
        while start < children.len() {
            let Span { end, sum } = select_span(&weights, space, start);

            if sum <= 0.0 || sum / total < self.config.min_area_fraction {
                tracing::debug!(
                    "Dropping {} of {} children of '{}' (strip share {:.3})",
                    children.len() - start,
                    children.len(),
                    node.label(),
                    sum / total
                );
                break;
            }

            let thickness = sum / space;
            let thickness_px = thickness / scale;
            if !thickness_px.is_finite() {
                tracing::warn!(
                    "Squarify: invalid strip thickness {} under '{}' (sum={}, space={}), stopping",
                    thickness_px,
                    node.label(),
                    sum,
                    space
                );
                break;
            }

            let mut x = content.x;
            for i in start..end {
                let length_px = weights[i] / thickness / scale;
                let rect = self.place(x, y, length_px, thickness_px);

                let idx = out.push(LayoutRect {
                    node: children[i],
                    parent: parent_entry,
                    rect,
                    depth: depth + 1,
                });

                // The child's own children live inside its box, minus the border.
                let border = self.config.border;
                let inner = Rect::new(0.0, 0.0, rect.width, rect.height).inset([border; 4]);
                self.layout_children(children[i], Some(idx), inner, depth + 1, out);

                x += length_px;
            }

            y += thickness_px;
            start = end;
        }
    }

    /// Turn an unrounded placement into the emitted rectangle: snap edges
    /// (not lengths, so neighbours stay flush) and subtract the spacing gap.
    fn place(&self, x: f64, y: f64, width: f64, height: f64) -> Rect {
        let snap = |v: f64| if self.config.pixel_snap { v.round() } else { v };
        let (left, top) = (snap(x), snap(y));
        let (right, bottom) = (snap(x + width), snap(y + height));

        Rect {
            x: left,
            y: top,
            width: (right - left - self.config.spacing).max(0.0),
            height: (bottom - top - self.config.spacing).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact() -> LayoutConfig {
        LayoutConfig::default().with_pixel_snap(false).with_border(0.0)
    }

    fn flat(sizes: &[f64]) -> SizeTree {
        let mut tree = SizeTree::new("root", sizes.iter().sum());
        let root = tree.root;
        for (i, &size) in sizes.iter().enumerate() {
            tree.push(root, &format!("c{i}"), size);
        }
        tree
    }

    fn child_rects(tree: &SizeTree, layout: &Layout) -> Vec<Option<Rect>> {
        tree.children(tree.root)
            .map(|id| layout.rect_of(id).map(|r| r.rect))
            .collect()
    }

    #[test]
    fn single_child_fills_content() {
        let tree = flat(&[1920.0 * 1080.0]);
        let layout = layout_tree(&tree, 1920.0, 1080.0, &exact()).unwrap();
        let rects = child_rects(&tree, &layout);
        let r = rects[0].unwrap();
        assert!((r.width - 1920.0).abs() < 1e-9);
        assert!((r.height - 1080.0).abs() < 1e-9);
    }

    #[test]
    fn preserves_area_for_simple_case() {
        let tree = flat(&[400.0, 300.0, 200.0, 100.0]);
        let config = exact().with_min_area_fraction(0.0);
        let layout = layout_tree(&tree, 50.0, 20.0, &config).unwrap();

        let total_out: f64 = child_rects(&tree, &layout).iter().map(|r| r.unwrap().area()).sum();
        assert!((total_out - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn small_trailing_strip_is_truncated() {
        let mut tree = SizeTree::new("root", 100.0);
        let root = tree.root;
        tree.push(root, "a", 85.0);
        tree.push(root, "b", 14.0);
        tree.push(root, "c", 1.0);

        // A tall box keeps 85 and 14 in separate strips, leaving 1 alone in a third.
        let layout = layout_tree(&tree, 100.0, 200.0, &exact()).unwrap();
        let rects = child_rects(&tree, &layout);

        let a = rects[0].unwrap();
        let b = rects[1].unwrap();
        assert!(rects[2].is_none());
        assert_eq!((a.x, a.y), (0.0, 0.0));
        assert!((a.width - 100.0).abs() < 1e-9);
        assert!((a.height - 170.0).abs() < 1e-9);
        assert!((b.y - 170.0).abs() < 1e-9);
        assert!((b.height - 28.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weight_tail_is_dropped_without_cutoff() {
        let tree = flat(&[10.0, 0.0, 0.0]);
        let config = exact().with_min_area_fraction(0.0);
        let layout = layout_tree(&tree, 40.0, 20.0, &config).unwrap();

        let rects = child_rects(&tree, &layout);
        let first = rects[0].unwrap();
        assert!(rects[1].is_none() && rects[2].is_none());
        assert!([first.x, first.y, first.width, first.height].iter().all(|v| v.is_finite()));
        assert!((first.width - 40.0).abs() < 1e-9);
        assert!((first.height - 20.0).abs() < 1e-9);
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn narrow_content_gets_no_children() {
        let tree = flat(&[6.0, 4.0]);
        let config = exact().with_padding(0.0, 5.0, 0.0, 5.0).with_min_size(60.0, 0.0);
        let layout = layout_tree(&tree, 64.0, 200.0, &config).unwrap();

        assert_eq!(layout.len(), 1);
        assert!(child_rects(&tree, &layout).iter().all(Option::is_none));
    }

    #[test]
    fn padding_offsets_children() {
        let tree = flat(&[1.0]);
        let config = exact().with_padding(14.0, 2.0, 3.0, 4.0);
        let layout = layout_tree(&tree, 100.0, 100.0, &config).unwrap();

        let r = child_rects(&tree, &layout)[0].unwrap();
        assert!((r.x - 4.0).abs() < 1e-9);
        assert!((r.y - 14.0).abs() < 1e-9);
        assert!((r.width - 94.0).abs() < 1e-9);
        assert!((r.height - 83.0).abs() < 1e-9);
    }

    #[test]
    fn spacing_shrinks_rects_without_moving_siblings() {
        let tree = flat(&[50.0, 50.0]);
        let plain = layout_tree(&tree, 100.0, 50.0, &exact()).unwrap();
        let spaced = layout_tree(&tree, 100.0, 50.0, &exact().with_spacing(2.0)).unwrap();

        for (a, b) in child_rects(&tree, &plain).iter().zip(child_rects(&tree, &spaced)) {
            let (a, b) = (a.unwrap(), b.unwrap());
            assert_eq!((a.x, a.y), (b.x, b.y));
            assert!((a.width - 2.0 - b.width).abs() < 1e-9);
            assert!((a.height - 2.0 - b.height).abs() < 1e-9);
        }
    }

    #[test]
    fn nested_children_are_relative_to_their_parent_box() {
        let mut tree = SizeTree::new("root", 100.0);
        let root = tree.root;
        let dir = tree.push(root, "dir", 100.0);
        let leaf = tree.push(dir, "leaf", 100.0);

        let config = LayoutConfig::default().with_pixel_snap(false);
        let layout = layout_tree(&tree, 40.0, 30.0, &config).unwrap();

        let inner = layout.rect_of(leaf).unwrap();
        assert_eq!(inner.depth, 2);
        assert_eq!(layout.rects[inner.parent.unwrap()].node, dir);

        let expected = [1.0, 1.0, 38.0, 28.0];
        let got = [inner.rect.x, inner.rect.y, inner.rect.width, inner.rect.height];
        for (e, g) in expected.iter().zip(got) {
            assert!((e - g).abs() < 1e-9, "expected {expected:?}, got {got:?}");
        }
    }

    #[test]
    fn pixel_snap_keeps_neighbours_flush() {
        let tree = flat(&[3.0, 3.0, 3.0]);
        let config = LayoutConfig::default().with_min_area_fraction(0.0);
        let layout = layout_tree(&tree, 100.0, 1.0, &config).unwrap();

        let rects: Vec<Rect> = child_rects(&tree, &layout).into_iter().flatten().collect();
        assert_eq!(rects.len(), 3);
        for pair in rects.windows(2) {
            assert_eq!(pair[0].right(), pair[1].x);
            assert_eq!(pair[0].x.fract(), 0.0);
        }
        assert_eq!(rects[2].right(), 100.0);
    }

    #[test]
    fn max_depth_stops_recursion() {
        let mut tree = SizeTree::new("root", 10.0);
        let root = tree.root;
        let dir = tree.push(root, "dir", 10.0);
        let leaf = tree.push(dir, "leaf", 10.0);

        let config = exact().with_max_depth(1);
        let layout = layout_tree(&tree, 100.0, 100.0, &config).unwrap();
        assert!(layout.rect_of(dir).is_some());
        assert!(layout.rect_of(leaf).is_none());
    }

    #[test]
    fn rejects_invalid_container() {
        let tree = flat(&[1.0]);
        assert!(layout_tree(&tree, 0.0, 10.0, &LayoutConfig::default()).is_err());
        assert!(layout_tree(&tree, 10.0, f64::INFINITY, &LayoutConfig::default()).is_err());
    }

    #[test]
    fn subtree_layout_has_no_entry_for_its_own_node() {
        let tree = flat(&[6.0, 4.0]);
        let config = exact().with_min_area_fraction(0.0);
        let layout = LayoutEngine::new(&tree, &config).layout(tree.root, Rect::new(0.0, 0.0, 10.0, 10.0), 0);

        assert!(layout.rect_of(tree.root).is_none());
        assert_eq!(layout.len(), 2);
        assert!(layout.rects.iter().all(|r| r.parent.is_none() && r.depth == 1));
    }
}
