/// Layout validation tool
/// Checks: Scanner → Tree → Layout invariants without rendering
use squarify_rs::layout::{layout_tree, Layout, LayoutConfig, Rect};
use squarify_rs::scanner;
use squarify_rs::tree::{self, arena::SizeTree};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

/// Slack for unsnapped float comparisons, in layout units.
const EPS: f64 = 1e-6;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("squarify_rs=info".parse()?),
        )
        .init();

    let scan_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("┌─ STAGE 1: SCAN ─────────────────────────────────────────────┐");
    let (tx, _rx) = mpsc::channel();
    let start = Instant::now();
    let entries = scanner::scan(&scan_path, tx)?;
    println!("  ✓ {} entries in {:.2}s", entries.len(), start.elapsed().as_secs_f64());
    println!("└────────────────────────────────────────────────────────────┘");

    println!("┌─ STAGE 2: TREE ─────────────────────────────────────────────┐");
    let tree = tree::build_tree(&entries);
    tree::validate(&tree)?;
    println!("  ✓ {} nodes, root size {}", tree.len(), tree.get(tree.root).size);
    println!("└────────────────────────────────────────────────────────────┘");

    println!("┌─ STAGE 3: LAYOUT ───────────────────────────────────────────┐");
    let config = LayoutConfig::default()
        .with_padding(14.0, 1.0, 1.0, 1.0)
        .with_pixel_snap(false);
    let start = Instant::now();
    let layout = layout_tree(&tree, 1920.0, 1080.0, &config)?;
    println!("  ✓ {} rects in {:.2}ms", layout.len(), start.elapsed().as_secs_f64() * 1000.0);

    let again = layout_tree(&tree, 1920.0, 1080.0, &config)?;
    report("deterministic", if layout == again { 0 } else { 1 });
    report("containment", check_containment(&layout, &config));
    report("strip area", check_area(&tree, &layout, &config));
    report("address round-trip", check_addresses(&tree, &layout));
    println!("└────────────────────────────────────────────────────────────┘");

    Ok(())
}

fn report(name: &str, failures: usize) {
    if failures == 0 {
        println!("  ✓ {name}");
    } else {
        println!("  ✗ {name}: {failures} violation(s)");
    }
}

/// The box a parent lays its children into, in the parent's own frame.
fn content_of(layout: &Layout, index: usize, config: &LayoutConfig) -> Rect {
    let entry = &layout.rects[index];
    let frame = match entry.parent {
        None => entry.rect,
        Some(_) => Rect::new(0.0, 0.0, entry.rect.width, entry.rect.height).inset([config.border; 4]),
    };
    frame.inset(config.padding)
}

fn check_containment(layout: &Layout, config: &LayoutConfig) -> usize {
    let mut failures = 0;
    for (i, entry) in layout.rects.iter().enumerate() {
        let Some(parent) = entry.parent else { continue };
        let content = content_of(layout, parent, config);
        let r = entry.rect;
        if r.x < content.x - EPS
            || r.y < content.y - EPS
            || r.right() > content.right() + EPS
            || r.bottom() > content.bottom() + EPS
        {
            if failures < 5 {
                println!("  ✗ rect {i} {r:?} escapes parent content {content:?}");
            }
            failures += 1;
        }
    }
    failures
}

fn check_area(tree: &SizeTree, layout: &Layout, config: &LayoutConfig) -> usize {
    let mut failures = 0;
    for (i, entry) in layout.rects.iter().enumerate() {
        let children: Vec<usize> = layout.children_of(i).collect();
        if children.is_empty() {
            continue;
        }
        let content = content_of(layout, i, config);
        let placed: f64 = children.iter().map(|&c| tree.get(layout.rects[c].node).size).sum();
        let expected = placed / tree.get(entry.node).size * content.area();
        let actual: f64 = children.iter().map(|&c| layout.rects[c].rect.area()).sum();
        if (expected - actual).abs() > expected.max(1.0) * 1e-6 {
            if failures < 5 {
                println!("  ✗ children of '{}': area {actual} != {expected}", tree.build_path(entry.node));
            }
            failures += 1;
        }
    }
    failures
}

fn check_addresses(tree: &SizeTree, layout: &Layout) -> usize {
    layout
        .rects
        .iter()
        .filter(|entry| {
            let path = tree.path_of(entry.node);
            !matches!(layout.rect_at(tree, &path), Ok(Some(found)) if found.node == entry.node)
        })
        .count()
}
