/// Diagnostic tool to verify the scan → tree → layout pipeline
use squarify_rs::layout::{layout_tree, LayoutConfig};
use squarify_rs::render::{ascii::AsciiCanvas, emit};
use squarify_rs::scanner;
use squarify_rs::tree;
use std::path::PathBuf;
use std::sync::mpsc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("squarify_rs=debug".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let scan_path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let width: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1920.0);
    let height: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1080.0);

    println!("=== DIAGNOSTIC: Tree → Layout Pipeline ===");
    println!("Scanning: {}", scan_path.display());

    // Scan
    let (tx, _rx) = mpsc::channel();
    let entries = scanner::scan(&scan_path, tx)?;
    println!("\n[1] Scan completed: {} entries", entries.len());

    // Build tree
    let tree = tree::build_tree(&entries);
    let root_node = tree.get(tree.root);
    println!("\n[2] Tree built: {} nodes", tree.len());
    println!("    Root: '{}' (size={:.2} MB)", root_node.label(), root_node.size / 1_048_576.0);

    println!("\n[3] Top 10 children of root:");
    for (i, child_id) in tree.children(tree.root).take(10).enumerate() {
        let child = tree.get(child_id);
        println!(
            "    [{}] '{}' - {:.2} MB (children={})",
            i,
            child.label(),
            child.size / 1_048_576.0,
            tree.children(child_id).count()
        );
    }

    // Compute layout
    let config = LayoutConfig::default()
        .with_padding(14.0, 1.0, 1.0, 1.0)
        .with_spacing(1.0)
        .with_min_size(60.0, 40.0);
    let layout = layout_tree(&tree, width, height, &config)?;
    println!("\n[4] Layout computed: {} rectangles", layout.len());

    let absolute = layout.absolute_rects();
    let mut by_area: Vec<usize> = (1..layout.len()).collect();
    by_area.sort_by(|&a, &b| absolute[b].area().total_cmp(&absolute[a].area()));

    println!("\n[5] Top 10 largest rectangles by area:");
    for (i, &idx) in by_area.iter().take(10).enumerate() {
        let entry = &layout.rects[idx];
        let rect = absolute[idx];
        println!(
            "    [{}] '{}' - {:.0}x{:.0} ({:.0}px²) at ({:.0}, {:.0}) depth {} - path {:?}",
            i,
            tree.build_path(entry.node),
            rect.width,
            rect.height,
            rect.area(),
            rect.x,
            rect.y,
            entry.depth,
            tree.path_of(entry.node)
        );
    }

    println!("\n[6] Coverage:");
    let top_level: f64 = layout.children_of(0).map(|i| absolute[i].area()).sum();
    let viewport_area = width * height;
    println!("    Top-level rect area: {:.0}px²", top_level);
    println!("    Viewport area:       {:.0}px²", viewport_area);
    println!("    Coverage: {:.1}%", top_level / viewport_area * 100.0);
    println!(
        "    Placed {} of {} nodes ({} truncated or too small)",
        layout.len(),
        tree.len(),
        tree.len() - layout.len()
    );

    println!("\n[7] Preview:");
    let mut canvas = AsciiCanvas::new(100, 30, width, height);
    let drawn = emit(&layout, &tree, &mut canvas).into_iter().filter(|&d| d).count();
    print!("{}", canvas.to_text());
    println!("    ({} boxes visible at this resolution)", drawn);

    Ok(())
}
