use super::RectConsumer;
use crate::layout::Rect;
use crate::tree::arena::SizeNode;

/// Character-cell rasterizer for terminal previews of a layout.
///
/// Boxes are drawn in the order they are consumed, so children drawn after
/// their parent overwrite its interior.
pub struct AsciiCanvas {
    cols: usize,
    rows: usize,
    /// Layout units per column / row
    cell_w: f64,
    cell_h: f64,
    cells: Vec<char>,
}

impl AsciiCanvas {
    /// A `cols` x `rows` canvas covering a `width` x `height` layout box.
    pub fn new(cols: usize, rows: usize, width: f64, height: f64) -> Self {
        let (cols, rows) = (cols.max(1), rows.max(1));
        Self {
            cols,
            rows,
            cell_w: width / cols as f64,
            cell_h: height / rows as f64,
            cells: vec![' '; cols * rows],
        }
    }

    fn set(&mut self, col: usize, row: usize, ch: char) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = ch;
        }
    }

    /// Render the canvas as newline-separated rows.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in self.cells.chunks(self.cols) {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}

impl RectConsumer for AsciiCanvas {
    /// Whether the rectangle was large enough to appear on the canvas.
    type Handle = bool;

    fn consume(&mut self, node: &SizeNode, rect: Rect, _depth: u16) -> bool {
        let c0 = (rect.x / self.cell_w).round() as usize;
        let r0 = (rect.y / self.cell_h).round() as usize;
        let c1 = (rect.right() / self.cell_w).round() as usize;
        let r1 = (rect.bottom() / self.cell_h).round() as usize;
        if c1 <= c0 + 1 || r1 <= r0 + 1 {
            return false;
        }
        let (c1, r1) = (c1.min(self.cols) - 1, r1.min(self.rows) - 1);

        for row in r0..=r1 {
            for col in c0..=c1 {
                let edge_h = row == r0 || row == r1;
                let edge_v = col == c0 || col == c1;
                let ch = match (edge_h, edge_v) {
                    (true, true) => '+',
                    (true, false) => '-',
                    (false, true) => '|',
                    (false, false) => ' ',
                };
                self.set(col, row, ch);
            }
        }

        // Caption on the first interior row, clipped to the box.
        if r1 > r0 + 1 {
            let room = c1.saturating_sub(c0 + 1);
            for (i, ch) in node.label().chars().take(room).enumerate() {
                self.set(c0 + 1 + i, r0 + 1, ch);
            }
        }

        true
    }
}
