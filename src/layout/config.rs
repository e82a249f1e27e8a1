use crate::error::{LayoutError, Result};

/// Configuration for treemap layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Content insets applied before laying out a node's children: [top, right, bottom, left]
    pub padding: [f64; 4],
    /// Gap subtracted from every child's emitted width and height
    pub spacing: f64,
    /// Children are skipped when the content area is narrower than this
    pub min_width: f64,
    /// Children are skipped when the content area is shorter than this
    pub min_height: f64,
    /// Strips carrying less than this share of the parent's size end the layout of that parent
    pub min_area_fraction: f64,
    /// Border width on each edge of a child box, removed before its own children are laid out
    pub border: f64,
    /// Round emitted edges to whole units
    pub pixel_snap: bool,
    /// Maximum recursion depth
    pub max_depth: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: [0.0; 4],
            spacing: 0.0,
            min_width: 0.0,
            min_height: 0.0,
            min_area_fraction: 0.1,
            border: 1.0,
            pixel_snap: true,
            max_depth: u16::MAX,
        }
    }
}

impl LayoutConfig {
    pub fn with_padding(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.padding = [top, right, bottom, left];
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_min_size(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    pub fn with_min_area_fraction(mut self, fraction: f64) -> Self {
        self.min_area_fraction = fraction;
        self
    }

    pub fn with_border(mut self, border: f64) -> Self {
        self.border = border;
        self
    }

    pub fn with_pixel_snap(mut self, pixel_snap: bool) -> Self {
        self.pixel_snap = pixel_snap;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u16) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Every numeric field must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let [top, right, bottom, left] = self.padding;
        let fields = [
            ("padding.top", top),
            ("padding.right", right),
            ("padding.bottom", bottom),
            ("padding.left", left),
            ("spacing", self.spacing),
            ("min_width", self.min_width),
            ("min_height", self.min_height),
            ("min_area_fraction", self.min_area_fraction),
            ("border", self.border),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidInput(format!(
                    "config {name} = {value} must be finite and non-negative"
                )));
            }
        }

        Ok(())
    }
}
