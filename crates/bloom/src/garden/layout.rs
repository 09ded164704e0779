//! Garden grid layout
//!
//! Computes where each flower sits on the garden canvas. Drawing is left to
//! the caller.

/// Source size of a flower image in pixels
pub const TILE_SIZE: u32 = 48;

/// Screen pixels per image pixel
pub const PIXEL_SCALE: u32 = 16;

/// Image pixels of padding around each flower
pub const PADDING: u32 = 2;

/// Ratio of grid cells that should hold a flower
pub const DENSITY: f64 = 0.6;

/// Share of the viewport width the canvas may use
const VIEWPORT_SHARE: f64 = 0.9;

/// Placement of one flower on the canvas, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Index of the entry in the garden listing
    pub index: usize,
    /// Column
    pub col: u32,
    /// Row
    pub row: u32,
    /// Left edge of the flower image
    pub x: u32,
    /// Top edge of the flower image
    pub y: u32,
    /// Drawn width and height of the flower image
    pub size: u32,
}

/// Grid layout of a garden
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GardenLayout {
    /// Number of columns
    pub cols: u32,
    /// Number of rows
    pub rows: u32,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// One tile per entry, in listing order
    pub tiles: Vec<Tile>,
}

impl GardenLayout {
    /// Lay out `count` flowers for a viewport `viewport_width` pixels wide
    pub fn compute(count: usize, viewport_width: u32) -> Self {
        let cell = TILE_SIZE * PIXEL_SCALE;

        let max_cols = ((f64::from(viewport_width) * VIEWPORT_SHARE) / f64::from(cell)).floor();
        let max_cols = (max_cols as u32).max(1);

        let wanted_cols = (count as f64 / DENSITY).sqrt().ceil() as u32;
        let cols = wanted_cols.clamp(1, max_cols);
        let rows = (count as u32).div_ceil(cols);

        let size = (TILE_SIZE - 2 * PADDING) * PIXEL_SCALE;
        let offset = PADDING * PIXEL_SCALE;

        let tiles = (0..count)
            .map(|index| {
                let col = index as u32 % cols;
                let row = index as u32 / cols;
                Tile {
                    index,
                    col,
                    row,
                    x: col * cell + offset,
                    y: row * cell + offset,
                    size,
                }
            })
            .collect();

        Self {
            cols,
            rows,
            width: cols * cell,
            height: rows * cell,
            tiles,
        }
    }
}
