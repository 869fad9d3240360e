//! Glyph rasterization onto palette indexed targets.

use crate::layout::GlyphPlacement;
use crate::surface::PaletteIndex;
use crate::GlyphTable;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, Point, Size},
    primitives::Rectangle,
    Pixel,
};

/// Intensity (0 to 3) of the pixel at `row`, `col` of a packed 2bpp tile.
///
/// Pixels are row major, four to a byte, leftmost pixel in the high bits. Anything past
/// the end of `tile` reads as 0.
pub fn unpack_2bpp(tile: &[u8], tile_width: u8, row: u32, col: u32) -> u8 {
    let pixel = (row * tile_width as u32 + col) as usize;
    tile.get(pixel / 4)
        .map_or(0, |byte| (byte >> ((3 - pixel % 4) * 2)) & 0b11)
}

fn is_unscaled(placement: &GlyphPlacement) -> bool {
    placement.scale_x == 1.0 && placement.scale_y == 1.0
}

/// Number of destination pixels covering `extent` source pixels at `scale`.
fn scaled_extent(extent: u8, scale: f32) -> u32 {
    let exact = extent as f32 * scale;
    if exact <= 0.0 {
        return 0;
    }
    // `as` saturates, so huge and infinite scales end up at u32::MAX
    let whole = exact as u32;
    if (whole as f32) < exact {
        whole.saturating_add(1)
    } else {
        whole
    }
}

/// Area of the destination a placed glyph writes to, left bearing included.
pub fn glyph_area(table: &GlyphTable, placement: &GlyphPlacement) -> Rectangle {
    let left = table.glyph_width(placement.glyph).left as i32;
    let size = if is_unscaled(placement) {
        Size::new(table.tile_width() as u32, table.height() as u32)
    } else {
        Size::new(
            scaled_extent(table.tile_width(), placement.scale_x),
            scaled_extent(table.height(), placement.scale_y),
        )
    };
    let top_left = Point::new(placement.origin.x.saturating_add(left), placement.origin.y);
    Rectangle::new(top_left, size)
}

/// Whether `area` is non-empty and lies entirely inside `bounds`.
///
/// Worked out in `i64` since scaled areas can reach past `i32::MAX`.
fn contained(area: &Rectangle, bounds: &Rectangle) -> bool {
    let span = |start: i32, length: u32| (start as i64, start as i64 + length as i64);
    let (left, right) = span(area.top_left.x, area.size.width);
    let (top, bottom) = span(area.top_left.y, area.size.height);
    let (min_x, max_x) = span(bounds.top_left.x, bounds.size.width);
    let (min_y, max_y) = span(bounds.top_left.y, bounds.size.height);

    let empty = area.size.width == 0 || area.size.height == 0;
    !empty && left >= min_x && right <= max_x && top >= min_y && bottom <= max_y
}

/// Non-transparent pixels of one placed glyph, nearest neighbour sampled when scaled.
pub struct TilePixels<'a> {
    tile: &'a [u8],
    tile_width: u8,
    tile_height: u8,
    scale_x: f32,
    scale_y: f32,
    unscaled: bool,
    area: Rectangle,
    palette_bank: u8,
    x: u32,
    y: u32,
}

impl<'a> TilePixels<'a> {
    pub fn new(table: &'a GlyphTable, placement: &GlyphPlacement, palette_bank: u8) -> Self {
        let mut area = glyph_area(table, placement);
        if area.size.width == 0 {
            area.size.height = 0;
        }
        Self {
            tile: table.tile(placement.glyph),
            tile_width: table.tile_width(),
            tile_height: table.height(),
            scale_x: placement.scale_x,
            scale_y: placement.scale_y,
            unscaled: is_unscaled(placement),
            area,
            palette_bank,
            x: 0,
            y: 0,
        }
    }

    fn source(&self, x: u32, y: u32) -> (u32, u32) {
        if self.unscaled {
            return (y, x);
        }
        let last_row = self.tile_height.saturating_sub(1) as u32;
        let last_col = self.tile_width.saturating_sub(1) as u32;
        let row = ((y as f32 / self.scale_y) as u32).min(last_row);
        let col = ((x as f32 / self.scale_x) as u32).min(last_col);
        (row, col)
    }
}

impl Iterator for TilePixels<'_> {
    type Item = Pixel<PaletteIndex>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.y < self.area.size.height {
            let (x, y) = (self.x, self.y);

            self.x += 1;
            if self.x >= self.area.size.width {
                self.x = 0;
                self.y += 1;
            }

            let (row, col) = self.source(x, y);
            let intensity = unpack_2bpp(self.tile, self.tile_width, row, col);
            if intensity > 0 {
                let point = self.area.top_left + Point::new(x as i32, y as i32);
                return Some(Pixel(
                    point,
                    PaletteIndex::from_intensity(intensity, self.palette_bank),
                ));
            }
        }
        None
    }
}

/// Draws one glyph. Glyphs that don't fit entirely inside the target are skipped and
/// `Ok(false)` is returned.
pub fn draw_glyph<D>(
    table: &GlyphTable,
    placement: &GlyphPlacement,
    palette_bank: u8,
    target: &mut D,
) -> Result<bool, D::Error>
where
    D: DrawTarget<Color = PaletteIndex>,
{
    let area = glyph_area(table, placement);
    if !contained(&area, &target.bounding_box()) {
        return Ok(false);
    }

    target.draw_iter(TilePixels::new(table, placement, palette_bank))?;
    Ok(true)
}

/// Draws every placement, returning how many glyphs were not clipped.
pub fn draw_glyphs<D>(
    table: &GlyphTable,
    placements: &[GlyphPlacement],
    palette_bank: u8,
    target: &mut D,
) -> Result<usize, D::Error>
where
    D: DrawTarget<Color = PaletteIndex>,
{
    let mut drawn = 0;
    for placement in placements {
        if draw_glyph(table, placement, palette_bank, target)? {
            drawn += 1;
        }
    }

    #[cfg(feature = "tracing")]
    if drawn < placements.len() {
        tracing::event!(
            tracing::Level::TRACE,
            clipped = placements.len() - drawn,
            "glyphs outside the target were skipped"
        );
    }
    Ok(drawn)
}
