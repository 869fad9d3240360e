//! Palette indexed destinations for text.
//!
//! Text is drawn as palette indices: two bits of glyph intensity plus a palette bank.
//! [`IndexedFramebuffer`] stores those indices directly, for sprite buffers and the
//! full screen text layer. [`Palette`] resolves them to real colours on any other
//! `DrawTarget`.

use alloc::vec::Vec;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    pixelcolor::{
        raw::{RawData, RawU8},
        PixelColor,
    },
    primitives::{PointsIter, Rectangle},
    Pixel,
};

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 192;

/// Entry in an indexed colour palette. Index 0 is transparent for text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaletteIndex(pub u8);

impl PaletteIndex {
    pub const TRANSPARENT: Self = Self(0);

    /// Colour for a glyph pixel of `intensity` (1 to 3) in `bank`. Wraps past 255.
    pub fn from_intensity(intensity: u8, bank: u8) -> Self {
        Self(intensity.wrapping_add(bank.wrapping_mul(4)))
    }

    pub fn bank(self) -> u8 {
        self.0 / 4
    }

    pub fn intensity(self) -> u8 {
        self.0 % 4
    }
}

impl PixelColor for PaletteIndex {
    type Raw = RawU8;
}

impl From<RawU8> for PaletteIndex {
    fn from(raw: RawU8) -> Self {
        Self(raw.into_inner())
    }
}

impl From<PaletteIndex> for RawU8 {
    fn from(color: PaletteIndex) -> Self {
        RawU8::new(color.0)
    }
}

/// Byte per pixel framebuffer of palette indices.
#[derive(Clone, PartialEq, Eq)]
pub struct IndexedFramebuffer {
    /// Row major palette indices
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl core::fmt::Debug for IndexedFramebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IndexedFramebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl IndexedFramebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; width * height],
            width,
            height,
        }
    }

    /// The 256x192 background layer.
    pub fn screen() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn index_of(&self, point: Point) -> Option<usize> {
        let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
            return None;
        };
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Out of bounds writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, point: Point, color: PaletteIndex) {
        if let Some(index) = self.index_of(point) {
            self.data[index] = color.0;
        }
    }

    #[inline]
    pub fn get_pixel(&self, point: Point) -> Option<PaletteIndex> {
        self.index_of(point).map(|index| PaletteIndex(self.data[index]))
    }

    pub fn clear(&mut self, color: PaletteIndex) {
        self.data.fill(color.0);
    }

    pub fn fill_rect(&mut self, rect: Rectangle, color: PaletteIndex) {
        let start_x = rect.top_left.x.max(0) as usize;
        let start_y = rect.top_left.y.max(0) as usize;
        let end_x = (rect.top_left.x + rect.size.width as i32).clamp(0, self.width as i32) as usize;
        let end_y = (rect.top_left.y + rect.size.height as i32).clamp(0, self.height as i32) as usize;

        for y in start_y..end_y {
            let row_start = y * self.width + start_x;
            let row_end = y * self.width + end_x;
            if row_start < row_end {
                self.data[row_start..row_end].fill(color.0);
            }
        }
    }

    pub fn rows(&self) -> core::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.width.max(1))
    }

    /// Copies the whole buffer onto `target` in one go, at the origin.
    pub fn flush_to<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = PaletteIndex>,
    {
        let area = Rectangle::new(Point::zero(), self.size());
        target.fill_contiguous(&area, self.data.iter().map(|&value| PaletteIndex(value)))
    }
}

impl OriginDimensions for IndexedFramebuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for IndexedFramebuffer {
    type Color = PaletteIndex;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // colors run over the whole area, including parts that are off the buffer
        let points = area.points();
        for (point, color) in points.zip(colors) {
            self.set_pixel(point, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_rect(*area, color);
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        IndexedFramebuffer::clear(self, color);
        Ok(())
    }
}

/// Draws palette indices onto a target with real colours.
///
/// Indices past the end of `colors` are not drawn.
pub struct Palette<'c, D>
where
    D: DrawTarget,
{
    target: D,
    colors: &'c [D::Color],
}

impl<'c, D> Palette<'c, D>
where
    D: DrawTarget,
{
    pub fn new(target: D, colors: &'c [D::Color]) -> Self {
        Self { target, colors }
    }

    pub fn inner(&self) -> &D {
        &self.target
    }

    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }

    fn lookup(&self, index: PaletteIndex) -> Option<D::Color> {
        self.colors.get(index.0 as usize).copied()
    }
}

impl<D> Dimensions for Palette<'_, D>
where
    D: DrawTarget,
{
    fn bounding_box(&self) -> Rectangle {
        self.target.bounding_box()
    }
}

impl<D> DrawTarget for Palette<'_, D>
where
    D: DrawTarget,
{
    type Color = PaletteIndex;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let colors = self.colors;
        self.target.draw_iter(
            pixels
                .into_iter()
                .filter_map(|Pixel(point, index)| {
                    colors.get(index.0 as usize).map(|&color| Pixel(point, color))
                }),
        )
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        match self.lookup(color) {
            Some(color) => self.target.clear(color),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_and_bank() {
        let color = PaletteIndex::from_intensity(3, 2);
        assert_eq!(color, PaletteIndex(11));
        assert_eq!(color.bank(), 2);
        assert_eq!(color.intensity(), 3);
        assert_eq!(PaletteIndex::from_intensity(1, 64), PaletteIndex(1));
    }

    #[test]
    fn fill_rect_clamps_to_buffer() {
        let mut fb = IndexedFramebuffer::new(4, 4);
        fb.fill_rect(Rectangle::new(Point::new(-2, 2), Size::new(4, 10)), PaletteIndex(5));
        assert_eq!(fb.get_pixel(Point::new(1, 3)), Some(PaletteIndex(5)));
        assert_eq!(fb.get_pixel(Point::new(2, 3)), Some(PaletteIndex(0)));
        assert_eq!(fb.get_pixel(Point::new(0, 1)), Some(PaletteIndex(0)));
    }

    #[test]
    fn flush_copies_whole_layer() {
        let mut layer = IndexedFramebuffer::new(3, 2);
        layer.set_pixel(Point::new(2, 1), PaletteIndex(7));
        let mut screen = IndexedFramebuffer::new(5, 5);
        screen.clear(PaletteIndex(1));
        layer.flush_to(&mut screen).unwrap();
        assert_eq!(screen.get_pixel(Point::new(2, 1)), Some(PaletteIndex(7)));
        assert_eq!(screen.get_pixel(Point::new(0, 0)), Some(PaletteIndex(0)));
        assert_eq!(screen.get_pixel(Point::new(3, 0)), Some(PaletteIndex(1)));
    }

    #[test]
    fn palette_skips_unknown_indices() {
        let colors = [PaletteIndex(0), PaletteIndex(9)];
        let mut palette = Palette::new(IndexedFramebuffer::new(2, 1), &colors);
        palette
            .draw_iter([
                Pixel(Point::new(0, 0), PaletteIndex(1)),
                Pixel(Point::new(1, 0), PaletteIndex(4)),
            ])
            .unwrap();
        let fb = palette.into_inner();
        assert_eq!(fb.data(), &[9, 0]);
    }
}
