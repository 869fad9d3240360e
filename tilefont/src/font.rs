use crate::font_file::FontParseError;
use crate::layout::{self, Layout, PrintOptions};
use crate::surface::PaletteIndex;
use crate::{raster, utf16, GlyphTable};
use embedded_graphics::{draw_target::DrawTarget, geometry::Point};

/// A tile font ready to print with.
///
/// Every `print*` method lays the text out, draws each glyph that fits onto `target` and
/// returns the pen position after the last glyph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Font {
    table: GlyphTable,
}

impl Font {
    pub fn new(table: GlyphTable) -> Self {
        Self { table }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, FontParseError> {
        Ok(Self::new(GlyphTable::parse(data)?))
    }

    /// See [`GlyphTable::load`].
    #[cfg(feature = "std")]
    pub fn load<P: AsRef<std::path::Path>>(paths: &[P]) -> Self {
        Self::new(GlyphTable::load(paths))
    }

    pub fn table(&self) -> &GlyphTable {
        &self.table
    }

    /// Line height in pixels.
    pub fn height(&self) -> u8 {
        self.table.height()
    }

    pub fn calc_width(&self, text: &str) -> u32 {
        self.table.calc_width(&utf16::utf8_to_utf16(text.as_bytes()))
    }

    pub fn calc_width_utf16(&self, text: &[u16]) -> u32 {
        self.table.calc_width(text)
    }

    pub fn layout(&self, text: &[u16], position: Point, options: &PrintOptions) -> Layout {
        layout::layout_text(&self.table, text, position, options)
    }

    pub fn print<D>(
        &self,
        text: &str,
        position: Point,
        options: &PrintOptions,
        target: &mut D,
    ) -> Result<Point, D::Error>
    where
        D: DrawTarget<Color = PaletteIndex>,
    {
        self.print_utf16(&utf16::utf8_to_utf16(text.as_bytes()), position, options, target)
    }

    pub fn print_utf16<D>(
        &self,
        text: &[u16],
        position: Point,
        options: &PrintOptions,
        target: &mut D,
    ) -> Result<Point, D::Error>
    where
        D: DrawTarget<Color = PaletteIndex>,
    {
        let layout = self.layout(text, position, options);
        raster::draw_glyphs(&self.table, &layout.glyphs, options.palette_bank, target)?;
        Ok(layout.end)
    }

    /// Prints `value` in decimal.
    pub fn print_value<D>(
        &self,
        value: i64,
        position: Point,
        options: &PrintOptions,
        target: &mut D,
    ) -> Result<Point, D::Error>
    where
        D: DrawTarget<Color = PaletteIndex>,
    {
        self.print_utf16(&utf16::decimal(value), position, options, target)
    }
}

impl From<GlyphTable> for Font {
    fn from(table: GlyphTable) -> Self {
        Self::new(table)
    }
}
