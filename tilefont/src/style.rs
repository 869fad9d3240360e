//! `embedded-graphics` text style for tile fonts.
use crate::layout::{effective_scale_x, Alignment, PrintOptions};
use crate::surface::PaletteIndex;
use crate::{raster, utf16, Font};
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    primitives::Rectangle,
    text::{
        renderer::{CharacterStyle, TextMetrics, TextRenderer},
        Baseline,
    },
};

/// Text style that draws `embedded_graphics::text::Text` with a [`Font`].
///
/// `Text` does its own line breaking and alignment, so lines are always laid out from
/// the left here. Bidi ordering, mirroring, scaling and `max_width` still apply per line.
#[derive(Debug, Clone, Copy)]
pub struct TileTextStyle<'a> {
    pub font: &'a Font,
    pub options: PrintOptions,
}

impl<'a> TileTextStyle<'a> {
    pub fn new(font: &'a Font) -> Self {
        Self {
            font,
            options: PrintOptions::default(),
        }
    }

    pub fn with_options(font: &'a Font, options: PrintOptions) -> Self {
        Self { font, options }
    }

    pub fn with_palette_bank(mut self, palette_bank: u8) -> Self {
        self.options.palette_bank = palette_bank;
        self
    }

    fn scaled_height(&self) -> u32 {
        let height = (self.font.height() as f32 * self.options.scale_y) as u32;
        height.min(i32::MAX as u32)
    }

    fn baseline_offset(&self, baseline: Baseline) -> i32 {
        let height = self.scaled_height() as i32;
        match baseline {
            Baseline::Top => 0,
            Baseline::Bottom | Baseline::Alphabetic => -height,
            Baseline::Middle => -(height / 2),
        }
    }

    fn line_options(&self) -> PrintOptions {
        self.options.aligned(Alignment::Left)
    }
}

impl TextRenderer for TileTextStyle<'_> {
    type Color = PaletteIndex;

    fn draw_string<D>(
        &self,
        text: &str,
        position: Point,
        baseline: Baseline,
        target: &mut D,
    ) -> Result<Point, D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        let origin = position + Point::new(0, self.baseline_offset(baseline));
        let units = utf16::utf8_to_utf16(text.as_bytes());
        let options = self.line_options();
        let layout = self.font.layout(&units, origin, &options);
        raster::draw_glyphs(self.font.table(), &layout.glyphs, options.palette_bank, target)?;
        Ok(Point::new(layout.end.x, position.y))
    }

    fn draw_whitespace<D>(
        &self,
        width: u32,
        position: Point,
        _baseline: Baseline,
        _target: &mut D,
    ) -> Result<Point, D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        Ok(Point::new(position.x + width as i32, position.y))
    }

    fn measure_string(&self, text: &str, position: Point, baseline: Baseline) -> TextMetrics {
        let width = self.font.calc_width(text);
        let scale_x = effective_scale_x(width, self.options.scale_x, self.options.max_width);
        let scaled_width = ((width as f32 * scale_x) as u32).min(i32::MAX as u32);
        let top_left = position + Point::new(0, self.baseline_offset(baseline));

        TextMetrics {
            bounding_box: Rectangle::new(top_left, Size::new(scaled_width, self.scaled_height())),
            next_position: Point::new(position.x.saturating_add(scaled_width as i32), position.y),
        }
    }

    fn line_height(&self) -> u32 {
        self.scaled_height()
    }
}

impl CharacterStyle for TileTextStyle<'_> {
    type Color = PaletteIndex;

    /// Only the palette bank of `text_color` is used.
    fn set_text_color(&mut self, text_color: Option<Self::Color>) {
        if let Some(color) = text_color {
            self.options.palette_bank = color.bank();
        }
    }
}
