//! Turns UTF-16 text into glyph placements.
//!
//! Layout is split from drawing so the bidi and alignment rules can be checked without a
//! surface. Each line is placed on its own: it is measured, shifted for alignment,
//! squeezed to `max_width` if needed and then walked in visual order.

use crate::bidi::{self, Direction, VisualOrder};
use crate::GlyphTable;
use alloc::vec::Vec;
use embedded_graphics::geometry::Point;

const NEWLINE: u16 = b'\n' as u16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    /// `x` is where the line starts.
    #[default]
    Left,
    /// `x` is the middle of the line.
    Center,
    /// `x` is where the line ends.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintOptions {
    pub alignment: Alignment,
    /// Nonzero pixels are written as `intensity + palette_bank * 4`.
    pub palette_bank: u8,
    /// Lines wider than this are squeezed horizontally. 0 means no limit.
    pub max_width: u32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Lay out right to left even without any Hebrew in the text.
    pub rtl: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            alignment: Alignment::Left,
            palette_bank: 0,
            max_width: 0,
            scale_x: 1.0,
            scale_y: 1.0,
            rtl: false,
        }
    }
}

impl PrintOptions {
    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn palette_bank(mut self, palette_bank: u8) -> Self {
        self.palette_bank = palette_bank;
        self
    }

    pub fn max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }
}

/// One glyph to rasterize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub glyph: u16,
    /// Pen position. The glyph's left bearing is applied when it is drawn.
    pub origin: Point,
    pub scale_x: f32,
    pub scale_y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub glyphs: Vec<GlyphPlacement>,
    /// Pen position after the last glyph of the last line.
    pub end: Point,
}

/// Horizontal scale after squeezing a line of unscaled `width` into `max_width`.
///
/// Only ever shrinks.
pub fn effective_scale_x(width: u32, scale_x: f32, max_width: u32) -> f32 {
    if max_width == 0 || width == 0 || width as f32 * scale_x <= max_width as f32 {
        return scale_x;
    }
    scale_x.min(max_width as f32 / width as f32)
}

pub fn layout_text(
    table: &GlyphTable,
    text: &[u16],
    origin: Point,
    options: &PrintOptions,
) -> Layout {
    let direction = if options.rtl || bidi::contains_rtl(text) {
        Direction::Rtl
    } else {
        Direction::Ltr
    };
    let line_step = match options.alignment {
        Alignment::Left => table.height() as f32 * options.scale_y,
        Alignment::Center | Alignment::Right => table.height() as f32,
    };

    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen_y = origin.y as f32;
    let mut end = origin;

    for (line_number, line) in text.split(|&c| c == NEWLINE).enumerate() {
        if line_number > 0 {
            pen_y += line_step;
        }

        // the alignment shift uses the line as requested, before any squeeze
        let width = table.calc_width(line);
        let requested_width = width as f32 * options.scale_x;
        let mut pen_x = origin.x as f32
            - match options.alignment {
                Alignment::Left => 0.0,
                Alignment::Center => requested_width / 2.0,
                Alignment::Right => requested_width,
            };
        let scale_x = effective_scale_x(width, options.scale_x, options.max_width);

        for (index, glyph_direction) in VisualOrder::new(line, direction) {
            let c = match glyph_direction {
                Direction::Ltr => line[index],
                Direction::Rtl => bidi::mirror(line[index]),
            };
            let glyph = table.char_index(c);
            glyphs.push(GlyphPlacement {
                glyph,
                origin: Point::new(pen_x as i32, pen_y as i32),
                scale_x,
                scale_y: options.scale_y,
            });
            pen_x += table.advance(glyph) as f32 * scale_x;
        }

        end = Point::new(pen_x as i32, pen_y as i32);
    }

    Layout { glyphs, end }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_file::FontData;
    use alloc::string::String;

    /// Every glyph is 4 wide except digits which are 2, so positions are easy to read.
    fn table(codepoints: &[u16]) -> GlyphTable {
        let mut codepoints = codepoints.to_vec();
        codepoints.sort_unstable();
        let widths = codepoints
            .iter()
            .flat_map(|&c| {
                let advance = if (b'0' as u16..=b'9' as u16).contains(&c) { 2 } else { 4 };
                [0, 4, advance]
            })
            .collect();
        GlyphTable::from_font_data(FontData {
            tile_width: 4,
            tile_height: 8,
            tile_size: 8,
            tiles: vec![0; codepoints.len() * 8],
            widths,
            codepoints,
        })
    }

    fn ascii_table() -> GlyphTable {
        table(&(0x20u16..0x7F).collect::<Vec<_>>())
    }

    fn units(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    fn chars_at(table: &GlyphTable, layout: &Layout) -> Vec<(char, i32, i32)> {
        layout
            .glyphs
            .iter()
            .map(|g| {
                let c = table.codepoint(g.glyph).unwrap_or(0);
                (char::from_u32(c as u32).unwrap(), g.origin.x, g.origin.y)
            })
            .collect()
    }

    #[test]
    fn squeeze_only_shrinks() {
        assert_eq!(effective_scale_x(100, 1.0, 50), 0.5);
        assert_eq!(effective_scale_x(100, 1.0, 200), 1.0);
        assert_eq!(effective_scale_x(100, 1.0, 0), 1.0);
        assert_eq!(effective_scale_x(100, 2.0, 100), 1.0);
        assert_eq!(effective_scale_x(0, 1.5, 10), 1.5);
    }

    #[test]
    fn empty_text_places_nothing() {
        let table = ascii_table();
        let layout = layout_text(&table, &[], Point::new(3, 4), &PrintOptions::default());
        assert!(layout.glyphs.is_empty());
        assert_eq!(layout.end, Point::new(3, 4));
    }

    #[test]
    fn newline_returns_to_line_start() {
        let table = ascii_table();
        let layout = layout_text(
            &table,
            &units("AB\nCD"),
            Point::new(10, 20),
            &PrintOptions::default(),
        );
        assert_eq!(
            chars_at(&table, &layout),
            vec![('A', 10, 20), ('B', 14, 20), ('C', 10, 28), ('D', 14, 28)]
        );
        assert_eq!(layout.end, Point::new(18, 28));
    }

    #[test]
    fn newline_step_follows_vertical_scale_when_left_aligned() {
        let table = ascii_table();
        let options = PrintOptions::default().scale(1.0, 2.0);
        let layout = layout_text(&table, &units("A\nB"), Point::new(0, 0), &options);
        assert_eq!(layout.glyphs[1].origin, Point::new(0, 16));
    }

    #[test]
    fn center_and_right_align_each_line() {
        let table = ascii_table();
        let center = PrintOptions::default().aligned(Alignment::Center);
        let layout = layout_text(&table, &units("AB\nABCD"), Point::new(50, 0), &center);
        assert_eq!(layout.glyphs[0].origin, Point::new(46, 0));
        assert_eq!(layout.glyphs[2].origin, Point::new(42, 8));

        let right = PrintOptions::default().aligned(Alignment::Right).scale(2.0, 2.0);
        let layout = layout_text(&table, &units("AB\nA"), Point::new(50, 0), &right);
        assert_eq!(layout.glyphs[0].origin, Point::new(34, 0));
        assert_eq!(layout.glyphs[1].origin, Point::new(42, 0));
        // center and right step by the unscaled tile height
        assert_eq!(layout.glyphs[2].origin, Point::new(42, 8));
    }

    #[test]
    fn max_width_squeezes_line() {
        let table = ascii_table();
        let options = PrintOptions::default().max_width(8);
        let layout = layout_text(&table, &units("ABCD"), Point::new(0, 0), &options);
        assert!(layout.glyphs.iter().all(|g| g.scale_x == 0.5));
        let xs: Vec<i32> = layout.glyphs.iter().map(|g| g.origin.x).collect();
        assert_eq!(xs, vec![0, 2, 4, 6]);
    }

    #[test]
    fn alignment_shift_ignores_the_squeeze() {
        let table = ascii_table();
        let right = PrintOptions::default().aligned(Alignment::Right).max_width(8);
        let layout = layout_text(&table, &units("ABCD"), Point::new(40, 0), &right);
        let xs: Vec<i32> = layout.glyphs.iter().map(|g| g.origin.x).collect();
        assert_eq!(xs, vec![24, 26, 28, 30]);
        assert_eq!(layout.end, Point::new(32, 0));

        let center = PrintOptions::default().aligned(Alignment::Center).max_width(8);
        let layout = layout_text(&table, &units("ABCD"), Point::new(40, 0), &center);
        assert_eq!(layout.glyphs[0].origin, Point::new(32, 0));
        assert!(layout.glyphs.iter().all(|g| g.scale_x == 0.5));
    }

    #[test]
    fn rtl_lines_keep_their_order() {
        let mut codepoints: Vec<u16> = (0x20u16..0x7F).collect();
        codepoints.extend(0x5D0u16..=0x5EA);
        let table = table(&codepoints);
        let layout = layout_text(
            &table,
            &units("אב\nגד"),
            Point::new(0, 0),
            &PrintOptions::default(),
        );

        let drawn: Vec<(u16, i32, i32)> = layout
            .glyphs
            .iter()
            .map(|g| (table.codepoint(g.glyph).unwrap(), g.origin.x, g.origin.y))
            .collect();
        assert_eq!(
            drawn,
            vec![
                (0x5D1, 0, 0),
                (0x5D0, 4, 0),
                (0x5D3, 0, 8),
                (0x5D2, 4, 8),
            ]
        );
        assert_eq!(layout.end, Point::new(8, 8));
    }

    #[test]
    fn hebrew_switches_line_to_rtl() {
        let mut codepoints: Vec<u16> = (0x20u16..0x7F).collect();
        codepoints.extend(0x5D0u16..=0x5EA);
        let table = table(&codepoints);
        let text = units("שלום world שלום");
        let layout = layout_text(&table, &text, Point::new(0, 0), &PrintOptions::default());

        let drawn: Vec<u16> = layout
            .glyphs
            .iter()
            .map(|g| table.codepoint(g.glyph).unwrap())
            .collect();
        let expected: Vec<u16> = [14, 13, 12, 11, 10, 5, 6, 7, 8, 9, 4, 3, 2, 1, 0]
            .iter()
            .map(|&i| text[i])
            .collect();
        assert_eq!(drawn, expected);
        let xs: Vec<i32> = layout.glyphs.iter().map(|g| g.origin.x).collect();
        assert_eq!(xs, (0..15).map(|i| i * 4).collect::<Vec<_>>());
    }

    #[test]
    fn brackets_mirror_under_forced_rtl() {
        let table = ascii_table();
        let options = PrintOptions::default().rtl(true);
        let layout = layout_text(&table, &units("(text)"), Point::new(0, 0), &options);
        let drawn: String = chars_at(&table, &layout).iter().map(|&(c, _, _)| c).collect();
        // logical ')' drawn first as '(' and logical '(' drawn last as ')'
        assert_eq!(drawn, "(text)");
        assert_eq!(layout.glyphs[0].glyph, table.char_index(b'(' as u16));
        assert_eq!(layout.glyphs[5].glyph, table.char_index(b')' as u16));

        let ltr = layout_text(
            &table,
            &units("(text)"),
            Point::new(0, 0),
            &PrintOptions::default(),
        );
        assert_eq!(ltr.glyphs[0].glyph, table.char_index(b'(' as u16));
    }

    #[test]
    fn unknown_characters_use_question_mark() {
        let table = ascii_table();
        let layout = layout_text(&table, &[0x4E00], Point::new(0, 0), &PrintOptions::default());
        assert_eq!(layout.glyphs[0].glyph, table.char_index(b'?' as u16));
    }
}
