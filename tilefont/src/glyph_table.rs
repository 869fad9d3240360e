use crate::font_file::{self, FontData, FontParseError, WIDTH_RECORD_SIZE};
use alloc::vec::Vec;

/// Width record of a glyph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphWidth {
    /// Pixels between the pen position and the left edge of the tile.
    pub left: i8,
    /// Stored by the format but not used for layout.
    pub width: u8,
    /// How far to move the pen after drawing.
    pub advance: u8,
}

/// Glyph store for a tile font: packed 2bpp tiles, width records and the sorted map from
/// glyph index to character.
///
/// A table that failed to load is simply empty. Every lookup on it resolves to glyph 0,
/// every width to 0 and every tile to an empty slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphTable {
    tile_width: u8,
    tile_height: u8,
    tile_size: u16,
    fallback: u16,
    tiles: Vec<u8>,
    widths: Vec<u8>,
    codepoints: Vec<u16>,
}

impl GlyphTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse(data: &[u8]) -> Result<Self, FontParseError> {
        Ok(Self::from_font_data(font_file::parse(data)?))
    }

    pub fn from_font_data(data: FontData) -> Self {
        let mut table = Self {
            tile_width: data.tile_width,
            tile_height: data.tile_height,
            tile_size: data.tile_size,
            fallback: 0,
            tiles: data.tiles,
            widths: data.widths,
            codepoints: data.codepoints,
        };
        table.fallback = table.char_index(u16::from(b'?'));
        table
    }

    /// Loads the first of `paths` that can be read, highest priority first.
    ///
    /// Never fails. If no path can be read, or the file that was read doesn't parse, the
    /// table is empty.
    #[cfg(feature = "std")]
    pub fn load<P: AsRef<std::path::Path>>(paths: &[P]) -> Self {
        for path in paths {
            let path = path.as_ref();
            let data = match std::fs::read(path) {
                Ok(data) => data,
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::event!(
                        tracing::Level::DEBUG,
                        path = %path.display(),
                        error = %_e,
                        "font candidate not readable"
                    );
                    continue;
                }
            };

            return match Self::parse(&data) {
                Ok(table) => {
                    #[cfg(feature = "tracing")]
                    tracing::event!(
                        tracing::Level::INFO,
                        path = %path.display(),
                        glyphs = table.glyph_count(),
                        tile_width = table.tile_width,
                        tile_height = table.tile_height,
                        "loaded font"
                    );
                    table
                }
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::event!(
                        tracing::Level::WARN,
                        path = %path.display(),
                        error = %_e,
                        "font file is malformed, using an empty glyph table"
                    );
                    Self::empty()
                }
            };
        }

        #[cfg(feature = "tracing")]
        tracing::event!(
            tracing::Level::WARN,
            candidates = paths.len(),
            "no font file could be opened, using an empty glyph table"
        );
        Self::empty()
    }

    /// Glyph index drawing `c`, or the `'?'` glyph when the font doesn't have it.
    pub fn char_index(&self, c: u16) -> u16 {
        match self.codepoints.binary_search(&c) {
            Ok(index) => u16::try_from(index).unwrap_or(self.fallback),
            Err(_) => self.fallback,
        }
    }

    /// The character a glyph is mapped to, if the glyph exists.
    pub fn codepoint(&self, glyph: u16) -> Option<u16> {
        self.codepoints.get(glyph as usize).copied()
    }

    pub fn glyph_width(&self, glyph: u16) -> GlyphWidth {
        let start = glyph as usize * WIDTH_RECORD_SIZE;
        match self.widths.get(start..start + WIDTH_RECORD_SIZE) {
            Some(&[left, width, advance]) => GlyphWidth {
                left: left as i8,
                width,
                advance,
            },
            _ => GlyphWidth::default(),
        }
    }

    pub fn advance(&self, glyph: u16) -> u8 {
        self.glyph_width(glyph).advance
    }

    /// Packed tile bytes for `glyph`. Empty if the glyph doesn't exist.
    pub fn tile(&self, glyph: u16) -> &[u8] {
        let size = self.tile_size as usize;
        let start = glyph as usize * size;
        self.tiles.get(start..start + size).unwrap_or(&[])
    }

    /// Unscaled width in pixels of `text`: the sum of every code unit's advance.
    pub fn calc_width(&self, text: &[u16]) -> u32 {
        text.iter()
            .map(|&c| u32::from(self.advance(self.char_index(c))))
            .sum()
    }

    pub fn height(&self) -> u8 {
        self.tile_height
    }

    pub fn tile_width(&self) -> u8 {
        self.tile_width
    }

    pub fn tile_size(&self) -> u16 {
        self.tile_size
    }

    pub fn fallback(&self) -> u16 {
        self.fallback
    }

    pub fn glyph_count(&self) -> usize {
        self.codepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(codepoints: &[u16]) -> GlyphTable {
        let count = codepoints.len();
        GlyphTable::from_font_data(FontData {
            tile_width: 4,
            tile_height: 4,
            tile_size: 4,
            tiles: vec![0; count * 4],
            widths: (0..count).flat_map(|i| [0, 4, i as u8 + 1]).collect(),
            codepoints: codepoints.to_vec(),
        })
    }

    #[test]
    fn empty_table_resolves_everything_to_glyph_zero() {
        let table = GlyphTable::empty();
        assert_eq!(table.char_index(u16::from(b'A')), 0);
        assert_eq!(table.char_index(0), 0);
        assert_eq!(table.glyph_width(0), GlyphWidth::default());
        assert!(table.tile(0).is_empty());
        assert_eq!(table.calc_width(&[0x41, 0x42]), 0);
    }

    #[test]
    fn single_entry() {
        let table = table_with(&[0x41]);
        assert_eq!(table.char_index(0x41), 0);
        assert_eq!(table.char_index(0x40), 0);
        assert_eq!(table.char_index(0x42), 0);
    }

    #[test]
    fn boundaries_and_gaps() {
        let table = table_with(&[0x20, 0x3F, 0x41, 0x43, 0x5D0]);
        let question = 1;
        assert_eq!(table.fallback(), question);
        assert_eq!(table.char_index(0x20), 0);
        assert_eq!(table.char_index(0x5D0), 4);
        assert_eq!(table.char_index(0x41), 2);
        assert_eq!(table.char_index(0x43), 3);
        // between entries, below the first, above the last
        assert_eq!(table.char_index(0x42), question);
        assert_eq!(table.char_index(0x10), question);
        assert_eq!(table.char_index(0xFFFF), question);
    }

    #[test]
    fn missing_question_mark_falls_back_to_zero() {
        let table = table_with(&[0x41, 0x42]);
        assert_eq!(table.fallback(), 0);
        assert_eq!(table.char_index(0x5A), 0);
    }

    #[test]
    fn width_records() {
        let table = table_with(&[0x41, 0x42, 0x43]);
        assert_eq!(
            table.glyph_width(2),
            GlyphWidth {
                left: 0,
                width: 4,
                advance: 3
            }
        );
        assert_eq!(table.calc_width(&[0x41, 0x43]), 1 + 3);
        assert_eq!(table.glyph_width(3), GlyphWidth::default());
    }
}
