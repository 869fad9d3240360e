//! Builds font files in memory so tests don't need binary assets.
//!
//! ```
//! use tilefont::{test_support::FontBuilder, GlyphTable};
//!
//! let bytes = FontBuilder::new(4, 4)
//!     .glyph('?', 4, &[])
//!     .glyph('A', 5, &["", "", "", "3333"])
//!     .build();
//! let table = GlyphTable::parse(&bytes).unwrap();
//! assert_eq!(table.char_index(u16::from(b'A')), 1);
//! ```
//!
//! Loading clears the first three bytes of every tile, so glyphs meant to be drawn should
//! keep their first twelve pixels blank.

use crate::font_file::NO_TILE;
use alloc::vec::Vec;

/// How the character map of the built file is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapEncoding {
    /// One type 0 record per run of consecutive characters.
    #[default]
    Runs,
    /// A single type 1 record spanning every character.
    Table,
    /// A single type 2 record listing every character.
    Scattered,
}

#[derive(Debug, Clone)]
struct GlyphSpec {
    codepoint: u16,
    left: i8,
    advance: u8,
    pixels: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct FontBuilder {
    tile_width: u8,
    tile_height: u8,
    encoding: MapEncoding,
    glyphs: Vec<GlyphSpec>,
}

impl FontBuilder {
    pub fn new(tile_width: u8, tile_height: u8) -> Self {
        Self {
            tile_width,
            tile_height,
            encoding: MapEncoding::default(),
            glyphs: Vec::new(),
        }
    }

    pub fn encoding(mut self, encoding: MapEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Adds a glyph for a BMP character. `rows` are top to bottom, one character per
    /// pixel: `1`-`3` are intensities, `#` is 3 and anything else is blank. Missing rows
    /// and columns are blank.
    pub fn glyph(self, c: char, advance: u8, rows: &[&str]) -> Self {
        self.glyph_with_bearing(c, 0, advance, rows)
    }

    pub fn glyph_with_bearing(mut self, c: char, left: i8, advance: u8, rows: &[&str]) -> Self {
        let codepoint = c as u32 as u16;
        let (width, height) = (self.tile_width as usize, self.tile_height as usize);
        let mut pixels = vec![0u8; width * height];
        for (y, row) in rows.iter().take(height).enumerate() {
            for (x, pixel) in row.chars().take(width).enumerate() {
                pixels[y * width + x] = match pixel {
                    '1' => 1,
                    '2' => 2,
                    '3' | '#' => 3,
                    _ => 0,
                };
            }
        }
        self.glyphs.retain(|glyph| glyph.codepoint != codepoint);
        self.glyphs.push(GlyphSpec {
            codepoint,
            left,
            advance,
            pixels,
        });
        self
    }

    /// Adds blank glyphs, handy for measuring.
    pub fn blank_glyphs(self, chars: impl IntoIterator<Item = char>, advance: u8) -> Self {
        chars
            .into_iter()
            .fold(self, |builder, c| builder.glyph(c, advance, &[]))
    }

    pub fn tile_size(&self) -> u16 {
        let pixels = self.tile_width as usize * self.tile_height as usize;
        pixels.div_ceil(4) as u16
    }

    pub fn build(&self) -> Vec<u8> {
        let mut glyphs = self.glyphs.clone();
        glyphs.sort_by_key(|glyph| glyph.codepoint);
        let tile_size = self.tile_size();

        let mut out = Vec::new();

        // file header, size patched at the end
        out.extend_from_slice(b"RTFN");
        out.extend_from_slice(&0xFEFFu16.to_le_bytes());
        out.extend_from_slice(&0x0100u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0x10u16.to_le_bytes());
        out.extend_from_slice(&3u16.to_le_bytes());

        // font info, pointers patched once the chunks are placed
        let info = out.len();
        out.extend_from_slice(b"FNIF");
        out.extend_from_slice(&0x1Cu32.to_le_bytes());
        out.extend_from_slice(&[0, self.tile_height]);
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&[0, self.tile_width, self.tile_width, 1]);
        out.extend_from_slice(&[0; 12]);

        let glyph_chunk = out.len();
        out.extend_from_slice(b"PLGC");
        out.extend_from_slice(&(0x10 + glyphs.len() as u32 * tile_size as u32).to_le_bytes());
        out.extend_from_slice(&[self.tile_width, self.tile_height]);
        out.extend_from_slice(&tile_size.to_le_bytes());
        out.extend_from_slice(&[0, self.tile_width, 0, 2]);
        for glyph in &glyphs {
            out.extend(pack_2bpp(&glyph.pixels, tile_size));
        }
        pad(&mut out);

        let width_chunk = out.len();
        out.extend_from_slice(b"HDWC");
        out.extend_from_slice(&(0x10 + glyphs.len() as u32 * 3).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&(glyphs.len().saturating_sub(1) as u16).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        for glyph in &glyphs {
            out.extend_from_slice(&[glyph.left as u8, self.tile_width, glyph.advance]);
        }
        pad(&mut out);

        let records = match self.encoding {
            MapEncoding::Runs => runs(&glyphs),
            MapEncoding::Table => table(&glyphs),
            MapEncoding::Scattered => scattered(&glyphs),
        };
        let first_map = out.len();
        let record_count = records.len();
        for (i, (first, last, kind, body)) in records.into_iter().enumerate() {
            let chunk = out.len();
            let size = 0x14 + body.len() as u32 * 2;
            let size = (size + 3) & !3;
            let next = if i + 1 < record_count {
                chunk as u32 + size + 8
            } else {
                0
            };
            out.extend_from_slice(b"PAMC");
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&first.to_le_bytes());
            out.extend_from_slice(&last.to_le_bytes());
            out.extend_from_slice(&kind.to_le_bytes());
            out.extend_from_slice(&next.to_le_bytes());
            for value in body {
                out.extend_from_slice(&value.to_le_bytes());
            }
            out.resize(chunk + size as usize, 0);
        }
        let map_pointer = if record_count == 0 {
            0
        } else {
            first_map as u32 + 8
        };

        let file_size = out.len() as u32;
        out[0x08..0x0C].copy_from_slice(&file_size.to_le_bytes());
        let pointers = info + 0x10;
        out[pointers..pointers + 4].copy_from_slice(&(glyph_chunk as u32 + 8).to_le_bytes());
        out[pointers + 4..pointers + 8].copy_from_slice(&(width_chunk as u32 + 8).to_le_bytes());
        out[pointers + 8..pointers + 12].copy_from_slice(&map_pointer.to_le_bytes());
        out
    }
}

type Record = (u16, u16, u32, Vec<u16>);

fn runs(glyphs: &[GlyphSpec]) -> Vec<Record> {
    let mut records: Vec<Record> = Vec::new();
    for (tile, glyph) in glyphs.iter().enumerate() {
        match records.last_mut() {
            Some((_, last, _, _)) if glyph.codepoint == last.wrapping_add(1) => {
                *last = glyph.codepoint
            }
            _ => records.push((glyph.codepoint, glyph.codepoint, 0, vec![tile as u16])),
        }
    }
    records
}

fn table(glyphs: &[GlyphSpec]) -> Vec<Record> {
    let (Some(first), Some(last)) = (glyphs.first(), glyphs.last()) else {
        return Vec::new();
    };
    let (first, last) = (first.codepoint, last.codepoint);
    let mut tiles = vec![NO_TILE; (last - first) as usize + 1];
    for (tile, glyph) in glyphs.iter().enumerate() {
        tiles[(glyph.codepoint - first) as usize] = tile as u16;
    }
    vec![(first, last, 1, tiles)]
}

fn scattered(glyphs: &[GlyphSpec]) -> Vec<Record> {
    if glyphs.is_empty() {
        return Vec::new();
    }
    let mut body = vec![glyphs.len() as u16];
    for (tile, glyph) in glyphs.iter().enumerate() {
        body.push(glyph.codepoint);
        body.push(tile as u16);
    }
    vec![(0, 0xFFFF, 2, body)]
}

fn pack_2bpp(pixels: &[u8], tile_size: u16) -> Vec<u8> {
    let mut tile = vec![0u8; tile_size as usize];
    for (k, &pixel) in pixels.iter().enumerate() {
        tile[k / 4] |= (pixel & 0b11) << ((3 - k % 4) * 2);
    }
    tile
}

fn pad(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}
