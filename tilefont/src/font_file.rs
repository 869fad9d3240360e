//! # Tile font container
//!
//! Reader for the NFTR-style font files the glyph table is built from. Every integer is
//! little endian. The parts we care about:
//!
//! - `0x14`: length of the font info chunk (one byte is enough, the chunk is small). The
//!   glyph chunk's size field sits at `0x14 + length`.
//! - glyph chunk: `size:u32 tile_width:u8 tile_height:u8 tile_size:u16`, four bytes we
//!   don't use, then `(size - 0x10) / tile_size` packed 2bpp tiles.
//! - `0x24`: pointer to the width data. The width chunk size is 4 bytes before it and
//!   the 3 byte records start 8 bytes after the size.
//! - `0x28`: pointer to the first character map record. Records form a linked list.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

const INFO_LENGTH_OFFSET: usize = 0x14;
const GLYPH_CHUNK_HEADER: u32 = 0x10;
const WIDTH_POINTER_OFFSET: usize = 0x24;
const MAP_POINTER_OFFSET: usize = 0x28;
/// Bytes at the start of every tile that the source format leaves with junk in them.
const CORRUPT_BORDER_BYTES: usize = 3;
/// Bytes per width record: left bearing, glyph width, advance.
pub const WIDTH_RECORD_SIZE: usize = 3;
/// Type 1 table entry for a character without a glyph.
pub const NO_TILE: u16 = 0xFFFF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontParseError {
    /// Needed `needed` bytes at `offset` but the file ended.
    Truncated { offset: usize, needed: usize },
    ZeroTileSize,
    GlyphChunkTooSmall(u32),
}

impl core::fmt::Display for FontParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FontParseError::Truncated { offset, needed } => write!(
                f,
                "font file truncated: needed {} bytes at offset 0x{:X}",
                needed, offset
            ),
            FontParseError::ZeroTileSize => write!(f, "glyph chunk declares a tile size of 0"),
            FontParseError::GlyphChunkTooSmall(size) => {
                write!(f, "glyph chunk size {} is smaller than its header", size)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FontParseError {}

/// Forward-only reader over the font bytes.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FontParseError> {
        let truncated = FontParseError::Truncated {
            offset: self.pos,
            needed: n,
        };
        let end = self.pos.checked_add(n).ok_or(truncated.clone())?;
        let bytes = self.data.get(self.pos..end).ok_or(truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, FontParseError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, FontParseError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, FontParseError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// How a character map record assigns tiles to its characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapKind {
    /// Type 0: characters `first..=last` use consecutive tiles from `first_tile`.
    Contiguous { first_tile: u16 },
    /// Type 1: one tile per character in `first..=last`, [`NO_TILE`] where there is none.
    Table(Vec<u16>),
    /// Type 2: explicit `(char, tile)` pairs.
    Scattered(Vec<(u16, u16)>),
    /// Any other type value. Contributes nothing but the chain continues past it.
    Unknown(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRecord {
    pub first: u16,
    pub last: u16,
    pub kind: MapKind,
    /// Offset of the next record. Anything outside the file ends the chain.
    pub next: u32,
}

impl MapRecord {
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, FontParseError> {
        let first = reader.read_u16()?;
        let last = reader.read_u16()?;
        let kind = reader.read_u32()?;
        let next = reader.read_u32()?;

        let kind = match kind {
            0 => MapKind::Contiguous {
                first_tile: reader.read_u16()?,
            },
            1 => {
                let count = if last >= first {
                    (last - first) as usize + 1
                } else {
                    0
                };
                let mut tiles = Vec::with_capacity(count);
                for _ in 0..count {
                    tiles.push(reader.read_u16()?);
                }
                MapKind::Table(tiles)
            }
            2 => {
                let count = reader.read_u16()?;
                let mut pairs = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let character = reader.read_u16()?;
                    let tile = reader.read_u16()?;
                    pairs.push((character, tile));
                }
                MapKind::Scattered(pairs)
            }
            other => MapKind::Unknown(other),
        };

        Ok(Self {
            first,
            last,
            kind,
            next,
        })
    }

    /// Every `(tile, character)` assignment this record makes.
    pub fn entries(&self) -> impl Iterator<Item = (usize, u16)> + '_ {
        let range = self.first..=self.last;
        let contiguous = match self.kind {
            MapKind::Contiguous { first_tile } => Some(
                range
                    .clone()
                    .map(move |c| (first_tile as usize + (c - self.first) as usize, c)),
            ),
            _ => None,
        };
        let table = match &self.kind {
            MapKind::Table(tiles) => Some(
                tiles
                    .iter()
                    .zip(range)
                    .filter(|&(&t, _)| t != NO_TILE)
                    .map(|(&t, c)| (t as usize, c)),
            ),
            _ => None,
        };
        let scattered = match &self.kind {
            MapKind::Scattered(pairs) => Some(pairs.iter().map(|&(c, t)| (t as usize, c))),
            _ => None,
        };
        contiguous
            .into_iter()
            .flatten()
            .chain(table.into_iter().flatten())
            .chain(scattered.into_iter().flatten())
    }

    /// Writes this record into `codepoints`, returning how many entries pointed past the
    /// end of the table and were dropped.
    pub fn apply(&self, codepoints: &mut [u16]) -> usize {
        let mut dropped = 0;
        for (tile, character) in self.entries() {
            match codepoints.get_mut(tile) {
                Some(slot) => *slot = character,
                None => dropped += 1,
            }
        }
        dropped
    }
}

/// The decoded contents of a font file, before lookup structures are derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontData {
    pub tile_width: u8,
    pub tile_height: u8,
    pub tile_size: u16,
    pub tiles: Vec<u8>,
    pub widths: Vec<u8>,
    /// Indexed by glyph, holds the character drawn by that glyph.
    pub codepoints: Vec<u16>,
}

pub fn parse(data: &[u8]) -> Result<FontData, FontParseError> {
    let mut reader = ByteReader::at(data, INFO_LENGTH_OFFSET);
    let info_length = reader.read_u8()? as usize;
    reader.seek(INFO_LENGTH_OFFSET + info_length);

    let chunk_size = reader.read_u32()?;
    let tile_width = reader.read_u8()?;
    let tile_height = reader.read_u8()?;
    let tile_size = reader.read_u16()?;
    if tile_size == 0 {
        return Err(FontParseError::ZeroTileSize);
    }
    let glyph_count = chunk_size
        .checked_sub(GLYPH_CHUNK_HEADER)
        .ok_or(FontParseError::GlyphChunkTooSmall(chunk_size))?
        / tile_size as u32;
    let glyph_count = glyph_count as usize;

    reader.skip(4);
    let mut tiles = reader.read_bytes(glyph_count * tile_size as usize)?.to_vec();
    for tile in tiles.chunks_exact_mut(tile_size as usize) {
        let border = CORRUPT_BORDER_BYTES.min(tile.len());
        tile[..border].fill(0);
    }

    reader.seek(WIDTH_POINTER_OFFSET);
    let width_pointer = reader.read_u32()? as usize;
    reader.seek(width_pointer.saturating_sub(4));
    let _width_chunk_size = reader.read_u32()?;
    reader.skip(8);
    let widths = reader.read_bytes(glyph_count * WIDTH_RECORD_SIZE)?.to_vec();

    reader.seek(MAP_POINTER_OFFSET);
    let map_pointer = reader.read_u32()?;
    let codepoints = read_char_maps(data, map_pointer, glyph_count);

    Ok(FontData {
        tile_width,
        tile_height,
        tile_size,
        tiles,
        widths,
        codepoints,
    })
}

/// Follows the character map chain starting at `pointer`. A broken record or a pointer
/// leaving the file ends the chain and whatever was mapped so far is kept.
fn read_char_maps(data: &[u8], mut pointer: u32, glyph_count: usize) -> Vec<u16> {
    let mut codepoints = vec![0u16; glyph_count];
    let mut visited = BTreeSet::new();

    while pointer != 0 && (pointer as usize) < data.len() {
        if !visited.insert(pointer) {
            #[cfg(feature = "tracing")]
            tracing::event!(
                tracing::Level::WARN,
                offset = pointer,
                "character map chain loops back on itself"
            );
            break;
        }

        let mut reader = ByteReader::at(data, pointer as usize);
        let record = match MapRecord::read(&mut reader) {
            Ok(record) => record,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::event!(
                    tracing::Level::WARN,
                    offset = pointer,
                    error = %_e,
                    "unreadable character map record, keeping partial map"
                );
                break;
            }
        };

        let _dropped = record.apply(&mut codepoints);
        #[cfg(feature = "tracing")]
        if _dropped > 0 {
            tracing::event!(
                tracing::Level::WARN,
                first = record.first,
                last = record.last,
                dropped = _dropped,
                "character map entries point past the last glyph"
            );
        }
        pointer = record.next;
    }

    codepoints
}
