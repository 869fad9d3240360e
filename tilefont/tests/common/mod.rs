#![allow(dead_code)]
use embedded_graphics::geometry::Point;
use tilefont::{test_support::FontBuilder, Font, IndexedFramebuffer};

/// Row of each glyph that survives loading and identifies it.
pub const MARK_ROW: i32 = 3;

/// 4x8 tiles, every glyph advancing 4. Each glyph has a distinct pattern on
/// [`MARK_ROW`] so tests can tell which one was drawn where.
pub fn builder() -> FontBuilder {
    let glyph = |builder: FontBuilder, c: char, mark: &str| {
        builder.glyph(c, 4, &["", "", "", mark, "", "", "", ""])
    };
    let mut builder = FontBuilder::new(4, 8).glyph(' ', 4, &[]);
    for (c, mark) in [
        ('?', "3333"),
        ('A', "1..."),
        ('B', "2..."),
        ('C', ".1.."),
        ('D', ".2.."),
        ('(', "3..."),
        (')', "...3"),
        ('-', "..3."),
        ('2', "2..2"),
        ('4', "1..1"),
        ('א', "..1."),
        ('ב', "..2."),
    ] {
        builder = glyph(builder, c, mark);
    }
    builder
}

pub fn font() -> Font {
    Font::from_bytes(&builder().build()).unwrap()
}

/// Marks of the glyph drawn with its pen at `pen`.
pub fn mark_at(fb: &IndexedFramebuffer, pen: Point) -> [u8; 4] {
    let mut mark = [0; 4];
    for (col, value) in mark.iter_mut().enumerate() {
        let point = pen + Point::new(col as i32, MARK_ROW);
        *value = fb.get_pixel(point).map_or(0, |p| p.0);
    }
    mark
}

/// Marks as written in [`builder`], with the palette bank added.
pub fn mark(pattern: &str, bank: u8) -> [u8; 4] {
    let mut mark = [0; 4];
    for (value, c) in mark.iter_mut().zip(pattern.chars()) {
        if let Some(intensity) = c.to_digit(10) {
            *value = intensity as u8 + bank * 4;
        }
    }
    mark
}

pub fn temp_font_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("tilefont-{}-{}.nftr", std::process::id(), name))
}
