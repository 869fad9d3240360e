#![no_std]
#[cfg(feature = "std")]
extern crate std;

#[macro_use]
extern crate alloc;

pub mod bidi;
mod font;
pub use font::*;
pub mod font_file;
mod glyph_table;
pub use glyph_table::*;
pub mod layout;
pub use layout::{Alignment, GlyphPlacement, PrintOptions};
pub mod raster;
mod style;
pub use style::*;
pub mod surface;
pub use surface::{IndexedFramebuffer, Palette, PaletteIndex};
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod text_utils;
pub mod utf16;
