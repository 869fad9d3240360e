use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::{Gray8, GrayColor},
    Pixel,
};
use image::{GrayImage, Luma};
use tilefont::{IndexedFramebuffer, Palette, PaletteIndex};

const LEVELS: [u8; 4] = [0, 0x55, 0xAA, 0xFF];
const ASCII_LEVELS: [char; 4] = [' ', '.', '+', '#'];

/// Every bank maps intensity 1 to 3 onto the same three gray levels.
pub fn gray_palette() -> [Gray8; 256] {
    let mut colors = [Gray8::BLACK; 256];
    for (index, color) in colors.iter_mut().enumerate() {
        *color = Gray8::new(LEVELS[index % 4]);
    }
    colors
}

struct ImageTarget(GrayImage);

impl OriginDimensions for ImageTarget {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for ImageTarget {
    type Color = Gray8;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x < self.0.width() && y < self.0.height() {
                self.0.put_pixel(x, y, Luma([color.luma()]));
            }
        }
        Ok(())
    }
}

pub fn to_image(layer: &IndexedFramebuffer) -> GrayImage {
    let colors = gray_palette();
    let image = GrayImage::new(layer.width as u32, layer.height as u32);
    let mut target = Palette::new(ImageTarget(image), &colors);
    layer
        .flush_to(&mut target)
        .unwrap_or_else(|never| match never {});
    target.into_inner().0
}

/// One line per row, trailing blank columns trimmed. Rows below the last drawn pixel are
/// left out.
pub fn to_ascii(layer: &IndexedFramebuffer) -> String {
    let mut lines: Vec<String> = layer
        .rows()
        .map(|row| {
            row.iter()
                .map(|&value| ASCII_LEVELS[PaletteIndex(value).intensity() as usize])
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
