use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use embedded_graphics::geometry::Point;
use std::path::PathBuf;
use tilefont::{text_utils, Alignment, Font, IndexedFramebuffer, PrintOptions};
use tracing::{event, Level};

mod render;

#[derive(Parser)]
#[command(author, version, about = "Render text with a tile font", long_about = None)]
struct Cli {
    /// Text to render. `\n` starts a new line.
    #[arg(value_name = "TEXT")]
    text: String,
    /// Font files to try in order, the first readable one is used
    #[arg(short, long = "font", value_name = "FILE", required = true)]
    fonts: Vec<PathBuf>,
    #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
    x: i32,
    #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
    y: i32,
    #[arg(short, long, value_enum, default_value_t = Align::Left)]
    align: Align,
    /// Squeeze lines wider than this many pixels, 0 for no limit
    #[arg(long, default_value_t = 0)]
    max_width: u32,
    #[arg(long, default_value_t = 1.0)]
    scale_x: f32,
    #[arg(long, default_value_t = 1.0)]
    scale_y: f32,
    /// Lay out right to left even if there is no Hebrew in the text
    #[arg(long)]
    rtl: bool,
    #[arg(long, default_value_t = 0)]
    bank: u8,
    /// Voice the first kana of the text before rendering
    #[arg(long, value_enum)]
    dakuten: Option<Dakuten>,
    #[arg(long, default_value_t = 256)]
    width: usize,
    #[arg(long, default_value_t = 192)]
    height: usize,
    /// Write a PNG instead of printing an ASCII preview
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    #[arg(short)]
    verbosity: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Align {
    Left,
    Center,
    Right,
}

impl From<Align> for Alignment {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => Alignment::Left,
            Align::Center => Alignment::Center,
            Align::Right => Alignment::Right,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Dakuten {
    Voiced,
    SemiVoiced,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbosity {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let font = Font::load(&cli.fonts);
    if font.table().is_empty() {
        return Err(anyhow!(
            "none of the {} font candidates could be loaded",
            cli.fonts.len()
        ));
    }

    let text = cli.text.replace("\\n", "\n");
    let text = match cli.dakuten {
        Some(Dakuten::Voiced) => text_utils::dakutenify(&text, false),
        Some(Dakuten::SemiVoiced) => text_utils::dakutenify(&text, true),
        None => text,
    };

    let options = PrintOptions::default()
        .aligned(cli.align.into())
        .palette_bank(cli.bank)
        .max_width(cli.max_width)
        .scale(cli.scale_x, cli.scale_y)
        .rtl(cli.rtl);

    let mut layer = IndexedFramebuffer::new(cli.width, cli.height);
    let origin = Point::new(cli.x, cli.y);
    let end = font
        .print(&text, origin, &options, &mut layer)
        .unwrap_or_else(|never| match never {});
    event!(
        Level::DEBUG,
        width = font.calc_width(&text),
        end_x = end.x,
        end_y = end.y,
        first = text_utils::first_codepoint(&text),
        "rendered text"
    );

    match cli.output {
        Some(path) => {
            render::to_image(&layer)
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            event!(Level::INFO, path = %path.display(), "wrote image");
        }
        None => print!("{}", render::to_ascii(&layer)),
    }

    Ok(())
}
