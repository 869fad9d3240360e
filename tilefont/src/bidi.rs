//! Visual ordering for mixed Hebrew and Latin lines.
//!
//! An RTL line is walked from its logical end. Whenever the walk hits a character that
//! reads left to right, the whole non-Hebrew stretch around it becomes an embedded LTR
//! run: it ends at that character and starts after the nearest Hebrew character before
//! it, minus any punctuation at its front. The run is emitted left to right and the walk
//! then carries on right to left from just before the run.

/// Direction a glyph is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

const HEBREW: core::ops::RangeInclusive<u16> = 0x0590..=0x05FF;

pub fn is_hebrew(c: u16) -> bool {
    HEBREW.contains(&c)
}

/// ASCII that is neither a letter nor a digit. Spaces and control characters count.
pub fn is_punctuation(c: u16) -> bool {
    c < 127 && !(c as u8).is_ascii_alphanumeric()
}

/// Characters that open an embedded LTR run inside RTL text.
pub fn is_strong_ltr(c: u16) -> bool {
    !is_hebrew(c) && !is_punctuation(c)
}

/// Whether any character in `text` forces the line into RTL layout.
pub fn contains_rtl(text: &[u16]) -> bool {
    text.iter().any(|&c| is_hebrew(c))
}

/// The glyph that mirrors `c` when drawn right to left.
pub fn mirror(c: u16) -> u16 {
    match c as u8 {
        _ if c > 0x7F => c,
        b'(' => u16::from(b')'),
        b')' => u16::from(b'('),
        b'[' => u16::from(b']'),
        b']' => u16::from(b'['),
        b'<' => u16::from(b'>'),
        b'>' => u16::from(b'<'),
        _ => c,
    }
}

/// Iterator over the logical indices of a line in the order they are drawn.
///
/// The whole state is the current mode, a cursor and the bounds of the embedded LTR run
/// being drawn, if any. In LTR mode `cursor` is the next index to emit; in RTL mode it is
/// one past it.
#[derive(Debug, Clone)]
pub struct VisualOrder<'a> {
    text: &'a [u16],
    mode: Direction,
    cursor: usize,
    pending_run: Option<(usize, usize)>,
}

impl<'a> VisualOrder<'a> {
    pub fn new(text: &'a [u16], direction: Direction) -> Self {
        let cursor = match direction {
            Direction::Ltr => 0,
            Direction::Rtl => text.len(),
        };
        Self {
            text,
            mode: direction,
            cursor,
            pending_run: None,
        }
    }

    /// Bounds of the embedded LTR run containing the strong character at `end - 1`.
    fn embedded_run(&self, end: usize) -> (usize, usize) {
        let mut start = end - 1;
        while start > 0 && !is_hebrew(self.text[start - 1]) {
            start -= 1;
        }
        // the character at end - 1 is strong so this stops before reaching it
        while is_punctuation(self.text[start]) {
            start += 1;
        }
        (start, end)
    }
}

impl Iterator for VisualOrder<'_> {
    type Item = (usize, Direction);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.mode {
                Direction::Ltr => {
                    let limit = self.pending_run.map_or(self.text.len(), |(_, end)| end);
                    if self.cursor < limit {
                        let index = self.cursor;
                        self.cursor += 1;
                        return Some((index, Direction::Ltr));
                    }
                    let (start, _) = self.pending_run.take()?;
                    self.mode = Direction::Rtl;
                    self.cursor = start;
                }
                Direction::Rtl => {
                    if self.cursor == 0 {
                        return None;
                    }
                    let index = self.cursor - 1;
                    if is_strong_ltr(self.text[index]) {
                        let (start, end) = self.embedded_run(self.cursor);
                        self.pending_run = Some((start, end));
                        self.mode = Direction::Ltr;
                        self.cursor = start;
                        continue;
                    }
                    self.cursor = index;
                    return Some((index, Direction::Rtl));
                }
            }
        }
    }
}
