//! Small helpers for text entered on the kana keyboards.

use alloc::string::String;

const DAKUTEN: char = '゛';
const HANDAKUTEN: char = '゜';
const KATAKANA_TO_HIRAGANA: u32 = 0x60;

/// Kana whose voiced form is the next codepoint.
const DAKUTENABLE: [char; 20] = [
    'か', 'き', 'く', 'け', 'こ', 'さ', 'し', 'す', 'せ', 'そ', 'た', 'ち', 'つ', 'て', 'と', 'は',
    'ひ', 'ふ', 'へ', 'ほ',
];

/// Kana whose semi-voiced form is two codepoints on.
const HANDAKUTENABLE: [char; 5] = ['は', 'ひ', 'ふ', 'へ', 'ほ'];

/// The first codepoint of `text`, 0 if it is empty.
///
/// Unlike the glyph lookup path this goes up to 4 byte sequences.
pub fn first_codepoint(text: &str) -> u32 {
    text.chars().next().map_or(0, u32::from)
}

/// Adds a dakuten (or handakuten) to the first character of `text`.
///
/// Katakana is treated like the matching hiragana. When the first character has no
/// voiced form the mark is inserted after it as a separate character.
pub fn dakutenify(text: &str, handakuten: bool) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::from(if handakuten { HANDAKUTEN } else { DAKUTEN });
    };

    let mut kana = first as u32;
    if ('ァ'..='ヶ').contains(&first) {
        kana -= KATAKANA_TO_HIRAGANA;
    }
    let kana = char::from_u32(kana).unwrap_or(first);

    let shift = if handakuten {
        if HANDAKUTENABLE.contains(&kana) {
            2
        } else {
            0
        }
    } else if kana == 'う' {
        // ゔ and ヴ are both 0x4E past their base
        0x4E
    } else if DAKUTENABLE.contains(&kana) {
        1
    } else {
        0
    };

    let mut out = String::with_capacity(text.len() + 3);
    match char::from_u32(first as u32 + shift) {
        Some(voiced) if shift != 0 => out.push(voiced),
        _ => {
            out.push(first);
            out.push(if handakuten { HANDAKUTEN } else { DAKUTEN });
        }
    }
    out.push_str(chars.as_str());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_codepoint_of_strings() {
        assert_eq!(first_codepoint(""), 0);
        assert_eq!(first_codepoint("abc"), 0x61);
        assert_eq!(first_codepoint("שלום"), 0x5E9);
        assert_eq!(first_codepoint("😀!"), 0x1F600);
    }

    #[test]
    fn voices_hiragana_and_katakana() {
        assert_eq!(dakutenify("か", false), "が");
        assert_eq!(dakutenify("カ", false), "ガ");
        assert_eq!(dakutenify("はな", true), "ぱな");
        assert_eq!(dakutenify("ホ", true), "ポ");
        assert_eq!(dakutenify("う", false), "ゔ");
        assert_eq!(dakutenify("ウ", false), "ヴ");
    }

    #[test]
    fn inserts_mark_when_no_voiced_form() {
        assert_eq!(dakutenify("あい", false), "あ゛い");
        assert_eq!(dakutenify("か", true), "か゜");
        assert_eq!(dakutenify("A", false), "A゛");
        assert_eq!(dakutenify("", true), "゜");
    }
}
