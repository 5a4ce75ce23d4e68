//! ANSEL (ANSI Z39.47) decoding, with the GEDCOM 5.5.1 additions.
//!
//! ANSEL writes combining diacritics *before* the letter they modify, while
//! Unicode places combining marks *after* it. Marks are therefore buffered and
//! flushed after the next base character.

/// Map a non-combining ANSEL byte (0x80..=0xFF) to a character.
fn spacing_char(byte: u8) -> Option<char> {
    let ch = match byte {
        0x8D => '\u{200D}', // zero width joiner
        0x8E => '\u{200C}', // zero width non-joiner
        0xA1 => 'Ł',
        0xA2 => 'Ø',
        0xA3 => 'Đ',
        0xA4 => 'Þ',
        0xA5 => 'Æ',
        0xA6 => 'Œ',
        0xA7 => 'ʹ',
        0xA8 => '·',
        0xA9 => '♭',
        0xAA => '®',
        0xAB => '±',
        0xAC => 'Ơ',
        0xAD => 'Ư',
        0xAE => 'ʼ',
        0xB0 => 'ʻ',
        0xB1 => 'ł',
        0xB2 => 'ø',
        0xB3 => 'đ',
        0xB4 => 'þ',
        0xB5 => 'æ',
        0xB6 => 'œ',
        0xB7 => 'ʺ',
        0xB8 => 'ı',
        0xB9 => '£',
        0xBA => 'ð',
        0xBC => 'ơ',
        0xBD => 'ư',
        0xBE => '□',
        0xBF => '■',
        0xC0 => '°',
        0xC1 => 'ℓ',
        0xC2 => '℗',
        0xC3 => '©',
        0xC4 => '♯',
        0xC5 => '¿',
        0xC6 => '¡',
        0xC7 | 0xCF => 'ß',
        0xC8 => '€',
        _ => return None,
    };
    Some(ch)
}

/// Map a combining ANSEL byte (0xE0..=0xFE) to its Unicode combining mark.
fn combining_mark(byte: u8) -> Option<char> {
    let ch = match byte {
        0xE0 => '\u{0309}', // hook above
        0xE1 => '\u{0300}', // grave
        0xE2 => '\u{0301}', // acute
        0xE3 => '\u{0302}', // circumflex
        0xE4 => '\u{0303}', // tilde
        0xE5 => '\u{0304}', // macron
        0xE6 => '\u{0306}', // breve
        0xE7 => '\u{0307}', // dot above
        0xE8 => '\u{0308}', // diaeresis
        0xE9 => '\u{030C}', // caron
        0xEA => '\u{030A}', // ring above
        0xEB => '\u{FE20}', // ligature, left half
        0xEC => '\u{FE21}', // ligature, right half
        0xED => '\u{0315}', // comma above right
        0xEE => '\u{030B}', // double acute
        0xEF => '\u{0310}', // candrabindu
        0xF0 => '\u{0327}', // cedilla
        0xF1 => '\u{0328}', // ogonek
        0xF2 => '\u{0323}', // dot below
        0xF3 => '\u{0324}', // diaeresis below
        0xF4 => '\u{0325}', // ring below
        0xF5 => '\u{0333}', // double low line
        0xF6 => '\u{0332}', // low line
        0xF7 => '\u{0326}', // comma below
        0xF8 => '\u{031C}', // left half ring below
        0xF9 => '\u{032E}', // breve below
        0xFA => '\u{FE22}', // double tilde, left half
        0xFB => '\u{FE23}', // double tilde, right half
        0xFE => '\u{0313}', // comma above
        _ => return None,
    };
    Some(ch)
}

/// Decode one ANSEL line.
///
/// On failure returns the 1-based column and value of the first undefined byte.
pub(crate) fn decode(bytes: &[u8]) -> Result<String, (usize, u8)> {
    let mut out = String::with_capacity(bytes.len());
    let mut marks: Vec<char> = Vec::new();

    for (idx, &byte) in bytes.iter().enumerate() {
        if byte < 0x80 {
            out.push(char::from(byte));
            out.extend(marks.drain(..));
            continue;
        }
        // Non-sorting markers carry no text.
        if byte == 0x88 || byte == 0x89 {
            continue;
        }
        if let Some(mark) = combining_mark(byte) {
            marks.push(mark);
        } else if let Some(ch) = spacing_char(byte) {
            out.push(ch);
            out.extend(marks.drain(..));
        } else {
            return Err((idx + 1, byte));
        }
    }

    // Marks with no following base character are kept in source order.
    out.extend(marks);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii() {
        assert_eq!(decode(b"1 NAME John /Doe/").unwrap(), "1 NAME John /Doe/");
    }

    #[test]
    fn test_combining_marks_follow_base() {
        // "Müller": 0xE8 (diaeresis) precedes 'u' in ANSEL.
        assert_eq!(decode(b"M\xE8uller").unwrap(), "Mu\u{0308}ller");
        // Two marks on one letter keep their order.
        assert_eq!(decode(b"\xE2\xE8i").unwrap(), "i\u{0301}\u{0308}");
    }

    #[test]
    fn test_spacing_characters() {
        assert_eq!(decode(b"\xA1\xB1\xC3").unwrap(), "Łł©");
        assert_eq!(decode(b"Stra\xCFe").unwrap(), "Straße");
    }

    #[test]
    fn test_trailing_mark_is_kept() {
        assert_eq!(decode(b"a\xE2").unwrap(), "a\u{0301}");
    }

    #[test]
    fn test_undefined_byte() {
        assert_eq!(decode(b"ab\x90"), Err((3, 0x90)));
    }
}
