//! Lossy-but-predictable downgrade of extended-Latin text to printable ASCII.
//!
//! The downstream FedEx import chokes on anything outside printable ASCII,
//! so every Latin-1 Supplement and Latin Extended-A letter is substituted
//! with its closest ASCII letter, and the characters that are structural in
//! CSV (`"`, `,`, CR, LF) become spaces so they can never corrupt a row.
//!
//! Most substitutions are one character for one character and come from a
//! single translation table covering code points 0 through 0x17E, built once
//! and shared read-only. A handful expand to two characters: `Æ/æ`, `ß` and
//! `Þ/þ` always, and `Ä/ä`, `Ö/ö`, `Ü/ü` only for Germanic destination
//! countries where the `ue`-style spelling is the accepted fallback.
//! Code points past the table pass through unchanged.

use once_cell::sync::Lazy;

/// The table covers U+0000..=U+017E (Latin-1 Supplement + Latin Extended-A).
const TABLE_LEN: usize = 0x17F;

/// Right single quotation mark, common in pasted contact names.
const RIGHT_SINGLE_QUOTE: char = '\u{2019}';
/// En dash, common in pasted address lines.
const EN_DASH: char = '\u{2013}';

static ASCII_TABLE: Lazy<[char; TABLE_LEN]> = Lazy::new(build_table);

fn build_table() -> [char; TABLE_LEN] {
    let mut table = ['\0'; TABLE_LEN];
    for (code, slot) in table.iter_mut().enumerate() {
        *slot = char::from_u32(code as u32).unwrap_or('\0');
    }

    // Structural CSV characters must never reach the encoder verbatim.
    for c in ['"', ',', '\r', '\n'] {
        table[c as usize] = ' ';
    }

    // One-for-one letter substitutions. Ä/Ö/Ü land here too; the digraph
    // expansion intercepts them first when the country calls for it.
    let substitutions: &[(&str, char)] = &[
        // Latin-1 Supplement
        ("ÀÁÂÃÄÅ", 'A'),
        ("àáâãäå", 'a'),
        ("Ç", 'C'),
        ("ç", 'c'),
        ("Ð", 'D'),
        ("ð", 'd'),
        ("ÈÉÊË", 'E'),
        ("èéêë", 'e'),
        ("ÌÍÎÏ", 'I'),
        ("ìíîï", 'i'),
        ("Ñ", 'N'),
        ("ñ", 'n'),
        ("ÒÓÔÕÖØ", 'O'),
        ("òóôõöø", 'o'),
        ("ÙÚÛÜ", 'U'),
        ("ùúûü", 'u'),
        ("Ý", 'Y'),
        ("ýÿ", 'y'),
        // Latin Extended-A
        ("ĀĂĄ", 'A'),
        ("āăą", 'a'),
        ("ĆĈĊČ", 'C'),
        ("ćĉċč", 'c'),
        ("ĎĐ", 'D'),
        ("ďđ", 'd'),
        ("ĒĔĖĘĚ", 'E'),
        ("ēĕėęě", 'e'),
        ("ĜĞĠĢ", 'G'),
        ("ĝğġģ", 'g'),
        ("ĤĦ", 'H'),
        ("ĥħ", 'h'),
        ("ĨĪĬĮİĲ", 'I'),
        ("ĩīĭįıĳ", 'i'),
        ("Ĵ", 'J'),
        ("ĵ", 'j'),
        ("Ķ", 'K'),
        ("ķĸ", 'k'),
        ("ĹĻĽĿŁ", 'L'),
        ("ĺļľŀł", 'l'),
        ("ŃŅŇŊ", 'N'),
        ("ńņňŉŋ", 'n'),
        ("ŌŎŐŒ", 'O'),
        ("ōŏőœ", 'o'),
        ("ŔŖŘ", 'R'),
        ("ŕŗř", 'r'),
        ("ŚŜŞŠ", 'S'),
        ("śŝşš", 's'),
        ("ŢŤŦ", 'T'),
        ("ţťŧ", 't'),
        ("ŨŪŬŮŰŲ", 'U'),
        ("ũūŭůűų", 'u'),
        ("Ŵ", 'W'),
        ("ŵ", 'w'),
        ("ŶŸ", 'Y'),
        ("ŷ", 'y'),
        ("ŹŻŽ", 'Z'),
        ("źżž", 'z'),
    ];

    for (set, ascii) in substitutions {
        for c in set.chars() {
            table[c as usize] = *ascii;
        }
    }

    table
}

/// Two-character expansions, checked before the table.
///
/// Æ, ß and Þ have no one-letter ASCII rendering at all; the umlauts only
/// expand when the destination country spells them out (`expand_germanic`).
fn expansion(c: char, expand_germanic: bool) -> Option<&'static str> {
    match c {
        'Æ' => Some("Ae"),
        'æ' => Some("ae"),
        'ß' => Some("ss"),
        'Þ' => Some("Th"),
        'þ' => Some("th"),
        'Ä' if expand_germanic => Some("Ae"),
        'ä' if expand_germanic => Some("ae"),
        'Ö' if expand_germanic => Some("Oe"),
        'ö' if expand_germanic => Some("oe"),
        'Ü' if expand_germanic => Some("Ue"),
        'ü' if expand_germanic => Some("ue"),
        _ => None,
    }
}

/// Single-character substitution for anything the expansion didn't take.
fn substitute(c: char) -> char {
    match c {
        RIGHT_SINGLE_QUOTE => '\'',
        EN_DASH => '-',
        c if (c as usize) < TABLE_LEN => ASCII_TABLE[c as usize],
        c => c,
    }
}

/// Output byte width of one input character, for the exact-size pre-pass.
fn width(c: char, expand_germanic: bool) -> usize {
    match expansion(c, expand_germanic) {
        Some(two) => two.len(),
        None => substitute(c).len_utf8(),
    }
}

/// Downgrade `text` to ASCII-safe, whitespace-collapsed form.
///
/// Computes the exact output length first so the result is built in a
/// single allocation, then trims leading and trailing spaces (some of which
/// this function itself introduces in place of quotes and commas).
pub fn normalize(text: &str, expand_germanic: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let len: usize = text.chars().map(|c| width(c, expand_germanic)).sum();
    let mut out = String::with_capacity(len);

    for c in text.chars() {
        match expansion(c, expand_germanic) {
            Some(two) => out.push_str(two),
            None => out.push(substitute(c)),
        }
    }
    debug_assert_eq!(out.len(), len);

    let trimmed = out.trim_matches(' ');
    if trimmed.len() == out.len() {
        out
    } else {
        trimmed.to_string()
    }
}
