//! Lightweight script-based language detection (§4.4). No external model:
//! this inspects character ranges rather than running a classifier, which is
//! sufficient to distinguish RTL scripts from Latin prose.

use gazette_core::model::Language;

const HEBREW_RANGE: std::ops::RangeInclusive<char> = '\u{0590}'..='\u{05FF}';
const ARABIC_RANGE: std::ops::RangeInclusive<char> = '\u{0600}'..='\u{06FF}';

pub fn detect_language(text: &str) -> Language {
    let mut hebrew = 0usize;
    let mut arabic = 0usize;
    let mut latin = 0usize;

    for c in text.chars() {
        if HEBREW_RANGE.contains(&c) {
            hebrew += 1;
        } else if ARABIC_RANGE.contains(&c) {
            arabic += 1;
        } else if c.is_ascii_alphabetic() {
            latin += 1;
        }
    }

    if hebrew == 0 && arabic == 0 && latin == 0 {
        return Language::Other;
    }
    if hebrew >= arabic && hebrew > latin {
        return Language::He;
    }
    if arabic > hebrew && arabic > latin {
        return Language::Ar;
    }
    Language::En
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english() {
        assert_eq!(
            detect_language("The quick brown fox jumps over the lazy dog."),
            Language::En
        );
    }

    #[test]
    fn detects_hebrew() {
        assert_eq!(detect_language("שלום עולם, זהו מאמר בעברית"), Language::He);
    }

    #[test]
    fn detects_arabic() {
        assert_eq!(detect_language("مرحبا بالعالم، هذا مقال باللغة العربية"), Language::Ar);
    }

    #[test]
    fn no_alphabetic_text_is_other() {
        assert_eq!(detect_language("12345 67890 !!! ---"), Language::Other);
    }
}
