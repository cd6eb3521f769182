//! Normalization keys
//!
//! City and state values are compared through keys, not raw text:
//! - City: trimmed, upper-cased, diacritics stripped ("São Paulo" → "SAO PAULO")
//! - State: trimmed and upper-cased only

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Comparison key for a city name
pub fn normalize_city(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    for c in text.trim().nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match fold_letter(c) {
            Some(folded) => key.push_str(folded),
            None => key.extend(c.to_uppercase()),
        }
    }
    // Stripping can expose whitespace at the edges (e.g. a lone combining mark)
    let trimmed = key.trim();
    if trimmed.len() == key.len() {
        key
    } else {
        trimmed.to_string()
    }
}

/// Comparison key for a state (UF) code
pub fn normalize_state(text: &str) -> String {
    text.trim().to_uppercase()
}

/// Latin letters that carry no canonical decomposition
fn fold_letter(c: char) -> Option<&'static str> {
    let folded = match c {
        'ß' | 'ẞ' => "SS",
        'æ' | 'Æ' => "AE",
        'œ' | 'Œ' => "OE",
        'ø' | 'Ø' => "O",
        'đ' | 'Đ' | 'ð' | 'Ð' => "D",
        'ł' | 'Ł' => "L",
        'ħ' | 'Ħ' => "H",
        'ı' => "I",
        'þ' | 'Þ' => "TH",
        _ => return None,
    };
    Some(folded)
}
