//! Lenient parsing of the provider's prose output into discrete suggestion items
//!
//! The provider is merely _asked_ to return bullet points, nothing guarantees it will.
//! This is the fragile half of the advisor, kept as a pure function so it can be tested without any network involvement.

/// The bullet glyphs we know providers to use
const BULLET_MARKERS: &[char] = &['-', '•', '*'];

/// Split `text` into an ordered list of non-empty suggestion items.
///
/// Each line is trimmed, one leading bullet glyph (if any) is stripped, and whatever whitespace
/// surrounded it is dropped. Lines that end up empty are discarded; the original line order is kept
pub fn split_into_points(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_bullet)
        .filter(|line| line.is_empty() == false)
        .map(|line| line.to_string())
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    BULLET_MARKERS.iter()
        .find_map(|marker| line.strip_prefix(*marker))
        .unwrap_or(line)
        .trim()
}
