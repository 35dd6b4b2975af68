//! Repair of descriptions cut off mid-sentence by the scraper.
//!
//! Best effort only: the text is cut back to the last complete sentence, or
//! failing that to the last word boundary near the end with `...` appended.
//! A description that already ends a sentence is never touched.

/// Descriptions shorter than this (in characters) are left alone.
pub const MIN_REPAIR_LEN: usize = 100;
/// How far back from the end to look for a word boundary.
const TAIL_WINDOW: usize = 50;
const ELLIPSIS: &str = "...";

pub fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn ends_sentence_boundary(next: Option<&char>) -> bool {
    match next {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '"' | '\''),
    }
}

pub fn repair_truncated(desc: &str) -> String {
    let desc = desc.trim();
    let chars: Vec<char> = desc.chars().collect();
    if chars.len() < MIN_REPAIR_LEN {
        return desc.to_string();
    }
    if chars.last().copied().is_some_and(is_terminal) {
        return desc.to_string();
    }

    if let Some(end) = (0..chars.len())
        .rev()
        .find(|&i| is_terminal(chars[i]) && ends_sentence_boundary(chars.get(i + 1)))
    {
        return chars[..=end].iter().collect();
    }

    let window_start = chars.len().saturating_sub(TAIL_WINDOW);
    match chars[window_start..].iter().rposition(|&c| c == ' ') {
        Some(offset) => {
            let mut out: String = chars[..window_start + offset].iter().collect();
            out.push_str(ELLIPSIS);
            out
        }
        None => desc.to_string(),
    }
}

/// Long description whose last character does not end a sentence.
pub fn is_possibly_truncated(desc: &str) -> bool {
    desc.chars().count() > MIN_REPAIR_LEN && !desc.chars().last().is_some_and(is_terminal)
}
