use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` columns, ending in `…` when cut.
///
/// Returns `Cow::Borrowed` when the string already fits.
///
/// ```
/// use pricegrid::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("ETH / USD", 20), "ETH / USD");
/// assert_eq!(truncate_to_width("Decentralized", 6), "Decen…");
/// assert_eq!(truncate_to_width("Test", 0), "");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    // One column is reserved for the ellipsis.
    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::with_capacity(max_width + ELLIPSIS.len_utf8());
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// Feed names and captions come from a remote list and are rendered on a
/// single line, so every C0 control (tab and newline included), DEL, and any
/// CSI (`ESC [ ... final`) or OSC (`ESC ] ... BEL|ESC \`) sequence is
/// removed.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_control(c) {
                out.push(c);
            }
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    Cow::Owned(out)
}

fn is_control(c: char) -> bool {
    c.is_ascii_control()
}

/// Shorten a hex address to `0xABCD…WXYZ`. Short inputs are returned as-is.
pub fn short_address(address: &str) -> Cow<'_, str> {
    let address = address.trim();
    if address.len() <= 12 || !address.is_ascii() {
        return Cow::Borrowed(address);
    }
    Cow::Owned(format!(
        "{}{}{}",
        &address[..6],
        ELLIPSIS,
        &address[address.len() - 4..]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_fits() {
        assert!(matches!(truncate_to_width("Short", 10), Cow::Borrowed(_)));
        assert_eq!(truncate_to_width("12345", 5), "12345");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello W…");
        assert_eq!(truncate_to_width("Testing", 1), "…");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK char is two columns; only one fits before the ellipsis.
        assert_eq!(truncate_to_width("日本語", 4), "日…");
        assert!(display_width(&truncate_to_width("日本語テスト", 7)) <= 7);
    }

    #[test]
    fn test_strip_clean_text_borrowed() {
        let input = "ETH / USD";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_controls_and_newlines() {
        assert_eq!(strip_control_chars("ETH\n/\tUSD\x07\x7f"), "ETH/USD");
    }

    #[test]
    fn test_strip_ansi_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
    }

    #[test]
    fn test_strip_keeps_unicode() {
        assert_eq!(strip_control_chars("日本\x1b[1m語"), "日本語");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0xF79D6aFBb6dA890132F9D7c355e3015f15F3406F"),
            "0xF79D…406F"
        );
        assert_eq!(short_address("0x1234"), "0x1234");
    }
}
