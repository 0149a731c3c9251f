use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of `s` in terminal columns (CJK and emoji count as two).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: char = '…';

/// Truncate `s` to at most `max_width` columns, ending in `…` when cut.
///
/// Borrows when `s` already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    // Leave one column for the ellipsis
    let budget = max_width - 1;
    let mut out = String::with_capacity(s.len().min(max_width * 4));
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Remove terminal control characters and ANSI escape sequences from
/// remote text before it reaches the screen.
///
/// Keeps tab and newline. Borrows when nothing needs stripping.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                // CSI: parameters until a final byte in @..~
                Some('[') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                // OSC: until BEL or ST
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
        } else if !is_stripped(c) {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn is_stripped(c: char) -> bool {
    c.is_control() && c != '\t' && c != '\n'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("Hello"), 5);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_truncate_fits_borrows() {
        assert!(matches!(truncate_to_width("short", 10), Cow::Borrowed("short")));
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("GitHub Copilot Workspace", 10), "GitHub Co…");
        assert_eq!(display_width(&truncate_to_width("GitHub Copilot Workspace", 10)), 10);
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK char is two columns; never split one
        let out = truncate_to_width("你好世界", 6);
        assert_eq!(out, "你好…");
        assert!(display_width(&out) <= 6);
    }

    #[test]
    fn test_truncate_zero_width() {
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_strip_clean_text_borrows() {
        assert!(matches!(
            strip_control_chars("plain\ttext\n"),
            Cow::Borrowed("plain\ttext\n")
        ));
    }

    #[test]
    fn test_strip_ansi_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_control_chars("a\x1b]0;title\x07b"), "ab");
        assert_eq!(strip_control_chars("a\x1b]8;;x\x1b\\b"), "ab");
        assert_eq!(strip_control_chars("bell\x07\r"), "bell");
    }
}
